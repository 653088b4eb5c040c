//! Simulation entities and the per-ball state machine
//!
//! Bricks and the paddle are owned by the caller; the kernel only reads them.
//! Balls live in a [`BallSet`], an indexed collection of independent records.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::paddle_bounce_velocity;
use super::launch::{initial_velocity, launch_velocity};
use crate::rotate_velocity;
use crate::settings::ArenaConfig;
use crate::{Position, Velocity};

/// A destructible rectangular target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    /// Unique, stable identifier
    pub id: String,
    /// Center of the brick; z is carried for the renderer and ignored here
    pub position: Vec3,
    pub width: f32,
    pub height: f32,
    pub active: bool,
    /// Timestamp at which the destruction animation started
    #[serde(default)]
    pub destroyed_at: Option<f64>,
}

impl Brick {
    pub fn new(id: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            position: Vec3::new(x, y, 0.0),
            width,
            height,
            active: true,
            destroyed_at: None,
        }
    }

    /// Brick with the arena's default dimensions
    pub fn with_arena_size(id: impl Into<String>, x: f32, y: f32, arena: &ArenaConfig) -> Self {
        Self::new(id, x, y, arena.brick_width, arena.brick_height)
    }

    /// Whether the ball can collide with this brick.
    ///
    /// Inactive bricks and bricks mid-destruction are transparent.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.active && self.destroyed_at.is_none()
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.position.truncate()
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.position.x - self.width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.position.x + self.width / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.position.y + self.height / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y - self.height / 2.0
    }

    #[inline]
    pub fn min_dimension(&self) -> f32 {
        self.width.min(self.height)
    }
}

/// The player's paddle: a horizontal center and a width.
///
/// Its vertical placement and thickness are fixed by the [`ArenaConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    pub width: f32,
}

impl Paddle {
    pub fn new(x: f32, width: f32) -> Self {
        Self { x, width }
    }

    /// Paddle at `x` with the arena's default width
    pub fn centered_at(x: f32, arena: &ArenaConfig) -> Self {
        Self::new(x, arena.paddle_width)
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x - self.half_width()
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.half_width()
    }
}

/// Ball lifecycle: `Unlaunched -> Moving -> {Moving, Stuck, Lost}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    /// Resting on the paddle, waiting for launch input
    Unlaunched,
    /// Free-moving; the only state the integrator advances
    Moving,
    /// Caught by a sticky paddle at `offset` from its center
    Stuck { offset: f32, speed: f32 },
    /// Fell through the bottom; terminal for this life
    Lost,
}

/// A ball record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Position,
    pub vel: Velocity,
    pub state: BallState,
}

impl Ball {
    pub fn new(id: u32, pos: Position) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            state: BallState::Unlaunched,
        }
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.state == BallState::Moving
    }

    #[inline]
    pub fn is_lost(&self) -> bool {
        self.state == BallState::Lost
    }

    /// Keep a waiting or stuck ball glued to the paddle
    pub fn follow_paddle(&mut self, paddle: &Paddle, arena: &ArenaConfig) {
        match self.state {
            BallState::Unlaunched => {
                self.pos = Vec2::new(paddle.x, arena.rest_y());
            }
            BallState::Stuck { offset, .. } => {
                self.pos = Vec2::new(paddle.x + offset, arena.bounce_y());
            }
            BallState::Moving | BallState::Lost => {}
        }
    }
}

/// All balls in play, ordered by id, plus the seeded launch RNG
#[derive(Debug, Clone)]
pub struct BallSet {
    balls: Vec<Ball>,
    rng: Pcg32,
    next_id: u32,
}

impl BallSet {
    /// One unlaunched ball resting on the paddle
    pub fn new(seed: u64, paddle: &Paddle, arena: &ArenaConfig) -> Self {
        let mut set = Self {
            balls: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        set.spawn_unlaunched(paddle, arena);
        set
    }

    /// Drop every ball and put a fresh one on the paddle (new life)
    pub fn reset(&mut self, paddle: &Paddle, arena: &ArenaConfig) -> u32 {
        self.balls.clear();
        self.spawn_unlaunched(paddle, arena)
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn spawn_unlaunched(&mut self, paddle: &Paddle, arena: &ArenaConfig) -> u32 {
        let id = self.next_entity_id();
        let mut ball = Ball::new(id, Vec2::ZERO);
        ball.follow_paddle(paddle, arena);
        self.balls.push(ball);
        id
    }

    fn spawn_moving(&mut self, pos: Position, vel: Velocity) -> u32 {
        let id = self.next_entity_id();
        self.balls.push(Ball {
            id,
            pos,
            vel,
            state: BallState::Moving,
        });
        id
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    /// Mutable access for callers that reposition balls (level start, portals)
    pub fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    pub fn get(&self, id: u32) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Balls that are not lost
    pub fn active_count(&self) -> usize {
        self.balls.iter().filter(|b| !b.is_lost()).count()
    }

    /// True once no ball is left in play; the caller then takes a life
    pub fn all_lost(&self) -> bool {
        self.active_count() == 0
    }

    /// Forget lost balls
    pub fn clear_lost(&mut self) {
        self.balls.retain(|b| !b.is_lost());
    }

    /// Launch every unlaunched ball. Returns how many were launched.
    ///
    /// A still paddle gives the wide 60-120 degree spread; a moving paddle
    /// gives the narrow 75-105 degree spread with its motion folded in.
    pub fn launch(&mut self, speed: f32, paddle_velocity: f32, arena: &ArenaConfig) -> usize {
        let mut launched = 0;
        for ball in &mut self.balls {
            if ball.state != BallState::Unlaunched {
                continue;
            }
            ball.vel = if paddle_velocity.abs() <= f32::EPSILON {
                initial_velocity(speed, &mut self.rng)
            } else {
                launch_velocity(
                    speed,
                    paddle_velocity,
                    arena.launch_paddle_influence,
                    &mut self.rng,
                )
            };
            ball.state = BallState::Moving;
            launched += 1;
            log::debug!("Ball {} launched with velocity {:?}", ball.id, ball.vel);
        }
        launched
    }

    /// Release balls held by a sticky paddle. Returns how many were released.
    ///
    /// The release direction uses the paddle bounce model at the catch offset.
    pub fn release_stuck(&mut self, paddle: &Paddle, arena: &ArenaConfig) -> usize {
        let mut released = 0;
        for ball in &mut self.balls {
            if let BallState::Stuck { offset, speed } = ball.state {
                let hit = if paddle.half_width() > 0.0 {
                    (offset / paddle.half_width()).clamp(-1.0, 1.0)
                } else {
                    0.0
                };
                ball.pos = Vec2::new(paddle.x + offset, arena.bounce_y());
                ball.vel = paddle_bounce_velocity(hit, speed, arena.max_bounce_angle);
                ball.state = BallState::Moving;
                released += 1;
            }
        }
        released
    }

    /// Split a moving ball into three: the original plus two copies rotated
    /// by `+degrees` and `-degrees`. Returns the new ids.
    pub fn split(&mut self, id: u32, degrees: f32) -> Option<(u32, u32)> {
        let source = self.balls.iter().find(|b| b.id == id && b.is_moving())?;
        let (pos, vel) = (source.pos, source.vel);
        let a = self.spawn_moving(pos, rotate_velocity(vel, degrees));
        let b = self.spawn_moving(pos, rotate_velocity(vel, -degrees));
        log::debug!("Ball {id} split into {a} and {b}");
        Some((a, b))
    }

    /// Keep unlaunched and stuck balls on the paddle
    pub fn follow_paddle(&mut self, paddle: &Paddle, arena: &ArenaConfig) {
        for ball in &mut self.balls {
            ball.follow_paddle(paddle, arena);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ArenaConfig, Paddle) {
        let arena = ArenaConfig::default();
        let paddle = Paddle::centered_at(0.0, &arena);
        (arena, paddle)
    }

    #[test]
    fn test_brick_liveness() {
        let mut brick = Brick::new("0-0", 0.0, 0.0, 1.8, 0.6);
        assert!(brick.is_live());
        brick.destroyed_at = Some(1234.0);
        assert!(!brick.is_live());
        brick.destroyed_at = None;
        brick.active = false;
        assert!(!brick.is_live());
    }

    #[test]
    fn test_brick_edges() {
        let brick = Brick::new("b", 1.0, 2.0, 2.0, 1.0);
        assert_eq!(brick.left(), 0.0);
        assert_eq!(brick.right(), 2.0);
        assert_eq!(brick.top(), 2.5);
        assert_eq!(brick.bottom(), 1.5);
        assert_eq!(brick.min_dimension(), 1.0);
    }

    #[test]
    fn test_brick_deserializes_without_destroyed_at() {
        let json = r#"{"id":"2-3","position":[0.5,4.0,0.0],"width":1.8,"height":0.6,"active":true}"#;
        let brick: Brick = serde_json::from_str(json).expect("valid brick");
        assert_eq!(brick.id, "2-3");
        assert!(brick.is_live());
        assert_eq!(brick.center(), Vec2::new(0.5, 4.0));
    }

    #[test]
    fn test_new_set_has_resting_ball() {
        let (arena, paddle) = setup();
        let set = BallSet::new(7, &paddle, &arena);
        assert_eq!(set.len(), 1);
        let ball = &set.balls()[0];
        assert_eq!(ball.state, BallState::Unlaunched);
        assert_eq!(ball.pos, Vec2::new(0.0, arena.rest_y()));
    }

    #[test]
    fn test_launch_moves_unlaunched_balls_only() {
        let (arena, paddle) = setup();
        let mut set = BallSet::new(7, &paddle, &arena);
        assert_eq!(set.launch(0.15, 0.0, &arena), 1);
        assert!(set.balls()[0].is_moving());
        assert!(set.balls()[0].vel.y > 0.0);
        assert!((set.balls()[0].vel.length() - 0.15).abs() < 1e-5);
        // Second launch is a no-op
        assert_eq!(set.launch(0.15, 0.0, &arena), 0);
    }

    #[test]
    fn test_launch_is_deterministic_per_seed() {
        let (arena, paddle) = setup();
        let mut a = BallSet::new(99, &paddle, &arena);
        let mut b = BallSet::new(99, &paddle, &arena);
        a.launch(0.2, 0.3, &arena);
        b.launch(0.2, 0.3, &arena);
        assert_eq!(a.balls()[0].vel, b.balls()[0].vel);
    }

    #[test]
    fn test_split_spawns_two_rotated_balls() {
        let (arena, paddle) = setup();
        let mut set = BallSet::new(1, &paddle, &arena);
        set.launch(0.15, 0.0, &arena);
        let source = set.balls()[0].clone();

        let (a, b) = set.split(source.id, 30.0).expect("moving ball splits");
        assert_eq!(set.len(), 3);
        let ball_a = set.get(a).expect("spawned");
        let ball_b = set.get(b).expect("spawned");
        assert_eq!(ball_a.pos, source.pos);
        assert!((ball_a.vel.length() - source.vel.length()).abs() < 1e-6);
        assert!((ball_a.vel.angle_to(source.vel).abs() - 30f32.to_radians()).abs() < 1e-4);
        assert!((ball_b.vel.angle_to(source.vel).abs() - 30f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn test_split_requires_moving_ball() {
        let (arena, paddle) = setup();
        let mut set = BallSet::new(1, &paddle, &arena);
        let id = set.balls()[0].id;
        assert!(set.split(id, 30.0).is_none());
        assert!(set.split(999, 30.0).is_none());
    }

    #[test]
    fn test_release_stuck_bounces_up_at_offset() {
        let (arena, paddle) = setup();
        let mut set = BallSet::new(1, &paddle, &arena);
        set.balls_mut()[0].state = BallState::Stuck {
            offset: -paddle.half_width(),
            speed: 0.2,
        };
        assert_eq!(set.release_stuck(&paddle, &arena), 1);
        let ball = &set.balls()[0];
        assert!(ball.is_moving());
        assert!(ball.vel.x < 0.0, "Left edge release should angle left");
        assert!(ball.vel.y > 0.0);
        assert!((ball.vel.length() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_follow_paddle_tracks_stuck_offset() {
        let (arena, _) = setup();
        let mut ball = Ball::new(1, Vec2::ZERO);
        ball.state = BallState::Stuck {
            offset: 0.5,
            speed: 0.15,
        };
        ball.follow_paddle(&Paddle::centered_at(3.0, &arena), &arena);
        assert_eq!(ball.pos, Vec2::new(3.5, arena.bounce_y()));
    }

    #[test]
    fn test_all_lost_and_reset() {
        let (arena, paddle) = setup();
        let mut set = BallSet::new(1, &paddle, &arena);
        set.balls_mut()[0].state = BallState::Lost;
        assert!(set.all_lost());
        set.clear_lost();
        assert!(set.is_empty());
        let id = set.reset(&paddle, &arena);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(id).map(|b| b.state), Some(BallState::Unlaunched));
    }
}
