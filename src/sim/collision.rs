//! Collision detection and response
//!
//! Walls, paddle and bricks are all axis-aligned, so every response is a sign
//! flip of one velocity component or the paddle's angle remap. Both preserve
//! speed.

use glam::Vec2;

use super::state::{Brick, Paddle};
use crate::settings::ArenaConfig;
use crate::{Position, Velocity};

/// Result of a wall check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallCollision {
    pub velocity: Velocity,
    /// A side or top wall reflected the ball
    pub hit_wall: bool,
    /// The ball left through the bottom (lost)
    pub hit_bottom: bool,
}

/// Result of a paddle check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleCollision {
    pub collided: bool,
    pub velocity: Velocity,
}

/// Which velocity component a brick hit flips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitAxis {
    /// Hit on a left/right face
    X,
    /// Hit on a top/bottom face
    Y,
}

impl HitAxis {
    /// Reflect `velocity` along this axis
    #[inline]
    pub fn apply(self, velocity: Velocity) -> Velocity {
        match self {
            HitAxis::X => Vec2::new(-velocity.x, velocity.y),
            HitAxis::Y => Vec2::new(velocity.x, -velocity.y),
        }
    }
}

/// Result of checking the ball against every brick
#[derive(Debug, Clone, PartialEq)]
pub struct BrickCollision {
    pub collided: bool,
    pub velocity: Velocity,
    /// Every brick the ball overlapped, in input order
    pub hit_brick_ids: Vec<String>,
}

/// Combined result of wall, paddle and brick checks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    pub velocity: Velocity,
    pub hit_wall: bool,
    pub hit_bottom: bool,
    pub hit_paddle: bool,
    pub hit_brick_ids: Vec<String>,
    /// Set after a paddle bounce: ball lifted clear of the paddle
    pub corrected_position: Option<Position>,
}

impl CollisionReport {
    /// Whether anything fired
    pub fn any(&self) -> bool {
        self.hit_wall || self.hit_bottom || self.hit_paddle || !self.hit_brick_ids.is_empty()
    }
}

/// Check the ball against the side walls, the top wall and the loss line
///
/// Only an axis that is out of bounds and still moving outward is reflected,
/// so a ball already heading back in is never pulled back out.
pub fn check_wall_collision(
    position: Position,
    velocity: Velocity,
    arena: &ArenaConfig,
) -> WallCollision {
    let mut new_velocity = velocity;
    let mut hit_wall = false;

    let min_x = -arena.width / 2.0 + arena.ball_radius;
    let max_x = arena.width / 2.0 - arena.ball_radius;
    let max_y = arena.height / 2.0 - arena.ball_radius;
    let min_y = -arena.height / 2.0 - arena.ball_radius;

    // Left wall
    if position.x <= min_x && velocity.x < 0.0 {
        new_velocity.x = velocity.x.abs();
        hit_wall = true;
    }

    // Right wall
    if position.x >= max_x && velocity.x > 0.0 {
        new_velocity.x = -velocity.x.abs();
        hit_wall = true;
    }

    // Top wall
    if position.y >= max_y && velocity.y > 0.0 {
        new_velocity.y = -velocity.y.abs();
        hit_wall = true;
    }

    // Bottom - ball lost, no reflection
    let hit_bottom = position.y <= min_y;

    WallCollision {
        velocity: new_velocity,
        hit_wall,
        hit_bottom,
    }
}

/// Bounce velocity for a paddle hit at `hit_position` in [-1, 1]
///
/// Center hits go straight up, edge hits leave up to `max_angle` off
/// vertical. Magnitude is exactly `speed` since sin² + cos² = 1.
#[inline]
pub fn paddle_bounce_velocity(hit_position: f32, speed: f32, max_angle: f32) -> Velocity {
    let angle = hit_position * max_angle;
    Vec2::new(angle.sin() * speed, (angle.cos() * speed).abs())
}

/// Check the ball against the paddle
///
/// Fires only for a downward-moving ball whose bounding box overlaps the
/// paddle rectangle.
pub fn check_paddle_collision(
    position: Position,
    velocity: Velocity,
    paddle: &Paddle,
    arena: &ArenaConfig,
) -> PaddleCollision {
    let r = arena.ball_radius;

    if velocity.y < 0.0
        && position.y - r <= arena.paddle_top()
        && position.y + r >= arena.paddle_bottom()
        && position.x + r >= paddle.left()
        && position.x - r <= paddle.right()
    {
        // -1 (left edge) .. 1 (right edge)
        let hit_position = if paddle.half_width() > 0.0 {
            ((position.x - paddle.x) / paddle.half_width()).clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let speed = velocity.length();
        return PaddleCollision {
            collided: true,
            velocity: paddle_bounce_velocity(hit_position, speed, arena.max_bounce_angle),
        };
    }

    PaddleCollision {
        collided: false,
        velocity,
    }
}

/// Circle-vs-rectangle test against a single brick
///
/// Returns the axis to reflect, or `None` on a miss. Transparent bricks
/// (inactive or mid-destruction) always miss. The axis is the one with the
/// shallower penetration; ties go to Y.
pub fn check_brick(position: Position, brick: &Brick, arena: &ArenaConfig) -> Option<HitAxis> {
    if !brick.is_live() {
        return None;
    }

    let r = arena.ball_radius;
    let (left, right) = (brick.left(), brick.right());
    let (bottom, top) = (brick.bottom(), brick.top());

    // Closest point on the brick to the ball center
    let closest = Vec2::new(
        position.x.clamp(left, right),
        position.y.clamp(bottom, top),
    );
    if position.distance_squared(closest) >= r * r {
        return None;
    }

    let overlap_left = position.x + r - left;
    let overlap_right = right - (position.x - r);
    let overlap_top = top - (position.y - r);
    let overlap_bottom = position.y + r - bottom;

    let min_overlap_x = overlap_left.min(overlap_right);
    let min_overlap_y = overlap_top.min(overlap_bottom);

    if min_overlap_x < min_overlap_y {
        Some(HitAxis::X)
    } else {
        Some(HitAxis::Y)
    }
}

/// Test every brick against the incoming velocity and OR-combine the axes.
///
/// Each axis flips at most once no matter how many bricks asked for it.
/// Struck ids are appended to `hit_ids`.
fn collide_bricks<'a>(
    position: Position,
    velocity: Velocity,
    bricks: impl IntoIterator<Item = &'a Brick>,
    arena: &ArenaConfig,
    hit_ids: &mut Vec<String>,
) -> Velocity {
    let mut flip_x = false;
    let mut flip_y = false;

    for brick in bricks {
        match check_brick(position, brick, arena) {
            Some(HitAxis::X) => flip_x = true,
            Some(HitAxis::Y) => flip_y = true,
            None => continue,
        }
        hit_ids.push(brick.id.clone());
    }

    let mut new_velocity = velocity;
    if flip_x {
        new_velocity = HitAxis::X.apply(new_velocity);
    }
    if flip_y {
        new_velocity = HitAxis::Y.apply(new_velocity);
    }
    new_velocity
}

/// Check the ball against every live brick in one pass
pub fn check_brick_collisions(
    position: Position,
    velocity: Velocity,
    bricks: &[Brick],
    arena: &ArenaConfig,
) -> BrickCollision {
    let mut hit_brick_ids = Vec::new();
    let new_velocity = collide_bricks(position, velocity, bricks, arena, &mut hit_brick_ids);
    BrickCollision {
        collided: !hit_brick_ids.is_empty(),
        velocity: new_velocity,
        hit_brick_ids,
    }
}

/// Run wall, paddle and brick checks in that order, each seeing the velocity
/// produced by the previous one
///
/// A bottom-out ends the check after the walls: the paddle and bricks are
/// not tested for a lost ball.
pub fn check_all_collisions(
    position: Position,
    velocity: Velocity,
    paddle: &Paddle,
    bricks: &[Brick],
    arena: &ArenaConfig,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    check_all_collisions_into(position, velocity, paddle, bricks, arena, &mut report);
    report
}

/// [`check_all_collisions`] writing into a caller-owned report, reusing its
/// id buffer across calls
pub fn check_all_collisions_into(
    position: Position,
    velocity: Velocity,
    paddle: &Paddle,
    bricks: &[Brick],
    arena: &ArenaConfig,
    out: &mut CollisionReport,
) {
    check_all_filtered(position, velocity, paddle, bricks, arena, |_| false, out);
}

/// Shared body of the combined check; bricks for which `skip` returns true
/// are treated as transparent.
pub(crate) fn check_all_filtered<F>(
    position: Position,
    velocity: Velocity,
    paddle: &Paddle,
    bricks: &[Brick],
    arena: &ArenaConfig,
    skip: F,
    out: &mut CollisionReport,
) where
    F: Fn(&Brick) -> bool,
{
    let wall = check_wall_collision(position, velocity, arena);
    out.hit_brick_ids.clear();

    // A lost ball is past everything else
    if wall.hit_bottom {
        out.velocity = wall.velocity;
        out.hit_wall = wall.hit_wall;
        out.hit_bottom = true;
        out.hit_paddle = false;
        out.corrected_position = None;
        return;
    }

    let paddle_hit = check_paddle_collision(position, wall.velocity, paddle, arena);
    let velocity = collide_bricks(
        position,
        paddle_hit.velocity,
        bricks.iter().filter(|b| !skip(b)),
        arena,
        &mut out.hit_brick_ids,
    );

    out.velocity = velocity;
    out.hit_wall = wall.hit_wall;
    out.hit_bottom = wall.hit_bottom;
    out.hit_paddle = paddle_hit.collided;
    out.corrected_position = paddle_hit
        .collided
        .then(|| Vec2::new(position.x, arena.bounce_y()));
}

/// First live brick overlapped by a laser bolt at `position`
pub fn check_laser_bricks<'a>(
    position: Position,
    bricks: &'a [Brick],
    arena: &ArenaConfig,
) -> Option<&'a Brick> {
    let half = arena.laser_half_extents;
    bricks.iter().filter(|b| b.is_live()).find(|b| {
        position.x + half.x >= b.left()
            && position.x - half.x <= b.right()
            && position.y + half.y >= b.bottom()
            && position.y - half.y <= b.top()
    })
}

/// Whether a falling pickup capsule at `position` touches the paddle
pub fn check_pickup_paddle(position: Position, paddle: &Paddle, arena: &ArenaConfig) -> bool {
    let half = arena.pickup_half_extents;
    position.y - half.y <= arena.paddle_top()
        && position.y + half.y >= arena.paddle_bottom()
        && position.x + half.x >= paddle.left()
        && position.x - half.x <= paddle.right()
}
