//! Substep integrator
//!
//! Advances balls one tick at a time. A tick's displacement is split into
//! substeps no longer than the thinnest brick, so a fast ball cannot jump
//! clean over one. Walls, paddle and bricks are re-checked after every
//! substep.

use glam::Vec2;

use super::collision::{CollisionReport, check_all_filtered};
use super::state::{BallSet, BallState, Brick, Paddle};
use crate::events::{CollisionEvent, EventSink};
use crate::settings::ArenaConfig;
use crate::{Position, Velocity};

/// Input commands for a single tick of the ball set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Paddle placement for this tick
    pub paddle: Paddle,
    /// Multiplier on the per-tick displacement (1.0 at the nominal rate)
    pub dt_scale: f32,
    /// Sticky paddle effect: a ball touching the paddle is caught
    pub sticky: bool,
}

impl TickInput {
    pub fn new(paddle: Paddle) -> Self {
        Self {
            paddle,
            dt_scale: 1.0,
            sticky: false,
        }
    }
}

/// Collisions that fired during one substep
#[derive(Debug, Clone, PartialEq)]
pub struct SubstepEvent {
    /// Zero-based substep index within the tick
    pub substep: u32,
    pub report: CollisionReport,
}

/// Outcome of advancing one ball through one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub position: Position,
    pub velocity: Velocity,
    /// Substeps planned for this tick
    pub substeps: u32,
    /// Substeps actually run before the tick ended or halted
    pub substeps_run: u32,
    pub hit_wall: bool,
    pub hit_paddle: bool,
    /// Ball left through the bottom; remaining substeps were skipped
    pub lost: bool,
    /// The halt hook stopped the tick early
    pub halted: bool,
    /// Set when the tick halted on a paddle contact: offset from paddle center
    pub stuck_offset: Option<f32>,
    /// Bricks struck this tick, in the order they were hit
    pub hit_brick_ids: Vec<String>,
    /// Substeps in which anything fired
    pub events: Vec<SubstepEvent>,
}

impl TickReport {
    /// Emit this tick's events for `ball_id`, in substep order
    pub fn dispatch<S: EventSink + ?Sized>(&self, ball_id: u32, sink: &mut S) {
        for event in &self.events {
            let step = &event.report;
            if step.hit_wall {
                sink.emit(CollisionEvent::WallHit { ball_id });
            }
            if step.hit_paddle {
                sink.emit(CollisionEvent::PaddleHit { ball_id });
            }
            for id in &step.hit_brick_ids {
                sink.emit(CollisionEvent::BrickHit {
                    ball_id,
                    brick_id: id.clone(),
                });
            }
            if step.hit_bottom {
                sink.emit(CollisionEvent::BallLost { ball_id });
            }
        }
        if self.stuck_offset.is_some() {
            sink.emit(CollisionEvent::BallStuck { ball_id });
        }
    }
}

/// Number of substeps needed to move `speed` without skipping an obstacle
/// of size `min_obstacle_dimension`
///
/// Always at least 1 and at most `max_substeps` (itself treated as at least
/// 1). Non-positive or NaN inputs give 1. Fractions round up.
pub fn calculate_substeps(speed: f32, min_obstacle_dimension: f32, max_substeps: u32) -> u32 {
    if speed.is_nan()
        || min_obstacle_dimension.is_nan()
        || speed <= 0.0
        || min_obstacle_dimension <= 0.0
    {
        return 1;
    }
    let max = max_substeps.max(1);
    let required = (speed / min_obstacle_dimension).ceil();
    if required >= max as f32 {
        max
    } else {
        (required as u32).max(1)
    }
}

/// Smallest dimension among live bricks, or the arena's default brick size
/// when none are live
pub fn min_obstacle_dimension(bricks: &[Brick], arena: &ArenaConfig) -> f32 {
    bricks
        .iter()
        .filter(|b| b.is_live())
        .map(Brick::min_dimension)
        .filter(|d| *d > 0.0)
        .reduce(f32::min)
        .unwrap_or_else(|| arena.min_brick_dimension())
}

/// Advance one ball through one tick
///
/// With `sticky` set, the tick halts on the first paddle contact and the
/// report carries the catch offset.
#[allow(clippy::too_many_arguments)]
pub fn advance(
    position: Position,
    velocity: Velocity,
    paddle: &Paddle,
    bricks: &[Brick],
    dt_scale: f32,
    arena: &ArenaConfig,
    sticky: bool,
) -> TickReport {
    advance_with(position, velocity, paddle, bricks, dt_scale, arena, |step| {
        sticky && step.hit_paddle
    })
}

/// Advance one ball through one tick, asking `halt` after every substep
/// whether to freeze the ball for the rest of the tick
///
/// A brick struck in an earlier substep is ignored for the rest of the tick;
/// the caller is about to destroy it.
#[allow(clippy::too_many_arguments)]
pub fn advance_with<F>(
    position: Position,
    velocity: Velocity,
    paddle: &Paddle,
    bricks: &[Brick],
    dt_scale: f32,
    arena: &ArenaConfig,
    mut halt: F,
) -> TickReport
where
    F: FnMut(&CollisionReport) -> bool,
{
    let dt_scale = if dt_scale.is_finite() && dt_scale > 0.0 {
        dt_scale
    } else {
        0.0
    };

    let min_dimension = min_obstacle_dimension(bricks, arena);
    let travel = velocity.length() * dt_scale;
    let substeps = calculate_substeps(travel, min_dimension, arena.max_substeps);
    if substeps == arena.max_substeps && travel > min_dimension * substeps as f32 {
        log::debug!(
            "Substeps capped at {} (travel {:.3}, thinnest brick {:.3})",
            substeps,
            travel,
            min_dimension
        );
    }
    let step_scale = dt_scale / substeps as f32;

    let mut report = TickReport {
        position,
        velocity,
        substeps,
        ..Default::default()
    };
    let mut step = CollisionReport::default();

    for i in 0..substeps {
        report.position += report.velocity * step_scale;

        let struck = &report.hit_brick_ids;
        check_all_filtered(
            report.position,
            report.velocity,
            paddle,
            bricks,
            arena,
            |b| struck.contains(&b.id),
            &mut step,
        );

        report.substeps_run = i + 1;
        report.velocity = step.velocity;
        report.hit_wall |= step.hit_wall;
        report.hit_paddle |= step.hit_paddle;
        if let Some(corrected) = step.corrected_position {
            report.position = corrected;
        }
        report.hit_brick_ids.extend(step.hit_brick_ids.iter().cloned());

        if step.any() {
            log::trace!(
                "Substep {}/{}: wall={} paddle={} bottom={} bricks={:?}",
                i + 1,
                substeps,
                step.hit_wall,
                step.hit_paddle,
                step.hit_bottom,
                step.hit_brick_ids
            );
            report.events.push(SubstepEvent {
                substep: i,
                report: step.clone(),
            });
        }

        if step.hit_bottom {
            report.lost = true;
            break;
        }

        if halt(&step) {
            report.halted = true;
            if step.hit_paddle {
                report.stuck_offset = Some(report.position.x - paddle.x);
            }
            break;
        }
    }

    report
}

/// Everything that happened to the ball set in one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Per-ball results for every ball that moved, by ball id
    pub balls: Vec<(u32, TickReport)>,
    /// Bricks struck by any ball, each listed once
    pub hit_brick_ids: Vec<String>,
    /// Balls that fell out this tick
    pub lost_balls: Vec<u32>,
    /// Balls caught by a sticky paddle this tick
    pub stuck_balls: Vec<u32>,
}

impl FrameReport {
    pub fn hit_wall(&self) -> bool {
        self.balls.iter().any(|(_, r)| r.hit_wall)
    }

    pub fn hit_paddle(&self) -> bool {
        self.balls.iter().any(|(_, r)| r.hit_paddle)
    }

    /// Feed every event of the tick to `sink`, ball by ball
    pub fn dispatch<S: EventSink + ?Sized>(&self, sink: &mut S) {
        for (ball_id, report) in &self.balls {
            report.dispatch(*ball_id, sink);
        }
    }
}

/// Advance every ball in the set by one tick
///
/// Unlaunched and stuck balls ride along with the paddle; lost balls stay
/// put. Moving balls are integrated independently against the same brick
/// snapshot.
pub fn tick(
    balls: &mut BallSet,
    input: &TickInput,
    bricks: &[Brick],
    arena: &ArenaConfig,
) -> FrameReport {
    let mut frame = FrameReport::default();

    for ball in balls.balls_mut() {
        match ball.state {
            BallState::Unlaunched | BallState::Stuck { .. } => {
                ball.follow_paddle(&input.paddle, arena);
                continue;
            }
            BallState::Lost => continue,
            BallState::Moving => {}
        }

        let report = advance(
            ball.pos,
            ball.vel,
            &input.paddle,
            bricks,
            input.dt_scale,
            arena,
            input.sticky,
        );

        ball.pos = report.position;
        ball.vel = report.velocity;

        if report.lost {
            ball.state = BallState::Lost;
            frame.lost_balls.push(ball.id);
            log::info!("Ball {} lost at x={:.2}", ball.id, ball.pos.x);
        } else if let Some(offset) = report.stuck_offset {
            ball.state = BallState::Stuck {
                offset,
                speed: report.velocity.length(),
            };
            ball.vel = Vec2::ZERO;
            frame.stuck_balls.push(ball.id);
        }

        for id in &report.hit_brick_ids {
            if !frame.hit_brick_ids.contains(id) {
                frame.hit_brick_ids.push(id.clone());
            }
        }
        frame.balls.push((ball.id, report));
    }

    if !frame.hit_brick_ids.is_empty() || !frame.lost_balls.is_empty() {
        log::debug!(
            "Tick: {} brick(s) struck, {} ball(s) lost, {} in play",
            frame.hit_brick_ids.len(),
            frame.lost_balls.len(),
            balls.active_count()
        );
    }

    frame
}
