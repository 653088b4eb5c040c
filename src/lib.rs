//! Brickfall - collision kernel for a ball, a paddle and a field of bricks
//!
//! Core modules:
//! - `sim`: Deterministic simulation (colliders, substep integrator, ball set)
//! - `settings`: Arena configuration, loadable from JSON
//! - `events`: Side-effect port driven by tick reports
//! - `error`: Configuration errors

pub mod error;
pub mod events;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use events::{CollisionEvent, EventSink, LogSink};
pub use settings::ArenaConfig;

use glam::Vec2;

/// Ball center in arena-local coordinates (origin at arena center)
pub type Position = Vec2;

/// Per-tick displacement of the ball; its length is the ball speed
pub type Velocity = Vec2;

/// Default arena constants
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 16.0;
    pub const ARENA_HEIGHT: f32 = 20.0;

    /// Paddle defaults - paddle sits one unit above the bottom edge
    pub const PADDLE_WIDTH: f32 = 2.5;
    pub const PADDLE_HEIGHT: f32 = 0.4;
    pub const PADDLE_Y: f32 = -ARENA_HEIGHT / 2.0 + 1.0;
    /// Gap left between paddle top and ball after a bounce
    pub const PADDLE_PUSH: f32 = 0.05;
    /// Gap between paddle top and a ball resting on it before launch
    pub const PADDLE_REST_OFFSET: f32 = 0.1;
    /// Steepest paddle bounce, measured from vertical (60 degrees)
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.3;
    pub const BALL_SPEED: f32 = 0.15;

    /// Brick defaults
    pub const BRICK_WIDTH: f32 = 1.8;
    pub const BRICK_HEIGHT: f32 = 0.6;

    /// Maximum substeps per tick to bound work at extreme speeds
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Fraction of paddle velocity folded into a launch
    pub const LAUNCH_PADDLE_INFLUENCE: f32 = 0.5;

    /// Laser bolt half extents (x, y)
    pub const LASER_HALF_EXTENTS: (f32, f32) = (0.05, 0.25);
    /// Falling pickup capsule half extents (x, y)
    pub const PICKUP_HALF_EXTENTS: (f32, f32) = (0.4, 0.2);
}

/// Reflect a velocity off a surface with unit normal `normal`
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect(velocity: Velocity, normal: Vec2) -> Velocity {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Rescale a velocity to `speed`, keeping its direction
///
/// A zero velocity has no direction, so it becomes straight up.
#[inline]
pub fn normalize_velocity(velocity: Velocity, speed: f32) -> Velocity {
    let magnitude = velocity.length();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return Vec2::new(0.0, speed);
    }
    velocity / magnitude * speed
}

/// Rotate a velocity counter-clockwise by `degrees`
#[inline]
pub fn rotate_velocity(velocity: Velocity, degrees: f32) -> Velocity {
    Vec2::from_angle(degrees.to_radians()).rotate(velocity)
}
