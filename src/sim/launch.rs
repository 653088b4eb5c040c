//! Launch velocities
//!
//! Randomized near-vertical launch directions, drawn from a caller-supplied
//! RNG so seeded runs stay reproducible.

use glam::Vec2;
use rand::Rng;

use crate::{Velocity, normalize_velocity};

/// Launch with a uniform angle in [60°, 120°] from horizontal
///
/// The result has magnitude `speed` and a strictly positive y for
/// `speed > 0`. Zero or negative speed gives `(0, 0)`.
pub fn initial_velocity<R: Rng>(speed: f32, rng: &mut R) -> Velocity {
    if speed.is_nan() || speed <= 0.0 {
        return Vec2::ZERO;
    }
    let angle = rng.random_range(60.0f32..=120.0).to_radians();
    Vec2::new(angle.cos() * speed, angle.sin() * speed)
}

/// Launch with a narrower [75°, 105°] spread plus paddle motion
///
/// `paddle_velocity * influence` is added to x, then the vector is rescaled
/// to `speed`. The y component is left positive, so the ball always leaves
/// upward.
pub fn launch_velocity<R: Rng>(
    speed: f32,
    paddle_velocity: f32,
    influence: f32,
    rng: &mut R,
) -> Velocity {
    if speed.is_nan() || speed <= 0.0 {
        return Vec2::ZERO;
    }
    let angle = rng.random_range(75.0f32..=105.0).to_radians();
    let nudged = Vec2::new(
        angle.cos() * speed + paddle_velocity * influence,
        angle.sin() * speed,
    );
    normalize_velocity(nudged, speed)
}
