//! Deterministic simulation module
//!
//! Everything the ball does lives here. This module must stay pure and
//! deterministic:
//! - Caller-driven ticks only
//! - Seeded RNG only
//! - Stable iteration order (bricks in input order, balls by id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod launch;
pub mod state;
pub mod tick;

pub use collision::{
    BrickCollision, CollisionReport, HitAxis, PaddleCollision, WallCollision, check_all_collisions,
    check_all_collisions_into, check_brick, check_brick_collisions, check_laser_bricks,
    check_paddle_collision, check_pickup_paddle, check_wall_collision, paddle_bounce_velocity,
};
pub use launch::{initial_velocity, launch_velocity};
pub use state::{Ball, BallSet, BallState, Brick, Paddle};
pub use tick::{
    FrameReport, SubstepEvent, TickInput, TickReport, advance, advance_with, calculate_substeps,
    min_obstacle_dimension, tick,
};
