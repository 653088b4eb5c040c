//! Arena configuration
//!
//! Every fixed dimension the colliders read lives here. Loaded from JSON;
//! missing fields fall back to the defaults in [`crate::consts`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Fixed geometry of the playfield, paddle, ball and bricks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    // === Arena ===
    /// Full arena width (walls at ±width/2)
    pub width: f32,
    /// Full arena height (top wall at +height/2, loss line below -height/2)
    pub height: f32,

    // === Ball ===
    pub ball_radius: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Vertical center of the paddle
    pub paddle_y: f32,
    /// Gap left above the paddle after a bounce
    pub paddle_push: f32,
    /// Gap above the paddle for a ball waiting to launch
    pub paddle_rest_offset: f32,
    /// Steepest bounce off the paddle edge, radians from vertical
    pub max_bounce_angle: f32,
    /// Fraction of paddle velocity added to a launch
    pub launch_paddle_influence: f32,

    // === Bricks ===
    /// Default brick width, used when a level has no live bricks
    pub brick_width: f32,
    /// Default brick height, used when a level has no live bricks
    pub brick_height: f32,

    // === Integrator ===
    /// Upper bound on substeps per tick
    pub max_substeps: u32,

    // === Auxiliary colliders ===
    pub laser_half_extents: Vec2,
    pub pickup_half_extents: Vec2,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,

            ball_radius: BALL_RADIUS,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_y: PADDLE_Y,
            paddle_push: PADDLE_PUSH,
            paddle_rest_offset: PADDLE_REST_OFFSET,
            max_bounce_angle: MAX_BOUNCE_ANGLE,
            launch_paddle_influence: LAUNCH_PADDLE_INFLUENCE,

            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,

            max_substeps: MAX_SUBSTEPS,

            laser_half_extents: Vec2::new(LASER_HALF_EXTENTS.0, LASER_HALF_EXTENTS.1),
            pickup_half_extents: Vec2::new(PICKUP_HALF_EXTENTS.0, PICKUP_HALF_EXTENTS.1),
        }
    }
}

impl ArenaConfig {
    /// Parse and validate a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::debug!("Loaded arena config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject dimensions the colliders cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("ball_radius", self.ball_radius),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("brick_width", self.brick_width),
            ("brick_height", self.brick_height),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidDimension { field, value });
            }
        }

        let finite = [
            ("paddle_y", self.paddle_y),
            ("paddle_push", self.paddle_push),
            ("paddle_rest_offset", self.paddle_rest_offset),
            ("max_bounce_angle", self.max_bounce_angle),
            ("launch_paddle_influence", self.launch_paddle_influence),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::InvalidDimension { field, value });
            }
        }

        if self.max_substeps == 0 {
            return Err(ConfigError::ZeroSubsteps);
        }
        Ok(())
    }

    /// Top edge of the paddle
    #[inline]
    pub fn paddle_top(&self) -> f32 {
        self.paddle_y + self.paddle_height / 2.0
    }

    /// Bottom edge of the paddle
    #[inline]
    pub fn paddle_bottom(&self) -> f32 {
        self.paddle_y - self.paddle_height / 2.0
    }

    /// Ball center height right after a paddle bounce
    #[inline]
    pub fn bounce_y(&self) -> f32 {
        self.paddle_top() + self.ball_radius + self.paddle_push
    }

    /// Ball center height while resting on the paddle
    #[inline]
    pub fn rest_y(&self) -> f32 {
        self.paddle_top() + self.ball_radius + self.paddle_rest_offset
    }

    /// Smallest default brick dimension
    #[inline]
    pub fn min_brick_dimension(&self) -> f32 {
        self.brick_width.min(self.brick_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paddle_edges() {
        let arena = ArenaConfig::default();
        assert!((arena.paddle_y - -9.0).abs() < 1e-6);
        assert!((arena.paddle_top() - -8.8).abs() < 1e-5);
        assert!((arena.paddle_bottom() - -9.2).abs() < 1e-5);
        assert!((arena.bounce_y() - (-8.8 + 0.3 + 0.05)).abs() < 1e-5);
    }

    #[test]
    fn test_min_brick_dimension() {
        let arena = ArenaConfig::default();
        assert_eq!(arena.min_brick_dimension(), BRICK_HEIGHT);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let arena = ArenaConfig::from_json_str(r#"{ "width": 24.0, "max_substeps": 12 }"#)
            .expect("valid config");
        assert_eq!(arena.width, 24.0);
        assert_eq!(arena.max_substeps, 12);
        assert_eq!(arena.height, ARENA_HEIGHT);
        assert_eq!(arena.ball_radius, BALL_RADIUS);
    }

    #[test]
    fn test_json_round_trip() {
        let arena = ArenaConfig::default();
        let json = arena.to_json().expect("serializable");
        assert_eq!(ArenaConfig::from_json_str(&json).expect("parses"), arena);
    }

    #[test]
    fn test_rejects_negative_radius() {
        let err = ArenaConfig::from_json_str(r#"{ "ball_radius": -0.3 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidDimension {
                field: "ball_radius",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_substeps() {
        let err = ArenaConfig::from_json_str(r#"{ "max_substeps": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroSubsteps));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = ArenaConfig::from_json_str("{ width: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ArenaConfig::from_json_file("/nonexistent/brickfall/arena.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
