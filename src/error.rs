//! Configuration error types
//!
//! The collision kernel itself never fails; degenerate inputs resolve to safe
//! defaults. Only loading an [`ArenaConfig`](crate::ArenaConfig) can fail.

use std::fmt;

/// Error raised while loading or validating an arena configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io(std::io::Error),
    /// The configuration text is not valid JSON for an arena.
    Parse(serde_json::Error),
    /// A dimension is zero, negative or not finite.
    InvalidDimension {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: f32,
    },
    /// `max_substeps` must allow at least one substep.
    ZeroSubsteps,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read arena config: {e}"),
            Self::Parse(e) => write!(f, "failed to parse arena config: {e}"),
            Self::InvalidDimension { field, value } => {
                write!(f, "invalid arena dimension {field}={value}")
            }
            Self::ZeroSubsteps => write!(f, "max_substeps must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
