//! Collision events and the sink they are fed to
//!
//! The kernel itself never plays a sound or bumps a score. It records what
//! happened in each tick report, and a caller-chosen [`EventSink`] turns
//! that into side effects.

use std::fmt;

/// Something noteworthy that happened to a ball during a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollisionEvent {
    /// Ball bounced off a side or top wall
    WallHit { ball_id: u32 },
    /// Ball bounced off the paddle
    PaddleHit { ball_id: u32 },
    /// Ball struck a brick
    BrickHit { ball_id: u32, brick_id: String },
    /// Ball fell through the bottom
    BallLost { ball_id: u32 },
    /// Ball was caught by a sticky paddle
    BallStuck { ball_id: u32 },
}

impl CollisionEvent {
    pub fn ball_id(&self) -> u32 {
        match self {
            CollisionEvent::WallHit { ball_id }
            | CollisionEvent::PaddleHit { ball_id }
            | CollisionEvent::BrickHit { ball_id, .. }
            | CollisionEvent::BallLost { ball_id }
            | CollisionEvent::BallStuck { ball_id } => *ball_id,
        }
    }
}

impl fmt::Display for CollisionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionEvent::WallHit { ball_id } => write!(f, "ball {ball_id} hit a wall"),
            CollisionEvent::PaddleHit { ball_id } => write!(f, "ball {ball_id} hit the paddle"),
            CollisionEvent::BrickHit { ball_id, brick_id } => {
                write!(f, "ball {ball_id} hit brick {brick_id}")
            }
            CollisionEvent::BallLost { ball_id } => write!(f, "ball {ball_id} lost"),
            CollisionEvent::BallStuck { ball_id } => {
                write!(f, "ball {ball_id} stuck to the paddle")
            }
        }
    }
}

/// Receiver of collision events (audio, scoring, particles...)
pub trait EventSink {
    fn emit(&mut self, event: CollisionEvent);
}

/// Collects events in order, handy for tests and replays
impl EventSink for Vec<CollisionEvent> {
    fn emit(&mut self, event: CollisionEvent) {
        self.push(event);
    }
}

/// Writes every event to the `log` facade
#[derive(Debug, Clone, Copy)]
pub struct LogSink {
    level: log::Level,
    muted: bool,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(log::Level::Debug)
    }
}

impl LogSink {
    pub fn new(level: log::Level) -> Self {
        Self {
            level,
            muted: false,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: CollisionEvent) {
        if self.muted {
            return;
        }
        // Losing a ball matters more than a bounce
        let level = match event {
            CollisionEvent::BallLost { .. } => self.level.min(log::Level::Info),
            _ => self.level,
        };
        log::log!(level, "{event}");
    }
}
