//! Core configuration for sprig-skeleton-core.

use serde::{Deserialize, Serialize};

/// Per-actor sizing hints and construction toggles.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial capacity of the user-data crossing buffer.
    pub scratch_events: usize,
    /// Instantiate the colliders declared on bones when an actor is built.
    pub instantiate_colliders: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scratch_events: 64,
            instantiate_colliders: true,
        }
    }
}

/// Parameters of [`Actor::play`](crate::actor::Actor::play).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayOptions {
    pub start_frame: f32,
    pub looping: bool,
    /// Multiplier on the animation's own frame rate. Negative plays in reverse.
    pub speed: f32,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            start_frame: 0.0,
            looping: true,
            speed: 1.0,
        }
    }
}
