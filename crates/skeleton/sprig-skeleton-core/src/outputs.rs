//! Output contracts from the playback controller.
//!
//! Outputs carry the semantic events produced during one tick. Pose data is
//! not copied here; hosts read postures straight from the actor.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::value::UserData;

/// Discrete signals emitted by an actor.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub enum ActorEvent {
    PlaybackStarted {
        animation: String,
        frame: f32,
    },
    PlaybackPaused,
    PlaybackResumed,
    PlaybackStopped,
    /// Non-looping playback reached its terminal frame.
    PlaybackEnded {
        animation: String,
        frame: f32,
    },
    /// A user-data key was crossed.
    UserData {
        bone: usize,
        frame: f32,
        data: Arc<UserData>,
    },
}

/// Outputs returned by `Actor::update()`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<ActorEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: ActorEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// User-data events of this tick, in dispatch order.
    pub fn user_data(&self) -> impl Iterator<Item = (usize, f32, &UserData)> {
        self.events.iter().filter_map(|e| match e {
            ActorEvent::UserData { bone, frame, data } => Some((*bone, *frame, data.as_ref())),
            _ => None,
        })
    }

    pub fn ended(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, ActorEvent::PlaybackEnded { .. }))
    }
}
