//! Per-bone event triggers.
//!
//! A trigger is an optional callback slot owned by the pose engine and
//! invoked synchronously while a tick is being evaluated. Handlers cannot
//! reach back into the actor; state they need to share must be captured
//! (e.g. behind `Rc<RefCell<_>>`).

use crate::data::Interpolation;
use crate::posture::Posture;
use crate::value::UserData;

/// Time and interpolation of a key bracketing the evaluated frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeyInfo {
    pub frame: f32,
    pub interpolation: Interpolation,
}

/// Payload of the "calculated" trigger. The handler owns the bone's local
/// transform for this tick: it is not derived automatically while a
/// calculated handler is registered.
pub struct CalculatedEvent<'a> {
    pub bone: usize,
    pub posture: &'a mut Posture,
    /// Latest key at or before `current_frame` across the bone's curves.
    pub left: Option<KeyInfo>,
    /// Earliest key after `current_frame` across the bone's curves.
    pub right: Option<KeyInfo>,
    pub current_frame: f32,
    pub frame_count: u32,
}

/// A user-data key crossed while advancing a tick.
#[derive(Copy, Clone, Debug)]
pub struct UserDataEvent<'a> {
    pub bone: usize,
    /// Frame of the crossed key.
    pub frame: f32,
    pub data: &'a UserData,
}

type CalculatedFn = Box<dyn FnMut(&mut CalculatedEvent<'_>)>;
type UserDataFn = Box<dyn FnMut(&UserDataEvent<'_>)>;

/// Event registration handle for one bone.
#[derive(Default)]
pub struct EventTrigger {
    calculated: Option<CalculatedFn>,
    user_data: Option<UserDataFn>,
}

impl std::fmt::Debug for EventTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTrigger")
            .field("calculated", &self.calculated.is_some())
            .field("user_data", &self.user_data.is_some())
            .finish()
    }
}

impl EventTrigger {
    /// Register the calculated handler. While set, the bone's local transform
    /// must be written by the handler (see [`Posture::rebuild_transform`]).
    pub fn on_calculated<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&mut CalculatedEvent<'_>) + 'static,
    {
        self.calculated = Some(Box::new(f));
        self
    }

    pub fn on_user_data<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&UserDataEvent<'_>) + 'static,
    {
        self.user_data = Some(Box::new(f));
        self
    }

    pub fn clear(&mut self) {
        self.calculated = None;
        self.user_data = None;
    }

    #[inline]
    pub fn has_calculated(&self) -> bool {
        self.calculated.is_some()
    }

    /// Fire the calculated handler; returns false when none is registered.
    pub(crate) fn fire_calculated(&mut self, event: &mut CalculatedEvent<'_>) -> bool {
        match self.calculated.as_mut() {
            Some(f) => {
                f(event);
                true
            }
            None => false,
        }
    }

    pub(crate) fn fire_user_data(&mut self, event: &UserDataEvent<'_>) {
        if let Some(f) = self.user_data.as_mut() {
            f(event);
        }
    }
}
