//! Scratch buffers reused across ticks.

use crate::config::Config;

/// A user-data key crossed during one tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Crossing {
    /// Frames travelled from the tick's start position to the key.
    pub distance: f32,
    pub bone: usize,
    pub key: usize,
}

#[derive(Debug, Default)]
pub struct Scratch {
    pub crossings: Vec<Crossing>,
    pub draw_order: Vec<usize>,
}

impl Scratch {
    pub fn new(cfg: &Config, bones: usize) -> Self {
        Self {
            crossings: Vec::with_capacity(cfg.scratch_events),
            draw_order: Vec::with_capacity(bones),
        }
    }

    #[inline]
    pub fn begin_tick(&mut self) {
        self.crossings.clear();
    }
}
