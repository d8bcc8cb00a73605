//! Opaque effect units driven alongside playback.

use glam::Affine2;
use log::debug;

use crate::posture::Posture;
use crate::skeleton::Skeleton;

/// A visual effect owned by the host (particles and the like). The actor only
/// drives its lifecycle and clock.
pub trait EffectUnit {
    fn start(&mut self);
    fn stop(&mut self);
    fn pause(&mut self);
    /// Advance by `dt` seconds, anchored to the bone's composed posture.
    fn update(&mut self, dt: f32, anchor: &Posture);
    /// Visit the world transform of every live element.
    fn traverse(&self, visit: &mut dyn FnMut(&Affine2));
}

struct Binding {
    bone: usize,
    unit: Box<dyn EffectUnit>,
}

/// Effect units bound to bones of one actor.
#[derive(Default)]
pub struct EffectSet {
    bindings: Vec<Binding>,
}

impl std::fmt::Debug for EffectSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.bindings.iter().map(|b| b.bone))
            .finish()
    }
}

impl EffectSet {
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub(crate) fn bind(&mut self, bone: usize, unit: Box<dyn EffectUnit>) {
        debug!("effect unit bound to bone {bone}");
        self.bindings.push(Binding { bone, unit });
    }

    pub(crate) fn start_all(&mut self) {
        self.bindings.iter_mut().for_each(|b| b.unit.start());
    }

    pub(crate) fn pause_all(&mut self) {
        self.bindings.iter_mut().for_each(|b| b.unit.pause());
    }

    pub(crate) fn stop_all(&mut self) {
        self.bindings.iter_mut().for_each(|b| b.unit.stop());
    }

    /// Advance every unit whose bone is visible. The bone's effect op scales
    /// the unit's clock.
    pub(crate) fn update(&mut self, dt: f32, skeleton: &Skeleton) {
        for binding in &mut self.bindings {
            let Some(anchor) = skeleton.composed(binding.bone) else {
                continue;
            };
            if !anchor.is_visible() {
                continue;
            }
            let speed = anchor.effect_op().map_or(1.0, |op| op.speed);
            binding.unit.update(dt * speed, anchor);
        }
    }

    pub fn traverse(&self, visit: &mut dyn FnMut(&Affine2)) {
        for binding in &self.bindings {
            binding.unit.traverse(visit);
        }
    }
}
