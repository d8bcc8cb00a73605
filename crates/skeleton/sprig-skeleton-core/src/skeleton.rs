//! Pose engine: per-bone local evaluation and top-down composition.
//!
//! Owns two index-aligned posture arrays (local and composed) sized to the
//! bone count and rewritten in place every tick:
//! 1. local pass, in bone array order: reset defaults, sample curves, then
//!    either fire the bone's calculated trigger or derive the transform;
//! 2. composition pass, depth-first from the roots: parent x local transform,
//!    parent x local alpha, with local scale/alpha applied to the bone itself
//!    only after its children have composed.

use std::sync::Arc;

use glam::Affine2;
use log::{debug, trace};

use crate::animation::Animation;
use crate::attachment::{Attachment, BoundAttachment};
use crate::attribute::Attribute;
use crate::bone::BoneHierarchy;
use crate::config::Config;
use crate::events::{CalculatedEvent, EventTrigger, KeyInfo, UserDataEvent};
use crate::ids::AttachmentId;
use crate::math::scale_linear;
use crate::outputs::{ActorEvent, Outputs};
use crate::posture::Posture;
use crate::sampling::{bracket, sample_curve};
use crate::scratch::{Crossing, Scratch};
use crate::value::Value;

#[derive(Debug)]
pub struct Skeleton {
    hierarchy: Arc<BoneHierarchy>,
    local: Vec<Posture>,
    composed: Vec<Posture>,
    triggers: Vec<Option<EventTrigger>>,
    attachments: Vec<BoundAttachment>,
    scratch: Scratch,
}

impl Skeleton {
    pub fn new(hierarchy: Arc<BoneHierarchy>, cfg: &Config) -> Self {
        let n = hierarchy.len();
        let mut triggers = Vec::with_capacity(n);
        triggers.resize_with(n, || None);
        let mut skeleton = Self {
            local: vec![Posture::new(); n],
            composed: vec![Posture::new(); n],
            triggers,
            attachments: Vec::new(),
            scratch: Scratch::new(cfg, n),
            hierarchy,
        };
        skeleton.scratch.draw_order.extend(0..n);
        for (i, p) in skeleton.composed.iter_mut().enumerate() {
            p.sort_index = i;
        }
        skeleton
    }

    #[inline]
    pub fn hierarchy(&self) -> &Arc<BoneHierarchy> {
        &self.hierarchy
    }

    #[inline]
    pub fn bone_count(&self) -> usize {
        self.local.len()
    }

    #[inline]
    pub fn local(&self, bone: usize) -> Option<&Posture> {
        self.local.get(bone)
    }

    #[inline]
    pub fn composed(&self, bone: usize) -> Option<&Posture> {
        self.composed.get(bone)
    }

    #[inline]
    pub fn composed_postures(&self) -> &[Posture] {
        &self.composed
    }

    /// Bone indices sorted by draw priority, ties in bone order.
    #[inline]
    pub fn draw_order(&self) -> &[usize] {
        &self.scratch.draw_order
    }

    /// Composed transform of the named bone.
    pub fn bone_matrix(&self, name: &str) -> Option<Affine2> {
        let index = self.hierarchy.index_of(name)?;
        Some(self.composed[index].transform)
    }

    /// Event registration handle for a bone. With `create_if_missing` an empty
    /// handle is installed when none exists; otherwise a missing handle
    /// yields `None`.
    pub fn calculated(&mut self, bone: &str, create_if_missing: bool) -> Option<&mut EventTrigger> {
        let index = self.hierarchy.index_of(bone)?;
        let slot = &mut self.triggers[index];
        if slot.is_none() && create_if_missing {
            debug!("installing event trigger on bone '{bone}'");
            *slot = Some(EventTrigger::default());
        }
        slot.as_mut()
    }

    /// Drop the named bone's trigger. Returns whether one was installed.
    pub fn remove_trigger(&mut self, bone: &str) -> bool {
        match self.hierarchy.index_of(bone) {
            Some(index) => self.triggers[index].take().is_some(),
            None => false,
        }
    }

    pub(crate) fn attach(&mut self, id: AttachmentId, bone: usize, attachment: Attachment) {
        debug!(
            "attaching '{}' to bone '{}'",
            attachment.name, self.hierarchy.bones()[bone].name
        );
        let mut bound = BoundAttachment::new(id, bone, attachment);
        bound.follow(&self.composed[bone]);
        self.attachments.push(bound);
        self.local[bone].attachments.push(id);
        self.composed[bone].attachments.push(id);
    }

    pub(crate) fn detach(&mut self, id: AttachmentId) -> Option<Attachment> {
        let pos = self.attachments.iter().position(|a| a.id == id)?;
        let bound = self.attachments.remove(pos);
        self.local[bound.bone].attachments.retain(|a| *a != id);
        self.composed[bound.bone].attachments.retain(|a| *a != id);
        Some(bound.attachment)
    }

    pub fn attachment(&self, id: AttachmentId) -> Option<&BoundAttachment> {
        self.attachments.iter().find(|a| a.id == id)
    }

    pub fn attachment_mut(&mut self, id: AttachmentId) -> Option<&mut Attachment> {
        self.attachments
            .iter_mut()
            .find(|a| a.id == id)
            .map(|a| &mut a.attachment)
    }

    pub fn attachments(&self) -> impl Iterator<Item = &BoundAttachment> {
        self.attachments.iter()
    }

    /// Refresh both posture arrays for `frame` of `animation`. Bones the
    /// animation does not drive (or every bone, without an animation) keep
    /// their default attributes.
    pub fn update(&mut self, frame: f32, animation: Option<&Animation>, root: &Affine2) {
        trace!("pose update at frame {frame}");
        self.evaluate_locals(frame, animation);
        self.compose(root);
        self.sort_draw_order();
    }

    fn evaluate_locals(&mut self, frame: f32, animation: Option<&Animation>) {
        let frame_count = animation.map_or(0, |a| a.frame_count);
        for index in 0..self.local.len() {
            let bone = &self.hierarchy.bones()[index];
            let posture = &mut self.local[index];
            posture.reset_attributes();
            posture.blend_mode = bone.blend_mode.unwrap_or_default();

            let trigger = self.triggers[index]
                .as_mut()
                .filter(|t| t.has_calculated());
            let wants_keys = trigger.is_some();
            let mut left: Option<KeyInfo> = None;
            let mut right: Option<KeyInfo> = None;

            if let Some(curves) = animation.and_then(|a| a.bone_curves(index)) {
                for curve in &curves.curves {
                    let default = curve.attribute.default_value();
                    let value = sample_curve(&curve.keys, &default, frame, frame_count);
                    posture.set(curve.attribute, value);

                    if wants_keys {
                        let (l, r) = bracket(&curve.keys, frame);
                        if let Some(k) = l.map(|i| &curve.keys[i]) {
                            if left.map_or(true, |cur| k.time > cur.frame) {
                                left = Some(KeyInfo {
                                    frame: k.time,
                                    interpolation: k.interpolation,
                                });
                            }
                        }
                        if let Some(k) = r.map(|i| &curve.keys[i]) {
                            if right.map_or(true, |cur| k.time < cur.frame) {
                                right = Some(KeyInfo {
                                    frame: k.time,
                                    interpolation: k.interpolation,
                                });
                            }
                        }
                    }
                }
            }

            match trigger {
                Some(trigger) => {
                    let mut event = CalculatedEvent {
                        bone: index,
                        posture,
                        left,
                        right,
                        current_frame: frame,
                        frame_count,
                    };
                    trigger.fire_calculated(&mut event);
                }
                None => posture.rebuild_transform(),
            }
        }
    }

    fn compose(&mut self, root: &Affine2) {
        let hierarchy = Arc::clone(&self.hierarchy);
        for index in hierarchy.roots() {
            compose_bone(
                &hierarchy,
                &self.local,
                &mut self.composed,
                &mut self.attachments,
                index,
                root,
            );
        }
    }

    fn sort_draw_order(&mut self) {
        let order = &mut self.scratch.draw_order;
        let composed = &self.composed;
        order.clear();
        order.extend(0..composed.len());
        order.sort_unstable_by(|&a, &b| {
            composed[a]
                .priority()
                .total_cmp(&composed[b].priority())
                .then(a.cmp(&b))
        });
        for (position, &index) in self.scratch.draw_order.iter().enumerate() {
            self.composed[index].sort_index = position;
        }
    }

    /// Fire every user-data key crossed while moving `elapse` frames from
    /// `from`, in travel order. The window starts inclusive and ends
    /// exclusive in the direction of travel, so each key fires exactly once
    /// however many times the animation wraps in one tick. Non-looping
    /// playback includes the terminal frame it clamps to.
    pub fn dispatch_user_data(
        &mut self,
        animation: &Animation,
        from: f32,
        elapse: f32,
        looping: bool,
        outputs: &mut Outputs,
    ) {
        self.scratch.begin_tick();
        let crossings = &mut self.scratch.crossings;
        for_each_window(
            from,
            elapse,
            animation.frame_count as f32,
            looping,
            |window| {
                for (bone, curves) in animation.bones.iter().enumerate() {
                    let Some(curves) = curves else { continue };
                    for (key, k) in curves.user_data_keys().iter().enumerate() {
                        if window.contains(k.time) {
                            crossings.push(Crossing {
                                distance: window.distance_to(k.time),
                                bone,
                                key,
                            });
                        }
                    }
                }
            },
        );
        crossings.sort_unstable_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.bone.cmp(&b.bone))
                .then(a.key.cmp(&b.key))
        });

        for c in &self.scratch.crossings {
            let Some(curves) = animation.bone_curves(c.bone) else {
                continue;
            };
            let key = &curves.user_data_keys()[c.key];
            let Value::User(data) = &key.value else {
                continue;
            };
            trace!("user data crossed on bone {} at frame {}", c.bone, key.time);
            if let Some(trigger) = self.triggers[c.bone].as_mut() {
                trigger.fire_user_data(&UserDataEvent {
                    bone: c.bone,
                    frame: key.time,
                    data,
                });
            }
            outputs.push_event(ActorEvent::UserData {
                bone: c.bone,
                frame: key.time,
                data: Arc::clone(data),
            });
        }
    }
}

fn compose_bone(
    hierarchy: &BoneHierarchy,
    local: &[Posture],
    composed: &mut [Posture],
    attachments: &mut [BoundAttachment],
    index: usize,
    root: &Affine2,
) {
    let bone = &hierarchy.bones()[index];
    let src = &local[index];
    let (transform, alpha) = match bone.parent {
        None => (*root * src.transform, src.alpha()),
        Some(parent) => {
            let p = &composed[parent];
            (p.transform * src.transform, p.alpha() * src.alpha())
        }
    };

    let out = &mut composed[index];
    out.copy_attributes_from(src);
    out.transform = transform;
    out.set(Attribute::Alpha, Value::Number(alpha));

    for &child in &bone.children {
        compose_bone(hierarchy, local, composed, attachments, child, root);
    }

    let out = &mut composed[index];
    for id in &out.attachments {
        if let Some(bound) = attachments.iter_mut().find(|a| a.id == *id) {
            bound.follow(out);
        }
    }

    // Local-only adjustments: visible on this bone, never inherited.
    scale_linear(&mut out.transform, src.local_scale());
    if let Some(local_alpha) = src.local_alpha() {
        out.set(Attribute::Alpha, Value::Number(local_alpha));
    }
}

/// A span of frames crossed during one tick, within `[0, frame_count)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Window {
    pub lo: f32,
    pub hi: f32,
    pub include_lo: bool,
    pub include_hi: bool,
    pub forward: bool,
    /// Frames travelled before this window started.
    pub travelled: f32,
}

impl Window {
    #[inline]
    pub fn contains(&self, t: f32) -> bool {
        let above = t > self.lo || (self.include_lo && t == self.lo);
        let below = t < self.hi || (self.include_hi && t == self.hi);
        above && below
    }

    #[inline]
    pub fn distance_to(&self, t: f32) -> f32 {
        if self.forward {
            self.travelled + (t - self.lo)
        } else {
            self.travelled + (self.hi - t)
        }
    }
}

/// Full loops replayed for user-data dispatch within a single tick. Travel
/// beyond this still advances the frame but fires no further passes.
pub const MAX_FULL_LOOPS_PER_TICK: usize = 1024;

/// Whole loops and leftover frames in `rest`, counted without stepping.
fn split_loops(rest: f32, frame_count: f32) -> (f32, f32) {
    let tail = rest % frame_count;
    let whole = ((rest - tail) / frame_count).round();
    (whole, tail)
}

/// Split the travel from `from` by `elapse` frames into windows inside the
/// animation's frame range, wrapping (looping) or clamping (non-looping).
pub(crate) fn for_each_window(
    from: f32,
    elapse: f32,
    frame_count: f32,
    looping: bool,
    mut visit: impl FnMut(Window),
) {
    if frame_count <= 0.0 || elapse == 0.0 || !elapse.is_finite() {
        return;
    }
    let last = frame_count - 1.0;

    if elapse > 0.0 {
        if !looping {
            let hi = from + elapse;
            let (hi, include_hi) = if hi >= last { (last, true) } else { (hi, false) };
            visit(Window {
                lo: from,
                hi,
                include_lo: true,
                include_hi,
                forward: true,
                travelled: 0.0,
            });
            return;
        }
        let room = frame_count - from;
        if elapse < room {
            visit(Window {
                lo: from,
                hi: from + elapse,
                include_lo: true,
                include_hi: false,
                forward: true,
                travelled: 0.0,
            });
            return;
        }
        visit(Window {
            lo: from,
            hi: frame_count,
            include_lo: true,
            include_hi: false,
            forward: true,
            travelled: 0.0,
        });
        let (whole, tail) = split_loops(elapse - room, frame_count);
        let replayed = (whole as usize).min(MAX_FULL_LOOPS_PER_TICK);
        for pass in 0..replayed {
            visit(Window {
                lo: 0.0,
                hi: frame_count,
                include_lo: true,
                include_hi: false,
                forward: true,
                travelled: room + pass as f32 * frame_count,
            });
        }
        if tail > 0.0 {
            visit(Window {
                lo: 0.0,
                hi: tail,
                include_lo: true,
                include_hi: false,
                forward: true,
                travelled: room + whole * frame_count,
            });
        }
        return;
    }

    let distance = -elapse;
    if !looping {
        let lo = from - distance;
        let (lo, include_lo) = if lo <= 0.0 { (0.0, true) } else { (lo, false) };
        visit(Window {
            lo,
            hi: from,
            include_lo,
            include_hi: true,
            forward: false,
            travelled: 0.0,
        });
        return;
    }
    if distance <= from {
        visit(Window {
            lo: from - distance,
            hi: from,
            include_lo: false,
            include_hi: true,
            forward: false,
            travelled: 0.0,
        });
        return;
    }
    visit(Window {
        lo: 0.0,
        hi: from,
        include_lo: true,
        include_hi: true,
        forward: false,
        travelled: 0.0,
    });
    let (mut whole, mut tail) = split_loops(distance - from, frame_count);
    // Landing exactly on frame 0 leaves it for the next tick.
    if tail <= 0.0 {
        whole -= 1.0;
        tail = frame_count;
    }
    let replayed = (whole as usize).min(MAX_FULL_LOOPS_PER_TICK);
    for pass in 0..replayed {
        visit(Window {
            lo: 0.0,
            hi: frame_count,
            include_lo: true,
            include_hi: false,
            forward: false,
            travelled: from + pass as f32 * frame_count,
        });
    }
    visit(Window {
        lo: frame_count - tail,
        hi: frame_count,
        include_lo: false,
        include_hi: false,
        forward: false,
        travelled: from + whole * frame_count,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windows(from: f32, elapse: f32, fc: f32, looping: bool) -> Vec<Window> {
        let mut out = Vec::new();
        for_each_window(from, elapse, fc, looping, |w| out.push(w));
        out
    }

    #[test]
    fn forward_wraps_multiple_times() {
        let w = windows(25.0, 70.0, 30.0, true);
        assert_eq!(w.len(), 4);
        assert_eq!((w[0].lo, w[0].hi), (25.0, 30.0));
        assert_eq!((w[1].lo, w[1].hi), (0.0, 30.0));
        assert_eq!((w[2].lo, w[2].hi), (0.0, 30.0));
        assert_eq!((w[3].lo, w[3].hi), (0.0, 5.0));
        assert_eq!(w[3].travelled, 65.0);
        assert!(w[0].contains(25.0) && !w[0].contains(30.0));
    }

    #[test]
    fn backward_from_zero_includes_start_only_once() {
        let w = windows(0.0, -5.0, 30.0, true);
        assert_eq!(w.len(), 2);
        assert!(w[0].contains(0.0));
        assert!(!w[1].contains(0.0));
        assert!(w[1].contains(26.0));
        assert!(!w[1].contains(25.0));
        assert_eq!(w[1].distance_to(26.0), 4.0);
    }

    #[test]
    fn landing_on_zero_backward_defers_key() {
        let w = windows(5.0, -5.0, 30.0, true);
        assert_eq!(w.len(), 1);
        assert!(!w[0].contains(0.0));
        assert!(w[0].contains(5.0));
    }

    #[test]
    fn non_looping_clamps_and_includes_terminal_frame() {
        let w = windows(27.0, 10.0, 30.0, false);
        assert_eq!(w.len(), 1);
        assert!(w[0].contains(29.0));
        let w = windows(2.0, -10.0, 30.0, false);
        assert!(w[0].contains(0.0));
    }

    #[test]
    fn backward_landing_on_zero_after_wrapping_defers_key() {
        let w = windows(5.0, -65.0, 30.0, true);
        assert_eq!(w.len(), 3);
        assert!(w[0].contains(0.0));
        assert_eq!((w[1].lo, w[1].hi), (0.0, 30.0));
        assert!(!w[2].contains(0.0));
        assert!(w[2].contains(1.0));
        assert_eq!(w[2].travelled, 35.0);
    }

    #[test]
    fn huge_travel_replays_a_bounded_number_of_loops() {
        for elapse in [1.0e9f32, -1.0e9, 3.0e38, -3.0e38] {
            let w = windows(3.0, elapse, 30.0, true);
            assert!(w.len() <= MAX_FULL_LOOPS_PER_TICK + 2, "elapse {elapse}");
            assert!(w.len() > MAX_FULL_LOOPS_PER_TICK);
            assert!(w.iter().all(|w| w.lo >= 0.0 && w.hi <= 30.0));
        }
        let w = windows(0.5, 1.0e9, 1.0, true);
        assert!(w.len() <= MAX_FULL_LOOPS_PER_TICK + 2);
    }
}
