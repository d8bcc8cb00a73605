//! Actor: playback controller owning one pose engine instance.
//!
//! Methods:
//! - play / pause / resume / stop / seek, then `update(host_fps, ticks)` every host frame
//! - bone queries, per-bone triggers, attachments, colliders and effect units

use std::sync::Arc;

use glam::Affine2;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::animation::{Animation, SkeletonSet};
use crate::attachment::{Attachment, BoundAttachment};
use crate::collider::{Collider, ColliderSource};
use crate::config::{Config, PlayOptions};
use crate::data::ColliderInfo;
use crate::effect::{EffectSet, EffectUnit};
use crate::error::{Error, Result};
use crate::events::EventTrigger;
use crate::ids::{AttachmentId, ColliderId, IdAllocator};
use crate::outputs::{ActorEvent, Outputs};
use crate::posture::Posture;
use crate::skeleton::Skeleton;
use crate::volume::{OverlapMode, Volume};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
    /// Non-looping playback reached its terminal frame. Only `play` leaves it.
    Ended,
}

#[derive(Debug)]
struct Playback {
    animation: Arc<Animation>,
    frame: f32,
    looping: bool,
    speed: f32,
}

/// Wrap into `[0, frame_count)`. `rem_euclid` may round up to `frame_count`
/// for tiny negative inputs.
fn wrap_frame(frame: f32, frame_count: f32) -> f32 {
    let wrapped = frame.rem_euclid(frame_count);
    if wrapped >= frame_count {
        0.0
    } else {
        wrapped
    }
}

#[derive(Debug)]
pub struct Actor {
    cfg: Config,
    set: Arc<SkeletonSet>,
    ids: IdAllocator,
    skeleton: Skeleton,
    colliders: Vec<(ColliderId, Collider)>,
    effects: EffectSet,
    transform: Affine2,

    state: PlaybackState,
    playback: Option<Playback>,

    // Events raised between ticks, delivered with the next update.
    pending: Vec<ActorEvent>,
    outputs: Outputs,
}

impl Actor {
    pub fn new(set: Arc<SkeletonSet>) -> Self {
        Self::new_with_config(set, Config::default())
    }

    /// Build an actor at the rest pose. Bone-declared colliders are
    /// instantiated unless disabled in `cfg`.
    pub fn new_with_config(set: Arc<SkeletonSet>, cfg: Config) -> Self {
        let mut skeleton = Skeleton::new(Arc::clone(set.hierarchy()), &cfg);
        skeleton.update(0.0, None, &Affine2::IDENTITY);

        let mut ids = IdAllocator::new();
        let mut colliders = Vec::new();
        if cfg.instantiate_colliders {
            for bone in set.hierarchy().bones() {
                for info in &bone.colliders {
                    if let Some(c) = Collider::from_info(info, ColliderSource::Bone(bone.index)) {
                        colliders.push((ids.alloc_collider(), c));
                    }
                }
            }
        }

        Self {
            cfg,
            set,
            ids,
            skeleton,
            colliders,
            effects: EffectSet::default(),
            transform: Affine2::IDENTITY,
            state: PlaybackState::Stopped,
            playback: None,
            pending: Vec::new(),
            outputs: Outputs::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn skeleton_set(&self) -> &Arc<SkeletonSet> {
        &self.set
    }

    #[inline]
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Frame the counter currently points at; 0 when nothing was played.
    #[inline]
    pub fn current_frame(&self) -> f32 {
        self.playback.as_ref().map_or(0.0, |p| p.frame)
    }

    pub fn current_animation(&self) -> Option<&str> {
        self.playback.as_ref().map(|p| p.animation.name.as_str())
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.playback.as_ref().map_or(0.0, |p| p.speed)
    }

    /// Outputs of the last update.
    #[inline]
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    // -------- Playback --------

    /// Start `animation` from `opts.start_frame` (wrapped when looping,
    /// clamped otherwise).
    pub fn play(&mut self, animation: &str, opts: PlayOptions) -> Result<()> {
        let anim = self
            .set
            .animation(animation)
            .cloned()
            .ok_or_else(|| Error::UnknownAnimation {
                name: animation.to_string(),
            })?;
        let frame_count = anim.frame_count as f32;
        let frame = if opts.looping {
            wrap_frame(opts.start_frame, frame_count)
        } else {
            opts.start_frame.clamp(0.0, frame_count - 1.0)
        };
        debug!(
            "play '{}' from frame {frame} (loop: {}, speed: {})",
            anim.name, opts.looping, opts.speed
        );
        self.pending.push(ActorEvent::PlaybackStarted {
            animation: anim.name.clone(),
            frame,
        });
        self.playback = Some(Playback {
            animation: anim,
            frame,
            looping: opts.looping,
            speed: opts.speed,
        });
        self.state = PlaybackState::Playing;
        self.effects.start_all();
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            debug!("pause at frame {}", self.current_frame());
            self.state = PlaybackState::Paused;
            self.pending.push(ActorEvent::PlaybackPaused);
            self.effects.pause_all();
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            debug!("resume at frame {}", self.current_frame());
            self.state = PlaybackState::Playing;
            self.pending.push(ActorEvent::PlaybackResumed);
            self.effects.start_all();
        }
    }

    /// Stop and rewind to frame 0. The animation stays selected.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }
        debug!("stop");
        self.state = PlaybackState::Stopped;
        if let Some(p) = self.playback.as_mut() {
            p.frame = 0.0;
        }
        self.pending.push(ActorEvent::PlaybackStopped);
        self.effects.stop_all();
    }

    /// Move the counter without dispatching user data in between. The pose
    /// is refreshed at the new frame immediately.
    pub fn seek(&mut self, frame: f32) {
        let Some(p) = self.playback.as_mut() else {
            return;
        };
        let frame_count = p.animation.frame_count as f32;
        p.frame = if p.looping {
            wrap_frame(frame, frame_count)
        } else {
            frame.clamp(0.0, frame_count - 1.0)
        };
        let (frame, anim) = (p.frame, Arc::clone(&p.animation));
        self.skeleton.update(frame, Some(anim.as_ref()), &self.transform);
        self.mark_colliders_dirty();
    }

    pub fn set_speed(&mut self, speed: f32) {
        if let Some(p) = self.playback.as_mut() {
            p.speed = speed;
        }
    }

    /// World transform the root bone composes against.
    pub fn set_transform(&mut self, transform: Affine2) {
        self.transform = transform;
    }

    #[inline]
    pub fn transform(&self) -> &Affine2 {
        &self.transform
    }

    /// Advance playback by `elapsed_ticks` host frames at `host_fps`.
    ///
    /// While playing: user data crossed over the tick is dispatched, the
    /// counter advances, the pose is evaluated at the frame the tick started
    /// from, every collider is marked dirty and effect units are stepped.
    /// Other states only deliver queued events.
    pub fn update(&mut self, host_fps: f32, elapsed_ticks: f32) -> &Outputs {
        self.outputs.clear();
        self.outputs.events.append(&mut self.pending);

        if self.state != PlaybackState::Playing {
            return &self.outputs;
        }
        if !(host_fps > 0.0) {
            warn!("update ignored: host fps must be positive, got {host_fps}");
            return &self.outputs;
        }
        let Some(p) = self.playback.as_mut() else {
            return &self.outputs;
        };

        let anim = Arc::clone(&p.animation);
        let frame_count = anim.frame_count as f32;
        let elapse = anim.fps / host_fps * p.speed * elapsed_ticks;
        let from = p.frame;

        if elapse != 0.0 {
            self.skeleton
                .dispatch_user_data(&anim, from, elapse, p.looping, &mut self.outputs);
        }

        let mut next = from + elapse;
        let mut ended = false;
        if p.looping {
            next = wrap_frame(next, frame_count);
        } else {
            let last = frame_count - 1.0;
            if (elapse > 0.0 && next >= last) || (elapse < 0.0 && next <= 0.0) {
                ended = true;
            }
            next = next.clamp(0.0, last);
        }
        p.frame = next;
        trace!("'{}' frame {from} -> {next}", anim.name);

        self.skeleton.update(from, Some(anim.as_ref()), &self.transform);

        if ended {
            debug!("'{}' ended at frame {next}", anim.name);
            self.state = PlaybackState::Ended;
            self.outputs.push_event(ActorEvent::PlaybackEnded {
                animation: anim.name.clone(),
                frame: next,
            });
        }

        self.mark_colliders_dirty();
        self.effects
            .update(elapsed_ticks / host_fps, &self.skeleton);
        if ended {
            self.effects.stop_all();
        }
        &self.outputs
    }

    fn mark_colliders_dirty(&mut self) {
        for (_, c) in &mut self.colliders {
            c.mark_dirty();
        }
    }

    // -------- Bones --------

    /// Composed transform of the named bone as of the last update.
    pub fn bone_matrix(&self, name: &str) -> Option<Affine2> {
        self.skeleton.bone_matrix(name)
    }

    pub fn posture(&self, name: &str) -> Option<&Posture> {
        let index = self.set.hierarchy().index_of(name)?;
        self.skeleton.composed(index)
    }

    /// Event registration handle of the named bone, see
    /// [`Skeleton::calculated`].
    pub fn calculated(&mut self, bone: &str, create_if_missing: bool) -> Option<&mut EventTrigger> {
        self.skeleton.calculated(bone, create_if_missing)
    }

    // -------- Attachments --------

    pub fn attach(&mut self, bone: &str, attachment: Attachment) -> Result<AttachmentId> {
        let index = self
            .set
            .hierarchy()
            .index_of(bone)
            .ok_or_else(|| Error::UnknownBone {
                name: bone.to_string(),
            })?;
        let id = self.ids.alloc_attachment();
        self.skeleton.attach(id, index, attachment);
        Ok(id)
    }

    /// Detach and return the attachment. Colliders following it are dropped.
    pub fn remove_attachment(&mut self, id: AttachmentId) -> Result<Attachment> {
        let attachment = self
            .skeleton
            .detach(id)
            .ok_or(Error::UnknownAttachment { id: id.0 })?;
        self.colliders
            .retain(|(_, c)| c.source() != ColliderSource::Attachment(id));
        Ok(attachment)
    }

    pub fn attachment(&self, id: AttachmentId) -> Option<&BoundAttachment> {
        self.skeleton.attachment(id)
    }

    pub fn attachment_mut(&mut self, id: AttachmentId) -> Option<&mut Attachment> {
        self.skeleton.attachment_mut(id)
    }

    // -------- Colliders --------

    /// Instantiate a collider on `source`. Returns `Ok(None)` when the
    /// geometry/bound combination has no volume (reported, not an error).
    pub fn add_collider(
        &mut self,
        source: ColliderSource,
        info: &ColliderInfo,
    ) -> Result<Option<ColliderId>> {
        match source {
            ColliderSource::Bone(index) if index >= self.skeleton.bone_count() => {
                return Err(Error::UnknownBone {
                    name: index.to_string(),
                })
            }
            ColliderSource::Attachment(id) if self.skeleton.attachment(id).is_none() => {
                return Err(Error::UnknownAttachment { id: id.0 })
            }
            _ => {}
        }
        let Some(collider) = Collider::from_info(info, source) else {
            return Ok(None);
        };
        let id = self.ids.alloc_collider();
        debug!("collider '{}' added as {id:?}", info.name);
        self.colliders.push((id, collider));
        Ok(Some(id))
    }

    pub fn remove_collider(&mut self, id: ColliderId) -> Result<Collider> {
        let pos = self
            .colliders
            .iter()
            .position(|(c, _)| *c == id)
            .ok_or(Error::UnknownCollider { id: id.0 })?;
        Ok(self.colliders.remove(pos).1)
    }

    /// First collider with the given name.
    pub fn collider_id(&self, name: &str) -> Option<ColliderId> {
        self.colliders
            .iter()
            .find(|(_, c)| c.name() == name)
            .map(|(id, _)| *id)
    }

    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.iter().find(|(c, _)| *c == id).map(|(_, c)| c)
    }

    pub fn collider_mut(&mut self, id: ColliderId) -> Option<&mut Collider> {
        self.colliders
            .iter_mut()
            .find(|(c, _)| *c == id)
            .map(|(_, c)| c)
    }

    pub fn colliders(&self) -> impl Iterator<Item = (ColliderId, &Collider)> {
        self.colliders.iter().map(|(id, c)| (*id, c))
    }

    /// Current volume of a collider, rebuilt if the pose changed since the
    /// last query.
    pub fn collider_volume(&mut self, id: ColliderId) -> Option<&Volume> {
        let (_, collider) = self.colliders.iter_mut().find(|(c, _)| *c == id)?;
        collider.get_volume(&self.skeleton, self.set.cells())
    }

    /// Test two colliders against each other. A collider without a volume
    /// (disabled, hidden) overlaps nothing.
    pub fn overlaps(&mut self, a: ColliderId, b: ColliderId, mode: OverlapMode) -> Result<bool> {
        let ia = self.collider_index(a)?;
        let ib = self.collider_index(b)?;
        let cells = self.set.cells();
        for i in [ia, ib] {
            if self.colliders[i].1.get_volume(&self.skeleton, cells).is_none() {
                return Ok(false);
            }
        }
        match (
            self.colliders[ia].1.cached_volume(),
            self.colliders[ib].1.cached_volume(),
        ) {
            (Some(va), Some(vb)) => Ok(va.overlaps(vb, mode)),
            _ => Ok(false),
        }
    }

    fn collider_index(&self, id: ColliderId) -> Result<usize> {
        self.colliders
            .iter()
            .position(|(c, _)| *c == id)
            .ok_or(Error::UnknownCollider { id: id.0 })
    }

    // -------- Effects --------

    /// Bind an effect unit to a bone. It follows playback from the next
    /// lifecycle change on.
    pub fn bind_effect(&mut self, bone: &str, unit: Box<dyn EffectUnit>) -> Result<()> {
        let Some(index) = self.set.hierarchy().index_of(bone) else {
            warn!("effect unit not bound: unknown bone '{bone}'");
            return Err(Error::UnknownBone {
                name: bone.to_string(),
            });
        };
        if self.set.hierarchy().bones()[index].effect_name.is_none() {
            debug!("bone '{bone}' declares no effect; binding anyway");
        }
        self.effects.bind(index, unit);
        Ok(())
    }

    pub fn effects(&self) -> &EffectSet {
        &self.effects
    }

    pub fn traverse_effects(&self, visit: &mut dyn FnMut(&Affine2)) {
        self.effects.traverse(visit);
    }
}
