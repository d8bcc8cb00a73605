//! Colliders: named bindings between a pose source and a lazily rebuilt volume.

use glam::Vec2;
use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::animation::CellCatalog;
use crate::data::{BoundKind, ColliderInfo, Geometry};
use crate::ids::AttachmentId;
use crate::math::axis_scales;
use crate::posture::Posture;
use crate::skeleton::Skeleton;
use crate::volume::{Shape, Volume};

/// Posture a collider follows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderSource {
    Bone(usize),
    Attachment(AttachmentId),
}

/// Cache state of a collider's volume. Only the owning actor marks volumes
/// dirty, once per tick after composition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VolumeState {
    Dirty,
    Clean,
}

/// How a circle's radius follows the composed scale.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RadiusPolicy {
    #[default]
    None,
    Min,
    Max,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Factory {
    Box {
        size: Option<Vec2>,
        offset: Vec2,
        prefer_aabb: bool,
    },
    Circle {
        radius: Option<f32>,
        offset: Vec2,
        policy: RadiusPolicy,
    },
}

#[derive(Debug)]
pub struct Collider {
    name: String,
    source: ColliderSource,
    factory: Factory,
    enabled: bool,
    state: VolumeState,
    volume: Option<Volume>,
}

impl Collider {
    /// Build a collider from its declaration. Geometry/bound combinations
    /// with no volume are reported and yield `None`.
    pub fn from_info(info: &ColliderInfo, source: ColliderSource) -> Option<Self> {
        let factory = match (&info.geometry, info.bound) {
            (Geometry::Box { size, offset }, BoundKind::Quad | BoundKind::Aabb) => Factory::Box {
                size: size.map(Vec2::from),
                offset: Vec2::from(*offset),
                prefer_aabb: info.bound == BoundKind::Aabb,
            },
            (
                Geometry::Circle { radius, offset },
                BoundKind::Circle | BoundKind::CircleScaleMin | BoundKind::CircleScaleMax,
            ) => Factory::Circle {
                radius: *radius,
                offset: Vec2::from(*offset),
                policy: match info.bound {
                    BoundKind::CircleScaleMin => RadiusPolicy::Min,
                    BoundKind::CircleScaleMax => RadiusPolicy::Max,
                    _ => RadiusPolicy::None,
                },
            },
            (geometry, bound) => {
                warn!(
                    "collider '{}': no volume for {} geometry with {bound:?} bounds; skipped",
                    info.name,
                    geometry_name(geometry)
                );
                return None;
            }
        };
        Some(Self {
            name: info.name.clone(),
            source,
            factory,
            enabled: true,
            state: VolumeState::Dirty,
            volume: None,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn source(&self) -> ColliderSource {
        self.source
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[inline]
    pub fn state(&self) -> VolumeState {
        self.state
    }

    /// AABB-priority knob; box colliders only. Returns false for circles.
    /// Like every knob, takes effect at the next rebuild.
    pub fn set_prefer_aabb(&mut self, prefer: bool) -> bool {
        match &mut self.factory {
            Factory::Box { prefer_aabb, .. } => {
                *prefer_aabb = prefer;
                true
            }
            Factory::Circle { .. } => false,
        }
    }

    /// Radius scale policy knob; circle colliders only. Returns false for boxes.
    pub fn set_radius_policy(&mut self, policy: RadiusPolicy) -> bool {
        match &mut self.factory {
            Factory::Circle { policy: p, .. } => {
                *p = policy;
                true
            }
            Factory::Box { .. } => false,
        }
    }

    /// Volume from the last rebuild, without checking freshness.
    #[inline]
    pub(crate) fn cached_volume(&self) -> Option<&Volume> {
        self.volume.as_ref()
    }

    #[inline]
    pub(crate) fn mark_dirty(&mut self) {
        self.state = VolumeState::Dirty;
    }

    /// Current volume, rebuilt from the source posture when dirty. `None`
    /// while disabled or while the source is hidden or gone.
    pub fn get_volume(&mut self, skeleton: &Skeleton, cells: &CellCatalog) -> Option<&Volume> {
        if !self.enabled {
            return None;
        }
        let (posture, fixed_size) = match self.source {
            ColliderSource::Bone(index) => (skeleton.composed(index)?, None),
            ColliderSource::Attachment(id) => {
                let bound = skeleton.attachment(id)?;
                (&bound.posture, bound.attachment.size)
            }
        };
        if !posture.is_visible() {
            return None;
        }
        if self.state == VolumeState::Clean && self.volume.is_some() {
            return self.volume.as_ref();
        }

        trace!("rebuilding volume of collider '{}'", self.name);
        let (shape, prefer_aabb) = self.build_shape(posture, fixed_size, cells);
        match self.volume.as_mut() {
            Some(volume) => volume.reshape(shape, prefer_aabb),
            None => self.volume = Some(Volume::new(shape, prefer_aabb)),
        }
        self.state = VolumeState::Clean;
        self.volume.as_ref()
    }

    fn build_shape(
        &self,
        posture: &Posture,
        fixed_size: Option<Vec2>,
        cells: &CellCatalog,
    ) -> (Shape, bool) {
        let world = posture.transform;
        match self.factory {
            Factory::Box {
                size,
                offset,
                prefer_aabb,
            } => {
                let (size, pivot) = match size.or(fixed_size) {
                    Some(size) => (size, Vec2::ZERO),
                    None => {
                        let cell = posture.cell();
                        let size = cell.and_then(|c| cells.size(c)).unwrap_or(Vec2::ZERO);
                        let pivot = cell
                            .and_then(|c| cells.cell(c))
                            .map_or(Vec2::ZERO, |c| Vec2::from(c.pivot));
                        (size, pivot + posture.pivot())
                    }
                };
                let center = offset - pivot * size;
                let half = size * 0.5;
                (
                    Shape::Box {
                        world,
                        min: center - half,
                        max: center + half,
                    },
                    prefer_aabb,
                )
            }
            Factory::Circle {
                radius,
                offset,
                policy,
            } => {
                let base = radius.unwrap_or_else(|| posture.collision_radius());
                let scales = axis_scales(&world);
                let radius = match policy {
                    RadiusPolicy::None => base,
                    RadiusPolicy::Min => base * scales.min_element(),
                    RadiusPolicy::Max => base * scales.max_element(),
                };
                (
                    Shape::Circle {
                        center: world.transform_point2(offset),
                        radius,
                    },
                    false,
                )
            }
        }
    }
}

fn geometry_name(geometry: &Geometry) -> &'static str {
    match geometry {
        Geometry::Box { .. } => "box",
        Geometry::Circle { .. } => "circle",
    }
}
