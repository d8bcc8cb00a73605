//! Sprig skeleton core (engine-agnostic)
//!
//! Pose engine for hierarchical 2D bone skeletons: keyframe curve sampling,
//! top-down transform composition with non-inherited local attributes,
//! per-bone event triggers, a fractional-frame playback controller and
//! lazily cached collision volumes derived from the composed pose.

pub mod actor;
pub mod animation;
pub mod attachment;
pub mod attribute;
pub mod bone;
pub mod collider;
pub mod config;
pub mod data;
pub mod effect;
pub mod error;
pub mod events;
pub mod ids;
pub mod interp;
pub mod math;
pub mod outputs;
pub mod posture;
pub mod sampling;
pub mod scratch;
pub mod skeleton;
pub mod stored_skeleton;
pub mod value;
pub mod volume;

// Re-exports for hosts
pub use actor::{Actor, PlaybackState};
pub use animation::{Animation, BoneCurves, CellCatalog, Curve, SkeletonSet};
pub use attachment::{Attachment, BoundAttachment};
pub use attribute::Attribute;
pub use bone::{Bone, BoneHierarchy};
pub use collider::{Collider, ColliderSource, RadiusPolicy, VolumeState};
pub use config::{Config, PlayOptions};
pub use data::{
    BlendMode, BoneData, BoundKind, ColliderInfo, CurveParams, Geometry, Interpolation, Key,
    SkeletonSetData,
};
pub use effect::{EffectSet, EffectUnit};
pub use error::{Error, Result};
pub use events::{CalculatedEvent, EventTrigger, KeyInfo, UserDataEvent};
pub use ids::{AttachmentId, ColliderId};
pub use outputs::{ActorEvent, Outputs};
pub use posture::Posture;
pub use sampling::sample_curve;
pub use skeleton::Skeleton;
pub use stored_skeleton::parse_skeleton_set_json;
pub use value::{CellRef, EffectOp, UserData, Value, ValueKind};
pub use volume::{Aabb, OverlapMode, Shape, Volume};

pub use glam::{Affine2, Vec2};
