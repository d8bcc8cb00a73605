//! Serialized skeleton-set description (construction input).
//!
//! These types mirror the JSON document accepted by
//! [`parse_skeleton_set_json`](crate::stored_skeleton::parse_skeleton_set_json).
//! Runtime structures are resolved from them once, in `animation.rs`/`bone.rs`.

use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;
use crate::value::Value;

/// Content kind tag accepted by the loader.
pub const SKELETON_SET_KIND: &str = "skeleton-set";
/// Only supported document version.
pub const SUPPORTED_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkeletonSetData {
    pub version: u32,
    pub kind: String,
    pub bones: Vec<BoneData>,
    #[serde(default)]
    pub cell_maps: Vec<CellMapData>,
    #[serde(default)]
    pub animations: Vec<AnimationData>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoneData {
    pub name: String,
    /// Index of the parent bone, -1 for the root.
    pub parent: i32,
    #[serde(default)]
    pub colliders: Vec<ColliderInfo>,
    #[serde(default)]
    pub blend_mode: Option<BlendMode>,
    #[serde(default)]
    pub effect: Option<String>,
}

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BlendMode {
    #[default]
    Mix,
    Mul,
    Add,
    Sub,
    MulAlpha,
    Screen,
    Exclusion,
    Invert,
}

/// Declarative collider attached to a bone.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColliderInfo {
    pub name: String,
    pub geometry: Geometry,
    pub bound: BoundKind,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Geometry {
    /// Rectangle in bone space. Without a `size` the rectangle follows the
    /// pixel size of the bone's current cell.
    Box {
        #[serde(default)]
        size: Option<[f32; 2]>,
        #[serde(default)]
        offset: [f32; 2],
    },
    /// Circle in bone space. Without a `radius` the bone's animated
    /// collision radius is used.
    Circle {
        #[serde(default)]
        radius: Option<f32>,
        #[serde(default)]
        offset: [f32; 2],
    },
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BoundKind {
    /// Exact oriented rectangle.
    Quad,
    /// Rectangle tested through its axis-aligned bounds.
    Aabb,
    /// Circle, radius not scaled.
    Circle,
    /// Circle, radius scaled by the smaller axis scale.
    CircleScaleMin,
    /// Circle, radius scaled by the larger axis scale.
    CircleScaleMax,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellMapData {
    pub name: String,
    pub cells: Vec<CellData>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub name: String,
    /// Pixel size (width, height).
    pub size: [f32; 2],
    /// Origin offset relative to the cell center, in cell-size units.
    #[serde(default)]
    pub pivot: [f32; 2],
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnimationData {
    pub name: String,
    pub fps: f32,
    pub frame_count: u32,
    #[serde(default)]
    pub tracks: Vec<TrackData>,
}

/// All curves of one bone within one animation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackData {
    pub bone: String,
    pub curves: Vec<CurveData>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurveData {
    pub attribute: Attribute,
    pub keys: Vec<Key>,
}

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Interpolation {
    /// Hold the left value until the next key.
    #[serde(alias = "none")]
    Step,
    #[default]
    Linear,
    Bezier,
    Hermite,
    #[serde(other)]
    Unknown,
}

/// Per-key curve parameters.
///
/// For Bezier segments these are control-point offsets: the first control
/// point sits at `(left.time + start_time, left.value + start_value)`, the
/// second at `(right.time + end_time, right.value + end_value)`. For Hermite
/// segments `start_value`/`end_value` are the outgoing/incoming tangents.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurveParams {
    #[serde(default)]
    pub start_time: f32,
    #[serde(default)]
    pub start_value: f32,
    #[serde(default)]
    pub end_time: f32,
    #[serde(default)]
    pub end_value: f32,
}

/// One keyframe. `time` is in frames.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    pub time: f32,
    pub value: Value,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default)]
    pub curve: Option<CurveParams>,
}

impl Key {
    pub fn new(time: f32, value: Value, interpolation: Interpolation) -> Self {
        Self {
            time,
            value,
            interpolation,
            curve: None,
        }
    }

    pub fn number(time: f32, value: f32) -> Self {
        Self::new(time, Value::Number(value), Interpolation::Linear)
    }

    pub fn with_curve(mut self, curve: CurveParams) -> Self {
        self.curve = Some(curve);
        self
    }
}
