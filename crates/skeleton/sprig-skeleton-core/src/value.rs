//! Keyframe values and the attribute payload types they carry.
//!
//! Only `Number` is interpolated. Every other kind is step-only: the left key
//! is held until the next key is reached.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    Unset,
    Number,
    Bool,
    Cell,
    User,
    Effect,
}

/// Reference to a drawable cell: (cell map index, cell index within the map).
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub map: u32,
    pub cell: u32,
}

/// Opaque user payload attached to a user-data keyframe.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UserData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integer: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<[f32; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Effect operation keyed on an effect bone.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EffectOp {
    #[serde(default)]
    pub start_frame: i32,
    #[serde(default = "one")]
    pub speed: f32,
    #[serde(default)]
    pub independent: bool,
}

fn one() -> f32 {
    1.0
}

impl Default for EffectOp {
    fn default() -> Self {
        Self {
            start_frame: 0,
            speed: 1.0,
            independent: false,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Value {
    /// No value; used for "not set" sentinels such as local alpha.
    #[default]
    Unset,
    Number(f32),
    Bool(bool),
    Cell(CellRef),
    /// Shared so that sampling a user-data curve never deep-copies the payload.
    User(Arc<UserData>),
    Effect(EffectOp),
}

impl Value {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Unset => ValueKind::Unset,
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Bool,
            Value::Cell(_) => ValueKind::Cell,
            Value::User(_) => ValueKind::User,
            Value::Effect(_) => ValueKind::Effect,
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_cell(&self) -> Option<CellRef> {
        match self {
            Value::Cell(c) => Some(*c),
            _ => None,
        }
    }

    #[inline]
    pub fn as_user(&self) -> Option<&Arc<UserData>> {
        match self {
            Value::User(u) => Some(u),
            _ => None,
        }
    }

    #[inline]
    pub fn as_effect(&self) -> Option<EffectOp> {
        match self {
            Value::Effect(e) => Some(*e),
            _ => None,
        }
    }

    #[inline]
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }
}
