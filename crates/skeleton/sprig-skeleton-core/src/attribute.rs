//! Fixed attribute enumeration indexing every Posture's attribute vector.

use serde::{Deserialize, Serialize};

use crate::value::{Value, ValueKind};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    PositionX,
    PositionY,
    /// Degrees, counter-clockwise.
    Rotation,
    ScaleX,
    ScaleY,
    LocalScaleX,
    LocalScaleY,
    Alpha,
    LocalAlpha,
    Cell,
    PivotX,
    PivotY,
    UvTranslateX,
    UvTranslateY,
    Priority,
    ImageFlipH,
    ImageFlipV,
    Hide,
    CollisionRadius,
    FlipH,
    FlipV,
    /// Reserved: keys on this attribute are dispatched as events when crossed.
    UserData,
    Effect,
}

impl Attribute {
    pub const COUNT: usize = 23;

    pub const ALL: [Attribute; Attribute::COUNT] = [
        Attribute::PositionX,
        Attribute::PositionY,
        Attribute::Rotation,
        Attribute::ScaleX,
        Attribute::ScaleY,
        Attribute::LocalScaleX,
        Attribute::LocalScaleY,
        Attribute::Alpha,
        Attribute::LocalAlpha,
        Attribute::Cell,
        Attribute::PivotX,
        Attribute::PivotY,
        Attribute::UvTranslateX,
        Attribute::UvTranslateY,
        Attribute::Priority,
        Attribute::ImageFlipH,
        Attribute::ImageFlipV,
        Attribute::Hide,
        Attribute::CollisionRadius,
        Attribute::FlipH,
        Attribute::FlipV,
        Attribute::UserData,
        Attribute::Effect,
    ];

    /// Slot of this attribute in a posture's attribute vector.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Value held by the slot when no curve drives it.
    pub fn default_value(self) -> Value {
        match self {
            Attribute::ScaleX
            | Attribute::ScaleY
            | Attribute::LocalScaleX
            | Attribute::LocalScaleY
            | Attribute::Alpha => Value::Number(1.0),
            Attribute::PositionX
            | Attribute::PositionY
            | Attribute::Rotation
            | Attribute::PivotX
            | Attribute::PivotY
            | Attribute::UvTranslateX
            | Attribute::UvTranslateY
            | Attribute::Priority
            | Attribute::CollisionRadius => Value::Number(0.0),
            Attribute::ImageFlipH
            | Attribute::ImageFlipV
            | Attribute::Hide
            | Attribute::FlipH
            | Attribute::FlipV => Value::Bool(false),
            Attribute::LocalAlpha | Attribute::Cell | Attribute::UserData | Attribute::Effect => {
                Value::Unset
            }
        }
    }

    /// Kind of value keys on this attribute must carry.
    pub fn value_kind(self) -> ValueKind {
        match self {
            Attribute::ImageFlipH
            | Attribute::ImageFlipV
            | Attribute::Hide
            | Attribute::FlipH
            | Attribute::FlipV => ValueKind::Bool,
            Attribute::Cell => ValueKind::Cell,
            Attribute::UserData => ValueKind::User,
            Attribute::Effect => ValueKind::Effect,
            _ => ValueKind::Number,
        }
    }

    /// Whether a value may be stored in this attribute's slot.
    pub fn accepts(self, value: &Value) -> bool {
        value.is_unset() || value.kind() == self.value_kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_indexed_in_declaration_order() {
        for (i, attr) in Attribute::ALL.iter().enumerate() {
            assert_eq!(attr.index(), i);
        }
    }

    #[test]
    fn defaults_match_declared_kinds() {
        for attr in Attribute::ALL {
            assert!(attr.accepts(&attr.default_value()), "{attr:?}");
        }
        assert!(!Attribute::Hide.accepts(&Value::Number(1.0)));
    }
}
