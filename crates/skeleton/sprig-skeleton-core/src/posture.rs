//! Per-bone computed state, in local or composed form.

use glam::{Affine2, Vec2};

use crate::attribute::Attribute;
use crate::data::BlendMode;
use crate::ids::AttachmentId;
use crate::math::trs_matrix;
use crate::value::{CellRef, EffectOp, UserData, Value};

/// Attribute vector plus the derived 2x3 transform of one bone at one instant.
///
/// Postures live in fixed arrays owned by a pose engine and are rewritten in
/// place every tick.
#[derive(Clone, Debug)]
pub struct Posture {
    attributes: [Value; Attribute::COUNT],
    pub transform: Affine2,
    pub blend_mode: BlendMode,
    pub attachments: Vec<AttachmentId>,
    /// Position of this bone in the current draw order.
    pub sort_index: usize,
}

impl Default for Posture {
    fn default() -> Self {
        Self {
            attributes: std::array::from_fn(|i| Attribute::ALL[i].default_value()),
            transform: Affine2::IDENTITY,
            blend_mode: BlendMode::default(),
            attachments: Vec::new(),
            sort_index: 0,
        }
    }
}

impl Posture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore every attribute slot to its default. Transform, attachments
    /// and sort index are left alone.
    pub fn reset_attributes(&mut self) {
        for (slot, attr) in self.attributes.iter_mut().zip(Attribute::ALL) {
            *slot = attr.default_value();
        }
    }

    #[inline]
    pub fn get(&self, attr: Attribute) -> &Value {
        &self.attributes[attr.index()]
    }

    #[inline]
    pub fn set(&mut self, attr: Attribute, value: Value) {
        self.attributes[attr.index()] = value;
    }

    /// Numeric attribute, falling back to the attribute default.
    #[inline]
    pub fn number(&self, attr: Attribute) -> f32 {
        self.get(attr)
            .as_number()
            .or_else(|| attr.default_value().as_number())
            .unwrap_or(0.0)
    }

    #[inline]
    pub fn flag(&self, attr: Attribute) -> bool {
        self.get(attr).as_bool().unwrap_or(false)
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(
            self.number(Attribute::PositionX),
            self.number(Attribute::PositionY),
        )
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.number(Attribute::Rotation)
    }

    #[inline]
    pub fn scale(&self) -> Vec2 {
        Vec2::new(self.number(Attribute::ScaleX), self.number(Attribute::ScaleY))
    }

    #[inline]
    pub fn local_scale(&self) -> Vec2 {
        Vec2::new(
            self.number(Attribute::LocalScaleX),
            self.number(Attribute::LocalScaleY),
        )
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.number(Attribute::Alpha)
    }

    /// Local alpha override, `None` while unset.
    #[inline]
    pub fn local_alpha(&self) -> Option<f32> {
        self.get(Attribute::LocalAlpha).as_number()
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        !self.flag(Attribute::Hide)
    }

    #[inline]
    pub fn set_visible(&mut self, visible: bool) {
        self.set(Attribute::Hide, Value::Bool(!visible));
    }

    #[inline]
    pub fn cell(&self) -> Option<CellRef> {
        self.get(Attribute::Cell).as_cell()
    }

    #[inline]
    pub fn pivot(&self) -> Vec2 {
        Vec2::new(self.number(Attribute::PivotX), self.number(Attribute::PivotY))
    }

    #[inline]
    pub fn priority(&self) -> f32 {
        self.number(Attribute::Priority)
    }

    #[inline]
    pub fn collision_radius(&self) -> f32 {
        self.number(Attribute::CollisionRadius)
    }

    #[inline]
    pub fn user_data(&self) -> Option<&UserData> {
        self.get(Attribute::UserData).as_user().map(|u| u.as_ref())
    }

    #[inline]
    pub fn effect_op(&self) -> Option<EffectOp> {
        self.get(Attribute::Effect).as_effect()
    }

    /// Derive the 2x3 transform from the translation/rotation/scale slots.
    pub fn rebuild_transform(&mut self) {
        self.transform = trs_matrix(self.position(), self.rotation(), self.scale());
    }

    /// Copy every attribute slot and the blend mode/attachment list from
    /// `other`, reusing existing storage.
    pub fn copy_attributes_from(&mut self, other: &Posture) {
        self.attributes.clone_from(&other.attributes);
        self.blend_mode = other.blend_mode;
        self.attachments.clone_from(&other.attachments);
    }
}
