//! Externally rendered objects that follow a bone.

use glam::{Affine2, Vec2};

use crate::ids::AttachmentId;
use crate::posture::Posture;

/// Attachment description supplied by the host.
#[derive(Clone, Debug)]
pub struct Attachment {
    pub name: String,
    /// Transform relative to the bone it is attached to.
    pub offset: Affine2,
    pub visible: bool,
    /// Rectangle size used by box colliders bound to this attachment.
    pub size: Option<Vec2>,
}

impl Attachment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            offset: Affine2::IDENTITY,
            visible: true,
            size: None,
        }
    }

    pub fn with_offset(mut self, offset: Affine2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = Some(size);
        self
    }
}

/// An attachment bound to a bone, with its composed posture.
#[derive(Clone, Debug)]
pub struct BoundAttachment {
    pub id: AttachmentId,
    pub bone: usize,
    pub attachment: Attachment,
    /// Recomposed every tick from the bone's composed posture.
    pub posture: Posture,
}

impl BoundAttachment {
    pub(crate) fn new(id: AttachmentId, bone: usize, attachment: Attachment) -> Self {
        Self {
            id,
            bone,
            attachment,
            posture: Posture::new(),
        }
    }

    /// Follow the bone's composed frame (before the bone's local-only
    /// adjustments are applied).
    pub(crate) fn follow(&mut self, bone: &Posture) {
        self.posture.copy_attributes_from(bone);
        self.posture.attachments.clear();
        self.posture.transform = bone.transform * self.attachment.offset;
        self.posture
            .set_visible(bone.is_visible() && self.attachment.visible);
    }
}
