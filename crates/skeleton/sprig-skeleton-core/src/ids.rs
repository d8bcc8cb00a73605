//! Identifiers and simple allocators for runtime-created entities.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AttachmentId(pub u32);

/// Monotonic allocator for ColliderId and AttachmentId.
/// Ids are never reused within one actor, so stale ids simply miss.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_collider: u32,
    next_attachment: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_collider(&mut self) -> ColliderId {
        let id = ColliderId(self.next_collider);
        self.next_collider = self.next_collider.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_attachment(&mut self) -> AttachmentId {
        let id = AttachmentId(self.next_attachment);
        self.next_attachment = self.next_attachment.wrapping_add(1);
        id
    }
}
