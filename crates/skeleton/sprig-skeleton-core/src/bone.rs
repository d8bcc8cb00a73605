//! Static bone hierarchy: an arena of bones addressed by array index.
//!
//! Built once at load time and shared read-only (behind an `Arc`) by every
//! actor playing the same skeleton.

use hashbrown::HashMap;

use crate::data::{BlendMode, BoneData, ColliderInfo};
use crate::error::{Error, Result};

#[derive(Clone, Debug)]
pub struct Bone {
    pub name: String,
    /// Stable slot into every per-bone array.
    pub index: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub colliders: Vec<ColliderInfo>,
    pub blend_mode: Option<BlendMode>,
    pub effect_name: Option<String>,
}

impl Bone {
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[derive(Debug)]
pub struct BoneHierarchy {
    bones: Vec<Bone>,
    by_name: HashMap<String, usize>,
}

impl BoneHierarchy {
    /// Resolve parent/children indices from serialized bone records.
    ///
    /// Bone 0 must be a root and every parent must precede its children, which
    /// makes array order a valid top-down evaluation order.
    pub fn new(data: &[BoneData]) -> Result<Self> {
        let first = data.first().ok_or(Error::EmptySkeleton)?;
        if first.parent >= 0 {
            return Err(Error::RootNotFirst {
                name: first.name.clone(),
            });
        }

        let mut bones: Vec<Bone> = Vec::with_capacity(data.len());
        let mut by_name = HashMap::with_capacity(data.len());
        for (index, b) in data.iter().enumerate() {
            if by_name.insert(b.name.clone(), index).is_some() {
                return Err(Error::DuplicateBone {
                    name: b.name.clone(),
                });
            }
            let parent = if b.parent < 0 {
                None
            } else if (b.parent as usize) < index {
                Some(b.parent as usize)
            } else {
                return Err(Error::InvalidParent {
                    bone: b.name.clone(),
                    parent: b.parent,
                });
            };
            bones.push(Bone {
                name: b.name.clone(),
                index,
                parent,
                children: Vec::new(),
                colliders: b.colliders.clone(),
                blend_mode: b.blend_mode,
                effect_name: b.effect.clone(),
            });
        }

        for index in 0..bones.len() {
            if let Some(parent) = bones[index].parent {
                bones[parent].children.push(index);
            }
        }

        Ok(Self { bones, by_name })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    #[inline]
    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    #[inline]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn find(&self, name: &str) -> Option<&Bone> {
        self.index_of(name).map(|i| &self.bones[i])
    }

    /// Indices of every root bone; bone 0 is always first.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.bones.iter().filter(|b| b.is_root()).map(|b| b.index)
    }
}
