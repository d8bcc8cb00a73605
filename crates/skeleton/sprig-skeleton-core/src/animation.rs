//! Resolved runtime animation data and the shared skeleton set.

use std::sync::Arc;

use glam::Vec2;
use hashbrown::HashMap;
use log::warn;

use crate::attribute::Attribute;
use crate::bone::BoneHierarchy;
use crate::data::{AnimationData, CellData, CellMapData, Interpolation, Key, SkeletonSetData};
use crate::error::{Error, Result};
use crate::value::CellRef;

/// Keys driving one attribute of one bone.
#[derive(Clone, Debug)]
pub struct Curve {
    pub attribute: Attribute,
    pub keys: Vec<Key>,
}

/// Every curve of one bone in one animation.
#[derive(Clone, Debug, Default)]
pub struct BoneCurves {
    pub curves: Vec<Curve>,
    /// Position of the user-data curve within `curves`, if any.
    pub user_data: Option<usize>,
}

impl BoneCurves {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    #[inline]
    pub fn user_data_keys(&self) -> &[Key] {
        match self.user_data {
            Some(i) => &self.curves[i].keys,
            None => &[],
        }
    }
}

/// An animation with its curves re-indexed by bone array index.
#[derive(Clone, Debug)]
pub struct Animation {
    pub name: String,
    pub fps: f32,
    pub frame_count: u32,
    /// One entry per bone; `None` for bones this animation does not drive.
    pub bones: Vec<Option<BoneCurves>>,
}

impl Animation {
    fn resolve(data: &AnimationData, hierarchy: &BoneHierarchy) -> Result<Self> {
        if data.frame_count == 0 || !(data.fps > 0.0) {
            return Err(Error::InvalidTiming {
                animation: data.name.clone(),
                fps: data.fps,
                frame_count: data.frame_count,
            });
        }

        let mut bones: Vec<Option<BoneCurves>> = vec![None; hierarchy.len()];
        for track in &data.tracks {
            let index = hierarchy
                .index_of(&track.bone)
                .ok_or_else(|| Error::UnknownTrackBone {
                    animation: data.name.clone(),
                    bone: track.bone.clone(),
                })?;
            let slot = bones[index].get_or_insert_with(BoneCurves::default);
            for curve in &track.curves {
                validate_keys(&data.name, &track.bone, curve.attribute, &curve.keys)?;
                if curve.attribute == Attribute::UserData {
                    slot.user_data = Some(slot.curves.len());
                }
                slot.curves.push(Curve {
                    attribute: curve.attribute,
                    keys: curve.keys.clone(),
                });
            }
        }

        Ok(Self {
            name: data.name.clone(),
            fps: data.fps,
            frame_count: data.frame_count,
            bones,
        })
    }

    #[inline]
    pub fn bone_curves(&self, bone: usize) -> Option<&BoneCurves> {
        self.bones.get(bone).and_then(|c| c.as_ref())
    }
}

fn validate_keys(animation: &str, bone: &str, attribute: Attribute, keys: &[Key]) -> Result<()> {
    let mut last = f32::NEG_INFINITY;
    for key in keys {
        if !key.time.is_finite() || key.time < last {
            return Err(Error::UnsortedKeys {
                animation: animation.to_string(),
                bone: bone.to_string(),
                attribute: format!("{attribute:?}"),
            });
        }
        last = key.time;
        if !attribute.accepts(&key.value) {
            return Err(Error::ValueKindMismatch {
                animation: animation.to_string(),
                bone: bone.to_string(),
                attribute: format!("{attribute:?}"),
                found: format!("{:?}", key.value.kind()),
            });
        }
        if key.interpolation == Interpolation::Unknown {
            warn!(
                "unknown interpolation on {attribute:?} of '{bone}' in '{animation}' at frame {}; \
                 the segment will hold its left value",
                key.time
            );
        }
    }
    Ok(())
}

/// Cell lookup for rendering and cell-fed box colliders.
#[derive(Clone, Debug, Default)]
pub struct CellCatalog {
    maps: Vec<CellMapData>,
}

impl CellCatalog {
    pub fn new(maps: Vec<CellMapData>) -> Self {
        Self { maps }
    }

    #[inline]
    pub fn cell(&self, cell: CellRef) -> Option<&CellData> {
        self.maps
            .get(cell.map as usize)
            .and_then(|m| m.cells.get(cell.cell as usize))
    }

    /// Pixel size of a cell.
    #[inline]
    pub fn size(&self, cell: CellRef) -> Option<Vec2> {
        self.cell(cell).map(|c| Vec2::from(c.size))
    }

    pub fn find(&self, map: &str, cell: &str) -> Option<CellRef> {
        let (mi, m) = self.maps.iter().enumerate().find(|(_, m)| m.name == map)?;
        let ci = m.cells.iter().position(|c| c.name == cell)?;
        Some(CellRef {
            map: mi as u32,
            cell: ci as u32,
        })
    }
}

/// Loaded skeleton resource: hierarchy, animations and cells.
#[derive(Debug)]
pub struct SkeletonSet {
    hierarchy: Arc<BoneHierarchy>,
    animations: Vec<Arc<Animation>>,
    by_name: HashMap<String, usize>,
    cells: CellCatalog,
}

impl SkeletonSet {
    /// Validate and resolve a parsed description.
    pub fn from_data(data: SkeletonSetData) -> Result<Self> {
        crate::stored_skeleton::check_header(&data)?;
        let hierarchy = Arc::new(BoneHierarchy::new(&data.bones)?);

        let mut animations = Vec::with_capacity(data.animations.len());
        let mut by_name = HashMap::with_capacity(data.animations.len());
        for anim in &data.animations {
            if by_name.insert(anim.name.clone(), animations.len()).is_some() {
                return Err(Error::DuplicateAnimation {
                    name: anim.name.clone(),
                });
            }
            animations.push(Arc::new(Animation::resolve(anim, &hierarchy)?));
        }

        Ok(Self {
            hierarchy,
            animations,
            by_name,
            cells: CellCatalog::new(data.cell_maps),
        })
    }

    #[inline]
    pub fn hierarchy(&self) -> &Arc<BoneHierarchy> {
        &self.hierarchy
    }

    #[inline]
    pub fn cells(&self) -> &CellCatalog {
        &self.cells
    }

    pub fn animation(&self, name: &str) -> Option<&Arc<Animation>> {
        self.by_name.get(name).map(|&i| &self.animations[i])
    }

    pub fn animations(&self) -> impl Iterator<Item = &Arc<Animation>> {
        self.animations.iter()
    }
}
