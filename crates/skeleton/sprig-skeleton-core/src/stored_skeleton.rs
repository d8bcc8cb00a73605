//! Public API: parse a skeleton-set JSON document into a resolved
//! [`SkeletonSet`].
//!
//! Notes:
//! - Only version 1 documents with kind `"skeleton-set"` are accepted; any
//!   other version or kind is a fatal configuration error.
//! - Key times are frames; values use the tagged `{ "type", "data" }` form.
//! - Bone/animation validation happens in `SkeletonSet::from_data`.

use crate::animation::SkeletonSet;
use crate::data::{SkeletonSetData, SKELETON_SET_KIND, SUPPORTED_VERSION};
use crate::error::{Error, Result};

pub fn parse_skeleton_set_json(s: &str) -> Result<SkeletonSet> {
    let data: SkeletonSetData = serde_json::from_str(s)?;
    SkeletonSet::from_data(data)
}

pub(crate) fn check_header(data: &SkeletonSetData) -> Result<()> {
    if data.version != SUPPORTED_VERSION {
        return Err(Error::UnsupportedVersion {
            found: data.version,
            supported: SUPPORTED_VERSION,
        });
    }
    if data.kind != SKELETON_SET_KIND {
        return Err(Error::UnknownContentType {
            kind: data.kind.clone(),
        });
    }
    Ok(())
}
