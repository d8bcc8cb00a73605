//! Error types for skeleton loading and runtime lookups.

/// Skeleton core result type
pub type Result<T> = core::result::Result<T, Error>;

/// Fatal configuration errors raised while resolving a skeleton set, and
/// lookup failures raised by the runtime API.
///
/// Recoverable conditions (unknown interpolation, unsupported collider
/// combinations) are logged instead of being returned.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("unsupported skeleton data version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("unknown content type '{kind}'")]
    UnknownContentType { kind: String },

    #[error("failed to parse skeleton data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("skeleton has no bones")]
    EmptySkeleton,

    #[error("duplicate bone name '{name}'")]
    DuplicateBone { name: String },

    #[error("bone 0 ('{name}') must be the root")]
    RootNotFirst { name: String },

    #[error("bone '{bone}' has invalid parent index {parent}")]
    InvalidParent { bone: String, parent: i32 },

    #[error("animation '{animation}' references unknown bone '{bone}'")]
    UnknownTrackBone { animation: String, bone: String },

    #[error("animation '{animation}' has invalid timing (fps {fps}, frame count {frame_count})")]
    InvalidTiming {
        animation: String,
        fps: f32,
        frame_count: u32,
    },

    #[error("keys of {attribute} on bone '{bone}' in '{animation}' are not in ascending time order")]
    UnsortedKeys {
        animation: String,
        bone: String,
        attribute: String,
    },

    #[error("key value of kind {found} does not fit {attribute} on bone '{bone}' in '{animation}'")]
    ValueKindMismatch {
        animation: String,
        bone: String,
        attribute: String,
        found: String,
    },

    #[error("duplicate animation name '{name}'")]
    DuplicateAnimation { name: String },

    #[error("animation not found: {name}")]
    UnknownAnimation { name: String },

    #[error("bone not found: {name}")]
    UnknownBone { name: String },

    #[error("attachment not found: {id}")]
    UnknownAttachment { id: u32 },

    #[error("collider not found: {id}")]
    UnknownCollider { id: u32 },
}

impl Error {
    /// Error category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnsupportedVersion { .. } | Self::UnknownContentType { .. } | Self::Json(_) => {
                "format"
            }
            Self::EmptySkeleton
            | Self::DuplicateBone { .. }
            | Self::RootNotFirst { .. }
            | Self::InvalidParent { .. }
            | Self::UnknownTrackBone { .. }
            | Self::InvalidTiming { .. }
            | Self::UnsortedKeys { .. }
            | Self::ValueKindMismatch { .. }
            | Self::DuplicateAnimation { .. } => "data",
            Self::UnknownAnimation { .. }
            | Self::UnknownBone { .. }
            | Self::UnknownAttachment { .. }
            | Self::UnknownCollider { .. } => "lookup",
        }
    }
}
