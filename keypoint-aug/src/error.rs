//! Error types.

use crate::common::*;
use thiserror::Error;

/// Failure categories, used to tag per-transform failure records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, StrumDisplay)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    MalformedData,
    ShapeMismatch,
    UnknownTransform,
    ImageLoad,
    Transform,
    Io,
}

#[derive(Debug, Error)]
pub enum AugmentError {
    #[error("file '{}' does not exist", .path.display())]
    NotFound { path: PathBuf },

    #[error("malformed annotation '{}': {reason}", .path.display())]
    MalformedData { path: PathBuf, reason: String },

    #[error("{what} count mismatch: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("unknown transform '{0}'")]
    UnknownTransform(String),

    #[error("failed to load image '{}'", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("I/O failure on '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to save image '{}'", .path.display())]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl AugmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::MalformedData { .. } => ErrorKind::MalformedData,
            Self::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            Self::UnknownTransform(_) => ErrorKind::UnknownTransform,
            Self::ImageLoad { .. } => ErrorKind::ImageLoad,
            Self::Transform(_) => ErrorKind::Transform,
            Self::Io { .. } | Self::ImageSave { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Display) -> Self {
        Self::MalformedData {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Rejections raised by the geometric transform engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("the input image is empty")]
    EmptyImage,

    #[error("box {voc:?} is not a valid box inside the {width}x{height} image")]
    InvalidBox {
        voc: [f64; 4],
        width: u32,
        height: u32,
    },

    #[error("keypoint ({x}, {y}) lies outside the {width}x{height} image")]
    KeypointOutOfBounds {
        x: f64,
        y: f64,
        width: u32,
        height: u32,
    },

    #[error("{keypoints} keypoints were given with {labels} labels")]
    LabelMismatch { keypoints: usize, labels: usize },

    #[error("box {voc:?} has no area left after the transform")]
    DegenerateBox { voc: [f64; 4] },

    #[error("the sampled transform is not invertible")]
    SingularTransform,
}
