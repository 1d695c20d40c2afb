//! Keypoint and bounding box dataset augmentation.
//!
//! Every labeled image of a dataset split is pushed through a fixed set of
//! named geometric transforms. The image, its single bounding box and its
//! keypoints are transformed together and written back as new image and
//! annotation pairs.

mod common;
pub mod annotation;
pub mod config;
pub mod dataset;
pub mod debug_log;
pub mod error;
pub mod maintenance;
pub mod orchestrator;
pub mod processor;
pub mod registry;
pub mod visualize;

pub use annotation::{AnnotationRecord, BoxFormat, EngineBox, EngineKeypoint};
pub use config::Config;
pub use dataset::Split;
pub use error::{AugmentError, ErrorKind, TransformError};
pub use orchestrator::{Augmenter, Failure, RunReport};
pub use registry::{TransformRegistry, TransformSpec};
