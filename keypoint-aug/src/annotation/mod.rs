//! Annotation files and their conversion to the transform engine layout.

use crate::common::*;

pub use codec::*;
mod codec;

pub use record::*;
mod record;

pub use schema::*;
mod schema;

/// A box in corner form tagged with its class label.
pub type EngineBox = Label<TLBR<f64>, String>;

/// A keypoint position. Visibility travels separately.
pub type EngineKeypoint = Point<f64>;
