//! Dataset layout: splits, annotation listing and path resolution.

pub use index::*;
mod index;

pub use split::*;
mod split;
