//! Safe bounding box types and functions.

mod common;

pub use transform::*;
mod transform;

pub use rect::*;
pub mod rect;

pub use tlbr::*;
pub mod tlbr;

pub use tlhw::*;
pub mod tlhw;

pub use hw::*;
pub mod hw;

pub use point::*;
pub mod point;

pub mod prelude {
    pub use crate::rect::{Rect, RectFloat, RectNum};
}
