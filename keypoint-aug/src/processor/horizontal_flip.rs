use super::EngineOutput;
use crate::{common::*, error::TransformError};
use image::imageops;

/// Mirror a sample along its vertical axis.
///
/// Box edges map as `x' = w - x`. Keypoints are pixel indices and map as
/// `x' = (w - 1) - x`.
pub fn horizontal_flip(sample: EngineOutput) -> Result<EngineOutput, TransformError> {
    let width = sample.size().w() as f64;
    let box_transform = Transform::horizontal_flip(width);
    let keypoint_transform = Transform::horizontal_flip(width - 1.0);
    let image = imageops::flip_horizontal(&sample.image);
    sample.map_geometry(image, &box_transform, &keypoint_transform)
}
