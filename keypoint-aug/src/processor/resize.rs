use super::EngineOutput;
use crate::{common::*, error::TransformError};
use image::imageops;

/// Stretch a sample onto a canvas of exactly `canvas` pixels.
///
/// The aspect ratio is not preserved. Coordinates scale by
/// `(canvas.w / w, canvas.h / h)`.
pub fn resize(sample: EngineOutput, canvas: HW<u32>) -> Result<EngineOutput, TransformError> {
    if canvas.is_empty() {
        return Err(TransformError::EmptyImage);
    }

    let orig_size = sample.size();
    let transform = Transform::from_sizes_exact(orig_size.cast::<f64>(), canvas.cast::<f64>());
    let image = if orig_size == canvas {
        sample.image.clone()
    } else {
        imageops::resize(&sample.image, canvas.w(), canvas.h(), FilterType::Triangle)
    };

    sample.map_geometry(image, &transform, &transform)
}
