//! The geometric transform engine.
//!
//! An image, its boxes and its keypoints always move through the engine
//! together so that the three stay consistent under every spatial operation.

use crate::{
    annotation::{EngineBox, EngineKeypoint},
    common::*,
    error::TransformError,
};

pub mod horizontal_flip;
pub mod resize;
pub mod shift_scale_rotate;

pub use horizontal_flip::*;
pub use resize::*;
pub use shift_scale_rotate::*;

/// An image with the boxes and keypoints drawn on its pixel grid.
#[derive(Debug, Clone)]
pub struct EngineOutput {
    pub image: RgbImage,
    pub boxes: Vec<EngineBox>,
    pub keypoints: Vec<EngineKeypoint>,
}

impl EngineOutput {
    /// Check engine inputs and pack them.
    ///
    /// Boxes must have positive area inside `[0, w] x [0, h]`. Keypoints
    /// must lie on the pixel grid `[0, w) x [0, h)` and come with one label
    /// each.
    pub fn try_new(
        image: RgbImage,
        boxes: Vec<EngineBox>,
        keypoints: Vec<EngineKeypoint>,
        labels: &[String],
    ) -> Result<Self, TransformError> {
        let (width, height) = image.dimensions();
        let size: HW<u32> = image.dimensions().into();
        if size.is_empty() {
            return Err(TransformError::EmptyImage);
        }
        let size: HW<f64> = size.cast();

        if let Some(label) = boxes
            .iter()
            .find(|label| label.rect.is_degenerate() || !label.rect.is_within(size.h(), size.w()))
        {
            return Err(TransformError::InvalidBox {
                voc: label.rect.voc(),
                width,
                height,
            });
        }

        if let Some(point) = keypoints.iter().find(|point| !size.contains(point)) {
            return Err(TransformError::KeypointOutOfBounds {
                x: point.x,
                y: point.y,
                width,
                height,
            });
        }

        if labels.len() != keypoints.len() {
            return Err(TransformError::LabelMismatch {
                keypoints: keypoints.len(),
                labels: labels.len(),
            });
        }

        Ok(Self {
            image,
            boxes,
            keypoints,
        })
    }

    pub fn size(&self) -> HW<u32> {
        self.image.dimensions().into()
    }

    /// Reject results whose boxes lost their area.
    pub fn validate(self) -> Result<Self, TransformError> {
        match self.boxes.iter().find(|label| label.rect.is_degenerate()) {
            Some(label) => Err(TransformError::DegenerateBox {
                voc: label.rect.voc(),
            }),
            None => Ok(self),
        }
    }

    /// Map every box and keypoint by the same transform, replacing the image.
    ///
    /// Boxes are clipped to the new canvas. Keypoints are kept as mapped even
    /// when they leave it.
    pub(crate) fn map_geometry(
        self,
        image: RgbImage,
        box_transform: &Transform<f64>,
        keypoint_transform: &Transform<f64>,
    ) -> Result<Self, TransformError> {
        let canvas: HW<f64> = HW::<u32>::from(image.dimensions()).cast();

        let boxes: Vec<_> = self
            .boxes
            .iter()
            .map(|label| {
                let mapped = box_transform * label;
                let rect = mapped
                    .rect
                    .clip_to(canvas.h(), canvas.w())
                    .ok_or(TransformError::DegenerateBox {
                        voc: mapped.rect.voc(),
                    })?;
                Ok(Label {
                    rect,
                    class: mapped.class,
                })
            })
            .collect::<Result<_, TransformError>>()?;

        let keypoints = self
            .keypoints
            .iter()
            .map(|point| point.transform(keypoint_transform))
            .collect();

        Ok(Self {
            image,
            boxes,
            keypoints,
        })
    }
}
