use super::{AnnotationFile, CategoryId};
use crate::common::*;
use anyhow::{ensure, format_err, Result};

/// The layout of the four numbers in a persisted `bbox`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    AsRefStr,
    StrumDisplay,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BoxFormat {
    /// `[x_min, y_min, width, height]`
    #[default]
    Coco,
    /// `[x_min, y_min, x_max, y_max]`
    PascalVoc,
}

impl BoxFormat {
    /// Interpret four persisted numbers as a box with positive area.
    pub fn decode(self, values: [f64; 4]) -> Result<TLBR<f64>> {
        ensure!(
            values.iter().all(|value| value.is_finite()),
            "bbox values must be finite, but get {:?}",
            values
        );

        match self {
            Self::Coco => {
                let [_x, _y, w, h] = values;
                ensure!(
                    w > 0.0 && h > 0.0,
                    "bbox width and height must be positive, but get {:?}",
                    values
                );
                TLBR::try_from_coco(values)
            }
            Self::PascalVoc => {
                let [x_min, y_min, x_max, y_max] = values;
                ensure!(
                    x_min < x_max && y_min < y_max,
                    "bbox corners must satisfy x_min < x_max and y_min < y_max, but get {:?}",
                    values
                );
                TLBR::try_from_voc(values)
            }
        }
    }

    /// Lay out a pixel box in this format.
    pub fn encode(self, rect: &TLBR<i64>) -> [i64; 4] {
        match self {
            Self::Coco => rect.coco(),
            Self::PascalVoc => rect.voc(),
        }
    }
}

/// A keypoint as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeypointTriple {
    pub x: f64,
    pub y: f64,
    /// 0 = not labeled, 1 = labeled but occluded, 2 = labeled and visible.
    pub visibility: f64,
}

impl KeypointTriple {
    pub fn point(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }

    pub fn is_labeled(&self) -> bool {
        self.visibility > 0.0
    }
}

/// A validated single-object annotation.
///
/// The record is immutable. Augmented records are new values built by
/// [from_engine_format](super::from_engine_format) from a clone of the
/// source document.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    document: AnnotationFile,
    box_format: BoxFormat,
    rect: TLBR<f64>,
    keypoints: Vec<KeypointTriple>,
}

impl AnnotationRecord {
    /// Validate a parsed document.
    ///
    /// The document must hold exactly one annotation whose box has positive
    /// area in `box_format` and whose keypoint list is made of triples.
    pub fn from_document(document: AnnotationFile, box_format: BoxFormat) -> Result<Self> {
        ensure!(
            document.annotations.len() == 1,
            "exactly one object annotation is expected, but get {}",
            document.annotations.len()
        );
        let annotation = &document.annotations[0];

        let values = numbers_to_f64(&annotation.bbox)
            .ok_or_else(|| format_err!("annotations[0].bbox must contain numbers"))?;
        let values: [f64; 4] = values.try_into().map_err(|values: Vec<f64>| {
            format_err!(
                "annotations[0].bbox must have 4 values, but get {}",
                values.len()
            )
        })?;
        let rect = box_format.decode(values)?;

        let flat = numbers_to_f64(&annotation.keypoints)
            .ok_or_else(|| format_err!("annotations[0].keypoints must contain numbers"))?;
        ensure!(
            flat.len() % 3 == 0,
            "annotations[0].keypoints length must be a multiple of 3, but get {}",
            flat.len()
        );
        ensure!(
            flat.iter().all(|value| value.is_finite()),
            "annotations[0].keypoints values must be finite"
        );
        let keypoints: Vec<_> = flat
            .chunks_exact(3)
            .map(|triple| KeypointTriple {
                x: triple[0],
                y: triple[1],
                visibility: triple[2],
            })
            .collect();

        Ok(Self {
            document,
            box_format,
            rect,
            keypoints,
        })
    }

    /// Build a record whose geometry was already checked by the caller.
    pub(crate) fn with_geometry(
        document: AnnotationFile,
        box_format: BoxFormat,
        rect: TLBR<f64>,
        keypoints: Vec<KeypointTriple>,
    ) -> Self {
        debug_assert_eq!(document.annotations.len(), 1);
        debug_assert!(!rect.is_degenerate());
        Self {
            document,
            box_format,
            rect,
            keypoints,
        }
    }

    pub fn document(&self) -> &AnnotationFile {
        &self.document
    }

    pub fn into_document(self) -> AnnotationFile {
        self.document
    }

    /// The `file_name` of the first image entry, if any.
    pub fn image_reference(&self) -> Option<&str> {
        self.document.images.first()?.file_name.as_deref()
    }

    /// The box in `(x_min, y_min, width, height)` form.
    pub fn bbox(&self) -> TLHW<f64> {
        self.rect.to_tlhw()
    }

    /// The box in corner form.
    pub fn rect(&self) -> &TLBR<f64> {
        &self.rect
    }

    /// The format the box is persisted in.
    pub fn box_format(&self) -> BoxFormat {
        self.box_format
    }

    pub fn keypoints(&self) -> &[KeypointTriple] {
        &self.keypoints
    }

    pub fn category_ids(&self) -> &[CategoryId] {
        &self.document.category_ids
    }

    /// The class label handed to the engine along with the box.
    pub fn class_label(&self) -> String {
        self.category_ids()
            .first()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }
}

fn numbers_to_f64(numbers: &[Number]) -> Option<Vec<f64>> {
    numbers.iter().map(|number| number.as_f64()).collect()
}
