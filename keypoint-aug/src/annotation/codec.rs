use super::{AnnotationFile, AnnotationRecord, BoxFormat, EngineBox, EngineKeypoint, KeypointTriple};
use crate::{common::*, error::AugmentError, TransformError};

/// Parse an annotation file without checking its geometry.
pub fn read_document(path: impl AsRef<Path>) -> Result<AnnotationFile, AugmentError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AugmentError::NotFound {
            path: path.to_owned(),
        });
    }

    let text = fs::read_to_string(path).map_err(|err| AugmentError::io(path, err))?;
    serde_json::from_str(&text).map_err(|err| AugmentError::malformed(path, err))
}

/// Load an annotation whose box is stored in COCO layout.
pub fn load(path: impl AsRef<Path>) -> Result<AnnotationRecord, AugmentError> {
    load_with_format(path, BoxFormat::Coco)
}

pub fn load_with_format(
    path: impl AsRef<Path>,
    box_format: BoxFormat,
) -> Result<AnnotationRecord, AugmentError> {
    let path = path.as_ref();
    let document = read_document(path)?;
    AnnotationRecord::from_document(document, box_format)
        .map_err(|err| AugmentError::malformed(path, err))
}

/// Write the whole document as compact JSON, replacing any existing file.
pub fn save(path: impl AsRef<Path>, record: &AnnotationRecord) -> Result<(), AugmentError> {
    let path = path.as_ref();
    let bytes = serde_json::to_vec(record.document())
        .map_err(|err| AugmentError::io(path, err.into()))?;
    fs::write(path, bytes).map_err(|err| AugmentError::io(path, err))
}

/// Split a record into the box and keypoint layout the engine consumes.
///
/// The single box becomes corners tagged with `class_label`. Keypoints keep
/// their order and lose their visibility flag.
pub fn to_engine_format(
    record: &AnnotationRecord,
    class_label: &str,
) -> (Vec<EngineBox>, Vec<EngineKeypoint>) {
    let boxes = vec![Label {
        rect: record.rect().clone(),
        class: class_label.to_owned(),
    }];
    let keypoints = record
        .keypoints()
        .iter()
        .map(|triple| triple.point())
        .collect();
    (boxes, keypoints)
}

/// Build the record of an augmented sample from the engine output.
///
/// The first box and every keypoint are truncated toward zero. The visibility
/// flags and every field the codec does not interpret are copied from
/// `original`.
pub fn from_engine_format(
    original: &AnnotationRecord,
    boxes: &[EngineBox],
    keypoints: &[EngineKeypoint],
    box_format: BoxFormat,
) -> Result<AnnotationRecord, AugmentError> {
    let engine_box = boxes.first().ok_or(AugmentError::ShapeMismatch {
        what: "box",
        expected: 1,
        found: 0,
    })?;
    if keypoints.len() != original.keypoints().len() {
        return Err(AugmentError::ShapeMismatch {
            what: "keypoint",
            expected: original.keypoints().len(),
            found: keypoints.len(),
        });
    }

    let rect = &engine_box.rect;
    let degenerate = || TransformError::DegenerateBox { voc: rect.voc() };
    let truncated: TLBR<i64> = rect.clone().try_cast().ok_or_else(degenerate)?;
    if truncated.is_degenerate() {
        return Err(degenerate().into());
    }

    let triples: Vec<_> = izip!(original.keypoints(), keypoints)
        .map(|(triple, point)| KeypointTriple {
            x: point.x as i64 as f64,
            y: point.y as i64 as f64,
            visibility: triple.visibility,
        })
        .collect();

    let mut document = original.document().clone();
    let annotation = &mut document.annotations[0];
    annotation.bbox = box_format
        .encode(&truncated)
        .into_iter()
        .map(Number::from)
        .collect();

    // visibility numbers are copied verbatim so that integer flags stay integers
    let visibilities: Vec<Number> = annotation
        .keypoints
        .iter()
        .skip(2)
        .step_by(3)
        .cloned()
        .collect();
    annotation.keypoints = izip!(keypoints, visibilities)
        .flat_map(|(point, visibility)| {
            [
                Number::from(point.x as i64),
                Number::from(point.y as i64),
                visibility,
            ]
        })
        .collect();

    Ok(AnnotationRecord::with_geometry(
        document,
        box_format,
        truncated.cast(),
        triples,
    ))
}
