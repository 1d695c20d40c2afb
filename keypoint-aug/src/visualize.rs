//! Overlay boxes and keypoints on images for manual inspection.

use crate::{
    annotation::{self, BoxFormat, KeypointTriple},
    common::*,
    dataset,
    error::AugmentError,
    processor::EngineOutput,
};
use imageproc::{
    drawing::{draw_filled_circle_mut, draw_hollow_rect_mut},
    rect::Rect as PixelRect,
};

pub const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const KEYPOINT_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const KEYPOINT_RADIUS: i32 = 1;

/// Draw the box outline and every labeled keypoint.
pub fn draw_annotation(image: &mut RgbImage, bbox: &TLBR<f64>, keypoints: &[KeypointTriple]) {
    draw_box(image, bbox);
    keypoints
        .iter()
        .filter(|triple| triple.is_labeled())
        .for_each(|triple| draw_keypoint(image, &triple.point()));
}

/// Draw an in-memory engine result. All keypoints are drawn.
pub fn draw_engine_sample(sample: &EngineOutput) -> RgbImage {
    let mut image = sample.image.clone();
    sample
        .boxes
        .iter()
        .for_each(|label| draw_box(&mut image, &label.rect));
    sample
        .keypoints
        .iter()
        .for_each(|point| draw_keypoint(&mut image, point));
    image
}

fn draw_box(image: &mut RgbImage, rect: &TLBR<f64>) {
    let left = rect.l() as i32;
    let top = rect.t() as i32;
    // the far edges are drawn too
    let width = (rect.r() as i32 - left + 1).max(1) as u32;
    let height = (rect.b() as i32 - top + 1).max(1) as u32;
    let rect = PixelRect::at(left, top).of_size(width, height);
    draw_hollow_rect_mut(image, rect, BOX_COLOR);
}

fn draw_keypoint(image: &mut RgbImage, point: &Point<f64>) {
    let center = (point.x as i32, point.y as i32);
    draw_filled_circle_mut(image, center, KEYPOINT_RADIUS, KEYPOINT_COLOR);
}

/// The outcome of [visualize_dir].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualizeReport {
    /// Images written to the output directory.
    pub drawn: Vec<PathBuf>,
    /// Annotation files that were skipped.
    pub skipped: Vec<String>,
}

/// Draw every annotation of `annotation_dir` onto its image.
///
/// The result is saved in `output_dir` under the image's file name. Files
/// that cannot be read or drawn are logged and skipped.
pub fn visualize_dir(
    annotation_dir: impl AsRef<Path>,
    image_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    box_format: BoxFormat,
) -> Result<VisualizeReport, AugmentError> {
    let annotation_dir = annotation_dir.as_ref();
    let image_dir = image_dir.as_ref();
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir).map_err(|err| AugmentError::io(output_dir, err))?;

    let mut report = VisualizeReport::default();
    for file_name in dataset::list_annotation_files(annotation_dir)? {
        match visualize_file(&file_name, annotation_dir, image_dir, output_dir, box_format) {
            Ok(path) => report.drawn.push(path),
            Err(err) => {
                warn!("skip '{}': {}", file_name, err);
                report.skipped.push(file_name);
            }
        }
    }

    info!(
        "drew {} images into '{}', skipped {}",
        report.drawn.len(),
        output_dir.display(),
        report.skipped.len()
    );
    Ok(report)
}

fn visualize_file(
    file_name: &str,
    annotation_dir: &Path,
    image_dir: &Path,
    output_dir: &Path,
    box_format: BoxFormat,
) -> Result<PathBuf, AugmentError> {
    let record = annotation::load_with_format(annotation_dir.join(file_name), box_format)?;
    let image_path = dataset::resolve_image_path(file_name, image_dir);
    let mut image = image::open(&image_path)
        .map_err(|source| AugmentError::ImageLoad {
            path: image_path.clone(),
            source,
        })?
        .to_rgb8();

    draw_annotation(&mut image, record.rect(), record.keypoints());

    // resolve_image_path always yields a file name
    let output_path = output_dir.join(image_path.file_name().unwrap_or_default());
    image
        .save(&output_path)
        .map_err(|source| AugmentError::ImageSave {
            path: output_path.clone(),
            source,
        })?;
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::tests::{labeled_box, labels};
    use serde_json::json;

    #[test]
    fn draws_box_and_labeled_keypoints() {
        let mut image = RgbImage::new(40, 30);
        let bbox = TLBR::try_from_voc([5.0, 5.0, 25.0, 20.0]).unwrap();
        let keypoints = [
            KeypointTriple {
                x: 10.0,
                y: 10.0,
                visibility: 2.0,
            },
            KeypointTriple {
                x: 30.0,
                y: 25.0,
                visibility: 0.0,
            },
        ];
        draw_annotation(&mut image, &bbox, &keypoints);

        assert_eq!(*image.get_pixel(5, 5), BOX_COLOR);
        assert_eq!(*image.get_pixel(25, 20), BOX_COLOR);
        assert_eq!(*image.get_pixel(25, 12), BOX_COLOR);
        assert_eq!(*image.get_pixel(15, 12), Rgb([0, 0, 0]));
        assert_eq!(*image.get_pixel(10, 10), KEYPOINT_COLOR);
        assert_eq!(*image.get_pixel(30, 25), Rgb([0, 0, 0]));
    }

    #[test]
    fn draws_engine_sample() {
        let sample = EngineOutput::try_new(
            RgbImage::new(40, 30),
            vec![labeled_box([0.0, 0.0, 10.0, 10.0])],
            vec![Point::new(20.0, 20.0)],
            &labels(1),
        )
        .unwrap();
        let image = draw_engine_sample(&sample);
        assert_eq!(*image.get_pixel(0, 0), BOX_COLOR);
        assert_eq!(*image.get_pixel(20, 20), KEYPOINT_COLOR);
        assert_eq!(*sample.image.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn visualize_skips_broken_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let annotation_dir = dir.path().join("annotations");
        let image_dir = dir.path().join("images");
        let output_dir = dir.path().join("plots");
        fs::create_dir_all(&annotation_dir).unwrap();
        fs::create_dir_all(&image_dir).unwrap();

        let document = json!({
            "annotations": [{ "bbox": [2, 2, 10, 10], "keypoints": [5, 5, 2] }],
            "category_ids": [1]
        });
        fs::write(
            annotation_dir.join("good.json"),
            serde_json::to_vec(&document).unwrap(),
        )
        .unwrap();
        fs::write(
            annotation_dir.join("no_image.json"),
            serde_json::to_vec(&document).unwrap(),
        )
        .unwrap();
        fs::write(annotation_dir.join("broken.json"), "[]").unwrap();
        RgbImage::new(32, 32).save(image_dir.join("good.jpg")).unwrap();
        RgbImage::new(32, 32).save(image_dir.join("broken.jpg")).unwrap();

        let report =
            visualize_dir(&annotation_dir, &image_dir, &output_dir, BoxFormat::Coco).unwrap();
        assert_eq!(report.drawn, vec![output_dir.join("good.jpg")]);
        assert_eq!(
            report.skipped.iter().sorted().collect::<Vec<_>>(),
            ["broken.json", "no_image.json"]
        );
        assert!(output_dir.join("good.jpg").is_file());
    }
}
