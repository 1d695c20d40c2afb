use anyhow::Result;
use bbox::prelude::*;
use image::{Rgb, RgbImage};
use keypoint_aug::{
    annotation,
    config::{AugmentationConfig, DatasetConfig, LoggingConfig, SplitConfig},
    registry, Augmenter, BoxFormat, Config, ErrorKind, Split, TransformRegistry,
};
use semver::Version;
use serde_json::{json, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};

const TRANSFORM_COUNT: usize = 5;

fn split_config(root: &Path, split: &str) -> SplitConfig {
    let dir = root.join(split);
    SplitConfig {
        image_dir: dir.join("images"),
        annotation_dir: dir.join("annotations"),
        augmented_image_dir: dir.join("augmented_images"),
        augmented_annotation_dir: dir.join("augmented_annotations"),
    }
}

fn config(root: &Path) -> Config {
    Config {
        version: Version::new(0, 1, 0),
        dataset: DatasetConfig {
            train: split_config(root, "train"),
            test: split_config(root, "test"),
        },
        augmentation: AugmentationConfig {
            seed: Some(7),
            ..Default::default()
        },
        logging: LoggingConfig::default(),
    }
}

fn annotation_json(image_name: &str) -> Value {
    json!({
        "annotations": [{
            "id": 1,
            "bbox": [100, 50, 80, 60],
            "keypoints": [110, 60, 2, 140, 80, 1, 170, 100, 0],
            "num_keypoints": 2
        }],
        "category_ids": [1],
        "images": [{ "file_name": image_name, "width": 320, "height": 180 }]
    })
}

/// Write `<stem>.json` and, if `with_image`, `<stem>.jpg` into the split.
fn add_source(dirs: &SplitConfig, stem: &str, with_image: bool) -> Result<()> {
    fs::create_dir_all(&dirs.image_dir)?;
    fs::create_dir_all(&dirs.annotation_dir)?;

    let image_name = format!("{}.jpg", stem);
    fs::write(
        dirs.annotation_dir.join(format!("{}.json", stem)),
        serde_json::to_vec(&annotation_json(&image_name))?,
    )?;
    if with_image {
        let image = RgbImage::from_fn(320, 180, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
        image.save(dirs.image_dir.join(image_name))?;
    }
    Ok(())
}

fn sorted_file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = vec![];
    for entry in fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

fn expected_outputs(stems: &[&str], ext: &str) -> Vec<String> {
    let mut names: Vec<_> = stems
        .iter()
        .flat_map(|stem| {
            TransformRegistry::standard()
                .names()
                .map(|transform| format!("{}_{}_augmented.{}", stem, transform, ext))
                .collect::<Vec<_>>()
        })
        .collect();
    names.sort();
    names
}

#[test]
fn two_sources_give_ten_pairs() -> Result<()> {
    let root = tempfile::tempdir()?;
    let config = config(root.path());
    let dirs = config.split(Split::Train).clone();
    add_source(&dirs, "alpha", true)?;
    add_source(&dirs, "beta", true)?;

    let mut augmenter = Augmenter::new(config, TransformRegistry::standard())?;
    let report = augmenter.run(Split::Train)?;

    assert!(report.failures().is_empty(), "{:?}", report.failure_messages());
    assert_eq!(report.written().len(), 2 * TRANSFORM_COUNT);
    assert!(report.samples().is_empty());
    assert_eq!(
        sorted_file_names(&dirs.augmented_image_dir)?,
        expected_outputs(&["alpha", "beta"], "jpg")
    );
    assert_eq!(
        sorted_file_names(&dirs.augmented_annotation_dir)?,
        expected_outputs(&["alpha", "beta"], "json")
    );

    for written in report.written() {
        let image = image::open(&written.image_path)?.to_rgb8();
        assert_eq!(image.dimensions(), (640, 360));

        let record = annotation::load(&written.annotation_path)?;
        let bbox = record.bbox();
        assert!(bbox.w() > 0.0 && bbox.h() > 0.0);
        assert_eq!(record.keypoints().len(), 3);

        // untouched fields are copied from the source
        let document = record.document();
        assert_eq!(document.annotations[0].extra["id"], json!(1));
        assert_eq!(document.images[0].extra["width"], json!(320));
    }

    Ok(())
}

#[test]
fn resize_output_is_exact() -> Result<()> {
    let root = tempfile::tempdir()?;
    let mut config = config(root.path());
    config.augmentation.transforms = Some(vec![registry::RESIZE.to_owned()]);
    let dirs = config.split(Split::Test).clone();
    add_source(&dirs, "alpha", true)?;

    let report = Augmenter::new(config, TransformRegistry::standard())?.run(Split::Test)?;
    assert_eq!(report.written().len(), 1);

    let text = fs::read_to_string(&report.written()[0].annotation_path)?;
    let value: Value = serde_json::from_str(&text)?;
    assert_eq!(value["annotations"][0]["bbox"], json!([200, 100, 160, 120]));
    assert_eq!(
        value["annotations"][0]["keypoints"],
        json!([220, 120, 2, 280, 160, 1, 340, 200, 0])
    );
    Ok(())
}

#[test]
fn horizontal_flip_keeps_visibility() -> Result<()> {
    let root = tempfile::tempdir()?;
    let mut config = config(root.path());
    config.augmentation.transforms = Some(vec![registry::HORIZONTAL_FLIP.to_owned()]);
    config.augmentation.box_format = BoxFormat::PascalVoc;
    let dirs = config.split(Split::Train).clone();
    add_source(&dirs, "alpha", true)?;

    let report = Augmenter::new(config, TransformRegistry::standard())?.run(Split::Train)?;
    let record =
        annotation::load_with_format(&report.written()[0].annotation_path, BoxFormat::PascalVoc)?;

    let bbox = &record.document().annotations[0].bbox;
    let bbox: Vec<_> = bbox.iter().map(|value| value.as_i64().unwrap()).collect();
    assert_eq!(bbox, [280, 100, 440, 220]);

    // flags stay as labeled even though points moved
    let flags: Vec<_> = record
        .keypoints()
        .iter()
        .map(|triple| triple.visibility)
        .collect();
    assert_eq!(flags, [2.0, 1.0, 0.0]);
    assert_eq!(record.keypoints()[0].x, 419.0);
    Ok(())
}

#[test]
fn missing_image_fails_every_transform() -> Result<()> {
    let root = tempfile::tempdir()?;
    let config = config(root.path());
    let dirs = config.split(Split::Train).clone();
    add_source(&dirs, "alpha", true)?;
    add_source(&dirs, "lost", false)?;

    let report = Augmenter::new(config, TransformRegistry::standard())?.run(Split::Train)?;

    assert_eq!(report.written().len(), TRANSFORM_COUNT);
    assert_eq!(report.failures().len(), TRANSFORM_COUNT);
    assert!(report
        .failures()
        .iter()
        .all(|failure| failure.source == "lost.json" && failure.kind == ErrorKind::ImageLoad));
    assert!(report
        .failure_messages()
        .contains(&"failed to augment lost.json of type resize".to_owned()));

    let written = sorted_file_names(&dirs.augmented_image_dir)?;
    assert!(written.iter().all(|name| !name.starts_with("lost")));
    let written = sorted_file_names(&dirs.augmented_annotation_dir)?;
    assert!(written.iter().all(|name| !name.starts_with("lost")));
    Ok(())
}

#[test]
fn malformed_annotation_fails_every_transform() -> Result<()> {
    let root = tempfile::tempdir()?;
    let config = config(root.path());
    let dirs = config.split(Split::Train).clone();
    add_source(&dirs, "alpha", true)?;
    fs::write(
        dirs.annotation_dir.join("two_objects.json"),
        serde_json::to_vec(&json!({
            "annotations": [
                { "bbox": [1, 1, 5, 5], "keypoints": [] },
                { "bbox": [1, 1, 5, 5], "keypoints": [] }
            ],
            "category_ids": [1]
        }))?,
    )?;

    let report = Augmenter::new(config, TransformRegistry::standard())?.run(Split::Train)?;
    assert_eq!(report.written().len(), TRANSFORM_COUNT);
    assert_eq!(report.failures().len(), TRANSFORM_COUNT);
    assert!(report
        .failures()
        .iter()
        .all(|failure| failure.kind == ErrorKind::MalformedData));
    Ok(())
}

#[test]
fn written_plus_failed_covers_every_pair() -> Result<()> {
    let root = tempfile::tempdir()?;
    let config = config(root.path());
    let dirs = config.split(Split::Train).clone();
    add_source(&dirs, "alpha", true)?;
    add_source(&dirs, "beta", true)?;

    // a keypoint outside the image is rejected by the engine for every transform
    let mut document = annotation_json("beta.jpg");
    document["annotations"][0]["keypoints"] = json!([400, 60, 2]);
    fs::write(
        dirs.annotation_dir.join("beta.json"),
        serde_json::to_vec(&document)?,
    )?;

    let report = Augmenter::new(config, TransformRegistry::standard())?.run(Split::Train)?;
    assert_eq!(
        report.written().len() + report.failures().len(),
        2 * TRANSFORM_COUNT
    );
    assert_eq!(report.failures().len(), TRANSFORM_COUNT);
    assert!(report
        .failures()
        .iter()
        .all(|failure| failure.kind == ErrorKind::Transform));
    assert_eq!(
        sorted_file_names(&dirs.augmented_image_dir)?.len(),
        report.written().len()
    );
    assert_eq!(
        sorted_file_names(&dirs.augmented_annotation_dir)?.len(),
        report.written().len()
    );
    Ok(())
}

#[test]
fn unknown_transform_writes_nothing() -> Result<()> {
    let root = tempfile::tempdir()?;
    let mut config = config(root.path());
    config.augmentation.transforms = Some(vec!["resize".to_owned(), "vertical_flip".to_owned()]);
    let dirs = config.split(Split::Train).clone();
    add_source(&dirs, "alpha", true)?;

    let err = Augmenter::new(config, TransformRegistry::standard()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownTransform);
    assert!(!dirs.augmented_image_dir.exists());
    assert!(!dirs.augmented_annotation_dir.exists());
    Ok(())
}

#[test]
fn seeded_runs_are_reproducible() -> Result<()> {
    let run = |root: &Path| -> Result<Vec<String>> {
        let config = config(root);
        let dirs = config.split(Split::Train).clone();
        add_source(&dirs, "alpha", true)?;
        Augmenter::new(config, TransformRegistry::standard())?.run(Split::Train)?;

        let mut texts = vec![];
        for name in sorted_file_names(&dirs.augmented_annotation_dir)? {
            texts.push(fs::read_to_string(dirs.augmented_annotation_dir.join(name))?);
        }
        Ok(texts)
    };

    let lhs = tempfile::tempdir()?;
    let rhs = tempfile::tempdir()?;
    assert_eq!(run(lhs.path())?, run(rhs.path())?);
    Ok(())
}

#[test]
fn keep_samples_and_debug_log() -> Result<()> {
    let root = tempfile::tempdir()?;
    let log_path: PathBuf = root.path().join("debug_log.txt");
    let mut config = config(root.path());
    config.augmentation.keep_samples = true;
    config.logging.debug_log = Some(log_path.clone());
    let dirs = config.split(Split::Train).clone();
    add_source(&dirs, "alpha", true)?;

    let report = Augmenter::new(config, TransformRegistry::standard())?.run(Split::Train)?;
    assert_eq!(report.samples().len(), TRANSFORM_COUNT);
    for sample in report.samples() {
        assert_eq!(sample.output.image.dimensions(), (640, 360));
        assert_eq!(sample.output.keypoints.len(), 3);
        assert!(sample.annotation_path.is_file());
    }

    let text = fs::read_to_string(&log_path)?;
    assert_eq!(text.matches("file: alpha.json").count(), TRANSFORM_COUNT);
    Ok(())
}

#[test]
fn failed_annotation_write_removes_image() -> Result<()> {
    let root = tempfile::tempdir()?;
    let mut config = config(root.path());
    config.augmentation.transforms = Some(vec![registry::RESIZE.to_owned()]);
    let dirs = config.split(Split::Train).clone();
    add_source(&dirs, "alpha", true)?;

    // a directory in place of the output annotation makes the write fail
    fs::create_dir_all(dirs.augmented_annotation_dir.join("alpha_resize_augmented.json"))?;

    let report = Augmenter::new(config, TransformRegistry::standard())?.run(Split::Train)?;
    assert!(report.written().is_empty());
    assert_eq!(
        report.failure_messages(),
        ["failed to augment alpha.json of type resize"]
    );
    assert_eq!(report.failures()[0].kind, ErrorKind::Io);
    assert!(sorted_file_names(&dirs.augmented_image_dir)?.is_empty());
    Ok(())
}
