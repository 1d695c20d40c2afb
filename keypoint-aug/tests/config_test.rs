use anyhow::Result;
use keypoint_aug::{Augmenter, BoxFormat, Config, Split, TransformRegistry};
use std::path::Path;

#[test]
fn sample_config_test() -> Result<()> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("aug.json5");
    let config = Config::open(&path)?;
    assert_eq!(config.augmentation.box_format, BoxFormat::Coco);
    assert_eq!(config.augmentation.seed, None);
    assert!(config
        .split(Split::Train)
        .annotation_dir
        .ends_with("train/annotations"));

    let augmenter = Augmenter::new(config, TransformRegistry::standard())?;
    let names: Vec<_> = augmenter.registry().names().collect();
    let standard = TransformRegistry::standard();
    let expect: Vec<_> = standard.names().collect();
    assert_eq!(names, expect);
    Ok(())
}
