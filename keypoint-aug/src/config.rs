//! Configuration file.

use crate::{annotation::BoxFormat, common::*, dataset::Split};
use anyhow::Result;

pub static CONFIG_VERSION: Lazy<VersionReq> = Lazy::new(|| VersionReq::parse("0.1.0").unwrap());

/// The label attached to every keypoint handed to the engine.
pub const DEFAULT_KEYPOINT_LABEL: &str = "keypoint";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_version")]
    pub version: Version,
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub augmentation: AugmentationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }

    pub fn split(&self, split: Split) -> &SplitConfig {
        match split {
            Split::Train => &self.dataset.train,
            Split::Test => &self.dataset.test,
        }
    }
}

/// Directories of both splits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub train: SplitConfig,
    pub test: SplitConfig,
}

/// Source and output directories of a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    pub image_dir: PathBuf,
    pub annotation_dir: PathBuf,
    pub augmented_image_dir: PathBuf,
    pub augmented_annotation_dir: PathBuf,
}

impl SplitConfig {
    pub fn image_dir(&self, augmented: bool) -> &Path {
        if augmented {
            &self.augmented_image_dir
        } else {
            &self.image_dir
        }
    }

    pub fn annotation_dir(&self, augmented: bool) -> &Path {
        if augmented {
            &self.augmented_annotation_dir
        } else {
            &self.annotation_dir
        }
    }
}

/// Augmentation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentationConfig {
    /// Optional subset of the built-in transforms, in the order to run them.
    #[serde(default)]
    pub transforms: Option<Vec<String>>,
    /// Seed of the random generator. Entropy is used if not set.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Layout of `bbox` in the written annotation files.
    #[serde(default)]
    pub box_format: BoxFormat,
    #[serde(default = "default_keypoint_label")]
    pub keypoint_label: String,
    /// Keep every augmented sample in memory and return it in the run report.
    #[serde(default)]
    pub keep_samples: bool,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            transforms: None,
            seed: None,
            box_format: BoxFormat::default(),
            keypoint_label: default_keypoint_label(),
            keep_samples: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Append old and new geometry of every written sample to this file.
    #[serde(default)]
    pub debug_log: Option<PathBuf>,
}

fn default_keypoint_label() -> String {
    DEFAULT_KEYPOINT_LABEL.to_owned()
}

pub fn deserialize_version<'de, D>(deserializer: D) -> Result<Version, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    let version = Version::parse(&text).map_err(|err| {
        D::Error::custom(format!(
            "failed to parse version number '{}': {:?}",
            text, err
        ))
    })?;

    if !CONFIG_VERSION.matches(&version) {
        return Err(D::Error::custom(format!(
            "incompatible version: get '{}', but it is incompatible with requirement '{}'",
            version, &*CONFIG_VERSION,
        )));
    }

    Ok(version)
}
