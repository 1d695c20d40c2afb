//! Runs every registered transform over every source file of a split.

use crate::{
    annotation::{self, AnnotationRecord, BoxFormat, EngineBox, EngineKeypoint},
    common::*,
    config::{Config, SplitConfig},
    dataset::{self, Split, ANNOTATION_EXTENSION, IMAGE_EXTENSION},
    debug_log::DebugLog,
    error::{AugmentError, ErrorKind},
    processor::EngineOutput,
    registry::TransformRegistry,
};

/// Augments dataset splits.
///
/// The augmenter owns the random generator, so runs with the same seed,
/// registry and inputs produce the same outputs.
#[derive(Debug)]
pub struct Augmenter {
    config: Config,
    registry: TransformRegistry,
    rng: StdRng,
    debug_log: Option<DebugLog>,
}

impl Augmenter {
    /// Create an augmenter.
    ///
    /// If the config names a subset of transforms, the registry is narrowed
    /// to it, failing on unknown names before anything is written.
    pub fn new(config: Config, registry: TransformRegistry) -> Result<Self, AugmentError> {
        let registry = match &config.augmentation.transforms {
            Some(names) => registry.select(names)?,
            None => registry,
        };
        let rng = match config.augmentation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let debug_log = config
            .logging
            .debug_log
            .as_ref()
            .map(DebugLog::open)
            .transpose()?;

        Ok(Self {
            config,
            registry,
            rng,
            debug_log,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// Augment every annotation file of a split.
    ///
    /// Failures of single files or transforms are collected in the report.
    /// Only an unreadable annotation directory or output directories that
    /// cannot be created abort the run.
    pub fn run(&mut self, split: Split) -> Result<RunReport, AugmentError> {
        let dirs = self.config.split(split).clone();
        for dir in [&dirs.augmented_image_dir, &dirs.augmented_annotation_dir] {
            fs::create_dir_all(dir).map_err(|err| AugmentError::io(dir, err))?;
        }

        let files = dataset::list_annotation_files(&dirs.annotation_dir)?;
        info!(
            "augment {} annotation files of the {} split with {} transforms",
            files.len(),
            split,
            self.registry.len()
        );

        let mut report = RunReport::default();
        for file_name in &files {
            self.augment_file(&dirs, file_name, &mut report);
        }

        report.log_summary();
        Ok(report)
    }

    fn augment_file(&mut self, dirs: &SplitConfig, file_name: &str, report: &mut RunReport) {
        let annotation_path = dirs.annotation_dir.join(file_name);
        let record = match annotation::load(&annotation_path) {
            Ok(record) => record,
            Err(err) => {
                warn!("skip '{}': {}", annotation_path.display(), error_chain(&err));
                report.fail_all(file_name, self.registry.names(), &err);
                return;
            }
        };

        let image_path = dataset::resolve_image_path(file_name, &dirs.image_dir);
        let image = match image::open(&image_path) {
            Ok(image) => image.to_rgb8(),
            Err(source) => {
                let err = AugmentError::ImageLoad {
                    path: image_path,
                    source,
                };
                warn!("skip '{}': {}", file_name, error_chain(&err));
                report.fail_all(file_name, self.registry.names(), &err);
                return;
            }
        };

        let class_label = record.class_label();
        let (boxes, keypoints) = annotation::to_engine_format(&record, &class_label);
        let labels = vec![self.config.augmentation.keypoint_label.clone(); keypoints.len()];

        let names: Vec<String> = self.registry.names().map(str::to_owned).collect();
        for name in &names {
            let result = self.augment_one(
                dirs,
                file_name,
                name,
                &record,
                Input {
                    image: &image,
                    boxes: &boxes,
                    keypoints: &keypoints,
                    labels: &labels,
                },
            );

            match result {
                Ok(sample) => report.push_success(sample, self.config.augmentation.keep_samples),
                Err(err) => {
                    warn!(
                        "failed to augment {} of type {}: {}",
                        file_name,
                        name,
                        error_chain(&err)
                    );
                    report.push_failure(file_name, name, &err);
                }
            }
        }
    }

    fn augment_one(
        &mut self,
        dirs: &SplitConfig,
        file_name: &str,
        transform: &str,
        record: &AnnotationRecord,
        input: Input<'_>,
    ) -> Result<AugmentedSample, AugmentError> {
        let box_format = self.config.augmentation.box_format;
        let output = self.registry.apply(
            transform,
            input.image.clone(),
            input.boxes.to_vec(),
            input.keypoints.to_vec(),
            input.labels,
            &mut self.rng,
        )?;
        let new_record =
            annotation::from_engine_format(record, &output.boxes, &output.keypoints, box_format)?;

        let image_path = dirs.augmented_image_dir.join(dataset::augmented_file_name(
            file_name,
            transform,
            IMAGE_EXTENSION,
        ));
        let annotation_path = dirs
            .augmented_annotation_dir
            .join(dataset::augmented_file_name(
                file_name,
                transform,
                ANNOTATION_EXTENSION,
            ));

        output
            .image
            .save(&image_path)
            .map_err(|source| AugmentError::ImageSave {
                path: image_path.clone(),
                source,
            })?;
        if let Err(err) = annotation::save(&annotation_path, &new_record) {
            // outputs always come in pairs
            if let Err(rm_err) = fs::remove_file(&image_path) {
                warn!(
                    "unable to remove '{}': {}",
                    image_path.display(),
                    rm_err
                );
            }
            return Err(err);
        }
        info!(
            "wrote '{}' and '{}'",
            image_path.display(),
            annotation_path.display()
        );

        if let Some(debug_log) = &mut self.debug_log {
            if let Err(err) = debug_log.record(file_name, transform, record, &new_record) {
                warn!("{}", error_chain(&err));
            }
        }

        Ok(AugmentedSample {
            source: file_name.to_owned(),
            transform: transform.to_owned(),
            box_format,
            output,
            image_path,
            annotation_path,
        })
    }
}

/// Borrowed engine input of one source file, shared by all transforms.
struct Input<'a> {
    image: &'a RgbImage,
    boxes: &'a [EngineBox],
    keypoints: &'a [EngineKeypoint],
    labels: &'a [String],
}

/// A failed (source file, transform) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub source: String,
    pub transform: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to augment {} of type {}",
            self.source, self.transform
        )
    }
}

/// The output paths of a written sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub source: String,
    pub transform: String,
    pub image_path: PathBuf,
    pub annotation_path: PathBuf,
}

/// An augmented sample kept in memory for later inspection.
#[derive(Debug, Clone)]
pub struct AugmentedSample {
    pub source: String,
    pub transform: String,
    pub box_format: BoxFormat,
    pub output: EngineOutput,
    pub image_path: PathBuf,
    pub annotation_path: PathBuf,
}

/// The outcome of [Augmenter::run].
#[derive(Debug, Default)]
pub struct RunReport {
    written: Vec<Written>,
    failures: Vec<Failure>,
    samples: Vec<AugmentedSample>,
}

impl RunReport {
    pub fn written(&self) -> &[Written] {
        &self.written
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Samples kept when `keep_samples` is enabled.
    pub fn samples(&self) -> &[AugmentedSample] {
        &self.samples
    }

    /// One `failed to augment <file> of type <transform>` line per failure.
    pub fn failure_messages(&self) -> Vec<String> {
        self.failures.iter().map(|failure| failure.to_string()).collect()
    }

    fn push_success(&mut self, sample: AugmentedSample, keep_sample: bool) {
        self.written.push(Written {
            source: sample.source.clone(),
            transform: sample.transform.clone(),
            image_path: sample.image_path.clone(),
            annotation_path: sample.annotation_path.clone(),
        });
        if keep_sample {
            self.samples.push(sample);
        }
    }

    fn push_failure(&mut self, source: &str, transform: &str, err: &AugmentError) {
        self.failures.push(Failure {
            source: source.to_owned(),
            transform: transform.to_owned(),
            kind: err.kind(),
            message: error_chain(err),
        });
    }

    fn fail_all<'a>(
        &mut self,
        source: &str,
        transforms: impl IntoIterator<Item = &'a str>,
        err: &AugmentError,
    ) {
        for transform in transforms {
            self.push_failure(source, transform, err);
        }
    }

    fn log_summary(&self) {
        info!(
            "{} samples written, {} failed",
            self.written.len(),
            self.failures.len()
        );
        for failure in &self.failures {
            warn!("{} ({}): {}", failure, failure.kind, failure.message);
        }
    }
}

/// Render an error with its sources, outermost first.
fn error_chain(err: &AugmentError) -> String {
    anyhow::Chain::new(err).join(": ")
}
