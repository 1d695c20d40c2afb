use anyhow::{Context, Result};
use clap::{ArgEnum, Parser, Subcommand};
use keypoint_aug::{
    maintenance, registry::Perturbation, visualize, Augmenter, BoxFormat, Config, Split,
    TransformRegistry,
};
use prettytable::{cell, row, Table};
use std::{env, path::PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{filter::LevelFilter, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
/// Augment a keypoint dataset and inspect the results.
struct Args {
    #[clap(long, default_value = "aug.json5")]
    /// configuration file
    config_file: PathBuf,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Write augmented copies of every annotated image.
    Augment {
        #[clap(long = "split")]
        /// splits to augment, all splits if not given
        splits: Vec<Split>,
    },
    /// Draw boxes and keypoints onto images.
    Visualize {
        #[clap(long)]
        split: Split,
        #[clap(long)]
        /// read the augmented directories
        augmented: bool,
        #[clap(long)]
        /// directory for the drawn images
        output_dir: PathBuf,
    },
    /// List annotation files with degenerate boxes.
    Check {
        #[clap(long)]
        split: Split,
        #[clap(long)]
        /// read the augmented directories
        augmented: bool,
    },
    /// Delete augmented files whose name contains any substring.
    Clean {
        #[clap(long)]
        split: Split,
        #[clap(long, arg_enum)]
        kind: FileKind,
        #[clap(long)]
        /// also remove the debug log
        debug_log: bool,
        #[clap(required = true)]
        substrings: Vec<String>,
    },
    /// Move augmented files whose name contains any substring into a
    /// sub-directory named after the substrings.
    Move {
        #[clap(long)]
        split: Split,
        #[clap(long, arg_enum)]
        kind: FileKind,
        #[clap(required = true)]
        substrings: Vec<String>,
    },
    /// Print the built-in transforms.
    ListTransforms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ArgEnum)]
enum FileKind {
    Image,
    Annotation,
}

fn main() -> Result<()> {
    // setup tracing
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true).compact();
    let filter_layer = {
        let filter = EnvFilter::from_default_env();
        if env::var("RUST_LOG").is_err() {
            filter.add_directive(LevelFilter::INFO.into())
        } else {
            filter
        }
    };
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let Args {
        config_file,
        command,
    } = Args::parse();

    let load_config = || {
        Config::open(&config_file)
            .with_context(|| format!("failed to load config file '{}'", config_file.display()))
    };

    match command {
        Command::Augment { splits } => augment(load_config()?, splits)?,
        Command::Visualize {
            split,
            augmented,
            output_dir,
        } => {
            let config = load_config()?;
            let dirs = config.split(split);
            let report = visualize::visualize_dir(
                dirs.annotation_dir(augmented),
                dirs.image_dir(augmented),
                &output_dir,
                box_format_of(&config, augmented),
            )?;
            info!(
                "{} images drawn, {} skipped",
                report.drawn.len(),
                report.skipped.len()
            );
        }
        Command::Check { split, augmented } => {
            let config = load_config()?;
            let dir = config.split(split).annotation_dir(augmented);
            let paths = maintenance::find_degenerate_boxes(dir, box_format_of(&config, augmented))?;
            if paths.is_empty() {
                info!("no degenerate boxes in '{}'", dir.display());
            }
            paths.iter().for_each(|path| println!("{}", path.display()));
        }
        Command::Clean {
            split,
            kind,
            debug_log,
            substrings,
        } => {
            let config = load_config()?;
            let dir = augmented_dir(&config, split, kind);
            let count = maintenance::delete_matching(&dir, &substrings)?;
            info!("deleted {} files in '{}'", count, dir.display());

            if debug_log {
                match &config.logging.debug_log {
                    Some(path) => {
                        maintenance::remove_debug_log(path)?;
                    }
                    None => warn!("no debug log is configured"),
                }
            }
        }
        Command::Move {
            split,
            kind,
            substrings,
        } => {
            let config = load_config()?;
            let dir = augmented_dir(&config, split, kind);
            let (dest_dir, count) = maintenance::move_matching(&dir, &substrings)?;
            info!("moved {} files to '{}'", count, dest_dir.display());
        }
        Command::ListTransforms => list_transforms(),
    }

    Ok(())
}

fn augment(config: Config, splits: Vec<Split>) -> Result<()> {
    let splits = if splits.is_empty() {
        Split::ALL.to_vec()
    } else {
        splits
    };

    let mut augmenter = Augmenter::new(config, TransformRegistry::standard())?;
    for split in splits {
        let report = augmenter
            .run(split)
            .with_context(|| format!("failed to augment the {} split", split))?;
        for message in report.failure_messages() {
            println!("{}", message);
        }
    }

    Ok(())
}

fn list_transforms() {
    let registry = TransformRegistry::standard();
    let mut table = Table::new();
    table.add_row(row!["name", "canvas (h x w)", "perturbation", "parameters"]);

    registry.iter().for_each(|spec| {
        let canvas = spec.canvas();
        let parameters = match spec.perturbation() {
            Perturbation::ShiftScaleRotate(ssr) => format!(
                "shift {:?}, scale {:?}, rotate {:?}",
                ssr.shift_limit(),
                ssr.scale_limit(),
                ssr.rotate_limit()
            ),
            Perturbation::None | Perturbation::HorizontalFlip => String::new(),
        };
        table.add_row(row![
            spec.name(),
            format!("{} x {}", canvas.h(), canvas.w()),
            spec.perturbation().as_ref(),
            parameters
        ]);
    });

    table.printstd();
}

/// Source files always store COCO boxes.
fn box_format_of(config: &Config, augmented: bool) -> BoxFormat {
    if augmented {
        config.augmentation.box_format
    } else {
        BoxFormat::Coco
    }
}

fn augmented_dir(config: &Config, split: Split, kind: FileKind) -> PathBuf {
    let dirs = config.split(split);
    match kind {
        FileKind::Image => dirs.augmented_image_dir.clone(),
        FileKind::Annotation => dirs.augmented_annotation_dir.clone(),
    }
}
