//! Plain text log of the geometry of every written sample.

use crate::{annotation::AnnotationRecord, common::*, error::AugmentError};
use std::fs::{File, OpenOptions};

/// Appends one block per augmented sample.
#[derive(Debug)]
pub struct DebugLog {
    path: PathBuf,
    writer: io::BufWriter<File>,
}

impl DebugLog {
    /// Open the log for appending, creating it if missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AugmentError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| AugmentError::io(path, err))?;
        Ok(Self {
            path: path.to_owned(),
            writer: io::BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(
        &mut self,
        file_name: &str,
        transform: &str,
        old: &AnnotationRecord,
        new: &AnnotationRecord,
    ) -> Result<(), AugmentError> {
        write_block(&mut self.writer, file_name, transform, old, new)
            .map_err(|err| AugmentError::io(&self.path, err))
    }
}

fn write_block(
    writer: &mut impl Write,
    file_name: &str,
    transform: &str,
    old: &AnnotationRecord,
    new: &AnnotationRecord,
) -> io::Result<()> {
    let keypoints = |record: &AnnotationRecord| {
        record
            .keypoints()
            .iter()
            .map(|triple| format!("({}, {}, {})", triple.x, triple.y, triple.visibility))
            .join(", ")
    };

    writeln!(writer, "file: {}, transform: {}", file_name, transform)?;
    writeln!(writer, "old bbox: {:?}", old.bbox().coco())?;
    writeln!(writer, "new bbox: {:?}", new.bbox().coco())?;
    writeln!(writer, "old keypoints: [{}]", keypoints(old))?;
    writeln!(writer, "new keypoints: [{}]", keypoints(new))?;
    writer.flush()
}
