//! Housekeeping of dataset directories.
//!
//! These operations act on the filesystem immediately. There is no dry run
//! and deletions cannot be undone.

use crate::{
    annotation::{self, BoxFormat},
    common::*,
    dataset,
    error::AugmentError,
};

/// Regular files directly inside `dir` whose name contains any substring.
fn matching_files<S>(dir: &Path, substrings: &[S]) -> Result<Vec<PathBuf>, AugmentError>
where
    S: AsRef<str>,
{
    let entries = fs::read_dir(dir).map_err(|err| AugmentError::io(dir, err))?;
    let mut paths = vec![];
    for entry in entries {
        let entry = entry.map_err(|err| AugmentError::io(dir, err))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if substrings
            .iter()
            .any(|substring| name.contains(substring.as_ref()))
        {
            paths.push(path);
        }
    }
    Ok(paths)
}

/// Delete the files in `dir` whose name contains any of `substrings`.
///
/// Returns the number of deleted files.
pub fn delete_matching<S>(dir: impl AsRef<Path>, substrings: &[S]) -> Result<usize, AugmentError>
where
    S: AsRef<str>,
{
    let dir = dir.as_ref();
    let paths = matching_files(dir, substrings)?;
    for path in &paths {
        fs::remove_file(path).map_err(|err| AugmentError::io(path, err))?;
        debug!("removed '{}'", path.display());
    }
    info!("removed {} files from '{}'", paths.len(), dir.display());
    Ok(paths.len())
}

/// Move the files in `dir` whose name contains any of `substrings` into
/// `dir/<substrings joined by '_'>`.
///
/// Returns the destination directory and the number of moved files.
pub fn move_matching<S>(
    dir: impl AsRef<Path>,
    substrings: &[S],
) -> Result<(PathBuf, usize), AugmentError>
where
    S: AsRef<str>,
{
    let dir = dir.as_ref();
    let dest_name = substrings.iter().map(|substring| substring.as_ref()).join("_");
    let dest_dir = dir.join(dest_name);

    let paths = matching_files(dir, substrings)?;
    fs::create_dir_all(&dest_dir).map_err(|err| AugmentError::io(&dest_dir, err))?;
    for path in &paths {
        // paths come from read_dir and always have a file name
        let target = dest_dir.join(path.file_name().unwrap_or_default());
        fs::rename(path, &target).map_err(|err| AugmentError::io(path, err))?;
        debug!("moved '{}' to '{}'", path.display(), target.display());
    }
    info!(
        "moved {} files from '{}' to '{}'",
        paths.len(),
        dir.display(),
        dest_dir.display()
    );
    Ok((dest_dir, paths.len()))
}

/// List the annotation files in `dir` holding a box without area.
///
/// Boxes are read in `box_format`. Files that cannot be parsed are logged and
/// skipped.
pub fn find_degenerate_boxes(
    dir: impl AsRef<Path>,
    box_format: BoxFormat,
) -> Result<Vec<PathBuf>, AugmentError> {
    let dir = dir.as_ref();
    let mut degenerate = vec![];

    for file_name in dataset::list_annotation_files(dir)? {
        let path = dir.join(&file_name);
        let document = match annotation::read_document(&path) {
            Ok(document) => document,
            Err(err) => {
                warn!("skip '{}': {}", path.display(), err);
                continue;
            }
        };

        let has_degenerate = document.annotations.iter().any(|annotation| {
            let values: Option<Vec<f64>> = annotation.bbox.iter().map(Number::as_f64).collect();
            match values.as_deref() {
                Some(&[a, b, c, d]) => box_format.decode([a, b, c, d]).is_err(),
                _ => true,
            }
        });
        if has_degenerate {
            warn!("'{}' has a degenerate box", path.display());
            degenerate.push(path);
        }
    }

    Ok(degenerate)
}

/// Remove the debug log if it exists.
///
/// Returns whether a file was removed.
pub fn remove_debug_log(path: impl AsRef<Path>) -> Result<bool, AugmentError> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => {
            info!("removed '{}'", path.display());
            Ok(true)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(AugmentError::io(path, err)),
    }
}
