use crate::{common::*, error::AugmentError};

/// Extension of source and augmented images.
pub const IMAGE_EXTENSION: &str = "jpg";
/// Extension of annotation files.
pub const ANNOTATION_EXTENSION: &str = "json";

/// List the names of the `.json` files directly inside `dir`.
///
/// The names come in directory listing order, which is not sorted.
pub fn list_annotation_files(dir: impl AsRef<Path>) -> Result<Vec<String>, AugmentError> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|err| AugmentError::io(dir, err))?;

    let mut names = vec![];
    for entry in entries {
        let entry = entry.map_err(|err| AugmentError::io(dir, err))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(name) => {
                warn!("skip non UTF-8 file name {:?}", name);
                continue;
            }
        };
        if name.ends_with(".json") {
            names.push(name);
        }
    }

    Ok(names)
}

/// The image of an annotation file: same stem, `.jpg`, inside `image_dir`.
///
/// The path is not checked for existence.
pub fn resolve_image_path(annotation_file: &str, image_dir: impl AsRef<Path>) -> PathBuf {
    let image_name = Path::new(annotation_file).with_extension(IMAGE_EXTENSION);
    image_dir.as_ref().join(image_name)
}

/// `<stem>_<transform>_augmented.<ext>`
pub fn augmented_file_name(annotation_file: &str, transform: &str, ext: &str) -> String {
    let stem = Path::new(annotation_file)
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    format!("{}_{}_augmented.{}", stem, transform, ext)
}
