use crate::common::*;

/// The persisted annotation document.
///
/// Only the keys the augmenter reads are typed. Every other key, at any
/// level, is kept in `extra` and written back as it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationFile {
    pub annotations: Vec<ObjectAnnotation>,
    pub category_ids: Vec<CategoryId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One annotated object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectAnnotation {
    /// The box, either `[x, y, w, h]` or `[x_min, y_min, x_max, y_max]`.
    pub bbox: Vec<Number>,
    /// Flattened `(x, y, visibility)` triples.
    pub keypoints: Vec<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A class identifier, stored either as an integer or as a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryId {
    Index(i64),
    Name(String),
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{}", index),
            Self::Name(name) => write!(f, "{}", name),
        }
    }
}
