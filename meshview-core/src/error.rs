/// Error types for mesh loading
use std::path::PathBuf;
use thiserror::Error;

/// A malformed record in a mesh source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("Malformed number: {0:?}")]
    InvalidNumber(String),
    #[error("Malformed index: {0:?}")]
    InvalidIndex(String),
    #[error("Face has {found} corners, at least 3 are required")]
    TooFewCorners { found: usize },
    #[error("Face corner {0:?} does not reference a normal")]
    MissingNormal(String),
    /// `index` is numbered as in the source: 1-based, or negative when relative
    #[error("Position index {index} out of range ({count} positions declared)")]
    PositionOutOfRange { index: i64, count: usize },
    #[error("Normal index {index} out of range ({count} normals declared)")]
    NormalOutOfRange { index: i64, count: usize },
}

/// Failure to produce a `Mesh` from a source
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Failed to read mesh file {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Line {line}: {kind}")]
    Format { line: usize, kind: FormatError },
}

impl MeshError {
    pub fn format(line: usize, kind: FormatError) -> Self {
        Self::Format { line, kind }
    }
}
