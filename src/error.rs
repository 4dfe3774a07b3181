use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors. Any of these aborts the whole generation run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {}: {message}", file.display())]
    Parse { file: PathBuf, message: String },

    #[error("entry file not found: {}", .0.display())]
    EntryFileNotFound(PathBuf),

    #[error("cannot infer schema type of field `{field}` in `{declaration}` (definition `{definition}`): {shape}")]
    UnsupportedShape {
        definition: String,
        declaration: String,
        field: String,
        shape: ShapeError,
    },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Why a field's declared type could not be mapped onto a schema type tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// Pointer, reference, smart pointer or `Option` fields have no schema rendition.
    #[error("indirection `{0}` is not supported")]
    Indirection(String),
    #[error("unsupported type `{0}`")]
    Unsupported(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(format!("YAML: {}", err))
    }
}
