use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::collection::CollectionError;
use symforge_sexpr::ParseError;

/// Errors that can occur while working with library elements.
///
/// Registration misuse and interface violations are contract errors the
/// caller must not retry; read/write/parse failures are recoverable
/// conditions the caller is expected to handle explicitly.
#[derive(Debug, Error)]
pub enum ElementError {
    #[error("element at {path} was opened read-only")]
    ReadOnly { path: PathBuf },

    #[error("element has no backing directory; save it with save_to() first")]
    NoLocation,

    #[error("a presentation adapter is already registered")]
    AlreadyRegistered,

    #[error("the given presentation adapter is not registered")]
    NotRegistered,

    #[error("published interface violated: {0}")]
    InterfaceViolation(String),

    #[error("unsupported file format version `{found}`")]
    VersionMismatch { found: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
