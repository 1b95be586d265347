use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Generation(#[from] uigen::GenerationError),
    /// A generation is already in flight.
    #[error("A generation is already in progress")]
    Busy,
    #[error("No artifact with id {0}")]
    NotFound(String),
    #[error("No starter prompt matches {0:?}")]
    UnknownSuggestion(String),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid store key: {0:?}")]
    InvalidKey(String),
    #[error("Failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("Failed to serialize package manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
