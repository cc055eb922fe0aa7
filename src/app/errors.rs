use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot prepare output directory {path}: {source}")]
    FatalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No files could be written ({failed} attempted, all failed)")]
    NoFilesWritten { failed: usize },

    #[error("Failed to start writer threads: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl GenError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
