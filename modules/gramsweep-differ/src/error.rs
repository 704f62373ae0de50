use std::path::PathBuf;

use gramsweep_common::RunResult;
use gramsweep_store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DifferError>;

/// Errors from one differ invocation. Each maps to a distinct outcome kind
/// so parse and storage failures stay distinguishable in the outcome log.
#[derive(Debug, Error)]
pub enum DifferError {
    /// Archive extracted but the expected export folder is nowhere in it.
    #[error("Archive is missing the {expected} folder")]
    ArchiveLayout { expected: String },

    /// Archive is not a readable zip.
    #[error("Unreadable archive: {0}")]
    BadArchive(String),

    /// An export file exists but does not parse as the expected document.
    #[error("Malformed export file {path}: {message}")]
    MalformedExport { path: PathBuf, message: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DifferError {
    /// Outcome kind recorded for this failure.
    pub fn outcome(&self) -> RunResult {
        match self {
            DifferError::ArchiveLayout { .. }
            | DifferError::BadArchive(_)
            | DifferError::Io(_) => RunResult::ArchiveLayout,
            DifferError::MalformedExport { .. } => RunResult::ExportParse,
            DifferError::Store(_) => RunResult::StorageFailure,
        }
    }
}
