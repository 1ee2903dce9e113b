//! Error kinds shared by the propagation models and the dataset pipeline.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by model evaluation, data loading and cell lookups.
#[derive(Debug, Error)]
pub enum WalkError {
    /// Invalid mathematical input to a model: non-positive distance,
    /// frequency or antenna height, or a negative shadowing sigma.
    #[error("Domain error: {0}")]
    Domain(String),

    /// An input file is missing, unreadable or does not match its schema.
    #[error("Failed to load {}: {reason}", path.display())]
    DataLoad {
        /// File that failed to load.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Lookup of a CellID or reference key that was never observed.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl WalkError {
    pub(crate) fn data_load(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        WalkError::DataLoad {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WalkError>;
