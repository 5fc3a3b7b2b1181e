use thiserror::Error;

use crate::core::config::ConfigError;
use crate::jobs::catalog::CatalogLoadError;
use crate::jobs::ledger::{AssignmentRejected, LedgerRestoreError, ReleaseRejected};

#[derive(Error, Debug)]
pub enum DynastyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Job catalog error: {0}")]
    Catalog(#[from] CatalogLoadError),

    #[error("Assignment rejected: {0}")]
    Assignment(#[from] AssignmentRejected),

    #[error("Release rejected: {0}")]
    Release(#[from] ReleaseRejected),

    #[error("Ledger restore failed: {0}")]
    Restore(#[from] LedgerRestoreError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DynastyError>;
