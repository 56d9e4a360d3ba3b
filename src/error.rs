use std::path::PathBuf;

use thiserror::Error;

use crate::analysis::roles::Role;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Please provide a non-blank area query")]
    BlankQuery,

    #[error("Please provide at least one non-blank area label")]
    NoLabels,

    #[error("Limit must be a non-negative integer, got '{0}'")]
    InvalidLimit(String),

    #[error("No dataset loaded")]
    NoDataset,

    #[error("No preload dataset present.")]
    NoPreloadFile,

    #[error("Failed to load dataset from {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("Failed to store dataset at {path}: {reason}")]
    Persist { path: PathBuf, reason: String },

    #[error("No usable column for role '{role}' (available columns: {columns:?})")]
    RoleUnresolved { role: Role, columns: Vec<String> },
}

impl AnalysisError {
    /// Whether the caller sent bad input, as opposed to a server-side
    /// failure.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::BlankQuery | AnalysisError::NoLabels | AnalysisError::InvalidLimit(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
