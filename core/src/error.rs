//! Error types for the todo store.
//!
//! # Design
//! `Validation` and `NotFound` are the two conditions presentation layers
//! react to (inline form message vs. refresh). `Persistence` only occurs for
//! file-backed stores. Every variant is recoverable and leaves the store
//! unchanged.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::TodoId;

/// Input rejected by title/detail constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required!")]
    EmptyTitle,

    #[error("Title must be at most {max} characters (got {len})")]
    TitleTooLong { len: usize, max: usize },

    #[error("Detail must be at most {max} characters (got {len})")]
    DetailTooLong { len: usize, max: usize },
}

/// Failure to read or write the snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error("snapshot record {id} is invalid: {source}")]
    InvalidRecord {
        id: TodoId,
        #[source]
        source: ValidationError,
    },

    #[error("snapshot contains duplicate id {0}")]
    DuplicateId(TodoId),
}

/// Errors returned by `TodoStore` operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("todo {0} not found")]
    NotFound(TodoId),

    #[error(transparent)]
    Persistence(#[from] SnapshotError),
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
