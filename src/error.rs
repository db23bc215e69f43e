//! Centralized error types for drydock
//!
//! Uses thiserror for typed errors that can be matched on,
//! while still being compatible with anyhow for propagation.

use thiserror::Error;

/// Errors surfaced by a record store implementation.
///
/// `NotFound` is a normal outcome, not a failure: callers branch on it to
/// trigger create paths or workflow synthesis.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{kind} {name:?} not found in namespace {namespace:?}")]
    NotFound {
        kind: String,
        namespace: String,
        name: String,
    },

    #[error("{kind} {name:?} already exists in namespace {namespace:?}")]
    AlreadyExists {
        kind: String,
        namespace: String,
        name: String,
    },

    #[error("failed to {operation} {kind} {name:?}: {message}")]
    Backend {
        operation: String,
        kind: String,
        name: String,
        message: String,
    },
}

impl StoreError {
    /// Whether this error represents an absent record rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Git service resolution and upsert errors
#[derive(Error, Debug)]
pub enum GitServiceError {
    #[error("no git service kind found for URL '{url}'")]
    KindNotFound { url: String },

    #[error("no service kind label found on secret '{secret}' for git service '{url}'")]
    MissingKindLabel { secret: String, url: String },

    #[error("no name supplied and could not parse URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("no name supplied and no host in URL '{url}'")]
    MissingHost { url: String },

    #[error("failed to create git service {name:?}: {source}")]
    CreateFailed { name: String, source: StoreError },

    #[error("failed to update git service {name:?}: {source}")]
    UpdateFailed { name: String, source: StoreError },

    #[error("failed to read git service {name:?}: {source}")]
    GetFailed { name: String, source: StoreError },

    #[error(transparent)]
    Store(#[from] StoreError),
}
