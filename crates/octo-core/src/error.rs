//! Error types for promotion runs.

use thiserror::Error;

use crate::api::ApiError;
use crate::types::ResourceKind;

/// Failures surfaced by the resolver, directory and promotion engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromoteError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: ResourceKind, name: String },

    #[error("{kind} name '{name}' is ambiguous: {count} resources share it")]
    Ambiguous {
        kind: ResourceKind,
        name: String,
        count: usize,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Rejected by server: {0}")]
    RemoteRejected(String),

    #[error("Malformed server response: {0}")]
    Decode(String),
}

impl PromoteError {
    pub fn not_found(kind: ResourceKind, name: impl Into<String>) -> Self {
        PromoteError::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Attach the looked-up resource to a transport-level failure.
    pub fn from_api(err: ApiError, kind: ResourceKind, name: &str) -> Self {
        match err {
            ApiError::NotFound(_) => PromoteError::not_found(kind, name),
            ApiError::Rejected { status, message } => {
                PromoteError::RemoteRejected(format!("{status}: {message}"))
            }
            ApiError::Transport(message) => PromoteError::Transport(message),
            ApiError::Decode(message) => PromoteError::Decode(message),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PromoteError::NotFound { .. })
    }
}
