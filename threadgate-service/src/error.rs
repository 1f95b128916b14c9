//! Errors of the client service.

use thiserror::Error;

use crate::backend::BackendError;
use crate::selector::SelectionError;

/// Errors that can occur in the client service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// An error from a storage backend.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// A permission selection was rejected.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Errors related to de/serialization of stored records.
    #[error("serde error: {context}")]
    Serde {
        /// What was being de/serialized.
        context: String,
        /// The underlying error.
        #[source]
        cause: serde_json::Error,
    },

    /// Errors building or sending requests to the OAuth collaborators.
    #[error("reqwest error: {context}")]
    Reqwest {
        /// The operation that failed.
        context: String,
        /// The underlying error.
        #[source]
        cause: reqwest::Error,
    },

    /// No token-exchange backend is configured.
    #[error("token exchange backend not configured")]
    ExchangeUnavailable,
}

impl ServiceError {
    pub(crate) fn serde(context: impl Into<String>, cause: serde_json::Error) -> Self {
        Self::Serde {
            context: context.into(),
            cause,
        }
    }

    pub(crate) fn reqwest(context: impl Into<String>, cause: reqwest::Error) -> Self {
        Self::Reqwest {
            context: context.into(),
            cause,
        }
    }
}

/// Result type for service operations.
pub type Result<T, E = ServiceError> = std::result::Result<T, E>;
