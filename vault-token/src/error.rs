//! Error types using thiserror 2.0.
//!
//! [`TransportError`] classifies what went wrong talking to Vault.
//! [`TokenError`] is what the token facade returns: a transport error
//! wrapped with operation context, a local encoding failure, or a
//! response that violates the token API contract.

use thiserror::Error;

/// Errors raised by a [`Transport`](crate::Transport).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Vault unreachable or answered with a server error
    #[error("Vault unavailable: {0}")]
    Unavailable(String),

    /// Non-success status not covered by a more specific variant
    #[error("Vault returned status {status}: {}", .errors.join("; "))]
    Status {
        /// HTTP status code
        status: u16,
        /// Messages from the `errors` array of the response body
        errors: Vec<String>,
    },

    /// Nothing found at path
    #[error("Not found at path: {0}")]
    NotFound(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Rate limited
    #[error("Rate limited")]
    RateLimited,

    /// Response body was not valid JSON
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

impl TransportError {
    /// Check if error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::RateLimited | Self::Http(_)
        )
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Errors returned by token operations.
#[derive(Error, Debug)]
pub enum TokenError {
    /// Request body could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport call failed
    #[error("{context}: {source}")]
    Transport {
        /// What the operation was doing
        context: String,
        /// Underlying transport failure
        #[source]
        source: TransportError,
    },

    /// Response did not match the expected envelope
    #[error("{context}: unexpected response: {source}")]
    Decode {
        /// What the operation was doing
        context: String,
        /// Decoding failure
        #[source]
        source: serde_json::Error,
    },

    /// Vault reported success but issued no token
    #[error("create token returned empty id")]
    EmptyTokenId,
}

/// Result type for token operations.
pub type TokenResult<T> = Result<T, TokenError>;

impl TokenError {
    /// Wrap a transport failure with operation context.
    #[must_use]
    pub fn transport(context: impl Into<String>, source: TransportError) -> Self {
        Self::Transport {
            context: context.into(),
            source,
        }
    }

    /// Wrap a decoding failure with operation context.
    #[must_use]
    pub fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            context: context.into(),
            source,
        }
    }

    /// Check if error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// The underlying transport error, if any.
    #[must_use]
    pub const fn transport_error(&self) -> Option<&TransportError> {
        match self {
            Self::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}
