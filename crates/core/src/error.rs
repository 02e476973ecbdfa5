//! Error types for promrag
//!
//! Every fallible operation on a vector database client returns
//! [`VectorDbError`]. We use `thiserror` for the `Display` and `Error`
//! implementations.

use thiserror::Error;

/// Result type alias for vector database operations
pub type VectorDbResult<T> = Result<T, VectorDbError>;

/// Errors surfaced by vector database clients and their collaborators
#[derive(Debug, Error)]
pub enum VectorDbError {
    /// A required field of a metric metadata entry is missing or empty
    #[error("invalid metric metadata '{name}': {reason}")]
    Validation {
        /// Name of the offending entry (may be empty)
        name: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// A collection name failed identifier validation
    #[error("invalid identifier '{name}': {reason}")]
    InvalidIdentifier {
        /// The rejected identifier
        name: String,
        /// Reason why it was rejected
        reason: String,
    },

    /// Stored vector bytes could not be decoded
    #[error("invalid embedding data: {0}")]
    Encoding(String),

    /// The text encoder failed to produce an embedding
    #[error("failed to encode text: {0}")]
    Embedding(String),

    /// The underlying engine or remote service failed
    #[error("{context}: {message}")]
    Backend {
        /// What the client was doing when the failure happened
        context: String,
        /// Message reported by the engine or service
        message: String,
    },

    /// The configured provider tag is not recognised
    #[error("unsupported vectordb provider '{provider}', supported providers: sqlite3, qdrant")]
    UnsupportedProvider {
        /// The offending provider tag
        provider: String,
    },
}

impl VectorDbError {
    /// Build a validation error for the metric `name`
    pub fn validation(name: impl Into<String>, reason: impl Into<String>) -> Self {
        VectorDbError::Validation {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Build an identifier error for `name`
    pub fn invalid_identifier(name: impl Into<String>, reason: impl Into<String>) -> Self {
        VectorDbError::InvalidIdentifier {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an engine or service failure with operation context
    pub fn backend(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        VectorDbError::Backend {
            context: context.into(),
            message: err.to_string(),
        }
    }

    /// Check if this error rejects caller input (metadata or identifiers)
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            VectorDbError::Validation { .. } | VectorDbError::InvalidIdentifier { .. }
        )
    }

    /// Check if this error came from the engine or remote service
    pub fn is_backend_error(&self) -> bool {
        matches!(self, VectorDbError::Backend { .. })
    }
}
