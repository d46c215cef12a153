use std::time::Duration;
use thiserror::Error;

/// Errors shared by every component of the engine.
///
/// Remote providers translate their own error codes into these variants so callers only ever
/// match on one taxonomy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuantumError {
    /// A single argument or field failed validation.
    #[error("invalid {field}: {message}")]
    ValidationError {
        /// Name of the offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },
    /// A circuit failed validation, with every violation found.
    #[error("invalid circuit: {}", .0.join("; "))]
    InvalidCircuit(Vec<String>),
    /// The operation is not available on this backend.
    #[error("not implemented: {0}")]
    NotImplemented(String),
    /// The provider refused the job because a quota is exhausted.
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),
    /// The provider is temporarily unavailable.
    #[error("service unavailable{}", retry_suffix(.retry_after))]
    ServiceUnavailable {
        /// How long the caller should wait before trying again, if known.
        retry_after: Option<Duration>,
    },
    /// A provider error code with no dedicated variant.
    #[error("unknown error {code}: {message}")]
    UnknownError {
        /// The provider's error code.
        code: String,
        /// The provider's message, prefixed with the provider name.
        message: String,
    },
}

fn retry_suffix(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(d) => format!(" (retry after {}s)", d.as_secs()),
        None => String::new(),
    }
}

impl QuantumError {
    /// Construct a new validation error.
    pub fn validation<F, S>(field: F, message: S) -> Self
    where
        F: Into<String>,
        S: Into<String>,
    {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Construct an invalid circuit error with a single message.
    pub fn invalid_circuit<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidCircuit(vec![message.into()])
    }
}

/// A result which may contain a quantum error.
pub type QuantumResult<T> = Result<T, QuantumError>;
