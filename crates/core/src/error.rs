//! Error types for buffer operations
//!
//! Validation failures surface immediately to the caller of `write`, `read`
//! or `add_automation`. Reading an empty buffer and writing a full
//! non-overwriting queue are *not* errors: they are reported as `Ok(None)`
//! and `Ok(false)` respectively.

use crate::event::Event;
use crate::shape::Shape;
use crate::dtype::DType;
use thiserror::Error;

/// Boxed error returned by automation actions
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors raised by buffers, element conversion and configuration
#[derive(Debug, Error)]
pub enum BufferError {
    /// Written item's shape differs from the declared element shape
    #[error("item shape {actual} does not match buffer element shape {expected}")]
    ShapeMismatch {
        /// Declared element shape
        expected: Shape,
        /// Shape of the rejected item
        actual: Shape,
    },

    /// Written item cannot be converted to the declared element type
    #[error("item of type {actual} is not convertible to {expected}")]
    TypeMismatch {
        /// Declared element type
        expected: DType,
        /// Description of the rejected input
        actual: String,
    },

    /// Keyed access with a key the namespace does not contain
    #[error("position key '{key}' not found in namespace")]
    InvalidNamespaceKey {
        /// The missing key
        key: String,
    },

    /// Integer access outside `[0, size)`
    #[error("position index {index} is out of bounds for buffer of size {size}")]
    IndexOutOfRange {
        /// Requested index
        index: i64,
        /// Buffer capacity
        size: usize,
    },

    /// Keyed access on a plain buffer, or integer access on a namespaced one
    #[error("expected {expected} position indexing but got {actual}")]
    IndexingModeMismatch {
        /// Indexing mode the buffer was built for
        expected: &'static str,
        /// Indexing mode of the request
        actual: &'static str,
    },

    /// Namespace length differs from capacity
    #[error("namespace length {actual} must match the buffer size {expected}")]
    NamespaceLengthMismatch {
        /// Buffer capacity
        expected: usize,
        /// Number of namespace keys supplied
        actual: usize,
    },

    /// Malformed automation or unknown event code
    #[error("invalid automation registration: {reason}")]
    InvalidAutomationRegistration {
        /// What was wrong with the registration
        reason: String,
    },

    /// An automation action failed; the remaining hooks for the event were skipped
    #[error("automation '{name}' failed during {event}")]
    AutomationFailed {
        /// Name the automation was registered under
        name: String,
        /// Event that was firing
        event: Event,
        /// Error returned by the action
        #[source]
        source: BoxError,
    },

    /// An automation called `write`/`read` on the buffer that is firing it
    #[error("buffer operation issued while an automation of the same buffer is running")]
    ReentrantAccess,

    /// Invalid construction parameters or configuration
    #[error("invalid buffer configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with the configuration
        reason: String,
    },

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BufferError {
    /// Shorthand for an [`BufferError::InvalidConfig`]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        BufferError::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`BufferError::TypeMismatch`]
    pub fn type_mismatch(expected: DType, actual: impl Into<String>) -> Self {
        BufferError::TypeMismatch {
            expected,
            actual: actual.into(),
        }
    }

    /// Check if this error is a validation failure of a written item
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BufferError::ShapeMismatch { .. } | BufferError::TypeMismatch { .. }
        )
    }

    /// Check if this error is a StateBuffer addressing failure
    pub fn is_addressing(&self) -> bool {
        matches!(
            self,
            BufferError::InvalidNamespaceKey { .. }
                | BufferError::IndexOutOfRange { .. }
                | BufferError::IndexingModeMismatch { .. }
        )
    }
}
