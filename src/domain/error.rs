//! Error types for the urlscope client.
//!
//! This module defines the centralized error type [`UrlscopeError`] and a type
//! alias [`Result`] for convenient error handling throughout the crate. All
//! errors are implemented using the `thiserror` crate for automatic `Error`
//! trait implementation.
//!
//! The variants form a closed taxonomy: every failure is classified exactly
//! once, at the boundary where it occurs (the HTTP binding classifies
//! transport vs. application errors, the form engine produces validation
//! errors, the token store produces storage errors). Code above those
//! boundaries never re-discriminates raw error shapes.

use thiserror::Error;

/// Fallback message used when a failure carries no usable description,
/// e.g. a non-2xx response whose body is neither the documented error
/// envelope nor valid JSON.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// The main error type for urlscope operations.
///
/// This enum consolidates all error conditions that can occur in the client,
/// from transport failures to local validation. Most call sites only need the
/// flat [`message`](UrlscopeError::message) for display; callers that branch
/// on the failure class match on the variant instead.
#[derive(Debug, Error)]
pub enum UrlscopeError {
    /// The request never produced an HTTP response.
    ///
    /// Covers unreachable hosts, connection resets, TLS failures and
    /// timeouts. There is no structured body to inspect.
    #[error("{message}")]
    Transport {
        /// Human-readable description of the transport failure.
        message: String,
    },

    /// The backend answered with a non-2xx status.
    ///
    /// Built from the server's `{error, code?, field?}` envelope when
    /// present, otherwise from the HTTP status line.
    #[error("{message}")]
    Api {
        /// Server-supplied error message, or a status-derived fallback.
        message: String,
        /// Machine-readable error code, if the server provided one.
        code: Option<String>,
        /// Field the error relates to, for form-level display.
        field: Option<String>,
        /// HTTP status code of the response.
        status: Option<u16>,
    },

    /// Locally computed validation failure.
    ///
    /// Produced by the form validators before any request is issued;
    /// validation errors never reach the network layer.
    #[error("{message}")]
    Validation {
        /// Field the message belongs to.
        field: String,
        /// Human-readable validation message.
        message: String,
    },

    /// Token store operation failed.
    ///
    /// Occurs when reading from or writing to the session persistence
    /// backend fails. The string contains a description of what went wrong.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or missing.
    ///
    /// Occurs when the config file cannot be parsed or required values are
    /// malformed. The string describes the specific configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically
    /// converts from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UrlscopeError {
    /// Builds an error with the generic fallback message.
    ///
    /// Used where a failure reaches the client in a shape the protocol does
    /// not document, matching the original dashboard's catch-all banner.
    #[must_use]
    pub fn unexpected() -> Self {
        Self::Api {
            message: UNEXPECTED_ERROR.to_string(),
            code: None,
            field: None,
            status: None,
        }
    }

    /// Returns the flat, user-facing message for this error.
    ///
    /// This is the string surfaced in banners and stored in
    /// [`CallState`](crate::api::CallState) after a failed call.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns the HTTP status code, if this error came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

/// A specialized `Result` type for urlscope operations.
///
/// This is a type alias for `std::result::Result<T, UrlscopeError>` that
/// simplifies function signatures throughout the codebase.
pub type Result<T> = std::result::Result<T, UrlscopeError>;
