//! Error types for the Galaxy3D render layers
//!
//! Backends report their own faults through the first four variants.
//! The debug layer reports rejected calls through `Error::Validation`.

use std::fmt;
use crate::diagnostics::ValidationError;

/// Result type for render system operations
pub type Result<T> = std::result::Result<T, Error>;

/// Render system errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (Vulkan, Direct3D, OpenGL, ...)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, buffer, shader, etc.)
    InvalidResource(String),

    /// Initialization failed (render system, render context, ...)
    InitializationFailed(String),

    /// Call rejected by the debug layer before it reached the backend
    Validation(ValidationError),
}

impl Error {
    /// The validation error carried by this error, if the debug layer rejected the call
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::Validation(err) => write!(f, "Validation failed: {}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(err)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
