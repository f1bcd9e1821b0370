//! Error types for the Galaxy3D portal system
//!
//! Portals run inside a real-time frame loop, so almost nothing here is a
//! recoverable I/O fault. Errors are either configuration problems caught at
//! scene setup, or failures reported by the host renderer.

use std::fmt;

/// Result type for Galaxy3D portal operations
pub type Galaxy3dResult<T> = std::result::Result<T, Galaxy3dError>;

/// Short names used inside the crate
pub type Error = Galaxy3dError;
pub type Result<T> = Galaxy3dResult<T>;

/// Galaxy3D portal errors
#[derive(Debug, Clone, PartialEq)]
pub enum Galaxy3dError {
    /// Host renderer failed (render pass, target creation, ...)
    BackendError(String),

    /// Out of GPU memory while allocating a render target
    OutOfMemory,

    /// Unknown or stale handle (portal, traveler, render target)
    InvalidResource(String),

    /// Rejected scene setup (recursion limit, material lists, ...)
    InvalidConfiguration(String),
}

impl fmt::Display for Galaxy3dError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Galaxy3dError::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Galaxy3dError::OutOfMemory => write!(f, "Out of GPU memory"),
            Galaxy3dError::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Galaxy3dError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Galaxy3dError {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
