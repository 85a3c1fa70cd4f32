//! Port-specific error types.
//!
//! Kept separate from application-level errors so the port layer can be used
//! (and mocked) on its own.

use super::link::LinkError;
use thiserror::Error;

/// Errors that can occur during serial port operations.
#[derive(Debug, Error)]
pub enum PortError {
    /// The specified serial port was not found on the system.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// An I/O error occurred during port operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link options were rejected before the port was touched.
    #[error("Invalid link options: {0}")]
    Link(#[from] LinkError),

    /// Port configuration failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation timed out.
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The other end went away; no further data will arrive.
    #[error("Serial link closed")]
    Closed,

    /// The platform cannot apply the requested setting.
    #[error("Unsupported on this platform: {0}")]
    Unsupported(&'static str),

    /// A serialport-specific error occurred.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a NotFound error from a port name.
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    /// Create a Config error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a Timeout error from a duration.
    pub fn timeout(duration: std::time::Duration) -> Self {
        Self::Timeout(duration)
    }
}

impl From<PortError> for std::io::Error {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Io(e) => e,
            PortError::Timeout(_) => std::io::Error::new(std::io::ErrorKind::TimedOut, err),
            PortError::Closed => std::io::Error::new(std::io::ErrorKind::UnexpectedEof, err),
            PortError::NotFound(_) => std::io::Error::new(std::io::ErrorKind::NotFound, err),
            other => std::io::Error::other(other),
        }
    }
}
