//! Unified application error type and process exit codes.

use crate::config::ConfigError;
use crate::port::{LinkError, PortError};
use thiserror::Error;

/// Exit code constants.
pub struct ExitCodes;

impl ExitCodes {
    /// General error
    pub const ERROR: u8 = 1;

    /// Invalid configuration or conflicting options
    pub const CONFIG_ERROR: u8 = 2;

    /// Serial port could not be opened
    pub const PORT_OPEN_FAILED: u8 = 3;

    /// The serial link failed or closed while running
    pub const LINK_FAILED: u8 = 4;
}

/// Everything that can stop the stub.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or parsed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The link options are inconsistent.
    #[error(transparent)]
    Link(#[from] LinkError),

    /// The serial port could not be opened.
    #[error("Error opening serial port: {0}")]
    Open(#[source] PortError),

    /// Reading from the open link failed.
    #[error("Serial link failed: {0}")]
    LinkFailed(#[source] PortError),

    /// Logging could not be initialised.
    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}

impl AppError {
    /// Classify an error from `SyncSerialPort::open`.
    pub fn from_open(err: PortError) -> Self {
        match err {
            PortError::Link(link) => Self::Link(link),
            other => Self::Open(other),
        }
    }

    /// Text printed to stderr before exiting.
    pub fn report(&self) -> String {
        match self {
            Self::Link(_) => format!("{self}\nRun with --help for usage."),
            _ => self.to_string(),
        }
    }

    /// Exit status reported to the shell.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Link(_) => ExitCodes::CONFIG_ERROR,
            Self::Open(_) => ExitCodes::PORT_OPEN_FAILED,
            Self::LinkFailed(_) => ExitCodes::LINK_FAILED,
            Self::Logging(_) => ExitCodes::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity_conflict_is_config_error() {
        let err = AppError::from_open(PortError::Link(LinkError::ConflictingParity));
        assert!(matches!(err, AppError::Link(LinkError::ConflictingParity)));
        assert_eq!(err.exit_code(), ExitCodes::CONFIG_ERROR);
        assert_eq!(err.to_string(), "can't specify both even and odd parity");
    }

    #[test]
    fn test_report_states_error_once() {
        let err = AppError::Link(LinkError::ConflictingParity);
        assert_eq!(
            err.report(),
            "can't specify both even and odd parity\nRun with --help for usage."
        );

        let err = AppError::LinkFailed(PortError::Closed);
        let report = err.report();
        assert_eq!(report, "Serial link failed: Serial link closed");
        assert_eq!(report.matches("Serial link closed").count(), 1);
    }

    #[test]
    fn test_open_failure() {
        let err = AppError::from_open(PortError::not_found("/dev/ttyUSB9"));
        assert_eq!(err.exit_code(), ExitCodes::PORT_OPEN_FAILED);
        assert_eq!(
            err.to_string(),
            "Error opening serial port: Serial port not found: /dev/ttyUSB9"
        );
    }

    #[test]
    fn test_link_failure() {
        let err = AppError::LinkFailed(PortError::Closed);
        assert_eq!(err.exit_code(), ExitCodes::LINK_FAILED);
        assert_ne!(err.exit_code(), 0);
    }
}
