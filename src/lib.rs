//! ESP8266 AT-command stub
//!
//! Emulates just enough of an ESP8266 Wi-Fi module's serial AT protocol for
//! host firmware to get through reset, joining an access point, opening a
//! TCP connection and posting data, without the module attached.
//!
//! # Modules
//!
//! - `port`: Port abstraction layer (real, mock, link options)
//! - `responder`: The line-matching reply loop and its rule table
//! - `config`: Configuration management with TOML support
//! - `cli`: Command-line arguments
//! - `logging`: `tracing` subscriber setup
//! - `error`: Unified error handling and exit codes

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod port;
pub mod responder;

// Re-export commonly used types for convenience
pub use error::{AppError, ExitCodes};
pub use port::{
    DataBits, LinkError, MockSerialPort, Parity, PortError, PortStream, Rs485Config,
    SerialLinkConfig, SerialPortAdapter, StopBits, SyncSerialPort,
};
pub use responder::{Responder, ResponderStats, ResponseRule, RuleSet, WriteOutcome};

pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
