//! Configuration module for esp8266-stub.
//!
//! This module provides TOML-based configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of priority):
//!
//! 1. `ESP8266_STUB_CONFIG` environment variable (explicit path)
//! 2. `./esp8266-stub.toml` (current directory)
//! 3. `esp8266-stub.toml` in the platform config directory
//!    (`~/.config/esp8266-stub/` on Linux)
//! 4. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! Any configuration value can be overridden via environment variables.
//! The pattern is: `ESP8266_STUB_<SECTION>_<KEY>`
//!
//! Examples:
//! - `ESP8266_STUB_SERIAL_PORT=/dev/ttyUSB0`
//! - `ESP8266_STUB_SERIAL_BAUD=9600`
//! - `ESP8266_STUB_LOGGING_LEVEL=debug`
//!
//! Command-line flags are applied on top of all of this by the binary.
//!
//! # Example
//!
//! ```toml
//! [serial]
//! port = "/dev/ttyUSB0"
//! baud = 115200
//! chartimeout = 100
//!
//! [logging]
//! level = "debug"
//! format = "compact"
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    get_default_config_dir, get_default_config_path, resolve_config_path, ConfigLoader,
};
pub use schema::{Config, LogFormat, LoggingConfig, SerialConfig};
