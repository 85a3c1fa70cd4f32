//! Configuration schema definitions.
//!
//! This module defines the structure of the configuration file using serde.
//! Every field has a default, so an empty file (or no file) is valid.

use crate::port::link::{
    Rs485Config, SerialLinkConfig, DEFAULT_BAUD_RATE, DEFAULT_INTER_CHAR_TIMEOUT_MS,
    DEFAULT_PORT_NAME,
};
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial port configuration
    pub serial: SerialConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Serial port configuration section.
///
/// Field names mirror the command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path (no command-line flag; set it here or via the environment)
    pub port: String,
    pub baud: u32,
    pub databits: u8,
    pub stopbits: u8,
    /// Enable even parity
    pub even: bool,
    /// Enable odd parity
    pub odd: bool,
    /// Minimum read count
    pub minread: u32,
    /// Inter-character timeout in milliseconds
    pub chartimeout: u64,
    /// Enable RS-485 RTS direction control
    pub rs485: bool,
    /// RTS high while sending
    pub rs485_high_during_send: bool,
    /// RTS high after sending
    pub rs485_high_after_send: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT_NAME.to_string(),
            baud: DEFAULT_BAUD_RATE,
            databits: 8,
            stopbits: 1,
            even: false,
            odd: false,
            minread: 0,
            chartimeout: DEFAULT_INTER_CHAR_TIMEOUT_MS,
            rs485: false,
            rs485_high_during_send: false,
            rs485_high_after_send: false,
        }
    }
}

impl SerialConfig {
    /// Build the link options the port layer consumes.
    pub fn link_config(&self) -> SerialLinkConfig {
        SerialLinkConfig {
            port_name: self.port.clone(),
            baud_rate: self.baud,
            data_bits: self.databits,
            stop_bits: self.stopbits,
            even: self.even,
            odd: self.odd,
            min_read: self.minread,
            inter_char_timeout_ms: self.chartimeout,
            rs485: Rs485Config {
                enabled: self.rs485,
                rts_high_during_send: self.rs485_high_during_send,
                rts_high_after_send: self.rs485_high_after_send,
            },
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive: "trace", "debug", "info", "warn", "error", or a full
    /// `EnvFilter` expression
    pub level: String,
    /// Log format: "json", "pretty", "compact"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format
    Json,
    /// Pretty format with colors
    #[default]
    Pretty,
    /// Compact format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.serial.port, "/dev/tty.usbmodem1411");
        assert_eq!(config.serial.baud, 115200);
        assert_eq!(config.serial.databits, 8);
        assert_eq!(config.serial.stopbits, 1);
        assert_eq!(config.serial.chartimeout, 100);
        assert_eq!(config.serial.minread, 0);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_link_config_defaults_match() {
        assert_eq!(
            SerialConfig::default().link_config(),
            SerialLinkConfig::default()
        );
    }

    #[test]
    fn test_rs485_flags_carried_over() {
        let serial = SerialConfig {
            rs485: true,
            rs485_high_after_send: true,
            ..Default::default()
        };
        let link = serial.link_config();
        assert!(link.rs485.enabled);
        assert!(!link.rs485.rts_high_during_send);
        assert!(link.rs485.rts_high_after_send);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[serial]"));
        assert!(toml_str.contains("[logging]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [serial]
            port = "/dev/ttyUSB0"
            baud = 9600
            even = true

            [logging]
            format = "json"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.serial.port, "/dev/ttyUSB0");
        assert_eq!(config.serial.baud, 9600);
        assert!(config.serial.even);
        assert_eq!(config.logging.format, LogFormat::Json);
        // Defaults should still work
        assert_eq!(config.serial.chartimeout, 100);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("compact".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("fancy".parse::<LogFormat>().is_err());
    }
}
