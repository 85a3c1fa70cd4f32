//! Command-line arguments.
//!
//! Flag names follow the original bench tool (`--rs485_high_during_send`
//! and friends keep their underscores). Numeric flags are optional so that
//! an unset flag leaves the config file / environment value alone.

use crate::config::{Config, ConfigLoader, SerialConfig};
use crate::error::AppError;
use crate::port::SerialLinkConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default, PartialEq, Eq)]
#[command(
    name = "esp8266-stub",
    version,
    about = "Answers a minimal ESP8266 AT-command subset on a serial port.",
    long_about = "Opens a serial port and replies to the AT commands a typical ESP8266 HTTP client sends \
                  (reset, join AP, open TCP, send), so firmware can be exercised without the Wi-Fi module."
)]
pub struct Args {
    /// Baud rate [default: 115200]
    #[arg(long)]
    pub baud: Option<u32>,

    /// Enable even parity
    #[arg(long)]
    pub even: bool,

    /// Enable odd parity
    #[arg(long)]
    pub odd: bool,

    /// Enable RS485 RTS for direction control
    #[arg(long)]
    pub rs485: bool,

    /// RTS signal should be high during send
    #[arg(long = "rs485_high_during_send")]
    pub rs485_high_during_send: bool,

    /// RTS signal should be high after send
    #[arg(long = "rs485_high_after_send")]
    pub rs485_high_after_send: bool,

    /// Stop bits [default: 1]
    #[arg(long)]
    pub stopbits: Option<u8>,

    /// Data bits [default: 8]
    #[arg(long)]
    pub databits: Option<u8>,

    /// Inter character timeout in ms [default: 100]
    #[arg(long)]
    pub chartimeout: Option<u64>,

    /// Minimum read count [default: 0]
    #[arg(long)]
    pub minread: Option<u32>,

    /// Configuration file (default: searched, see docs)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "esp8266_stub=trace" (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

/// Everything startup needs once the options are known to be usable.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    /// File the config came from, if any.
    pub config_path: Option<PathBuf>,
    /// Already validated.
    pub link: SerialLinkConfig,
}

impl Args {
    /// Load the config, layer these flags over it and validate the link.
    ///
    /// Nothing here depends on logging, so a bad option combination is
    /// reported even when the log filter is also invalid.
    pub fn settings(&self) -> Result<Settings, AppError> {
        let loader = match self.config {
            Some(ref path) => ConfigLoader::load_from(path)?,
            None => ConfigLoader::load()?,
        };
        let config_path = loader.config_path.clone();
        let mut config = loader.into_config();
        self.apply_to(&mut config.serial);

        let link = config.serial.link_config();
        link.validate()?;

        Ok(Settings {
            config,
            config_path,
            link,
        })
    }

    /// Layer the flags that were given on top of `serial`.
    ///
    /// Boolean flags can only switch an option on.
    pub fn apply_to(&self, serial: &mut SerialConfig) {
        if let Some(baud) = self.baud {
            serial.baud = baud;
        }
        if let Some(stopbits) = self.stopbits {
            serial.stopbits = stopbits;
        }
        if let Some(databits) = self.databits {
            serial.databits = databits;
        }
        if let Some(chartimeout) = self.chartimeout {
            serial.chartimeout = chartimeout;
        }
        if let Some(minread) = self.minread {
            serial.minread = minread;
        }
        serial.even |= self.even;
        serial.odd |= self.odd;
        serial.rs485 |= self.rs485;
        serial.rs485_high_during_send |= self.rs485_high_during_send;
        serial.rs485_high_after_send |= self.rs485_high_after_send;
    }
}
