//! Serial link options and their validation.
//!
//! `SerialLinkConfig` is the raw, user-facing record (flags and numbers as
//! they arrive from the CLI or config file). `SerialLinkConfig::resolve`
//! checks it and produces `LinkSettings`, the typed form the port layer
//! actually applies. Nothing here touches a device, so a bad combination is
//! always reported before the port is opened.

use super::traits::{DataBits, Parity, StopBits};
use std::time::Duration;
use thiserror::Error;

/// Port the stub listens on when nothing else is configured.
pub const DEFAULT_PORT_NAME: &str = "/dev/tty.usbmodem1411";

/// Default line speed of the module's factory firmware.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default inter-character timeout in milliseconds.
pub const DEFAULT_INTER_CHAR_TIMEOUT_MS: u64 = 100;

/// Largest inter-character timeout that still rounds to a termios `VTIME`
/// byte (255 deciseconds).
pub const MAX_INTER_CHAR_TIMEOUT_MS: u64 = 25_549;

/// Poll interval used when the line discipline itself never times out.
const IDLE_POLL: Duration = Duration::from_secs(1);

/// Errors found while checking link options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("can't specify both even and odd parity")]
    ConflictingParity,

    #[error("unsupported number of data bits: {0} (expected 5-8)")]
    InvalidDataBits(u8),

    #[error("unsupported number of stop bits: {0} (expected 1 or 2)")]
    InvalidStopBits(u8),

    #[error("minimum read count {0} exceeds 255")]
    MinReadOutOfRange(u32),

    #[error("inter-character timeout {0}ms exceeds {MAX_INTER_CHAR_TIMEOUT_MS}ms")]
    CharTimeoutOutOfRange(u64),

    /// `VMIN == 0 && VTIME == 0` would turn every read into a busy poll.
    #[error("minimum read count of 0 requires an inter-character timeout of at least 50ms")]
    NonBlockingRead,
}

/// RS-485 direction control via the RTS line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rs485Config {
    pub enabled: bool,
    pub rts_high_during_send: bool,
    pub rts_high_after_send: bool,
}

/// Raw serial link options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialLinkConfig {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: u8,
    pub stop_bits: u8,
    pub even: bool,
    pub odd: bool,
    /// Minimum number of bytes a read waits for (`VMIN`).
    pub min_read: u32,
    /// Inter-character timeout in milliseconds (`VTIME`, 100ms resolution).
    pub inter_char_timeout_ms: u64,
    pub rs485: Rs485Config,
}

impl Default for SerialLinkConfig {
    fn default() -> Self {
        Self {
            port_name: DEFAULT_PORT_NAME.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: 8,
            stop_bits: 1,
            even: false,
            odd: false,
            min_read: 0,
            inter_char_timeout_ms: DEFAULT_INTER_CHAR_TIMEOUT_MS,
            rs485: Rs485Config::default(),
        }
    }
}

/// Validated link settings, ready to be applied to a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSettings {
    pub baud_rate: u32,
    pub parity: Parity,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    /// termios `VMIN`.
    pub vmin: u8,
    /// termios `VTIME`, in deciseconds.
    pub vtime: u8,
    pub rs485: Rs485Config,
}

impl LinkSettings {
    /// How long a single read call may wait before reporting a timeout.
    pub fn read_timeout(&self) -> Duration {
        if self.vtime == 0 {
            IDLE_POLL
        } else {
            Duration::from_millis(u64::from(self.vtime) * 100)
        }
    }
}

impl SerialLinkConfig {
    /// Parity selected by the even/odd flags.
    pub fn parity(&self) -> Result<Parity, LinkError> {
        match (self.even, self.odd) {
            (true, true) => Err(LinkError::ConflictingParity),
            (true, false) => Ok(Parity::Even),
            (false, true) => Ok(Parity::Odd),
            (false, false) => Ok(Parity::None),
        }
    }

    /// Check every option and produce the typed settings.
    pub fn resolve(&self) -> Result<LinkSettings, LinkError> {
        let parity = self.parity()?;
        let data_bits = DataBits::try_from(self.data_bits)?;
        let stop_bits = StopBits::try_from(self.stop_bits)?;

        let vmin =
            u8::try_from(self.min_read).map_err(|_| LinkError::MinReadOutOfRange(self.min_read))?;

        // Round to the nearest decisecond, then check it fits the byte.
        let vtime = u8::try_from(self.inter_char_timeout_ms.saturating_add(50) / 100)
            .map_err(|_| LinkError::CharTimeoutOutOfRange(self.inter_char_timeout_ms))?;
        if vmin == 0 && vtime == 0 {
            return Err(LinkError::NonBlockingRead);
        }

        Ok(LinkSettings {
            baud_rate: self.baud_rate,
            parity,
            data_bits,
            stop_bits,
            vmin,
            vtime,
            rs485: self.rs485,
        })
    }

    /// Shorthand for `resolve().map(|_| ())`.
    pub fn validate(&self) -> Result<(), LinkError> {
        self.resolve().map(|_| ())
    }
}
