//! Synchronous serial port implementation.
//!
//! Wraps the `serialport` crate's `SerialPort` trait with our own `SerialPortAdapter`
//! trait for dependency injection and testing.

use super::error::PortError;
use super::link::{LinkSettings, SerialLinkConfig};
use super::traits::SerialPortAdapter;
use std::io::{Read, Write};
use tracing::{debug, warn};

/// Synchronous serial port implementation wrapping `serialport::SerialPort`.
pub struct SyncSerialPort {
    /// The underlying serial port implementation.
    port: Box<dyn serialport::SerialPort>,
    /// The port name/path for identification.
    name: String,
}

impl SyncSerialPort {
    /// Open a serial port with the given link options.
    ///
    /// The options are validated first; an invalid combination (for example
    /// both even and odd parity) is returned as `PortError::Link` without the
    /// device ever being opened.
    ///
    /// # Example
    /// ```no_run
    /// use esp8266_stub::port::{SerialLinkConfig, SyncSerialPort};
    ///
    /// let config = SerialLinkConfig {
    ///     port_name: "/dev/ttyUSB0".to_string(),
    ///     ..Default::default()
    /// };
    /// let port = SyncSerialPort::open(&config)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(config: &SerialLinkConfig) -> Result<Self, PortError> {
        let settings = config.resolve()?;
        let port_name = config.port_name.as_str();

        let builder = serialport::new(port_name, settings.baud_rate)
            .data_bits(settings.data_bits.into())
            .flow_control(serialport::FlowControl::None)
            .parity(settings.parity.into())
            .stop_bits(settings.stop_bits.into())
            .timeout(settings.read_timeout());

        let port = open_with_settings(builder, &settings).map_err(|e| match e {
            PortError::Serial(e) => match e.kind() {
                serialport::ErrorKind::NoDevice => PortError::not_found(port_name),
                serialport::ErrorKind::InvalidInput => PortError::config(e.to_string()),
                _ => PortError::Serial(e),
            },
            other => other,
        })?;

        debug!(
            port = port_name,
            baud = settings.baud_rate,
            parity = ?settings.parity,
            vmin = settings.vmin,
            vtime = settings.vtime,
            "serial port opened"
        );

        Ok(Self {
            port,
            name: port_name.to_string(),
        })
    }
}

#[cfg(unix)]
fn open_with_settings(
    builder: serialport::SerialPortBuilder,
    settings: &LinkSettings,
) -> Result<Box<dyn serialport::SerialPort>, PortError> {
    use std::os::unix::io::AsRawFd;

    let native = builder.open_native()?;
    let fd = native.as_raw_fd();

    super::termios::apply_read_thresholds(fd, settings.vmin, settings.vtime)?;
    if settings.rs485.enabled {
        super::termios::apply_rs485(fd, settings.rs485)?;
    }

    Ok(Box::new(native))
}

#[cfg(not(unix))]
fn open_with_settings(
    builder: serialport::SerialPortBuilder,
    settings: &LinkSettings,
) -> Result<Box<dyn serialport::SerialPort>, PortError> {
    if settings.rs485.enabled {
        warn!("RS-485 direction control is not supported on this platform; ignoring");
    }
    if settings.vmin > 0 {
        warn!(vmin = settings.vmin, "minimum read count is not supported on this platform; ignoring");
    }
    Ok(builder.open()?)
}

impl SerialPortAdapter for SyncSerialPort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        self.port.write(data).map_err(PortError::Io)
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        match self.port.read(buffer) {
            Ok(n) => Ok(n),
            // A vanished USB adapter shows up as a broken pipe; report it as
            // end-of-input so the caller treats it as a closed link.
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                warn!(port = %self.name, "serial device disappeared");
                Ok(0)
            }
            Err(e) => Err(PortError::Io(e)),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn clear_buffers(&mut self) -> Result<(), PortError> {
        self.port
            .clear(serialport::ClearBuffer::All)
            .map_err(PortError::Serial)
    }
}

impl std::fmt::Debug for SyncSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSerialPort")
            .field("name", &self.name)
            .field("baud_rate", &self.port.baud_rate())
            .finish()
    }
}
