//! Port abstraction layer for serial communication.
//!
//! Provides the `SerialPortAdapter` trait with a real and a mock
//! implementation, the validated link options, and an `std::io` bridge.

pub mod error;
pub mod link;
pub mod mock;
pub mod stream;
pub mod sync_port;
#[cfg(unix)]
mod termios;
pub mod traits;

pub use error::PortError;
pub use link::{LinkError, LinkSettings, Rs485Config, SerialLinkConfig};
pub use mock::MockSerialPort;
pub use stream::PortStream;
pub use sync_port::SyncSerialPort;
pub use traits::*;
