//! Mock serial port implementation for testing.
//!
//! Provides a `MockSerialPort` that simulates serial port behavior without
//! requiring actual hardware. Supports a read queue, a write log, and
//! injected timeouts, write failures and link closure.

use super::error::PortError;
use super::traits::SerialPortAdapter;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Inner state of the mock port, protected by a mutex for interior mutability.
#[derive(Debug, Default)]
struct MockPortState {
    /// Queue of bytes to be returned by read operations.
    read_queue: VecDeque<u8>,
    /// Log of all bytes written to the port.
    write_log: Vec<Vec<u8>>,
    /// Number of upcoming reads that should time out.
    pending_read_timeouts: usize,
    /// Number of upcoming writes that should fail.
    pending_write_failures: usize,
    /// Once set, an empty read queue reads as end-of-input.
    closed: bool,
}

/// Duration reported by injected read timeouts.
const SIMULATED_TIMEOUT: Duration = Duration::from_millis(100);

/// Mock serial port implementation for testing.
///
/// Clones share state, so a test can keep one handle for inspection while
/// the code under test owns another.
///
/// # Example
/// ```
/// use esp8266_stub::port::{MockSerialPort, SerialPortAdapter};
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.enqueue_read(b"AT\n");
/// port.close();
///
/// let mut buffer = [0u8; 8];
/// assert_eq!(port.read_bytes(&mut buffer).unwrap(), 3);
/// assert_eq!(port.read_bytes(&mut buffer).unwrap(), 0);
///
/// port.write_bytes(b"OK").unwrap();
/// assert_eq!(port.written(), b"OK");
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    /// The port name/identifier.
    name: String,
    /// The internal state, wrapped in Arc<Mutex<>> for interior mutability.
    state: Arc<Mutex<MockPortState>>,
}

impl MockSerialPort {
    /// Create a new mock serial port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockPortState> {
        // A panic in another test thread must not cascade into this one.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Enqueue bytes to be returned by subsequent read operations.
    pub fn enqueue_read(&mut self, data: &[u8]) {
        self.state().read_queue.extend(data);
    }

    /// Simulate the other end hanging up.
    ///
    /// Queued bytes are still delivered; after that every read returns `Ok(0)`.
    pub fn close(&mut self) {
        self.state().closed = true;
    }

    /// Make the next `count` reads fail with a timeout.
    pub fn timeout_next_reads(&mut self, count: usize) {
        self.state().pending_read_timeouts = count;
    }

    /// Make the next `count` writes fail with a broken-pipe error.
    pub fn fail_next_writes(&mut self, count: usize) {
        self.state().pending_write_failures = count;
    }

    /// Get a copy of every successful write, one entry per call.
    pub fn get_write_log(&self) -> Vec<Vec<u8>> {
        self.state().write_log.clone()
    }

    /// All written bytes concatenated.
    pub fn written(&self) -> Vec<u8> {
        self.state().write_log.concat()
    }

    /// Get the number of bytes available to read.
    pub fn available_bytes(&self) -> usize {
        self.state().read_queue.len()
    }
}

impl SerialPortAdapter for MockSerialPort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let mut state = self.state();

        if state.pending_write_failures > 0 {
            state.pending_write_failures -= 1;
            return Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "simulated write failure",
            )));
        }

        state.write_log.push(data.to_vec());
        Ok(data.len())
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let mut state = self.state();

        if state.pending_read_timeouts > 0 {
            state.pending_read_timeouts -= 1;
            return Err(PortError::timeout(SIMULATED_TIMEOUT));
        }

        let mut bytes_read = 0;
        for byte in buffer.iter_mut() {
            match state.read_queue.pop_front() {
                Some(queued) => {
                    *byte = queued;
                    bytes_read += 1;
                }
                None => break,
            }
        }

        if bytes_read == 0 && !buffer.is_empty() && !state.closed {
            // Nothing queued yet: behave like a non-blocking read.
            Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::WouldBlock,
                "No data available",
            )))
        } else {
            Ok(bytes_read)
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn clear_buffers(&mut self) -> Result<(), PortError> {
        self.state().read_queue.clear();
        Ok(())
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}
