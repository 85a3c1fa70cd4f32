//! `std::io` view of a `SerialPortAdapter`.
//!
//! Lets the port sit under a `BufReader` while writes still go to the same
//! device through `BufReader::get_mut`.

use super::traits::SerialPortAdapter;
use std::io;

/// Duplex byte stream over any `SerialPortAdapter`.
#[derive(Debug)]
pub struct PortStream<P> {
    port: P,
}

impl<P: SerialPortAdapter> PortStream<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }
}

impl<P: SerialPortAdapter> io::Read for PortStream<P> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read_bytes(buf).map_err(io::Error::from)
    }
}

impl<P: SerialPortAdapter> io::Write for PortStream<P> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write_bytes(buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
