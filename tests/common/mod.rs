//! Shared test utilities for the stub's integration tests.

#![allow(dead_code)]

use esp8266_stub::port::{MockSerialPort, PortError};
use esp8266_stub::responder::{Responder, ResponderStats, RuleSet};

/// Outcome of feeding a byte script through a responder until the link closes.
pub struct Session {
    /// Everything the stub wrote back.
    pub output: Vec<u8>,
    /// One entry per reply write.
    pub writes: Vec<Vec<u8>>,
    /// Why the loop stopped.
    pub exit: PortError,
    pub stats: ResponderStats,
}

/// Create a mock port that delivers `input` and then hangs up.
pub fn closed_mock_with(input: &[u8]) -> MockSerialPort {
    let mut mock = MockSerialPort::new("MOCK0");
    mock.enqueue_read(input);
    mock.close();
    mock
}

/// Run the ESP8266 rule set over `input` until end-of-input.
pub fn run_script(input: &[u8]) -> Session {
    run_mock(closed_mock_with(input))
}

/// Run a prepared mock to completion.
pub fn run_mock(mock: MockSerialPort) -> Session {
    let observer = mock.clone();
    let mut responder = Responder::new(mock, RuleSet::esp8266());

    let exit = match responder.run() {
        Err(e) => e,
        Ok(()) => panic!("responder returned without an error"),
    };

    Session {
        output: observer.written(),
        writes: observer.get_write_log(),
        exit,
        stats: responder.stats(),
    }
}

/// The fixed exact-match table: (command, reply).
pub const EXACT_COMMANDS: [(&str, &[u8]); 6] = [
    ("AT+RST", b"ready"),
    ("AT+CWMODE=1", b"\n\n\n"),
    ("AT+CIPMUX=1", b"\n\n\n"),
    ("AT+CWJAP=\"xxxx\",\"xxxxxxxx\"", b"OK"),
    ("AT+CIPSTART=0,\"TCP\",\"23.203.214.89\",80", b"OK"),
    ("AT+CIPSTATUS", b"OK"),
];
