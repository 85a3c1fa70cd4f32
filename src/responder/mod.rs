//! The line responder: read a command line, answer it, repeat.
//!
//! Each line is judged on its own; nothing is remembered between lines.
//! A failed reply is logged and skipped. Only a failed read (including the
//! link closing) stops the loop.

pub mod rules;

pub use rules::{Matcher, ResponseRule, RuleSet, ESP8266_RULES};

/// Longest line accepted, terminator included. Anything longer ends the
/// loop, the same way a standard line scanner gives up on an oversized token.
pub const MAX_LINE_LEN: usize = 64 * 1024;

use crate::port::{PortError, PortStream, SerialPortAdapter};
use std::io::{self, BufRead, BufReader, Read, Write};
use tracing::{debug, info, warn};

/// What happened to the reply for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The reply went out; carries the byte count.
    Written(usize),
    /// The write failed and was dropped.
    Failed,
}

/// Running totals, reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponderStats {
    pub lines_received: u64,
    pub unmatched: u64,
    pub replies_written: u64,
    pub bytes_written: u64,
    pub write_failures: u64,
}

/// Answers AT command lines arriving on a serial port.
#[derive(Debug)]
pub struct Responder<P: SerialPortAdapter> {
    reader: BufReader<PortStream<P>>,
    rules: RuleSet,
    line: Vec<u8>,
    stats: ResponderStats,
}

impl<P: SerialPortAdapter> Responder<P> {
    pub fn new(port: P, rules: RuleSet) -> Self {
        Self {
            reader: BufReader::new(PortStream::new(port)),
            rules,
            line: Vec::new(),
            stats: ResponderStats::default(),
        }
    }

    pub fn port(&self) -> &P {
        self.reader.get_ref().port()
    }

    pub fn stats(&self) -> ResponderStats {
        self.stats
    }

    /// Throw away whatever arrived before the loop started, both in the
    /// driver and in the read buffer.
    pub fn discard_pending_input(&mut self) -> Result<(), PortError> {
        let buffered = self.reader.buffer().len();
        self.reader.consume(buffered);
        self.reader.get_mut().port_mut().clear_buffers()
    }

    /// Serve lines until the link fails.
    ///
    /// Only returns with an error: `PortError::Closed` when the other end
    /// hangs up, or the underlying I/O error.
    pub fn run(&mut self) -> Result<(), PortError> {
        info!(
            port = self.port().name(),
            rules = self.rules.len(),
            "responder listening"
        );

        let err = loop {
            match self.next_line() {
                Ok(Some(line)) => {
                    self.handle_line(&line);
                }
                Ok(None) => break PortError::Closed,
                Err(e) => break e,
            }
        };

        info!(stats = ?self.stats, "responder stopped");
        Err(err)
    }

    /// Block until a complete line arrives and return it without its
    /// terminator.
    ///
    /// Timeouts from the transport just mean no line yet; bytes already
    /// received are kept. If the link ends in the middle of a line, that
    /// fragment is returned first and `Ok(None)` on the following call.
    ///
    /// A line that reaches [`MAX_LINE_LEN`] without a terminator is an
    /// `InvalidData` error.
    pub fn next_line(&mut self) -> Result<Option<String>, PortError> {
        self.line.clear();
        loop {
            let remaining = (MAX_LINE_LEN - self.line.len()) as u64;
            match (&mut self.reader)
                .take(remaining)
                .read_until(b'\n', &mut self.line)
            {
                Ok(_) if self.line.ends_with(b"\n") => break,
                Ok(_) if self.line.len() >= MAX_LINE_LEN => {
                    return Err(PortError::Io(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("line exceeds {MAX_LINE_LEN} bytes without a terminator"),
                    )));
                }
                // Short of the limit and no terminator: the link hit end-of-input.
                Ok(_) if self.line.is_empty() => return Ok(None),
                Ok(_) => break,
                Err(e) if is_transient(&e) => continue,
                Err(e) => return Err(PortError::Io(e)),
            }
        }
        self.stats.lines_received += 1;
        Ok(Some(decode_line(&self.line)))
    }

    /// Answer one line: write the first matching reply, if any.
    pub fn handle_line(&mut self, line: &str) -> Option<WriteOutcome> {
        info!("PC: <<< {}", line);

        let Some(rule) = self.rules.find(line) else {
            self.stats.unmatched += 1;
            debug!(line, "no rule matched");
            return None;
        };
        debug!(pattern = rule.matcher.pattern(), "rule matched");
        let reply = rule.reply.as_bytes();

        let outcome = match self.reader.get_mut().write_all(reply) {
            Ok(()) => {
                self.stats.replies_written += 1;
                self.stats.bytes_written += reply.len() as u64;
                info!("Wrote {} bytes", reply.len());
                WriteOutcome::Written(reply.len())
            }
            Err(e) => {
                self.stats.write_failures += 1;
                warn!(error = %e, "Error writing to serial port");
                WriteOutcome::Failed
            }
        };
        Some(outcome)
    }
}

fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

/// Drop the `\n` (and a `\r` before it) and decode, replacing invalid UTF-8.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
