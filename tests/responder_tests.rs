//! End-to-end tests of the line responder over a mock serial port.

mod common;

use common::{closed_mock_with, run_mock, run_script, EXACT_COMMANDS};
use esp8266_stub::port::PortError;
use esp8266_stub::responder::MAX_LINE_LEN;
use pretty_assertions::assert_eq;

#[test]
fn test_reset_replies_ready_without_newline() {
    let session = run_script(b"AT+RST\n");
    assert_eq!(session.output, b"ready".to_vec());
}

#[test]
fn test_cwmode_replies_three_newlines() {
    let session = run_script(b"AT+CWMODE=1\n");
    assert_eq!(session.output, b"\n\n\n".to_vec());
}

#[test]
fn test_post_replies_ok() {
    let session = run_script(b"POST /data HTTP/1.1\n");
    assert_eq!(session.output, b"OK".to_vec());
}

#[test]
fn test_cipsend_replies_prompt() {
    let session = run_script(b"AT+CIPSEND=0,128\n");
    assert_eq!(session.output, b">".to_vec());
}

#[test]
fn test_every_exact_command() {
    for (command, reply) in EXACT_COMMANDS {
        let session = run_script(format!("{command}\n").as_bytes());
        assert_eq!(session.writes, vec![reply.to_vec()], "command {command}");
    }
}

#[test]
fn test_unknown_line_is_silent_and_loop_continues() {
    let session = run_script(b"UNKNOWN\nAT+CIPSTATUS\n");
    assert_eq!(session.output, b"OK".to_vec());
    assert_eq!(session.stats.lines_received, 2);
    assert_eq!(session.stats.unmatched, 1);
    assert_eq!(session.stats.replies_written, 1);
}

#[test]
fn test_near_misses_are_silent() {
    let session = run_script(b"at+rst\nAT+RST \n AT+RST\nAT+CIPSEND=1,5\nPOST\nAT+CWMODE=2\n");
    assert!(session.output.is_empty());
    assert_eq!(session.stats.unmatched, 6);
}

#[test]
fn test_full_http_post_exchange() {
    let script = concat!(
        "AT+RST\r\n",
        "AT+CWMODE=1\r\n",
        "AT+CIPMUX=1\r\n",
        "AT+CWJAP=\"xxxx\",\"xxxxxxxx\"\r\n",
        "AT+CIPSTART=0,\"TCP\",\"23.203.214.89\",80\r\n",
        "AT+CIPSTATUS\r\n",
        "AT+CIPSEND=0,42\r\n",
        "POST /api/readings HTTP/1.1\r\n",
        "Host: 23.203.214.89\r\n",
        "\r\n",
    );
    let session = run_script(script.as_bytes());

    let expected: Vec<Vec<u8>> = vec![
        b"ready".to_vec(),
        b"\n\n\n".to_vec(),
        b"\n\n\n".to_vec(),
        b"OK".to_vec(),
        b"OK".to_vec(),
        b"OK".to_vec(),
        b">".to_vec(),
        b"OK".to_vec(),
    ];
    assert_eq!(session.writes, expected);
    assert_eq!(session.stats.lines_received, 10);
    assert_eq!(session.stats.unmatched, 2);
}

#[test]
fn test_closed_link_ends_with_error() {
    let session = run_script(b"");
    assert!(matches!(session.exit, PortError::Closed));
    assert_eq!(session.stats.lines_received, 0);
}

#[test]
fn test_trailing_fragment_is_answered_before_close() {
    let session = run_script(b"AT+CIPSTATUS\nAT+RST");
    assert_eq!(session.output, b"OKready".to_vec());
    assert!(matches!(session.exit, PortError::Closed));
}

#[test]
fn test_read_timeouts_are_retried() {
    let mut mock = closed_mock_with(b"AT+RST\n");
    mock.timeout_next_reads(3);
    let session = run_mock(mock);
    assert_eq!(session.output, b"ready".to_vec());
}

#[test]
fn test_write_failures_do_not_stop_the_loop() {
    let mut mock = closed_mock_with(b"AT+RST\nAT+CIPSTATUS\nPOST / HTTP/1.1\n");
    mock.fail_next_writes(2);
    let session = run_mock(mock);

    assert_eq!(session.output, b"OK".to_vec());
    assert_eq!(session.stats.write_failures, 2);
    assert_eq!(session.stats.replies_written, 1);
    assert!(matches!(session.exit, PortError::Closed));
}

#[test]
fn test_invalid_utf8_is_not_fatal() {
    let session = run_script(b"\xff\xfe\nAT+RST\n");
    assert_eq!(session.output, b"ready".to_vec());
    assert_eq!(session.stats.lines_received, 2);
}

#[test]
fn test_unterminated_flood_stops_the_loop() {
    let mut input = vec![b'A'; MAX_LINE_LEN * 4];
    input.extend_from_slice(b"\nAT+RST\n");
    let session = run_script(&input);

    match session.exit {
        PortError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::InvalidData),
        other => panic!("Expected InvalidData, got {:?}", other),
    }
    assert!(session.output.is_empty());
    assert_eq!(session.stats.lines_received, 0);
}
