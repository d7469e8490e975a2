//! End-to-end byte-sequence scenarios against the public `Telnet` API,
//! independent of the in-module unit tests in `src/`.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use telnet_engine::constants::{DO, DONT, IAC, IS, NAWS, SB, SE, SEND, TM, TTYPE, WILL, WONT};
use telnet_engine::event::ExtEvent;
use telnet_engine::{CmdReceived, Telnet, Transport};

#[derive(Clone, Default)]
struct RecordingTransport {
    written: Arc<Mutex<Vec<u8>>>,
    paused: Arc<Mutex<bool>>,
}

impl RecordingTransport {
    fn taken(&self) -> Vec<u8> {
        std::mem::take(&mut self.written.lock().unwrap())
    }
}

impl Transport for RecordingTransport {
    fn write(&mut self, data: &[u8]) -> std::io::Result<()> {
        self.written.lock().unwrap().extend_from_slice(data);
        Ok(())
    }

    fn pause_writing(&mut self) {
        *self.paused.lock().unwrap() = true;
    }

    fn resume_writing(&mut self) {
        *self.paused.lock().unwrap() = false;
    }
}

fn server() -> (Telnet, RecordingTransport) {
    let transport = RecordingTransport::default();
    let telnet = Telnet::with_defaults(Box::new(transport.clone()), true);
    (telnet, transport)
}

fn feed_all(telnet: &mut Telnet, bytes: &[u8]) -> Vec<bool> {
    bytes.iter().map(|&b| telnet.feed_byte(b).unwrap()).collect()
}

/// (a) Raw IAC escape: `FF FF 41` surfaces a single in-band `0x41`, with no
/// command callbacks and nothing written back.
#[test]
fn raw_iac_escape_surfaces_one_data_byte() {
    let (mut telnet, transport) = server();
    let consumed = feed_all(&mut telnet, &[IAC, IAC, 0x41]);
    assert_eq!(consumed, vec![true, false, false]);
    assert!(!telnet.iac_received());
    assert!(transport.taken().is_empty());
    assert_eq!(telnet.byte_count(), 3);
}

/// (b) Server accepts `WILL TTYPE`: replies `DO TTYPE` then immediately
/// requests the terminal type.
#[test]
fn server_accepts_will_ttype_and_requests_it() {
    let (mut telnet, transport) = server();
    feed_all(&mut telnet, &[IAC, WILL, TTYPE]);
    assert_eq!(transport.taken(), vec![IAC, DO, TTYPE, IAC, SB, TTYPE, SEND, IAC, SE]);
}

/// (c) NAWS decode: a 4-byte cols/rows payload dispatches the typed ext event.
#[test]
fn naws_subnegotiation_decodes_cols_and_rows() {
    let (mut telnet, _transport) = server();
    feed_all(&mut telnet, &[IAC, WILL, NAWS]);

    let seen = Arc::new(Mutex::new(None));
    let seen2 = seen.clone();
    telnet.set_ext_callback(telnet_engine::event::ExtKind::Naws, move |ev| {
        *seen2.lock().unwrap() = Some(ev);
    });

    feed_all(&mut telnet, &[IAC, SB, NAWS, 0x00, 0x84, 0x00, 0x2b, IAC, SE]);
    assert_eq!(*seen.lock().unwrap(), Some(ExtEvent::Naws { cols: 132, rows: 43 }));
}

/// (d) SB escape: a doubled IAC inside a sub-negotiation buffer contributes
/// exactly one literal `0xFF` byte, and the following `IAC SE` still
/// terminates normally.
#[test]
fn doubled_iac_inside_subnegotiation_is_one_literal_byte() {
    let (mut telnet, _transport) = server();
    feed_all(&mut telnet, &[IAC, WILL, NAWS]);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen2 = seen.clone();
    telnet.set_ext_callback(telnet_engine::event::ExtKind::Sndloc, move |ev| {
        if let ExtEvent::Sndloc(loc) = ev {
            seen2.lock().unwrap().push(loc);
        }
    });

    // SNDLOC payload containing a literal 0xFF byte, doubled on the wire.
    feed_all(
        &mut telnet,
        &[IAC, SB, telnet_engine::constants::SNDLOC, b'A', IAC, IAC, b'B', IAC, SE],
    );
    // The raw 0xFF byte is not valid UTF-8 on its own; `from_utf8_lossy`
    // maps it to the replacement character rather than codepoint U+00FF.
    assert_eq!(seen.lock().unwrap().as_slice(), [format!("A{}B", '\u{FFFD}')]);
}

/// (e) Timing mark: while a `DO TM` reply is pending, intervening data bytes
/// are discarded; the matching `WILL TM` clears the pending flag and lets
/// ordinary data through again.
#[test]
fn timing_mark_discards_bytes_until_reply_arrives() {
    let (mut telnet, transport) = server();
    telnet.iac(DO, TM).unwrap();
    transport.taken();

    assert!(telnet.feed_byte(b'A').unwrap());
    assert!(telnet.feed_byte(b'B').unwrap());
    assert!(telnet.feed_byte(b'C').unwrap());
    assert!(transport.taken().is_empty());

    feed_all(&mut telnet, &[IAC, WILL, TM]);
    assert!(!telnet.feed_byte(b'D').unwrap());
}

/// (f) NEW_ENVIRON SEND: learning the remote supports NEW_ENVIRON
/// auto-triggers a request for the default variable list, encoded
/// NUL-delimited and ETX-terminated.
#[test]
fn new_environ_accept_auto_requests_default_variables() {
    let (mut telnet, transport) = server();
    feed_all(&mut telnet, &[IAC, WILL, telnet_engine::constants::ENVIRON]);

    let written = transport.taken();
    assert_eq!(&written[..3], [IAC, SB, telnet_engine::constants::ENVIRON]);
    assert_eq!(&written[written.len() - 2..], [IAC, SE]);

    let payload = &written[3..written.len() - 2];
    assert_eq!(payload[0], SEND);
    assert_eq!(payload[1], IS);
    let names = std::str::from_utf8(&payload[2..payload.len() - 1]).unwrap();
    assert_eq!(names, "USER\x00HOSTNAME\x00UID\x00TERM\x00COLUMNS\x00LINES\x00DISPLAY\x00LANG\x00SYSTEMTYPE\x00ACCT\x00JOB\x00PRINTER\x00SFUTLNTVER\x00SFUTLNTMODE\x00LC_ALL\x00VISUAL\x00EDITOR\x00LC_COLLATE\x00LC_CTYPE\x00LC_MESSAGES\x00LC_MONETARY\x00LC_NUMERIC\x00LC_TIME");
    assert_eq!(payload[payload.len() - 1], 0x03);

    // A second, explicit request is skipped while the first is still
    // pending - the Q-method "unique pending entry" rule extended to
    // sub-negotiation requests (spec §3, §4.6).
    assert!(!telnet.request_env(Some(&["USER".to_string()])));
}

/// Invariant: `byte_count` tracks exactly the number of bytes fed, regardless
/// of how many of them were consumed as protocol vs. surfaced as data.
#[test]
fn byte_count_matches_bytes_fed() {
    let (mut telnet, _transport) = server();
    let bytes = [IAC, WILL, TTYPE, b'h', b'i', IAC, IAC, b'!'];
    feed_all(&mut telnet, &bytes);
    assert_eq!(telnet.byte_count(), bytes.len() as u64);
}

/// Invariant: a second identical `iac(DO, opt)` call while the first is
/// still pending produces no additional wire bytes.
#[test]
fn repeated_do_request_is_idempotent_while_pending() {
    let (mut telnet, transport) = server();
    telnet.iac(DO, telnet_engine::constants::CHARSET).unwrap();
    let first = transport.taken();
    assert_eq!(first, vec![IAC, DO, telnet_engine::constants::CHARSET]);

    telnet.iac(DO, telnet_engine::constants::CHARSET).unwrap();
    assert!(transport.taken().is_empty());
}

/// Invariant: `DONT opt` for an option already disabled locally produces no
/// outbound reply (declining an already-declined option must never loop).
#[test]
fn dont_for_already_disabled_option_is_silent() {
    let (mut telnet, transport) = server();
    feed_all(&mut telnet, &[IAC, DONT, telnet_engine::constants::SGA]);
    assert!(transport.taken().is_empty());
}

/// `is_oob` tracks exactly the byte-feed's command-in-progress state: true
/// while a `DO`/`DONT`/`WILL`/`WONT` or `SB...SE` sequence is open, false for
/// in-band data.
#[test]
fn is_oob_reflects_command_in_progress() {
    let (mut telnet, _transport) = server();
    assert!(!telnet.is_oob());

    telnet.feed_byte(IAC).unwrap();
    assert!(telnet.is_oob());

    telnet.feed_byte(WILL).unwrap();
    assert!(telnet.is_oob());
    assert!(matches!(telnet.cmd_received(), CmdReceived::Pending(WILL)));

    telnet.feed_byte(telnet_engine::constants::BINARY).unwrap();
    // The command completed on this call - still observably out-of-band
    // until the next byte resets `cmd_received`.
    assert!(telnet.is_oob());
    assert!(matches!(telnet.cmd_received(), CmdReceived::Complete(WILL, b) if b == telnet_engine::constants::BINARY));

    telnet.feed_byte(b'x').unwrap();
    assert!(!telnet.is_oob());
}

/// `WONT opt` unconditionally clears `remote_option`, even if it was never
/// set - this must never itself trigger an outbound reply.
#[test]
fn wont_with_no_prior_negotiation_clears_silently() {
    let (mut telnet, transport) = server();
    feed_all(&mut telnet, &[IAC, WONT, telnet_engine::constants::ECHO]);
    assert!(transport.taken().is_empty());
    assert!(!telnet.is_linemode());
}
