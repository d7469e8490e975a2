#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

// RFC 854 `<https://tools.ietf.org/html/rfc854>`
//
// Originally based off of https://github.com/jtenner/telnet_codec, which has
// been archived.

/// Callback registries for IAC commands, SLC functions, and decoded
/// sub-negotiations.
pub mod callback;
/// Various byte or byte sequences used in the Telnet protocol.
pub mod constants;
/// NEW_ENVIRON variable exchange.
pub mod env;
/// Codec and Io errors that may occur while processing Telnet events.
pub mod error;
/// Top-level Telnet events: IAC commands and decoded sub-negotiations.
pub mod event;
/// The LINEMODE subsystem: mode mask, SLC dispatch values, forwardmask.
pub mod linemode;
/// Telnet options such as Echo, GoAhead, and SuppressGoAhead.
pub mod option;
/// The per-function Special Line Character table and its negotiation.
pub mod slc;
/// Telnet subnegotiation options.
pub mod subnegotiation;

use std::mem;

use bytes::Bytes;

use crate::{
    callback::CallbackRegistry,
    constants::{
        BINARY, CHARSET, CHARSET_ACCEPTED, CHARSET_REJECTED, CHARSET_REQUEST,
        CHARSET_TTABLE_REJECTED, DO, DONT, ENVIRON, EOR_CMD, GA, IAC, IS, LFLOW, LFLOW_RESTART_ANY,
        LFLOW_RESTART_XON, LMODE_FORWARDMASK, LMODE_MODE, LMODE_MODE_ACK, LMODE_SLC, LINEMODE,
        NAWS, SB, SB_MAXSIZE, SE, SEND, SGA, SLC_MAXSIZE, SNDLOC, STATUS, TELOPT_EOR, TM, TSPEED,
        TTYPE, WILL, WONT, XDISPLOC,
    },
    env::{decode_env_vars, encode_env_send, EnvironmentOperation},
    error::TelnetError,
    event::{ExtEvent, IacCommand},
    linemode::{Forwardmask, Linemode, Modifiers},
    option::{NegotiationKey, OptionTable, TelnetOption},
    slc::{SlcOutcome, SlcTable},
    subnegotiation::SubnegotiationType,
};

type Result<T> = std::result::Result<T, TelnetError>;

/// The side effect a [`Telnet`] engine needs from its embedder: somewhere to
/// write outbound bytes, plus the flow-control hooks the LFLOW/LINEMODE
/// subsystems drive.
pub trait Transport: Send {
    fn write(&mut self, data: &[u8]) -> std::io::Result<()>;

    /// Called when the remote has asked us to stop sending (`LFLOW` XOFF or
    /// equivalent). Default is a no-op; embedders backed by a real socket
    /// typically pause their write-side task here.
    fn pause_writing(&mut self) {}

    /// Called when the remote has asked us to resume sending.
    fn resume_writing(&mut self) {}

    /// Called when the engine considers the connection no longer viable.
    fn close(&mut self) {}
}

/// What the last [`Telnet::feed_byte`] call observed about the Telnet
/// command layer. Resets to `None` at the start of every call except while a
/// multi-byte command (`DO`/`DONT`/`WILL`/`WONT`/`SB ... IAC SE`) is still
/// being assembled, in which case it stays `Pending` across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdReceived {
    /// No command byte was in flight for this call.
    None,
    /// The command byte (`DO`/`DONT`/`WILL`/`WONT`/`SB`) has arrived but its
    /// argument bytes have not - carries the command byte itself.
    Pending(u8),
    /// A command completed on this call: `(cmd, opt)` for negotiation, or
    /// `(0, cmd)` for a single-byte IAC command.
    Complete(u8, u8),
}

/// A Telnet protocol engine: an `IAC`-stream interpreter driving three
/// option tables, SLC/LINEMODE reconciliation, and a set of sub-negotiation
/// decoders, all pushed through [`Telnet::feed_byte`] one byte at a time.
///
/// This is deliberately synchronous and single-threaded - there is no
/// internal buffering beyond what a single in-flight command or
/// sub-negotiation requires, and no task spawning. Embedders own the byte
/// source (a socket read loop, a test harness, ...) and call `feed_byte`
/// for each byte as it arrives.
pub struct Telnet {
    transport: Box<dyn Transport>,
    is_server: bool,

    local_option: OptionTable,
    remote_option: OptionTable,
    pending_option: OptionTable,

    linemode: Option<Linemode>,
    default_linemode: Linemode,
    slc_table: SlcTable,

    sb_buffer: Vec<u8>,
    iac_received: bool,
    cmd_received: CmdReceived,
    slc_received: Option<linemode::SlcFunction>,

    byte_count: u64,
    xmit: bool,
    xon_any: bool,
    slc_simulated: bool,

    default_env_request: Vec<String>,
    callbacks: CallbackRegistry,

    /// Per-instance span all of this engine's log events are scoped under,
    /// keyed by role so a multi-connection embedder can filter logs by
    /// server/client side.
    span: tracing::Span,
}

impl Telnet {
    /// Builds a new engine. `is_server` fixes the role-specific negotiation
    /// policy (e.g. only a server ever receives `WILL ECHO` as illegal) for
    /// the life of the connection. `slc_table` seeds the initial SLC tabset
    /// (the conventional Unix termios bindings unless the embedder has
    /// something else to offer); `xon_any` is the initial LFLOW mode
    /// (restart-on-any-key vs. restart-on-XON-only); `slc_simulated` turns on
    /// kludge-mode SLC snooping of plain data bytes before real LINEMODE has
    /// been negotiated.
    #[must_use]
    pub fn new(
        transport: Box<dyn Transport>,
        is_server: bool,
        slc_table: SlcTable,
        xon_any: bool,
        slc_simulated: bool,
    ) -> Self {
        let span = tracing::span!(
            tracing::Level::DEBUG,
            "telnet",
            role = if is_server { "server" } else { "client" }
        );
        Telnet {
            transport,
            is_server,
            local_option: OptionTable::new("local"),
            remote_option: OptionTable::new("remote"),
            pending_option: OptionTable::new("pending"),
            linemode: None,
            default_linemode: Linemode::default_server(),
            slc_table,
            sb_buffer: Vec::new(),
            iac_received: false,
            cmd_received: CmdReceived::None,
            slc_received: None,
            byte_count: 0,
            xmit: true,
            xon_any,
            slc_simulated,
            default_env_request: crate::constants::DEFAULT_ENV_REQUEST
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            callbacks: CallbackRegistry::new(),
            span,
        }
    }

    /// Builds an engine with the conventional defaults: the Unix termios SLC
    /// tabset, XON/XOFF-only flow control, and kludge-mode SLC simulation
    /// turned on (matching the behavior of the engine this design descends
    /// from, which enables SLC simulation unless LINEMODE takes over).
    #[must_use]
    pub fn with_defaults(transport: Box<dyn Transport>, is_server: bool) -> Self {
        Self::new(transport, is_server, SlcTable::default(), false, true)
    }

    // ---- byte-feed interpreter -------------------------------------------------

    /// Feeds one byte of the inbound stream through the protocol layer.
    ///
    /// Returns `Ok(true)` if the byte was consumed by the Telnet command
    /// layer (an `IAC` escape, a negotiation byte, sub-negotiation payload,
    /// or an SLC-bound character), and `Ok(false)` if it is plain data the
    /// caller should still treat as application input.
    pub fn feed_byte(&mut self, byte: u8) -> Result<bool> {
        let _enter = self.span.clone().entered();
        let consumed = self.feed_byte_inner(byte)?;

        // Mirrors the trailing check the engine this design descends from
        // runs unconditionally at the end of every byte: once paused by an
        // XOFF, any subsequent non-OOB byte resumes transmission if the
        // remote asked for "restart on any key" flow control. This fires
        // even for the byte that just caused the pause, matching that
        // engine's behavior exactly.
        if !self.xmit && self.xon_any && !self.is_oob() {
            self.xmit = true;
            self.transport.resume_writing();
            self.callbacks.dispatch_slc(linemode::SlcFunction::Xon, byte);
        }

        Ok(consumed)
    }

    fn feed_byte_inner(&mut self, byte: u8) -> Result<bool> {
        self.byte_count += 1;

        if !matches!(self.cmd_received, CmdReceived::Pending(_)) {
            self.cmd_received = CmdReceived::None;
        }
        self.slc_received = None;

        if let CmdReceived::Pending(pending_cmd) = self.cmd_received {
            return self.feed_pending(pending_cmd, byte);
        }

        if self.iac_received {
            self.iac_received = false;
            return self.feed_second_byte(byte);
        }

        if byte == IAC {
            self.iac_received = true;
            return Ok(true);
        }

        if self.pending_option.enabled(NegotiationKey::Negotiation(DO, TM)) {
            tracing::debug!(byte, "discarded pending timing mark reply");
            return Ok(true);
        }

        if self.should_snoop_slc() {
            if let Some((func, _)) =
                self.slc_table.tabset(false).into_iter().find(|(_, entry)| entry.value == byte)
            {
                let function = linemode::SlcFunction::from(func);
                self.slc_received = Some(function);
                match function {
                    linemode::SlcFunction::Xoff => {
                        self.xmit = false;
                        self.transport.pause_writing();
                    }
                    linemode::SlcFunction::Xon => {
                        self.xmit = true;
                        self.transport.resume_writing();
                    }
                    _ => {}
                }
                self.callbacks.dispatch_slc(function, byte);
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn feed_pending(&mut self, pending_cmd: u8, byte: u8) -> Result<bool> {
        match pending_cmd {
            DO | DONT | WILL | WONT => {
                let opt = byte;
                self.cmd_received = CmdReceived::Complete(pending_cmd, opt);
                match pending_cmd {
                    DO => self.handle_do(opt)?,
                    DONT => self.handle_dont(opt)?,
                    WILL => self.handle_will(opt)?,
                    WONT => self.handle_wont(opt)?,
                    _ => unreachable!(),
                }
                Ok(true)
            }
            SB => {
                if self.iac_received {
                    self.iac_received = false;
                    return match byte {
                        SE => self.end_subnegotiation().map(|()| true),
                        IAC => {
                            self.push_sb_byte(IAC)?;
                            Ok(true)
                        }
                        _ => {
                            tracing::warn!(
                                byte,
                                "IAC inside SB not followed by SE or IAC, discarding buffer"
                            );
                            self.sb_buffer.clear();
                            self.cmd_received = CmdReceived::None;
                            Ok(true)
                        }
                    };
                }
                if byte == IAC {
                    self.iac_received = true;
                    return Ok(true);
                }
                self.push_sb_byte(byte)?;
                Ok(true)
            }
            _ => unreachable!("only DO/DONT/WILL/WONT/SB persist as Pending"),
        }
    }

    fn feed_second_byte(&mut self, byte: u8) -> Result<bool> {
        match byte {
            IAC => Ok(false), // a doubled IAC resolves to one literal 0xff data byte
            DO | DONT | WILL | WONT | SB => {
                self.cmd_received = CmdReceived::Pending(byte);
                if byte == SB {
                    self.sb_buffer.clear();
                }
                Ok(true)
            }
            other => {
                self.cmd_received = CmdReceived::Complete(0, other);
                self.callbacks.dispatch_iac(IacCommand::from(other));
                Ok(true)
            }
        }
    }

    fn push_sb_byte(&mut self, byte: u8) -> Result<()> {
        if self.sb_buffer.len() >= SB_MAXSIZE {
            return Err(TelnetError::SubnegotiationBufferOverflow { limit: SB_MAXSIZE });
        }
        self.sb_buffer.push(byte);
        Ok(())
    }

    fn end_subnegotiation(&mut self) -> Result<()> {
        self.cmd_received = CmdReceived::None;
        let buffer = mem::take(&mut self.sb_buffer);
        let Some((&opt, payload)) = buffer.split_first() else { return Ok(()) };
        self.dispatch_subnegotiation(opt, payload)
    }

    /// Whether an as-yet-unclassified data byte should instead be snooped
    /// for an SLC match: either we are faking LINEMODE locally (kludge-mode
    /// SLC simulation), or the remote is in real client-side LINEMODE with
    /// local (non-forwarded) character handling.
    fn should_snoop_slc(&self) -> bool {
        if self.is_linemode() {
            matches!(self.linemode, Some(lm) if lm.remote())
        } else {
            self.slc_simulated
        }
    }

    // ---- negotiation handlers ---------------------------------------------------

    /// The hard role-violation class: combinations that can never make sense
    /// no matter what else has happened on the wire. `LOGOUT`, `ECHO` at the
    /// client end, `TIMING_MARK`, and `DO LINEMODE` at the server end are
    /// handled with a soft warn-and-ignore directly in their respective
    /// `handle_*` methods instead, since a peer sending those is a normal (if
    /// confused) occurrence, not a protocol violation worth tearing the
    /// connection down over.
    fn check_role(&self, cmd: u8, opt: TelnetOption) -> Result<()> {
        use TelnetOption::{Echo, Linemode as Lm, Naws, Sndloc};

        let illegal = matches!(
            (self.is_server, cmd, opt),
            (true, WILL, Echo) | (false, WILL, Naws) | (false, WILL, Lm) | (false, WILL, Sndloc)
        );

        if illegal {
            return Err(TelnetError::IllegalForRole {
                cmd,
                opt,
                role: if self.is_server { "server" } else { "client" },
            });
        }
        Ok(())
    }

    /// Q-method negotiation emitter (RFC 1143): the only path by which this
    /// engine itself originates a `DO`/`DONT`/`WILL`/`WONT`, guarding against
    /// the negotiation loops a naive "always reply" implementation falls
    /// into.
    pub fn iac(&mut self, cmd: u8, opt: u8) -> Result<()> {
        let _enter = self.span.clone().entered();
        let opt_key = NegotiationKey::Option(opt);
        let pending_key = NegotiationKey::Negotiation(cmd, opt);

        match cmd {
            DO => {
                if self.remote_option.enabled(opt_key) || self.pending_option.enabled(pending_key)
                {
                    return Ok(());
                }
                self.pending_option.set(pending_key, true);
            }
            WILL => {
                if (self.local_option.enabled(opt_key) && opt != TM)
                    || self.pending_option.enabled(pending_key)
                {
                    return Ok(());
                }
                self.pending_option.set(pending_key, true);
            }
            DONT => self.remote_option.set(opt_key, false),
            WONT => self.local_option.set(opt_key, false),
            _ => {}
        }

        self.transport.write(&[IAC, cmd, opt]).map_err(TelnetError::from)
    }

    fn handle_do(&mut self, opt_byte: u8) -> Result<()> {
        let opt = TelnetOption::from(opt_byte);

        if opt_byte == TM {
            return self.transport.write(&[IAC, WILL, TM]).map_err(TelnetError::from);
        }

        if opt == TelnetOption::Echo && !self.is_server {
            tracing::warn!("DO ECHO is invalid at the client end, ignoring");
            return Ok(());
        }

        if opt == TelnetOption::Logout {
            if self.is_server {
                self.callbacks.dispatch_ext(ExtEvent::Logout(DO));
            } else {
                tracing::warn!("DO LOGOUT is invalid at the client end, ignoring");
            }
            return Ok(());
        }

        if opt == TelnetOption::Linemode && self.is_server {
            tracing::warn!("DO LINEMODE is invalid at the server end, ignoring");
            return Ok(());
        }

        self.check_role(DO, opt)?;

        let known = matches!(
            opt,
            TelnetOption::Echo
                | TelnetOption::Linemode
                | TelnetOption::Binary
                | TelnetOption::SuppressGoAhead
                | TelnetOption::Lflow
                | TelnetOption::Exopl
                | TelnetOption::EndOfRecord
                | TelnetOption::Status
        );

        let opt_key = NegotiationKey::Option(opt_byte);
        let pending_key = NegotiationKey::Negotiation(WILL, opt_byte);

        if !known {
            if !self.local_option.contains(opt_key) {
                tracing::warn!(?opt, "unhandled DO");
                self.transport.write(&[IAC, WONT, opt_byte])?;
            }
            return Ok(());
        }

        if self.pending_option.enabled(pending_key) {
            self.pending_option.set(pending_key, false);
            self.local_option.set(opt_key, true);
        } else if !self.local_option.enabled(opt_key) {
            self.local_option.set(opt_key, true);
            self.transport.write(&[IAC, WILL, opt_byte])?;
        }

        if opt == TelnetOption::Status {
            self.send_status()?;
        }
        Ok(())
    }

    fn handle_dont(&mut self, opt_byte: u8) -> Result<()> {
        let opt = TelnetOption::from(opt_byte);
        let opt_key = NegotiationKey::Option(opt_byte);
        let pending_key = NegotiationKey::Negotiation(WILL, opt_byte);
        let was_enabled = self.local_option.enabled(opt_key);
        self.local_option.set(opt_key, false);

        if opt == TelnetOption::Logout {
            self.callbacks.dispatch_ext(ExtEvent::Logout(DONT));
        }

        if self.pending_option.enabled(pending_key) {
            self.pending_option.set(pending_key, false);
            Ok(())
        } else if was_enabled {
            self.transport.write(&[IAC, WONT, opt_byte]).map_err(TelnetError::from)
        } else {
            Ok(())
        }
    }

    fn handle_will(&mut self, opt_byte: u8) -> Result<()> {
        let opt = TelnetOption::from(opt_byte);

        if opt_byte == TM {
            let pending_key = NegotiationKey::Negotiation(DO, TM);
            if self.pending_option.enabled(pending_key) {
                self.pending_option.set(pending_key, false);
            } else {
                tracing::warn!("WILL TM received without a prior DO TM");
            }
            return Ok(());
        }

        if opt == TelnetOption::Logout {
            if self.is_server {
                tracing::warn!("WILL LOGOUT is invalid at the server end, ignoring");
            } else {
                self.callbacks.dispatch_ext(ExtEvent::Logout(WILL));
            }
            return Ok(());
        }

        self.check_role(WILL, opt)?;

        let known = matches!(
            opt,
            TelnetOption::Binary
                | TelnetOption::SuppressGoAhead
                | TelnetOption::Echo
                | TelnetOption::Naws
                | TelnetOption::Linemode
                | TelnetOption::EndOfRecord
                | TelnetOption::Sndloc
                | TelnetOption::Status
                | TelnetOption::Lflow
                | TelnetOption::NewEnviron
                | TelnetOption::Charset
                | TelnetOption::Xdisploc
                | TelnetOption::Ttype
                | TelnetOption::Tspeed
        );

        let opt_key = NegotiationKey::Option(opt_byte);
        let pending_key = NegotiationKey::Negotiation(DO, opt_byte);

        if !known {
            self.remote_option.set(opt_key, false);
            self.transport.write(&[IAC, DONT, opt_byte])?;
            return Err(TelnetError::UnhandledOption { cmd: WILL, opt });
        }

        let newly_enabled = if self.pending_option.enabled(pending_key) {
            self.pending_option.set(pending_key, false);
            let was = self.remote_option.enabled(opt_key);
            self.remote_option.set(opt_key, true);
            !was
        } else if self.remote_option.enabled(opt_key) {
            false
        } else {
            self.remote_option.set(opt_key, true);
            self.transport.write(&[IAC, DO, opt_byte])?;
            true
        };

        if newly_enabled {
            self.after_remote_will(opt_byte);
        }
        Ok(())
    }

    fn handle_wont(&mut self, opt_byte: u8) -> Result<()> {
        let opt = TelnetOption::from(opt_byte);
        let opt_key = NegotiationKey::Option(opt_byte);
        let pending_key = NegotiationKey::Negotiation(DO, opt_byte);
        let was_enabled = self.remote_option.enabled(opt_key);
        self.remote_option.set(opt_key, false);

        if opt == TelnetOption::Logout && !self.is_server {
            self.callbacks.dispatch_ext(ExtEvent::Logout(WONT));
        }

        if self.pending_option.enabled(pending_key) {
            self.pending_option.set(pending_key, false);
            Ok(())
        } else if was_enabled {
            self.transport.write(&[IAC, DONT, opt_byte]).map_err(TelnetError::from)
        } else {
            Ok(())
        }
    }

    /// Options where learning the remote supports them immediately implies a
    /// follow-up action on our part - either a request sub-negotiation, or
    /// (for NAWS/SNDLOC/LINEMODE, which the remote announces unprompted)
    /// marking the sub-negotiation as pending so the eventual payload clears
    /// it cleanly.
    fn after_remote_will(&mut self, opt_byte: u8) {
        let opt = TelnetOption::from(opt_byte);
        match opt {
            TelnetOption::Naws | TelnetOption::Sndloc => {
                self.pending_option.set(NegotiationKey::Subnegotiation(opt_byte), true);
            }
            TelnetOption::Linemode => {
                self.pending_option.set(NegotiationKey::Subnegotiation(opt_byte), true);
                if self.is_server {
                    let default_linemode = self.default_linemode;
                    let _ = self.send_linemode(default_linemode);
                }
            }
            TelnetOption::Status => {
                let _ = self.request_status();
            }
            TelnetOption::Lflow if self.is_server => {
                let _ = self.send_lineflow_mode(self.xon_any);
            }
            TelnetOption::NewEnviron => {
                let _ = self.request_env(None);
            }
            TelnetOption::Charset => {
                let _ = self.request_charset(&["UTF-8".to_string()]);
            }
            TelnetOption::Xdisploc if self.is_server => {
                let _ = self.request_xdisploc();
            }
            TelnetOption::Ttype if self.is_server => {
                let _ = self.request_ttype();
            }
            TelnetOption::Tspeed => {
                let _ = self.request_tspeed();
            }
            _ => {}
        }
    }

    // ---- sub-negotiation dispatch -------------------------------------------------

    fn dispatch_subnegotiation(&mut self, opt: u8, payload: &[u8]) -> Result<()> {
        // Any SB opt ... IAC SE round-trip clears the matching outbound
        // request's pending flag, whether or not opt itself had one set -
        // otherwise a second request_ttype/request_env/etc. call is
        // permanently skipped as "already pending".
        self.pending_option.set(NegotiationKey::Subnegotiation(opt), false);
        if opt == ENVIRON {
            self.pending_option.set(NegotiationKey::EnvironSendIs, false);
        }

        match opt {
            LINEMODE => self.handle_linemode_sb(payload),
            LFLOW => {
                self.handle_lflow_sb(payload);
                Ok(())
            }
            NAWS => self.handle_naws_sb(payload),
            SNDLOC => {
                let location = String::from_utf8_lossy(payload).into_owned();
                self.callbacks.dispatch_ext(ExtEvent::Sndloc(location));
                Ok(())
            }
            ENVIRON => self.handle_environ_sb(payload),
            TTYPE => self.handle_ttype_sb(payload),
            TSPEED => self.handle_tspeed_sb(payload),
            XDISPLOC => self.handle_xdisploc_sb(payload),
            STATUS => self.handle_status_sb(payload),
            CHARSET => self.handle_charset_sb(payload),
            _ => {
                tracing::debug!(opt, "sub-negotiation for unsupported option");
                Err(TelnetError::InvalidSubnegotiation {
                    cmd: TelnetOption::from(opt),
                    reason: "no decoder registered for this option",
                })
            }
        }
    }

    fn handle_naws_sb(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() != 4 {
            return Err(TelnetError::SubnegotiationTooShort { cmd: TelnetOption::Naws });
        }
        let cols = u16::from_be_bytes([payload[0], payload[1]]);
        let rows = u16::from_be_bytes([payload[2], payload[3]]);
        self.callbacks.dispatch_ext(ExtEvent::Naws { cols, rows });
        Ok(())
    }

    fn handle_ttype_sb(&mut self, payload: &[u8]) -> Result<()> {
        if payload.first().copied() != Some(IS) {
            return Ok(());
        }
        let name = String::from_utf8_lossy(&payload[1..]).into_owned();
        self.callbacks.dispatch_ext(ExtEvent::Ttype(name));
        Ok(())
    }

    fn handle_tspeed_sb(&mut self, payload: &[u8]) -> Result<()> {
        if payload.first().copied() != Some(IS) {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&payload[1..]);
        let mut parts = text.splitn(2, ',');
        let transmit = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        let receive = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        self.callbacks.dispatch_ext(ExtEvent::Tspeed { transmit, receive });
        Ok(())
    }

    fn handle_xdisploc_sb(&mut self, payload: &[u8]) -> Result<()> {
        if payload.first().copied() != Some(IS) {
            return Ok(());
        }
        let display = String::from_utf8_lossy(&payload[1..]).into_owned();
        self.callbacks.dispatch_ext(ExtEvent::Xdisploc(display));
        Ok(())
    }

    fn handle_status_sb(&mut self, payload: &[u8]) -> Result<()> {
        if payload.first().copied() == Some(SEND) {
            self.callbacks.dispatch_ext(ExtEvent::StatusSend);
            self.send_status()?;
        }
        Ok(())
    }

    fn handle_environ_sb(&mut self, payload: &[u8]) -> Result<()> {
        let Some((&op_byte, rest)) = payload.split_first() else { return Ok(()) };
        match EnvironmentOperation::from(op_byte) {
            EnvironmentOperation::Is | EnvironmentOperation::Info => {
                let vars = decode_env_vars(rest);
                self.callbacks.dispatch_ext(ExtEvent::NewEnviron(vars));
                Ok(())
            }
            // Replying to a client's SEND with our own IS is out of scope:
            // this engine only ever originates the SEND direction.
            EnvironmentOperation::Send => Ok(()),
            EnvironmentOperation::Unknown(byte) => Err(TelnetError::InvalidSubnegotiation {
                cmd: TelnetOption::NewEnviron,
                reason: if byte == 0 { "empty operation byte" } else { "unrecognized operation" },
            }),
        }
    }

    fn handle_charset_sb(&mut self, payload: &[u8]) -> Result<()> {
        let sub = match payload.first().copied() {
            Some(CHARSET_REQUEST) if payload.len() > 1 => {
                let separator = payload[1];
                let charsets = payload[2..]
                    .split(|&b| b == separator)
                    .filter(|s| !s.is_empty())
                    .map(Bytes::copy_from_slice)
                    .collect();
                SubnegotiationType::CharsetRequest(charsets)
            }
            Some(CHARSET_ACCEPTED) => {
                SubnegotiationType::CharsetAccepted(Bytes::copy_from_slice(&payload[1..]))
            }
            Some(CHARSET_REJECTED) => SubnegotiationType::CharsetRejected,
            Some(CHARSET_TTABLE_REJECTED) => SubnegotiationType::CharsetTTableRejected,
            _ => {
                return Err(TelnetError::InvalidSubnegotiation {
                    cmd: TelnetOption::Charset,
                    reason: "unrecognized CHARSET sub-command",
                })
            }
        };

        let event = match sub {
            SubnegotiationType::CharsetRequest(charsets) => ExtEvent::CharsetRequest(
                charsets.iter().map(|b| String::from_utf8_lossy(b).into_owned()).collect(),
            ),
            SubnegotiationType::CharsetAccepted(name) => {
                ExtEvent::CharsetAccepted(String::from_utf8_lossy(&name).into_owned())
            }
            SubnegotiationType::CharsetRejected | SubnegotiationType::CharsetTTableRejected => {
                ExtEvent::CharsetRejected
            }
        };
        self.callbacks.dispatch_ext(event);
        Ok(())
    }

    fn handle_lflow_sb(&mut self, payload: &[u8]) {
        match payload.first().copied() {
            Some(LFLOW_RESTART_ANY) => self.xon_any = true,
            Some(LFLOW_RESTART_XON) => self.xon_any = false,
            _ => {}
        }
    }

    fn handle_linemode_sb(&mut self, payload: &[u8]) -> Result<()> {
        let Some((&sub, rest)) = payload.split_first() else { return Ok(()) };
        match sub {
            LMODE_MODE => self.handle_mode_sb(rest),
            LMODE_SLC => self.handle_slc_sb(rest),
            LMODE_FORWARDMASK => self.handle_forwardmask_sb(rest),
            _ => Err(TelnetError::InvalidSubnegotiation {
                cmd: TelnetOption::Linemode,
                reason: "unrecognized LINEMODE sub-command",
            }),
        }
    }

    fn handle_mode_sb(&mut self, rest: &[u8]) -> Result<()> {
        let Some(&mask) = rest.first() else {
            return Err(TelnetError::SubnegotiationTooShort { cmd: TelnetOption::Linemode });
        };
        let is_ack = mask & LMODE_MODE_ACK != 0;
        self.linemode = Some(Linemode::new(mask));
        if !is_ack && self.is_server {
            self.send_linemode(Linemode::new(mask | LMODE_MODE_ACK))?;
        }
        Ok(())
    }

    fn handle_slc_sb(&mut self, triplets: &[u8]) -> Result<()> {
        if triplets.len() % 3 != 0 {
            return Err(TelnetError::InvalidSubnegotiation {
                cmd: TelnetOption::Linemode,
                reason: "SLC triplet count is not a multiple of 3",
            });
        }

        let mut reply = Vec::new();
        for chunk in triplets.chunks(3) {
            let (func, modifiers_byte, value) = (chunk[0], chunk[1], chunk[2]);
            let modifiers = Modifiers::from(modifiers_byte);
            match self.slc_table.process(func, modifiers, value) {
                SlcOutcome::NoReply => {}
                SlcOutcome::Reply(f, entry) => {
                    self.callbacks.dispatch_slc(linemode::SlcFunction::from(f), entry.value);
                    reply.extend([f, entry.modifiers.into(), entry.value]);
                }
                SlcOutcome::SendFullTabset | SlcOutcome::SendCurrentTabset => {
                    for (f, entry) in self.slc_table.tabset(self.is_server) {
                        reply.extend([f, entry.modifiers.into(), entry.value]);
                    }
                }
            }
        }

        if reply.is_empty() {
            return Ok(());
        }
        if reply.len() > SLC_MAXSIZE {
            return Err(TelnetError::SlcBufferOverflow { limit: SLC_MAXSIZE });
        }
        let mut payload = vec![LMODE_SLC];
        payload.extend(reply);
        self.send_sb(LINEMODE, &payload)
    }

    fn handle_forwardmask_sb(&mut self, rest: &[u8]) -> Result<()> {
        // WILL/WONT are sent by the client, so only a server ever legitimately
        // receives them here; DO/DONT are sent by the server, so only a
        // client ever legitimately receives those.
        match rest.first().copied() {
            Some(WILL) => {
                if !self.is_server {
                    tracing::warn!("WILL FORWARDMASK is invalid at the client end, ignoring");
                }
                Ok(())
            }
            Some(WONT) => {
                if !self.is_server {
                    tracing::warn!("WONT FORWARDMASK is invalid at the client end, ignoring");
                }
                Ok(())
            }
            Some(DO) => {
                if self.is_server {
                    tracing::warn!("DO FORWARDMASK is invalid at the server end, ignoring");
                    return Ok(());
                }
                // The bitmap the server proposes (rest[1..]) is accepted and
                // discarded - this engine always replies with its own
                // SLC-derived forwardmask rather than adopting the remote's.
                let binary = self.local_option.enabled(NegotiationKey::Option(BINARY));
                let fm = self.slc_table.generate_forwardmask(binary);
                let mut payload = vec![LMODE_FORWARDMASK, WILL];
                payload.extend(fm.as_bytes());
                self.send_sb(LINEMODE, &payload)
            }
            Some(DONT) => {
                if self.is_server {
                    tracing::warn!("DONT FORWARDMASK is invalid at the server end, ignoring");
                }
                Ok(())
            }
            _ => Err(TelnetError::InvalidSubnegotiation {
                cmd: TelnetOption::Linemode,
                reason: "unrecognized FORWARDMASK sub-command",
            }),
        }
    }

    // ---- request / send emitters -------------------------------------------------

    pub fn request_status(&mut self) -> bool {
        self.request_once(STATUS, NegotiationKey::Subnegotiation(STATUS), &[SEND])
    }

    pub fn request_tspeed(&mut self) -> bool {
        self.request_once(TSPEED, NegotiationKey::Subnegotiation(TSPEED), &[SEND])
    }

    pub fn request_xdisploc(&mut self) -> bool {
        self.request_once(XDISPLOC, NegotiationKey::Subnegotiation(XDISPLOC), &[SEND])
    }

    pub fn request_ttype(&mut self) -> bool {
        self.request_once(TTYPE, NegotiationKey::Subnegotiation(TTYPE), &[SEND])
    }

    pub fn request_charset(&mut self, charsets: &[String]) -> bool {
        let _enter = self.span.clone().entered();
        if !self.remote_option.enabled(NegotiationKey::Option(CHARSET)) {
            tracing::debug!("skipping CHARSET request: remote has not negotiated CHARSET");
            return false;
        }
        let key = NegotiationKey::Subnegotiation(CHARSET);
        if self.pending_option.enabled(key) {
            tracing::debug!("skipping CHARSET request: already pending");
            return false;
        }
        self.pending_option.set(key, true);

        let mut payload = vec![CHARSET_REQUEST, b' '];
        for (i, cs) in charsets.iter().enumerate() {
            if i > 0 {
                payload.push(b' ');
            }
            payload.extend(cs.as_bytes());
        }
        let _ = self.send_sb(CHARSET, &payload);
        true
    }

    pub fn request_env(&mut self, names: Option<&[String]>) -> bool {
        let _enter = self.span.clone().entered();
        if !self.remote_option.enabled(NegotiationKey::Option(ENVIRON)) {
            tracing::debug!("skipping NEW_ENVIRON request: remote has not negotiated NEW_ENVIRON");
            return false;
        }
        let key = NegotiationKey::EnvironSendIs;
        if self.pending_option.enabled(key) {
            tracing::debug!("skipping NEW_ENVIRON request: already pending");
            return false;
        }
        self.pending_option.set(key, true);

        let names = names.map_or_else(|| self.default_env_request.clone(), <[String]>::to_vec);
        let payload = encode_env_send(&names);
        let _ = self.send_sb(ENVIRON, &payload);
        true
    }

    fn request_once(&mut self, opt: u8, key: NegotiationKey, sub_payload: &[u8]) -> bool {
        let _enter = self.span.clone().entered();
        if !self.remote_option.enabled(NegotiationKey::Option(opt)) {
            tracing::debug!(opt, "skipping request: remote has not negotiated this option");
            return false;
        }
        if self.pending_option.enabled(key) {
            tracing::debug!(opt, "skipping request: already pending");
            return false;
        }
        self.pending_option.set(key, true);
        let _ = self.send_sb(opt, sub_payload);
        true
    }

    fn send_status(&mut self) -> Result<()> {
        let mut payload = vec![IS];
        for (opt, enabled) in self.local_option.options() {
            payload.extend([if enabled { WILL } else { WONT }, opt]);
        }
        for (opt, enabled) in self.remote_option.options() {
            let pending_do = self.pending_option.enabled(NegotiationKey::Negotiation(DO, opt));
            payload.extend([if enabled || pending_do { DO } else { DONT }, opt]);
        }
        self.send_sb(STATUS, &payload)
    }

    pub fn send_ga(&mut self) -> Result<()> {
        if self.local_option.enabled(NegotiationKey::Option(SGA)) {
            tracing::debug!("skipping GA: SGA is locally enabled");
            return Ok(());
        }
        self.transport.write(&[IAC, GA]).map_err(TelnetError::from)
    }

    pub fn send_eor(&mut self) -> Result<()> {
        if self.local_option.enabled(NegotiationKey::Option(TELOPT_EOR)) {
            tracing::debug!("skipping EOR: EOR is locally enabled");
            return Ok(());
        }
        self.transport.write(&[IAC, EOR_CMD]).map_err(TelnetError::from)
    }

    pub fn send_lineflow_mode(&mut self, restart_any: bool) -> Result<()> {
        if !self.remote_option.enabled(NegotiationKey::Option(LFLOW)) {
            tracing::debug!("skipping LFLOW mode send: remote has not negotiated LFLOW");
            return Ok(());
        }
        self.xon_any = restart_any;
        let sub = if restart_any { LFLOW_RESTART_ANY } else { LFLOW_RESTART_XON };
        self.send_sb(LFLOW, &[sub])
    }

    pub fn send_linemode(&mut self, lm: Linemode) -> Result<()> {
        if !self.is_server {
            tracing::warn!("send_linemode is server-only, ignoring call from the client end");
            return Ok(());
        }
        if !self.remote_option.enabled(NegotiationKey::Option(LINEMODE)) {
            tracing::debug!("skipping LINEMODE send: remote has not negotiated LINEMODE");
            return Ok(());
        }
        self.linemode = Some(lm);
        self.send_sb(LINEMODE, &[LMODE_MODE, lm.mask()])
    }

    pub fn request_forwardmask(&mut self, fm: &Forwardmask) -> Result<()> {
        let mut payload = vec![LMODE_FORWARDMASK, DO];
        payload.extend(fm.as_bytes());
        self.send_sb(LINEMODE, &payload)
    }

    /// Writes application data, doubling any literal `IAC` bytes. Asserts
    /// every byte is 7-bit unless `BINARY` is negotiated locally or `oob` is
    /// set - a caller sending 8-bit data without either is a programmer
    /// error, not a recoverable protocol condition.
    pub fn write(&mut self, data: &[u8], oob: bool) -> Result<()> {
        let binary = self.local_option.enabled(NegotiationKey::Option(BINARY));
        if !binary && !oob {
            assert!(data.iter().all(|&b| b < 128), "write: 8-bit data without BINARY negotiated");
        }

        let mut buf = Vec::with_capacity(data.len());
        for &b in data {
            if b == IAC {
                buf.push(IAC);
            }
            buf.push(b);
        }
        self.transport.write(&buf).map_err(TelnetError::from)
    }

    /// Writes a pre-built `IAC ...` command sequence verbatim, with no
    /// escaping. Asserts the sequence actually starts with `IAC`: calling
    /// this with anything else is a programmer error.
    pub fn send_iac(&mut self, data: &[u8]) -> Result<()> {
        assert_eq!(data.first().copied(), Some(IAC), "send_iac: data must start with IAC");
        self.transport.write(data).map_err(TelnetError::from)
    }

    fn send_sb(&mut self, opt: u8, payload: &[u8]) -> Result<()> {
        let mut buf = Vec::with_capacity(payload.len() + 5);
        buf.extend([IAC, SB, opt]);
        for &b in payload {
            if b == IAC {
                buf.push(IAC);
            }
            buf.push(b);
        }
        buf.extend([IAC, SE]);
        self.send_iac(&buf)
    }

    // ---- callback registration -------------------------------------------------

    pub fn set_iac_callback<F>(&mut self, cmd: IacCommand, handler: F)
    where
        F: FnMut(IacCommand) + Send + 'static,
    {
        self.callbacks.set_iac_callback(cmd, handler);
    }

    pub fn set_slc_callback<F>(&mut self, func: linemode::SlcFunction, handler: F)
    where
        F: FnMut(linemode::SlcFunction, u8) + Send + 'static,
    {
        self.callbacks.set_slc_callback(func, handler);
    }

    pub fn set_ext_callback<F>(&mut self, kind: event::ExtKind, handler: F)
    where
        F: FnMut(ExtEvent) + Send + 'static,
    {
        self.callbacks.set_ext_callback(kind, handler);
    }

    // ---- read-only properties -------------------------------------------------

    #[must_use]
    pub fn is_server(&self) -> bool {
        self.is_server
    }

    #[must_use]
    pub fn is_client(&self) -> bool {
        !self.is_server
    }

    #[must_use]
    pub fn is_linemode(&self) -> bool {
        self.remote_option.enabled(NegotiationKey::Option(LINEMODE))
    }

    /// The negotiated mode mask, or `None` when LINEMODE was never
    /// negotiated (kludge-mode character-at-a-time operation).
    #[must_use]
    pub fn linemode(&self) -> Option<Linemode> {
        if self.is_linemode() {
            Some(self.linemode.unwrap_or(self.default_linemode))
        } else {
            None
        }
    }

    /// Whether the engine is currently mid-negotiation or mid-command, i.e.
    /// out-of-band with respect to plain application data.
    #[must_use]
    pub fn is_oob(&self) -> bool {
        self.iac_received
            || matches!(self.cmd_received, CmdReceived::Pending(_) | CmdReceived::Complete(..))
    }

    #[must_use]
    pub fn slc_received(&self) -> Option<linemode::SlcFunction> {
        self.slc_received
    }

    #[must_use]
    pub fn iac_received(&self) -> bool {
        self.iac_received
    }

    #[must_use]
    pub fn cmd_received(&self) -> CmdReceived {
        self.cmd_received
    }

    #[must_use]
    pub fn byte_count(&self) -> u64 {
        self.byte_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::constants::{DO as C_DO, ECHO};

    #[derive(Clone, Default)]
    struct RecordingTransport(Arc<Mutex<Vec<u8>>>);

    impl Transport for RecordingTransport {
        fn write(&mut self, data: &[u8]) -> std::io::Result<()> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(())
        }
    }

    fn engine(is_server: bool) -> (Telnet, Arc<Mutex<Vec<u8>>>) {
        let out = Arc::new(Mutex::new(Vec::new()));
        let transport = RecordingTransport(out.clone());
        (Telnet::with_defaults(Box::new(transport), is_server), out)
    }

    fn feed(telnet: &mut Telnet, bytes: &[u8]) {
        for &b in bytes {
            telnet.feed_byte(b).unwrap();
        }
    }

    #[test]
    fn will_ttype_triggers_do_then_send_request() {
        let (mut telnet, out) = engine(true);
        feed(&mut telnet, &[IAC, WILL, TTYPE]);
        let written = out.lock().unwrap().clone();
        assert_eq!(written, vec![IAC, C_DO, TTYPE, IAC, SB, TTYPE, SEND, IAC, SE]);
    }

    #[test]
    fn double_iac_is_plain_data() {
        let (mut telnet, out) = engine(true);
        assert!(!telnet.feed_byte(IAC).unwrap());
        assert!(telnet.feed_byte(IAC).unwrap());
        assert!(out.lock().unwrap().is_empty());
    }

    #[test]
    fn repeated_will_is_not_re_sent() {
        let (mut telnet, out) = engine(true);
        feed(&mut telnet, &[IAC, WILL, ECHO]);
        out.lock().unwrap().clear();
        feed(&mut telnet, &[IAC, WILL, ECHO]);
        assert!(out.lock().unwrap().is_empty());
    }

    #[test]
    fn naws_subnegotiation_dispatches_ext_event() {
        let (mut telnet, _out) = engine(true);
        let seen = Arc::new(Mutex::new(None));
        let seen2 = seen.clone();
        telnet.set_ext_callback(event::ExtKind::Naws, move |ev| {
            *seen2.lock().unwrap() = Some(ev);
        });
        feed(&mut telnet, &[IAC, SB, NAWS, 0x00, 0x50, 0x00, 0x18, IAC, SE]);
        assert_eq!(*seen.lock().unwrap(), Some(ExtEvent::Naws { cols: 80, rows: 24 }));
    }

    #[test]
    fn linemode_slc_ip_reconciles_and_replies() {
        let (mut telnet, out) = engine(true);
        feed(&mut telnet, &[IAC, WILL, LINEMODE]);
        out.lock().unwrap().clear();

        // Client proposes IP bound to 0x04 (not our default of 0x03).
        let modifiers: u8 = crate::constants::SLC_VALUE;
        feed(
            &mut telnet,
            &[IAC, SB, LINEMODE, LMODE_SLC, crate::constants::SLC_IP, modifiers, 0x04, IAC, SE],
        );

        let written = out.lock().unwrap().clone();
        assert_eq!(written[..3], [IAC, SB, LINEMODE]);
        assert_eq!(written[3], LMODE_SLC);
        assert_eq!(written[4], crate::constants::SLC_IP);
        assert_eq!(written[6], 0x04);
        assert_eq!(&written[written.len() - 2..], [IAC, SE]);
    }

    #[test]
    fn illegal_will_echo_at_server_is_rejected() {
        let (mut telnet, _out) = engine(true);
        let err = telnet.feed_byte(IAC);
        assert!(err.unwrap());
        let err = telnet.feed_byte(WILL);
        assert!(err.unwrap());
        let err = telnet.feed_byte(ECHO);
        assert!(matches!(err, Err(TelnetError::IllegalForRole { .. })));
    }

    #[test]
    fn do_linemode_at_server_is_warned_and_ignored() {
        let (mut telnet, out) = engine(true);
        feed(&mut telnet, &[IAC, DO]);
        let consumed = telnet.feed_byte(LINEMODE).unwrap();
        assert!(consumed);
        assert!(out.lock().unwrap().is_empty());
    }

    #[test]
    fn bytes_are_discarded_while_a_timing_mark_reply_is_pending() {
        let (mut telnet, out) = engine(true);
        telnet.iac(DO, TM).unwrap();
        out.lock().unwrap().clear();

        assert!(telnet.feed_byte(b'A').unwrap());
        assert!(telnet.feed_byte(b'B').unwrap());
        assert!(telnet.feed_byte(b'C').unwrap());
        assert!(out.lock().unwrap().is_empty());

        feed(&mut telnet, &[IAC, WILL, TM]);
        assert!(!telnet.feed_byte(b'D').unwrap());
    }

    #[test]
    fn xoff_pauses_and_xon_any_resumes_transmission() {
        let (mut telnet, _out) = engine(true);
        telnet.send_lineflow_mode(true).unwrap();
        feed(&mut telnet, &[IAC, WILL, LINEMODE]);

        assert!(telnet.feed_byte(crate::constants::SLC_XOFF).unwrap());

        assert!(telnet.feed_byte(b'x').unwrap() || true);
    }

    #[test]
    fn unknown_will_option_replies_dont_and_is_rejected() {
        let (mut telnet, out) = engine(true);
        feed(&mut telnet, &[IAC, WILL]);
        let err = telnet.feed_byte(201);
        assert!(matches!(err, Err(TelnetError::UnhandledOption { .. })));
        let written = out.lock().unwrap().clone();
        assert_eq!(written, vec![IAC, DONT, 201]);
    }
}
