use crate::constants::{ABORT, AO, AYT, BRK, DM, EC, EL, EOF, EOR_CMD, GA, IP, NOP, SUSP};

/// The single-byte IAC commands that are not themselves the start of a
/// longer negotiation (`DO`/`DONT`/`WILL`/`WONT`/`SB` are handled by the
/// engine directly and never reach a callback as an `IacCommand`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IacCommand {
    /// Interrupt Process.
    Ip,
    /// Abort Output.
    Ao,
    /// Are You There.
    Ayt,
    /// Erase Character.
    Ec,
    /// Erase Line.
    El,
    /// Break.
    Brk,
    /// Go Ahead.
    Ga,
    /// End Of Record.
    Eor,
    /// Data Mark, the synch signal.
    Dm,
    /// Suspend Process (LINEMODE SLC SUSP echo).
    Susp,
    /// Abort process (LINEMODE SLC ABORT echo).
    Abort,
    /// End Of File (LINEMODE SLC EOF echo).
    Eof,
    /// No operation.
    Nop,
    /// Any IAC command byte this engine does not assign a specific meaning.
    Unknown(u8),
}

impl From<u8> for IacCommand {
    fn from(byte: u8) -> Self {
        match byte {
            IP => IacCommand::Ip,
            AO => IacCommand::Ao,
            AYT => IacCommand::Ayt,
            EC => IacCommand::Ec,
            EL => IacCommand::El,
            BRK => IacCommand::Brk,
            GA => IacCommand::Ga,
            EOR_CMD => IacCommand::Eor,
            DM => IacCommand::Dm,
            SUSP => IacCommand::Susp,
            ABORT => IacCommand::Abort,
            EOF => IacCommand::Eof,
            NOP => IacCommand::Nop,
            other => IacCommand::Unknown(other),
        }
    }
}

impl From<IacCommand> for u8 {
    fn from(cmd: IacCommand) -> Self {
        match cmd {
            IacCommand::Ip => IP,
            IacCommand::Ao => AO,
            IacCommand::Ayt => AYT,
            IacCommand::Ec => EC,
            IacCommand::El => EL,
            IacCommand::Brk => BRK,
            IacCommand::Ga => GA,
            IacCommand::Eor => EOR_CMD,
            IacCommand::Dm => DM,
            IacCommand::Susp => SUSP,
            IacCommand::Abort => ABORT,
            IacCommand::Eof => EOF,
            IacCommand::Nop => NOP,
            IacCommand::Unknown(byte) => byte,
        }
    }
}

/// A fully decoded sub-negotiation payload, handed to an ext callback once
/// the engine has parsed it into typed form. Each variant corresponds to an
/// option this engine understands well enough to decode end-to-end; options
/// it merely tracks presence/absence of (MCCP2, GMCP, MSSP, ...) never reach
/// here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtEvent {
    /// `TTYPE IS <name>`.
    Ttype(String),
    /// `TSPEED IS <receive>,<transmit>`, both in baud.
    Tspeed { transmit: u16, receive: u16 },
    /// `XDISPLOC IS <display>`.
    Xdisploc(String),
    /// `SNDLOC IS <location>`.
    Sndloc(String),
    /// `NAWS <cols> <rows>`.
    Naws { cols: u16, rows: u16 },
    /// `LOGOUT`, carrying the negotiated command (`DO`/`WILL`/...).
    Logout(u8),
    /// `NEW_ENVIRON IS`/`INFO`, decoded into `(name, value)` pairs. A `None`
    /// value means the remote sent the name with no paired value.
    NewEnviron(Vec<(String, Option<Vec<u8>>)>),
    /// `CHARSET REQUEST`, the ordered list of charsets the client offers.
    CharsetRequest(Vec<String>),
    /// `CHARSET ACCEPTED <name>`.
    CharsetAccepted(String),
    /// `CHARSET REJECTED`.
    CharsetRejected,
    /// `STATUS SEND`, i.e. the remote asking us to report our option table.
    StatusSend,
}

impl ExtEvent {
    /// The callback-registry key for this event, discarding its payload.
    #[must_use]
    pub fn kind(&self) -> ExtKind {
        match self {
            ExtEvent::Ttype(_) => ExtKind::Ttype,
            ExtEvent::Tspeed { .. } => ExtKind::Tspeed,
            ExtEvent::Xdisploc(_) => ExtKind::Xdisploc,
            ExtEvent::Sndloc(_) => ExtKind::Sndloc,
            ExtEvent::Naws { .. } => ExtKind::Naws,
            ExtEvent::Logout(_) => ExtKind::Logout,
            ExtEvent::NewEnviron(_) => ExtKind::NewEnviron,
            ExtEvent::CharsetRequest(_)
            | ExtEvent::CharsetAccepted(_)
            | ExtEvent::CharsetRejected => ExtKind::Charset,
            ExtEvent::StatusSend => ExtKind::StatusSend,
        }
    }
}

/// A [`ExtEvent`] discriminant, used as the key into the ext callback map -
/// callers register one handler per sub-negotiation kind, not per exact
/// payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtKind {
    Ttype,
    Tspeed,
    Xdisploc,
    Sndloc,
    Naws,
    Logout,
    NewEnviron,
    Charset,
    StatusSend,
}
