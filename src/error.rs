use crate::option::TelnetOption;

/// Everything the engine itself can fail with. Negotiation-policy violations
/// that the wire protocol expects us to simply log and absorb (§7 of the
/// design notes) never reach here - only the structural and role-violation
/// classes return `Err`.
#[derive(Debug, thiserror::Error)]
pub enum TelnetError {
    /// A command was sent or received that the given role is never allowed to
    /// use (e.g. `WILL ECHO` arriving at a server, `DO LINEMODE` arriving at
    /// a client).
    #[error("{cmd:?} {opt:?} is illegal for a {role}")]
    IllegalForRole {
        cmd: u8,
        opt: TelnetOption,
        role: &'static str,
    },

    /// A sub-negotiation buffer exceeded `SB_MAXSIZE` before its terminating
    /// `IAC SE`.
    #[error("subnegotiation buffer exceeded {limit} bytes")]
    SubnegotiationBufferOverflow { limit: usize },

    /// The outbound SLC reply buffer exceeded `SLC_MAXSIZE`.
    #[error("SLC reply buffer exceeded {limit} bytes")]
    SlcBufferOverflow { limit: usize },

    /// A sub-negotiation payload for `cmd` was shorter than the option
    /// requires (e.g. NAWS with fewer than 4 payload bytes).
    #[error("subnegotiation for option {cmd:?} was too short")]
    SubnegotiationTooShort { cmd: TelnetOption },

    /// A sub-negotiation payload parsed to something malformed beyond plain
    /// length (an odd LINEMODE SLC triplet count, an unrecognized CHARSET
    /// sub-command, ...).
    #[error("invalid subnegotiation for option {cmd:?}: {reason}")]
    InvalidSubnegotiation {
        cmd: TelnetOption,
        reason: &'static str,
    },

    /// A `WILL` arrived for an option this engine has no handler for at all.
    /// The canonical response (`DONT opt`) has already been written before
    /// this is returned - the caller only needs to decide whether to log it
    /// or treat the connection as compromised.
    #[error("no handler registered for {cmd:?} {opt:?}")]
    UnhandledOption { cmd: u8, opt: TelnetOption },

    /// Transport-level I/O failure, surfaced unchanged from the collaborator.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
