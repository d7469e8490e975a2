use crate::constants::{LMODE_MODE_ACK, LMODE_MODE_LIT_ECHO, LMODE_MODE_LOCAL, LMODE_MODE_SOFT_TAB, LMODE_MODE_TRAPSIG, SLC_ABORT, SLC_ABORTC, SLC_ACK, SLC_AO, SLC_AYT, SLC_BRK, SLC_BRKC, SLC_DSUSPC, SLC_EC, SLC_EL, SLC_EOF, SLC_EOFCHAR, SLC_EOR, SLC_EORC, SLC_EW, SLC_EXIT, SLC_FLUSHIN, SLC_FLUSHOUT, SLC_FORW1, SLC_FORW2, SLC_IP, SLC_LEVELBITS, SLC_LNEXT, SLC_LP, SLC_MCL, SLC_MCR, SLC_MCUB, SLC_MCUF, SLC_MCWL, SLC_MCWR, SLC_REPRINT, SLC_RP, SLC_SUSP, SLC_SUSPC, SLC_SUSPCHAR, SLC_SYNCH, SLC_XOFF, SLC_XOFFC, SLC_XON, SLC_XONC};

/// The support level of an SLC function (RFC 1184 §3, bits 0-1 of the level
/// byte).
#[derive(Debug, PartialEq, Copy, Clone, Eq)]
pub enum Level {
    /// Not supported by this side at all.
    NoSupport,
    /// Supported, but fixed - the value cannot be changed.
    CantChange,
    /// Supported with a specific, non-default value.
    Value,
    /// Supported at this side's default value.
    Default,
}

impl From<u8> for Level {
    fn from(value: u8) -> Self {
        match value & SLC_LEVELBITS {
            0 => Level::NoSupport,
            1 => Level::CantChange,
            2 => Level::Value,
            3 => Level::Default,
            _ => unreachable!("masked with SLC_LEVELBITS"),
        }
    }
}

impl From<u8> for Modifiers {
    fn from(value: u8) -> Self {
        Modifiers {
            level: Level::from(value),
            ack: value & SLC_ACK != 0,
            flush_in: value & SLC_FLUSHIN != 0,
            flush_out: value & SLC_FLUSHOUT != 0,
        }
    }
}


/// The modifier bits of an SLC function byte: level plus the ACK/FLUSHIN/
/// FLUSHOUT flags (RFC 1184 §3).
#[derive(Debug, PartialEq, Copy, Clone, Eq)]
pub struct Modifiers {
    pub level: Level,
    pub ack: bool,
    pub flush_in: bool,
    pub flush_out: bool,
}


impl From<Modifiers> for u8 {
    fn from(modifiers: Modifiers) -> u8 {
        let mut value: u8 = modifiers.level.into();
        if modifiers.ack {
            value |= SLC_ACK;
        }
        if modifiers.flush_in {
            value |= SLC_FLUSHIN;
        }
        if modifiers.flush_out {
            value |= SLC_FLUSHOUT;
        }
        value
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        match level {
            Level::NoSupport => 0,
            Level::CantChange => 1,
            Level::Value => 2,
            Level::Default => 3,
        }
    }
}

/// The SLC function codes of RFC 1184 §3, plus the per-terminal character
/// variants carried by this engine's tables (`Xonc`, `Eofchar`, ... - the
/// value a given function is currently bound to, not the function itself).
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum SlcFunction {
    Synch = SLC_SYNCH,
    Brk = SLC_BRK,
    Ip = SLC_IP,
    Ao = SLC_AO,
    Ayt = SLC_AYT,
    Eor = SLC_EOR,
    Abort = SLC_ABORT,
    Eof = SLC_EOF,
    Susp = SLC_SUSP,
    Ec = SLC_EC,
    El = SLC_EL,
    Ew = SLC_EW,
    Rp = SLC_RP,
    Lnext = SLC_LNEXT,
    Xon = SLC_XON,
    Xoff = SLC_XOFF,
    Forw1 = SLC_FORW1,
    Forw2 = SLC_FORW2,
    Mcl = SLC_MCL,
    Mcr = SLC_MCR,
    Mcwl = SLC_MCWL,
    Mcwr = SLC_MCWR,
    Mcub = SLC_MCUB,
    Mcuf = SLC_MCUF,
    Lp = SLC_LP,
    Xonc = SLC_XONC,
    Xoffc = SLC_XOFFC,
    Exit = SLC_EXIT,
    Suspc = SLC_SUSPC,
    Dsuspc = SLC_DSUSPC,
    Reprint = SLC_REPRINT,
    Abortc = SLC_ABORTC,
    Eofchar = SLC_EOFCHAR,
    Suspchar = SLC_SUSPCHAR,
    Brkc = SLC_BRKC,
    Eorc = SLC_EORC,
    /// Any function byte this table has no fixed variant for.
    Unknown(u8),
}


impl From<u8> for SlcFunction {
    fn from(value: u8) -> Self {
        match value {
            SLC_SYNCH => SlcFunction::Synch,
            SLC_BRK => SlcFunction::Brk,
            SLC_IP => SlcFunction::Ip,
            SLC_AO => SlcFunction::Ao,
            SLC_AYT => SlcFunction::Ayt,
            SLC_EOR => SlcFunction::Eor,
            SLC_ABORT => SlcFunction::Abort,
            SLC_EOF => SlcFunction::Eof,
            SLC_SUSP => SlcFunction::Susp,
            SLC_EC => SlcFunction::Ec,
            SLC_EL => SlcFunction::El,
            SLC_EW => SlcFunction::Ew,
            SLC_RP => SlcFunction::Rp,
            SLC_LNEXT => SlcFunction::Lnext,
            SLC_XON => SlcFunction::Xon,
            SLC_XOFF => SlcFunction::Xoff,
            SLC_FORW1 => SlcFunction::Forw1,
            SLC_FORW2 => SlcFunction::Forw2,
            SLC_MCL => SlcFunction::Mcl,
            SLC_MCR => SlcFunction::Mcr,
            SLC_MCWL => SlcFunction::Mcwl,
            SLC_MCWR => SlcFunction::Mcwr,
            SLC_MCUB => SlcFunction::Mcub,
            SLC_MCUF => SlcFunction::Mcuf,
            SLC_LP => SlcFunction::Lp,
            SLC_XONC => SlcFunction::Xonc,
            SLC_XOFFC => SlcFunction::Xoffc,
            SLC_EXIT => SlcFunction::Exit,
            SLC_SUSPC => SlcFunction::Suspc,
            SLC_DSUSPC => SlcFunction::Dsuspc,
            SLC_REPRINT => SlcFunction::Reprint,
            SLC_ABORTC => SlcFunction::Abortc,
            SLC_EOFCHAR => SlcFunction::Eofchar,
            SLC_SUSPCHAR => SlcFunction::Suspchar,
            SLC_BRKC => SlcFunction::Brkc,
            SLC_EORC => SlcFunction::Eorc,
            // Add additional SLC functions as needed...
            _ => SlcFunction::Unknown(value), // Gracefully handle unknown or unsupported SLC function codes
        }
    }
}

impl From<SlcFunction> for u8 {
    fn from(function: SlcFunction) -> u8 {
        match function {
            SlcFunction::Synch => SLC_SYNCH,
            SlcFunction::Brk => SLC_BRK,
            SlcFunction::Ip => SLC_IP,
            SlcFunction::Ao => SLC_AO,
            SlcFunction::Ayt => SLC_AYT,
            SlcFunction::Eor => SLC_EOR,
            SlcFunction::Abort => SLC_ABORT,
            SlcFunction::Eof => SLC_EOF,
            SlcFunction::Susp => SLC_SUSP,
            SlcFunction::Ec => SLC_EC,
            SlcFunction::El => SLC_EL,
            SlcFunction::Ew => SLC_EW,
            SlcFunction::Rp => SLC_RP,
            SlcFunction::Lnext => SLC_LNEXT,
            SlcFunction::Xon => SLC_XON,
            SlcFunction::Xoff => SLC_XOFF,
            SlcFunction::Forw1 => SLC_FORW1,
            SlcFunction::Forw2 => SLC_FORW2,
            SlcFunction::Mcl => SLC_MCL,
            SlcFunction::Mcr => SLC_MCR,
            SlcFunction::Mcwl => SLC_MCWL,
            SlcFunction::Mcwr => SLC_MCWR,
            SlcFunction::Mcub => SLC_MCUB,
            SlcFunction::Mcuf => SLC_MCUF,
            SlcFunction::Lp => SLC_LP,
            SlcFunction::Xonc => SLC_XONC,
            SlcFunction::Xoffc => SLC_XOFFC,
            SlcFunction::Exit => SLC_EXIT,
            SlcFunction::Suspc => SLC_SUSPC,
            SlcFunction::Dsuspc => SLC_DSUSPC,
            SlcFunction::Reprint => SLC_REPRINT,
            SlcFunction::Abortc => SLC_ABORTC,
            SlcFunction::Eofchar => SLC_EOFCHAR,
            SlcFunction::Suspchar => SLC_SUSPCHAR,
            SlcFunction::Brkc => SLC_BRKC,
            SlcFunction::Eorc => SLC_EORC,
            SlcFunction::Unknown(value) => value,
        }
    }
}

/// The one-byte LINEMODE mode mask (RFC 1184 §2.1), with typed accessors
/// over the bit positions the engine cares about. `remote()` is simply the
/// negation of `local()` - there is no separate remote bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Linemode(u8);

impl Linemode {
    #[must_use]
    pub fn new(mask: u8) -> Self {
        Linemode(mask)
    }

    /// The mask a server proposes by default: remote (server-side) editing
    /// with literal display of control characters.
    #[must_use]
    pub fn default_server() -> Self {
        Linemode(LMODE_MODE_LIT_ECHO)
    }

    #[must_use]
    pub fn mask(&self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn local(&self) -> bool {
        self.0 & LMODE_MODE_LOCAL != 0
    }

    #[must_use]
    pub fn remote(&self) -> bool {
        !self.local()
    }

    #[must_use]
    pub fn trapsig(&self) -> bool {
        self.0 & LMODE_MODE_TRAPSIG != 0
    }

    #[must_use]
    pub fn ack(&self) -> bool {
        self.0 & LMODE_MODE_ACK != 0
    }

    #[must_use]
    pub fn soft_tab(&self) -> bool {
        self.0 & LMODE_MODE_SOFT_TAB != 0
    }

    #[must_use]
    pub fn lit_echo(&self) -> bool {
        self.0 & LMODE_MODE_LIT_ECHO != 0
    }

    pub fn set_local(&mut self) {
        self.0 |= LMODE_MODE_LOCAL;
    }

    pub fn set_remote(&mut self) {
        self.0 &= !LMODE_MODE_LOCAL;
    }

    pub fn set_trapsig(&mut self) {
        self.0 |= LMODE_MODE_TRAPSIG;
    }

    pub fn unset_trapsig(&mut self) {
        self.0 &= !LMODE_MODE_TRAPSIG;
    }

    pub fn set_ack(&mut self) {
        self.0 |= LMODE_MODE_ACK;
    }

    pub fn unset_ack(&mut self) {
        self.0 &= !LMODE_MODE_ACK;
    }

    pub fn set_soft_tab(&mut self) {
        self.0 |= LMODE_MODE_SOFT_TAB;
    }

    pub fn unset_soft_tab(&mut self) {
        self.0 &= !LMODE_MODE_SOFT_TAB;
    }

    pub fn set_lit_echo(&mut self) {
        self.0 |= LMODE_MODE_LIT_ECHO;
    }

    pub fn unset_lit_echo(&mut self) {
        self.0 &= !LMODE_MODE_LIT_ECHO;
    }
}

impl From<u8> for Linemode {
    fn from(mask: u8) -> Self {
        Linemode(mask)
    }
}

/// A 16- or 32-byte bitmap over the ASCII/8-bit keyspace, identifying which
/// input bytes a client in LINEMODE must forward to the server unprocessed
/// rather than handling locally (RFC 1184 §3.1). Bits are packed MSB-first
/// within each byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forwardmask {
    bits: Vec<u8>,
}

impl Forwardmask {
    #[must_use]
    pub fn from_bytes(bits: Vec<u8>) -> Self {
        Forwardmask { bits }
    }

    /// An all-zero mask of the given width (16 for 7-bit ASCII, 32 once
    /// BINARY is enabled).
    #[must_use]
    pub fn empty(num_bytes: usize) -> Self {
        Forwardmask { bits: vec![0; num_bytes] }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Sets the bit for `byte`, growing the mask if `byte` falls outside it.
    pub fn set(&mut self, byte: u8) {
        let idx = byte as usize / 8;
        if idx >= self.bits.len() {
            return;
        }
        self.bits[idx] |= 1 << (7 - (byte as usize % 8));
    }

    /// True iff `byte` is marked for unconditional forwarding.
    #[must_use]
    pub fn contains(&self, byte: u8) -> bool {
        let idx = byte as usize / 8;
        match self.bits.get(idx) {
            Some(b) => b & (1 << (7 - (byte as usize % 8))) != 0,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_server_mask_is_remote_with_lit_echo() {
        let lm = Linemode::default_server();
        assert!(lm.remote());
        assert!(!lm.local());
        assert!(lm.lit_echo());
    }

    #[test]
    fn accessors_round_trip_through_set_unset() {
        let mut lm = Linemode::default();
        lm.set_local();
        assert!(lm.local());
        assert!(!lm.remote());
        lm.set_remote();
        assert!(lm.remote());

        lm.set_trapsig();
        assert!(lm.trapsig());
        lm.unset_trapsig();
        assert!(!lm.trapsig());
    }

    #[test]
    fn forwardmask_bit_packing_is_msb_first() {
        let mut fm = Forwardmask::empty(16);
        fm.set(0x03);
        assert!(fm.contains(0x03));
        assert!(!fm.contains(0x04));
        // byte 0x03 is bit 3 of the first byte, MSB-first: 0b0001_0000
        assert_eq!(fm.as_bytes()[0], 0b0001_0000);
    }

    #[test]
    fn slc_function_round_trips_known_byte() {
        assert_eq!(SlcFunction::from(SLC_SYNCH), SlcFunction::Synch);
        let byte: u8 = SlcFunction::Synch.into();
        assert_eq!(byte, SLC_SYNCH);
    }

    #[test]
    fn modifiers_from_byte_decodes_ack_and_flush_flags() {
        let modifiers = Modifiers::from(SLC_ACK | SLC_FLUSHIN);
        assert!(modifiers.ack);
        assert!(modifiers.flush_in);
        assert!(!modifiers.flush_out);
    }
}