use std::collections::HashMap;

use crate::constants::{
    BINARY, CHARSET, ECHO, EXOPL, GA, GMCP, LFLOW, LINEMODE, LOGOUT, MCCP2, MSP, MSSP, MXP,
    NAWS, SGA, SNDLOC, STATUS, TELOPT_EOR, TIMING_MARK, TSPEED, TTYPE, XDISPLOC,
};

/// Represents all Telnet options this engine negotiates, plus the MUD
/// extensions carried over from the codec this crate started life as.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TelnetOption {
    /// Binary transmission - RFC 856.
    Binary,
    /// Echo a message back to the other side
    Echo,
    /// Indicates that the receiver may now send data to the sender.
    ///
    /// This is used in half-duplex connections, where the sender and receiver
    /// cannot send data at the same time. If you want bi-directional data
    /// transfer, you must set `SuppressGoAhead` on the sender and receiver
    /// sides.
    GoAhead,
    /// Indicates that the communication stream will be bi-directional.
    ///
    /// This must be set on both sides of the data stream independently, even
    /// though it is expected that if one side sets it, the other side will also
    /// set it.
    ///
    /// See <https://datatracker.ietf.org/doc/html/rfc858> for more information.
    SuppressGoAhead,
    /// Verify the current status of negotiated options - RFC 859.
    Status,
    /// Timing mark - RFC 860.
    TimingMark,
    /// Terminal type - RFC 1091.
    Ttype,
    /// Indicates how EOR (End Of Record) is handled between a sender and
    /// receiver. Typically this is marked by Carrige Return and Line Feed. In
    /// systems that have a different EOR marker, this option can be used to
    /// change the EOR marker.
    ///
    /// Like SuppressGoAhead, this must be set on both sides of the data stream
    /// independently - even though it is expected that if one side sets it, the
    /// other side will also set it.
    ///
    /// See <https://datatracker.ietf.org/doc/html/rfc885> for more information.
    EndOfRecord,
    /// Negotiate About Window Size - RFC 1073.
    Naws,
    /// Terminal speed - RFC 1079.
    Tspeed,
    /// Remote flow control - RFC 1372.
    Lflow,
    /// Linemode - RFC 1116.
    Linemode,
    /// X display location - RFC 1096.
    Xdisploc,
    /// Environment variables - RFC 1572.
    NewEnviron,
    /// Client source location - tintin.mudhalla.net/protocols/sndloc.
    Sndloc,
    /// Logout - RFC 727.
    Logout,
    /// Extended options list - RFC 861.
    Exopl,
    Charset,
    MCCP2,
    GMCP,
    MSSP,
    MSP,
    MXP,
    /// A generic marker indicating an unknown option.
    Unknown(u8),
}

impl From<u8> for TelnetOption {
    fn from(byte: u8) -> Self {
        match byte {
            BINARY => TelnetOption::Binary,
            ECHO => TelnetOption::Echo,
            GA => TelnetOption::GoAhead,
            SGA => TelnetOption::SuppressGoAhead,
            STATUS => TelnetOption::Status,
            TIMING_MARK => TelnetOption::TimingMark,
            TTYPE => TelnetOption::Ttype,
            TELOPT_EOR => TelnetOption::EndOfRecord,
            NAWS => TelnetOption::Naws,
            TSPEED => TelnetOption::Tspeed,
            LFLOW => TelnetOption::Lflow,
            LINEMODE => TelnetOption::Linemode,
            XDISPLOC => TelnetOption::Xdisploc,
            crate::constants::ENVIRON => TelnetOption::NewEnviron,
            SNDLOC => TelnetOption::Sndloc,
            LOGOUT => TelnetOption::Logout,
            CHARSET => TelnetOption::Charset,
            MCCP2 => TelnetOption::MCCP2,
            GMCP => TelnetOption::GMCP,
            MSSP => TelnetOption::MSSP,
            MSP => TelnetOption::MSP,
            MXP => TelnetOption::MXP,
            // EXOPL shares its wire value (255) with IAC; only meaningful as
            // an option byte inside a DO/WILL/DONT/WONT triplet, never alone.
            EXOPL => TelnetOption::Exopl,
            _ => TelnetOption::Unknown(byte),
        }
    }
}

impl From<TelnetOption> for u8 {
    fn from(option: TelnetOption) -> Self {
        match option {
            TelnetOption::Binary => BINARY,
            TelnetOption::Echo => ECHO,
            TelnetOption::GoAhead => GA,
            TelnetOption::SuppressGoAhead => SGA,
            TelnetOption::Status => STATUS,
            TelnetOption::TimingMark => TIMING_MARK,
            TelnetOption::Ttype => TTYPE,
            TelnetOption::EndOfRecord => TELOPT_EOR,
            TelnetOption::Naws => NAWS,
            TelnetOption::Tspeed => TSPEED,
            TelnetOption::Lflow => LFLOW,
            TelnetOption::Linemode => LINEMODE,
            TelnetOption::Xdisploc => XDISPLOC,
            TelnetOption::NewEnviron => crate::constants::ENVIRON,
            TelnetOption::Sndloc => SNDLOC,
            TelnetOption::Logout => LOGOUT,
            TelnetOption::Exopl => EXOPL,
            TelnetOption::Charset => CHARSET,
            TelnetOption::MCCP2 => MCCP2,
            TelnetOption::GMCP => GMCP,
            TelnetOption::MSSP => MSSP,
            TelnetOption::MSP => MSP,
            TelnetOption::MXP => MXP,
            TelnetOption::Unknown(byte) => byte,
        }
    }
}

/// A key into one of the three negotiation tables ([`OptionTable`]).
///
/// Modeled as a sum type rather than a raw byte string so that the wire
/// bytes making up a key (an opt byte, or a `cmd + opt` pair) stay
/// first-class while `match` still enforces exhaustiveness at the call
/// sites that build or consult a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NegotiationKey {
    /// `local_option`/`remote_option` entry for a single negotiated option.
    Option(u8),
    /// `pending_option` entry for an outstanding `DO`/`DONT`/`WILL`/`WONT`.
    Negotiation(u8, u8),
    /// `pending_option` entry for an outstanding `SB opt` round-trip.
    Subnegotiation(u8),
    /// `pending_option` entry for an outstanding NEW_ENVIRON `SEND IS`,
    /// kept distinct from a plain [`NegotiationKey::Subnegotiation`] because
    /// NEW_ENVIRON has two different outbound request shapes.
    EnvironSendIs,
}

/// A logged mapping from a [`NegotiationKey`] to a tri-state boolean.
///
/// Entries are created on first write and never removed; an absent key is
/// treated identically to an entry holding `false` ("unnegotiated"). Used
/// three times by the engine: as `local_option`, `remote_option`, and
/// `pending_option`.
#[derive(Debug, Default)]
pub struct OptionTable {
    name: &'static str,
    entries: HashMap<NegotiationKey, bool>,
}

impl OptionTable {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        OptionTable { name, entries: HashMap::new() }
    }

    /// Current value for `key`; absence is `false`.
    #[must_use]
    pub fn get(&self, key: NegotiationKey) -> bool {
        self.entries.get(&key).copied().unwrap_or(false)
    }

    /// Whether `key` has ever been written, distinct from its current value -
    /// used by the "no prior record" fallback for unrecognized `DO` options.
    #[must_use]
    pub fn contains(&self, key: NegotiationKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// `enabled(k)` is just `get(k)` - the table only ever stores booleans,
    /// so "is this key exactly `true`" and "what is this key" coincide.
    #[must_use]
    pub fn enabled(&self, key: NegotiationKey) -> bool {
        self.get(key)
    }

    pub fn set(&mut self, key: NegotiationKey, value: bool) {
        let changed = self.entries.get(&key).copied() != Some(value);
        if changed {
            tracing::debug!(table = self.name, ?key, value, "option table write");
        }
        self.entries.insert(key, value);
    }

    /// Iterates `(opt, value)` pairs for every plain [`NegotiationKey::Option`]
    /// entry recorded so far - used by `STATUS IS` to report the full set of
    /// options this end has an opinion on.
    pub fn options(&self) -> impl Iterator<Item = (u8, bool)> + '_ {
        self.entries.iter().filter_map(|(k, v)| match k {
            NegotiationKey::Option(opt) => Some((*opt, *v)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod option_table_tests {
    use super::*;

    #[test]
    fn absent_key_reads_as_false() {
        let table = OptionTable::new("local");
        assert!(!table.enabled(NegotiationKey::Option(1)));
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut table = OptionTable::new("remote");
        table.set(NegotiationKey::Option(24), true);
        assert!(table.enabled(NegotiationKey::Option(24)));
        table.set(NegotiationKey::Option(24), false);
        assert!(!table.enabled(NegotiationKey::Option(24)));
    }

    #[test]
    fn negotiation_and_subnegotiation_keys_are_distinct() {
        let mut table = OptionTable::new("pending");
        table.set(NegotiationKey::Negotiation(253, 34), true);
        assert!(!table.enabled(NegotiationKey::Subnegotiation(34)));
        assert!(table.enabled(NegotiationKey::Negotiation(253, 34)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_known_options() {
        for opt in [
            TelnetOption::Binary,
            TelnetOption::Echo,
            TelnetOption::GoAhead,
            TelnetOption::SuppressGoAhead,
            TelnetOption::Status,
            TelnetOption::TimingMark,
            TelnetOption::Ttype,
            TelnetOption::EndOfRecord,
            TelnetOption::Naws,
            TelnetOption::Tspeed,
            TelnetOption::Lflow,
            TelnetOption::Linemode,
            TelnetOption::Xdisploc,
            TelnetOption::NewEnviron,
            TelnetOption::Sndloc,
            TelnetOption::Logout,
            TelnetOption::Charset,
        ] {
            let byte: u8 = opt.into();
            assert_eq!(TelnetOption::from(byte), opt);
        }
    }

    #[test]
    fn unknown_byte_round_trips() {
        let opt = TelnetOption::from(199);
        assert_eq!(opt, TelnetOption::Unknown(199));
        assert_eq!(u8::from(opt), 199);
    }
}
