//! Special Line Character (SLC) table and the reconciliation algorithm
//! that drives `IAC SB LINEMODE SLC` negotiation (RFC 1184 §2).

use crate::constants::{
    NSLC, SLC_ABORT, SLC_AO, SLC_AYT, SLC_BRK, SLC_EC, SLC_EL, SLC_EOF, SLC_EW, SLC_FORW1,
    SLC_FORW2, SLC_IP, SLC_LNEXT, SLC_POSIX_VDISABLE, SLC_RP, SLC_SUSP, SLC_SYNCH, SLC_XOFF,
    SLC_XON,
};
use crate::linemode::{Forwardmask, Level, Modifiers};

const TABLE_LEN: usize = NSLC as usize + 1;

/// One function's negotiated state: its support level + ack/flush flags,
/// plus the byte value that triggers it. `SLC_POSIX_VDISABLE` (`0xff`)
/// means "no character assigned".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlcEntry {
    pub modifiers: Modifiers,
    pub value: u8,
}

impl SlcEntry {
    #[must_use]
    pub fn no_support() -> Self {
        SlcEntry {
            modifiers: Modifiers { level: Level::NoSupport, ack: false, flush_in: false, flush_out: false },
            value: SLC_POSIX_VDISABLE,
        }
    }

    fn cant_change(value: u8) -> Self {
        SlcEntry {
            modifiers: Modifiers { level: Level::CantChange, ack: false, flush_in: false, flush_out: false },
            value,
        }
    }

    fn default_level(value: u8) -> Self {
        SlcEntry {
            modifiers: Modifiers { level: Level::Default, ack: false, flush_in: false, flush_out: false },
            value,
        }
    }
}

/// Outcome of reconciling a remote-proposed SLC triplet against our table.
/// `Reply` carries the triplet to append to the outbound `_slc_buffer`;
/// `SendFullTabset`/`SendCurrentTabset` are the func==0 special requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlcOutcome {
    NoReply,
    Reply(u8, SlcEntry),
    SendFullTabset,
    SendCurrentTabset,
}

/// The per-function SLC table (one entry per function 0..=NSLC), plus the
/// tabset it resets to on `SLC_DEFAULT` for func 0.
#[derive(Debug, Clone)]
pub struct SlcTable {
    entries: [SlcEntry; TABLE_LEN],
    default_tab: [SlcEntry; TABLE_LEN],
}

impl SlcTable {
    #[must_use]
    pub fn new(default_tab: [SlcEntry; TABLE_LEN]) -> Self {
        SlcTable { entries: default_tab, default_tab }
    }

    /// A conventional Unix termios-derived tabset: the interrupt/kill/erase
    /// family gets its usual control character with a changeable level,
    /// cursor-movement and multi-character functions are unsupported.
    #[must_use]
    pub fn default_tabset() -> [SlcEntry; TABLE_LEN] {
        let mut tab = [SlcEntry::no_support(); TABLE_LEN];
        tab[SLC_SYNCH as usize] = SlcEntry::cant_change(SLC_POSIX_VDISABLE);
        tab[SLC_BRK as usize] = SlcEntry::cant_change(SLC_POSIX_VDISABLE);
        tab[SLC_IP as usize] = SlcEntry::default_level(0x03); // ^C
        tab[SLC_AO as usize] = SlcEntry::default_level(0x0f); // ^O
        tab[SLC_AYT as usize] = SlcEntry::default_level(0x14); // ^T
        tab[SLC_ABORT as usize] = SlcEntry::default_level(0x1c); // ^\
        tab[SLC_EOF as usize] = SlcEntry::default_level(0x04); // ^D
        tab[SLC_SUSP as usize] = SlcEntry::default_level(0x1a); // ^Z
        tab[SLC_EC as usize] = SlcEntry::default_level(0x7f); // DEL
        tab[SLC_EL as usize] = SlcEntry::default_level(0x15); // ^U
        tab[SLC_EW as usize] = SlcEntry::default_level(0x17); // ^W
        tab[SLC_RP as usize] = SlcEntry::default_level(0x12); // ^R
        tab[SLC_LNEXT as usize] = SlcEntry::default_level(0x16); // ^V
        tab[SLC_XON as usize] = SlcEntry::default_level(0x11); // ^Q
        tab[SLC_XOFF as usize] = SlcEntry::default_level(0x13); // ^S
        tab[SLC_FORW1 as usize] = SlcEntry::cant_change(SLC_POSIX_VDISABLE);
        tab[SLC_FORW2 as usize] = SlcEntry::cant_change(SLC_POSIX_VDISABLE);
        tab
    }

    #[must_use]
    pub fn get(&self, func: u8) -> SlcEntry {
        self.entries.get(func as usize).copied().unwrap_or_else(SlcEntry::no_support)
    }

    fn set(&mut self, func: u8, entry: SlcEntry) {
        if let Some(slot) = self.entries.get_mut(func as usize) {
            *slot = entry;
        }
    }

    pub fn reset_to_default(&mut self) {
        self.entries = self.default_tab;
    }

    /// Every entry that carries a real character, func paired with entry -
    /// used both to flush the full tabset and to build the forwardmask.
    fn supported(&self, include_func_zero: bool) -> impl Iterator<Item = (u8, SlcEntry)> + '_ {
        self.entries.iter().enumerate().filter_map(move |(func, entry)| {
            if entry.modifiers.level == Level::NoSupport {
                return None;
            }
            if func == 0 && !include_func_zero {
                return None;
            }
            Some((func as u8, *entry))
        })
    }

    /// All non-NOSUPPORT entries, `func` 0 included only when `is_server`
    /// (only the server may emit the SLC_NOSUPPORT-func-0 sentinel triplet).
    pub fn tabset(&self, is_server: bool) -> Vec<(u8, SlcEntry)> {
        self.supported(is_server).collect()
    }

    /// Implements `_slc_process`/`_slc_change` (RFC 1184 §2.4): reconciles a
    /// remote-proposed `(func, their_modifiers, their_value)` triplet
    /// against our table, mutating it and returning what (if anything) to
    /// echo back.
    pub fn process(&mut self, func: u8, their: Modifiers, their_value: u8) -> SlcOutcome {
        if func as u16 > NSLC as u16 {
            return SlcOutcome::Reply(
                func,
                SlcEntry {
                    modifiers: Modifiers { level: Level::NoSupport, ack: true, flush_in: false, flush_out: false },
                    value: SLC_POSIX_VDISABLE,
                },
            );
        }

        if func == 0 {
            return match their.level {
                Level::Default => {
                    tracing::info!("SLC func 0 SLC_DEFAULT: resetting table to defaults");
                    self.reset_to_default();
                    SlcOutcome::SendFullTabset
                }
                Level::Value => {
                    tracing::info!("SLC func 0 SLC_VARIABLE: sending current tabset");
                    SlcOutcome::SendCurrentTabset
                }
                other => {
                    tracing::warn!(level = ?other, "SLC func 0 with unexpected level, ignoring");
                    SlcOutcome::NoReply
                }
            };
        }

        let mine = self.get(func);
        let mine_value = mine.value;
        let their_level = their.level;
        let outcome = if their_level == mine.modifiers.level && their_value == mine_value {
            SlcOutcome::NoReply
        } else if their_level == mine.modifiers.level && their.ack {
            SlcOutcome::NoReply
        } else if their.ack {
            tracing::debug!(func, their_value, mine_value, "SLC ack with mismatched value, ignoring");
            SlcOutcome::NoReply
        } else {
            self.change(func, mine, their, their_value)
        };
        tracing::debug!(func, level = ?their_level, their_value, outcome = ?outcome, "SLC function reconciled");
        outcome
    }

    fn change(&mut self, func: u8, mine: SlcEntry, their: Modifiers, their_value: u8) -> SlcOutcome {
        if their.level == Level::NoSupport {
            let entry = SlcEntry {
                modifiers: Modifiers { level: Level::NoSupport, ack: true, flush_in: false, flush_out: false },
                value: SLC_POSIX_VDISABLE,
            };
            self.set(func, entry);
            return SlcOutcome::Reply(func, entry);
        }

        if their.level == Level::Default {
            let default_entry = self.default_tab[func as usize];
            let modifiers = if mine.modifiers.level == Level::Default {
                Modifiers { level: Level::NoSupport, ack: false, flush_in: false, flush_out: false }
            } else {
                default_entry.modifiers
            };
            let entry = SlcEntry { modifiers, value: default_entry.value };
            self.set(func, entry);
            return SlcOutcome::Reply(func, entry);
        }

        // Their proposed value/mask is accepted outright once we already
        // have a real assigned character (non-null).
        if mine.value != 0 {
            let entry = SlcEntry {
                modifiers: Modifiers { ack: true, ..their },
                value: their_value,
            };
            self.set(func, entry);
            return SlcOutcome::Reply(func, entry);
        }

        if mine.modifiers.level == Level::Default {
            let entry = SlcEntry { modifiers: Modifiers { ack: true, ..their }, value: their_value };
            self.set(func, entry);
            return SlcOutcome::Reply(func, entry);
        }

        if their.level == Level::CantChange && mine.modifiers.level == Level::CantChange {
            let entry = SlcEntry {
                modifiers: Modifiers { level: Level::NoSupport, ack: false, flush_in: false, flush_out: false },
                value: mine.value,
            };
            self.set(func, entry);
            return SlcOutcome::Reply(func, entry);
        }

        let mut entry = SlcEntry {
            modifiers: Modifiers { level: mine.modifiers.level, ack: false, flush_in: false, flush_out: false },
            value: mine.value,
        };
        if mine.modifiers.level == Level::CantChange {
            entry.value = self.default_tab[func as usize].value;
        }
        self.set(func, entry);
        SlcOutcome::Reply(func, entry)
    }

    /// `_generate_forwardmask` (RFC 1184 §3.1): bit `i` is set iff some
    /// supported (non-NOSUPPORT) SLC entry's value is `i`.
    #[must_use]
    pub fn generate_forwardmask(&self, binary_enabled: bool) -> Forwardmask {
        let num_bytes = if binary_enabled { 32 } else { 16 };
        let mut fm = Forwardmask::empty(num_bytes);
        for (_func, entry) in self.supported(true) {
            if (entry.value as usize) < num_bytes * 8 {
                fm.set(entry.value);
            }
        }
        fm
    }
}

impl Default for SlcTable {
    fn default() -> Self {
        SlcTable::new(SlcTable::default_tabset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_func_replies_nosupport_ack() {
        let mut table = SlcTable::default();
        let outcome = table.process(200, Modifiers { level: Level::Value, ack: false, flush_in: false, flush_out: false }, 5);
        match outcome {
            SlcOutcome::Reply(func, entry) => {
                assert_eq!(func, 200);
                assert_eq!(entry.modifiers.level, Level::NoSupport);
                assert!(entry.modifiers.ack);
                assert_eq!(entry.value, SLC_POSIX_VDISABLE);
            }
            other => panic!("expected Reply, got {other:?}"),
        }
    }

    #[test]
    fn matching_proposal_is_a_noop() {
        let mut table = SlcTable::default();
        let mine = table.get(SLC_IP);
        let outcome = table.process(SLC_IP, mine.modifiers, mine.value);
        assert_eq!(outcome, SlcOutcome::NoReply);
    }

    #[test]
    fn reconciliation_is_a_fixed_point() {
        let mut table = SlcTable::default();
        let their = Modifiers { level: Level::Value, ack: false, flush_in: false, flush_out: false };
        let first = table.process(SLC_EC, their, 0x08);
        assert!(matches!(first, SlcOutcome::Reply(..)));
        // Applying the exact same proposal again must now be a no-op: the
        // table already reflects it.
        let second = table.process(SLC_EC, their, 0x08);
        assert_eq!(second, SlcOutcome::NoReply);
    }

    #[test]
    fn func_zero_default_resets_and_requests_full_tabset() {
        let mut table = SlcTable::default();
        table.set(SLC_IP, SlcEntry::no_support());
        let outcome = table.process(0, Modifiers { level: Level::Default, ack: false, flush_in: false, flush_out: false }, 0);
        assert_eq!(outcome, SlcOutcome::SendFullTabset);
        assert_eq!(table.get(SLC_IP).value, 0x03);
    }

    #[test]
    fn forwardmask_bit_set_iff_supported_value_matches() {
        let table = SlcTable::default();
        let fm = table.generate_forwardmask(false);
        assert!(fm.contains(0x03)); // SLC_IP default
        assert!(!fm.contains(0x41)); // 'A' is not bound to any SLC function
    }
}
