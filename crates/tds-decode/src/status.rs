//! TDS packet status decoding.
//!
//! The status byte of a packet header carries four independent flags in
//! bits 0, 1, 3 and 4. Bit 2 and bits 5-7 are reserved. A status byte with
//! none of the flag bits set means "normal": more packets of the same
//! message follow.

use core::fmt;

use bitflags::bitflags;

use crate::flags::{FlagSet, extract_flags};

bitflags! {
    /// Wire representation of the packet status byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusBits: u8 {
        /// End of message (last packet).
        const END_OF_MESSAGE = 0x01;
        /// Ignore this event (used for attention acknowledgment).
        const IGNORE_EVENT = 0x02;
        /// Reset connection (SQL Server 2000+).
        const RESET_CONNECTION = 0x08;
        /// Reset connection but skip transaction state.
        const RESET_CONNECTION_SKIP_TRAN = 0x10;
    }
}

impl StatusBits {
    /// Bits of `byte` that carry no flag.
    #[must_use]
    pub const fn reserved(byte: u8) -> u8 {
        byte & !Self::all().bits()
    }
}

/// A single decoded status flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFlag {
    /// No flag bit set.
    Normal,
    /// End of message.
    EndOfMessage,
    /// Ignore this event.
    IgnoreEvent,
    /// Reset connection.
    ResetConnection,
    /// Reset connection, skip transaction.
    ResetConnectionSkipTran,
}

/// Candidate layout of the status byte, indexed by bit position.
const STATUS_CANDIDATES: [Option<StatusFlag>; 5] = [
    Some(StatusFlag::EndOfMessage),
    Some(StatusFlag::IgnoreEvent),
    None,
    Some(StatusFlag::ResetConnection),
    Some(StatusFlag::ResetConnectionSkipTran),
];

impl StatusFlag {
    /// Bit mask of this flag in the status byte. `Normal` has no bits.
    #[must_use]
    pub const fn mask(self) -> StatusBits {
        match self {
            Self::Normal => StatusBits::empty(),
            Self::EndOfMessage => StatusBits::END_OF_MESSAGE,
            Self::IgnoreEvent => StatusBits::IGNORE_EVENT,
            Self::ResetConnection => StatusBits::RESET_CONNECTION,
            Self::ResetConnectionSkipTran => StatusBits::RESET_CONNECTION_SKIP_TRAN,
        }
    }

    /// MS-TDS name of the flag.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::EndOfMessage => "EOM",
            Self::IgnoreEvent => "IGNORE_THIS",
            Self::ResetConnection => "RESET_CONNECTION",
            Self::ResetConnectionSkipTran => "RESET_CONNECTION_SKIP_TRAN",
        }
    }
}

/// Decoded set of status flags.
///
/// Never empty: a status byte without flag bits decodes to `{Normal}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusFlags {
    flags: FlagSet<StatusFlag>,
}

impl StatusFlags {
    /// The `{Normal}` set.
    #[must_use]
    pub fn normal() -> Self {
        Self {
            flags: FlagSet::from_slice(&[StatusFlag::Normal]),
        }
    }

    /// Check whether the set holds the given flag.
    #[must_use]
    pub fn contains(&self, flag: StatusFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Iterate the flags in ascending bit order.
    pub fn iter(&self) -> impl Iterator<Item = StatusFlag> + '_ {
        self.flags.iter().copied()
    }

    /// Number of flags in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Check if the set is empty. Decoded sets never are.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Check if no flag bit was set.
    #[must_use]
    pub fn is_normal(&self) -> bool {
        self.contains(StatusFlag::Normal)
    }

    /// Check if this is the last packet of a message.
    #[must_use]
    pub fn is_end_of_message(&self) -> bool {
        self.contains(StatusFlag::EndOfMessage)
    }

    /// Re-encode the set as a status byte.
    #[must_use]
    pub fn bits(&self) -> StatusBits {
        self.iter()
            .fold(StatusBits::empty(), |acc, flag| acc | flag.mask())
    }
}

impl Default for StatusFlags {
    fn default() -> Self {
        Self::normal()
    }
}

impl From<StatusBits> for StatusFlags {
    fn from(bits: StatusBits) -> Self {
        decode_status(bits.bits())
    }
}

impl fmt::Display for StatusFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, flag) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(flag.name())?;
        }
        Ok(())
    }
}

/// Decode a header status byte.
#[must_use]
pub fn decode_status(byte: u8) -> StatusFlags {
    let flags = extract_flags(byte, &STATUS_CANDIDATES);
    if flags.is_empty() {
        return StatusFlags::normal();
    }
    StatusFlags { flags }
}
