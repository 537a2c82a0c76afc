//! Decode error types.

use thiserror::Error;

/// Errors that can occur while decoding a captured TDS packet.
///
/// None of these are fatal to the host process. Each one is a local decode
/// outcome that the caller decides how to handle (drop, log, wait for more
/// bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// Fewer than 8 bytes were supplied for the packet header.
    #[error("incomplete packet header: expected {expected} bytes, got {actual}")]
    IncompleteHeader {
        /// Bytes required.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },

    /// The header's type byte is beyond the known packet type range.
    #[error("unknown packet type: 0x{0:02X}")]
    UnknownPacketType(u8),

    /// A body token byte matched none of the known response tokens.
    #[error("unrecognized token: 0x{0:02X}")]
    UnrecognizedToken(u8),

    /// The declared packet length disagrees with the captured byte count.
    #[error("packet length mismatch: header declares {declared} bytes, captured {actual}")]
    LengthMismatch {
        /// Length field from the header.
        declared: u16,
        /// Bytes actually captured for the frame.
        actual: usize,
    },
}

impl DecodeError {
    /// Check if the error may go away once more bytes are available.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::IncompleteHeader { .. })
    }

    /// Check if the error reflects bytes that violate MS-TDS framing.
    #[must_use]
    pub const fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            Self::UnknownPacketType(_) | Self::UnrecognizedToken(_) | Self::LengthMismatch { .. }
        )
    }
}
