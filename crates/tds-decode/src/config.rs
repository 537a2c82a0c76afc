//! Dispatcher configuration.

use crate::packet::MAX_PACKET_SIZE;

/// How the dispatcher treats a declared packet length that disagrees with
/// the captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthCheck {
    /// Do not compare the declared length with the captured size.
    Ignore,
    /// Report mismatches to the observer and keep going.
    #[default]
    Report,
    /// Report mismatches and fail with `LengthMismatch`.
    Strict,
}

/// Configuration for the packet dispatcher.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Declared-length validation policy (default: `Report`).
    pub length_check: LengthCheck,
    /// Largest declared length accepted without a mismatch (default: 65535).
    pub max_packet_size: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            length_check: LengthCheck::Report,
            max_packet_size: MAX_PACKET_SIZE,
        }
    }
}

impl DecoderConfig {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the declared-length validation policy.
    #[must_use]
    pub fn length_check(mut self, check: LengthCheck) -> Self {
        self.length_check = check;
        self
    }

    /// Set the largest acceptable declared length.
    ///
    /// Values above the protocol maximum are clamped to it.
    #[must_use]
    pub fn max_packet_size(mut self, size: usize) -> Self {
        self.max_packet_size = size.min(MAX_PACKET_SIZE);
        self
    }

    /// Configuration that fails on any length disagreement.
    #[must_use]
    pub fn strict() -> Self {
        Self::default().length_check(LengthCheck::Strict)
    }
}
