//! Per-packet dispatch.
//!
//! The dispatcher is the entry point for a captured frame. It decodes the
//! header and then either stops (header-only packets such as ATTENTION) or
//! hands the remaining bytes to a body parser:
//!
//! ```text
//! START → HEADER_PARSED → { BODY_PENDING | NO_BODY }
//! ```
//!
//! Both branches are terminal. The dispatcher keeps no state between
//! packets, so one instance can be shared across threads as long as its
//! observer can.
//!
//! ## Observation
//!
//! Every outcome is reported to a [`DispatchObserver`]. The default
//! [`TracingObserver`] turns them into `tracing` events; hosts that want
//! a different output policy supply their own.

use crate::config::{DecoderConfig, LengthCheck};
use crate::error::DecodeError;
use crate::packet::{PACKET_HEADER_SIZE, PacketHeader, PacketType, parse_header};
use crate::token::{TokenType, lookup_token};

/// Receives dispatch outcomes.
///
/// All methods default to doing nothing.
pub trait DispatchObserver {
    /// A packet without a body was decoded.
    fn on_header_only(&self, _header: &PacketHeader) {}

    /// A packet with a body was decoded; `body_len` bytes follow the header.
    fn on_body_pending(&self, _header: &PacketHeader, _body_len: usize) {}

    /// The declared length differs from the `captured` frame size, or
    /// exceeds the configured maximum.
    fn on_length_mismatch(&self, _header: &PacketHeader, _captured: usize) {}

    /// Decoding failed.
    fn on_failure(&self, _error: &DecodeError) {}
}

impl<O: DispatchObserver + ?Sized> DispatchObserver for &O {
    fn on_header_only(&self, header: &PacketHeader) {
        (**self).on_header_only(header);
    }

    fn on_body_pending(&self, header: &PacketHeader, body_len: usize) {
        (**self).on_body_pending(header, body_len);
    }

    fn on_length_mismatch(&self, header: &PacketHeader, captured: usize) {
        (**self).on_length_mismatch(header, captured);
    }

    fn on_failure(&self, error: &DecodeError) {
        (**self).on_failure(error);
    }
}

/// Observer that ignores every outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {}

/// Observer that emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DispatchObserver for TracingObserver {
    fn on_header_only(&self, header: &PacketHeader) {
        tracing::trace!(
            packet_type = %header.packet_type,
            status = %header.status,
            length = header.length,
            spid = header.spid,
            packet_id = header.packet_id,
            "header-only TDS packet"
        );
    }

    fn on_body_pending(&self, header: &PacketHeader, body_len: usize) {
        tracing::trace!(
            packet_type = %header.packet_type,
            length = header.length,
            spid = header.spid,
            packet_id = header.packet_id,
            is_eom = header.is_end_of_message(),
            body_len = body_len,
            "TDS packet body pending"
        );
    }

    fn on_length_mismatch(&self, header: &PacketHeader, captured: usize) {
        tracing::debug!(
            packet_type = %header.packet_type,
            declared = header.length,
            captured = captured,
            "declared TDS length does not match captured frame"
        );
    }

    fn on_failure(&self, error: &DecodeError) {
        tracing::debug!(error = %error, "failed to decode TDS packet");
    }
}

/// Terminal dispatch state of a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Header-only packet; nothing left to parse.
    NoBody,
    /// Body bytes are waiting for a body parser.
    BodyPending,
}

/// A decoded packet whose body still needs parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPacket<'a> {
    /// Decoded header.
    pub header: PacketHeader,
    /// Bytes following the header, untouched.
    pub body: &'a [u8],
}

impl DecodedPacket<'_> {
    /// First token of a tabular result body.
    ///
    /// Returns `Ok(None)` for other packet types and for an empty body.
    pub fn leading_token(&self) -> Result<Option<TokenType>, DecodeError> {
        if self.header.packet_type.packet_type() != Some(PacketType::TabularResult) {
            return Ok(None);
        }
        self.body.first().map(|&byte| lookup_token(byte)).transpose()
    }
}

/// Outcome of dispatching one captured frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched<'a> {
    /// The packet type has no body; processing stopped after the header.
    Skipped(PacketHeader),
    /// The packet carries a body for an external parser.
    BodyPending(DecodedPacket<'a>),
}

impl Dispatched<'_> {
    /// Decoded header.
    #[must_use]
    pub fn header(&self) -> &PacketHeader {
        match self {
            Self::Skipped(header) => header,
            Self::BodyPending(packet) => &packet.header,
        }
    }

    /// Terminal state reached.
    #[must_use]
    pub fn state(&self) -> DispatchState {
        match self {
            Self::Skipped(_) => DispatchState::NoBody,
            Self::BodyPending(_) => DispatchState::BodyPending,
        }
    }
}

/// Packet dispatcher.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher<O = TracingObserver> {
    config: DecoderConfig,
    observer: O,
}

impl Dispatcher<TracingObserver> {
    /// Create a dispatcher that reports through `tracing`.
    #[must_use]
    pub fn new(config: DecoderConfig) -> Self {
        Self::with_observer(config, TracingObserver)
    }
}

impl<O: DispatchObserver> Dispatcher<O> {
    /// Create a dispatcher with a custom observer.
    #[must_use]
    pub fn with_observer(config: DecoderConfig, observer: O) -> Self {
        Self { config, observer }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Get the observer.
    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Decode one captured frame.
    pub fn dispatch<'a>(&self, bytes: &'a [u8]) -> Result<Dispatched<'a>, DecodeError> {
        let result = self.decode(bytes);
        if let Err(error) = &result {
            self.observer.on_failure(error);
        }
        result
    }

    fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Dispatched<'a>, DecodeError> {
        let header = parse_header(bytes)?;
        self.check_length(&header, bytes.len())?;

        if !header.has_body() {
            self.observer.on_header_only(&header);
            return Ok(Dispatched::Skipped(header));
        }

        let body = &bytes[PACKET_HEADER_SIZE..];
        self.observer.on_body_pending(&header, body.len());
        Ok(Dispatched::BodyPending(DecodedPacket { header, body }))
    }

    fn check_length(&self, header: &PacketHeader, captured: usize) -> Result<(), DecodeError> {
        if self.config.length_check == LengthCheck::Ignore {
            return Ok(());
        }

        let declared = usize::from(header.length);
        if declared == captured && declared <= self.config.max_packet_size {
            return Ok(());
        }

        self.observer.on_length_mismatch(header, captured);
        if self.config.length_check == LengthCheck::Strict {
            return Err(DecodeError::LengthMismatch {
                declared: header.length,
                actual: captured,
            });
        }
        Ok(())
    }
}

/// Decode one captured frame with the default dispatcher.
pub fn dispatch(bytes: &[u8]) -> Result<Dispatched<'_>, DecodeError> {
    Dispatcher::new(DecoderConfig::default()).dispatch(bytes)
}
