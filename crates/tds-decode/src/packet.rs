//! TDS packet type classification and header decoding.
//!
//! Every TDS packet begins with an 8-byte header:
//!
//! ```text
//! offset  size  field
//! 0       1     type
//! 1       1     status
//! 2       2     length     (big-endian, header included)
//! 4       2     spid       (big-endian)
//! 6       1     packet id
//! 7       1     window     (reserved, 0)
//! ```

use core::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::DecodeError;
use crate::status::{StatusFlags, decode_status};

/// TDS packet header size in bytes.
pub const PACKET_HEADER_SIZE: usize = 8;

/// Maximum TDS packet size (64KB - 1).
pub const MAX_PACKET_SIZE: usize = 65535;

/// Default TDS packet size.
pub const DEFAULT_PACKET_SIZE: usize = 4096;

/// Highest assigned packet type code. Anything above is unknown.
const MAX_KNOWN_CODE: u8 = 0x12;

/// Codes inside the known range that MS-TDS leaves unassigned.
const UNUSED_CODES: [u8; 7] = [0x05, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0F];

/// Check if `code` is one of the unused-but-numbered packet types.
#[must_use]
pub fn is_unused(code: u8) -> bool {
    UNUSED_CODES.contains(&code)
}

/// Check if `code` lies beyond the known packet type range.
#[must_use]
pub const fn is_unknown(code: u8) -> bool {
    code > MAX_KNOWN_CODE
}

/// Check if packets of type `code` carry a body after the header.
///
/// True for every assigned type except ATTENTION_SIGNAL.
#[must_use]
pub const fn has_body(code: u8) -> bool {
    matches!(code, 0x01..=0x04 | 0x07 | 0x08 | 0x0E | 0x10..=0x12)
}

/// TDS packet type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    /// SQL batch request.
    SqlBatch = 0x01,
    /// Pre-TDS7 login packet.
    PreTds7Login = 0x02,
    /// Remote procedure call.
    Rpc = 0x03,
    /// Tabular response.
    TabularResult = 0x04,
    /// Attention signal.
    AttentionSignal = 0x06,
    /// Bulk load data.
    BulkLoadData = 0x07,
    /// Federated authentication token.
    FedAuthToken = 0x08,
    /// Transaction manager request.
    TransactionManager = 0x0E,
    /// TDS7+ login packet.
    Tds7Login = 0x10,
    /// SSPI authentication.
    Sspi = 0x11,
    /// Pre-login packet.
    PreLogin = 0x12,
}

impl PacketType {
    /// Create a packet type from a raw byte value.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::SqlBatch),
            0x02 => Some(Self::PreTds7Login),
            0x03 => Some(Self::Rpc),
            0x04 => Some(Self::TabularResult),
            0x06 => Some(Self::AttentionSignal),
            0x07 => Some(Self::BulkLoadData),
            0x08 => Some(Self::FedAuthToken),
            0x0E => Some(Self::TransactionManager),
            0x10 => Some(Self::Tds7Login),
            0x11 => Some(Self::Sspi),
            0x12 => Some(Self::PreLogin),
            _ => None,
        }
    }

    /// Raw type code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// MS-TDS name of the packet type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SqlBatch => "SQL_BATCH",
            Self::PreTds7Login => "PRE_TDS7_LOGIN",
            Self::Rpc => "RPC",
            Self::TabularResult => "TABULAR_RESULT",
            Self::AttentionSignal => "ATTENTION_SIGNAL",
            Self::BulkLoadData => "BULK_LOAD_DATA",
            Self::FedAuthToken => "FEDERATED_AUTHENTICATION_TOKEN",
            Self::TransactionManager => "TRANSACTION_MANAGER_REQUEST",
            Self::Tds7Login => "TDS7_LOGIN",
            Self::Sspi => "SSPI",
            Self::PreLogin => "PRE_LOGIN",
        }
    }

    /// Always false for an assigned type.
    #[must_use]
    pub fn is_unused(self) -> bool {
        is_unused(self.code())
    }

    /// Always false for an assigned type.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        is_unknown(self.code())
    }

    /// Check if packets of this type carry a body.
    #[must_use]
    pub const fn has_body(self) -> bool {
        has_body(self.code())
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of classifying a packet type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    /// One of the assigned packet types.
    Known(PacketType),
    /// A code with no assigned type: a gap inside the known range, 0x00, or
    /// anything above 0x12.
    Unassigned(u8),
}

impl PacketKind {
    /// Raw type code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Known(ty) => ty.code(),
            Self::Unassigned(code) => code,
        }
    }

    /// The assigned packet type, if any.
    #[must_use]
    pub const fn packet_type(self) -> Option<PacketType> {
        match self {
            Self::Known(ty) => Some(ty),
            Self::Unassigned(_) => None,
        }
    }

    /// Check if the code is one of the unused-but-numbered types.
    #[must_use]
    pub fn is_unused(self) -> bool {
        is_unused(self.code())
    }

    /// Check if the code lies beyond the known range.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        is_unknown(self.code())
    }

    /// Check if packets of this kind carry a body.
    #[must_use]
    pub const fn has_body(self) -> bool {
        has_body(self.code())
    }
}

impl From<PacketType> for PacketKind {
    fn from(ty: PacketType) -> Self {
        Self::Known(ty)
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(ty) => fmt::Display::fmt(ty, f),
            Self::Unassigned(code) => write!(f, "UNASSIGNED(0x{code:02X})"),
        }
    }
}

/// Classify a packet type byte.
#[must_use]
pub const fn classify(byte: u8) -> PacketKind {
    match PacketType::from_u8(byte) {
        Some(ty) => PacketKind::Known(ty),
        None => PacketKind::Unassigned(byte),
    }
}

/// TDS packet header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketHeader {
    /// Type of packet.
    pub packet_type: PacketKind,
    /// Decoded status flags.
    pub status: StatusFlags,
    /// Declared total packet length including header.
    pub length: u16,
    /// Server process ID (SPID).
    pub spid: u16,
    /// Packet sequence number (wraps at 255).
    pub packet_id: u8,
    /// Window (reserved, expected 0 but not checked).
    pub window: u8,
}

impl PacketHeader {
    /// Create a new packet header.
    #[must_use]
    pub fn new(packet_type: PacketType, status: StatusFlags, length: u16) -> Self {
        Self {
            packet_type: PacketKind::Known(packet_type),
            status,
            length,
            spid: 0,
            packet_id: 0,
            window: 0,
        }
    }

    /// Parse a packet header from bytes.
    ///
    /// Consumes exactly [`PACKET_HEADER_SIZE`] bytes on success. Fails with
    /// [`DecodeError::IncompleteHeader`] before consuming anything when fewer
    /// bytes are available, and with [`DecodeError::UnknownPacketType`] when
    /// the type byte is above 0x12.
    pub fn decode(src: &mut impl Buf) -> Result<Self, DecodeError> {
        if src.remaining() < PACKET_HEADER_SIZE {
            return Err(DecodeError::IncompleteHeader {
                expected: PACKET_HEADER_SIZE,
                actual: src.remaining(),
            });
        }

        let packet_type = classify(src.get_u8());
        if packet_type.is_unknown() {
            return Err(DecodeError::UnknownPacketType(packet_type.code()));
        }
        let status = decode_status(src.get_u8());
        let length = src.get_u16();
        let spid = src.get_u16();
        let packet_id = src.get_u8();
        let window = src.get_u8();

        Ok(Self {
            packet_type,
            status,
            length,
            spid,
            packet_id,
            window,
        })
    }

    /// Encode the packet header to bytes.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u8(self.packet_type.code());
        dst.put_u8(self.status.bits().bits());
        dst.put_u16(self.length);
        dst.put_u16(self.spid);
        dst.put_u8(self.packet_id);
        dst.put_u8(self.window);
    }

    /// Encode the packet header to a new `Bytes` buffer.
    #[must_use]
    pub fn encode_to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(PACKET_HEADER_SIZE);
        self.encode(&mut buf);
        buf.freeze()
    }

    /// Get the payload length (declared length minus header).
    #[must_use]
    pub const fn payload_length(&self) -> usize {
        self.length.saturating_sub(PACKET_HEADER_SIZE as u16) as usize
    }

    /// Check if this is the last packet in a message.
    #[must_use]
    pub fn is_end_of_message(&self) -> bool {
        self.status.is_end_of_message()
    }

    /// Check if this packet carries a body.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        self.packet_type.has_body()
    }

    /// Set the packet ID (sequence number).
    #[must_use]
    pub fn with_packet_id(mut self, id: u8) -> Self {
        self.packet_id = id;
        self
    }

    /// Set the SPID.
    #[must_use]
    pub fn with_spid(mut self, spid: u16) -> Self {
        self.spid = spid;
        self
    }
}

/// Parse the header at the start of a captured frame.
pub fn parse_header(bytes: &[u8]) -> Result<PacketHeader, DecodeError> {
    let mut cursor = bytes;
    PacketHeader::decode(&mut cursor)
}
