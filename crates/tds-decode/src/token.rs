//! TDS response token classification.
//!
//! A tabular result body is a stream of tokens, each introduced by a 1-byte
//! token type. Whether a token carries a fixed-size payload, and how large
//! it is, is encoded in bits 5..2 of the token byte:
//!
//! | bits 5..2 | length class |
//! |-----------|--------------|
//! | `0010`    | 0 bytes      |
//! | `0011`    | 1 byte       |
//! | `1011`    | 2 bytes      |
//! | `0111`    | 3 bytes      |
//! | `1111`    | 4 bytes      |
//! | otherwise | variable     |
//!
//! Variable-length tokens carry their own length field after the token
//! byte. Reading it is the body parser's job; this module only reports the
//! class.

use core::fmt;

use crate::error::DecodeError;

/// Token type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenType {
    /// Offset (OFFSET).
    Offset = 0x78,
    /// Return status (RETURNSTATUS).
    ReturnStatus = 0x79,
    /// Column metadata (COLMETADATA).
    ColMetaData = 0x81,
    /// Alternate column metadata (ALTMETADATA).
    AltMetaData = 0x88,
    /// Data classification (DATACLASSIFICATION).
    DataClassification = 0xA3,
    /// Table name (TABNAME).
    TabName = 0xA4,
    /// Column info (COLINFO).
    ColInfo = 0xA5,
    /// Order (ORDER).
    Order = 0xA9,
    /// Error message (ERROR).
    Error = 0xAA,
    /// Informational message (INFO).
    Info = 0xAB,
    /// Return value (RETURNVALUE).
    ReturnValue = 0xAC,
    /// Login acknowledgment (LOGINACK).
    LoginAck = 0xAD,
    /// Feature extension acknowledgment (FEATUREEXTACK).
    FeatureExtAck = 0xAE,
    /// Row data (ROW).
    Row = 0xD1,
    /// Null bitmap compressed row (NBCROW).
    NbcRow = 0xD2,
    /// Alternate row (ALTROW).
    AltRow = 0xD3,
    /// Environment change (ENVCHANGE).
    EnvChange = 0xE3,
    /// Session state (SESSIONSTATE).
    SessionState = 0xE4,
    /// SSPI authentication (SSPI).
    Sspi = 0xED,
    /// Federated authentication info (FEDAUTHINFO).
    FedAuthInfo = 0xEE,
    /// Done (DONE).
    Done = 0xFD,
    /// Done procedure (DONEPROC).
    DoneProc = 0xFE,
    /// Done in procedure (DONEINPROC).
    DoneInProc = 0xFF,
}

impl TokenType {
    /// Every response token, in ascending code order.
    pub const ALL: [Self; 23] = [
        Self::Offset,
        Self::ReturnStatus,
        Self::ColMetaData,
        Self::AltMetaData,
        Self::DataClassification,
        Self::TabName,
        Self::ColInfo,
        Self::Order,
        Self::Error,
        Self::Info,
        Self::ReturnValue,
        Self::LoginAck,
        Self::FeatureExtAck,
        Self::Row,
        Self::NbcRow,
        Self::AltRow,
        Self::EnvChange,
        Self::SessionState,
        Self::Sspi,
        Self::FedAuthInfo,
        Self::Done,
        Self::DoneProc,
        Self::DoneInProc,
    ];

    /// Create a token type from a raw byte.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x78 => Some(Self::Offset),
            0x79 => Some(Self::ReturnStatus),
            0x81 => Some(Self::ColMetaData),
            0x88 => Some(Self::AltMetaData),
            0xA3 => Some(Self::DataClassification),
            0xA4 => Some(Self::TabName),
            0xA5 => Some(Self::ColInfo),
            0xA9 => Some(Self::Order),
            0xAA => Some(Self::Error),
            0xAB => Some(Self::Info),
            0xAC => Some(Self::ReturnValue),
            0xAD => Some(Self::LoginAck),
            0xAE => Some(Self::FeatureExtAck),
            0xD1 => Some(Self::Row),
            0xD2 => Some(Self::NbcRow),
            0xD3 => Some(Self::AltRow),
            0xE3 => Some(Self::EnvChange),
            0xE4 => Some(Self::SessionState),
            0xED => Some(Self::Sspi),
            0xEE => Some(Self::FedAuthInfo),
            0xFD => Some(Self::Done),
            0xFE => Some(Self::DoneProc),
            0xFF => Some(Self::DoneInProc),
            _ => None,
        }
    }

    /// Raw token byte.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// MS-TDS name of the token.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Offset => "OFFSET",
            Self::ReturnStatus => "RETURNSTATUS",
            Self::ColMetaData => "COLMETADATA",
            Self::AltMetaData => "ALTMETADATA",
            Self::DataClassification => "DATACLASSIFICATION",
            Self::TabName => "TABNAME",
            Self::ColInfo => "COLINFO",
            Self::Order => "ORDER",
            Self::Error => "ERROR",
            Self::Info => "INFO",
            Self::ReturnValue => "RETURNVALUE",
            Self::LoginAck => "LOGINACK",
            Self::FeatureExtAck => "FEATUREEXTACK",
            Self::Row => "ROW",
            Self::NbcRow => "NBCROW",
            Self::AltRow => "ALTROW",
            Self::EnvChange => "ENVCHANGE",
            Self::SessionState => "SESSIONSTATE",
            Self::Sspi => "SSPI",
            Self::FedAuthInfo => "FEDAUTHINFO",
            Self::Done => "DONE",
            Self::DoneProc => "DONEPROC",
            Self::DoneInProc => "DONEINPROC",
        }
    }

    /// Length class of this token.
    #[must_use]
    pub const fn length_class(self) -> LengthClass {
        length_class_of(self.code())
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload size class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthClass {
    /// Fixed payload of 0 to 4 bytes.
    Fixed(u8),
    /// Payload length follows in a length field.
    Variable,
}

impl LengthClass {
    /// Payload size in bytes for fixed-length tokens.
    #[must_use]
    pub const fn fixed_len(self) -> Option<usize> {
        match self {
            Self::Fixed(len) => Some(len as usize),
            Self::Variable => None,
        }
    }

    /// Check if the payload length is carried in a length field.
    #[must_use]
    pub const fn is_variable(self) -> bool {
        matches!(self, Self::Variable)
    }
}

impl fmt::Display for LengthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(len) => write!(f, "{len}"),
            Self::Variable => f.write_str("VARIABLE"),
        }
    }
}

/// Mask selecting bits 5..2 of a token byte.
const LENGTH_BITS: u8 = 0b0011_1100;

/// Bit patterns (bits 5..2) for each fixed length, checked in order.
const FIXED_LENGTH_PATTERNS: [(u8, u8); 5] = [
    (0b0010, 0),
    (0b0011, 1),
    (0b1011, 2),
    (0b0111, 3),
    (0b1111, 4),
];

/// Length class of any token byte, known or not.
///
/// Patterns are tested in the order 0, 1, 2, 3, 4 and the first match
/// wins; a byte matching none is variable-length.
#[must_use]
pub const fn length_class_of(byte: u8) -> LengthClass {
    let bits = (byte & LENGTH_BITS) >> 2;
    let mut i = 0;
    while i < FIXED_LENGTH_PATTERNS.len() {
        let (pattern, len) = FIXED_LENGTH_PATTERNS[i];
        if bits == pattern {
            return LengthClass::Fixed(len);
        }
        i += 1;
    }
    LengthClass::Variable
}

/// Look up a response token by its leading byte.
pub fn lookup_token(byte: u8) -> Result<TokenType, DecodeError> {
    TokenType::from_u8(byte).ok_or(DecodeError::UnrecognizedToken(byte))
}

/// Length class of a known token.
#[must_use]
pub const fn token_length_class(token: TokenType) -> LengthClass {
    token.length_class()
}

/// Number of fixed-length patterns `byte` satisfies. Used to check that the
/// pattern table stays mutually exclusive.
#[doc(hidden)]
#[must_use]
pub fn matching_patterns(byte: u8) -> usize {
    let bits = (byte & LENGTH_BITS) >> 2;
    FIXED_LENGTH_PATTERNS
        .iter()
        .filter(|(pattern, _)| *pattern == bits)
        .count()
}
