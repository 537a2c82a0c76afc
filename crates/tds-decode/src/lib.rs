//! # tds-decode
//!
//! Byte-exact decoder for the framing layer of MS-TDS (Tabular Data Stream),
//! the protocol spoken between SQL Server clients and servers.
//!
//! Given one captured TDS frame, the crate recovers the 8-byte packet
//! header, decides whether the packet type carries a body, and classifies
//! response tokens by their fixed payload length.
//!
//! ## Design Philosophy
//!
//! This crate is intentionally IO-agnostic. Capturing traffic, reassembling
//! TCP segments into frames, and parsing token bodies are left to the host.
//! Every function here is pure and synchronous; the only side channel is the
//! [`DispatchObserver`] the host plugs into the [`Dispatcher`].
//!
//! ## Example
//!
//! ```rust
//! use tds_decode::{Dispatched, PacketType, dispatch};
//!
//! // ATTENTION, status NORMAL, length 8
//! let frame = [0x06, 0x00, 0x00, 0x08, 0x00, 0x00, 0x01, 0x00];
//!
//! match dispatch(&frame)? {
//!     Dispatched::Skipped(header) => {
//!         assert_eq!(header.packet_type.packet_type(), Some(PacketType::AttentionSignal));
//!         assert!(header.status.is_normal());
//!     }
//!     Dispatched::BodyPending(packet) => unreachable!("{packet:?}"),
//! }
//! # Ok::<(), tds_decode::DecodeError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod flags;
pub mod packet;
pub mod status;
pub mod token;

pub use config::{DecoderConfig, LengthCheck};
pub use dispatch::{
    DecodedPacket, DispatchObserver, DispatchState, Dispatched, Dispatcher, NoopObserver,
    TracingObserver, dispatch,
};
pub use error::DecodeError;
pub use flags::extract_flags;
pub use packet::{
    DEFAULT_PACKET_SIZE, MAX_PACKET_SIZE, PACKET_HEADER_SIZE, PacketHeader, PacketKind, PacketType,
    classify, parse_header,
};
pub use status::{StatusBits, StatusFlag, StatusFlags, decode_status};
pub use token::{LengthClass, TokenType, length_class_of, lookup_token, token_length_class};
