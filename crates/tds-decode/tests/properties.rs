//! Property tests for header, status and token classification.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use tds_decode::{
    DecoderConfig, Dispatched, Dispatcher, LengthClass, NoopObserver, PacketHeader, PacketKind,
    PacketType, StatusFlag, TokenType, classify, decode_status, length_class_of, lookup_token,
    parse_header, token::matching_patterns,
};

const FLAG_BITS: [(u8, StatusFlag); 4] = [
    (0x01, StatusFlag::EndOfMessage),
    (0x02, StatusFlag::IgnoreEvent),
    (0x08, StatusFlag::ResetConnection),
    (0x10, StatusFlag::ResetConnectionSkipTran),
];

fn assigned_type() -> impl Strategy<Value = PacketType> {
    prop::sample::select(vec![
        PacketType::SqlBatch,
        PacketType::PreTds7Login,
        PacketType::Rpc,
        PacketType::TabularResult,
        PacketType::AttentionSignal,
        PacketType::BulkLoadData,
        PacketType::FedAuthToken,
        PacketType::TransactionManager,
        PacketType::Tds7Login,
        PacketType::Sspi,
        PacketType::PreLogin,
    ])
}

#[test]
fn status_decodes_exactly_the_set_bits() {
    for byte in 0..=u8::MAX {
        let status = decode_status(byte);
        let expected: Vec<StatusFlag> = FLAG_BITS
            .iter()
            .filter(|(mask, _)| byte & mask != 0)
            .map(|&(_, flag)| flag)
            .collect();

        if expected.is_empty() {
            assert_eq!(status.iter().collect::<Vec<_>>(), vec![StatusFlag::Normal], "0x{byte:02X}");
        } else {
            assert_eq!(status.iter().collect::<Vec<_>>(), expected, "0x{byte:02X}");
        }
        assert!(!status.is_empty());
    }
}

#[test]
fn length_patterns_mutually_exclusive() {
    for byte in 0..=u8::MAX {
        let matches = matching_patterns(byte);
        assert!(matches <= 1, "0x{byte:02X} matches {matches} patterns");
        assert_eq!(matches == 0, length_class_of(byte) == LengthClass::Variable);
    }
}

#[test]
fn known_tokens_are_exactly_the_registry() {
    let known = (0..=u8::MAX).filter(|&b| lookup_token(b).is_ok()).count();
    assert_eq!(known, TokenType::ALL.len());
    assert_eq!(known, 23);
}

#[test]
fn unknown_range_rejected() {
    for code in 0x13..=u8::MAX {
        assert!(classify(code).is_unknown());
        let bytes = [code, 0x01, 0x00, 0x08, 0x00, 0x00, 0x01, 0x00];
        assert!(parse_header(&bytes).is_err());
    }
}

proptest! {
    #[test]
    fn header_encode_then_parse(
        ty in assigned_type(),
        status in any::<u8>(),
        length in any::<u16>(),
        spid in any::<u16>(),
        packet_id in any::<u8>(),
    ) {
        let header = PacketHeader::new(ty, decode_status(status), length)
            .with_spid(spid)
            .with_packet_id(packet_id);
        let decoded = parse_header(&header.encode_to_bytes()).unwrap();
        prop_assert_eq!(decoded, header);
    }

    #[test]
    fn header_fields_are_big_endian(bytes in prop::array::uniform8(any::<u8>())) {
        match parse_header(&bytes) {
            Ok(header) => {
                prop_assert_eq!(header.packet_type, classify(bytes[0]));
                prop_assert_eq!(header.length, u16::from_be_bytes([bytes[2], bytes[3]]));
                prop_assert_eq!(header.spid, u16::from_be_bytes([bytes[4], bytes[5]]));
                prop_assert_eq!(header.packet_id, bytes[6]);
                prop_assert_eq!(header.window, bytes[7]);
            }
            Err(_) => prop_assert!(bytes[0] > 0x12),
        }
    }

    #[test]
    fn dispatch_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let dispatcher = Dispatcher::with_observer(DecoderConfig::default(), NoopObserver);
        if let Ok(Dispatched::BodyPending(packet)) = dispatcher.dispatch(&bytes) {
            prop_assert_eq!(packet.body.len(), bytes.len() - 8);
            prop_assert!(matches!(packet.header.packet_type, PacketKind::Known(_)));
        }
    }

    #[test]
    fn length_class_is_deterministic(byte in any::<u8>()) {
        prop_assert_eq!(length_class_of(byte), length_class_of(byte));
        if let Ok(token) = lookup_token(byte) {
            prop_assert_eq!(token.length_class(), length_class_of(byte));
        }
    }
}
