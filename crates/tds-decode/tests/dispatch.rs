//! End-to-end decoding of captured TDS frames.
//!
//! Run with:
//! ```bash
//! cargo test -p tds-decode --test dispatch
//! ```

#![allow(clippy::unwrap_used, clippy::panic)]

use tds_decode::{
    DecodeError, DecoderConfig, DispatchState, Dispatched, Dispatcher, LengthClass, PacketKind,
    PacketType, StatusFlag, TokenType, dispatch, parse_header,
};

/// Build a frame whose declared length matches its size.
fn frame(packet_type: u8, status: u8, body: &[u8]) -> Vec<u8> {
    let length = (8 + body.len()) as u16;
    let mut bytes = vec![packet_type, status];
    bytes.extend_from_slice(&length.to_be_bytes());
    bytes.extend_from_slice(&[0x00, 0x37, 0x01, 0x00]);
    bytes.extend_from_slice(body);
    bytes
}

// =============================================================================
// Header-only packets
// =============================================================================

#[test]
fn test_attention_signal_skipped() {
    let bytes = [0x06, 0x00, 0x00, 0x08, 0x00, 0x00, 0x01, 0x00];

    let result = dispatch(&bytes).unwrap();
    assert_eq!(result.state(), DispatchState::NoBody);

    let Dispatched::Skipped(header) = result else {
        panic!("ATTENTION must not reach body parsing");
    };
    assert_eq!(header.packet_type, PacketKind::Known(PacketType::AttentionSignal));
    assert_eq!(header.status.iter().collect::<Vec<_>>(), vec![StatusFlag::Normal]);
    assert_eq!(header.length, 8);
    assert_eq!(header.packet_id, 1);
}

#[test]
fn test_attention_ack_with_ignore_flag() {
    // EOM + IGNORE_THIS
    let bytes = frame(0x06, 0x03, &[]);
    let result = dispatch(&bytes).unwrap();
    assert!(result.header().status.contains(StatusFlag::IgnoreEvent));
    assert!(result.header().status.is_end_of_message());
    assert_eq!(result.state(), DispatchState::NoBody);
}

// =============================================================================
// Body-carrying packets
// =============================================================================

#[test]
fn test_login_round_trip() {
    // TDS7_LOGIN, EOM, length 500, spid 12, packet 1, window 0
    let mut bytes = vec![0x10, 0x01];
    bytes.extend_from_slice(&500u16.to_be_bytes());
    bytes.extend_from_slice(&12u16.to_be_bytes());
    bytes.extend_from_slice(&[0x01, 0x00]);

    let header = parse_header(&bytes).unwrap();
    assert!(header.packet_type.has_body());
    assert_eq!(header.status.iter().collect::<Vec<_>>(), vec![StatusFlag::EndOfMessage]);
    assert_eq!(header.length, 500);
    assert_eq!(header.spid, 12);
    assert_eq!(header.packet_id, 1);
    assert_eq!(header.window, 0);
}

#[test]
fn test_tabular_result_body_handed_over() {
    // DONE token with status, curcmd and a 8-byte row count
    let body = [
        0xFD, 0x10, 0x00, 0xC1, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    let bytes = frame(0x04, 0x01, &body);

    let Dispatched::BodyPending(packet) = dispatch(&bytes).unwrap() else {
        panic!("tabular results carry a body");
    };
    assert_eq!(packet.body, &body);
    assert_eq!(packet.header.payload_length(), body.len());

    let token = packet.leading_token().unwrap().unwrap();
    assert_eq!(token, TokenType::Done);
    assert_eq!(token.length_class(), LengthClass::Fixed(4));
}

#[test]
fn test_every_body_type_reaches_body_pending() {
    for code in [0x01, 0x02, 0x03, 0x04, 0x07, 0x08, 0x0E, 0x10, 0x11, 0x12] {
        let bytes = frame(code, 0x01, &[0x00]);
        let result = dispatch(&bytes).unwrap();
        assert_eq!(result.state(), DispatchState::BodyPending, "type 0x{code:02X}");
    }
}

#[test]
fn test_multi_packet_message_is_stateless() {
    // First packet of a batch (NORMAL), then the final one (EOM)
    let first = frame(0x01, 0x00, b"SELE");
    let last = frame(0x01, 0x01, b"CT 1");

    let first = dispatch(&first).unwrap();
    let last = dispatch(&last).unwrap();
    assert!(first.header().status.is_normal());
    assert!(last.header().is_end_of_message());
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_short_capture_is_recoverable() {
    let err = dispatch(&[0x04, 0x01, 0x00, 0x08, 0x00, 0x00, 0x01]).unwrap_err();
    assert_eq!(
        err,
        DecodeError::IncompleteHeader {
            expected: 8,
            actual: 7
        }
    );
    assert!(err.is_recoverable());
}

#[test]
fn test_unknown_type_rejected() {
    let err = dispatch(&[0x99, 0x00, 0x00, 0x08, 0x00, 0x00, 0x01, 0x00]).unwrap_err();
    assert_eq!(err, DecodeError::UnknownPacketType(0x99));
    assert!(!err.is_recoverable());
}

#[test]
fn test_segmented_capture_strict() {
    // Header declares a 4096-byte packet but only one TCP segment was captured
    let mut bytes = frame(0x04, 0x00, &[0xD1; 1452]);
    bytes[2..4].copy_from_slice(&4096u16.to_be_bytes());

    let lenient = dispatch(&bytes).unwrap();
    assert_eq!(lenient.state(), DispatchState::BodyPending);

    let strict = Dispatcher::new(DecoderConfig::strict());
    assert_eq!(
        strict.dispatch(&bytes).unwrap_err(),
        DecodeError::LengthMismatch {
            declared: 4096,
            actual: 1460
        }
    );
}

// =============================================================================
// Observation
// =============================================================================

#[test]
fn test_tracing_observer_emits_without_panicking() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();

    let dispatcher = Dispatcher::new(DecoderConfig::default());
    let mut oversized = frame(0x04, 0x01, &[0xFD]);
    oversized.push(0x00);

    assert!(dispatcher.dispatch(&frame(0x06, 0x00, &[])).is_ok());
    assert!(dispatcher.dispatch(&oversized).is_ok());
    assert!(dispatcher.dispatch(&[0xFF; 8]).is_err());
}
