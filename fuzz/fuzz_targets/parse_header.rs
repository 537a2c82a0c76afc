#![no_main]

use libfuzzer_sys::fuzz_target;
use tds_decode::PacketHeader;

fuzz_target!(|data: &[u8]| {
    let mut cursor = data;
    if let Ok(header) = PacketHeader::decode(&mut cursor) {
        // Decoding consumes exactly the header
        assert_eq!(cursor.len(), data.len() - 8);
        assert!(!header.status.is_empty());
    }
});
