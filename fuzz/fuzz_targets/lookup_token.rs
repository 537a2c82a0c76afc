#![no_main]

use libfuzzer_sys::fuzz_target;
use tds_decode::{length_class_of, lookup_token};

fuzz_target!(|data: &[u8]| {
    // Walk the bytes as if each one led a token
    for &byte in data {
        let class = length_class_of(byte);
        if let Ok(token) = lookup_token(byte) {
            assert_eq!(token.length_class(), class);
        }
    }
});
