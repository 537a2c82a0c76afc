#![no_main]

use libfuzzer_sys::fuzz_target;
use tds_decode::{DecoderConfig, Dispatched, Dispatcher, NoopObserver};

fuzz_target!(|data: &[u8]| {
    let dispatcher = Dispatcher::with_observer(DecoderConfig::default(), NoopObserver);
    if let Ok(Dispatched::BodyPending(packet)) = dispatcher.dispatch(data) {
        let _ = packet.leading_token();
    }
});
