#![no_main]

use libfuzzer_sys::fuzz_target;

use entity_protocol::EntityMessage;

fuzz_target!(|data: &[u8]| {
    // Fuzz datagram decoding - test for panics, out-of-bounds reads, and
    // decode/encode disagreement
    if let Ok(msg) = EntityMessage::decode(data) {
        let reencoded = msg.encode().expect("decoded message must re-encode");
        assert_eq!(&reencoded[..], data);
    }
});
