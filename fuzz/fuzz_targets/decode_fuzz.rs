#![no_main]
use libfuzzer_sys::fuzz_target;
use oxibocu::bocu1::{self, Decoded, Decoder, MAX_CODE_POINT};
use oxibocu::stream::decode_to_string_lossy;

fuzz_target!(|data: &[u8]| {
    // Fuzz the decoder with arbitrary bytes.
    // The decoder must never panic, only return errors.
    let _ = bocu1::decode(data);

    // Byte-at-a-time with resync after errors: values stay in range.
    let mut decoder = Decoder::new();
    for &b in data {
        if let Ok(Decoded::CodePoint(c)) = decoder.decode_byte(b) {
            assert!(c <= MAX_CODE_POINT);
        }
    }
    let _ = decoder.finish();

    let lossy = decode_to_string_lossy(data);
    assert!(lossy.chars().count() <= data.len());
});
