#![no_main]
use libfuzzer_sys::fuzz_target;
use oxibocu::stream::{Bocu1Reader, Bocu1Writer, encode_str};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the chunk size; the rest is candidate UTF-8.
    let chunk = 1 + data[0] as usize % 16;
    let payload = &data[1..];

    let mut encoded = Vec::new();
    let mut writer = Bocu1Writer::new(&mut encoded);
    let mut ok = true;
    for piece in payload.chunks(chunk) {
        if writer.write_utf8(piece).is_err() {
            ok = false;
            break;
        }
    }
    let finished = ok && writer.finish().is_ok();

    match std::str::from_utf8(payload) {
        Ok(text) => {
            assert!(finished, "valid UTF-8 rejected");
            assert_eq!(encoded, encode_str(text));

            let mut decoded = Vec::new();
            Bocu1Reader::new(&encoded[..])
                .decode_to(&mut decoded)
                .unwrap();
            assert_eq!(decoded, payload);
        }
        Err(_) => assert!(!finished, "invalid UTF-8 accepted"),
    }
});
