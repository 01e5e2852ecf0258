#![no_main]
use libfuzzer_sys::fuzz_target;
use oxibocu::bocu1;

fuzz_target!(|data: &[u8]| {
    // Interpret the input as little-endian u32 words, folded into the
    // code point range.
    let cps: Vec<u32> = data
        .chunks_exact(4)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]) % (bocu1::MAX_CODE_POINT + 1))
        .collect();

    let encoded = bocu1::encode(&cps).unwrap();
    let decoded = bocu1::decode(&encoded).unwrap();
    assert_eq!(decoded, cps);

    // Order preservation against the sequence split in half.
    let (a, b) = cps.split_at(cps.len() / 2);
    let ea = bocu1::encode(a).unwrap();
    let eb = bocu1::encode(b).unwrap();
    assert_eq!(a.cmp(b), ea.cmp(&eb));
});
