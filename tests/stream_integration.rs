// Integration tests for the streaming layer.
//
// Tests the full pipeline: UTF-8 text -> Bocu1Writer -> BOCU-1 bytes ->
// Bocu1Reader -> UTF-8 text, including chunked input on both sides,
// error recovery, independent streams and per-script compression.

use std::io::{self, Read};

use oxibocu::bocu1::{self, DecodeError, Decoder, Encoder, RESET_BYTE};
use oxibocu::stream::{
    Bocu1Reader, Bocu1Writer, DecodeOptions, ErrorPolicy, StreamError, decode_to_string,
    decode_to_string_lossy, encode_str,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const CYRILLIC: &str = "Съешь же ещё этих мягких французских булок, да выпей чаю. ";
const CJK: &str = "天地玄黃 宇宙洪荒 日月盈昃 辰宿列張 寒來暑往 秋收冬藏 ";
const HANGUL: &str = "다람쥐 헌 쳇바퀴에 타고파 키스의 고유조건은 입술끼리 만나야 하고 ";
const HIRAGANA: &str = "いろはにほへと ちりぬるを わかよたれそ つねならむ ";
const LATIN: &str = "The quick brown fox jumps over the lazy dog. ";

/// Reader that hands out at most `step` bytes per call.
struct Trickle<'a> {
    data: &'a [u8],
    step: usize,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.step.min(self.data.len()).min(buf.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

/// Pseudo-random scalar values weighted toward script blocks.
fn generate_text(len: usize, seed: u64) -> String {
    const RANGES: [(u32, u32); 6] = [
        (0x20, 0x7F),
        (0x400, 0x460),
        (0x3041, 0x3097),
        (0x4E00, 0x9FA6),
        (0xAC00, 0xD7A4),
        (0x1F300, 0x1F650),
    ];
    let mut state = seed;
    let mut next = || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as u32
    };
    let mut s = String::with_capacity(len * 3);
    let mut range = RANGES[0];
    for i in 0..len {
        if i % 16 == 0 {
            range = RANGES[next() as usize % RANGES.len()];
        }
        let c = range.0 + next() % (range.1 - range.0);
        s.push(char::from_u32(c).unwrap());
        if next() % 40 == 0 {
            s.push('\n');
        }
    }
    s
}

fn roundtrip_via_streams(text: &str, write_chunk: usize, read_step: usize) {
    let mut encoded = Vec::new();
    let mut writer = Bocu1Writer::new(&mut encoded);
    for piece in text.as_bytes().chunks(write_chunk) {
        writer.write_utf8(piece).unwrap();
    }
    let (_, written) = writer.finish().unwrap();
    assert_eq!(written, encoded.len() as u64);

    let mut reader = Bocu1Reader::new(Trickle {
        data: &encoded,
        step: read_step,
    });
    let mut decoded = Vec::new();
    reader.decode_to(&mut decoded).unwrap();
    assert_eq!(
        String::from_utf8(decoded).unwrap(),
        text,
        "roundtrip mismatch (chunk={write_chunk}, step={read_step})"
    );
}

// ---------------------------------------------------------------------------
// Roundtrips
// ---------------------------------------------------------------------------

#[test]
fn generated_text_all_chunkings() {
    let text = generate_text(4096, 7);
    for (chunk, step) in [(1, 1), (2, 3), (3, 5), (7, 64), (4096, 1), (1 << 20, 1 << 20)] {
        roundtrip_via_streams(&text, chunk, step);
    }
}

#[test]
fn many_seeds() {
    for seed in 0..32 {
        let text = generate_text(512, seed);
        assert_eq!(
            decode_to_string(&encode_str(&text)).unwrap(),
            text,
            "seed {seed}"
        );
    }
}

#[test]
fn writer_and_core_encoder_agree() {
    let text = generate_text(2048, 99);
    let cps: Vec<u32> = text.chars().map(u32::from).collect();
    assert_eq!(encode_str(&text), bocu1::encode(&cps).unwrap());
}

// ---------------------------------------------------------------------------
// Independent streams
// ---------------------------------------------------------------------------

#[test]
fn interleaved_streams_keep_separate_state() {
    let a = generate_text(300, 1);
    let b = generate_text(300, 2);

    let mut enc_a = Encoder::new();
    let mut enc_b = Encoder::new();
    let mut out_a = Vec::new();
    let mut out_b = Vec::new();
    for (x, y) in a.chars().zip(b.chars()) {
        out_a.extend_from_slice(&enc_a.encode_char(x));
        out_b.extend_from_slice(&enc_b.encode_char(y));
    }
    let n = a.chars().count().min(b.chars().count());
    let a_prefix: String = a.chars().take(n).collect();
    let b_prefix: String = b.chars().take(n).collect();
    assert_eq!(out_a, encode_str(&a_prefix));
    assert_eq!(out_b, encode_str(&b_prefix));

    // Feed both decoders byte by byte while both streams have input.
    let mut dec_a = Decoder::new();
    let mut dec_b = Decoder::new();
    let mut cps_a = Vec::new();
    let mut cps_b = Vec::new();
    let shared = out_a.len().min(out_b.len());
    for i in 0..shared {
        dec_a.decode_into(&out_a[i..=i], &mut cps_a).unwrap();
        dec_b.decode_into(&out_b[i..=i], &mut cps_b).unwrap();
    }
    dec_a.decode_into(&out_a[shared..], &mut cps_a).unwrap();
    dec_b.decode_into(&out_b[shared..], &mut cps_b).unwrap();
    assert!(!dec_a.is_pending() && !dec_b.is_pending());
    assert_eq!(cps_a, a_prefix.chars().map(u32::from).collect::<Vec<_>>());
    assert_eq!(cps_b, b_prefix.chars().map(u32::from).collect::<Vec<_>>());
}

// ---------------------------------------------------------------------------
// Reset byte
// ---------------------------------------------------------------------------

#[test]
fn reset_separates_independently_encoded_segments() {
    let segments = [CYRILLIC, CJK, HANGUL, LATIN];
    let mut joined = Vec::new();
    let mut writer = Bocu1Writer::new(&mut joined);
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            writer.write_reset().unwrap();
        }
        writer.write_str(seg).unwrap();
    }
    writer.finish().unwrap();

    let mut expected = Vec::new();
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            expected.push(RESET_BYTE);
        }
        expected.extend_from_slice(&encode_str(seg));
    }
    assert_eq!(joined, expected);
    assert_eq!(decode_to_string(&joined).unwrap(), segments.concat());
}

// ---------------------------------------------------------------------------
// Errors and recovery
// ---------------------------------------------------------------------------

#[test]
fn strict_reader_reports_error_across_read_boundaries() {
    let mut bytes = encode_str("abc");
    let bad_offset = bytes.len() as u64 + 1;
    bytes.extend_from_slice(&[0xFB, 0x1A, 0x50]);
    bytes.extend_from_slice(&encode_str("xyz"));

    let mut reader = Bocu1Reader::new(Trickle {
        data: &bytes,
        step: 1,
    });
    let mut out = Vec::new();
    let err = reader.decode_to(&mut out).unwrap_err();
    assert!(matches!(
        err,
        StreamError::Decode(DecodeError::InvalidTrailByte { offset, byte: 0x1A }) if offset == bad_offset
    ));
}

#[test]
fn lossy_reader_resynchronises() {
    let mut bytes = encode_str("Москва");
    bytes.extend_from_slice(&[0xFB, 0x00]);
    bytes.extend_from_slice(&encode_str("\nМосква"));

    let mut reader = Bocu1Reader::with_options(
        &bytes[..],
        DecodeOptions {
            policy: ErrorPolicy::Replace,
        },
    );
    let mut out = Vec::new();
    reader.decode_to(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "Москва\u{FFFD}\nМосква");
    assert_eq!(reader.replacements(), 1);
    assert_eq!(reader.bytes_read(), bytes.len() as u64);
    assert_eq!(decode_to_string_lossy(&bytes), "Москва\u{FFFD}\nМосква");
}

#[test]
fn truncated_tail_in_every_position() {
    let bytes = encode_str("日本語");
    // Every proper prefix that stops inside a sequence is truncated.
    for cut in 1..bytes.len() {
        let prefix = &bytes[..cut];
        let mut decoder = Decoder::new();
        let mut out = Vec::new();
        decoder.decode_into(prefix, &mut out).unwrap();
        if decoder.is_pending() {
            assert!(matches!(
                bocu1::decode(prefix),
                Err(DecodeError::InvalidTruncatedSequence { .. })
            ));
            assert!(decode_to_string_lossy(prefix).ends_with('\u{FFFD}'));
        } else {
            assert!(bocu1::decode(prefix).is_ok());
        }
    }
}

#[test]
fn out_of_range_values_are_rejected() {
    // 4-byte positive difference from the initial anchor past U+10FFFF.
    let err = bocu1::decode(&[0xFE, 0xFF, 0xFF, 0xFF]).unwrap_err();
    assert_eq!(err.offset(), 3);
    assert!(matches!(err, DecodeError::InvalidCodePoint { .. }));

    assert!(matches!(
        bocu1::encode(&[0x41, 0x11_0000]),
        Err(bocu1::EncodeError::InvalidCodePoint {
            index: 1,
            value: 0x11_0000
        })
    ));
}

// ---------------------------------------------------------------------------
// Compression
// ---------------------------------------------------------------------------

#[test]
fn small_alphabet_scripts_shrink() {
    for (name, text, max_ratio) in [
        ("cyrillic", CYRILLIC, 0.65),
        ("cjk", CJK, 0.75),
        ("hangul", HANGUL, 0.75),
        ("hiragana", HIRAGANA, 0.45),
    ] {
        let text = text.repeat(4);
        let ratio = encode_str(&text).len() as f64 / text.len() as f64;
        assert!(ratio <= max_ratio, "{name}: ratio {ratio:.3} > {max_ratio}");
    }
}

#[test]
fn ascii_costs_one_byte_per_character() {
    let text = LATIN.repeat(4);
    assert_eq!(encode_str(&text).len(), text.len());
}
