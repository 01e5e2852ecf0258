use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use oxibocu::bocu1::{self, Decoder};
use oxibocu::stream::{Bocu1Reader, Bocu1Writer, decode_to_string, encode_str};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;

/// Scripts benchmarked, as (name, code point ranges, chance of a space).
const SCRIPTS: [(&str, &[(u32, u32)], u32); 5] = [
    ("latin", &[(0x61, 0x7B), (0x41, 0x5B)], 6),
    ("cyrillic", &[(0x430, 0x450), (0x410, 0x430)], 7),
    ("cjk", &[(0x4E00, 0x9FA6)], 0),
    ("hangul", &[(0xAC00, 0xD7A4)], 4),
    (
        "mixed",
        &[(0x61, 0x7B), (0x430, 0x450), (0x3041, 0x3097), (0x4E00, 0x9FA6), (0xAC00, 0xD7A4)],
        8,
    ),
];

/// Text of roughly `bytes` UTF-8 bytes drawn from `ranges`. Mixed text
/// switches range every word, like interleaved scripts in real documents.
fn gen_text(ranges: &[(u32, u32)], space_every: u32, bytes: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut s = String::with_capacity(bytes + 8);
    let mut range = ranges[0];
    while s.len() < bytes {
        if space_every > 0 && rng.random_range(0..space_every) == 0 {
            s.push(' ');
            range = ranges[rng.random_range(0..ranges.len())];
            continue;
        }
        let c = rng.random_range(range.0..range.1);
        if let Some(ch) = char::from_u32(c) {
            s.push(ch);
        }
    }
    s
}

fn write_ratio_snapshot() {
    let mut csv = String::from("script,utf8_bytes,bocu1_bytes,ratio\n");
    for (name, ranges, space) in SCRIPTS {
        let text = gen_text(ranges, space, 1024 * 1024, 123);
        let encoded = encode_str(&text);
        let ratio = encoded.len() as f64 / text.len() as f64;
        csv.push_str(&format!(
            "{name},{},{},{ratio}\n",
            text.len(),
            encoded.len()
        ));
    }
    let out_dir = Path::new("target/criterion/custom_reports");
    let _ = fs::create_dir_all(out_dir);
    let _ = fs::write(out_dir.join("ratio_snapshot.csv"), csv);
}

fn bench_encoding_speed(c: &mut Criterion) {
    let mut g = c.benchmark_group("encoding_speed_by_script");
    for (name, ranges, space) in SCRIPTS {
        let text = gen_text(ranges, space, 1024 * 1024, 1);
        g.throughput(Throughput::Bytes(text.len() as u64));
        g.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, text| {
            b.iter(|| black_box(encode_str(black_box(text))));
        });
    }
    g.finish();
}

fn bench_decoding_speed(c: &mut Criterion) {
    let mut g = c.benchmark_group("decoding_speed_by_script");
    for (name, ranges, space) in SCRIPTS {
        let encoded = encode_str(&gen_text(ranges, space, 1024 * 1024, 2));
        g.throughput(Throughput::Bytes(encoded.len() as u64));
        g.bench_with_input(BenchmarkId::new("string", name), &encoded, |b, encoded| {
            b.iter(|| black_box(decode_to_string(black_box(encoded)).unwrap()));
        });
        g.bench_with_input(BenchmarkId::new("code_points", name), &encoded, |b, encoded| {
            b.iter(|| {
                let mut out = Vec::with_capacity(encoded.len());
                Decoder::new().decode_into(black_box(encoded), &mut out).unwrap();
                black_box(out);
            });
        });
    }
    g.finish();
}

fn bench_streaming(c: &mut Criterion) {
    let mut g = c.benchmark_group("streaming_roundtrip_vs_size");
    let (_, ranges, space) = SCRIPTS[4];
    for size in [64 * 1024usize, 1024 * 1024, 8 * 1024 * 1024] {
        let text = gen_text(ranges, space, size, 3);
        g.throughput(Throughput::Bytes(text.len() as u64));
        g.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| {
                let mut encoded = Vec::with_capacity(text.len());
                let mut writer = Bocu1Writer::new(&mut encoded);
                for chunk in text.as_bytes().chunks(64 * 1024) {
                    writer.write_utf8(chunk).unwrap();
                }
                writer.finish().unwrap();

                let mut decoded = Vec::with_capacity(text.len());
                Bocu1Reader::new(&encoded[..])
                    .decode_to(&mut decoded)
                    .unwrap();
                black_box(decoded);
            });
        });
    }
    g.finish();
}

fn bench_ratio_vs_script(c: &mut Criterion) {
    write_ratio_snapshot();
    let mut g = c.benchmark_group("compression_ratio_vs_script");
    for (name, ranges, space) in SCRIPTS {
        let text = gen_text(ranges, space, 256 * 1024, 4);
        let cps: Vec<u32> = text.chars().map(u32::from).collect();
        g.bench_with_input(BenchmarkId::from_parameter(name), &cps, |b, cps| {
            b.iter(|| {
                let encoded = bocu1::encode(black_box(cps)).unwrap();
                let ratio = encoded.len() as f64 / text.len() as f64;
                black_box(ratio);
            });
        });
    }
    g.finish();
}

criterion_group!(
    benches,
    bench_encoding_speed,
    bench_decoding_speed,
    bench_streaming,
    bench_ratio_vs_script
);
criterion_main!(benches);
