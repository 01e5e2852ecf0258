// BOCU-1 core codec (Binary Ordered Compression for Unicode).
//
// Byte-for-byte compatible with the ICU reference encoder and decoder.
// Pure and synchronous: state lives in caller-owned `Encoder`/`Decoder`
// values, one per stream.
//
// # Modules
//
// - `tables`  — Wire-format constants and trail-byte mapping tables
// - `anchor`  — Script-block anchor selection for the next difference
// - `diff`    — Difference packing (1..4 bytes) and lead-byte classification
// - `encoder` — Stateful code point -> byte encoder
// - `decoder` — Stateful byte -> code point decoder

pub mod anchor;
pub mod decoder;
pub mod diff;
pub mod encoder;
pub mod tables;

// Re-export key types for convenience.
pub use anchor::next_anchor;
pub use decoder::{DecodeError, Decoded, Decoder, decode, decode_into};
pub use diff::{Packed, pack};
pub use encoder::{EncodeError, Encoder, MAX_CODE_POINT, encode, encode_into};
pub use tables::RESET_BYTE;
