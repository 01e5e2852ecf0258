//! Oxibocu: BOCU-1 (Binary Ordered Compression for Unicode) in Rust.
//!
//! BOCU-1 is a compact, MIME-compatible Unicode encoding whose byte order
//! matches code point order. Output is byte-for-byte identical to ICU.
//!
//! The crate provides:
//! - The core codec with per-stream state (`bocu1`)
//! - String and `std::io` streaming APIs (`stream`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use oxibocu::stream::{decode_to_string, encode_str};
//!
//! let bytes = encode_str("Москва");
//! assert_eq!(bytes, [0xD3, 0xD0, 0x8E, 0x91, 0x8A, 0x82, 0x80]);
//! assert_eq!(decode_to_string(&bytes).unwrap(), "Москва");
//! ```
//!
//! Code point level, with explicit state:
//!
//! ```
//! use oxibocu::bocu1::{Encoder, decode};
//!
//! let mut enc = Encoder::new();
//! let mut bytes = Vec::new();
//! enc.encode_into(&[0x65E5, 0x672C], &mut bytes).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), [0x65E5, 0x672C]);
//! ```

pub mod bocu1;
pub mod io;
pub mod stream;

#[cfg(feature = "cli")]
pub mod cli;
