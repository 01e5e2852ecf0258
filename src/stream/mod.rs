// Streaming and string-level BOCU-1 API.
//
// Builds on the core `bocu1` codec for text that lives in Rust strings or
// flows through `std::io`:
//
// - `encoder` — Bocu1Writer: chunked UTF-8 / char input, byte output
// - `decoder` — Bocu1Reader: byte input, code point or UTF-8 output
// - `error`   — StreamError shared by both directions

pub mod decoder;
pub mod encoder;
pub mod error;

pub use decoder::{
    Bocu1Reader, DecodeOptions, ErrorPolicy, decode_to_string, decode_to_string_lossy,
};
pub use encoder::{Bocu1Writer, encode_str};
pub use error::StreamError;
