// BOCU-1 encoder: code points -> bytes.
//
// The only state is the anchor the next difference is measured from. An
// `Encoder` value covers exactly one output stream; callers that interleave
// streams keep one encoder per stream.

use thiserror::Error;

use super::anchor::next_anchor;
use super::diff::{Packed, pack};
use super::tables::{ASCII_ANCHOR, DIRECT_MAX, RESET_BYTE};

/// Largest Unicode code point.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Input value above U+10FFFF. `index` counts code points from the
    /// start of the stream.
    #[error("invalid code point {value:#X} at index {index}")]
    InvalidCodePoint { index: u64, value: u32 },
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Per-stream BOCU-1 encoder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    anchor: u32,
    index: u64,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub const fn new() -> Self {
        Self {
            anchor: ASCII_ANCHOR,
            index: 0,
        }
    }

    /// Current anchor.
    pub const fn anchor(&self) -> u32 {
        self.anchor
    }

    /// Number of code points offered so far, including rejected ones.
    pub const fn position(&self) -> u64 {
        self.index
    }

    /// Encode one code point.
    ///
    /// Controls and space below 0x21 are written as themselves; controls
    /// other than space also reset the anchor. Everything else is written
    /// as a difference from the anchor. On error the encoder is left as it
    /// was, so the caller may skip the value and continue.
    pub fn encode_code_point(&mut self, c: u32) -> Result<Packed, EncodeError> {
        if c > MAX_CODE_POINT {
            let index = self.index;
            self.index += 1;
            return Err(EncodeError::InvalidCodePoint { index, value: c });
        }
        Ok(self.encode_in_range(c))
    }

    /// Encode a `char`. Infallible: every scalar value is in range.
    pub fn encode_char(&mut self, c: char) -> Packed {
        self.encode_in_range(u32::from(c))
    }

    fn encode_in_range(&mut self, c: u32) -> Packed {
        self.index += 1;

        if c <= u32::from(DIRECT_MAX) {
            if c != u32::from(DIRECT_MAX) {
                self.anchor = ASCII_ANCHOR;
            }
            return Packed::single(c as u8);
        }

        let diff = c as i32 - self.anchor as i32;
        self.anchor = next_anchor(c);
        pack(diff)
    }

    /// Emit the reset byte and return to the initial anchor.
    ///
    /// Decoders treat 0xFF as a pure state reset, which gives an
    /// application a resynchronisation point that does not depend on a
    /// control character. Streams containing it no longer sort like their
    /// code points.
    pub fn emit_reset(&mut self) -> u8 {
        self.anchor = ASCII_ANCHOR;
        RESET_BYTE
    }

    /// Restart the stream: initial anchor, index back to zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Encode a run of code points, appending to `out`.
    ///
    /// Stops at the first invalid code point. Bytes for the code points
    /// before it stay in `out`.
    pub fn encode_into(
        &mut self,
        code_points: &[u32],
        out: &mut Vec<u8>,
    ) -> Result<(), EncodeError> {
        out.reserve(code_points.len());
        for &c in code_points {
            out.extend_from_slice(&self.encode_code_point(c)?);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Convenience functions
// ---------------------------------------------------------------------------

/// Encode a complete code point sequence with a fresh encoder.
pub fn encode(code_points: &[u32]) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::with_capacity(code_points.len());
    Encoder::new().encode_into(code_points, &mut out)?;
    Ok(out)
}

/// Append the encoding of `code_points` to `out` with a fresh encoder.
pub fn encode_into(code_points: &[u32], out: &mut Vec<u8>) -> Result<(), EncodeError> {
    Encoder::new().encode_into(code_points, out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
