// BOCU-1 decoder: bytes -> code points.
//
// A two-state machine. In the lead state a byte is a direct control/space,
// the reset marker, a complete single-byte difference, or the start of a
// multi-byte difference. In the trail state bytes are accumulated into the
// pending difference until the last one yields a code point.
//
// Every error puts the decoder back into its initial state, so a caller may
// resume with the next byte instead of abandoning the stream.

use thiserror::Error;

use super::anchor::next_anchor;
use super::diff::{Lead, classify_lead, trail_digit, trail_weight};
use super::encoder::MAX_CODE_POINT;
use super::tables::{ASCII_ANCHOR, DIRECT_MAX, RESET_BYTE};

// ---------------------------------------------------------------------------
// Decoder error
// ---------------------------------------------------------------------------

/// Malformed BOCU-1 input. Offsets count bytes from the start of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A difference took the value outside `0..=0x10FFFF`. `offset` is the
    /// final byte of the offending sequence.
    #[error("decoded value {value} at offset {offset} is not a code point")]
    InvalidCodePoint { offset: u64, value: i32 },

    /// A reserved control byte appeared where a trail byte was expected.
    #[error("invalid trail byte {byte:#04X} at offset {offset}")]
    InvalidTrailByte { offset: u64, byte: u8 },

    /// Input ended inside a multi-byte sequence. `offset` is its lead byte.
    #[error("truncated {len}-byte sequence at offset {offset}")]
    InvalidTruncatedSequence { offset: u64, len: u8 },
}

impl DecodeError {
    /// Stream offset the error refers to.
    pub const fn offset(&self) -> u64 {
        match *self {
            Self::InvalidCodePoint { offset, .. }
            | Self::InvalidTrailByte { offset, .. }
            | Self::InvalidTruncatedSequence { offset, .. } => offset,
        }
    }
}

// ---------------------------------------------------------------------------
// Step result
// ---------------------------------------------------------------------------

/// Outcome of feeding one byte to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// A complete code point.
    CodePoint(u32),
    /// Byte consumed inside a multi-byte sequence; nothing to emit yet.
    Pending,
    /// The reset marker: anchor reset, nothing emitted.
    Reset,
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Lead,
    Trail {
        /// Trail bytes still expected, 1..=3.
        remaining: u8,
        /// Difference accumulated so far.
        diff: i32,
        /// Offset of the lead byte.
        start: u64,
        /// Total sequence length.
        len: u8,
    },
}

/// Per-stream BOCU-1 decoder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoder {
    anchor: u32,
    state: State,
    offset: u64,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub const fn new() -> Self {
        Self {
            anchor: ASCII_ANCHOR,
            state: State::Lead,
            offset: 0,
        }
    }

    /// Current anchor.
    pub const fn anchor(&self) -> u32 {
        self.anchor
    }

    /// Number of bytes consumed so far.
    pub const fn position(&self) -> u64 {
        self.offset
    }

    /// Whether the decoder is inside a multi-byte sequence.
    pub const fn is_pending(&self) -> bool {
        matches!(self.state, State::Trail { .. })
    }

    /// Restart the stream.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Feed one byte.
    pub fn decode_byte(&mut self, byte: u8) -> Result<Decoded, DecodeError> {
        let offset = self.offset;
        self.offset += 1;

        match self.state {
            State::Lead => Ok(self.lead_byte(byte, offset)),
            State::Trail {
                remaining,
                diff,
                start,
                len,
            } => self.trail_byte(byte, offset, remaining, diff, start, len),
        }
    }

    fn lead_byte(&mut self, byte: u8, offset: u64) -> Decoded {
        if byte <= DIRECT_MAX {
            if byte != DIRECT_MAX {
                self.anchor = ASCII_ANCHOR;
            }
            return Decoded::CodePoint(u32::from(byte));
        }
        if byte == RESET_BYTE {
            self.anchor = ASCII_ANCHOR;
            return Decoded::Reset;
        }

        match classify_lead(byte) {
            Lead::Single(diff) => {
                // anchor is in 0x40..=0x10FFC0, so this stays in range.
                let c = self.anchor.wrapping_add_signed(diff);
                self.anchor = next_anchor(c);
                Decoded::CodePoint(c)
            }
            Lead::Multi { partial, trails } => {
                self.state = State::Trail {
                    remaining: trails,
                    diff: partial,
                    start: offset,
                    len: trails + 1,
                };
                Decoded::Pending
            }
        }
    }

    fn trail_byte(
        &mut self,
        byte: u8,
        offset: u64,
        remaining: u8,
        diff: i32,
        start: u64,
        len: u8,
    ) -> Result<Decoded, DecodeError> {
        let Some(digit) = trail_digit(byte) else {
            self.fail();
            return Err(DecodeError::InvalidTrailByte { offset, byte });
        };

        if remaining > 1 {
            self.state = State::Trail {
                remaining: remaining - 1,
                diff: diff + digit * trail_weight(remaining),
                start,
                len,
            };
            return Ok(Decoded::Pending);
        }

        let value = self.anchor as i32 + diff + digit;
        if !(0..=MAX_CODE_POINT as i32).contains(&value) {
            self.fail();
            return Err(DecodeError::InvalidCodePoint { offset, value });
        }

        let c = value as u32;
        self.anchor = next_anchor(c);
        self.state = State::Lead;
        Ok(Decoded::CodePoint(c))
    }

    fn fail(&mut self) {
        self.anchor = ASCII_ANCHOR;
        self.state = State::Lead;
    }

    /// Signal end of input. Fails if a multi-byte sequence is unfinished;
    /// either way the decoder is back in its initial anchor/lead state.
    pub fn finish(&mut self) -> Result<(), DecodeError> {
        match self.state {
            State::Lead => Ok(()),
            State::Trail { start, len, .. } => {
                self.fail();
                Err(DecodeError::InvalidTruncatedSequence { offset: start, len })
            }
        }
    }

    /// Decode a run of bytes, appending code points to `out`.
    ///
    /// Does not call [`finish`](Self::finish): the run may end inside a
    /// sequence that the next call completes.
    pub fn decode_into(&mut self, bytes: &[u8], out: &mut Vec<u32>) -> Result<(), DecodeError> {
        for &b in bytes {
            if let Decoded::CodePoint(c) = self.decode_byte(b)? {
                out.push(c);
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Convenience functions
// ---------------------------------------------------------------------------

/// Decode a complete BOCU-1 byte sequence with a fresh decoder.
pub fn decode(bytes: &[u8]) -> Result<Vec<u32>, DecodeError> {
    let mut out = Vec::with_capacity(bytes.len());
    decode_into(bytes, &mut out)?;
    Ok(out)
}

/// Decode a complete byte sequence, appending to `out`. On error the code
/// points decoded before the failure stay in `out`.
pub fn decode_into(bytes: &[u8], out: &mut Vec<u32>) -> Result<(), DecodeError> {
    let mut decoder = Decoder::new();
    decoder.decode_into(bytes, out)?;
    decoder.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
