// Streaming BOCU-1 writer.
//
// Bocu1Writer wraps any `Write` sink with one encoder state:
//   - Text can arrive as `&str`, `char`, raw code points, or UTF-8 bytes
//     split at arbitrary chunk boundaries
//   - An incomplete UTF-8 sequence at the end of a chunk is carried over
//   - Encoded bytes are staged per call and written with one `write_all`

use std::io::Write;

use crate::bocu1::Encoder;

use super::error::StreamError;

/// Longest UTF-8 sequence.
const MAX_UTF8_LEN: usize = 4;

// ---------------------------------------------------------------------------
// Bocu1Writer
// ---------------------------------------------------------------------------

/// Streaming BOCU-1 encoder over a byte sink.
///
/// # Example
/// ```
/// use oxibocu::stream::Bocu1Writer;
/// let mut out = Vec::new();
/// let mut w = Bocu1Writer::new(&mut out);
/// w.write_str("Москва").unwrap();
/// let (_, written) = w.finish().unwrap();
/// assert_eq!(written, 7);
/// ```
pub struct Bocu1Writer<W: Write> {
    inner: W,
    encoder: Encoder,
    /// Head of a UTF-8 sequence split across `write_utf8` calls.
    carry: [u8; MAX_UTF8_LEN],
    carry_len: usize,
    utf8_in: u64,
    bytes_out: u64,
    /// Reusable staging buffer for encoded bytes.
    staging: Vec<u8>,
}

impl<W: Write> Bocu1Writer<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            encoder: Encoder::new(),
            carry: [0; MAX_UTF8_LEN],
            carry_len: 0,
            utf8_in: 0,
            bytes_out: 0,
            staging: Vec::new(),
        }
    }

    /// Encode a string slice.
    pub fn write_str(&mut self, s: &str) -> Result<(), StreamError> {
        self.staging.clear();
        self.staging.reserve(s.len());
        for c in s.chars() {
            let packed = self.encoder.encode_char(c);
            self.staging.extend_from_slice(&packed);
        }
        self.flush_staging()
    }

    pub fn write_char(&mut self, c: char) -> Result<(), StreamError> {
        let packed = self.encoder.encode_char(c);
        self.inner.write_all(&packed)?;
        self.bytes_out += packed.len() as u64;
        Ok(())
    }

    /// Encode a raw code point. Surrogates are accepted; values above
    /// U+10FFFF are rejected without changing the stream state.
    pub fn write_code_point(&mut self, c: u32) -> Result<(), StreamError> {
        let packed = self.encoder.encode_code_point(c)?;
        self.inner.write_all(&packed)?;
        self.bytes_out += packed.len() as u64;
        Ok(())
    }

    /// Write the reset byte (0xFF). See [`Encoder::emit_reset`].
    pub fn write_reset(&mut self) -> Result<(), StreamError> {
        let byte = self.encoder.emit_reset();
        self.inner.write_all(&[byte])?;
        self.bytes_out += 1;
        Ok(())
    }

    /// Encode a chunk of UTF-8 text.
    ///
    /// Chunks may split multi-byte characters; the incomplete tail is kept
    /// until the next call. Invalid UTF-8 fails with the offset of the bad
    /// sequence counted over all chunks.
    pub fn write_utf8(&mut self, mut data: &[u8]) -> Result<(), StreamError> {
        if self.carry_len > 0 {
            let width = utf8_width(self.carry[0]);
            let take = (width - self.carry_len).min(data.len());
            self.carry[self.carry_len..self.carry_len + take].copy_from_slice(&data[..take]);
            self.carry_len += take;
            data = &data[take..];

            if self.carry_len < width {
                return Ok(());
            }

            let carry = self.carry;
            let len = std::mem::take(&mut self.carry_len);
            let s = std::str::from_utf8(&carry[..len]).map_err(|_| StreamError::InvalidUtf8 {
                offset: self.utf8_in,
            })?;
            self.write_str(s)?;
            self.utf8_in += len as u64;
        }

        let (valid, tail, bad) = match std::str::from_utf8(data) {
            Ok(s) => (s, &[][..], false),
            Err(e) => {
                let (head, rest) = data.split_at(e.valid_up_to());
                let head = std::str::from_utf8(head).map_err(|_| StreamError::InvalidUtf8 {
                    offset: self.utf8_in,
                })?;
                (head, rest, e.error_len().is_some())
            }
        };

        self.write_str(valid)?;
        self.utf8_in += valid.len() as u64;

        if bad {
            return Err(StreamError::InvalidUtf8 {
                offset: self.utf8_in,
            });
        }
        if !tail.is_empty() {
            log::trace!("bocu1 writer: carrying {} byte UTF-8 tail", tail.len());
            self.carry[..tail.len()].copy_from_slice(tail);
            self.carry_len = tail.len();
        }
        Ok(())
    }

    fn flush_staging(&mut self) -> Result<(), StreamError> {
        if !self.staging.is_empty() {
            self.inner.write_all(&self.staging)?;
            self.bytes_out += self.staging.len() as u64;
        }
        Ok(())
    }

    /// Code points encoded so far.
    pub fn code_points(&self) -> u64 {
        self.encoder.position()
    }

    /// UTF-8 bytes consumed through [`write_utf8`](Self::write_utf8).
    pub fn utf8_consumed(&self) -> u64 {
        self.utf8_in
    }

    /// BOCU-1 bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_out
    }

    /// Flush and finalize the stream.
    ///
    /// Returns the underlying writer and the number of bytes written. Fails
    /// if `write_utf8` left an incomplete character behind.
    pub fn finish(mut self) -> Result<(W, u64), StreamError> {
        if self.carry_len > 0 {
            return Err(StreamError::InvalidUtf8 {
                offset: self.utf8_in,
            });
        }
        self.inner.flush()?;
        log::debug!(
            "bocu1 writer: {} code points -> {} bytes",
            self.encoder.position(),
            self.bytes_out
        );
        Ok((self.inner, self.bytes_out))
    }
}

/// Sequence length announced by a UTF-8 lead byte.
fn utf8_width(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

// ---------------------------------------------------------------------------
// Convenience function
// ---------------------------------------------------------------------------

/// Encode a string with a fresh encoder.
pub fn encode_str(s: &str) -> Vec<u8> {
    let mut encoder = Encoder::new();
    let mut out = Vec::with_capacity(s.len());
    for c in s.chars() {
        out.extend_from_slice(&encoder.encode_char(c));
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
