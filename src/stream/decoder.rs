// Streaming BOCU-1 reader.
//
// Bocu1Reader wraps any `Read` source with one decoder state:
//   - Pulls input in fixed-size chunks, yields one code point at a time
//   - Iterator over `Result<u32, StreamError>` for composing with adapters
//   - `decode_to` writes UTF-8 to any `impl Write` destination
//   - Optional replacement of malformed sequences with U+FFFD

use std::char::REPLACEMENT_CHARACTER;
use std::io::{self, Read, Write};

use crate::bocu1::{DecodeError, Decoded, Decoder};

use super::error::StreamError;

/// Input chunk and output staging size.
const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// What to do with malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first error.
    #[default]
    Strict,
    /// Emit U+FFFD for each malformed sequence and continue from the next
    /// byte with a fresh anchor. Surrogates written as UTF-8 are also
    /// replaced.
    Replace,
}

#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    pub policy: ErrorPolicy,
}

impl DecodeOptions {
    pub fn lossy() -> Self {
        Self {
            policy: ErrorPolicy::Replace,
        }
    }
}

// ---------------------------------------------------------------------------
// Bocu1Reader
// ---------------------------------------------------------------------------

/// Streaming BOCU-1 decoder over a byte source.
///
/// After a strict-mode error the reader is still usable: the decoder has
/// already reset, and the next call resumes with the following byte.
pub struct Bocu1Reader<R: Read> {
    inner: R,
    decoder: Decoder,
    opts: DecodeOptions,
    buf: Box<[u8]>,
    pos: usize,
    filled: usize,
    eof: bool,
    code_points: u64,
    replaced: u64,
}

impl<R: Read> Bocu1Reader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_options(inner, DecodeOptions::default())
    }

    pub fn with_options(inner: R, opts: DecodeOptions) -> Self {
        Self {
            inner,
            decoder: Decoder::new(),
            opts,
            buf: vec![0u8; BUF_SIZE].into_boxed_slice(),
            pos: 0,
            filled: 0,
            eof: false,
            code_points: 0,
            replaced: 0,
        }
    }

    /// Decode the next code point. `Ok(None)` at a clean end of input.
    pub fn next_code_point(&mut self) -> Result<Option<u32>, StreamError> {
        loop {
            if self.pos == self.filled {
                if self.eof {
                    return Ok(None);
                }
                let n = self.fill()?;
                if n == 0 {
                    self.eof = true;
                    return match self.decoder.finish() {
                        Ok(()) => Ok(None),
                        Err(e) => self.recover(e).map(Some),
                    };
                }
            }

            let byte = self.buf[self.pos];
            self.pos += 1;
            match self.decoder.decode_byte(byte) {
                Ok(Decoded::CodePoint(c)) => {
                    self.code_points += 1;
                    return Ok(Some(c));
                }
                Ok(Decoded::Pending | Decoded::Reset) => {}
                Err(e) => return self.recover(e).map(Some),
            }
        }
    }

    fn fill(&mut self) -> Result<usize, StreamError> {
        loop {
            match self.inner.read(&mut self.buf) {
                Ok(n) => {
                    self.pos = 0;
                    self.filled = n;
                    log::trace!("bocu1 reader: read {n} bytes");
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn recover(&mut self, err: DecodeError) -> Result<u32, StreamError> {
        match self.opts.policy {
            ErrorPolicy::Strict => Err(err.into()),
            ErrorPolicy::Replace => {
                log::warn!("replacing malformed input: {err}");
                self.replaced += 1;
                self.code_points += 1;
                Ok(u32::from(REPLACEMENT_CHARACTER))
            }
        }
    }

    /// Next code point as a `char`. Surrogates fail in strict mode and are
    /// replaced otherwise.
    pub fn next_char(&mut self) -> Result<Option<char>, StreamError> {
        let Some(c) = self.next_code_point()? else {
            return Ok(None);
        };
        match char::from_u32(c) {
            Some(ch) => Ok(Some(ch)),
            None => match self.opts.policy {
                ErrorPolicy::Strict => Err(StreamError::Surrogate {
                    offset: self.decoder.position().saturating_sub(1),
                    value: c,
                }),
                ErrorPolicy::Replace => {
                    log::warn!("replacing surrogate U+{c:04X}");
                    self.replaced += 1;
                    Ok(Some(REPLACEMENT_CHARACTER))
                }
            },
        }
    }

    /// Decode everything, writing UTF-8 to `writer`.
    ///
    /// Returns the number of UTF-8 bytes written.
    pub fn decode_to<W: Write>(&mut self, writer: &mut W) -> Result<u64, StreamError> {
        let mut out = Vec::with_capacity(BUF_SIZE);
        let mut written = 0u64;
        let mut utf8 = [0u8; 4];

        while let Some(ch) = self.next_char()? {
            out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
            if out.len() >= BUF_SIZE - 4 {
                writer.write_all(&out)?;
                written += out.len() as u64;
                out.clear();
            }
        }
        if !out.is_empty() {
            writer.write_all(&out)?;
            written += out.len() as u64;
        }

        log::debug!(
            "bocu1 reader: {} bytes -> {} code points ({} replaced)",
            self.decoder.position(),
            self.code_points,
            self.replaced
        );
        Ok(written)
    }

    /// BOCU-1 bytes consumed so far.
    pub fn bytes_read(&self) -> u64 {
        self.decoder.position()
    }

    /// Code points produced so far, replacements included.
    pub fn code_points(&self) -> u64 {
        self.code_points
    }

    /// Number of U+FFFD substitutions made.
    pub fn replacements(&self) -> u64 {
        self.replaced
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Iterator for Bocu1Reader<R> {
    type Item = Result<u32, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_code_point().transpose()
    }
}

// ---------------------------------------------------------------------------
// Convenience functions
// ---------------------------------------------------------------------------

/// Decode a complete BOCU-1 byte sequence into a `String`.
///
/// Fails on malformed input and on surrogate code points.
pub fn decode_to_string(bytes: &[u8]) -> Result<String, StreamError> {
    let mut decoder = Decoder::new();
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if let Decoded::CodePoint(c) = decoder.decode_byte(b)? {
            let ch = char::from_u32(c).ok_or(StreamError::Surrogate {
                offset: decoder.position() - 1,
                value: c,
            })?;
            out.push(ch);
        }
    }
    decoder.finish()?;
    Ok(out)
}

/// Decode a complete BOCU-1 byte sequence, replacing each malformed
/// sequence and each surrogate with U+FFFD.
pub fn decode_to_string_lossy(bytes: &[u8]) -> String {
    let mut decoder = Decoder::new();
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match decoder.decode_byte(b) {
            Ok(Decoded::CodePoint(c)) => {
                out.push(char::from_u32(c).unwrap_or(REPLACEMENT_CHARACTER));
            }
            Ok(Decoded::Pending | Decoded::Reset) => {}
            Err(_) => out.push(REPLACEMENT_CHARACTER),
        }
    }
    if decoder.finish().is_err() {
        out.push(REPLACEMENT_CHARACTER);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
