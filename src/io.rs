// File-level I/O helpers for BOCU-1 encoding/decoding.
//
// Provides `encode_file()` and `decode_file()` convenience functions that
// wrap the streaming writer/reader with buffered I/O, plus `encode_stream()`
// and `decode_stream()` for arbitrary readers and writers (stdin/stdout).
// Optionally computes a streaming SHA-256 of the output (feature-gated
// behind `file-io`).

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::stream::{Bocu1Reader, Bocu1Writer, DecodeOptions, StreamError};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `encode_file()` / `encode_stream()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeStats {
    /// UTF-8 input size in bytes.
    pub input_size: u64,
    /// BOCU-1 output size in bytes.
    pub output_size: u64,
    /// Number of code points encoded.
    pub code_points: u64,
    /// SHA-256 of the output (if `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

/// Statistics returned by `decode_file()` / `decode_stream()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeStats {
    /// BOCU-1 input size in bytes.
    pub input_size: u64,
    /// UTF-8 output size in bytes.
    pub output_size: u64,
    /// Number of code points decoded, replacements included.
    pub code_points: u64,
    /// Number of malformed sequences replaced with U+FFFD.
    pub replacements: u64,
    /// SHA-256 of the output (if `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

impl EncodeStats {
    /// Output size relative to the UTF-8 input (1.0 when the input is empty).
    pub fn ratio(&self) -> f64 {
        if self.input_size == 0 {
            1.0
        } else {
            self.output_size as f64 / self.input_size as f64
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file I/O operations.
#[derive(Debug, Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Encoding or decoding error.
    #[error("{0}")]
    Stream(StreamError),
}

impl From<StreamError> for IoError {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Io(e) => Self::Io(e),
            other => Self::Stream(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Default buffer size
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

/// Encode UTF-8 text from `reader` into BOCU-1 on `writer`.
///
/// Input is consumed in 64 KiB chunks; characters split across chunk
/// boundaries are handled by the writer.
pub fn encode_stream<R: Read, W: Write>(
    mut reader: R,
    writer: W,
) -> Result<EncodeStats, IoError> {
    let mut sink = OutputSink::new(writer);
    let mut encoder = Bocu1Writer::new(&mut sink);

    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        encoder.write_utf8(&buf[..n])?;
    }

    let input_size = encoder.utf8_consumed();
    let code_points = encoder.code_points();
    let (_, output_size) = encoder.finish()?;

    Ok(EncodeStats {
        input_size,
        output_size,
        code_points,
        output_sha256: sink.digest(),
    })
}

/// Decode BOCU-1 from `reader` into UTF-8 on `writer`.
pub fn decode_stream<R: Read, W: Write>(
    reader: R,
    writer: W,
    opts: DecodeOptions,
) -> Result<DecodeStats, IoError> {
    let mut sink = OutputSink::new(writer);
    let mut decoder = Bocu1Reader::with_options(reader, opts);

    let output_size = decoder.decode_to(&mut sink)?;
    sink.flush()?;

    Ok(DecodeStats {
        input_size: decoder.bytes_read(),
        output_size,
        code_points: decoder.code_points(),
        replacements: decoder.replacements(),
        output_sha256: sink.digest(),
    })
}

// ---------------------------------------------------------------------------
// encode_file / decode_file
// ---------------------------------------------------------------------------

/// Encode a UTF-8 text file into a BOCU-1 file at `output_path`.
///
/// The input is streamed through a `BufReader`; the output uses `BufWriter`.
pub fn encode_file(input_path: &Path, output_path: &Path) -> Result<EncodeStats, IoError> {
    let input = BufReader::with_capacity(BUF_SIZE, File::open(input_path)?);
    let output = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);

    let stats = encode_stream(input, output)?;
    log::debug!(
        "encoded {} -> {}: {} code points",
        input_path.display(),
        output_path.display(),
        stats.code_points
    );
    Ok(stats)
}

/// Decode a BOCU-1 file into a UTF-8 text file at `output_path`.
pub fn decode_file(
    input_path: &Path,
    output_path: &Path,
    opts: DecodeOptions,
) -> Result<DecodeStats, IoError> {
    let input = BufReader::with_capacity(BUF_SIZE, File::open(input_path)?);
    let output = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);

    let stats = decode_stream(input, output, opts)?;
    log::debug!(
        "decoded {} -> {}: {} code points, {} replaced",
        input_path.display(),
        output_path.display(),
        stats.code_points,
        stats.replacements
    );
    Ok(stats)
}

// ---------------------------------------------------------------------------
// Output sink (hashes when the file-io feature is enabled)
// ---------------------------------------------------------------------------

struct OutputSink<W: Write> {
    inner: W,
    #[cfg(feature = "file-io")]
    hasher: sha2::Sha256,
}

impl<W: Write> OutputSink<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            #[cfg(feature = "file-io")]
            hasher: <sha2::Sha256 as sha2::Digest>::new(),
        }
    }

    #[cfg(feature = "file-io")]
    fn digest(self) -> Option<[u8; 32]> {
        use sha2::Digest;
        Some(self.hasher.finalize().into())
    }

    #[cfg(not(feature = "file-io"))]
    fn digest(self) -> Option<[u8; 32]> {
        None
    }
}

impl<W: Write> Write for OutputSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        #[cfg(feature = "file-io")]
        {
            use sha2::Digest;
            self.hasher.update(&buf[..n]);
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Lowercase hex rendering of a digest.
pub fn hex_digest(digest: &[u8]) -> String {
    use std::fmt::Write as _;
    digest.iter().fold(String::with_capacity(digest.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
