// Errors for the streaming and string layers.

use std::io;

use thiserror::Error;

use crate::bocu1::{DecodeError, EncodeError};

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Malformed UTF-8 text input. `offset` counts UTF-8 bytes.
    #[error("invalid UTF-8 at input offset {offset}")]
    InvalidUtf8 { offset: u64 },

    /// A decoded surrogate code point cannot be written as UTF-8.
    #[error("U+{value:04X} at offset {offset} is a surrogate and has no UTF-8 form")]
    Surrogate { offset: u64, value: u32 },
}

impl From<StreamError> for io::Error {
    fn from(e: StreamError) -> io::Error {
        match e {
            StreamError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
