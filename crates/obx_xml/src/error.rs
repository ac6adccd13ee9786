use std::io;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum XmlError {
    #[error("malformed markup at byte offset {offset}")]
    Syntax { offset: u64 },

    #[error("unexpected end of input inside markup")]
    UnexpectedEof,

    #[error("text at byte offset {offset} is not valid utf-8")]
    InvalidUtf8 { offset: u64 },

    #[error(transparent)]
    Io(io::Error),
}

impl From<io::Error> for XmlError {
    fn from(err: io::Error) -> Self {
        // Running off the end of the stream mid-token is a truncation
        // condition, not an I/O fault.
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEof
        } else {
            Self::Io(err)
        }
    }
}
