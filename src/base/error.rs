use crate::types::TransportMode;
use std::error;
use std::fmt;
use std::io;

/// Represents errors that can occur while talking to a GLK module.
#[derive(Debug)]
pub enum Error {
    /// A caller-supplied value is outside its documented range. Nothing was sent.
    InvalidParameter {
        name: &'static str,
        description: String,
    },

    /// The reply did not arrive before the deadline.
    OperationTimeout,

    /// A length-prefixed reply ended before its declared length.
    TruncatedReply { expected: usize, received: usize },

    /// The active transport mode cannot carry this command.
    UnsupportedInMode { mode: TransportMode },

    /// The wire encoding of this operation is not implemented. Nothing was sent.
    NotImplemented { operation: &'static str },

    /// The received bytes are inconsistent with the command that was issued.
    ProtocolError { description: String },

    /// The buffer provided is too small for message encoding.
    BufferTooSmall,

    /// An I/O error occurred while communicating with the underlying stream (e.g., serial port).
    IoError(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter { name, description } => {
                write!(f, "invalid parameter `{}`: {}", name, description)
            }
            Error::OperationTimeout => write!(f, "operation timeout"),
            Error::TruncatedReply { expected, received } => write!(
                f,
                "truncated reply: expected {} bytes, received {}",
                expected, received
            ),
            Error::UnsupportedInMode { mode } => {
                write!(f, "operation not supported in {} mode", mode)
            }
            Error::NotImplemented { operation } => write!(f, "{} is not implemented", operation),
            Error::ProtocolError { description } => write!(f, "protocol error: {}", description),
            Error::BufferTooSmall => write!(f, "buffer is too small for message encoding"),
            Error::IoError(err) => write!(f, "io error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IoError(err)
    }
}

/// A specialized `Result` type for GLK operations.
pub type Result<T> = std::result::Result<T, Error>;
