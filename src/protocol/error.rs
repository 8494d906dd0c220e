//! Plotwire error types

use thiserror::Error;

use crate::transport::TransportError;

/// Plotwire errors
#[derive(Error, Debug)]
pub enum Error {
    /// Command issued before the connection was established
    #[error("not connected: call connect() before sending commands")]
    NotConnected,

    /// Transport failure (resolve, connect or write)
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Unknown opcode
    #[error("invalid opcode: {value}")]
    InvalidOpcode {
        /// Raw value read from the stream
        value: u64,
    },

    /// Unknown tagged-value type
    #[error("invalid data tag: {value}")]
    InvalidDataTag {
        /// Raw value read from the stream
        value: u64,
    },

    /// Has-label flag other than 0 or 1
    #[error("invalid label flag: {value}")]
    InvalidLabelFlag {
        /// Raw value read from the stream
        value: u64,
    },

    /// Buffer too small
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Length prefix does not fit in memory
    #[error("length prefix too large: {len}")]
    LengthOverflow {
        /// Raw length read from the stream
        len: u64,
    },

    /// Invalid UTF-8
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
