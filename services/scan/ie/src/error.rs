//! Information element error types.
//!
//! Wire-format problems and caller misuse are kept apart: a [`WireError`]
//! describes bytes that could not be decoded and is always recoverable (the
//! element is reported as absent), while a [`ContractViolation`] means a typed
//! decoder was handed an element of the wrong kind.

use thiserror::Error;

/// Wire-format errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WireError {
    /// Payload shorter than the fixed part of the element
    #[error("too short: need {need} bytes, have {have}")]
    TooShort {
        /// Bytes required
        need: usize,
        /// Bytes available
        have: usize,
    },

    /// Length not allowed for this element
    #[error("bad length {0}")]
    BadLength(usize),

    /// Read past the end of the buffer
    #[error("truncated element")]
    Truncated,

    /// Structurally invalid content
    #[error("malformed element: {0}")]
    Malformed(&'static str),

    /// Operating class / channel pair not in the global operating class table
    #[error("unknown band for operating class {op_class} channel {channel}")]
    UnknownBand {
        /// Global operating class
        op_class: u8,
        /// Channel number
        channel: u8,
    },

    /// Invalid hex encoding
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// Caller misuse of a typed decoder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    /// Element id / extension id does not match the decoder
    #[error("element {got_id}/{got_ext} is not {expected}")]
    WrongElementType {
        /// Element the decoder handles
        expected: &'static str,
        /// Element id that was passed in
        got_id: u8,
        /// Extension id that was passed in
        got_ext: u8,
    },
}

/// Error returned at the decoder boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Bytes could not be decoded
    #[error(transparent)]
    Wire(#[from] WireError),

    /// Decoder used on the wrong element
    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

impl DecodeError {
    /// Whether the caller may treat the element as absent and carry on
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DecodeError::Wire(_))
    }
}
