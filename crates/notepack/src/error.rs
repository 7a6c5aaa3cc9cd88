use notepack_buffers::BufferError;
use thiserror::Error;

/// Errors raised by [`MsgPackEncoder`](crate::MsgPackEncoder) and
/// [`MsgPackDecoder`](crate::MsgPackDecoder).
///
/// Decode offsets are relative to the start of the input view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MsgPackError {
    #[error("truncated input at offset {offset}: need {needed} bytes, {remaining} remaining")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("unknown tag byte 0x{tag:02x} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },
    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },
    #[error("timestamp nanoseconds out of range: {nanos}")]
    InvalidTimestamp { nanos: u32 },
    #[error("value nested deeper than {max_depth} levels")]
    DepthLimitExceeded { max_depth: usize },
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),
    #[error("invalid input view: {0}")]
    View(#[from] BufferError),
}
