//! MessagePack codec with a timestamp extension (type −1) for date/time values.
//!
//! ```
//! use notepack::{decode, encode, Timestamp, Value};
//!
//! let value = Value::Array(vec![
//!     Value::from(1),
//!     Value::from("two"),
//!     Value::from(Timestamp::new(0, 0)),
//! ]);
//! let bytes = encode(&value).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```
//!
//! Nesting depth is limited in both directions (see [`DEFAULT_MAX_DEPTH`]);
//! the limit keeps recursion well inside the default thread stack.

/// Trace-level logging macro that forwards to `tracing::trace!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

/// Trace-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Debug-level logging macro that forwards to `tracing::debug!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Debug-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

pub mod constants;
pub mod decoder;
pub mod encoder;
mod error;
mod json;
mod options;
pub mod timestamp;
mod util;
mod value;

pub use constants::{classify, Family, MsgPackMarker, Size, TagInfo, TAG_TABLE};
pub use decoder::MsgPackDecoder;
pub use encoder::MsgPackEncoder;
pub use error::MsgPackError;
pub use notepack_buffers::{BufferError, ByteView};
pub use options::{DecoderOptions, EncoderOptions, DEFAULT_MAX_DEPTH};
pub use timestamp::{Timestamp, TIMESTAMP_EXT_TYPE};
pub use util::{decode, encode};
pub use value::{ConvertibleToValue, Extension, Value};
