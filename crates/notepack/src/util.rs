//! One-shot helpers with default options.

use notepack_buffers::ByteView;

use crate::{MsgPackDecoder, MsgPackEncoder, MsgPackError, Value};

/// Encodes `value` with a fresh [`MsgPackEncoder`].
pub fn encode(value: &Value) -> Result<Vec<u8>, MsgPackError> {
    let mut encoder = MsgPackEncoder::new();
    encoder.encode(value)
}

/// Decodes one value from `input`, which may be a byte slice or a
/// [`ByteView`] into a larger store.
pub fn decode<'a>(input: impl Into<ByteView<'a>>) -> Result<Value, MsgPackError> {
    MsgPackDecoder::new().decode(input)
}
