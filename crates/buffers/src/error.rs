use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
    #[error("view [{offset}, {offset}+{length}) exceeds store of {store_len} bytes")]
    OutOfRange {
        offset: usize,
        length: usize,
        store_len: usize,
    },
    #[error("byte offset {offset} is not a multiple of element width {width}")]
    Misaligned { offset: usize, width: usize },
}
