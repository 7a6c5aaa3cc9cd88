//! Encoder and decoder settings.

/// Default maximum nesting of arrays, maps and conversion hooks.
pub const DEFAULT_MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Maximum container/hook nesting before
    /// [`MsgPackError::DepthLimitExceeded`](crate::MsgPackError::DepthLimitExceeded).
    pub max_depth: usize,
    /// Initial size of the output buffer, in bytes. It doubles on overflow.
    pub initial_capacity: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            initial_capacity: notepack_buffers::Writer::DEFAULT_ALLOC_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Maximum container nesting before
    /// [`MsgPackError::DepthLimitExceeded`](crate::MsgPackError::DepthLimitExceeded).
    pub max_depth: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
