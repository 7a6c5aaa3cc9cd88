//! Low-level byte plumbing shared by the notepack codec.
//!
//! - [`Writer`]: growable output buffer with big-endian primitives.
//! - [`Reader`]: forward-only, bounds-checked cursor over a byte slice.
//! - [`ByteView`]: a window (byte offset + byte length) into a larger store.

mod error;
mod reader;
mod view;
mod writer;

pub use error::BufferError;
pub use reader::Reader;
pub use view::ByteView;
pub use writer::Writer;
