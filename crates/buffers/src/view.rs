//! Byte windows into a larger backing store.

use crate::BufferError;

/// A byte-addressable window `[offset, offset + length)` into a backing store.
///
/// The window never has to start at the origin of the store, and the store may
/// be larger than the window. Readers only ever see [`ByteView::as_bytes`].
///
/// # Example
///
/// ```
/// use notepack_buffers::ByteView;
///
/// let store = [0xff, 0xff, 0x93, 0x01, 0x02, 0x03, 0xff];
/// let view = ByteView::with_range(&store, 2, 4).unwrap();
/// assert_eq!(view.as_bytes(), &[0x93, 0x01, 0x02, 0x03]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteView<'a> {
    store: &'a [u8],
    offset: usize,
    length: usize,
}

impl<'a> ByteView<'a> {
    /// A view covering the whole store.
    pub fn new(store: &'a [u8]) -> Self {
        Self {
            store,
            offset: 0,
            length: store.len(),
        }
    }

    /// A view of `byte_length` bytes starting at `byte_offset`.
    pub fn with_range(
        store: &'a [u8],
        byte_offset: usize,
        byte_length: usize,
    ) -> Result<Self, BufferError> {
        let out_of_range = BufferError::OutOfRange {
            offset: byte_offset,
            length: byte_length,
            store_len: store.len(),
        };
        match byte_offset.checked_add(byte_length) {
            Some(end) if end <= store.len() => Ok(Self {
                store,
                offset: byte_offset,
                length: byte_length,
            }),
            _ => Err(out_of_range),
        }
    }

    /// A view addressed through elements `element_width` bytes wide, the way a
    /// typed array over a shared buffer is: `element_count` elements starting
    /// at `byte_offset`. Resolves to `element_width * element_count` bytes.
    pub fn with_elements(
        store: &'a [u8],
        byte_offset: usize,
        element_width: usize,
        element_count: usize,
    ) -> Result<Self, BufferError> {
        if element_width == 0 || byte_offset % element_width != 0 {
            return Err(BufferError::Misaligned {
                offset: byte_offset,
                width: element_width,
            });
        }
        let byte_length =
            element_width
                .checked_mul(element_count)
                .ok_or(BufferError::OutOfRange {
                    offset: byte_offset,
                    length: usize::MAX,
                    store_len: store.len(),
                })?;
        Self::with_range(store, byte_offset, byte_length)
    }

    /// Byte offset of the window inside the store.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte length of the window.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The full backing store, including bytes outside the window.
    pub fn store(&self) -> &'a [u8] {
        self.store
    }

    /// The bytes inside the window.
    pub fn as_bytes(&self) -> &'a [u8] {
        &self.store[self.offset..self.offset + self.length]
    }
}

impl<'a> From<&'a [u8]> for ByteView<'a> {
    fn from(store: &'a [u8]) -> Self {
        Self::new(store)
    }
}

impl<'a> From<&'a Vec<u8>> for ByteView<'a> {
    fn from(store: &'a Vec<u8>) -> Self {
        Self::new(store.as_slice())
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for ByteView<'a> {
    fn from(store: &'a [u8; N]) -> Self {
        Self::new(store.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_store() {
        let data = [1u8, 2, 3];
        let view = ByteView::new(&data);
        assert_eq!(view.offset(), 0);
        assert_eq!(view.len(), 3);
        assert_eq!(view.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_range_inside_store() {
        let data = [0u8, 1, 2, 3, 4, 5];
        let view = ByteView::with_range(&data, 2, 3).unwrap();
        assert_eq!(view.as_bytes(), &[2, 3, 4]);
        assert_eq!(view.store().len(), 6);
    }

    #[test]
    fn test_range_out_of_store() {
        let data = [0u8; 4];
        assert_eq!(
            ByteView::with_range(&data, 2, 3),
            Err(BufferError::OutOfRange {
                offset: 2,
                length: 3,
                store_len: 4
            })
        );
        assert!(ByteView::with_range(&data, usize::MAX, 2).is_err());
    }

    #[test]
    fn test_empty_range_at_end() {
        let data = [0u8; 4];
        let view = ByteView::with_range(&data, 4, 0).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.as_bytes(), &[] as &[u8]);
    }

    #[test]
    fn test_two_byte_elements() {
        let mut data = [0xffu8; 14];
        data[4..8].copy_from_slice(&[0x93, 1, 2, 3]);
        let view = ByteView::with_elements(&data, 4, 2, 2).unwrap();
        assert_eq!(view.offset(), 4);
        assert_eq!(view.len(), 4);
        assert_eq!(view.as_bytes(), &[0x93, 1, 2, 3]);
    }

    #[test]
    fn test_misaligned_elements() {
        let data = [0u8; 16];
        assert_eq!(
            ByteView::with_elements(&data, 3, 2, 1),
            Err(BufferError::Misaligned {
                offset: 3,
                width: 2
            })
        );
        assert!(ByteView::with_elements(&data, 0, 0, 1).is_err());
        assert!(ByteView::with_elements(&data, 8, 4, 3).is_err());
    }
}
