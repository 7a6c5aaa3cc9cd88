//! MessagePack decoder producing [`Value`] trees.
//!
//! Input is a [`ByteView`]: a window into a possibly larger store. The decoder
//! reads strictly inside the window with a single forward cursor and stops as
//! soon as one complete value has been read; trailing bytes are ignored.

use notepack_buffers::{BufferError, ByteView, Reader};

use crate::constants::{classify, Family, Size};
use crate::timestamp::{self, TIMESTAMP_EXT_TYPE};
use crate::{DecoderOptions, Extension, MsgPackError, Value};

#[derive(Debug, Clone, Default)]
pub struct MsgPackDecoder {
    options: DecoderOptions,
}

impl MsgPackDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    pub fn decode<'a>(&self, input: impl Into<ByteView<'a>>) -> Result<Value, MsgPackError> {
        self.decode_with_consumed(input).map(|(value, _)| value)
    }

    /// Decodes one value and reports how many bytes of the view it used.
    pub fn decode_with_consumed<'a>(
        &self,
        input: impl Into<ByteView<'a>>,
    ) -> Result<(Value, usize), MsgPackError> {
        let view = input.into();
        trace!(
            "decoding view of {} bytes at store offset {}",
            view.len(),
            view.offset()
        );
        let mut cursor = Cursor {
            reader: Reader::from_view(view),
            max_depth: self.options.max_depth,
        };
        let value = cursor.read_any(0)?;
        Ok((value, cursor.reader.x))
    }
}

struct Cursor<'a> {
    reader: Reader<'a>,
    max_depth: usize,
}

impl<'a> Cursor<'a> {
    fn truncated(&self, needed: usize) -> MsgPackError {
        let err = MsgPackError::Truncated {
            offset: self.reader.x,
            needed,
            remaining: self.reader.size(),
        };
        debug!("{err}");
        err
    }

    #[inline]
    fn u8(&mut self) -> Result<u8, MsgPackError> {
        self.reader.try_u8().map_err(|_| self.truncated(1))
    }

    #[inline]
    fn buf(&mut self, size: usize) -> Result<&'a [u8], MsgPackError> {
        self.reader.try_buf(size).map_err(|_| self.truncated(size))
    }

    /// Length or element count for a variable-size family.
    fn read_len(&mut self, size: Size) -> Result<usize, MsgPackError> {
        let len = match size {
            Size::Inline(n) => n as usize,
            Size::Prefix(1) => self.u8()? as usize,
            Size::Prefix(2) => self.reader.try_u16().map_err(|_| self.truncated(2))? as usize,
            Size::Prefix(_) => self.reader.try_u32().map_err(|_| self.truncated(4))? as usize,
            Size::None | Size::Fixed(_) => 0,
        };
        Ok(len)
    }

    fn enter(&self, depth: usize) -> Result<usize, MsgPackError> {
        if depth >= self.max_depth {
            debug!("decode depth limit {} reached", self.max_depth);
            return Err(MsgPackError::DepthLimitExceeded {
                max_depth: self.max_depth,
            });
        }
        Ok(depth + 1)
    }

    fn read_any(&mut self, depth: usize) -> Result<Value, MsgPackError> {
        let offset = self.reader.x;
        let tag = self.u8()?;
        let info = classify(tag);
        match info.family {
            Family::PositiveFixInt => Ok(Value::Integer(tag as i64)),
            Family::NegativeFixInt => Ok(Value::Integer(tag as i8 as i64)),
            Family::Nil => Ok(Value::Nil),
            Family::False => Ok(Value::Bool(false)),
            Family::True => Ok(Value::Bool(true)),
            Family::UInt => self.read_uint(info.size),
            Family::Int => self.read_int(info.size),
            Family::Float => self.read_float(info.size),
            Family::Str => {
                let len = self.read_len(info.size)?;
                self.read_str(len)
            }
            Family::Bin => {
                let len = self.read_len(info.size)?;
                Ok(Value::Bytes(self.buf(len)?.to_vec()))
            }
            Family::Array => {
                let len = self.read_len(info.size)?;
                self.read_arr(len, depth)
            }
            Family::Map => {
                let len = self.read_len(info.size)?;
                self.read_map(len, depth)
            }
            Family::Ext => {
                let len = self.read_len(info.size)?;
                self.read_ext(len)
            }
            Family::Reserved => {
                debug!("unknown tag 0x{tag:02x} at offset {offset}");
                Err(MsgPackError::UnknownTag { tag, offset })
            }
        }
    }

    fn read_uint(&mut self, size: Size) -> Result<Value, MsgPackError> {
        let value = match size {
            Size::Fixed(1) => self.u8()? as u64,
            Size::Fixed(2) => self.reader.try_u16().map_err(|_| self.truncated(2))? as u64,
            Size::Fixed(4) => self.reader.try_u32().map_err(|_| self.truncated(4))? as u64,
            _ => self.reader.try_u64().map_err(|_| self.truncated(8))?,
        };
        Ok(Value::from(value))
    }

    fn read_int(&mut self, size: Size) -> Result<Value, MsgPackError> {
        let value = match size {
            Size::Fixed(1) => self.reader.try_i8().map_err(|_| self.truncated(1))? as i64,
            Size::Fixed(2) => self.reader.try_i16().map_err(|_| self.truncated(2))? as i64,
            Size::Fixed(4) => self.reader.try_i32().map_err(|_| self.truncated(4))? as i64,
            _ => self.reader.try_i64().map_err(|_| self.truncated(8))?,
        };
        Ok(Value::Integer(value))
    }

    fn read_float(&mut self, size: Size) -> Result<Value, MsgPackError> {
        let value = match size {
            Size::Fixed(4) => self.reader.try_f32().map_err(|_| self.truncated(4))? as f64,
            _ => self.reader.try_f64().map_err(|_| self.truncated(8))?,
        };
        Ok(Value::Float(value))
    }

    fn read_str(&mut self, len: usize) -> Result<Value, MsgPackError> {
        let offset = self.reader.x;
        match self.reader.try_utf8(len) {
            Ok(s) => Ok(Value::Str(s.to_owned())),
            Err(BufferError::InvalidUtf8) => {
                debug!("invalid UTF-8 in string at offset {offset}");
                Err(MsgPackError::InvalidUtf8 { offset })
            }
            Err(_) => Err(self.truncated(len)),
        }
    }

    fn read_arr(&mut self, len: usize, depth: usize) -> Result<Value, MsgPackError> {
        let depth = self.enter(depth)?;
        trace!("array of {len} elements at depth {depth}");
        // Every element takes at least one byte.
        let mut items = Vec::with_capacity(len.min(self.reader.size()));
        for _ in 0..len {
            items.push(self.read_any(depth)?);
        }
        Ok(Value::Array(items))
    }

    fn read_map(&mut self, len: usize, depth: usize) -> Result<Value, MsgPackError> {
        let depth = self.enter(depth)?;
        trace!("map of {len} pairs at depth {depth}");
        let mut pairs = Vec::with_capacity(len.min(self.reader.size() / 2));
        for _ in 0..len {
            let key = self.read_any(depth)?;
            let val = self.read_any(depth)?;
            pairs.push((key, val));
        }
        Ok(Value::Map(pairs))
    }

    fn read_ext(&mut self, len: usize) -> Result<Value, MsgPackError> {
        let kind = self.u8()? as i8;
        let data = self.buf(len)?;
        if kind == TIMESTAMP_EXT_TYPE {
            if let Some(ts) = timestamp::unpack(data)? {
                return Ok(Value::Timestamp(ts));
            }
        }
        Ok(Value::Extension(Extension::new(kind, data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(bytes: &[u8]) -> Result<Value, MsgPackError> {
        MsgPackDecoder::new().decode(bytes)
    }

    #[test]
    fn scalars() {
        assert_eq!(dec(&[0xc0]), Ok(Value::Nil));
        assert_eq!(dec(&[0xc3]), Ok(Value::Bool(true)));
        assert_eq!(dec(&[0x7f]), Ok(Value::Integer(127)));
        assert_eq!(dec(&[0xe0]), Ok(Value::Integer(-32)));
        assert_eq!(dec(&[0xcc, 0x80]), Ok(Value::Integer(128)));
        assert_eq!(dec(&[0xd0, 0xdf]), Ok(Value::Integer(-33)));
    }

    #[test]
    fn float32_widens() {
        let mut bytes = vec![0xca];
        bytes.extend_from_slice(&1.5f32.to_be_bytes());
        assert_eq!(dec(&bytes), Ok(Value::Float(1.5)));
    }

    #[test]
    fn uint64_above_i64_max() {
        let mut bytes = vec![0xcf];
        bytes.extend_from_slice(&u64::MAX.to_be_bytes());
        assert!(matches!(dec(&bytes), Ok(Value::UInteger(u64::MAX))));
        let mut small = vec![0xcf];
        small.extend_from_slice(&5u64.to_be_bytes());
        assert!(matches!(dec(&small), Ok(Value::Integer(5))));
    }

    #[test]
    fn consumed_ignores_trailing_bytes() {
        let (value, consumed) = MsgPackDecoder::new()
            .decode_with_consumed(&[0x92, 0x01, 0x02, 0xc1, 0xc1])
            .unwrap();
        assert_eq!(value, Value::from(vec![Value::from(1), Value::from(2)]));
        assert_eq!(consumed, 3);
    }

    #[test]
    fn truncated_reports_offset() {
        assert_eq!(
            dec(&[0x92, 0x01]),
            Err(MsgPackError::Truncated {
                offset: 2,
                needed: 1,
                remaining: 0
            })
        );
        assert_eq!(
            dec(&[0xcd, 0x01]),
            Err(MsgPackError::Truncated {
                offset: 1,
                needed: 2,
                remaining: 1
            })
        );
        assert_eq!(
            dec(&[]),
            Err(MsgPackError::Truncated {
                offset: 0,
                needed: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn huge_declared_length_does_not_preallocate() {
        assert!(matches!(
            dec(&[0xdd, 0xff, 0xff, 0xff, 0xff]),
            Err(MsgPackError::Truncated { .. })
        ));
        assert!(matches!(
            dec(&[0xdf, 0xff, 0xff, 0xff, 0xff, 0x01]),
            Err(MsgPackError::Truncated { .. })
        ));
    }

    #[test]
    fn invalid_utf8() {
        assert_eq!(
            dec(&[0x91, 0xa2, 0xff, 0xfe]),
            Err(MsgPackError::InvalidUtf8 { offset: 2 })
        );
    }

    #[test]
    fn timestamp_coded_ext_of_other_length_stays_opaque() {
        assert_eq!(
            dec(&[0xd4, 0xff, 0x2a]),
            Ok(Value::Extension(Extension::new(-1, vec![0x2a])))
        );
    }

    #[test]
    fn depth_limit() {
        let decoder = MsgPackDecoder::with_options(DecoderOptions { max_depth: 2 });
        assert!(decoder.decode(&[0x91, 0x90]).is_ok());
        assert_eq!(
            decoder.decode(&[0x91, 0x91, 0x90]),
            Err(MsgPackError::DepthLimitExceeded { max_depth: 2 })
        );
    }
}
