//! MessagePack encoder over [`Value`] trees.
//!
//! Every value is written with the narrowest tag that represents it exactly.

use notepack_buffers::Writer;

use crate::constants::MsgPackMarker;
use crate::timestamp::{self, Timestamp, TIMESTAMP_EXT_TYPE};
use crate::{EncoderOptions, MsgPackError, Value};

pub struct MsgPackEncoder {
    pub writer: Writer,
    options: EncoderOptions,
}

impl Default for MsgPackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MsgPackEncoder {
    pub fn new() -> Self {
        Self::with_options(EncoderOptions::default())
    }

    pub fn with_options(options: EncoderOptions) -> Self {
        Self {
            writer: Writer::with_alloc_size(options.initial_capacity),
            options,
        }
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Encodes `value` and returns the bytes written for it. The internal
    /// buffer is reused across calls.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, MsgPackError> {
        self.writer.reset();
        match self.write_any(value, 0) {
            Ok(()) => Ok(self.writer.flush()),
            Err(err) => {
                self.writer.reset();
                Err(err)
            }
        }
    }

    fn enter(&self, depth: usize) -> Result<usize, MsgPackError> {
        if depth >= self.options.max_depth {
            debug!("encode depth limit {} reached", self.options.max_depth);
            return Err(MsgPackError::DepthLimitExceeded {
                max_depth: self.options.max_depth,
            });
        }
        Ok(depth + 1)
    }

    fn write_any(&mut self, value: &Value, depth: usize) -> Result<(), MsgPackError> {
        match value {
            Value::Nil => self.write_nil(),
            Value::Bool(b) => self.write_boolean(*b),
            Value::Integer(i) => self.write_integer(*i),
            Value::UInteger(u) => self.write_u_integer(*u),
            Value::Float(f) => self.write_float(*f),
            Value::Timestamp(ts) => self.write_timestamp(*ts),
            Value::Str(s) => {
                check_len(s.len())?;
                self.write_str(s);
            }
            Value::Bytes(b) => {
                check_len(b.len())?;
                self.write_bin(b);
            }
            Value::Array(items) => {
                check_len(items.len())?;
                let depth = self.enter(depth)?;
                self.write_arr_hdr(items.len());
                for item in items {
                    self.write_any(item, depth)?;
                }
            }
            Value::Map(pairs) => {
                check_len(pairs.len())?;
                let depth = self.enter(depth)?;
                self.write_map_hdr(pairs.len());
                for (key, val) in pairs {
                    self.write_any(key, depth)?;
                    self.write_any(val, depth)?;
                }
            }
            Value::Extension(ext) => {
                check_len(ext.data.len())?;
                if ext.kind == TIMESTAMP_EXT_TYPE && timestamp::is_packed_len(ext.data.len()) {
                    debug!(
                        "extension type {} with {} bytes collides with timestamps",
                        ext.kind,
                        ext.data.len()
                    );
                    return Err(MsgPackError::UnsupportedValue(format!(
                        "extension type {} with a {}-byte payload is reserved for timestamps",
                        ext.kind,
                        ext.data.len()
                    )));
                }
                self.write_ext(ext.kind, &ext.data);
            }
            Value::Convertible(hook) => {
                let depth = self.enter(depth)?;
                let Some(converted) = hook.to_value() else {
                    debug!("conversion hook declined: {hook:?}");
                    return Err(MsgPackError::UnsupportedValue(format!("{hook:?}")));
                };
                trace!("encoding {hook:?} through its conversion hook");
                self.write_any(&converted, depth)?;
            }
        }
        Ok(())
    }

    pub fn write_nil(&mut self) {
        self.writer.u8(MsgPackMarker::Nil as u8);
    }

    pub fn write_boolean(&mut self, b: bool) {
        let marker = if b {
            MsgPackMarker::True
        } else {
            MsgPackMarker::False
        };
        self.writer.u8(marker as u8);
    }

    /// Floats are always written as float64.
    pub fn write_float(&mut self, float: f64) {
        self.writer.u8f64(0xcb, float);
    }

    pub fn write_u_integer(&mut self, uint: u64) {
        if uint <= 0x7f {
            self.writer.u8(uint as u8);
        } else if uint <= 0xff {
            self.writer.u16(0xcc00 | uint as u16);
        } else if uint <= 0xffff {
            self.writer.u8u16(0xcd, uint as u16);
        } else if uint <= 0xffff_ffff {
            self.writer.u8u32(0xce, uint as u32);
        } else {
            self.writer.u8u64(0xcf, uint);
        }
    }

    pub fn write_integer(&mut self, int: i64) {
        if int >= 0 {
            self.write_u_integer(int as u64);
        } else if int >= -0x20 {
            // negative fixint: 0xe0..0xff
            self.writer.i8(int as i8);
        } else if int >= i8::MIN as i64 {
            self.writer.u8(0xd0);
            self.writer.i8(int as i8);
        } else if int >= i16::MIN as i64 {
            self.writer.u8(0xd1);
            self.writer.i16(int as i16);
        } else if int >= i32::MIN as i64 {
            self.writer.u8(0xd2);
            self.writer.i32(int as i32);
        } else {
            self.writer.u8(0xd3);
            self.writer.i64(int);
        }
    }

    /// Header for a string of `length` UTF-8 bytes.
    pub fn write_str_hdr(&mut self, length: usize) {
        if length <= 0x1f {
            self.writer.u8(0xa0 | length as u8);
        } else if length <= 0xff {
            self.writer.u16(0xd900 | length as u16);
        } else if length <= 0xffff {
            self.writer.u8u16(0xda, length as u16);
        } else {
            self.writer.u8u32(0xdb, length as u32);
        }
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_str_hdr(s.len());
        self.writer.utf8(s);
    }

    pub fn write_bin_hdr(&mut self, length: usize) {
        if length <= 0xff {
            self.writer.u16(0xc400 | length as u16);
        } else if length <= 0xffff {
            self.writer.u8u16(0xc5, length as u16);
        } else {
            self.writer.u8u32(0xc6, length as u32);
        }
    }

    pub fn write_bin(&mut self, buf: &[u8]) {
        self.write_bin_hdr(buf.len());
        self.writer.buf(buf);
    }

    pub fn write_arr_hdr(&mut self, length: usize) {
        if length <= 0xf {
            self.writer.u8(0x90 | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(0xdc, length as u16);
        } else {
            self.writer.u8u32(0xdd, length as u32);
        }
    }

    pub fn write_map_hdr(&mut self, length: usize) {
        if length <= 0xf {
            self.writer.u8(0x80 | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(0xde, length as u16);
        } else {
            self.writer.u8u32(0xdf, length as u32);
        }
    }

    /// Extension header: fixext for payloads of 1, 2, 4, 8 or 16 bytes,
    /// ext8/16/32 otherwise.
    pub fn write_ext_hdr(&mut self, kind: i8, length: usize) {
        let kind = kind as u8;
        match length {
            1 => self.writer.u16(0xd400 | kind as u16),
            2 => self.writer.u16(0xd500 | kind as u16),
            4 => self.writer.u16(0xd600 | kind as u16),
            8 => self.writer.u16(0xd700 | kind as u16),
            16 => self.writer.u16(0xd800 | kind as u16),
            _ => {
                if length <= 0xff {
                    self.writer.u16(0xc700 | length as u16);
                } else if length <= 0xffff {
                    self.writer.u8u16(0xc8, length as u16);
                } else {
                    self.writer.u8u32(0xc9, length as u32);
                }
                self.writer.u8(kind);
            }
        }
    }

    pub fn write_ext(&mut self, kind: i8, data: &[u8]) {
        self.write_ext_hdr(kind, data.len());
        self.writer.buf(data);
    }

    pub fn write_timestamp(&mut self, ts: Timestamp) {
        let packed = timestamp::pack(ts);
        self.write_ext(TIMESTAMP_EXT_TYPE, packed.as_slice());
    }
}

/// Lengths and counts travel as at most 32-bit prefixes.
fn check_len(length: usize) -> Result<(), MsgPackError> {
    if length as u64 > u32::MAX as u64 {
        debug!("length {length} does not fit a 32-bit prefix");
        return Err(MsgPackError::UnsupportedValue(format!(
            "length {length} exceeds the 32-bit MessagePack limit"
        )));
    }
    Ok(())
}
