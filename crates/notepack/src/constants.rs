//! MessagePack tag bytes and the tag classification table.
//!
//! Every one of the 256 possible tag bytes maps to a [`TagInfo`]: the value
//! family it introduces and how its size is carried. The decoder does a single
//! table lookup per value instead of a chain of range checks.

/// One-byte markers that carry a complete value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MsgPackMarker {
    Nil = 0xc0,
    /// Never used by the format; always rejected.
    Reserved = 0xc1,
    False = 0xc2,
    True = 0xc3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    PositiveFixInt,
    NegativeFixInt,
    Nil,
    False,
    True,
    UInt,
    Int,
    Float,
    Str,
    Bin,
    Array,
    Map,
    Ext,
    Reserved,
}

/// How the size of a value follows its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    /// Nothing follows the tag.
    None,
    /// Length (or element count) is carried by the tag itself.
    Inline(u8),
    /// A big-endian scalar of this many bytes follows.
    Fixed(u8),
    /// A big-endian length prefix of this many bytes follows.
    Prefix(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagInfo {
    pub family: Family,
    pub size: Size,
}

impl TagInfo {
    const fn new(family: Family, size: Size) -> Self {
        Self { family, size }
    }
}

const fn tag_info(tag: u8) -> TagInfo {
    use Family::*;
    match tag {
        0x00..=0x7f => TagInfo::new(PositiveFixInt, Size::Inline(tag)),
        0x80..=0x8f => TagInfo::new(Map, Size::Inline(tag & 0x0f)),
        0x90..=0x9f => TagInfo::new(Array, Size::Inline(tag & 0x0f)),
        0xa0..=0xbf => TagInfo::new(Str, Size::Inline(tag & 0x1f)),
        0xc0 => TagInfo::new(Nil, Size::None),
        0xc1 => TagInfo::new(Reserved, Size::None),
        0xc2 => TagInfo::new(False, Size::None),
        0xc3 => TagInfo::new(True, Size::None),
        0xc4 => TagInfo::new(Bin, Size::Prefix(1)),
        0xc5 => TagInfo::new(Bin, Size::Prefix(2)),
        0xc6 => TagInfo::new(Bin, Size::Prefix(4)),
        0xc7 => TagInfo::new(Ext, Size::Prefix(1)),
        0xc8 => TagInfo::new(Ext, Size::Prefix(2)),
        0xc9 => TagInfo::new(Ext, Size::Prefix(4)),
        0xca => TagInfo::new(Float, Size::Fixed(4)),
        0xcb => TagInfo::new(Float, Size::Fixed(8)),
        0xcc => TagInfo::new(UInt, Size::Fixed(1)),
        0xcd => TagInfo::new(UInt, Size::Fixed(2)),
        0xce => TagInfo::new(UInt, Size::Fixed(4)),
        0xcf => TagInfo::new(UInt, Size::Fixed(8)),
        0xd0 => TagInfo::new(Int, Size::Fixed(1)),
        0xd1 => TagInfo::new(Int, Size::Fixed(2)),
        0xd2 => TagInfo::new(Int, Size::Fixed(4)),
        0xd3 => TagInfo::new(Int, Size::Fixed(8)),
        0xd4 => TagInfo::new(Ext, Size::Inline(1)),
        0xd5 => TagInfo::new(Ext, Size::Inline(2)),
        0xd6 => TagInfo::new(Ext, Size::Inline(4)),
        0xd7 => TagInfo::new(Ext, Size::Inline(8)),
        0xd8 => TagInfo::new(Ext, Size::Inline(16)),
        0xd9 => TagInfo::new(Str, Size::Prefix(1)),
        0xda => TagInfo::new(Str, Size::Prefix(2)),
        0xdb => TagInfo::new(Str, Size::Prefix(4)),
        0xdc => TagInfo::new(Array, Size::Prefix(2)),
        0xdd => TagInfo::new(Array, Size::Prefix(4)),
        0xde => TagInfo::new(Map, Size::Prefix(2)),
        0xdf => TagInfo::new(Map, Size::Prefix(4)),
        0xe0..=0xff => TagInfo::new(NegativeFixInt, Size::Inline(tag & 0x1f)),
    }
}

const fn build_tag_table() -> [TagInfo; 256] {
    let mut table = [TagInfo::new(Family::Reserved, Size::None); 256];
    let mut i = 0;
    while i < 256 {
        table[i] = tag_info(i as u8);
        i += 1;
    }
    table
}

/// Classification of every tag byte, indexed by the byte.
pub static TAG_TABLE: [TagInfo; 256] = build_tag_table();

#[inline]
pub fn classify(tag: u8) -> TagInfo {
    TAG_TABLE[tag as usize]
}
