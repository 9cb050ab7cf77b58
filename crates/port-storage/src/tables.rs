//! On-disk table entries.

use crate::constants::{
    PROPERTY_ENTRY_SIZE, SECTION_ENTRY_SIZE, STRING_ENTRY_SIZE, SYMBOL_ENTRY_SIZE,
};
use crate::header::read_u32_le;

/// A fixed-size little-endian table entry.
pub trait TableEntry: Sized {
    const SIZE: usize;

    fn decode(bytes: &[u8]) -> Self;

    fn encode(&self, out: &mut Vec<u8>);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StringEntry {
    pub length: u32,
    pub offset: u32,
}

/// Shared layout of property and section entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockEntry {
    pub name_str_idx: u32,
    pub size: u32,
    pub offset: u32,
}

pub type PropertyEntry = BlockEntry;
pub type SectionEntry = BlockEntry;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name_str_idx: u32,
    pub section_idx: u32,
    pub value: u32,
}

fn put(out: &mut Vec<u8>, words: &[u32]) {
    for word in words {
        out.extend_from_slice(&word.to_le_bytes());
    }
}

impl TableEntry for StringEntry {
    const SIZE: usize = STRING_ENTRY_SIZE;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            length: read_u32_le(bytes, 0),
            offset: read_u32_le(bytes, 4),
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put(out, &[self.length, self.offset]);
    }
}

impl TableEntry for BlockEntry {
    const SIZE: usize = SECTION_ENTRY_SIZE;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            name_str_idx: read_u32_le(bytes, 0),
            size: read_u32_le(bytes, 4),
            offset: read_u32_le(bytes, 8),
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put(out, &[self.name_str_idx, self.size, self.offset]);
    }
}

const _: () = assert!(PROPERTY_ENTRY_SIZE == SECTION_ENTRY_SIZE);

impl TableEntry for SymbolEntry {
    const SIZE: usize = SYMBOL_ENTRY_SIZE;

    fn decode(bytes: &[u8]) -> Self {
        Self {
            name_str_idx: read_u32_le(bytes, 0),
            section_idx: read_u32_le(bytes, 4),
            value: read_u32_le(bytes, 8),
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put(out, &[self.name_str_idx, self.section_idx, self.value]);
    }
}

impl BlockEntry {
    /// Whether `[offset, offset + size)` lies within `contents_size` bytes.
    pub fn fits(&self, contents_size: u32) -> bool {
        u64::from(self.offset) + u64::from(self.size) <= u64::from(contents_size)
    }
}

impl StringEntry {
    pub fn fits(&self, contents_size: u32) -> bool {
        u64::from(self.offset) + u64::from(self.length) <= u64::from(contents_size)
    }
}
