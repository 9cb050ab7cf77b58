//! Data storage file header (64 bytes).
//!
//! Layout, all fields little-endian `u32`:
//! - 0-7: format, full_size
//! - 8-39: string, property, section and symbol tables (num_entries, entries_offset)
//! - 40-63: string, property and section contents (contents_size, contents_offset)
//!
//! Offsets are relative to the first byte after the header. `full_size` counts
//! everything after the header.

use crate::constants::{
    HEADER_SIZE, PROPERTY_ENTRY_SIZE, SECTION_ENTRY_SIZE, STRING_ENTRY_SIZE, SYMBOL_ENTRY_SIZE,
};

/// Location of a table of fixed-size entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct TableDesc {
    pub num_entries: u32,
    pub entries_offset: u32,
}

/// Location of a block of variable-size contents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct ContentDesc {
    pub contents_size: u32,
    pub contents_offset: u32,
}

/// File header - first 64 bytes of a data storage blob.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct Header {
    /// Magic number and feature flags, checked by the reader under a mask.
    pub format: u32,
    /// Size of everything after the header.
    pub full_size: u32,

    pub string_table: TableDesc,
    pub property_table: TableDesc,
    pub section_table: TableDesc,
    pub symbol_table: TableDesc,

    pub strings: ContentDesc,
    pub properties: ContentDesc,
    pub sections: ContentDesc,
}

const _: () = assert!(std::mem::size_of::<Header>() == HEADER_SIZE);

/// Read a little-endian u32 from bytes at the given offset.
#[inline]
pub(crate) fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Half-open byte range `[offset, offset + size)` inside the blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub offset: u64,
    pub size: u64,
}

impl Region {
    #[inline]
    pub fn end(self) -> u64 {
        self.offset + self.size
    }

    /// Empty regions never overlap anything.
    pub fn overlaps(self, other: Region) -> bool {
        self.size > 0 && other.size > 0 && self.offset < other.end() && other.offset < self.end()
    }
}

impl TableDesc {
    fn region(self, entry_size: usize) -> Region {
        Region {
            offset: u64::from(self.entries_offset),
            size: u64::from(self.num_entries) * entry_size as u64,
        }
    }
}

impl ContentDesc {
    fn region(self) -> Region {
        Region {
            offset: u64::from(self.contents_offset),
            size: u64::from(self.contents_size),
        }
    }
}

impl Header {
    /// Decode header from 64 bytes.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        let word = |i: usize| read_u32_le(bytes, i * 4);
        let table = |i: usize| TableDesc {
            num_entries: word(i),
            entries_offset: word(i + 1),
        };
        let contents = |i: usize| ContentDesc {
            contents_size: word(i),
            contents_offset: word(i + 1),
        };

        Self {
            format: word(0),
            full_size: word(1),
            string_table: table(2),
            property_table: table(4),
            section_table: table(6),
            symbol_table: table(8),
            strings: contents(10),
            properties: contents(12),
            sections: contents(14),
        }
    }

    /// Encode header to 64 bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let words = [
            self.format,
            self.full_size,
            self.string_table.num_entries,
            self.string_table.entries_offset,
            self.property_table.num_entries,
            self.property_table.entries_offset,
            self.section_table.num_entries,
            self.section_table.entries_offset,
            self.symbol_table.num_entries,
            self.symbol_table.entries_offset,
            self.strings.contents_size,
            self.strings.contents_offset,
            self.properties.contents_size,
            self.properties.contents_offset,
            self.sections.contents_size,
            self.sections.contents_offset,
        ];

        let mut bytes = [0u8; HEADER_SIZE];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// The seven regions in header order: four tables, then three content blocks.
    pub fn regions(&self) -> [Region; 7] {
        [
            self.string_table.region(STRING_ENTRY_SIZE),
            self.property_table.region(PROPERTY_ENTRY_SIZE),
            self.section_table.region(SECTION_ENTRY_SIZE),
            self.symbol_table.region(SYMBOL_ENTRY_SIZE),
            self.strings.region(),
            self.properties.region(),
            self.sections.region(),
        ]
    }

    /// Check that every region fits the blob and no two regions overlap.
    ///
    /// Must pass before any table entry or content byte is trusted.
    pub fn is_valid(&self) -> bool {
        let full_size = u64::from(self.full_size);
        let regions = self.regions();

        if regions.iter().any(|r| r.end() > full_size) {
            return false;
        }

        // symbols have no contents of their own
        let needs_contents = [
            (self.string_table, self.strings),
            (self.property_table, self.properties),
            (self.section_table, self.sections),
        ];
        if needs_contents
            .iter()
            .any(|(table, contents)| table.num_entries > 0 && contents.contents_size == 0)
        {
            return false;
        }

        for (i, a) in regions.iter().enumerate() {
            if regions[i + 1..].iter().any(|b| a.overlaps(*b)) {
                return false;
            }
        }

        true
    }
}

/// Free-function form of [`Header::is_valid`].
pub fn check_header_validity(header: &Header) -> bool {
    header.is_valid()
}
