//! Loading a data storage from a seekable stream.
//!
//! The header is read at the current position; that position plus the header
//! size is the global offset every other offset is relative to. On success the
//! stream is left at `global_offset + full_size`, so blobs can be chained.

use std::ffi::CString;
use std::io::{self, Read, Seek, SeekFrom};

use crate::constants::{HEADER_SIZE, NO_NAME, PAST_END};
use crate::error::{Corruption, LoadError, TableKind};
use crate::header::{Header, TableDesc};
use crate::ids::{SectionId, StringId};
use crate::storage::{DataStorage, Property, Section, Symbol};
use crate::tables::{PropertyEntry, SectionEntry, StringEntry, SymbolEntry, TableEntry};

/// Which `format` values a reader accepts: `(format & mask) == magic`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FormatCheck {
    pub mask: u32,
    pub magic: u32,
}

impl FormatCheck {
    /// Accept any format.
    pub const ANY: Self = Self { mask: 0, magic: 0 };

    pub const fn new(mask: u32, magic: u32) -> Self {
        Self { mask, magic }
    }

    /// Accept exactly `magic`.
    pub const fn exact(magic: u32) -> Self {
        Self {
            mask: u32::MAX,
            magic,
        }
    }

    pub fn matches(&self, format: u32) -> bool {
        format & self.mask == self.magic
    }
}

#[derive(Debug, Default)]
struct Tables {
    strings: Vec<StringEntry>,
    properties: Vec<PropertyEntry>,
    sections: Vec<SectionEntry>,
    symbols: Vec<SymbolEntry>,
}

struct Loader<'r, R> {
    reader: &'r mut R,
    header: Header,
    global_offset: u64,
    tables: Tables,
}

fn alloc_vec<T>(len: usize) -> Result<Vec<T>, LoadError> {
    let mut items = Vec::new();
    items
        .try_reserve_exact(len)
        .map_err(|_| LoadError::Alloc(len.saturating_mul(size_of::<T>())))?;
    Ok(items)
}

fn valid_name(name_str_idx: u32, num_strings: usize) -> bool {
    name_str_idx == NO_NAME || (name_str_idx as usize) < num_strings
}

fn name_id(name_str_idx: u32) -> Option<StringId> {
    (name_str_idx != NO_NAME).then_some(StringId(name_str_idx))
}

fn bad_entry(table: TableKind, index: usize) -> LoadError {
    LoadError::Corrupted(Corruption::BadEntry {
        table,
        index: index as u32,
    })
}

impl<'r, R: Read + Seek> Loader<'r, R> {
    /// Read and check the header, then read and check all four tables.
    fn open(reader: &'r mut R, check: FormatCheck) -> Result<Self, LoadError> {
        let mut bytes = [0u8; HEADER_SIZE];
        reader.read_exact(&mut bytes).map_err(LoadError::Read)?;
        let header = Header::from_bytes(&bytes);

        let global_offset = reader.stream_position().map_err(LoadError::Seek)?;

        if !check.matches(header.format) {
            return Err(LoadError::FormatMismatch {
                found: header.format,
                mask: check.mask,
                magic: check.magic,
            });
        }
        if !header.is_valid() {
            return Err(Corruption::InvalidHeader.into());
        }

        let mut loader = Self {
            reader,
            header,
            global_offset,
            tables: Tables::default(),
        };
        loader.tables = Tables {
            strings: loader.read_table(header.string_table)?,
            properties: loader.read_table(header.property_table)?,
            sections: loader.read_table(header.section_table)?,
            symbols: loader.read_table(header.symbol_table)?,
        };
        loader.validate()?;
        Ok(loader)
    }

    fn seek(&mut self, offset: u64) -> Result<(), LoadError> {
        self.reader
            .seek(SeekFrom::Start(self.global_offset + offset))
            .map_err(LoadError::Seek)?;
        Ok(())
    }

    /// Read `len` bytes at `offset` past the global offset.
    ///
    /// Only the reservation is sized by the header; pages are touched as the
    /// stream delivers bytes, so a short stream fails before `len` is committed.
    fn read_bytes(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, LoadError> {
        let mut buf = alloc_vec::<u8>(len)?;
        if len > 0 {
            self.seek(offset)?;
            let read = Read::take(&mut *self.reader, len as u64)
                .read_to_end(&mut buf)
                .map_err(LoadError::Read)?;
            if read < len {
                return Err(LoadError::Read(io::ErrorKind::UnexpectedEof.into()));
            }
        }
        Ok(buf)
    }

    fn read_table<E: TableEntry>(&mut self, desc: TableDesc) -> Result<Vec<E>, LoadError> {
        let count = desc.num_entries as usize;
        let bytes = self.read_bytes(u64::from(desc.entries_offset), count * E::SIZE)?;
        let mut entries = alloc_vec(count)?;
        entries.extend(bytes.chunks_exact(E::SIZE).map(E::decode));
        Ok(entries)
    }

    fn validate(&self) -> Result<(), LoadError> {
        let header = &self.header;
        let tables = &self.tables;
        let num_strings = tables.strings.len();

        if let Some(i) = tables
            .strings
            .iter()
            .position(|e| !e.fits(header.strings.contents_size))
        {
            return Err(bad_entry(TableKind::String, i));
        }

        if let Some(i) = tables.properties.iter().position(|e| {
            !valid_name(e.name_str_idx, num_strings) || !e.fits(header.properties.contents_size)
        }) {
            return Err(bad_entry(TableKind::Property, i));
        }

        if let Some(i) = tables.sections.iter().position(|e| {
            !valid_name(e.name_str_idx, num_strings) || !e.fits(header.sections.contents_size)
        }) {
            return Err(bad_entry(TableKind::Section, i));
        }

        if let Some(i) = tables.symbols.iter().position(|e| {
            let Some(section) = tables.sections.get(e.section_idx as usize) else {
                return true;
            };
            !valid_name(e.name_str_idx, num_strings)
                || (e.value != PAST_END && e.value > section.size)
        }) {
            return Err(bad_entry(TableKind::Symbol, i));
        }

        Ok(())
    }

    /// Read contents and build the in-memory model.
    fn materialize(&mut self) -> Result<DataStorage, LoadError> {
        let tables = std::mem::take(&mut self.tables);
        let header = self.header;
        let mut storage = DataStorage::new();

        storage.strings = alloc_vec(tables.strings.len())?;
        for (i, entry) in tables.strings.iter().enumerate() {
            let offset = u64::from(header.strings.contents_offset) + u64::from(entry.offset);
            let bytes = self.read_bytes(offset, entry.length as usize)?;
            let string = CString::new(bytes).map_err(|_| Corruption::NulInString { index: i as u32 })?;
            storage.strings.push(string);
        }

        storage.properties = alloc_vec(tables.properties.len())?;
        for entry in &tables.properties {
            let offset = u64::from(header.properties.contents_offset) + u64::from(entry.offset);
            storage.properties.push(Property {
                name: name_id(entry.name_str_idx),
                value: self.read_bytes(offset, entry.size as usize)?,
            });
        }

        storage.sections = alloc_vec(tables.sections.len())?;
        for entry in &tables.sections {
            let offset = u64::from(header.sections.contents_offset) + u64::from(entry.offset);
            storage.sections.push(Section {
                name: name_id(entry.name_str_idx),
                content: self.read_bytes(offset, entry.size as usize)?,
            });
        }

        storage.symbols = alloc_vec(tables.symbols.len())?;
        for entry in &tables.symbols {
            let value = match entry.value {
                PAST_END => tables.sections[entry.section_idx as usize].size,
                value => value,
            };
            storage.symbols.push(Symbol {
                name: name_id(entry.name_str_idx),
                section: SectionId(entry.section_idx),
                value,
            });
        }

        Ok(storage)
    }

    /// Move past the blob and hand back its format.
    fn finish(self) -> Result<u32, LoadError> {
        self.reader
            .seek(SeekFrom::Start(self.global_offset + u64::from(self.header.full_size)))
            .map_err(LoadError::Seek)?;
        Ok(self.header.format)
    }
}

fn load<R: Read + Seek>(reader: &mut R, check: FormatCheck) -> Result<(DataStorage, u32), LoadError> {
    let mut loader = Loader::open(reader, check)?;
    let storage = loader.materialize()?;
    let format = loader.finish()?;
    Ok((storage, format))
}

impl DataStorage {
    /// Load a data storage, returning it together with the header's format.
    ///
    /// On failure nothing is returned and the stream position is unspecified.
    #[tracing::instrument(skip_all, fields(mask = check.mask, magic = check.magic))]
    pub fn read_from<R: Read + Seek>(
        reader: &mut R,
        check: FormatCheck,
    ) -> Result<(Self, u32), LoadError> {
        let result = load(reader, check);

        match &result {
            Ok((storage, format)) => tracing::debug!(
                format = *format,
                strings = storage.strings.len(),
                properties = storage.properties.len(),
                sections = storage.sections.len(),
                symbols = storage.symbols.len(),
                "loaded data storage"
            ),
            Err(err) => tracing::debug!(code = err.code(), %err, "rejected data storage"),
        }
        result
    }

    /// Check a blob without building a storage; returns its format.
    ///
    /// Tables are read and checked, contents are not.
    #[tracing::instrument(skip_all, fields(mask = check.mask, magic = check.magic))]
    pub fn validate_from<R: Read + Seek>(
        reader: &mut R,
        check: FormatCheck,
    ) -> Result<u32, LoadError> {
        Loader::open(reader, check)
            .and_then(Loader::finish)
            .inspect_err(|err| tracing::debug!(code = err.code(), %err, "rejected data storage"))
    }
}
