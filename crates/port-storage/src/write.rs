//! Writing a data storage.
//!
//! Tables are laid out string, property, section, symbol, followed by the
//! string, property and section contents. Everything is contiguous with no
//! padding, starting right after the header.

use std::io::Write;

use crate::constants::{
    HEADER_SIZE, NO_NAME, PAST_END, PROPERTY_ENTRY_SIZE, SECTION_ENTRY_SIZE, STRING_ENTRY_SIZE,
    SYMBOL_ENTRY_SIZE,
};
use crate::error::WriteError;
use crate::header::{ContentDesc, Header, TableDesc};
use crate::ids::StringId;
use crate::storage::DataStorage;
use crate::tables::{BlockEntry, StringEntry, SymbolEntry, TableEntry};

fn name_idx(name: Option<StringId>) -> u32 {
    name.map_or(NO_NAME, |id| id.0)
}

/// Running offset accumulator for one kind of region.
struct Running(u64);

impl Running {
    /// Reserve `size` bytes and return where they start.
    fn take(&mut self, size: u64) -> u32 {
        let start = self.0;
        self.0 += size;
        // total is checked against u32::MAX before any offset is used
        start as u32
    }
}

fn encode_table<E: TableEntry>(entries: impl ExactSizeIterator<Item = E>) -> Vec<u8> {
    let mut out = Vec::with_capacity(entries.len() * E::SIZE);
    for entry in entries {
        entry.encode(&mut out);
    }
    out
}

impl DataStorage {
    /// The header [`write_to`](Self::write_to) would emit.
    ///
    /// Fails when the blob would not fit 32-bit sizes or when a name, section
    /// index or symbol value does not refer to something in the storage.
    pub fn layout(&self, format: u32) -> Result<Header, WriteError> {
        let table_sizes = [
            self.strings.len() * STRING_ENTRY_SIZE,
            self.properties.len() * PROPERTY_ENTRY_SIZE,
            self.sections.len() * SECTION_ENTRY_SIZE,
            self.symbols.len() * SYMBOL_ENTRY_SIZE,
        ]
        .map(|size| size as u64);

        let strings_size: u64 = self.strings.iter().map(|s| s.as_bytes().len() as u64).sum();
        let properties_size: u64 = self.properties.iter().map(|p| p.value.len() as u64).sum();
        let sections_size: u64 = self.sections.iter().map(|s| s.content.len() as u64).sum();

        let full_size =
            table_sizes.iter().sum::<u64>() + strings_size + properties_size + sections_size;
        if full_size > u64::from(u32::MAX) {
            return Err(WriteError::TooLarge(full_size));
        }

        self.check_references()?;

        let mut cursor = Running(0);
        let mut table = |num_entries: usize, size: u64| TableDesc {
            num_entries: num_entries as u32,
            entries_offset: cursor.take(size),
        };
        let string_table = table(self.strings.len(), table_sizes[0]);
        let property_table = table(self.properties.len(), table_sizes[1]);
        let section_table = table(self.sections.len(), table_sizes[2]);
        let symbol_table = table(self.symbols.len(), table_sizes[3]);

        let mut contents = |size: u64| ContentDesc {
            contents_size: size as u32,
            contents_offset: cursor.take(size),
        };
        let strings = contents(strings_size);
        let properties = contents(properties_size);
        let sections = contents(sections_size);

        Ok(Header {
            format,
            full_size: full_size as u32,
            string_table,
            property_table,
            section_table,
            symbol_table,
            strings,
            properties,
            sections,
        })
    }

    /// Size of the blob after the header, without writing anything.
    pub fn measure(&self) -> Result<u32, WriteError> {
        Ok(self.layout(0)?.full_size)
    }

    /// Write the storage as a blob tagged with `format`; returns `full_size`.
    ///
    /// Nothing is written when the layout fails. An I/O failure midway leaves
    /// a partial blob; cleaning up is the caller's business.
    #[tracing::instrument(skip_all, fields(format = format))]
    pub fn write_to<W: Write>(&self, writer: &mut W, format: u32) -> Result<u32, WriteError> {
        let header = self
            .layout(format)
            .inspect_err(|err| tracing::debug!(code = err.code(), %err, "refusing to write"))?;

        self.write_blob(writer, &header)
            .inspect_err(|err| tracing::debug!(%err, "write failed"))?;

        tracing::debug!(
            full_size = header.full_size,
            total = HEADER_SIZE + header.full_size as usize,
            "wrote data storage"
        );
        Ok(header.full_size)
    }

    fn write_blob<W: Write>(&self, writer: &mut W, header: &Header) -> Result<(), WriteError> {
        writer.write_all(&header.to_bytes())?;

        let mut offset = Running(0);
        writer.write_all(&encode_table(self.strings.iter().map(|s| {
            let length = s.as_bytes().len() as u64;
            StringEntry {
                length: length as u32,
                offset: offset.take(length),
            }
        })))?;

        let mut offset = Running(0);
        writer.write_all(&encode_table(self.properties.iter().map(|p| {
            let size = p.value.len() as u64;
            BlockEntry {
                name_str_idx: name_idx(p.name),
                size: size as u32,
                offset: offset.take(size),
            }
        })))?;

        let mut offset = Running(0);
        writer.write_all(&encode_table(self.sections.iter().map(|s| {
            let size = s.content.len() as u64;
            BlockEntry {
                name_str_idx: name_idx(s.name),
                size: size as u32,
                offset: offset.take(size),
            }
        })))?;

        writer.write_all(&encode_table(self.symbols.iter().map(|s| {
            let at_end = self
                .section(s.section)
                .is_some_and(|section| s.value as usize == section.content.len());
            SymbolEntry {
                name_str_idx: name_idx(s.name),
                section_idx: s.section.0,
                value: if at_end { PAST_END } else { s.value },
            }
        })))?;

        for string in &self.strings {
            writer.write_all(string.as_bytes())?;
        }
        for property in &self.properties {
            writer.write_all(&property.value)?;
        }
        for section in &self.sections {
            writer.write_all(&section.content)?;
        }

        writer.flush()?;
        Ok(())
    }
}
