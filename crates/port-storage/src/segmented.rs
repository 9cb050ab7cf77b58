//! Segmented memory image built from a data storage.
//!
//! Each section becomes a segment of memory units, each symbol becomes an
//! entry of the pointer table that far memory references index, and the
//! `root` property (two little-endian `u32`: segment, byte offset) locates the
//! image's entry point.

use port_core::{
    Address, AddressSpace, Memory, MemoryMut, MemoryUnit, RefFormat, RefWidth, Writable,
    units_as_bytes, units_from_bytes,
};

use crate::constants::ROOT_PROPERTY;
use crate::header::read_u32_le;
use crate::storage::DataStorage;

/// A byte position inside a segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Location {
    pub segment: usize,
    pub offset: usize,
}

impl Location {
    pub const fn new(segment: usize, offset: usize) -> Self {
        Self { segment, offset }
    }
}

impl Address for Location {
    #[inline]
    fn offset_by(self, bytes: usize) -> Self {
        Self {
            offset: self.offset + bytes,
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SegmentError {
    #[error("{location:?} refers to a missing segment ({segments} segments)")]
    SegmentOutOfRange { location: Location, segments: usize },
    #[error("{location:?} is past the end of a {size}-byte segment")]
    OffsetOutOfRange { location: Location, size: usize },
}

/// Section contents stored as memory units, zero-padded to a whole unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segment {
    units: Vec<MemoryUnit>,
    size: usize,
}

impl Segment {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            units: units_from_bytes(bytes),
            size: bytes.len(),
        }
    }

    /// Size in bytes, not counting padding.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn units(&self) -> &[MemoryUnit] {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut [MemoryUnit] {
        &mut self.units
    }

    pub fn bytes(&self) -> &[u8] {
        &units_as_bytes(&self.units)[..self.size]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentedMemory {
    pub segments: Vec<Segment>,
    pub table: Vec<Location>,
    pub root: Location,
}

impl SegmentedMemory {
    /// Build an image from a storage.
    ///
    /// A missing `root` property, or one that is not exactly 8 bytes, puts the
    /// root at the start of segment 0.
    pub fn from_storage(storage: &DataStorage) -> Result<Self, SegmentError> {
        let segments: Vec<Segment> = storage
            .sections
            .iter()
            .map(|section| Segment::from_bytes(&section.content))
            .collect();

        let table: Vec<Location> = storage
            .symbols
            .iter()
            .map(|symbol| Location::new(symbol.section.index(), symbol.value as usize))
            .collect();

        let root = storage
            .property_named(ROOT_PROPERTY)
            .filter(|property| property.value.len() == 8)
            .map(|property| {
                Location::new(
                    read_u32_le(&property.value, 0) as usize,
                    read_u32_le(&property.value, 4) as usize,
                )
            });

        let memory = Self {
            segments,
            table,
            root: root.unwrap_or_default(),
        };
        if let Some(root) = root {
            memory.check(root)?;
        }
        for &location in &memory.table {
            memory.check(location)?;
        }

        tracing::debug!(
            segments = memory.segments.len(),
            table = memory.table.len(),
            root = ?memory.root,
            "built segmented memory"
        );
        Ok(memory)
    }

    fn check(&self, location: Location) -> Result<(), SegmentError> {
        let Some(segment) = self.segments.get(location.segment) else {
            return Err(SegmentError::SegmentOutOfRange {
                location,
                segments: self.segments.len(),
            });
        };
        if location.offset > segment.size() {
            return Err(SegmentError::OffsetOutOfRange {
                location,
                size: segment.size(),
            });
        }
        Ok(())
    }

    /// Follow a memory reference. Near references without a base are relative
    /// to table entry 0.
    pub fn resolve<R: RefWidth>(
        &self,
        reference: R,
        format: &RefFormat,
        base: Option<Location>,
    ) -> Location {
        port_core::resolve(reference, format, base, &self.table)
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn memory<S: AddressSpace>(&self, index: usize) -> Option<Memory<'_, S>> {
        self.segment(index).map(|segment| Memory::new(segment.units()))
    }

    pub fn memory_mut<S: Writable>(&mut self, index: usize) -> Option<MemoryMut<'_, S>> {
        self.segments
            .get_mut(index)
            .map(|segment| MemoryMut::new(segment.units_mut()))
    }

    /// Bytes from `location` to the end of its segment.
    pub fn bytes_at(&self, location: Location) -> Option<&[u8]> {
        self.segment(location.segment)?.bytes().get(location.offset..)
    }
}
