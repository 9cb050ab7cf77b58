//! Data storage model and binary file format for Port.
//!
//! This crate contains:
//! - The data storage model (strings, sections, symbols, properties)
//! - The file header and its validity check
//! - Loading from and writing to byte streams
//! - Segmented memory images built from a storage
//! - A text dump for debugging

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod constants;
pub mod dump;
mod error;
mod header;
mod ids;
mod load;
mod segmented;
mod storage;
mod tables;
mod write;

pub use constants::{
    HEADER_SIZE, NO_NAME, PAST_END, PROPERTY_ENTRY_SIZE, ROOT_PROPERTY, SECTION_ENTRY_SIZE,
    STRING_ENTRY_SIZE, SYMBOL_ENTRY_SIZE,
};
pub use dump::dump;
pub use error::{BadReference, Corruption, LoadError, TableKind, WriteError};
pub use header::{ContentDesc, Header, Region, TableDesc, check_header_validity};
pub use ids::{SectionId, StringId};
pub use load::FormatCheck;
pub use segmented::{Location, Segment, SegmentError, SegmentedMemory};
pub use storage::{DataStorage, Property, Section, Symbol};
pub use tables::{BlockEntry, PropertyEntry, SectionEntry, StringEntry, SymbolEntry, TableEntry};

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
mod load_tests;
