//! Errors reported by the data storage codec.

use std::fmt;
use std::io;

/// Which table an offending entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    String,
    Property,
    Section,
    Symbol,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Property => "property",
            Self::Section => "section",
            Self::Symbol => "symbol",
        })
    }
}

/// Structural problems found in a data storage file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Corruption {
    #[error("header regions exceed the blob or overlap")]
    InvalidHeader,
    #[error("{table} table entry {index} is out of range")]
    BadEntry { table: TableKind, index: u32 },
    #[error("string {index} contains a NUL byte")]
    NulInString { index: u32 },
}

/// Errors from loading a data storage.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("format {found:#010x} does not match magic {magic:#010x} under mask {mask:#010x}")]
    FormatMismatch { found: u32, mask: u32, magic: u32 },
    #[error("corrupted data storage: {0}")]
    Corrupted(#[from] Corruption),
    #[error("seek failed: {0}")]
    Seek(#[source] io::Error),
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
    #[error("allocation of {0} bytes failed")]
    Alloc(usize),
}

impl LoadError {
    /// Numeric code: 1 corrupted, 2 seek, 3 read, 4 allocation, 5 format mismatch.
    pub fn code(&self) -> u8 {
        match self {
            Self::Corrupted(_) => 1,
            Self::Seek(_) => 2,
            Self::Read(_) => 3,
            Self::Alloc(_) => 4,
            Self::FormatMismatch { .. } => 5,
        }
    }
}

/// A cross-reference in the in-memory model that cannot be written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BadReference {
    #[error("section {section} is named by missing string {name}")]
    SectionName { section: u32, name: u32 },
    #[error("property {property} is named by missing string {name}")]
    PropertyName { property: u32, name: u32 },
    #[error("symbol {symbol} is named by missing string {name}")]
    SymbolName { symbol: u32, name: u32 },
    #[error("symbol {symbol} refers to missing section {section}")]
    SymbolSection { symbol: u32, section: u32 },
    #[error("symbol {symbol} value {value} is past the end of a {size}-byte section")]
    SymbolValue { symbol: u32, value: u32, size: usize },
}

/// Errors from writing a data storage.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("data storage of {0} bytes does not fit a 32-bit size")]
    TooLarge(u64),
    #[error("invalid reference: {0}")]
    InvalidReference(#[from] BadReference),
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

impl WriteError {
    /// Numeric code: 1 too large, 2 invalid reference, 3 I/O.
    pub fn code(&self) -> u8 {
        match self {
            Self::TooLarge(_) => 1,
            Self::InvalidReference(_) => 2,
            Self::Io(_) => 3,
        }
    }
}
