//! Data storage file format constants.

use std::ffi::CStr;

/// Header size in bytes. Every offset in the header is relative to its end.
pub const HEADER_SIZE: usize = 64;

/// String table entry: length, offset.
pub const STRING_ENTRY_SIZE: usize = 8;
/// Property table entry: name, size, offset.
pub const PROPERTY_ENTRY_SIZE: usize = 12;
/// Section table entry: name, size, offset.
pub const SECTION_ENTRY_SIZE: usize = 12;
/// Symbol table entry: name, section, value.
pub const SYMBOL_ENTRY_SIZE: usize = 12;

/// `name_str_idx` of an unnamed entry.
pub const NO_NAME: u32 = u32::MAX;

/// Symbol `value` pointing one past the end of its section.
pub const PAST_END: u32 = u32::MAX;

/// Property holding the root location of a segmented memory image.
pub const ROOT_PROPERTY: &CStr = c"root";
