//! Test fixtures shared by the unit tests.

use crate::{DataStorage, SectionId};

/// Concatenate little-endian words.
pub fn words(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// Pack four ASCII bytes into a word, first byte lowest.
pub fn text(chunk: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*chunk)
}

/// Three strings, two 8-byte sections, four symbols (two at section ends)
/// and two 4-byte properties.
pub fn sample_storage() -> DataStorage {
    let mut storage = DataStorage::new();
    let hello = storage.intern_string(c"hello");
    let world = storage.intern_string(c"world");
    let bang = storage.intern_string(c"!!!");

    let digits = storage.add_section(Some(hello), *b"12345678");
    let letters = storage.add_section(Some(world), *b"abcdefgh");

    storage.add_symbol(Some(hello), digits, 0);
    storage.add_symbol(Some(world), digits, 8);
    storage.add_symbol(Some(bang), letters, 0);
    storage.add_symbol(Some(bang), letters, 8);

    storage.add_property(Some(hello), 0x1234_5678u32.to_le_bytes());
    storage.add_property(Some(world), 0xABCD_EF01u32.to_le_bytes());

    storage
}

/// Storage describing a two-segment memory image.
///
/// Symbols sit at (0, 0), (1, 4) and (0, 8); the root is at (1, 7).
pub fn segmented_storage() -> DataStorage {
    let mut storage = DataStorage::new();
    let root = storage.intern_string(c"root");
    let section = storage.intern_string(c"section");
    let symbol = storage.intern_string(c"symbol");

    storage.add_property(Some(root), words(&[1, 7]));
    storage.add_section(Some(section), *b"12345678");
    storage.add_section(Some(section), *b"abcdefgh");

    storage.add_symbol(Some(symbol), SectionId(0), 0);
    storage.add_symbol(Some(symbol), SectionId(1), 4);
    storage.add_symbol(Some(symbol), SectionId(0), 8);

    storage
}
