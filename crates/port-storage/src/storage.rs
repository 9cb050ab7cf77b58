//! In-memory data storage model.
//!
//! The storage owns every buffer it references. Unnamed entries carry `None`
//! and a symbol one past the end of its section has `value == content.len()`;
//! the on-disk sentinels exist only in the codec.

use std::ffi::{CStr, CString};

use crate::error::BadReference;
use crate::ids::{SectionId, StringId};

/// An opaque byte buffer, optionally named.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Section {
    pub name: Option<StringId>,
    pub content: Vec<u8>,
}

/// A byte position inside one section, optionally named.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub name: Option<StringId>,
    pub section: SectionId,
    pub value: u32,
}

/// A named (or unnamed) byte value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Property {
    pub name: Option<StringId>,
    pub value: Vec<u8>,
}

/// Sections, symbols, properties and the strings naming them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataStorage {
    pub strings: Vec<CString>,
    pub sections: Vec<Section>,
    pub symbols: Vec<Symbol>,
    pub properties: Vec<Property>,
}

impl DataStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every owned buffer and return to the empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
            && self.sections.is_empty()
            && self.symbols.is_empty()
            && self.properties.is_empty()
    }

    /// Intern a string, returning the existing id if it is already present.
    pub fn intern_string(&mut self, s: &CStr) -> StringId {
        if let Some(id) = self.find_string(s) {
            return id;
        }
        let id = StringId(self.strings.len() as u32);
        self.strings.push(s.to_owned());
        id
    }

    pub fn find_string(&self, s: &CStr) -> Option<StringId> {
        self.strings
            .iter()
            .position(|existing| existing.as_c_str() == s)
            .map(|i| StringId(i as u32))
    }

    pub fn string(&self, id: StringId) -> Option<&CStr> {
        self.strings.get(id.index()).map(CString::as_c_str)
    }

    /// Name of an entry, if it has one and the id is valid.
    pub fn name(&self, name: Option<StringId>) -> Option<&CStr> {
        name.and_then(|id| self.string(id))
    }

    pub fn add_section(&mut self, name: Option<StringId>, content: impl Into<Vec<u8>>) -> SectionId {
        let id = SectionId(self.sections.len() as u32);
        self.sections.push(Section {
            name,
            content: content.into(),
        });
        id
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id.index())
    }

    /// Add a symbol and return its index.
    pub fn add_symbol(&mut self, name: Option<StringId>, section: SectionId, value: u32) -> usize {
        self.symbols.push(Symbol {
            name,
            section,
            value,
        });
        self.symbols.len() - 1
    }

    /// Add a property and return its index.
    pub fn add_property(&mut self, name: Option<StringId>, value: impl Into<Vec<u8>>) -> usize {
        self.properties.push(Property {
            name,
            value: value.into(),
        });
        self.properties.len() - 1
    }

    /// First property with the given name.
    pub fn property_named(&self, name: &CStr) -> Option<&Property> {
        let id = self.find_string(name)?;
        self.properties.iter().find(|p| p.name == Some(id))
    }

    /// First symbol with the given name.
    pub fn symbol_named(&self, name: &CStr) -> Option<&Symbol> {
        let id = self.find_string(name)?;
        self.symbols.iter().find(|s| s.name == Some(id))
    }

    /// Check every name, section index and symbol value against the model.
    pub fn check_references(&self) -> Result<(), BadReference> {
        let num_strings = self.strings.len();
        let missing = |name: Option<StringId>| name.filter(|id| id.index() >= num_strings);

        for (i, section) in self.sections.iter().enumerate() {
            if let Some(name) = missing(section.name) {
                return Err(BadReference::SectionName {
                    section: i as u32,
                    name: name.0,
                });
            }
        }

        for (i, property) in self.properties.iter().enumerate() {
            if let Some(name) = missing(property.name) {
                return Err(BadReference::PropertyName {
                    property: i as u32,
                    name: name.0,
                });
            }
        }

        for (i, symbol) in self.symbols.iter().enumerate() {
            let index = i as u32;
            if let Some(name) = missing(symbol.name) {
                return Err(BadReference::SymbolName {
                    symbol: index,
                    name: name.0,
                });
            }
            let Some(section) = self.section(symbol.section) else {
                return Err(BadReference::SymbolSection {
                    symbol: index,
                    section: symbol.section.0,
                });
            };
            if symbol.value as usize > section.content.len() {
                return Err(BadReference::SymbolValue {
                    symbol: index,
                    value: symbol.value,
                    size: section.content.len(),
                });
            }
        }

        Ok(())
    }
}
