//! Data storage index newtypes.

/// Index into the string table.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(transparent)]
pub struct StringId(pub u32);

impl StringId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index into the section table.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(transparent)]
pub struct SectionId(pub u32);

impl SectionId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
