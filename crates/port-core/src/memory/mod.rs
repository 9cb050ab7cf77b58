//! Memory units and everything built on top of them.
//!
//! Memory is modelled as a slice of [`MemoryUnit`]s. Typed accessors read and
//! write scalars and short vectors at logical element indices, and memory
//! references locate data relative to a base or through a pointer table.

mod access;
mod reference;
mod space;
mod unit;

pub use access::{Lanes, Scalar, SupportedLanes, read, read_vector, write, write_vector};
pub use reference::{Address, FarFormat, NearFormat, RefFormat, RefWidth, Reference, resolve};
pub use space::{AddressSpace, Constant, Global, Local, Memory, MemoryMut, Private, Writable};
pub use unit::{
    MemoryUnit, MemoryUnitDouble, UNIT_SIZE, units_as_bytes, units_as_bytes_mut,
    units_for_bytes, units_from_bytes,
};
