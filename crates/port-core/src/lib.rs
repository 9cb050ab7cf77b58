//! Core primitives for Port.
//!
//! This crate contains:
//! - Fixed-width scalar aliases and the configurable default types
//! - The memory unit and double-unit pairing
//! - Typed read/write accessors over unit slices, per address space
//! - Memory references (near/far) and their resolution through a pointer table
//! - float16 <-> float32 conversion

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod float;
pub mod memory;
pub mod types;


pub use memory::{
    Address, AddressSpace, Constant, FarFormat, Global, Lanes, Local, Memory, MemoryMut,
    MemoryUnit, MemoryUnitDouble, NearFormat, Private, RefFormat, RefWidth, Reference, Scalar,
    SupportedLanes, UNIT_SIZE, Writable, read, read_vector, resolve, units_as_bytes,
    units_as_bytes_mut, units_for_bytes, units_from_bytes, write, write_vector,
};
