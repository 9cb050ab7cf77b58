//! The memory unit: four bytes that every scalar view aliases.
//!
//! Multi-lane views are little-endian: lane 0 occupies the lowest-addressed
//! bytes of the unit.

use std::fmt;

use half::f16;

/// Size of a memory unit in bytes.
pub const UNIT_SIZE: usize = 4;

/// Smallest addressable quantum of Port memory.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(C, align(4))]
pub struct MemoryUnit([u8; UNIT_SIZE]);

const _: () = assert!(std::mem::size_of::<MemoryUnit>() == UNIT_SIZE);
const _: () = assert!(std::mem::align_of::<MemoryUnit>() == UNIT_SIZE);

impl fmt::Debug for MemoryUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryUnit({:#010x})", self.as_uint())
    }
}

impl MemoryUnit {
    pub const ZERO: Self = Self([0; UNIT_SIZE]);

    #[inline]
    pub const fn from_bytes(bytes: [u8; UNIT_SIZE]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; UNIT_SIZE] {
        self.0
    }

    #[inline]
    pub const fn from_uint(value: u32) -> Self {
        Self(value.to_le_bytes())
    }

    #[inline]
    pub const fn as_uint(self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    #[inline]
    pub const fn from_sint(value: i32) -> Self {
        Self(value.to_le_bytes())
    }

    #[inline]
    pub const fn as_sint(self) -> i32 {
        i32::from_le_bytes(self.0)
    }

    #[inline]
    pub fn from_float(value: f32) -> Self {
        Self(value.to_le_bytes())
    }

    #[inline]
    pub fn as_float(self) -> f32 {
        f32::from_le_bytes(self.0)
    }

    pub const fn from_uint_half(lanes: [u16; 2]) -> Self {
        let [a0, a1] = lanes[0].to_le_bytes();
        let [b0, b1] = lanes[1].to_le_bytes();
        Self([a0, a1, b0, b1])
    }

    pub const fn as_uint_half(self) -> [u16; 2] {
        let [a0, a1, b0, b1] = self.0;
        [u16::from_le_bytes([a0, a1]), u16::from_le_bytes([b0, b1])]
    }

    pub const fn from_sint_half(lanes: [i16; 2]) -> Self {
        Self::from_uint_half([lanes[0] as u16, lanes[1] as u16])
    }

    pub const fn as_sint_half(self) -> [i16; 2] {
        let [a, b] = self.as_uint_half();
        [a as i16, b as i16]
    }

    #[inline]
    pub const fn from_uint_quarter(lanes: [u8; 4]) -> Self {
        Self(lanes)
    }

    #[inline]
    pub const fn as_uint_quarter(self) -> [u8; 4] {
        self.0
    }

    pub const fn from_sint_quarter(lanes: [i8; 4]) -> Self {
        Self([lanes[0] as u8, lanes[1] as u8, lanes[2] as u8, lanes[3] as u8])
    }

    pub const fn as_sint_quarter(self) -> [i8; 4] {
        let [a, b, c, d] = self.0;
        [a as i8, b as i8, c as i8, d as i8]
    }

    /// Two float16 values, stored as raw bit patterns.
    pub fn from_float_half(lanes: [f16; 2]) -> Self {
        Self::from_uint_half([lanes[0].to_bits(), lanes[1].to_bits()])
    }

    pub fn as_float_half(self) -> [f16; 2] {
        let [a, b] = self.as_uint_half();
        [f16::from_bits(a), f16::from_bits(b)]
    }

    #[inline]
    pub const fn from_mem_ref(reference: i32) -> Self {
        Self::from_sint(reference)
    }

    #[inline]
    pub const fn as_mem_ref(self) -> i32 {
        self.as_sint()
    }

    #[inline]
    pub const fn from_mem_ref_half(references: [i16; 2]) -> Self {
        Self::from_sint_half(references)
    }

    #[inline]
    pub const fn as_mem_ref_half(self) -> [i16; 2] {
        self.as_sint_half()
    }

    #[inline]
    pub const fn from_mem_ref_quarter(references: [i8; 4]) -> Self {
        Self::from_sint_quarter(references)
    }

    #[inline]
    pub const fn as_mem_ref_quarter(self) -> [i8; 4] {
        self.as_sint_quarter()
    }
}

/// Two adjacent memory units holding one 64-bit value.
///
/// Unit 0 holds the low half. Conversions go through byte arrays, so a pair
/// taken from any unit index composes correctly.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(C, align(4))]
pub struct MemoryUnitDouble([MemoryUnit; 2]);

const _: () = assert!(std::mem::size_of::<MemoryUnitDouble>() == 2 * UNIT_SIZE);

impl fmt::Debug for MemoryUnitDouble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryUnitDouble({:#018x})", self.as_uint())
    }
}

impl MemoryUnitDouble {
    #[inline]
    pub const fn from_units(low: MemoryUnit, high: MemoryUnit) -> Self {
        Self([low, high])
    }

    #[inline]
    pub const fn units(self) -> [MemoryUnit; 2] {
        self.0
    }

    /// Pair starting at `index`. Any unit index is accepted.
    pub fn at(units: &[MemoryUnit], index: usize) -> Self {
        Self([units[index], units[index + 1]])
    }

    pub const fn from_bytes(bytes: [u8; 2 * UNIT_SIZE]) -> Self {
        let [a, b, c, d, e, f, g, h] = bytes;
        Self([
            MemoryUnit::from_bytes([a, b, c, d]),
            MemoryUnit::from_bytes([e, f, g, h]),
        ])
    }

    pub const fn to_bytes(self) -> [u8; 2 * UNIT_SIZE] {
        let [a, b, c, d] = self.0[0].to_bytes();
        let [e, f, g, h] = self.0[1].to_bytes();
        [a, b, c, d, e, f, g, h]
    }

    #[inline]
    pub const fn from_uint(value: u64) -> Self {
        Self::from_bytes(value.to_le_bytes())
    }

    #[inline]
    pub const fn as_uint(self) -> u64 {
        u64::from_le_bytes(self.to_bytes())
    }

    #[inline]
    pub const fn from_sint(value: i64) -> Self {
        Self::from_bytes(value.to_le_bytes())
    }

    #[inline]
    pub const fn as_sint(self) -> i64 {
        i64::from_le_bytes(self.to_bytes())
    }

    #[inline]
    pub fn from_float(value: f64) -> Self {
        Self::from_bytes(value.to_le_bytes())
    }

    #[inline]
    pub fn as_float(self) -> f64 {
        f64::from_le_bytes(self.to_bytes())
    }
}

/// View a unit slice as its underlying bytes.
#[inline]
pub fn units_as_bytes(units: &[MemoryUnit]) -> &[u8] {
    // SAFETY: MemoryUnit is repr(C) over [u8; 4] with no padding, so the slice
    // covers exactly `len * 4` initialized bytes, and u8 has alignment 1.
    unsafe { std::slice::from_raw_parts(units.as_ptr().cast::<u8>(), units.len() * UNIT_SIZE) }
}

/// Mutable byte view of a unit slice.
#[inline]
pub fn units_as_bytes_mut(units: &mut [MemoryUnit]) -> &mut [u8] {
    // SAFETY: same layout argument as `units_as_bytes`; every byte pattern is a
    // valid MemoryUnit, so writes through the byte view cannot break invariants.
    unsafe {
        std::slice::from_raw_parts_mut(units.as_mut_ptr().cast::<u8>(), units.len() * UNIT_SIZE)
    }
}

/// Number of units needed to hold `size` bytes.
#[inline]
pub const fn units_for_bytes(size: usize) -> usize {
    size.div_ceil(UNIT_SIZE)
}

/// Copy bytes into fresh units, zero-padding the last one.
pub fn units_from_bytes(bytes: &[u8]) -> Vec<MemoryUnit> {
    let mut units = vec![MemoryUnit::ZERO; units_for_bytes(bytes.len())];
    units_as_bytes_mut(&mut units)[..bytes.len()].copy_from_slice(bytes);
    units
}
