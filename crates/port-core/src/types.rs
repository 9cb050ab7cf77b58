//! Scalar type aliases.
//!
//! Widths are named relative to the memory unit: a quarter is one byte, a
//! half is two, a single is one full unit and a double spans two units.

pub use half::f16;

pub type UintQuarter = u8;
pub type UintHalf = u16;
pub type UintSingle = u32;
pub type UintDouble = u64;

pub type SintQuarter = i8;
pub type SintHalf = i16;
pub type SintSingle = i32;
pub type SintDouble = i64;

pub type FloatHalf = f16;
pub type FloatSingle = f32;
pub type FloatDouble = f64;

/// Memory reference of single width.
pub type MemoryRef = i32;
/// Memory reference of half width.
pub type MemoryRefHalf = i16;
/// Memory reference of quarter width.
pub type MemoryRefQuarter = i8;

/// Default unsigned integer type (`default-integer-64` selects 64 bits).
#[cfg(feature = "default-integer-64")]
pub type Uint = UintDouble;
#[cfg(not(feature = "default-integer-64"))]
pub type Uint = UintSingle;

/// Default signed integer type (`default-integer-64` selects 64 bits).
#[cfg(feature = "default-integer-64")]
pub type Sint = SintDouble;
#[cfg(not(feature = "default-integer-64"))]
pub type Sint = SintSingle;

/// Default floating-point type (`default-float-64` selects 64 bits).
#[cfg(feature = "default-float-64")]
pub type Float = FloatDouble;
#[cfg(not(feature = "default-float-64"))]
pub type Float = FloatSingle;
