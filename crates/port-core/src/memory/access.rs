//! Typed accessors over unit slices.
//!
//! Element `i` of a type `w` bytes wide starts at byte `i * w` of the slice.
//! Narrow elements pack inside a unit (lane `i % (4 / w)` of unit `i / (4 / w)`),
//! single-width elements map 1:1 to units and double-width elements span
//! units `2i` and `2i + 1`, low half first.

use std::mem::size_of;

use half::f16;

use crate::float::{f16_bits_to_f32, f32_to_f16_bits};

use super::unit::{MemoryUnit, units_as_bytes, units_as_bytes_mut};

/// A scalar that can be stored in memory units.
///
/// `Value` is what callers read and write. It equals `Self` for everything
/// except float16, which is exchanged as `f32`.
pub trait Scalar: Copy {
    /// Width in bytes.
    const SIZE: usize;

    type Value: Copy;

    /// Decode from exactly `SIZE` little-endian bytes.
    fn decode(bytes: &[u8]) -> Self::Value;

    /// Encode into exactly `SIZE` bytes.
    fn encode(value: Self::Value, bytes: &mut [u8]);
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl Scalar for $ty {
            const SIZE: usize = size_of::<$ty>();
            type Value = $ty;

            #[inline]
            fn decode(bytes: &[u8]) -> $ty {
                let mut raw = [0u8; size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                <$ty>::from_le_bytes(raw)
            }

            #[inline]
            fn encode(value: $ty, bytes: &mut [u8]) {
                bytes.copy_from_slice(&value.to_le_bytes());
            }
        }
    )*};
}

impl_scalar!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl Scalar for f16 {
    const SIZE: usize = 2;
    type Value = f32;

    #[inline]
    fn decode(bytes: &[u8]) -> f32 {
        f16_bits_to_f32(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    #[inline]
    fn encode(value: f32, bytes: &mut [u8]) {
        bytes.copy_from_slice(&f32_to_f16_bits(value).to_le_bytes());
    }
}

/// Lane count marker for vector accessors.
pub struct Lanes<const N: usize>;

/// Implemented for the supported vector lengths: 1, 2, 3, 4, 8 and 16.
pub trait SupportedLanes {}

impl SupportedLanes for Lanes<1> {}
impl SupportedLanes for Lanes<2> {}
impl SupportedLanes for Lanes<3> {}
impl SupportedLanes for Lanes<4> {}
impl SupportedLanes for Lanes<8> {}
impl SupportedLanes for Lanes<16> {}

#[inline]
fn element_range<T: Scalar>(len: usize, index: usize) -> std::ops::Range<usize> {
    let start = index * T::SIZE;
    debug_assert!(
        start + T::SIZE <= len,
        "element {index} of width {} is outside {len} bytes",
        T::SIZE
    );
    start..start + T::SIZE
}

/// Read the element at `index`.
#[inline]
pub fn read<T: Scalar>(units: &[MemoryUnit], index: usize) -> T::Value {
    let bytes = units_as_bytes(units);
    T::decode(&bytes[element_range::<T>(bytes.len(), index)])
}

/// Write the element at `index`, leaving neighbouring lanes untouched.
#[inline]
pub fn write<T: Scalar>(units: &mut [MemoryUnit], index: usize, value: T::Value) {
    let bytes = units_as_bytes_mut(units);
    let range = element_range::<T>(bytes.len(), index);
    T::encode(value, &mut bytes[range]);
}

/// Read `N` consecutive elements starting at element `index`.
///
/// Lane 0 comes from `index`. The start need not be a multiple of `N`.
pub fn read_vector<T: Scalar, const N: usize>(units: &[MemoryUnit], index: usize) -> [T::Value; N]
where
    Lanes<N>: SupportedLanes,
{
    std::array::from_fn(|lane| read::<T>(units, index + lane))
}

/// Write `N` consecutive elements starting at element `index`.
pub fn write_vector<T: Scalar, const N: usize>(
    units: &mut [MemoryUnit],
    index: usize,
    values: [T::Value; N],
) where
    Lanes<N>: SupportedLanes,
{
    for (lane, value) in values.into_iter().enumerate() {
        write::<T>(units, index + lane, value);
    }
}
