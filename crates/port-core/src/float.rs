//! float16 <-> float32 conversion on raw bit patterns.
//!
//! Narrowing rounds to nearest, ties to even. Values above the float16 range
//! become infinity, NaN stays NaN.

use half::f16;

/// Widen a float16 bit pattern to float32. Exact.
#[inline]
pub fn f16_bits_to_f32(bits: u16) -> f32 {
    f16::from_bits(bits).to_f32()
}

/// Narrow a float32 to a float16 bit pattern.
#[inline]
pub fn f32_to_f16_bits(value: f32) -> u16 {
    f16::from_f32(value).to_bits()
}
