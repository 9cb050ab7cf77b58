//! Memory references: relocatable pointers stored inside memory.
//!
//! A non-negative reference is *far*: its low `num_tidx_bits` bits select an
//! entry of a pointer table and the remaining bits hold an offset from that
//! entry. A negative reference is *near*: its magnitude is an offset from a
//! caller-supplied base, or from table entry 0 when no base is given.
//! Offsets are byte offsets after the format's left shift is applied.
//!
//! Decoding does not validate the format against the reference. A format whose
//! index field does not fit the reference width, or a shift that drops bits,
//! trips a debug assertion and is otherwise unspecified.

/// Signed integer types usable as memory references.
pub trait RefWidth: Copy {
    const BITS: u32;

    fn to_i64(self) -> i64;

    fn from_i64(value: i64) -> Option<Self>;
}

macro_rules! impl_ref_width {
    ($($ty:ty),*) => {$(
        impl RefWidth for $ty {
            const BITS: u32 = <$ty>::BITS;

            #[inline]
            fn to_i64(self) -> i64 {
                i64::from(self)
            }

            #[inline]
            fn from_i64(value: i64) -> Option<Self> {
                <$ty>::try_from(value).ok()
            }
        }
    )*};
}

impl_ref_width!(i8, i16, i32);

/// Layout of far references.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FarFormat {
    /// Width of the table index field.
    pub num_tidx_bits: u32,
    /// Scale applied to the stored offset.
    pub offset_lshift: u32,
}

/// Layout of near references.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NearFormat {
    pub offset_lshift: u32,
}

/// How references of one kind are laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RefFormat {
    pub far: FarFormat,
    pub near: NearFormat,
}

/// A decoded memory reference with its offset already scaled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reference {
    Far { table_index: usize, offset: usize },
    Near { offset: usize },
}

#[inline]
fn scale(raw: u64, lshift: u32) -> usize {
    debug_assert!(
        raw.checked_shl(lshift).is_some_and(|v| v >> lshift == raw),
        "offset {raw} loses bits when shifted by {lshift}"
    );
    (raw << lshift) as usize
}

impl RefFormat {
    pub const fn new(num_tidx_bits: u32, far_offset_lshift: u32, near_offset_lshift: u32) -> Self {
        Self {
            far: FarFormat {
                num_tidx_bits,
                offset_lshift: far_offset_lshift,
            },
            near: NearFormat {
                offset_lshift: near_offset_lshift,
            },
        }
    }

    pub fn decode<R: RefWidth>(&self, reference: R) -> Reference {
        debug_assert!(
            self.far.num_tidx_bits < R::BITS,
            "{} index bits do not fit a {}-bit reference",
            self.far.num_tidx_bits,
            R::BITS
        );

        let value = reference.to_i64();
        if value >= 0 {
            let value = value as u64;
            let bits = self.far.num_tidx_bits;
            let index_mask = (1u64 << bits) - 1;
            Reference::Far {
                table_index: (value & index_mask) as usize,
                offset: scale(value >> bits, self.far.offset_lshift),
            }
        } else {
            Reference::Near {
                offset: scale(value.unsigned_abs(), self.near.offset_lshift),
            }
        }
    }

    /// Pack a table index and byte offset into a far reference.
    ///
    /// Returns `None` when the offset is not a multiple of the scale or either
    /// field overflows the reference width.
    pub fn encode_far<R: RefWidth>(&self, table_index: usize, offset: usize) -> Option<R> {
        let bits = self.far.num_tidx_bits;
        if bits >= R::BITS {
            return None;
        }
        let table_index = u64::try_from(table_index).ok()?;
        if table_index >> bits != 0 {
            return None;
        }
        let raw = unscale(offset, self.far.offset_lshift)?;
        // value bits available above the index field, sign bit excluded
        if raw >> (R::BITS - 1 - bits) != 0 {
            return None;
        }
        R::from_i64(((raw << bits) | table_index) as i64)
    }

    /// Encode a near reference. A zero offset has no near encoding.
    pub fn encode_near<R: RefWidth>(&self, offset: usize) -> Option<R> {
        let raw = unscale(offset, self.near.offset_lshift)?;
        if raw == 0 || raw > 1u64 << (R::BITS - 1) {
            return None;
        }
        R::from_i64(-(raw as i64))
    }
}

fn unscale(offset: usize, lshift: u32) -> Option<u64> {
    let offset = u64::try_from(offset).ok()?;
    let raw = offset.checked_shr(lshift)?;
    (raw << lshift == offset).then_some(raw)
}

/// Something a byte offset can be added to.
pub trait Address: Copy {
    fn offset_by(self, bytes: usize) -> Self;
}

impl Address for usize {
    #[inline]
    fn offset_by(self, bytes: usize) -> Self {
        self + bytes
    }
}

impl Address for *const u8 {
    #[inline]
    fn offset_by(self, bytes: usize) -> Self {
        self.wrapping_add(bytes)
    }
}

impl Address for *mut u8 {
    #[inline]
    fn offset_by(self, bytes: usize) -> Self {
        self.wrapping_add(bytes)
    }
}

/// Resolve `reference` to an address.
///
/// Far references index `table`; near references are relative to `base`, or
/// to `table[0]` when `base` is `None`. An index outside the table panics.
pub fn resolve<A: Address, R: RefWidth>(
    reference: R,
    format: &RefFormat,
    base: Option<A>,
    table: &[A],
) -> A {
    match format.decode(reference) {
        Reference::Far {
            table_index,
            offset,
        } => {
            debug_assert!(
                table_index < table.len(),
                "table index {table_index} outside table of {}",
                table.len()
            );
            table[table_index].offset_by(offset)
        }
        Reference::Near { offset } => {
            let base = match base {
                Some(base) => base,
                None => {
                    debug_assert!(!table.is_empty(), "near reference without base or table");
                    table[0]
                }
            };
            base.offset_by(offset)
        }
    }
}
