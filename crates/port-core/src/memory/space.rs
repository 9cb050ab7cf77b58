//! Address-space qualified memory views.
//!
//! On the host every space shares one implementation. The space is carried in
//! the type so that read-only memory cannot be handed to a writer.

use std::marker::PhantomData;

use super::access::{self, Lanes, Scalar, SupportedLanes};
use super::unit::MemoryUnit;

/// Marker for an address space.
pub trait AddressSpace: Copy + std::fmt::Debug + 'static {
    const NAME: &'static str;
}

/// Spaces that accept writes.
pub trait Writable: AddressSpace {}

#[derive(Clone, Copy, Debug)]
pub struct Private;
#[derive(Clone, Copy, Debug)]
pub struct Local;
#[derive(Clone, Copy, Debug)]
pub struct Global;
/// Read-only global memory.
#[derive(Clone, Copy, Debug)]
pub struct Constant;

impl AddressSpace for Private {
    const NAME: &'static str = "private";
}
impl AddressSpace for Local {
    const NAME: &'static str = "local";
}
impl AddressSpace for Global {
    const NAME: &'static str = "global";
}
impl AddressSpace for Constant {
    const NAME: &'static str = "constant";
}

impl Writable for Private {}
impl Writable for Local {}
impl Writable for Global {}

/// Read view over units in space `S`.
#[derive(Clone, Copy, Debug)]
pub struct Memory<'a, S: AddressSpace> {
    units: &'a [MemoryUnit],
    _space: PhantomData<S>,
}

impl<'a, S: AddressSpace> Memory<'a, S> {
    pub fn new(units: &'a [MemoryUnit]) -> Self {
        Self {
            units,
            _space: PhantomData,
        }
    }

    pub fn units(&self) -> &'a [MemoryUnit] {
        self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[inline]
    pub fn read<T: Scalar>(&self, index: usize) -> T::Value {
        access::read::<T>(self.units, index)
    }

    #[inline]
    pub fn read_vector<T: Scalar, const N: usize>(&self, index: usize) -> [T::Value; N]
    where
        Lanes<N>: SupportedLanes,
    {
        access::read_vector::<T, N>(self.units, index)
    }
}

/// Read-write view over units in a writable space.
#[derive(Debug)]
pub struct MemoryMut<'a, S: Writable> {
    units: &'a mut [MemoryUnit],
    _space: PhantomData<S>,
}

impl<'a, S: Writable> MemoryMut<'a, S> {
    pub fn new(units: &'a mut [MemoryUnit]) -> Self {
        Self {
            units,
            _space: PhantomData,
        }
    }

    pub fn as_memory(&self) -> Memory<'_, S> {
        Memory::new(self.units)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[inline]
    pub fn read<T: Scalar>(&self, index: usize) -> T::Value {
        access::read::<T>(self.units, index)
    }

    #[inline]
    pub fn read_vector<T: Scalar, const N: usize>(&self, index: usize) -> [T::Value; N]
    where
        Lanes<N>: SupportedLanes,
    {
        access::read_vector::<T, N>(self.units, index)
    }

    #[inline]
    pub fn write<T: Scalar>(&mut self, index: usize, value: T::Value) {
        access::write::<T>(self.units, index, value);
    }

    #[inline]
    pub fn write_vector<T: Scalar, const N: usize>(&mut self, index: usize, values: [T::Value; N])
    where
        Lanes<N>: SupportedLanes,
    {
        access::write_vector::<T, N>(self.units, index, values);
    }

    /// Copy `num_units` units of `src`, starting at unit `src_index`, to unit
    /// `dst` of this view.
    ///
    /// The source may live in any space, including `Constant`.
    ///
    /// # Panics
    ///
    /// If either range runs past the end of its view.
    pub fn copy_from<S2: AddressSpace>(
        &mut self,
        dst: usize,
        src: Memory<'_, S2>,
        src_index: usize,
        num_units: usize,
    ) {
        self.units[dst..dst + num_units]
            .copy_from_slice(&src.units[src_index..src_index + num_units]);
    }
}
