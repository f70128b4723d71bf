use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::{Deref, DerefMut};

use bytemuck::Pod;

use crate::buffer::ByteBuffer;
use crate::endian::Order;

/// A plain value that can also be read and written as its raw bytes.
///
/// The typed view and the byte view alias the same memory: writing a byte through
/// [`Composer::as_bytes_mut`] changes the value, and assigning through [`Composer::value_mut`]
/// changes the bytes. There is no copy to keep in sync.
///
/// `T: Pod` is what makes this sound. Every byte of a `Pod` type is initialized (no padding)
/// and every bit pattern is a valid value, so both directions of the pun are defined.
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct Composer<T: Pod> {
    value: T,
}

impl<T: Pod> Composer<T> {
    /// Size of the byte view.
    pub const BYTE_SIZE: usize = size_of::<T>();

    #[inline(always)]
    pub fn new(value: T) -> Self {
        const { assert!(size_of::<T>() > 0, "zero-sized types have no bytes to compose") };
        Self { value }
    }

    /// Builds a value from the first `min(bytes.len(), size_of::<T>())` bytes, zero-padding the rest.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut composer = Self::new(T::zeroed());
        let len = bytes.len().min(Self::BYTE_SIZE);
        composer.as_bytes_mut()[..len].copy_from_slice(&bytes[..len]);
        composer
    }

    #[inline(always)]
    pub fn from_buffer<const N: usize>(buffer: &ByteBuffer<N>) -> Self {
        Self::from_bytes(buffer.as_slice())
    }

    #[inline(always)]
    pub fn value(&self) -> &T {
        &self.value
    }

    #[inline(always)]
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    #[inline(always)]
    pub fn into_inner(self) -> T {
        self.value
    }

    #[inline(always)]
    pub const fn size(&self) -> usize {
        Self::BYTE_SIZE
    }

    /// The value's bytes, in memory order.
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.value)
    }

    #[inline(always)]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::bytes_of_mut(&mut self.value)
    }

    /// Returns byte `index`, or the last byte if `index` is past the end.
    #[inline(always)]
    pub fn byte_at(&self, index: usize) -> u8 {
        self.as_bytes()[index.min(Self::BYTE_SIZE - 1)]
    }

    #[inline(always)]
    pub fn byte_at_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.as_bytes_mut()[index.min(Self::BYTE_SIZE - 1)]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u8> {
        self.as_bytes().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, u8> {
        self.as_bytes_mut().iter_mut()
    }

    /// Copies the bytes into a buffer, truncating or zero-padding to `N` bytes.
    pub fn to_buffer<const N: usize>(&self) -> ByteBuffer<N> {
        ByteBuffer::from_slice(self.as_bytes())
    }

    // ----------------

    /// Returns a composer whose bytes are this value's bytes laid out in `target` order.
    ///
    /// The whole byte view is reversed when `target` is not the native order, so this is only
    /// meaningful for scalars. The typed view of the result is the byte-swapped value.
    pub fn to_endian(&self, target: Order) -> Self {
        let mut composer = *self;
        crate::endian::normalize_bytes(composer.as_bytes_mut(), target);
        composer
    }

    /// Reads bytes stored in `source` order back into a native value.
    #[inline]
    pub fn from_endian(&self, source: Order) -> Self {
        self.to_endian(source)
    }

    #[inline]
    pub fn to_big_endian(&self) -> Self {
        self.to_endian(Order::Big)
    }

    #[inline]
    pub fn to_little_endian(&self) -> Self {
        self.to_endian(Order::Little)
    }
}

impl<T: Pod> Default for Composer<T> {
    fn default() -> Self {
        Self::new(T::zeroed())
    }
}

impl<T: Pod> From<T> for Composer<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Pod> Deref for Composer<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Pod> DerefMut for Composer<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: Pod> AsRef<[u8]> for Composer<T> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<T: Pod + PartialEq> PartialEq for Composer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Pod + Eq> Eq for Composer<T> {}

impl<T: Pod + PartialOrd> PartialOrd for Composer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<T: Pod + Ord> Ord for Composer<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T: Pod + Debug> Debug for Composer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("value", &self.value)
            .field("bytes", &self.as_bytes())
            .finish()
    }
}
