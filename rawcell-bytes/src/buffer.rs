use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Index, IndexMut, Not, Shl, ShlAssign, Shr, ShrAssign};

use bytemuck::Pod;
use num_traits::PrimInt;

use crate::endian::Order;

/// A fixed number of bytes treated as one wide little-endian bit string.
///
/// Byte `0` holds the lowest-order bits, and bit `pos` lives at bit `pos % 8` of byte `pos / 8`.
/// This is the layout shifts, rotations and the bit accessors agree on.
///
/// Out-of-range positions never panic: indexing clamps to the last byte and bit accessors
/// ignore positions past the end. Use [`ByteBuffer::get_unchecked`] when the index is already known
/// to be valid.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteBuffer<const N: usize> {
    data: [u8; N],
}

static_assertions::const_assert_eq!(align_of::<ByteBuffer<1>>(), 16);
static_assertions::const_assert_eq!(size_of::<ByteBuffer<16>>(), 16);
static_assertions::const_assert_eq!(size_of::<ByteBuffer<17>>(), 32);

impl<const N: usize> ByteBuffer<N> {
    /// Number of bytes.
    pub const LEN: usize = N;
    /// Number of bits.
    pub const BITS: usize = N * 8;

    /// An all-zero buffer.
    #[inline(always)]
    pub const fn new() -> Self {
        Self::from_array([0; N])
    }

    #[inline(always)]
    pub const fn from_array(data: [u8; N]) -> Self {
        const { assert!(N > 0, "a byte buffer must hold at least one byte") };
        Self { data }
    }

    /// Copies the first `min(N, bytes.len())` bytes, zero-filling the rest.
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut buffer = Self::new();
        let len = N.min(bytes.len());
        buffer.data[..len].copy_from_slice(&bytes[..len]);
        buffer
    }

    /// Copies the native-order bytes of `value`, truncated or zero-extended to `N` bytes.
    pub fn from_int<I: PrimInt + Pod>(value: I) -> Self {
        Self::from_slice(bytemuck::bytes_of(&value))
    }

    /// Reads back an integer from the first `min(N, size_of::<I>())` bytes, in native order.
    ///
    /// Missing high bytes are zero; extra bytes are ignored.
    pub fn to_int<I: PrimInt + Pod>(&self) -> I {
        let mut value = I::zero();
        let dst = bytemuck::bytes_of_mut(&mut value);
        let len = N.min(dst.len());
        dst[..len].copy_from_slice(&self.data[..len]);
        value
    }

    #[inline(always)]
    pub const fn size(&self) -> usize {
        N
    }

    #[inline(always)]
    pub const fn bit_size(&self) -> usize {
        Self::BITS
    }

    /// Always `false`, since a buffer holds at least one byte.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        false
    }

    #[inline(always)]
    pub const fn as_array(&self) -> &[u8; N] {
        &self.data
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u8> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, u8> {
        self.data.iter_mut()
    }

    #[inline(always)]
    pub fn front(&self) -> &u8 {
        &self.data[0]
    }

    #[inline(always)]
    pub fn front_mut(&mut self) -> &mut u8 {
        &mut self.data[0]
    }

    #[inline(always)]
    pub fn back(&self) -> &u8 {
        &self.data[N - 1]
    }

    #[inline(always)]
    pub fn back_mut(&mut self) -> &mut u8 {
        &mut self.data[N - 1]
    }

    /// Returns the byte at `index` without clamping it.
    ///
    /// # Safety
    /// `index` must be smaller than `N`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &u8 {
        crate::check_precondition!(index < N, "byte index {} out of range for a {}-byte buffer", index, N);
        unsafe { self.data.get_unchecked(index) }
    }

    /// Mutable counterpart of [`ByteBuffer::get_unchecked`].
    ///
    /// # Safety
    /// `index` must be smaller than `N`.
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut u8 {
        crate::check_precondition!(index < N, "byte index {} out of range for a {}-byte buffer", index, N);
        unsafe { self.data.get_unchecked_mut(index) }
    }

    pub fn fill(&mut self, value: u8) {
        self.data.fill(value);
    }

    pub fn clear(&mut self) {
        self.fill(0);
    }

    // ----------------

    #[inline(always)]
    pub fn set_bit(&mut self, pos: usize) {
        if pos < Self::BITS {
            self.data[pos / 8] |= 1 << (pos % 8);
        }
    }

    #[inline(always)]
    pub fn clear_bit(&mut self, pos: usize) {
        if pos < Self::BITS {
            self.data[pos / 8] &= !(1 << (pos % 8));
        }
    }

    #[inline(always)]
    pub fn toggle_bit(&mut self, pos: usize) {
        if pos < Self::BITS {
            self.data[pos / 8] ^= 1 << (pos % 8);
        }
    }

    /// Returns whether bit `pos` is set. Positions past the end read as unset.
    #[inline(always)]
    pub fn test_bit(&self, pos: usize) -> bool {
        pos < Self::BITS && (self.data[pos / 8] & (1 << (pos % 8))) != 0
    }

    /// Number of set bits over all bytes.
    pub fn popcount(&self) -> usize {
        self.data.iter().map(|byte| byte.count_ones() as usize).sum()
    }

    /// Circular shift towards the high-order end. `n` is taken modulo the bit width.
    pub fn rotate_left(&self, n: usize) -> Self {
        let n = n % Self::BITS;
        (*self << n) | (*self >> (Self::BITS - n))
    }

    /// Circular shift towards the low-order end. `n` is taken modulo the bit width.
    pub fn rotate_right(&self, n: usize) -> Self {
        let n = n % Self::BITS;
        (*self >> n) | (*self << (Self::BITS - n))
    }

    /// Reverses the order of the bytes. The bits inside each byte keep their order.
    pub fn reverse(&self) -> Self {
        let mut data = self.data;
        data.reverse();
        Self { data }
    }

    /// Reorders native-order bytes into `target` order.
    #[inline]
    pub fn to_endian(&self, target: Order) -> Self {
        if target.is_native() {
            *self
        } else {
            self.reverse()
        }
    }

    /// Reorders bytes stored in `source` order back into native order.
    #[inline]
    pub fn from_endian(&self, source: Order) -> Self {
        self.to_endian(source)
    }
}

impl<const N: usize> Default for ByteBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> From<[u8; N]> for ByteBuffer<N> {
    fn from(data: [u8; N]) -> Self {
        Self::from_array(data)
    }
}

impl<const N: usize> From<ByteBuffer<N>> for [u8; N] {
    fn from(buffer: ByteBuffer<N>) -> Self {
        buffer.data
    }
}

impl<const N: usize> AsRef<[u8]> for ByteBuffer<N> {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl<const N: usize> AsMut<[u8]> for ByteBuffer<N> {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl<const N: usize> IntoIterator for ByteBuffer<N> {
    type Item = u8;
    type IntoIter = std::array::IntoIter<u8, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, const N: usize> IntoIterator for &'a ByteBuffer<N> {
    type Item = &'a u8;
    type IntoIter = std::slice::Iter<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<'a, const N: usize> IntoIterator for &'a mut ByteBuffer<N> {
    type Item = &'a mut u8;
    type IntoIter = std::slice::IterMut<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter_mut()
    }
}

/// Clamps `index` to the last byte.
impl<const N: usize> Index<usize> for ByteBuffer<N> {
    type Output = u8;

    #[inline(always)]
    fn index(&self, index: usize) -> &u8 {
        &self.data[index.min(N - 1)]
    }
}

impl<const N: usize> IndexMut<usize> for ByteBuffer<N> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.data[index.min(N - 1)]
    }
}

// Byte-wise logic

macro_rules! impl_bytewise_op {
    ($($op_trait:ident::$op_fn:ident, $assign_trait:ident::$assign_fn:ident => $op:tt;)*) => {
        $(
            impl<const N: usize> $op_trait for ByteBuffer<N> {
                type Output = Self;

                #[inline]
                fn $op_fn(self, rhs: Self) -> Self {
                    let mut result = self;
                    for (dst, src) in result.data.iter_mut().zip(rhs.data) {
                        *dst = *dst $op src;
                    }
                    result
                }
            }

            impl<const N: usize> $assign_trait for ByteBuffer<N> {
                #[inline]
                fn $assign_fn(&mut self, rhs: Self) {
                    *self = *self $op rhs;
                }
            }
        )*
    };
}

impl_bytewise_op! {
    BitAnd::bitand, BitAndAssign::bitand_assign => &;
    BitOr::bitor, BitOrAssign::bitor_assign => |;
    BitXor::bitxor, BitXorAssign::bitxor_assign => ^;
}

impl<const N: usize> Not for ByteBuffer<N> {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        let mut result = self;
        result.data.iter_mut().for_each(|byte| *byte = !*byte);
        result
    }
}

// Shifts

impl<const N: usize> Shl<usize> for ByteBuffer<N> {
    type Output = Self;

    /// Moves every bit `shift_bits` positions towards the high-order end, filling with zeroes.
    fn shl(self, shift_bits: usize) -> Self {
        if shift_bits == 0 {
            return self;
        }
        if shift_bits >= Self::BITS {
            return Self::new();
        }

        let byte_shift = shift_bits / 8;
        let bit_shift = shift_bits % 8;
        let mut result = Self::new();

        if bit_shift == 0 {
            result.data[byte_shift..].copy_from_slice(&self.data[..N - byte_shift]);
        } else {
            // the bits pushed out of the top of byte `i` land at the bottom of byte `i + 1`
            let mut carry = 0u8;
            for src_idx in 0..N - byte_shift {
                let src = self.data[src_idx];
                result.data[src_idx + byte_shift] = (src << bit_shift) | carry;
                carry = src >> (8 - bit_shift);
            }
        }

        result
    }
}

impl<const N: usize> Shr<usize> for ByteBuffer<N> {
    type Output = Self;

    /// Moves every bit `shift_bits` positions towards the low-order end, filling with zeroes.
    fn shr(self, shift_bits: usize) -> Self {
        if shift_bits == 0 {
            return self;
        }
        if shift_bits >= Self::BITS {
            return Self::new();
        }

        let byte_shift = shift_bits / 8;
        let bit_shift = shift_bits % 8;
        let mut result = Self::new();

        if bit_shift == 0 {
            result.data[..N - byte_shift].copy_from_slice(&self.data[byte_shift..]);
        } else {
            // walk from the top so the carry flows downwards
            let mut carry = 0u8;
            for dst_idx in (0..N - byte_shift).rev() {
                let src = self.data[dst_idx + byte_shift];
                result.data[dst_idx] = (src >> bit_shift) | carry;
                carry = src << (8 - bit_shift);
            }
        }

        result
    }
}

impl<const N: usize> ShlAssign<usize> for ByteBuffer<N> {
    fn shl_assign(&mut self, shift_bits: usize) {
        *self = *self << shift_bits;
    }
}

impl<const N: usize> ShrAssign<usize> for ByteBuffer<N> {
    fn shr_assign(&mut self, shift_bits: usize) {
        *self = *self >> shift_bits;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_carries_across_bytes() {
        let value = ByteBuffer::<2>::from_array([0b1000_0001, 0]);
        assert_eq!((value << 1).as_array(), &[0b0000_0010, 0b0000_0001]);
        assert_eq!((value << 9).as_array(), &[0, 0b0000_0010]);
        assert_eq!((value >> 1).as_array(), &[0b0100_0000, 0]);

        let high = ByteBuffer::<2>::from_array([0, 0b0000_0011]);
        assert_eq!((high >> 1).as_array(), &[0b1000_0000, 0b0000_0001]);
        assert_eq!((high >> 8).as_array(), &[0b0000_0011, 0]);
    }

    #[test]
    fn index_clamps_to_last_byte() {
        let mut buffer = ByteBuffer::<3>::from_array([1, 2, 3]);
        assert_eq!(buffer[2], 3);
        assert_eq!(buffer[100], 3);
        buffer[usize::MAX] = 9;
        assert_eq!(buffer.as_array(), &[1, 2, 9]);
    }
}
