use num_traits::PrimInt;

/// Whether the target stores multi-byte integers least significant byte first.
pub const IS_LITTLE_ENDIAN: bool = cfg!(target_endian = "little");
/// Whether the target stores multi-byte integers most significant byte first.
pub const IS_BIG_ENDIAN: bool = cfg!(target_endian = "big");

static_assertions::const_assert!(IS_LITTLE_ENDIAN != IS_BIG_ENDIAN);

/// A byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    Little,
    Big,
}

impl Order {
    /// The byte order of the executing hardware.
    pub const NATIVE: Order = if IS_LITTLE_ENDIAN { Order::Little } else { Order::Big };

    /// Network byte order, big-endian by convention.
    pub const NETWORK: Order = Order::Big;

    #[inline(always)]
    pub const fn is_native(self) -> bool {
        matches!((self, Self::NATIVE), (Order::Little, Order::Little) | (Order::Big, Order::Big))
    }
}

/// Reverses the bytes of `value`.
#[inline(always)]
pub fn byte_swap<I: PrimInt>(value: I) -> I {
    value.swap_bytes()
}

/// Converts a native integer to its little-endian representation. A no-op on little-endian targets.
#[inline(always)]
pub fn to_little_endian<I: PrimInt>(value: I) -> I {
    value.to_le()
}

/// Converts a little-endian representation back to a native integer.
#[inline(always)]
pub fn from_little_endian<I: PrimInt>(value: I) -> I {
    I::from_le(value)
}

/// Converts a native integer to its big-endian representation. A no-op on big-endian targets.
#[inline(always)]
pub fn to_big_endian<I: PrimInt>(value: I) -> I {
    value.to_be()
}

/// Converts a big-endian representation back to a native integer.
#[inline(always)]
pub fn from_big_endian<I: PrimInt>(value: I) -> I {
    I::from_be(value)
}

/// Converts a native integer into the representation used by `target`.
#[inline(always)]
pub fn to_endian<I: PrimInt>(value: I, target: Order) -> I {
    match target {
        Order::Little => to_little_endian(value),
        Order::Big => to_big_endian(value),
    }
}

/// Inverse of [`to_endian`].
#[inline(always)]
pub fn from_endian<I: PrimInt>(value: I, source: Order) -> I {
    match source {
        Order::Little => from_little_endian(value),
        Order::Big => from_big_endian(value),
    }
}

/// Host to network order.
#[inline(always)]
pub fn hton<I: PrimInt>(value: I) -> I {
    to_big_endian(value)
}

/// Network to host order.
#[inline(always)]
pub fn ntoh<I: PrimInt>(value: I) -> I {
    from_big_endian(value)
}

/// Reorders a native-order byte sequence in place so that it reads in `target` order.
///
/// The same call converts back, since a byte reversal is its own inverse.
#[inline]
pub fn normalize_bytes(bytes: &mut [u8], target: Order) {
    if !target.is_native() {
        bytes.reverse();
    }
}
