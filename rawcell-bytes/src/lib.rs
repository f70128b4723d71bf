//!
//! The byte-level substrate: fixed-size byte buffers, byte views of plain values, and byte order
//! conversion. `rawcell-union` builds on these when a payload has to leave memory as bytes.
//!

/// Fixed-size byte buffers with bitwise operations across the whole buffer.
pub mod buffer;
/// Reinterpreting a plain value as its bytes, and back.
pub mod composer;
/// Native byte order detection and conversions.
pub mod endian;

pub use buffer::ByteBuffer;
pub use composer::Composer;
pub use endian::Order;

/// Checks the precondition of an unchecked accessor.
///
/// A `debug_assert!` normally, and a full `assert!` when the calling crate enables its
/// `strict-unchecked` feature.
#[doc(hidden)]
#[macro_export]
macro_rules! check_precondition {
    ($($arg:tt)*) => {
        if cfg!(feature = "strict-unchecked") {
            assert!($($arg)*);
        } else {
            debug_assert!($($arg)*);
        }
    };
}
