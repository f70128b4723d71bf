//!
//! A tagged union over a closed catalog of plain (`Copy`) types.
//!
//! A catalog is declared once with [`type_catalog!`], which fixes the member order, the storage
//! layout and the tag width. [`TaggedUnion`] then stores one member at a time in that storage.
//!

/// Type catalogs: member indices, storage layout, tag width.
pub mod catalog;
/// Errors from checked accesses.
pub mod error;
/// The union itself.
pub mod tagged;
/// Visiting the active value under its real type.
pub mod visit;

pub use catalog::{DebugCatalog, Discriminant, Member, PartialEqCatalog, Payload, TypeAt, TypeCatalog};
pub use error::UnionError;
pub use tagged::TaggedUnion;
pub use visit::{Visitor, VisitorMut};

#[doc(hidden)]
pub mod __private {
    pub use static_assertions::const_assert;
}
