use std::any::TypeId;
use std::fmt::{self, Debug};
use std::hash::Hash;

use crate::visit::{Visitor, VisitorMut};

/// A type that may live inside a [`crate::TaggedUnion`].
///
/// `Copy` is the whole admissibility rule: a payload is duplicated, moved and dropped by copying its
/// bytes, so the union never runs a destructor and never needs to know which one to run.
pub trait Payload: Copy + 'static {}

impl<T: Copy + 'static> Payload for T {}

/// An ordered, closed list of payload types, known when the catalog is declared.
///
/// Declared with [`crate::type_catalog!`], never by hand. A catalog is an uninhabited type: it only
/// exists to carry these constants and the storage layout at the type level.
pub trait TypeCatalog: Sized + 'static {
    /// A `#[repr(C)]` union of every member, so it is exactly as large and as aligned as the
    /// largest and most aligned member.
    type Storage: Copy;
    /// The narrowest tag able to name every member plus the empty state.
    type Discriminant: Discriminant;

    const COUNT: usize;
    /// Largest member size. `0` for an empty catalog.
    const MAX_SIZE: usize;
    /// Largest member alignment. `1` for an empty catalog.
    const MAX_ALIGN: usize;
    /// Sum of all member sizes.
    const TOTAL_SIZE: usize;

    /// Position of `id` in the catalog, if it names a member.
    fn position_of(id: TypeId) -> Option<usize>;

    /// Calls `visitor` with the member stored at `storage`, picked by `index`.
    ///
    /// Returns `None` when `index` names no member, which is how the empty state falls through.
    ///
    /// # Safety
    /// If `index` names a member, `storage` must point to a valid value of that member.
    unsafe fn dispatch<V: Visitor<Self>>(index: usize, storage: *const u8, visitor: &mut V) -> Option<V::Output>;

    /// Mutable counterpart of [`TypeCatalog::dispatch`].
    ///
    /// # Safety
    /// If `index` names a member, `storage` must point to a valid, uniquely borrowed value of that member.
    unsafe fn dispatch_mut<V: VisitorMut<Self>>(index: usize, storage: *mut u8, visitor: &mut V) -> Option<V::Output>;

    /// Position of `T` in the catalog. Asking about a non-member does not compile.
    #[inline(always)]
    fn index_of<T: Member<Self>>() -> usize {
        T::INDEX
    }

    /// Whether `T` is one of the members.
    fn contains<T: 'static>() -> bool {
        Self::position_of(TypeId::of::<T>()).is_some()
    }
}

/// Membership of `Self` in catalog `C`.
///
/// # Safety
/// `INDEX` must be the position of `Self` in `C`, and `Self` must be a field of `C::Storage`.
/// [`crate::type_catalog!`] upholds both; implementing this by hand is never needed.
pub unsafe trait Member<C: TypeCatalog>: Payload {
    const INDEX: usize;
}

/// The member at position `I`.
pub trait TypeAt<const I: usize>: TypeCatalog {
    type Type: Member<Self>;
}

/// A catalog whose members all implement `PartialEq`. Declared with `: PartialEq` in
/// [`crate::type_catalog!`]; gives `TaggedUnion<C>` its `PartialEq` impl.
pub trait PartialEqCatalog: TypeCatalog {
    /// Compares the two values of the member at `index`.
    ///
    /// # Safety
    /// `index` must name a member, and `lhs` and `rhs` must both point to valid values of it.
    unsafe fn eq_at(index: usize, lhs: *const u8, rhs: *const u8) -> bool;
}

/// A catalog whose members all implement `Debug`. Declared with `: Debug` in
/// [`crate::type_catalog!`]; gives `TaggedUnion<C>` its `Debug` impl.
pub trait DebugCatalog: TypeCatalog {
    /// Formats the value of the member at `index`.
    ///
    /// # Safety
    /// `index` must name a member, and `storage` must point to a valid value of it.
    unsafe fn fmt_at(index: usize, storage: *const u8, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for u8 {}
    impl Sealed for u16 {}
}

/// Integer types usable as a union tag. The all-ones value is reserved for "empty".
pub trait Discriminant: sealed::Sealed + Copy + Eq + Hash + Debug + 'static {
    const EMPTY: Self;
    /// How many members this tag can name.
    const CAPACITY: usize;

    /// Only called with indices below [`Discriminant::CAPACITY`].
    fn from_index(index: usize) -> Self;
    fn to_index(self) -> usize;
}

impl Discriminant for u8 {
    const EMPTY: Self = u8::MAX;
    const CAPACITY: usize = u8::MAX as usize;

    #[inline(always)]
    fn from_index(index: usize) -> Self {
        index as u8
    }

    #[inline(always)]
    fn to_index(self) -> usize {
        self as usize
    }
}

impl Discriminant for u16 {
    const EMPTY: Self = u16::MAX;
    const CAPACITY: usize = u16::MAX as usize;

    #[inline(always)]
    fn from_index(index: usize) -> Self {
        index as u16
    }

    #[inline(always)]
    fn to_index(self) -> usize {
        self as usize
    }
}

/// Picks the tag type from whether the catalog fits in a byte.
#[doc(hidden)]
pub struct Width<const NARROW: bool>;

#[doc(hidden)]
pub trait SelectDiscriminant {
    type Type: Discriminant;
}

impl SelectDiscriminant for Width<true> {
    type Type = u8;
}

impl SelectDiscriminant for Width<false> {
    type Type = u16;
}

/// Declares a [`TypeCatalog`].
///
/// ```
/// rawcell_union::type_catalog! {
///     pub enum Scalar {
///         Int(i32),
///         Double(f64),
///         Float(f32),
///     }
/// }
///
/// use rawcell_union::TypeCatalog;
/// assert_eq!(Scalar::COUNT, 3);
/// assert_eq!(Scalar::index_of::<f64>(), 1);
/// ```
///
/// Each entry is a field name for the storage union followed by the member type. A type listed
/// twice is rejected by the compiler (conflicting `Member` implementations).
///
/// Members only have to be `Copy`. When every member also implements `PartialEq` or `Debug`, list
/// the trait after the catalog name and the union gets the matching impl:
///
/// ```
/// rawcell_union::type_catalog! {
///     pub enum Reading: PartialEq + Debug {
///         Celsius(f32),
///         Raw(u16),
///     }
/// }
///
/// use rawcell_union::TaggedUnion;
/// let reading = TaggedUnion::<Reading>::with_value(21.5f32);
/// assert_eq!(reading, TaggedUnion::with_value(21.5f32));
/// assert_eq!(format!("{reading:?}"), "TaggedUnion(21.5)");
/// ```
///
/// Members are registered recursively, one per step, so catalogs larger than the default macro
/// recursion limit need `#![recursion_limit]` raised in the declaring crate.
#[macro_export]
macro_rules! type_catalog {
    (@members $name: ident [$index: expr]) => {};
    (@members $name: ident [$index: expr] $field: ident ($member: ty) $(, $rest_field: ident ($rest_member: ty))*) => {
        unsafe impl $crate::Member<$name> for $member {
            const INDEX: usize = $index;
        }

        impl $crate::TypeAt<{ $index }> for $name {
            type Type = $member;
        }

        $crate::type_catalog!(@members $name [$index + 1] $($rest_field($rest_member)),*);
    };
    (@capabilities $name: ident $members: tt) => {};
    (@capabilities $name: ident $members: tt PartialEq $($rest: ident)*) => {
        $crate::type_catalog!(@partial_eq $name $members);
        $crate::type_catalog!(@capabilities $name $members $($rest)*);
    };
    (@capabilities $name: ident $members: tt Debug $($rest: ident)*) => {
        $crate::type_catalog!(@debug $name $members);
        $crate::type_catalog!(@capabilities $name $members $($rest)*);
    };
    (@capabilities $name: ident $members: tt $other: ident $($rest: ident)*) => {
        compile_error!(concat!("unsupported catalog capability `", stringify!($other), "`, expected `PartialEq` or `Debug`"));
    };
    (@partial_eq $name: ident [$($member: ty),*]) => {
        impl $crate::catalog::PartialEqCatalog for $name {
            #[allow(unused_variables)]
            unsafe fn eq_at(index: usize, lhs: *const u8, rhs: *const u8) -> bool {
                $(if index == <$member as $crate::Member<$name>>::INDEX {
                    return unsafe { *lhs.cast::<$member>() == *rhs.cast::<$member>() };
                })*
                false
            }
        }
    };
    (@debug $name: ident [$($member: ty),*]) => {
        impl $crate::catalog::DebugCatalog for $name {
            #[allow(unused_variables)]
            unsafe fn fmt_at(index: usize, storage: *const u8, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                $(if index == <$member as $crate::Member<$name>>::INDEX {
                    return ::core::fmt::Debug::fmt(unsafe { &*storage.cast::<$member>() }, f);
                })*
                Ok(())
            }
        }
    };
    (
        $(#[$attr: meta])*
        $vis: vis enum $name: ident $(: $first_capability: ident $(+ $capability: ident)*)? {
            $($field: ident ($member: ty)),* $(,)?
        }
    ) => {
        $(#[$attr])*
        $vis enum $name {}

        const _: () = {
            const COUNT: usize = {
                let fields: &[&str] = &[$(stringify!($field)),*];
                fields.len()
            };

            #[repr(C)]
            #[derive(Clone, Copy)]
            #[allow(non_snake_case, dead_code)]
            pub union Storage {
                __empty: (),
                $($field: $member,)*
            }

            impl $crate::TypeCatalog for $name {
                type Storage = Storage;
                type Discriminant = <$crate::catalog::Width<{ COUNT <= 255 }> as $crate::catalog::SelectDiscriminant>::Type;

                const COUNT: usize = COUNT;
                #[allow(unused_mut)]
                const MAX_SIZE: usize = {
                    let mut max = 0;
                    $(if ::core::mem::size_of::<$member>() > max {
                        max = ::core::mem::size_of::<$member>();
                    })*
                    max
                };
                #[allow(unused_mut)]
                const MAX_ALIGN: usize = {
                    let mut max = 1;
                    $(if ::core::mem::align_of::<$member>() > max {
                        max = ::core::mem::align_of::<$member>();
                    })*
                    max
                };
                const TOTAL_SIZE: usize = 0 $(+ ::core::mem::size_of::<$member>())*;

                #[allow(unused_variables)]
                fn position_of(id: ::std::any::TypeId) -> Option<usize> {
                    $(if id == ::std::any::TypeId::of::<$member>() {
                        return Some(<$member as $crate::Member<$name>>::INDEX);
                    })*
                    None
                }

                #[inline]
                #[allow(unused_variables)]
                unsafe fn dispatch<V: $crate::Visitor<Self>>(index: usize, storage: *const u8, visitor: &mut V) -> Option<V::Output> {
                    $(if index == <$member as $crate::Member<$name>>::INDEX {
                        return Some(visitor.visit::<$member>(unsafe { &*storage.cast::<$member>() }));
                    })*
                    None
                }

                #[inline]
                #[allow(unused_variables)]
                unsafe fn dispatch_mut<V: $crate::VisitorMut<Self>>(index: usize, storage: *mut u8, visitor: &mut V) -> Option<V::Output> {
                    $(if index == <$member as $crate::Member<$name>>::INDEX {
                        return Some(visitor.visit_mut::<$member>(unsafe { &mut *storage.cast::<$member>() }));
                    })*
                    None
                }
            }

            $crate::__private::const_assert!(COUNT <= 65535);
            $crate::__private::const_assert!(::core::mem::size_of::<Storage>() >= <$name as $crate::TypeCatalog>::MAX_SIZE);
            $crate::__private::const_assert!(::core::mem::align_of::<Storage>() == <$name as $crate::TypeCatalog>::MAX_ALIGN);

            $crate::type_catalog!(@members $name [0usize] $($field($member)),*);
            $crate::type_catalog!(@capabilities $name [$($member),*] $($first_capability $($capability)*)?);
        };
    };
}
