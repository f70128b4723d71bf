use std::any::type_name;
use std::fmt;
use std::mem::MaybeUninit;

use bytemuck::Pod;
use log::debug;
use rawcell_bytes::Composer;

use crate::catalog::{DebugCatalog, Discriminant, Member, PartialEqCatalog, TypeCatalog};
use crate::error::UnionError;
use crate::visit::{TypeName, Visitor, VisitorMut};

/// Holds at most one value out of the members of catalog `C`, in storage shared by all of them.
///
/// The storage is a `#[repr(C)]` union of the members, so the union costs the largest member plus
/// a one or two byte tag, never the sum of the members. The tag names the active member, or holds
/// [`Discriminant::EMPTY`] when there is none.
///
/// Members are `Copy`: switching the active member just overwrites the bytes, and nothing is ever
/// dropped.
pub struct TaggedUnion<C: TypeCatalog> {
    storage: MaybeUninit<C::Storage>,
    tag: C::Discriminant,
}

impl<C: TypeCatalog> TaggedUnion<C> {
    /// What [`TaggedUnion::index`] reports for an empty union.
    pub const NPOS: usize = usize::MAX;

    /// Bytes reserved for the payload.
    pub const STORAGE_SIZE: usize = size_of::<C::Storage>();

    /// An empty union.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            storage: MaybeUninit::uninit(),
            tag: C::Discriminant::EMPTY,
        }
    }

    #[inline(always)]
    pub fn with_value<T: Member<C>>(value: T) -> Self {
        let mut union = Self::new();
        union.write(value);
        union
    }

    #[inline(always)]
    fn write<T: Member<C>>(&mut self, value: T) -> &mut T {
        let slot = self.storage.as_mut_ptr().cast::<T>();
        // SAFETY: `T` is a field of the storage union, so the slot is large and aligned enough.
        unsafe { slot.write(value) };
        self.tag = C::Discriminant::from_index(T::INDEX);
        // SAFETY: just written.
        unsafe { &mut *slot }
    }

    /// Makes `value` the active member and returns a reference to it inside the union.
    pub fn emplace<T: Member<C>>(&mut self, value: T) -> &mut T {
        #[cfg(feature = "transition-logging")]
        log::trace!("emplace: {} -> {}", self.index(), T::INDEX);

        self.write(value)
    }

    /// Builds the new value first, then makes it the active member.
    ///
    /// If `build` panics the union is left untouched.
    pub fn emplace_with<T: Member<C>, F: FnOnce() -> T>(&mut self, build: F) -> &mut T {
        let value = build();
        self.emplace(value)
    }

    #[inline(always)]
    pub fn assign<T: Member<C>>(&mut self, value: T) {
        self.emplace(value);
    }

    /// Empties the union. The old bytes are left in place and must not be relied on.
    pub fn reset(&mut self) {
        #[cfg(feature = "transition-logging")]
        log::trace!("reset: {} -> empty", self.index());

        self.tag = C::Discriminant::EMPTY;
    }

    /// Moves the active value out, leaving the union empty.
    pub fn take<T: Member<C>>(&mut self) -> Result<T, UnionError> {
        let value = *self.get::<T>()?;
        self.reset();
        Ok(value)
    }

    pub fn swap(&mut self, other: &mut Self) {
        #[cfg(feature = "transition-logging")]
        log::trace!("swap: {} <-> {}", self.index(), other.index());

        std::mem::swap(self, other);
    }

    // ----------------

    #[inline(always)]
    pub fn has_value(&self) -> bool {
        self.tag != C::Discriminant::EMPTY
    }

    /// Position of the active member in `C`, or [`TaggedUnion::NPOS`] when empty.
    #[inline(always)]
    pub fn index(&self) -> usize {
        if self.has_value() {
            self.tag.to_index()
        } else {
            Self::NPOS
        }
    }

    /// The raw tag.
    #[inline(always)]
    pub fn discriminant(&self) -> C::Discriminant {
        self.tag
    }

    #[inline(always)]
    pub fn holds<T: Member<C>>(&self) -> bool {
        self.tag.to_index() == T::INDEX
    }

    /// Name of the active member's type.
    pub fn type_name(&self) -> Option<&'static str> {
        // SAFETY: the tag always names the member the storage holds, or no member at all.
        unsafe { C::dispatch(self.tag.to_index(), self.storage.as_ptr().cast(), &mut TypeName) }
    }

    // ----------------

    fn check<T: Member<C>>(&self) -> Result<(), UnionError> {
        if self.holds::<T>() {
            return Ok(());
        }

        let err = match self.type_name() {
            Some(active) => UnionError::TypeMismatch {
                requested: type_name::<T>(),
                active,
            },
            None => UnionError::EmptyAccess,
        };
        debug!("checked access failed: {}", err);
        Err(err)
    }

    /// Returns the active value as a `T`.
    ///
    /// Fails with [`UnionError::EmptyAccess`] on an empty union and [`UnionError::TypeMismatch`]
    /// when another member is active.
    pub fn get<T: Member<C>>(&self) -> Result<&T, UnionError> {
        self.check::<T>()?;
        // SAFETY: checked above.
        Ok(unsafe { self.get_unchecked() })
    }

    pub fn get_mut<T: Member<C>>(&mut self) -> Result<&mut T, UnionError> {
        self.check::<T>()?;
        // SAFETY: checked above.
        Ok(unsafe { self.get_unchecked_mut() })
    }

    /// The non-failing counterpart of [`TaggedUnion::get`].
    #[inline(always)]
    pub fn get_if<T: Member<C>>(&self) -> Option<&T> {
        // SAFETY: `holds` is the precondition.
        self.holds::<T>().then(|| unsafe { self.get_unchecked() })
    }

    #[inline(always)]
    pub fn get_if_mut<T: Member<C>>(&mut self) -> Option<&mut T> {
        if self.holds::<T>() {
            // SAFETY: `holds` is the precondition.
            Some(unsafe { self.get_unchecked_mut() })
        } else {
            None
        }
    }

    /// Returns the storage reinterpreted as a `T` without looking at the tag.
    ///
    /// # Safety
    /// `self.holds::<T>()` must be true. This is only checked in debug builds (or with the
    /// `strict-unchecked` feature).
    #[inline(always)]
    pub unsafe fn get_unchecked<T: Member<C>>(&self) -> &T {
        rawcell_bytes::check_precondition!(self.holds::<T>(), "get_unchecked::<{}>() on index {}", type_name::<T>(), self.index());
        unsafe { &*self.storage.as_ptr().cast::<T>() }
    }

    /// # Safety
    /// Same as [`TaggedUnion::get_unchecked`].
    #[inline(always)]
    pub unsafe fn get_unchecked_mut<T: Member<C>>(&mut self) -> &mut T {
        rawcell_bytes::check_precondition!(self.holds::<T>(), "get_unchecked_mut::<{}>() on index {}", type_name::<T>(), self.index());
        unsafe { &mut *self.storage.as_mut_ptr().cast::<T>() }
    }

    /// Copies the active value into a [`Composer`] so it can be read as bytes.
    pub fn compose<T: Member<C> + Pod>(&self) -> Result<Composer<T>, UnionError> {
        self.get::<T>().map(|value| Composer::new(*value))
    }

    // ----------------

    /// Calls `visitor` with the active value. Fails with [`UnionError::EmptyAccess`] when empty.
    pub fn visit<V: Visitor<C>>(&self, mut visitor: V) -> Result<V::Output, UnionError> {
        // SAFETY: the tag always names the member the storage holds, or no member at all.
        let output = unsafe { C::dispatch(self.tag.to_index(), self.storage.as_ptr().cast(), &mut visitor) };
        output.ok_or_else(|| {
            debug!("visit on an empty union");
            UnionError::EmptyAccess
        })
    }

    /// [`TaggedUnion::visit`] for visitors that are only run for their side effects.
    pub fn visit_void<V: Visitor<C>>(&self, visitor: V) -> Result<(), UnionError> {
        self.visit(visitor).map(drop)
    }

    pub fn visit_mut<V: VisitorMut<C>>(&mut self, mut visitor: V) -> Result<V::Output, UnionError> {
        // SAFETY: as in `visit`, and `&mut self` makes the borrow unique.
        let output = unsafe { C::dispatch_mut(self.tag.to_index(), self.storage.as_mut_ptr().cast(), &mut visitor) };
        output.ok_or_else(|| {
            debug!("visit_mut on an empty union");
            UnionError::EmptyAccess
        })
    }
}

impl<C: TypeCatalog> Clone for TaggedUnion<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: TypeCatalog> Copy for TaggedUnion<C> {}

impl<C: TypeCatalog> Default for TaggedUnion<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Equal when both are empty, or both hold the same member with equal values.
impl<C: PartialEqCatalog> PartialEq for TaggedUnion<C> {
    fn eq(&self, other: &Self) -> bool {
        if self.tag != other.tag {
            return false;
        }
        if !self.has_value() {
            return true;
        }
        // SAFETY: both tags name the same member, and each storage holds a value of it.
        unsafe { C::eq_at(self.tag.to_index(), self.storage.as_ptr().cast(), other.storage.as_ptr().cast()) }
    }
}

impl<C: DebugCatalog> fmt::Debug for TaggedUnion<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_value() {
            return f.write_str("TaggedUnion(<empty>)");
        }
        f.write_str("TaggedUnion(")?;
        // SAFETY: the tag names the member the storage holds.
        unsafe { C::fmt_at(self.tag.to_index(), self.storage.as_ptr().cast(), f)? };
        f.write_str(")")
    }
}
