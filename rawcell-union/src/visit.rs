use std::any::type_name;

use crate::catalog::{Member, TypeCatalog};

/// Receives the active value of a [`crate::TaggedUnion`] under its real type.
///
/// `visit` is generic over the member type, so one visitor covers the whole catalog and every
/// branch shares `Output`. `T` is only known to be a `Copy + 'static` member; per-type work goes
/// through [`std::any::Any`]:
///
/// ```
/// use std::any::Any;
/// use rawcell_union::{Member, TaggedUnion, Visitor};
///
/// rawcell_union::type_catalog! {
///     pub enum Number {
///         Int(i64),
///         Real(f64),
///     }
/// }
///
/// /// Widens whichever number is active to `f64`.
/// struct AsReal;
///
/// impl Visitor<Number> for AsReal {
///     type Output = f64;
///
///     fn visit<T: Member<Number>>(&mut self, value: &T) -> f64 {
///         let value = value as &dyn Any;
///         if let Some(int) = value.downcast_ref::<i64>() {
///             *int as f64
///         } else if let Some(real) = value.downcast_ref::<f64>() {
///             *real
///         } else {
///             unreachable!("`Number` has no other members")
///         }
///     }
/// }
///
/// assert_eq!(TaggedUnion::<Number>::with_value(3i64).visit(AsReal), Ok(3.0));
/// assert_eq!(TaggedUnion::<Number>::with_value(0.5f64).visit(AsReal), Ok(0.5));
/// ```
pub trait Visitor<C: TypeCatalog> {
    type Output;

    fn visit<T: Member<C>>(&mut self, value: &T) -> Self::Output;
}

/// Like [`Visitor`], but with mutable access to the active value.
pub trait VisitorMut<C: TypeCatalog> {
    type Output;

    fn visit_mut<T: Member<C>>(&mut self, value: &mut T) -> Self::Output;
}

impl<C: TypeCatalog, V: Visitor<C> + ?Sized> Visitor<C> for &mut V {
    type Output = V::Output;

    #[inline(always)]
    fn visit<T: Member<C>>(&mut self, value: &T) -> Self::Output {
        (**self).visit(value)
    }
}

impl<C: TypeCatalog, V: VisitorMut<C> + ?Sized> VisitorMut<C> for &mut V {
    type Output = V::Output;

    #[inline(always)]
    fn visit_mut<T: Member<C>>(&mut self, value: &mut T) -> Self::Output {
        (**self).visit_mut(value)
    }
}

// Visitors used by `TaggedUnion` itself.

pub(crate) struct TypeName;

impl<C: TypeCatalog> Visitor<C> for TypeName {
    type Output = &'static str;

    fn visit<T: Member<C>>(&mut self, _: &T) -> &'static str {
        type_name::<T>()
    }
}
