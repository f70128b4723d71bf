use thiserror::Error;

/// Why a checked access to a [`crate::TaggedUnion`] was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnionError {
    /// Another member is active.
    #[error("type mismatch: requested `{requested}` but the union holds `{active}`")]
    TypeMismatch {
        requested: &'static str,
        active: &'static str,
    },
    /// The union holds no value.
    #[error("access to an empty union")]
    EmptyAccess,
}
