//! Catalog access and loading errors.

use thiserror::Error;

/// Failure to read something from a catalog.
///
/// Access failures on a single type or member are skippable: the driver
/// records a diagnostic and moves on. Load failures mean the catalog itself
/// is unusable.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("`{0}` is a generic definition and cannot be scanned without type arguments")]
    GenericDefinition(String),

    #[error("`{0}` cannot be introspected by the reflection layer")]
    Inaccessible(String),

    #[error("no type with id {0}")]
    UnknownTypeId(u32),

    #[error("unknown type `{name}` referenced from `{context}`")]
    UnknownTypeName { name: String, context: String },

    #[error("type `{0}` is declared more than once")]
    DuplicateType(String),

    #[error("enum `{name}` has non-integral underlying type `{underlying}`")]
    BadEnumUnderlying { name: String, underlying: String },

    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CatalogError {
    /// Whether the driver may skip the offending type/member and continue.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::GenericDefinition(_) | Self::Inaccessible(_))
    }
}
