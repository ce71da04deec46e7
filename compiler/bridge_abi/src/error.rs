//! Layout and classification errors.

use bridge_meta::{CatalogError, Target};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AbiError {
    /// Computed layout disagrees with the runtime's measurement.
    ///
    /// Always a bug in the layout rules for some field shape; never tolerated.
    #[error(
        "layout of `{ty}` on {target} computed as {computed} bytes but the runtime measures \
         {measured} bytes"
    )]
    LayoutMismatch {
        ty: String,
        target: Target,
        computed: u32,
        measured: u32,
    },

    /// A type whose shape no category can represent.
    #[error("unsupported shape `{ty}`: {reason}")]
    UnsupportedShape { ty: String, reason: String },

    /// A canonical signature name that does not parse.
    #[error("malformed signature name `{name}`: {reason}")]
    MalformedSignature { name: String, reason: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl AbiError {
    pub(crate) fn unsupported(ty: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedShape {
            ty: ty.into(),
            reason: reason.into(),
        }
    }
}
