//! Driver errors.
//!
//! Every fatal failure of a run ends up as a [`GenError`]. Classification
//! failures carry the fully qualified method that triggered them, since a
//! bare type name rarely says which call site needs fixing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use bridge_abi::AbiError;
use bridge_emit::{EmitError, TemplateError};
use bridge_meta::CatalogError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config `{}`: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown target `{0}` (expected x86, x64 or arm64)")]
    UnknownTarget(String),

    #[error("unknown option `{0}`")]
    UnknownOption(String),

    #[error("option `{0}` needs a value")]
    MissingValue(&'static str),
}

#[derive(Debug, Error)]
pub enum GenError {
    /// A method whose signature cannot be built.
    #[error("in `{method}`: {source}")]
    Method { method: String, source: AbiError },

    /// A forced extra signature that does not parse.
    #[error("extra signature: {0}")]
    ExtraSignature(#[source] AbiError),

    #[error("cannot read catalog `{}`: {source}", .path.display())]
    ReadCatalog { path: PathBuf, source: io::Error },

    #[error("no catalog configured (use --catalog=<path>)")]
    MissingCatalog,

    #[error("no template configured (use --template=<path>)")]
    MissingTemplate,

    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
