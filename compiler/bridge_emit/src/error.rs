//! Emission and template errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    /// An adjustor thunk was requested for a signature without a
    /// pointer-sized receiver in slot 0.
    #[error("adjustor thunk `{name}` has no pointer-sized receiver")]
    MissingReceiver { name: String },
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template has no `{tag}` marker line")]
    MissingMarker { tag: String },

    #[error("template has more than one `{tag}` marker line")]
    DuplicateMarker { tag: String },

    #[error("end marker of `{marker}` comes before its begin marker")]
    MarkersOutOfOrder { marker: String },

    #[error("cannot read template `{}`: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write `{}`: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}
