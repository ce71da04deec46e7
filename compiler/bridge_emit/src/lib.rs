//! Bridge code emission.
//!
//! Renders sorted bridge signatures as C++ glue functions and stub tables,
//! and splices the result into a template file.
//!
//! - [`BridgeEmitter`]: per-target function and table emission
//! - [`c_type`]: the C type of each passing category
//! - [`splice`] / [`splice_file`]: marker-region replacement with atomic write

mod bridges;
mod c_types;
mod error;
mod output;
mod template;

pub use bridges::{function_name, function_prefix, BridgeEmitter};
pub use c_types::{c_type, stack_field, type_definition};
pub use error::{EmitError, TemplateError};
pub use output::{Emitter, StringEmitter, INDENT};
pub use template::{marker_tags, splice, splice_file, write_atomic, DEFAULT_MARKER};
