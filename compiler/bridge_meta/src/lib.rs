//! Catalog model for the bridge generator.
//!
//! The generator never reflects over a program itself. It reads a
//! [`Catalog`]: an enumerable set of types with their fields, layout
//! overrides and declared methods, plus runtime-measured sizes used to
//! cross-check layout computation.
//!
//! - [`TypeId`]: dense handle; builtins live at fixed indices
//! - [`TypeDef`] / [`TypeKind`] / [`StructDef`]: what a type is made of
//! - [`MethodDef`] / [`ParamDef`]: what a method takes and returns
//! - [`InMemoryCatalog`]: the catalog behind JSON input and tests

// Type tables are indexed by u32 ids; catalogs never approach 4 billion entries.
#![allow(clippy::cast_possible_truncation)]

mod catalog;
mod error;
mod json;
mod target;
mod type_id;
mod types;

pub use catalog::{Catalog, InMemoryCatalog, MemberFilter};
pub use error::CatalogError;
pub use target::Target;
pub use type_id::TypeId;
pub use types::{
    FieldDef, LayoutKind, MethodDef, MethodKind, ParamDef, Primitive, StructDef, TypeDef,
    TypeKind,
};
