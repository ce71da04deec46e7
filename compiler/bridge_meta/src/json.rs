//! JSON catalog files.
//!
//! The reflection layer dumps the program it scanned as JSON; this module
//! turns that dump into an [`InMemoryCatalog`]. Types refer to each other by
//! name, so loading is two-pass: every name is reserved first, then each
//! definition is resolved against the full name table.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    CatalogError, FieldDef, InMemoryCatalog, LayoutKind, MethodDef, MethodKind, ParamDef,
    Primitive, StructDef, Target, TypeDef, TypeId, TypeKind,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    types: Vec<TypeEntry>,
}

#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindTag {
    Struct,
    Enum,
    Class,
    Interface,
    Delegate,
    Array,
}

#[derive(Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum LayoutTag {
    #[default]
    Sequential,
    Explicit,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeEntry {
    name: String,
    #[serde(default)]
    assembly: String,
    kind: KindTag,
    #[serde(default = "default_true")]
    public: bool,
    #[serde(default)]
    generic_definition: bool,
    #[serde(default = "default_true")]
    reflectable: bool,
    #[serde(default)]
    layout: LayoutTag,
    #[serde(default)]
    pack: Option<u32>,
    #[serde(default)]
    size: Option<u32>,
    #[serde(default)]
    fields: Vec<FieldEntry>,
    #[serde(default)]
    underlying: Option<String>,
    #[serde(default)]
    element: Option<String>,
    #[serde(default)]
    methods: Vec<MethodEntry>,
    #[serde(default)]
    measured_size: FxHashMap<Target, u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldEntry {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    offset: Option<u32>,
    #[serde(default)]
    ignore_for_size: bool,
}

#[derive(Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum MethodKindTag {
    #[default]
    Instance,
    Static,
    Constructor,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MethodEntry {
    name: String,
    #[serde(default)]
    kind: MethodKindTag,
    #[serde(default, rename = "virtual")]
    is_virtual: bool,
    #[serde(default = "default_true")]
    public: bool,
    #[serde(default)]
    generic: bool,
    #[serde(default)]
    params: Vec<ParamEntry>,
    #[serde(default = "default_void")]
    ret: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamEntry {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    by_ref: bool,
}

fn default_true() -> bool {
    true
}

fn default_void() -> String {
    Primitive::Void.name().to_owned()
}

impl InMemoryCatalog {
    /// Load a catalog from its JSON form.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(text)?;
        let mut catalog = Self::new();

        let mut ids = Vec::with_capacity(file.types.len());
        for entry in &file.types {
            ids.push(catalog.reserve(&entry.name, &entry.assembly)?);
        }

        for (entry, id) in file.types.into_iter().zip(ids) {
            let def = resolve_type(&catalog, entry)?;
            catalog.replace(id, def);
        }

        tracing::debug!(types = catalog.len(), "loaded catalog");
        Ok(catalog)
    }
}

fn resolve_name(catalog: &InMemoryCatalog, name: &str, context: &str) -> Result<TypeId, CatalogError> {
    catalog
        .lookup(name)
        .ok_or_else(|| CatalogError::UnknownTypeName {
            name: name.to_owned(),
            context: context.to_owned(),
        })
}

fn resolve_type(catalog: &InMemoryCatalog, entry: TypeEntry) -> Result<TypeDef, CatalogError> {
    let context = entry.name.as_str();
    let kind = match entry.kind {
        KindTag::Struct => {
            let fields = entry
                .fields
                .iter()
                .map(|f| {
                    Ok(FieldDef {
                        name: f.name.clone(),
                        ty: resolve_name(catalog, &f.ty, context)?,
                        offset: f.offset,
                        ignore_for_size: f.ignore_for_size,
                    })
                })
                .collect::<Result<Vec<_>, CatalogError>>()?;
            TypeKind::Struct(StructDef {
                fields,
                layout: match entry.layout {
                    LayoutTag::Sequential => LayoutKind::Sequential,
                    LayoutTag::Explicit => LayoutKind::Explicit,
                },
                pack: entry.pack,
                size: entry.size,
            })
        }
        KindTag::Enum => {
            let underlying_name = entry.underlying.as_deref().unwrap_or("i32");
            let underlying = Primitive::ALL
                .into_iter()
                .find(|p| p.name() == underlying_name && p.is_integral())
                .ok_or_else(|| CatalogError::BadEnumUnderlying {
                    name: entry.name.clone(),
                    underlying: underlying_name.to_owned(),
                })?;
            TypeKind::Enum { underlying }
        }
        KindTag::Class => TypeKind::Class,
        KindTag::Interface => TypeKind::Interface,
        KindTag::Delegate => TypeKind::Delegate,
        KindTag::Array => TypeKind::Array {
            element: match &entry.element {
                Some(name) => resolve_name(catalog, name, context)?,
                None => TypeId::OBJECT,
            },
        },
    };

    let methods = entry
        .methods
        .iter()
        .map(|m| resolve_method(catalog, m, context))
        .collect::<Result<Vec<_>, CatalogError>>()?;

    Ok(TypeDef {
        name: entry.name,
        assembly: entry.assembly,
        kind,
        public: entry.public,
        generic_definition: entry.generic_definition,
        reflectable: entry.reflectable,
        methods,
        measured_size: entry.measured_size,
    })
}

fn resolve_method(
    catalog: &InMemoryCatalog,
    entry: &MethodEntry,
    owner: &str,
) -> Result<MethodDef, CatalogError> {
    let context = format!("{owner}::{}", entry.name);
    let params = entry
        .params
        .iter()
        .map(|p| {
            Ok(ParamDef {
                ty: resolve_name(catalog, &p.ty, &context)?,
                by_ref: p.by_ref,
            })
        })
        .collect::<Result<Vec<_>, CatalogError>>()?;

    let kind = match entry.kind {
        MethodKindTag::Instance => MethodKind::Instance,
        MethodKindTag::Static => MethodKind::Static,
        MethodKindTag::Constructor => MethodKind::Constructor,
    };
    let ret = match kind {
        MethodKind::Constructor => TypeId::VOID,
        MethodKind::Static | MethodKind::Instance => resolve_name(catalog, &entry.ret, &context)?,
    };

    Ok(MethodDef {
        name: entry.name.clone(),
        kind,
        is_virtual: entry.is_virtual,
        public: entry.public,
        generic: entry.generic,
        params,
        ret,
    })
}
