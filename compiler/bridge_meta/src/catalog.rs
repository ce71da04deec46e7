//! The catalog interface and its in-memory implementation.
//!
//! A catalog is the generator's only view of the program: which types exist,
//! what they contain, and which methods they declare. The real reflection
//! layer lives outside this workspace; [`InMemoryCatalog`] backs both the
//! JSON input format and the test suites.

use rustc_hash::FxHashMap;

use crate::{CatalogError, MethodDef, Primitive, Target, TypeDef, TypeId};

/// Accessibility filter applied when enumerating members.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberFilter {
    /// Only publicly reachable types and members.
    pub public_only: bool,
}

impl MemberFilter {
    pub const ALL: Self = Self { public_only: false };
    pub const PUBLIC: Self = Self { public_only: true };

    #[inline]
    pub fn admits(self, public: bool) -> bool {
        public || !self.public_only
    }
}

/// Read-only access to the reflected program.
pub trait Catalog {
    /// Look up a type by id.
    fn type_def(&self, id: TypeId) -> Result<&TypeDef, CatalogError>;

    /// All non-builtin types, excluding those in the given assemblies.
    ///
    /// The order is the catalog's declaration order. Callers must not rely on
    /// it for output ordering.
    fn types(&self, excluded_assemblies: &[String]) -> Vec<TypeId>;

    /// Methods and constructors declared on `id` that pass `filter`.
    fn methods(&self, id: TypeId, filter: MemberFilter) -> Result<Vec<&MethodDef>, CatalogError>;

    /// Runtime-measured instance size of `id` on `target`, if known.
    fn measured_size(&self, id: TypeId, target: Target) -> Option<u32>;

    /// Display name for diagnostics.
    fn type_name(&self, id: TypeId) -> String {
        self.type_def(id)
            .map_or_else(|_| format!("<type #{}>", id.raw()), |def| def.name.clone())
    }
}

/// A catalog held entirely in memory.
#[derive(Clone, Debug)]
pub struct InMemoryCatalog {
    types: Vec<TypeDef>,
    by_name: FxHashMap<String, TypeId>,
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCatalog {
    /// An empty catalog with the builtins pre-registered at their fixed ids.
    pub fn new() -> Self {
        let mut catalog = Self {
            types: Vec::with_capacity(TypeId::BUILTIN_COUNT as usize),
            by_name: FxHashMap::default(),
        };
        for prim in Primitive::ALL {
            let id = catalog.push(TypeDef::builtin(prim));
            debug_assert_eq!(id, prim.type_id());
        }
        catalog
    }

    fn push(&mut self, def: TypeDef) -> TypeId {
        let id = TypeId::from_raw(self.types.len() as u32);
        self.by_name.insert(def.name.clone(), id);
        self.types.push(def);
        id
    }

    /// Register a type. Names must be unique.
    pub fn add(&mut self, def: TypeDef) -> Result<TypeId, CatalogError> {
        if self.by_name.contains_key(&def.name) {
            return Err(CatalogError::DuplicateType(def.name));
        }
        Ok(self.push(def))
    }

    /// Reserve an id for a name whose definition is filled in later.
    ///
    /// Lets loaders resolve forward references before every type is built.
    pub(crate) fn reserve(&mut self, name: &str, assembly: &str) -> Result<TypeId, CatalogError> {
        self.add(TypeDef::new(
            name,
            assembly,
            crate::TypeKind::Primitive(Primitive::Void),
        ))
    }

    pub(crate) fn replace(&mut self, id: TypeId, def: TypeDef) {
        debug_assert_eq!(self.types[id.index()].name, def.name);
        self.types[id.index()] = def;
    }

    /// Attach a method to an existing type.
    pub fn add_method(&mut self, owner: TypeId, method: MethodDef) -> Result<(), CatalogError> {
        let def = self
            .types
            .get_mut(owner.index())
            .ok_or(CatalogError::UnknownTypeId(owner.raw()))?;
        def.methods.push(method);
        Ok(())
    }

    /// Find a type by name.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Number of registered types, builtins included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.len() <= TypeId::BUILTIN_COUNT as usize
    }
}

impl Catalog for InMemoryCatalog {
    fn type_def(&self, id: TypeId) -> Result<&TypeDef, CatalogError> {
        self.types
            .get(id.index())
            .ok_or(CatalogError::UnknownTypeId(id.raw()))
    }

    fn types(&self, excluded_assemblies: &[String]) -> Vec<TypeId> {
        self.types
            .iter()
            .enumerate()
            .skip(TypeId::BUILTIN_COUNT as usize)
            .filter(|(_, def)| !excluded_assemblies.iter().any(|a| *a == def.assembly))
            .map(|(i, _)| TypeId::from_raw(i as u32))
            .collect()
    }

    fn methods(&self, id: TypeId, filter: MemberFilter) -> Result<Vec<&MethodDef>, CatalogError> {
        let def = self.type_def(id)?;
        if def.generic_definition {
            return Err(CatalogError::GenericDefinition(def.name.clone()));
        }
        if !def.reflectable {
            return Err(CatalogError::Inaccessible(def.name.clone()));
        }
        Ok(def
            .methods
            .iter()
            .filter(|m| filter.admits(m.public))
            .collect())
    }

    fn measured_size(&self, id: TypeId, target: Target) -> Option<u32> {
        self.types
            .get(id.index())
            .and_then(|def| def.measured_size.get(&target).copied())
    }
}

#[cfg(test)]
mod tests;
