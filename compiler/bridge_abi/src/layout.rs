//! Size and alignment of catalog types.
//!
//! Walks composite field lists the way the runtime lays out instances:
//! sequential or explicit placement, alignment clipped to the declared
//! packing, total size rounded to the largest field alignment, and an
//! optional size override. Results are memoized per run.
//!
//! Every composite that reaches classification is checked against the
//! runtime-measured size the catalog carries. A disagreement is never
//! tolerated: the bridge emitted from a wrong layout corrupts memory
//! silently at run time.
//!
//! A composite the catalog cannot introspect (an open generic definition or
//! a type hidden from reflection) has no usable field list; asking for its
//! layout yields the matching skippable [`CatalogError`].

use std::cell::RefCell;

use rustc_hash::{FxHashMap, FxHashSet};

use bridge_meta::{
    Catalog, CatalogError, LayoutKind, ParamDef, Primitive, StructDef, Target, TypeId, TypeKind,
};

use crate::AbiError;

/// Packing applied when a composite declares none.
pub const DEFAULT_PACKING: u32 = 8;

/// Byte size and alignment of a type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SizeAndAlignment {
    pub size: u32,
    pub alignment: u32,
}

impl SizeAndAlignment {
    #[inline]
    pub const fn new(size: u32, alignment: u32) -> Self {
        Self { size, alignment }
    }

    /// A pointer on a target with the given word size.
    #[inline]
    pub const fn word(word_size: u32) -> Self {
        Self::new(word_size, word_size)
    }
}

/// Fixed layout of a builtin. `None` for `void`, which has no storage.
pub fn scalar_layout(prim: Primitive, word_size: u32) -> Option<SizeAndAlignment> {
    let sa = match prim {
        Primitive::Void => return None,
        Primitive::Bool | Primitive::I8 | Primitive::U8 => SizeAndAlignment::new(1, 1),
        Primitive::Char | Primitive::I16 | Primitive::U16 => SizeAndAlignment::new(2, 2),
        Primitive::I32 | Primitive::U32 | Primitive::F32 => SizeAndAlignment::new(4, 4),
        Primitive::I64 | Primitive::U64 | Primitive::F64 => SizeAndAlignment::new(8, 8),
        Primitive::ISize | Primitive::USize | Primitive::Object | Primitive::String => {
            SizeAndAlignment::word(word_size)
        }
    };
    Some(sa)
}

/// Per-run layout calculator.
///
/// Owns the memo table and the cycle-detection set, so a fresh calculator
/// means fresh state.
///
/// # Interior Mutability
///
/// Uses `RefCell` for the caches because classification shares one
/// calculator through `&self` while recursing into field types.
pub struct LayoutCalculator<'c> {
    catalog: &'c dyn Catalog,
    target: Target,
    cache: RefCell<FxHashMap<TypeId, SizeAndAlignment>>,
    /// Composites currently being laid out. Re-entering one means a value
    /// type contains itself by value.
    computing: RefCell<FxHashSet<TypeId>>,
    /// Composites already compared against their measured size.
    verified: RefCell<FxHashSet<TypeId>>,
}

impl<'c> LayoutCalculator<'c> {
    pub fn new(catalog: &'c dyn Catalog, target: Target) -> Self {
        Self {
            catalog,
            target,
            cache: RefCell::new(FxHashMap::default()),
            computing: RefCell::new(FxHashSet::default()),
            verified: RefCell::new(FxHashSet::default()),
        }
    }

    pub fn catalog(&self) -> &'c dyn Catalog {
        self.catalog
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Number of composites memoized so far.
    #[cfg(test)]
    pub(crate) fn cached_composites(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Layout of a parameter as it sits in memory; by-ref parameters are pointers.
    pub fn of_param(&self, param: ParamDef) -> Result<SizeAndAlignment, AbiError> {
        if param.by_ref {
            return Ok(SizeAndAlignment::word(self.target.word_size()));
        }
        self.size_and_alignment(param.ty)
    }

    /// Size and alignment of `ty` on this calculator's target.
    pub fn size_and_alignment(&self, ty: TypeId) -> Result<SizeAndAlignment, AbiError> {
        let word = self.target.word_size();
        let def = self.catalog.type_def(ty)?;
        match &def.kind {
            TypeKind::Primitive(prim) => scalar_layout(*prim, word)
                .ok_or_else(|| AbiError::unsupported(&def.name, "void has no storage")),
            TypeKind::Enum { underlying } => scalar_layout(*underlying, word)
                .ok_or_else(|| AbiError::unsupported(&def.name, "enum over void")),
            TypeKind::Class | TypeKind::Interface | TypeKind::Delegate | TypeKind::Array { .. } => {
                Ok(SizeAndAlignment::word(word))
            }
            TypeKind::Struct(_) if def.generic_definition => {
                Err(CatalogError::GenericDefinition(def.name.clone()).into())
            }
            TypeKind::Struct(_) if !def.reflectable => {
                Err(CatalogError::Inaccessible(def.name.clone()).into())
            }
            TypeKind::Struct(layout) => self.composite(ty, &def.name, layout),
        }
    }

    /// Like [`size_and_alignment`](Self::size_and_alignment), additionally
    /// comparing the size with the catalog's runtime measurement.
    pub fn checked_size_and_alignment(&self, ty: TypeId) -> Result<SizeAndAlignment, AbiError> {
        let sa = self.size_and_alignment(ty)?;
        if self.verified.borrow().contains(&ty) {
            return Ok(sa);
        }
        if let Some(measured) = self.catalog.measured_size(ty, self.target) {
            if measured != sa.size {
                return Err(AbiError::LayoutMismatch {
                    ty: self.catalog.type_name(ty),
                    target: self.target,
                    computed: sa.size,
                    measured,
                });
            }
        }
        self.verified.borrow_mut().insert(ty);
        Ok(sa)
    }

    fn composite(
        &self,
        ty: TypeId,
        name: &str,
        layout: &StructDef,
    ) -> Result<SizeAndAlignment, AbiError> {
        if let Some(&cached) = self.cache.borrow().get(&ty) {
            return Ok(cached);
        }

        if !self.computing.borrow_mut().insert(ty) {
            return Err(AbiError::unsupported(
                name,
                "value type contains itself by value",
            ));
        }
        let result = self.lay_out_fields(name, layout);
        self.computing.borrow_mut().remove(&ty);

        let sa = result?;
        tracing::trace!(ty = name, size = sa.size, alignment = sa.alignment, target = %self.target, "laid out");
        self.cache.borrow_mut().insert(ty, sa);
        Ok(sa)
    }

    fn lay_out_fields(&self, name: &str, layout: &StructDef) -> Result<SizeAndAlignment, AbiError> {
        let packing = match layout.pack {
            Some(pack) if pack > 0 => pack,
            _ => DEFAULT_PACKING,
        };

        let mut size = 0u32;
        let mut alignment = 1u32;
        let mut any_field = false;

        for field in layout.instance_fields() {
            any_field = true;
            let field_sa = self.size_and_alignment(field.ty)?;
            let field_align = field_sa.alignment.min(packing);
            alignment = alignment.max(field_align);

            match layout.layout {
                LayoutKind::Sequential => {
                    size = size
                        .checked_next_multiple_of(field_align)
                        .and_then(|offset| offset.checked_add(field_sa.size))
                        .ok_or_else(|| too_large(name))?;
                }
                LayoutKind::Explicit => {
                    let offset = field.offset.ok_or_else(|| {
                        AbiError::unsupported(
                            name,
                            format!("field `{}` has no offset under explicit layout", field.name),
                        )
                    })?;
                    let end = offset
                        .checked_add(field_sa.size)
                        .ok_or_else(|| too_large(name))?;
                    size = size.max(end);
                }
            }
        }

        let mut sa = if any_field {
            let size = size
                .checked_next_multiple_of(alignment)
                .ok_or_else(|| too_large(name))?;
            SizeAndAlignment::new(size, alignment)
        } else {
            SizeAndAlignment::new(1, 1)
        };

        if let Some(declared) = layout.size.filter(|&declared| declared >= sa.size) {
            sa.size = declared;
            while declared % sa.alignment != 0 {
                sa.alignment /= 2;
            }
        }

        Ok(sa)
    }
}

fn too_large(name: &str) -> AbiError {
    AbiError::unsupported(name, "size exceeds the 32-bit address space")
}
