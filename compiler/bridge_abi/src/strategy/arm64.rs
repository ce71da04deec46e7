//! AArch64 procedure call standard.
//!
//! Aggregates are classified in three steps:
//!
//! 1. Homogeneous floating-point aggregates (2-4 leaves, all `f32` or all
//!    `f64`, no padding) travel in SIMD registers.
//! 2. Anything up to 16 bytes travels in one or two general registers.
//! 3. Larger parameters are copied by the caller and passed through a hidden
//!    pointer; larger returns are written by the callee into caller-provided
//!    space, which the emitted code treats as a sized value.

use bridge_meta::{Catalog, Primitive, Target, TypeId, TypeKind};

use crate::{AbiError, LayoutCalculator, SizeAndAlignment, TypeCategory};

use super::AbiStrategy;

/// Leaf limit for a homogeneous aggregate.
const MAX_HFA_LEAVES: u32 = 4;

#[derive(Copy, Clone, Debug, Default)]
pub struct Arm64Abi;

impl AbiStrategy for Arm64Abi {
    fn target(&self) -> Target {
        Target::Arm64
    }

    fn classify_aggregate(
        &self,
        layout: &LayoutCalculator<'_>,
        ty: TypeId,
        sa: SizeAndAlignment,
        is_return: bool,
    ) -> Result<TypeCategory, AbiError> {
        if let Some(hfa) = hfa_category(layout.catalog(), ty, sa.size)? {
            return Ok(hfa);
        }

        Ok(match sa.size {
            0..=8 => TypeCategory::I8,
            9..=16 => TypeCategory::I16,
            size if is_return => TypeCategory::Align1(size),
            _ => TypeCategory::ByRef,
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FloatLeaf {
    F32,
    F64,
}

impl FloatLeaf {
    const fn size(self) -> u32 {
        match self {
            Self::F32 => 4,
            Self::F64 => 8,
        }
    }
}

/// Leaves seen so far during the recursive walk.
#[derive(Default)]
struct Leaves {
    kind: Option<FloatLeaf>,
    count: u32,
}

/// HFA category of the composite `ty` of `size` bytes, if it is one.
fn hfa_category(
    catalog: &dyn Catalog,
    ty: TypeId,
    size: u32,
) -> Result<Option<TypeCategory>, AbiError> {
    // Only 2-4 leaves of 4 or 8 bytes can form an HFA.
    if !matches!(size, 8 | 12 | 16 | 24 | 32) {
        return Ok(None);
    }

    let mut leaves = Leaves::default();
    if !collect_leaves(catalog, ty, &mut leaves)? {
        return Ok(None);
    }
    let Some(kind) = leaves.kind else {
        return Ok(None);
    };
    if size != leaves.count * kind.size() {
        return Ok(None);
    }

    Ok(match (kind, leaves.count) {
        (FloatLeaf::F32, 2) => Some(TypeCategory::F32x2),
        (FloatLeaf::F32, 3) => Some(TypeCategory::F32x3),
        (FloatLeaf::F32, 4) => Some(TypeCategory::F32x4),
        (FloatLeaf::F64, 2) => Some(TypeCategory::F64x2),
        (FloatLeaf::F64, 3) => Some(TypeCategory::F64x3),
        (FloatLeaf::F64, 4) => Some(TypeCategory::F64x4),
        _ => None,
    })
}

/// Visit every instance field of `ty`, recursing into nested composites.
///
/// Returns `false` as soon as a leaf is not a float, the float kinds mix, or
/// the leaf count exceeds the limit.
fn collect_leaves(catalog: &dyn Catalog, ty: TypeId, leaves: &mut Leaves) -> Result<bool, AbiError> {
    let def = catalog.type_def(ty)?;
    let TypeKind::Struct(layout) = &def.kind else {
        return Ok(false);
    };

    for field in layout.instance_fields() {
        let field_def = catalog.type_def(field.ty)?;
        let leaf = match &field_def.kind {
            TypeKind::Primitive(Primitive::F32) => FloatLeaf::F32,
            TypeKind::Primitive(Primitive::F64) => FloatLeaf::F64,
            TypeKind::Struct(_) => {
                if !collect_leaves(catalog, field.ty, leaves)? {
                    return Ok(false);
                }
                continue;
            }
            _ => return Ok(false),
        };

        match leaves.kind {
            Some(kind) if kind != leaf => return Ok(false),
            _ => leaves.kind = Some(leaf),
        }
        leaves.count += 1;
        if leaves.count > MAX_HFA_LEAVES {
            return Ok(false);
        }
    }
    Ok(true)
}
