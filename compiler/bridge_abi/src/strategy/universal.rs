//! The 32-bit and 64-bit universal conventions.
//!
//! Neither target splits aggregates across register classes the way ARM64
//! does. A composite is passed as an opaque block whose only relevant
//! properties are its size and whether it needs 8-byte alignment; the native
//! compiler on the far side of the emitted code takes care of the rest.

use bridge_meta::{Target, TypeId};

use crate::{AbiError, LayoutCalculator, SizeAndAlignment, TypeCategory};

use super::AbiStrategy;

/// Generic aggregate bucket shared by both universal targets.
fn aligned_aggregate(sa: SizeAndAlignment) -> TypeCategory {
    if sa.alignment <= 4 {
        TypeCategory::Align1(sa.size)
    } else {
        TypeCategory::Align8(sa.size)
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct X86Abi;

impl AbiStrategy for X86Abi {
    fn target(&self) -> Target {
        Target::X86
    }

    fn classify_aggregate(
        &self,
        _layout: &LayoutCalculator<'_>,
        _ty: TypeId,
        sa: SizeAndAlignment,
        _is_return: bool,
    ) -> Result<TypeCategory, AbiError> {
        Ok(aligned_aggregate(sa))
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct X64Abi;

impl AbiStrategy for X64Abi {
    fn target(&self) -> Target {
        Target::X64
    }

    fn classify_aggregate(
        &self,
        _layout: &LayoutCalculator<'_>,
        _ty: TypeId,
        sa: SizeAndAlignment,
        _is_return: bool,
    ) -> Result<TypeCategory, AbiError> {
        Ok(aligned_aggregate(sa))
    }
}
