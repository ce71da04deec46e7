//! Per-target ABI classification.
//!
//! Each supported calling convention is one implementation of
//! [`AbiStrategy`]. The rules every target shares (by-ref and reference types
//! travel as pointers, enums as their underlying scalar, builtins through a
//! fixed table) live in the provided [`AbiStrategy::classify`]; only aggregate
//! classification differs between targets.
//!
//! A strategy is chosen by value at the start of a run via [`strategy_for`].
//! Strategies hold no state; all memoization lives in the run's
//! [`LayoutCalculator`].

use std::fmt;

use bridge_meta::{ParamDef, Primitive, Target, TypeId, TypeKind};

use crate::{AbiError, LayoutCalculator, SizeAndAlignment, TypeCategory};

mod arm64;
mod universal;

pub use arm64::Arm64Abi;
pub use universal::{X64Abi, X86Abi};

/// The classification rules of one target.
pub trait AbiStrategy: fmt::Debug + Sync {
    fn target(&self) -> Target;

    #[inline]
    fn word_size(&self) -> u32 {
        self.target().word_size()
    }

    /// Category of pointers, receivers and reference types.
    #[inline]
    fn pointer_category(&self) -> TypeCategory {
        TypeCategory::pointer(self.word_size())
    }

    /// Bytes between an object reference and its first instance field.
    #[inline]
    fn object_header_size(&self) -> u32 {
        2 * self.word_size()
    }

    /// Size and alignment of `ty`, cross-checked against the runtime.
    fn size_and_alignment(
        &self,
        layout: &LayoutCalculator<'_>,
        ty: TypeId,
    ) -> Result<SizeAndAlignment, AbiError> {
        debug_assert_eq!(layout.target(), self.target());
        layout.checked_size_and_alignment(ty)
    }

    /// Classify a composite value type whose layout is `sa`.
    fn classify_aggregate(
        &self,
        layout: &LayoutCalculator<'_>,
        ty: TypeId,
        sa: SizeAndAlignment,
        is_return: bool,
    ) -> Result<TypeCategory, AbiError>;

    /// Classify a parameter (or, with `is_return`, a return value).
    fn classify(
        &self,
        layout: &LayoutCalculator<'_>,
        param: ParamDef,
        is_return: bool,
    ) -> Result<TypeCategory, AbiError> {
        if param.by_ref {
            return Ok(self.pointer_category());
        }

        let def = layout.catalog().type_def(param.ty)?;
        let category = match &def.kind {
            TypeKind::Primitive(Primitive::Void) => {
                if !is_return {
                    return Err(AbiError::unsupported(
                        &def.name,
                        "void cannot be passed by value",
                    ));
                }
                TypeCategory::Void
            }
            TypeKind::Primitive(prim) => scalar_category(*prim, self.word_size()),
            TypeKind::Enum { underlying } => scalar_category(*underlying, self.word_size()),
            TypeKind::Class | TypeKind::Interface | TypeKind::Delegate | TypeKind::Array { .. } => {
                self.pointer_category()
            }
            TypeKind::Struct(_) => {
                let sa = self.size_and_alignment(layout, param.ty)?;
                self.classify_aggregate(layout, param.ty, sa, is_return)?
            }
        };

        tracing::trace!(
            ty = %def.name,
            by_ref = param.by_ref,
            is_return,
            category = %category,
            target = %self.target(),
            "classified"
        );
        Ok(category)
    }
}

/// Strategy implementing `target`'s rules.
pub fn strategy_for(target: Target) -> &'static dyn AbiStrategy {
    match target {
        Target::X86 => &X86Abi,
        Target::X64 => &X64Abi,
        Target::Arm64 => &Arm64Abi,
    }
}

/// Fixed category of a non-void builtin.
pub fn scalar_category(prim: Primitive, word_size: u32) -> TypeCategory {
    match prim {
        Primitive::Void => TypeCategory::Void,
        Primitive::Bool | Primitive::I8 | Primitive::U8 => TypeCategory::I1,
        Primitive::Char | Primitive::I16 | Primitive::U16 => TypeCategory::I2,
        Primitive::I32 | Primitive::U32 => TypeCategory::I4,
        Primitive::I64 | Primitive::U64 => TypeCategory::I8,
        Primitive::F32 => TypeCategory::R4,
        Primitive::F64 => TypeCategory::R8,
        Primitive::ISize | Primitive::USize | Primitive::Object | Primitive::String => {
            TypeCategory::pointer(word_size)
        }
    }
}
