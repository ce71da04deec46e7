//! Bridge signatures.
//!
//! A [`BridgeSignature`] is the physical shape of a call: the category of
//! every argument slot plus the category of the return. It is computed once
//! per method by [`SignatureBuilder`], and everything downstream (dedup,
//! sorting, emission, runtime lookup) keys on its canonical name.
//!
//! # Canonical names
//!
//! The return tag followed by each parameter tag, e.g. `vi4r8C24` for
//! `void (i32, f64, <24-byte 8-aligned aggregate>)`. Names contain only
//! ASCII letters and digits, so they double as C identifier suffixes, and
//! [`BridgeSignature::parse`] recovers the signature from one.

use smallvec::SmallVec;

use bridge_meta::{MethodDef, MethodKind, ParamDef, TypeId};

use crate::category::{parse_tag, STACK_SLOT_SIZE};
use crate::{AbiError, AbiStrategy, LayoutCalculator, TypeCategory};

/// One argument position of a bridge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamSlot {
    pub index: u32,
    pub category: TypeCategory,
    /// Wider than one machine word, or an oversized aggregate behind a hidden pointer.
    pub native_by_address: bool,
    /// Wider than one interpreter stack slot; the interpreter sees it through a pointer.
    pub interp_by_address: bool,
}

impl ParamSlot {
    pub fn new(index: u32, category: TypeCategory, word_size: u32) -> Self {
        let size = category.size(word_size);
        let by_ref = category == TypeCategory::ByRef;
        Self {
            index,
            category,
            native_by_address: by_ref || size > word_size,
            interp_by_address: by_ref || size > STACK_SLOT_SIZE,
        }
    }
}

/// The return position of a bridge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReturnSlot {
    pub category: TypeCategory,
    /// Interpreter stack slots reserved for the returned value.
    pub slot_count: u32,
}

impl ReturnSlot {
    pub fn new(category: TypeCategory) -> Self {
        Self {
            category,
            slot_count: category.return_slots(),
        }
    }

    #[inline]
    pub fn is_void(self) -> bool {
        self.category == TypeCategory::Void
    }
}

/// Canonical physical signature of a call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BridgeSignature {
    params: SmallVec<[ParamSlot; 8]>,
    ret: ReturnSlot,
    name: String,
}

impl BridgeSignature {
    pub fn new(
        ret: TypeCategory,
        params: impl IntoIterator<Item = TypeCategory>,
        word_size: u32,
    ) -> Self {
        let params: SmallVec<[ParamSlot; 8]> = params
            .into_iter()
            .enumerate()
            .map(|(i, category)| ParamSlot::new(i as u32, category, word_size))
            .collect();

        let mut name = String::with_capacity(2 + 3 * params.len());
        ret.write_tag(&mut name);
        for param in &params {
            param.category.write_tag(&mut name);
        }

        Self {
            params,
            ret: ReturnSlot::new(ret),
            name,
        }
    }

    /// Rebuild a signature from its canonical name.
    pub fn parse(name: &str, word_size: u32) -> Result<Self, AbiError> {
        let malformed = |reason: &str| AbiError::MalformedSignature {
            name: name.to_owned(),
            reason: reason.to_owned(),
        };

        let (ret, mut rest) = parse_tag(name).ok_or_else(|| malformed("no return tag"))?;
        let mut params = Vec::new();
        while !rest.is_empty() {
            let (category, tail) = parse_tag(rest)
                .ok_or_else(|| malformed(&format!("unrecognized tag at `{rest}`")))?;
            if category == TypeCategory::Void {
                return Err(malformed("void parameter"));
            }
            params.push(category);
            rest = tail;
        }

        Ok(Self::new(ret, params, word_size))
    }

    pub fn params(&self) -> &[ParamSlot] {
        &self.params
    }

    pub fn ret(&self) -> ReturnSlot {
        self.ret
    }

    pub fn canonical_name(&self) -> &str {
        &self.name
    }

    /// Parameter categories in slot order.
    pub fn param_categories(&self) -> impl Iterator<Item = TypeCategory> + '_ {
        self.params.iter().map(|p| p.category)
    }
}

/// A method as far as signature building is concerned.
#[derive(Copy, Clone, Debug)]
pub struct MethodShape<'a> {
    pub kind: MethodKind,
    pub params: &'a [ParamDef],
    pub ret: TypeId,
}

impl<'a> From<&'a MethodDef> for MethodShape<'a> {
    fn from(method: &'a MethodDef) -> Self {
        Self {
            kind: method.kind,
            params: &method.params,
            ret: method.ret,
        }
    }
}

/// Turns method shapes into bridge signatures for one target.
pub struct SignatureBuilder<'r, 'c> {
    strategy: &'static dyn AbiStrategy,
    layout: &'r LayoutCalculator<'c>,
}

impl<'r, 'c> SignatureBuilder<'r, 'c> {
    pub fn new(strategy: &'static dyn AbiStrategy, layout: &'r LayoutCalculator<'c>) -> Self {
        debug_assert_eq!(strategy.target(), layout.target());
        Self { strategy, layout }
    }

    pub fn strategy(&self) -> &'static dyn AbiStrategy {
        self.strategy
    }

    pub fn build(&self, shape: &MethodShape<'_>) -> Result<BridgeSignature, AbiError> {
        let receiver = shape
            .kind
            .has_receiver()
            .then(|| self.strategy.pointer_category());

        let declared = shape
            .params
            .iter()
            .map(|&param| self.strategy.classify(self.layout, param, false))
            .collect::<Result<SmallVec<[TypeCategory; 8]>, AbiError>>()?;

        let ret = match shape.kind {
            MethodKind::Constructor => TypeCategory::Void,
            MethodKind::Static | MethodKind::Instance => {
                self.strategy
                    .classify(self.layout, ParamDef::value(shape.ret), true)?
            }
        };

        Ok(BridgeSignature::new(
            ret,
            receiver.into_iter().chain(declared),
            self.strategy.word_size(),
        ))
    }
}
