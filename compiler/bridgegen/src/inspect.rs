//! Single-type classification report, for checking how one type crosses
//! the boundary without running a whole generation.

use std::fmt;

use bridge_abi::{strategy_for, LayoutCalculator, SizeAndAlignment, TypeCategory};
use bridge_meta::{Catalog, ParamDef, Target, TypeId};

use crate::GenError;

/// How one type is laid out and passed on one target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeReport {
    pub name: String,
    pub target: Target,
    /// `None` for `void`.
    pub layout: Option<SizeAndAlignment>,
    /// Category as a parameter; `None` where the type cannot be a parameter.
    pub param: Option<TypeCategory>,
    pub ret: TypeCategory,
}

impl fmt::Display for TypeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}:", self.name, self.target)?;
        match self.layout {
            Some(sa) => write!(f, " size {} align {}", sa.size, sa.alignment)?,
            None => write!(f, " no storage")?,
        }
        match self.param {
            Some(param) => write!(f, ", param `{param}`")?,
            None => write!(f, ", not a parameter")?,
        }
        write!(f, ", return `{}`", self.ret)
    }
}

/// Classify `ty` on `target`.
///
/// Runs the same layout cross-check as a generation, so a measured size that
/// disagrees with the computed one is an error here too.
pub fn inspect_type(
    catalog: &dyn Catalog,
    target: Target,
    ty: TypeId,
) -> Result<TypeReport, GenError> {
    let strategy = strategy_for(target);
    let layout = LayoutCalculator::new(catalog, target);
    let name = catalog.type_def(ty)?.name.clone();
    let value = ParamDef::value(ty);

    let ret = strategy.classify(&layout, value, true)?;
    let (layout_sa, param) = if ret == TypeCategory::Void {
        (None, None)
    } else {
        (
            Some(strategy.size_and_alignment(&layout, ty)?),
            Some(strategy.classify(&layout, value, false)?),
        )
    };

    Ok(TypeReport {
        name,
        target,
        layout: layout_sa,
        param,
        ret,
    })
}
