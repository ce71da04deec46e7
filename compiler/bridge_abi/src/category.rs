//! Passing categories.
//!
//! A [`TypeCategory`] says how a value crosses the managed/native boundary.
//! It carries no trace of the source type it came from: two types that land
//! in the same category are interchangeable as far as a bridge is concerned,
//! which is what makes signature deduplication sound.

use std::fmt;

/// How a parameter or return value is passed.
///
/// Equality is structural: variant plus carried size.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeCategory {
    Void,
    I1,
    I2,
    I4,
    I8,
    R4,
    R8,
    /// Aggregate of 9..=16 bytes passed in a register pair.
    I16,
    /// Oversized aggregate passed through a hidden pointer to a caller copy.
    ByRef,
    /// ARM64 homogeneous float aggregates.
    F32x2,
    F32x3,
    F32x4,
    /// ARM64 homogeneous double aggregates.
    F64x2,
    F64x3,
    F64x4,
    /// Generic aggregate of the given byte size, byte aligned.
    Align1(u32),
    Align2(u32),
    Align4(u32),
    Align8(u32),
}

impl TypeCategory {
    /// The integer category holding a pointer for a given word size.
    #[inline]
    pub const fn pointer(word_size: u32) -> Self {
        if word_size == 4 {
            Self::I4
        } else {
            Self::I8
        }
    }

    /// Storage size in bytes. `ByRef` occupies one machine word.
    pub const fn size(self, word_size: u32) -> u32 {
        match self {
            Self::Void => 0,
            Self::I1 => 1,
            Self::I2 => 2,
            Self::I4 | Self::R4 => 4,
            Self::I8 | Self::R8 | Self::F32x2 => 8,
            Self::F32x3 => 12,
            Self::I16 | Self::F32x4 | Self::F64x2 => 16,
            Self::F64x3 => 24,
            Self::F64x4 => 32,
            Self::ByRef => word_size,
            Self::Align1(n) | Self::Align2(n) | Self::Align4(n) | Self::Align8(n) => n,
        }
    }

    /// Whether this is one of the ARM64 homogeneous float aggregates.
    pub const fn is_hfa(self) -> bool {
        matches!(
            self,
            Self::F32x2 | Self::F32x3 | Self::F32x4 | Self::F64x2 | Self::F64x3 | Self::F64x4
        )
    }

    /// Whether this is a sized generic aggregate.
    #[cfg(test)]
    pub(crate) const fn is_generic_aggregate(self) -> bool {
        matches!(
            self,
            Self::Align1(_) | Self::Align2(_) | Self::Align4(_) | Self::Align8(_)
        )
    }

    /// Interpreter stack slots (8 bytes each) needed to hold a returned value.
    pub const fn return_slots(self) -> u32 {
        match self {
            Self::Void => 0,
            Self::I1
            | Self::I2
            | Self::I4
            | Self::I8
            | Self::R4
            | Self::R8
            | Self::ByRef
            | Self::F32x2 => 1,
            Self::I16 | Self::F32x3 | Self::F32x4 | Self::F64x2 => 2,
            Self::F64x3 => 3,
            Self::F64x4 => 4,
            Self::Align1(n) | Self::Align2(n) | Self::Align4(n) | Self::Align8(n) => {
                n.div_ceil(STACK_SLOT_SIZE)
            }
        }
    }

    /// Append this category's canonical-name tag.
    pub fn write_tag(self, out: &mut String) {
        out.push_str(&self.to_string());
    }
}

/// Size of one interpreter stack slot, independent of target word size.
pub const STACK_SLOT_SIZE: u32 = 8;

/// Renders the canonical-name tag.
///
/// Every tag starts with a letter, and no tag starts with a letter that can
/// follow a digit-free tag (`v`, `sr`), so concatenated tags split back apart
/// without separators.
impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => f.write_str("v"),
            Self::I1 => f.write_str("i1"),
            Self::I2 => f.write_str("i2"),
            Self::I4 => f.write_str("i4"),
            Self::I8 => f.write_str("i8"),
            Self::R4 => f.write_str("r4"),
            Self::R8 => f.write_str("r8"),
            Self::I16 => f.write_str("i16"),
            Self::ByRef => f.write_str("sr"),
            Self::F32x2 => f.write_str("vf2"),
            Self::F32x3 => f.write_str("vf3"),
            Self::F32x4 => f.write_str("vf4"),
            Self::F64x2 => f.write_str("vd2"),
            Self::F64x3 => f.write_str("vd3"),
            Self::F64x4 => f.write_str("vd4"),
            Self::Align1(n) => write!(f, "S{n}"),
            Self::Align2(n) => write!(f, "A{n}"),
            Self::Align4(n) => write!(f, "B{n}"),
            Self::Align8(n) => write!(f, "C{n}"),
        }
    }
}

/// Split one tag off the front of `input`.
///
/// Returns the category and the unconsumed rest, or `None` if `input` does
/// not start with a well-formed tag.
pub fn parse_tag(input: &str) -> Option<(TypeCategory, &str)> {
    const PREFIXES: [&str; 10] = ["vf", "vd", "sr", "v", "i", "r", "S", "A", "B", "C"];

    let prefix = PREFIXES.into_iter().find(|p| input.starts_with(p))?;
    let rest = &input[prefix.len()..];
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let (number, rest) = rest.split_at(digits);
    let value: Option<u32> = if number.is_empty() {
        None
    } else {
        Some(number.parse().ok()?)
    };

    let category = match (prefix, value) {
        ("v", None) => TypeCategory::Void,
        ("sr", None) => TypeCategory::ByRef,
        ("i", Some(1)) => TypeCategory::I1,
        ("i", Some(2)) => TypeCategory::I2,
        ("i", Some(4)) => TypeCategory::I4,
        ("i", Some(8)) => TypeCategory::I8,
        ("i", Some(16)) => TypeCategory::I16,
        ("r", Some(4)) => TypeCategory::R4,
        ("r", Some(8)) => TypeCategory::R8,
        ("vf", Some(2)) => TypeCategory::F32x2,
        ("vf", Some(3)) => TypeCategory::F32x3,
        ("vf", Some(4)) => TypeCategory::F32x4,
        ("vd", Some(2)) => TypeCategory::F64x2,
        ("vd", Some(3)) => TypeCategory::F64x3,
        ("vd", Some(4)) => TypeCategory::F64x4,
        ("S", Some(n)) if n > 0 => TypeCategory::Align1(n),
        ("A", Some(n)) if n > 0 => TypeCategory::Align2(n),
        ("B", Some(n)) if n > 0 => TypeCategory::Align4(n),
        ("C", Some(n)) if n > 0 => TypeCategory::Align8(n),
        _ => return None,
    };
    Some((category, rest))
}
