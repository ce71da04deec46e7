//! Catalog type handle.
//!
//! Every type the catalog knows about is referenced by a dense 32-bit index.
//! Builtin scalars and the two builtin reference types occupy fixed indices
//! so rules can name them without a catalog lookup.

use std::fmt;

/// A 32-bit index into a catalog's type table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    // === Builtin types (indices 0-16) ===
    pub const VOID: Self = Self(0);
    pub const BOOL: Self = Self(1);
    /// 16-bit UTF-16 code unit.
    pub const CHAR: Self = Self(2);
    pub const I8: Self = Self(3);
    pub const U8: Self = Self(4);
    pub const I16: Self = Self(5);
    pub const U16: Self = Self(6);
    pub const I32: Self = Self(7);
    pub const U32: Self = Self(8);
    pub const I64: Self = Self(9);
    pub const U64: Self = Self(10);
    pub const F32: Self = Self(11);
    pub const F64: Self = Self(12);
    /// Pointer-sized signed integer.
    pub const ISIZE: Self = Self(13);
    /// Pointer-sized unsigned integer.
    pub const USIZE: Self = Self(14);
    /// The root reference type.
    pub const OBJECT: Self = Self(15);
    pub const STRING: Self = Self(16);

    /// Number of builtin types registered in every catalog.
    pub const BUILTIN_COUNT: u32 = 17;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the fixed builtin indices.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::BUILTIN_COUNT
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}
