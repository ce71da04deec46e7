//! Type, field and method descriptions exposed by a catalog.
//!
//! These mirror what a reflection layer can tell about a loaded type: its
//! kind, its instance/static field list with any explicit offsets, layout
//! overrides, and the methods and constructors it declares.

use rustc_hash::FxHashMap;

use crate::{Target, TypeId};

// ---------------------------------------------------------------------------
// Builtins
// ---------------------------------------------------------------------------

/// Builtin types with a fixed identity in every catalog.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Void,
    Bool,
    Char,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    ISize,
    USize,
    Object,
    String,
}

impl Primitive {
    /// All builtins in `TypeId` order.
    pub const ALL: [Self; TypeId::BUILTIN_COUNT as usize] = [
        Self::Void,
        Self::Bool,
        Self::Char,
        Self::I8,
        Self::U8,
        Self::I16,
        Self::U16,
        Self::I32,
        Self::U32,
        Self::I64,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::ISize,
        Self::USize,
        Self::Object,
        Self::String,
    ];

    /// Name used in catalog files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::ISize => "isize",
            Self::USize => "usize",
            Self::Object => "object",
            Self::String => "string",
        }
    }

    /// The fixed catalog index of this builtin.
    pub const fn type_id(self) -> TypeId {
        TypeId::from_raw(self as u32)
    }

    /// `true` for builtins stored inline (everything but `void`, `object`, `string`).
    pub const fn is_value(self) -> bool {
        !matches!(self, Self::Void | Self::Object | Self::String)
    }

    /// `true` for the integral types an enum may use as its underlying type.
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::Char
                | Self::I8
                | Self::U8
                | Self::I16
                | Self::U16
                | Self::I32
                | Self::U32
                | Self::I64
                | Self::U64
                | Self::ISize
                | Self::USize
        )
    }
}

// ---------------------------------------------------------------------------
// Composite layout
// ---------------------------------------------------------------------------

/// How a composite's fields are placed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    /// Declaration order, each field at the next suitably aligned offset.
    #[default]
    Sequential,
    /// Each field carries an author-specified offset.
    Explicit,
}

/// A declared field of a composite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeId,
    /// Author-specified offset. Required under [`LayoutKind::Explicit`].
    pub offset: Option<u32>,
    /// Static, constant and thread-static fields take no space in instances.
    pub ignore_for_size: bool,
}

impl FieldDef {
    /// An ordinary instance field.
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            offset: None,
            ignore_for_size: false,
        }
    }

    /// An instance field at an explicit offset.
    pub fn at(name: impl Into<String>, ty: TypeId, offset: u32) -> Self {
        Self {
            offset: Some(offset),
            ..Self::new(name, ty)
        }
    }

    /// A static field (no instance storage).
    pub fn static_field(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            ignore_for_size: true,
            ..Self::new(name, ty)
        }
    }
}

/// A struct-like value type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StructDef {
    pub fields: Vec<FieldDef>,
    pub layout: LayoutKind,
    /// Declared packing. `None` (or zero) means the default of 8.
    pub pack: Option<u32>,
    /// Declared total size override.
    pub size: Option<u32>,
}

impl StructDef {
    pub fn sequential(fields: Vec<FieldDef>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    pub fn explicit(fields: Vec<FieldDef>) -> Self {
        Self {
            fields,
            layout: LayoutKind::Explicit,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_pack(mut self, pack: u32) -> Self {
        self.pack = Some(pack);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Fields that occupy instance storage, in declaration order.
    pub fn instance_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| !f.ignore_for_size)
    }
}

/// What sort of type a catalog entry is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Primitive(Primitive),
    /// An enum stored as its underlying integral builtin.
    Enum { underlying: Primitive },
    Struct(StructDef),
    Class,
    Interface,
    Delegate,
    Array { element: TypeId },
}

// ---------------------------------------------------------------------------
// Methods
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Static,
    Instance,
    Constructor,
}

impl MethodKind {
    /// Instance methods and constructors receive an implicit `this`.
    #[inline]
    pub const fn has_receiver(self) -> bool {
        !matches!(self, Self::Static)
    }
}

/// A declared parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamDef {
    pub ty: TypeId,
    /// `ref`/`out`/`in` parameters travel as a pointer.
    pub by_ref: bool,
}

impl ParamDef {
    pub const fn value(ty: TypeId) -> Self {
        Self { ty, by_ref: false }
    }

    pub const fn by_ref(ty: TypeId) -> Self {
        Self { ty, by_ref: true }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDef {
    pub name: String,
    pub kind: MethodKind,
    pub is_virtual: bool,
    pub public: bool,
    /// Open generic method definition (no concrete instantiation).
    pub generic: bool,
    pub params: Vec<ParamDef>,
    pub ret: TypeId,
}

impl MethodDef {
    fn new(name: impl Into<String>, kind: MethodKind, params: Vec<ParamDef>, ret: TypeId) -> Self {
        Self {
            name: name.into(),
            kind,
            is_virtual: false,
            public: true,
            generic: false,
            params,
            ret,
        }
    }

    pub fn static_method(name: impl Into<String>, params: Vec<ParamDef>, ret: TypeId) -> Self {
        Self::new(name, MethodKind::Static, params, ret)
    }

    pub fn instance(name: impl Into<String>, params: Vec<ParamDef>, ret: TypeId) -> Self {
        Self::new(name, MethodKind::Instance, params, ret)
    }

    pub fn constructor(params: Vec<ParamDef>) -> Self {
        Self::new(".ctor", MethodKind::Constructor, params, TypeId::VOID)
    }

    #[must_use]
    pub fn virtual_(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    #[must_use]
    pub fn generic(mut self) -> Self {
        self.generic = true;
        self
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    pub assembly: String,
    pub kind: TypeKind,
    pub public: bool,
    /// Open generic type definition; cannot be scanned without arguments.
    pub generic_definition: bool,
    /// `false` when the reflection layer cannot introspect this type.
    pub reflectable: bool,
    pub methods: Vec<MethodDef>,
    /// Runtime-measured instance size per target, when known.
    pub measured_size: FxHashMap<Target, u32>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>, assembly: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            assembly: assembly.into(),
            kind,
            public: true,
            generic_definition: false,
            reflectable: true,
            methods: Vec::new(),
            measured_size: FxHashMap::default(),
        }
    }

    pub(crate) fn builtin(prim: Primitive) -> Self {
        Self::new(prim.name(), "", TypeKind::Primitive(prim))
    }

    /// Value types are copied inline; everything else travels as a pointer.
    pub fn is_value_type(&self) -> bool {
        match &self.kind {
            TypeKind::Primitive(p) => p.is_value(),
            TypeKind::Enum { .. } | TypeKind::Struct(_) => true,
            TypeKind::Class | TypeKind::Interface | TypeKind::Delegate | TypeKind::Array { .. } => {
                false
            }
        }
    }

    pub fn as_struct(&self) -> Option<&StructDef> {
        match &self.kind {
            TypeKind::Struct(def) => Some(def),
            _ => None,
        }
    }

    #[must_use]
    pub fn with_methods(mut self, methods: Vec<MethodDef>) -> Self {
        self.methods = methods;
        self
    }

    #[must_use]
    pub fn with_measured_size(mut self, target: Target, size: u32) -> Self {
        self.measured_size.insert(target, size);
        self
    }

    #[must_use]
    pub fn non_public(mut self) -> Self {
        self.public = false;
        self
    }
}
