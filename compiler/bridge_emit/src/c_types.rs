//! C type names for passing categories.
//!
//! Every category maps to exactly one C type. Scalars use the fixed-width
//! integer and float types; aggregates use opaque structs whose definitions
//! are emitted at the top of the generated block by [`type_definition`].

use bridge_abi::TypeCategory;

/// The C type carrying a value of `category`.
///
/// `ByRef` is the hidden pointer to a caller-owned copy. `I16` shares its
/// struct with `Align8(16)`.
pub fn c_type(category: TypeCategory) -> String {
    let name = match category {
        TypeCategory::Void => "void",
        TypeCategory::I1 => "int8_t",
        TypeCategory::I2 => "int16_t",
        TypeCategory::I4 => "int32_t",
        TypeCategory::I8 => "int64_t",
        TypeCategory::R4 => "float",
        TypeCategory::R8 => "double",
        TypeCategory::I16 => "ValueTypeSizeAlign8_16",
        TypeCategory::ByRef => "void*",
        TypeCategory::F32x2 => "HtVector2f",
        TypeCategory::F32x3 => "HtVector3f",
        TypeCategory::F32x4 => "HtVector4f",
        TypeCategory::F64x2 => "HtVector2d",
        TypeCategory::F64x3 => "HtVector3d",
        TypeCategory::F64x4 => "HtVector4d",
        TypeCategory::Align1(n) => return format!("ValueTypeSize{n}"),
        TypeCategory::Align2(n) => return format!("ValueTypeSizeAlign2_{n}"),
        TypeCategory::Align4(n) => return format!("ValueTypeSizeAlign4_{n}"),
        TypeCategory::Align8(n) => return format!("ValueTypeSizeAlign8_{n}"),
    };
    name.to_owned()
}

/// The `StackObject` union member holding a scalar of `category`, if any.
pub fn stack_field(category: TypeCategory) -> Option<&'static str> {
    match category {
        TypeCategory::I1 => Some("i8"),
        TypeCategory::I2 => Some("i16"),
        TypeCategory::I4 => Some("i32"),
        TypeCategory::I8 => Some("i64"),
        TypeCategory::R4 => Some("f4"),
        TypeCategory::R8 => Some("f8"),
        TypeCategory::Void
        | TypeCategory::I16
        | TypeCategory::ByRef
        | TypeCategory::F32x2
        | TypeCategory::F32x3
        | TypeCategory::F32x4
        | TypeCategory::F64x2
        | TypeCategory::F64x3
        | TypeCategory::F64x4
        | TypeCategory::Align1(_)
        | TypeCategory::Align2(_)
        | TypeCategory::Align4(_)
        | TypeCategory::Align8(_) => None,
    }
}

/// Definition of the struct behind an aggregate category. `None` for
/// scalars, `void` and `ByRef`.
pub fn type_definition(category: TypeCategory) -> Option<String> {
    let vector = |elem: &str, fields: &[&str]| {
        let body: String = fields.iter().map(|f| format!(" {elem} {f};")).collect();
        Some(format!("struct {} {{{body} }};", c_type(category)))
    };
    let bytes = |align: Option<u32>, n: u32| {
        let align = align.map_or_else(String::new, |a| format!("alignas({a}) "));
        Some(format!(
            "struct {align}{} {{ uint8_t __value[{n}]; }};",
            c_type(category)
        ))
    };

    match category {
        TypeCategory::Void
        | TypeCategory::I1
        | TypeCategory::I2
        | TypeCategory::I4
        | TypeCategory::I8
        | TypeCategory::R4
        | TypeCategory::R8
        | TypeCategory::ByRef => None,
        TypeCategory::I16 => bytes(Some(8), 16),
        TypeCategory::F32x2 => vector("float", &["x", "y"]),
        TypeCategory::F32x3 => vector("float", &["x", "y", "z"]),
        TypeCategory::F32x4 => vector("float", &["x", "y", "z", "w"]),
        TypeCategory::F64x2 => vector("double", &["x", "y"]),
        TypeCategory::F64x3 => vector("double", &["x", "y", "z"]),
        TypeCategory::F64x4 => vector("double", &["x", "y", "z", "w"]),
        TypeCategory::Align1(n) => bytes(None, n),
        TypeCategory::Align2(n) => bytes(Some(2), n),
        TypeCategory::Align4(n) => bytes(Some(4), n),
        TypeCategory::Align8(n) => bytes(Some(8), n),
    }
}
