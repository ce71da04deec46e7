#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;

use super::*;
use crate::{FieldDef, StructDef, TypeKind};

fn pair(name: &str, assembly: &str) -> TypeDef {
    TypeDef::new(
        name,
        assembly,
        TypeKind::Struct(StructDef::sequential(vec![
            FieldDef::new("a", TypeId::I32),
            FieldDef::new("b", TypeId::I32),
        ])),
    )
}

#[test]
fn builtins_are_preregistered() {
    let catalog = InMemoryCatalog::new();

    for prim in Primitive::ALL {
        let def = catalog.type_def(prim.type_id()).unwrap();
        assert_eq!(def.name, prim.name());
        assert_eq!(catalog.lookup(prim.name()), Some(prim.type_id()));
    }
    assert!(catalog.is_empty());
}

#[test]
fn enumeration_skips_builtins_and_excluded_assemblies() {
    let mut catalog = InMemoryCatalog::new();
    let aot = catalog.add(pair("Aot", "Engine")).unwrap();
    catalog.add(pair("Hot", "Gameplay")).unwrap();

    assert_eq!(catalog.types(&["Gameplay".to_owned()]), vec![aot]);
    assert_eq!(catalog.types(&[]).len(), 2);
}

#[test]
fn duplicate_names_are_rejected() {
    let mut catalog = InMemoryCatalog::new();
    catalog.add(pair("Dup", "A")).unwrap();

    assert!(matches!(
        catalog.add(pair("Dup", "B")),
        Err(CatalogError::DuplicateType(name)) if name == "Dup"
    ));
}

#[test]
fn member_filter_hides_private_methods() {
    let mut catalog = InMemoryCatalog::new();
    let owner = catalog.add(pair("Owner", "A")).unwrap();
    catalog
        .add_method(owner, MethodDef::static_method("Pub", vec![], TypeId::VOID))
        .unwrap();
    catalog
        .add_method(
            owner,
            MethodDef::static_method("Hidden", vec![], TypeId::VOID).private(),
        )
        .unwrap();

    let all = catalog.methods(owner, MemberFilter::ALL).unwrap();
    let public = catalog.methods(owner, MemberFilter::PUBLIC).unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].name, "Pub");
}

#[test]
fn generic_definitions_are_skippable_errors() {
    let mut catalog = InMemoryCatalog::new();
    let mut def = pair("List`1", "A");
    def.generic_definition = true;
    let id = catalog.add(def).unwrap();

    let err = catalog.methods(id, MemberFilter::ALL).unwrap_err();
    assert!(err.is_skippable());
    assert!(!CatalogError::UnknownTypeId(99).is_skippable());
}

#[test]
fn measured_size_is_per_target() {
    let mut catalog = InMemoryCatalog::new();
    let id = catalog
        .add(pair("Measured", "A").with_measured_size(Target::X64, 8))
        .unwrap();

    assert_eq!(catalog.measured_size(id, Target::X64), Some(8));
    assert_eq!(catalog.measured_size(id, Target::Arm64), None);
}

#[test]
fn type_name_falls_back_for_unknown_ids() {
    let catalog = InMemoryCatalog::new();

    assert_eq!(catalog.type_name(TypeId::F64), "f64");
    assert_eq!(catalog.type_name(TypeId::from_raw(500)), "<type #500>");
}
