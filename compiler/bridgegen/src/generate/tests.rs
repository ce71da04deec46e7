#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;

use bridge_meta::{FieldDef, MethodDef, ParamDef, StructDef, TypeDef, TypeId, TypeKind};

use super::*;

/// A small game-like catalog:
///
/// - `Game.Point { i32 x; i32 y; }` with a virtual instance method, a static
///   factory returning the struct and a constructor
/// - `Game.Player`, a class with a virtual method, a private one and a
///   generic one
/// - `Game.Internal`, a non-public class
/// - `Game.List`1`, an open generic definition
fn catalog(player_assembly: &str) -> InMemoryCatalog {
    let mut cat = InMemoryCatalog::new();

    let point = cat
        .add(
            TypeDef::new(
                "Game.Point",
                "Game",
                TypeKind::Struct(StructDef::sequential(vec![
                    FieldDef::new("x", TypeId::I32),
                    FieldDef::new("y", TypeId::I32),
                ])),
            )
            .with_methods(vec![MethodDef::instance("Length", vec![], TypeId::F32).virtual_()]),
        )
        .unwrap();
    cat.add_method(point, MethodDef::static_method("Origin", vec![], point))
        .unwrap();
    cat.add_method(
        point,
        MethodDef::constructor(vec![
            ParamDef::value(TypeId::I32),
            ParamDef::value(TypeId::I32),
        ]),
    )
    .unwrap();

    cat.add(
        TypeDef::new("Game.Player", player_assembly, TypeKind::Class).with_methods(vec![
            MethodDef::instance(
                "Move",
                vec![ParamDef::value(point), ParamDef::value(TypeId::F64)],
                TypeId::VOID,
            )
            .virtual_(),
            MethodDef::instance("Secret", vec![ParamDef::value(TypeId::I64)], TypeId::VOID)
                .private(),
            MethodDef::instance("Map", vec![ParamDef::value(TypeId::OBJECT)], TypeId::OBJECT)
                .generic(),
        ]),
    )
    .unwrap();

    cat.add(
        TypeDef::new("Game.Internal", "Game", TypeKind::Class)
            .non_public()
            .with_methods(vec![MethodDef::instance(
                "Tick",
                vec![ParamDef::value(TypeId::I16)],
                TypeId::VOID,
            )]),
    )
    .unwrap();

    let mut list = TypeDef::new("Game.List`1", "Game", TypeKind::Class)
        .with_methods(vec![MethodDef::instance("Clear", vec![], TypeId::VOID)]);
    list.generic_definition = true;
    cat.add(list).unwrap();

    cat
}

#[test]
fn collects_every_kind() {
    let cat = catalog("Game");
    let generation = Generator::new(&cat, Target::X64).run().unwrap();

    assert_eq!(
        generation.bridges.names(BridgeKind::ManagedToNative),
        ["S8", "r4i8", "vi8S8r8", "vi8i2", "vi8i4i4", "vi8i8"]
    );
    assert_eq!(
        generation.bridges.names(BridgeKind::NativeToManaged),
        ["r4i8", "vi8S8r8"]
    );
    assert_eq!(
        generation.bridges.names(BridgeKind::AdjustorThunk),
        ["r4i8", "vi8i4i4"]
    );

    assert_eq!(
        generation.summary,
        RunSummary {
            types_scanned: 3,
            methods_seen: 6,
            managed_to_native: 6,
            native_to_managed: 2,
            adjustor_thunk: 2,
            skipped: 2,
        }
    );
    assert!(generation.text.contains("static void __N2M_AdjustorThunk_r4i8("));
}

#[test]
fn skipped_members_become_diagnostics() {
    let cat = catalog("Game");
    let generation = Generator::new(&cat, Target::X64).run().unwrap();

    let subjects: Vec<&str> = generation
        .diagnostics
        .iter()
        .map(|d| d.subject.as_str())
        .collect();
    assert_eq!(subjects, ["Game.Player::Map", "Game.List`1"]);
    assert!(generation.diagnostics[0].to_string().contains("generic method"));
}

#[test]
fn optimized_scans_public_only() {
    let cat = catalog("Game");
    let generation = Generator::new(&cat, Target::X64)
        .optimized(true)
        .run()
        .unwrap();

    assert_eq!(
        generation.bridges.names(BridgeKind::ManagedToNative),
        ["S8", "r4i8", "vi8S8r8", "vi8i4i4"]
    );
    assert_eq!(generation.summary.types_scanned, 2);
}

#[test]
fn hot_reload_assemblies_are_not_scanned() {
    let cat = catalog("Game.Hot");
    let generation = Generator::new(&cat, Target::X64)
        .hot_reload_assemblies(vec!["Game.Hot".to_owned()])
        .run()
        .unwrap();

    let m2n = generation.bridges.names(BridgeKind::ManagedToNative);
    assert!(!m2n.contains(&"vi8S8r8"));
    assert!(!m2n.contains(&"vi8i8"));
    assert_eq!(generation.bridges.names(BridgeKind::NativeToManaged), ["r4i8"]);
}

#[test]
fn x86_uses_four_byte_receivers() {
    let cat = catalog("Game");
    let generation = Generator::new(&cat, Target::X86).run().unwrap();
    assert_eq!(
        generation.bridges.names(BridgeKind::AdjustorThunk),
        ["r4i4", "vi4i4i4"]
    );
    assert!(generation.text.contains("= __arg0 + 8;"));
}

#[test]
fn extras_are_forced_both_ways() {
    let cat = InMemoryCatalog::new();
    let generation = Generator::new(&cat, Target::Arm64)
        .extra_signatures(vec!["vf4vf4".to_owned(), "i8".to_owned()])
        .run()
        .unwrap();

    assert_eq!(
        generation.bridges.names(BridgeKind::ManagedToNative),
        ["i8", "vf4vf4"]
    );
    assert_eq!(
        generation.bridges.names(BridgeKind::NativeToManaged),
        ["i8", "vf4vf4"]
    );
    assert!(generation.bridges.adjustor_thunk.is_empty());
}

#[test]
fn malformed_extra_is_fatal() {
    let cat = InMemoryCatalog::new();
    let err = Generator::new(&cat, Target::X64)
        .extra_signatures(vec!["vq9".to_owned()])
        .run()
        .unwrap_err();
    assert!(matches!(
        err,
        GenError::ExtraSignature(AbiError::MalformedSignature { .. })
    ));
}

#[test]
fn layout_mismatch_names_the_method() {
    let mut cat = InMemoryCatalog::new();
    let wide = cat
        .add(
            TypeDef::new(
                "Game.Wide",
                "Game",
                TypeKind::Struct(StructDef::sequential(vec![
                    FieldDef::new("a", TypeId::I64),
                    FieldDef::new("b", TypeId::I32),
                ])),
            )
            .with_measured_size(Target::X64, 12),
        )
        .unwrap();
    cat.add(
        TypeDef::new("Game.Api", "Game", TypeKind::Class).with_methods(vec![
            MethodDef::static_method("Take", vec![ParamDef::value(wide)], TypeId::VOID),
        ]),
    )
    .unwrap();

    let err = Generator::new(&cat, Target::X64).run().unwrap_err();
    match err {
        GenError::Method { method, source } => {
            assert_eq!(method, "Game.Api::Take");
            assert!(matches!(
                source,
                AbiError::LayoutMismatch {
                    computed: 16,
                    measured: 12,
                    ..
                }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }

    // The measurement only applies to the target it was taken on.
    assert!(Generator::new(&cat, Target::Arm64).run().is_ok());
}

#[test]
fn runs_are_deterministic() {
    let cat = catalog("Game");
    let first = Generator::new(&cat, Target::Arm64).run().unwrap();
    let second = Generator::new(&cat, Target::Arm64).run().unwrap();
    assert_eq!(first.text, second.text);
    assert_eq!(first.bridges, second.bridges);
}

#[test]
fn empty_catalog_still_emits_tables() {
    let cat = InMemoryCatalog::new();
    let generation = Generator::new(&cat, Target::X64).run().unwrap();
    assert_eq!(generation.summary, RunSummary::default());
    assert_eq!(generation.text.matches("{nullptr, nullptr},").count(), 3);
}

#[test]
fn summary_display() {
    let summary = RunSummary {
        types_scanned: 3,
        methods_seen: 6,
        managed_to_native: 6,
        native_to_managed: 2,
        adjustor_thunk: 2,
        skipped: 2,
    };
    assert_eq!(
        summary.to_string(),
        "3 types, 6 methods -> 6 managed-to-native, 2 native-to-managed, 2 adjustor thunks (2 skipped)"
    );
    assert_eq!(summary.count(BridgeKind::AdjustorThunk), 2);
}

#[test]
fn run_config_requires_template_unless_dry_run() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("types.json");
    std::fs::write(&catalog_path, r#"{"types": []}"#).unwrap();

    let mut config = GeneratorConfig {
        catalog: Some(catalog_path),
        ..GeneratorConfig::default()
    };
    assert!(matches!(run_config(&config), Err(GenError::MissingTemplate)));

    config.dry_run = true;
    let generation = run_config(&config).unwrap();
    assert!(generation.text.contains("g_managed2nativeStub"));
}

#[test]
fn run_config_requires_catalog() {
    let config = GeneratorConfig {
        dry_run: true,
        ..GeneratorConfig::default()
    };
    assert!(matches!(run_config(&config), Err(GenError::MissingCatalog)));
}

#[test]
fn method_over_open_generic_struct_is_skipped() {
    let mut cat = InMemoryCatalog::new();
    let mut open = TypeDef::new(
        "Game.Slot`1",
        "Game",
        TypeKind::Struct(StructDef::sequential(vec![FieldDef::new(
            "value",
            TypeId::I64,
        )])),
    );
    open.generic_definition = true;
    let open = cat.add(open).unwrap();
    cat.add(
        TypeDef::new("Game.Inventory", "Game", TypeKind::Class).with_methods(vec![
            MethodDef::static_method("Store", vec![ParamDef::value(open)], TypeId::VOID),
            MethodDef::static_method("Count", vec![], TypeId::I32),
        ]),
    )
    .unwrap();

    let generation = Generator::new(&cat, Target::X64).run().unwrap();

    assert_eq!(generation.bridges.names(BridgeKind::ManagedToNative), ["i4"]);
    let subjects: Vec<&str> = generation
        .diagnostics
        .iter()
        .map(|d| d.subject.as_str())
        .collect();
    assert_eq!(subjects, ["Game.Slot`1", "Game.Inventory::Store"]);
    assert!(generation.diagnostics[1]
        .reason
        .contains("`Game.Slot`1` is a generic definition"));
    assert_eq!(generation.summary.methods_seen, 1);
}
