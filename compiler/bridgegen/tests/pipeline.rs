//! End-to-end runs over JSON catalogs.

#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;

use bridge_abi::{BridgeKind, TypeCategory};
use bridge_meta::{InMemoryCatalog, Target};
use bridgegen::{run_config, GenError, Generator, GeneratorConfig};

fn generate(json: &str, target: Target) -> bridgegen::Generation {
    let catalog = InMemoryCatalog::from_json(json).unwrap();
    Generator::new(&catalog, target).run().unwrap()
}

const MIXED_ARGS: &str = r#"{
  "types": [
    {
      "name": "Demo.Wide",
      "assembly": "Demo",
      "kind": "struct",
      "fields": [
        { "name": "a", "type": "i64" },
        { "name": "b", "type": "i64" },
        { "name": "c", "type": "i64" }
      ],
      "measured_size": { "x64": 24 }
    },
    {
      "name": "Demo.Native",
      "assembly": "Demo",
      "kind": "class",
      "methods": [
        { "name": "Call", "kind": "static",
          "params": [ { "type": "i32" }, { "type": "f64" }, { "type": "Demo.Wide" } ] }
      ]
    }
  ]
}"#;

#[test]
fn mixed_scalar_and_wide_struct_arguments() {
    let generation = generate(MIXED_ARGS, Target::X64);

    let m2n = &generation.bridges.managed_to_native;
    assert_eq!(m2n.len(), 1);
    let sig = &m2n[0];
    assert_eq!(sig.canonical_name(), "vi4r8C24");
    assert_eq!(
        sig.param_categories().collect::<Vec<_>>(),
        [TypeCategory::I4, TypeCategory::R8, TypeCategory::Align8(24)]
    );
    assert!(sig.ret().is_void());
    assert!(!sig.params()[0].native_by_address);
    assert!(!sig.params()[1].native_by_address);
    assert!(sig.params()[2].native_by_address);

    assert!(generation.text.contains(
        "typedef void (*NativeMethod)(int32_t __arg0, double __arg1, ValueTypeSizeAlign8_24 __arg2, const MethodInfo* method);"
    ));
    assert!(generation
        .text
        .contains("*(ValueTypeSizeAlign8_24*)(localVarBase + argVarIndexs[2]), method);"));
}

#[test]
fn wide_struct_on_arm64_goes_by_reference() {
    let generation = generate(MIXED_ARGS, Target::Arm64);
    assert_eq!(
        generation.bridges.names(BridgeKind::ManagedToNative),
        ["vi4r8sr"]
    );
}

#[test]
fn same_shape_structs_share_one_bridge() {
    let json = r#"{
      "types": [
        { "name": "A.Pair", "assembly": "A", "kind": "struct",
          "fields": [ { "name": "x", "type": "i32" }, { "name": "y", "type": "i32" } ] },
        { "name": "B.Size", "assembly": "B", "kind": "struct",
          "fields": [ { "name": "w", "type": "i32" }, { "name": "h", "type": "i32" } ] },
        { "name": "C.Api", "assembly": "C", "kind": "class",
          "methods": [
            { "name": "TakePair", "kind": "static", "params": [ { "type": "A.Pair" } ], "virtual": true },
            { "name": "TakeSize", "kind": "static", "params": [ { "type": "B.Size" } ], "virtual": true }
          ] }
      ]
    }"#;

    for target in Target::ALL {
        let generation = generate(json, target);
        for kind in [BridgeKind::ManagedToNative, BridgeKind::NativeToManaged] {
            assert_eq!(generation.summary.count(kind), 1, "{target} {kind}");
        }
        let name = generation.bridges.names(BridgeKind::ManagedToNative)[0].to_owned();
        assert_eq!(
            generation
                .text
                .matches(&format!("static void __M2N_{name}("))
                .count(),
            1
        );
    }
}

#[test]
fn adjustor_only_for_value_type_instance_methods() {
    let json = r#"{
      "types": [
        { "name": "Demo.Counter", "assembly": "Demo", "kind": "struct",
          "fields": [ { "name": "value", "type": "i32" } ],
          "methods": [
            { "name": "Add", "params": [ { "type": "i32" } ] },
            { "name": "Create", "kind": "static", "params": [ { "type": "i32" } ], "ret": "Demo.Counter" }
          ] }
      ]
    }"#;

    let generation = generate(json, Target::X64);
    assert_eq!(
        generation.bridges.names(BridgeKind::ManagedToNative),
        ["S4i4", "vi8i4"]
    );
    assert_eq!(generation.bridges.names(BridgeKind::AdjustorThunk), ["vi8i4"]);
    assert!(generation
        .text
        .contains("*(int64_t*)(args + 0) = __arg0 + 16;"));
    assert!(!generation.text.contains("__N2M_AdjustorThunk_S4i4"));
}

#[test]
fn measured_size_mismatch_is_fatal() {
    let json = MIXED_ARGS.replace(r#""x64": 24"#, r#""x64": 20"#);
    let catalog = InMemoryCatalog::from_json(&json).unwrap();
    let err = Generator::new(&catalog, Target::X64).run().unwrap_err();
    assert!(matches!(err, GenError::Method { ref method, .. } if method == "Demo.Native::Call"));
    assert!(err.to_string().contains("computed as 24 bytes"));
}

#[test]
fn output_is_byte_identical_across_runs() {
    let catalog = InMemoryCatalog::from_json(MIXED_ARGS).unwrap();
    let texts: Vec<String> = (0..3)
        .map(|_| Generator::new(&catalog, Target::X86).run().unwrap().text)
        .collect();
    assert_eq!(texts[0], texts[1]);
    assert_eq!(texts[1], texts[2]);
}

// ---------------------------------------------------------------------------
// Template I/O
// ---------------------------------------------------------------------------

const TEMPLATE: &str = "#include \"MethodBridge.h\"\n\
                        //!!!{{MethodBridge\n\
                        stale\n\
                        //!!!}}MethodBridge\n\
                        // end of file\n";

#[test]
fn run_config_splices_template() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("types.json");
    let template = dir.path().join("MethodBridge.cpp");
    std::fs::write(&catalog, MIXED_ARGS).unwrap();
    std::fs::write(&template, TEMPLATE).unwrap();

    let config = GeneratorConfig {
        catalog: Some(catalog),
        template: Some(template.clone()),
        extra_signatures: vec!["i4".to_owned()],
        ..GeneratorConfig::default()
    };
    let generation = run_config(&config).unwrap();

    let written = std::fs::read_to_string(&template).unwrap();
    assert!(written.starts_with("#include \"MethodBridge.h\"\n//!!!{{MethodBridge\n"));
    assert!(written.ends_with("//!!!}}MethodBridge\n// end of file\n"));
    assert!(!written.contains("stale"));
    assert!(written.contains(&generation.text));
    assert!(written.contains("{\"i4\", (Il2CppMethodPointer)__N2M_i4},"));
}

#[test]
fn failed_run_leaves_template_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("types.json");
    let template = dir.path().join("MethodBridge.cpp");
    std::fs::write(&catalog, MIXED_ARGS.replace(r#""x64": 24"#, r#""x64": 32"#)).unwrap();
    std::fs::write(&template, TEMPLATE).unwrap();

    let config = GeneratorConfig {
        catalog: Some(catalog),
        template: Some(template.clone()),
        ..GeneratorConfig::default()
    };
    assert!(run_config(&config).is_err());
    assert_eq!(std::fs::read_to_string(&template).unwrap(), TEMPLATE);
}

#[test]
fn separate_output_and_custom_marker() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("types.json");
    let template = dir.path().join("template.cpp");
    let output = dir.path().join("out.cpp");
    std::fs::write(&catalog, r#"{"types": []}"#).unwrap();
    std::fs::write(&template, "//!!!{{Bridges\n//!!!}}Bridges\n").unwrap();

    let config = GeneratorConfig {
        catalog: Some(catalog),
        template: Some(template.clone()),
        output: Some(output.clone()),
        marker: "Bridges".to_owned(),
        ..GeneratorConfig::default()
    };
    run_config(&config).unwrap();

    assert_eq!(
        std::fs::read_to_string(&template).unwrap(),
        "//!!!{{Bridges\n//!!!}}Bridges\n"
    );
    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("//!!!{{Bridges\n// managed-to-native bridges\n"));
}

#[test]
fn missing_marker_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("types.json");
    let template = dir.path().join("template.cpp");
    std::fs::write(&catalog, r#"{"types": []}"#).unwrap();
    std::fs::write(&template, "int x;\n").unwrap();

    let config = GeneratorConfig {
        catalog: Some(catalog),
        template: Some(template),
        ..GeneratorConfig::default()
    };
    assert!(matches!(run_config(&config), Err(GenError::Template(_))));
}
