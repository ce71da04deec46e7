#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;

use super::*;

fn sig(name: &str) -> BridgeSignature {
    BridgeSignature::parse(name, 8).unwrap()
}

#[test]
fn insert_is_idempotent() {
    let mut sets = BridgeSets::new();
    assert!(sets.is_empty());
    assert!(sets.insert(BridgeKind::ManagedToNative, &sig("vi4")));
    assert!(!sets.insert(BridgeKind::ManagedToNative, &sig("vi4")));
    assert!(sets.insert(BridgeKind::NativeToManaged, &sig("vi4")));
    assert_eq!(sets.len(BridgeKind::ManagedToNative), 1);
    assert_eq!(sets.len(BridgeKind::NativeToManaged), 1);
    assert_eq!(sets.len(BridgeKind::AdjustorThunk), 0);
    assert!(!sets.is_empty());
}

#[test]
fn method_flags_select_kinds() {
    let mut sets = BridgeSets::new();
    sets.add_method(&sig("vi8"), false, false);
    sets.add_method(&sig("i4i8"), true, false);
    sets.add_method(&sig("r8i8r8"), true, true);

    assert!(sets.contains(BridgeKind::ManagedToNative, "vi8"));
    assert!(sets.contains(BridgeKind::ManagedToNative, "i4i8"));
    assert!(sets.contains(BridgeKind::ManagedToNative, "r8i8r8"));

    assert!(!sets.contains(BridgeKind::NativeToManaged, "vi8"));
    assert!(sets.contains(BridgeKind::NativeToManaged, "i4i8"));
    assert!(sets.contains(BridgeKind::NativeToManaged, "r8i8r8"));

    assert!(!sets.contains(BridgeKind::AdjustorThunk, "i4i8"));
    assert!(sets.contains(BridgeKind::AdjustorThunk, "r8i8r8"));
}

#[test]
fn sorted_by_canonical_name() {
    let mut sets = BridgeSets::new();
    for name in ["vi8", "i4i8", "C24", "r8", "S24i4", "i4i8", "vf2"] {
        sets.add_method(&sig(name), false, false);
    }
    let sorted = sets.into_sorted();
    assert_eq!(
        sorted.names(BridgeKind::ManagedToNative),
        vec!["C24", "S24i4", "i4i8", "r8", "vf2", "vi8"]
    );
    assert!(sorted.get(BridgeKind::NativeToManaged).is_empty());
}

#[test]
fn insertion_order_does_not_matter() {
    let names = ["vi4", "i8i8i8", "vsr", "r4r4", "vvf4"];
    let mut forward = BridgeSets::new();
    let mut backward = BridgeSets::new();
    for name in names {
        forward.add_method(&sig(name), true, true);
    }
    for name in names.iter().rev() {
        backward.add_method(&sig(name), true, true);
    }
    assert_eq!(forward.into_sorted(), backward.into_sorted());
}

#[test]
fn kind_names() {
    assert_eq!(BridgeKind::ManagedToNative.to_string(), "managed-to-native");
    assert_eq!(BridgeKind::AdjustorThunk.name(), "adjustor-thunk");
}
