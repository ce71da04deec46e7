//! Per-kind signature sets.
//!
//! Methods with the same canonical name share one bridge, so each kind keeps
//! a set keyed by that name. Insertion order is irrelevant: the sets are
//! sorted by canonical name before emission, which makes the generated text
//! independent of catalog enumeration order.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::BridgeSignature;

/// The three bridge kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BridgeKind {
    /// Interpreter calling a native-compiled method.
    ManagedToNative,
    /// Native code calling an interpreted method.
    NativeToManaged,
    /// Native code calling an interpreted value-type instance method through
    /// a boxed receiver.
    AdjustorThunk,
}

impl BridgeKind {
    pub const ALL: [Self; 3] = [
        Self::ManagedToNative,
        Self::NativeToManaged,
        Self::AdjustorThunk,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::ManagedToNative => "managed-to-native",
            Self::NativeToManaged => "native-to-managed",
            Self::AdjustorThunk => "adjustor-thunk",
        }
    }
}

impl fmt::Display for BridgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unordered sets of distinct signatures, one per bridge kind.
#[derive(Clone, Debug, Default)]
pub struct BridgeSets {
    managed_to_native: FxHashMap<String, BridgeSignature>,
    native_to_managed: FxHashMap<String, BridgeSignature>,
    adjustor_thunk: FxHashMap<String, BridgeSignature>,
}

impl BridgeSets {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_mut(&mut self, kind: BridgeKind) -> &mut FxHashMap<String, BridgeSignature> {
        match kind {
            BridgeKind::ManagedToNative => &mut self.managed_to_native,
            BridgeKind::NativeToManaged => &mut self.native_to_managed,
            BridgeKind::AdjustorThunk => &mut self.adjustor_thunk,
        }
    }

    fn set(&self, kind: BridgeKind) -> &FxHashMap<String, BridgeSignature> {
        match kind {
            BridgeKind::ManagedToNative => &self.managed_to_native,
            BridgeKind::NativeToManaged => &self.native_to_managed,
            BridgeKind::AdjustorThunk => &self.adjustor_thunk,
        }
    }

    /// Add `sig` to the `kind` set. Returns `false` if an equal signature was
    /// already present.
    pub fn insert(&mut self, kind: BridgeKind, sig: &BridgeSignature) -> bool {
        let set = self.set_mut(kind);
        if set.contains_key(sig.canonical_name()) {
            return false;
        }
        set.insert(sig.canonical_name().to_owned(), sig.clone());
        true
    }

    /// Record the bridges one method needs.
    ///
    /// Every method gets a managed-to-native bridge. Virtual methods can be
    /// reached from native code, so they also get a native-to-managed one;
    /// value-type instance methods called that way see a boxed receiver and
    /// additionally need an adjustor thunk.
    pub fn add_method(&mut self, sig: &BridgeSignature, is_virtual: bool, value_type_instance: bool) {
        self.insert(BridgeKind::ManagedToNative, sig);
        if is_virtual {
            self.insert(BridgeKind::NativeToManaged, sig);
        }
        if value_type_instance {
            self.insert(BridgeKind::AdjustorThunk, sig);
        }
    }

    pub fn len(&self, kind: BridgeKind) -> usize {
        self.set(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        BridgeKind::ALL.iter().all(|&kind| self.set(kind).is_empty())
    }

    pub fn contains(&self, kind: BridgeKind, canonical_name: &str) -> bool {
        self.set(kind).contains_key(canonical_name)
    }

    /// Freeze into lists sorted by canonical name.
    pub fn into_sorted(self) -> SortedBridges {
        fn sorted(set: FxHashMap<String, BridgeSignature>) -> Vec<BridgeSignature> {
            let mut list: Vec<(String, BridgeSignature)> = set.into_iter().collect();
            list.sort_unstable_by(|a, b| a.0.cmp(&b.0));
            list.into_iter().map(|(_, sig)| sig).collect()
        }

        SortedBridges {
            managed_to_native: sorted(self.managed_to_native),
            native_to_managed: sorted(self.native_to_managed),
            adjustor_thunk: sorted(self.adjustor_thunk),
        }
    }
}

/// Distinct signatures per kind, each list in canonical-name order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortedBridges {
    pub managed_to_native: Vec<BridgeSignature>,
    pub native_to_managed: Vec<BridgeSignature>,
    pub adjustor_thunk: Vec<BridgeSignature>,
}

impl SortedBridges {
    pub fn get(&self, kind: BridgeKind) -> &[BridgeSignature] {
        match kind {
            BridgeKind::ManagedToNative => &self.managed_to_native,
            BridgeKind::NativeToManaged => &self.native_to_managed,
            BridgeKind::AdjustorThunk => &self.adjustor_thunk,
        }
    }

    /// Canonical names of one kind, in emission order.
    pub fn names(&self, kind: BridgeKind) -> Vec<&str> {
        self.get(kind)
            .iter()
            .map(BridgeSignature::canonical_name)
            .collect()
    }
}

#[cfg(test)]
mod tests;
