//! Layout, ABI classification and bridge signatures.
//!
//! Turns catalog methods into the physical call shapes the emitter needs:
//!
//! - [`LayoutCalculator`]: size and alignment of every type, memoized per run
//!   and cross-checked against runtime measurements
//! - [`AbiStrategy`]: per-target classification into [`TypeCategory`]s
//! - [`SignatureBuilder`]: a method's [`BridgeSignature`] and canonical name
//! - [`BridgeSets`]: distinct signatures per [`BridgeKind`], sorted for output
//!
//! # Determinism
//!
//! Nothing here depends on hash iteration order once [`BridgeSets::into_sorted`]
//! has run. Two runs over the same catalog and target produce equal
//! [`SortedBridges`].

// Parameter indices and byte sizes are u32; no signature has 4 billion slots.
#![allow(clippy::cast_possible_truncation)]

mod category;
mod dedup;
mod error;
mod layout;
mod signature;
mod strategy;

pub use bridge_meta::Target;
pub use category::{parse_tag, TypeCategory, STACK_SLOT_SIZE};
pub use dedup::{BridgeKind, BridgeSets, SortedBridges};
pub use error::AbiError;
pub use layout::{scalar_layout, LayoutCalculator, SizeAndAlignment, DEFAULT_PACKING};
pub use signature::{BridgeSignature, MethodShape, ParamSlot, ReturnSlot, SignatureBuilder};
pub use strategy::{scalar_category, strategy_for, AbiStrategy, Arm64Abi, X64Abi, X86Abi};
