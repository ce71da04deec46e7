//! Interpreter/native bridge generator.
//!
//! Scans a type catalog, reduces every method to the physical shape of its
//! call on one target, and emits one bridge function per distinct shape into
//! the marker region of a C++ template.
//!
//! The pipeline is split across crates:
//!
//! - `bridge_meta`: the catalog model and its JSON form
//! - `bridge_abi`: layout, per-target classification, deduplication
//! - `bridge_emit`: C++ text and template splicing
//!
//! This crate wires them together ([`Generator`], [`run_config`]) and adds
//! configuration and the `bridgegen` command line.

use std::sync::Once;

mod config;
mod error;
mod generate;
mod inspect;

pub use config::{parse_cli_options, resolve_config, CliOptions, GeneratorConfig};
pub use error::{ConfigError, GenError};
pub use generate::{load_catalog, run_config, Diagnostic, Generation, Generator, RunSummary};
pub use inspect::{inspect_type, TypeReport};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for the generator.
///
/// Safe to call more than once. Does nothing unless `RUST_LOG` is set,
/// e.g. `RUST_LOG=bridge_abi=trace`. With `BRIDGEGEN_TRACE_TREE` also set,
/// spans are rendered as an indented tree.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }

        let filter = EnvFilter::from_default_env();
        if std::env::var_os("BRIDGEGEN_TRACE_TREE").is_some() {
            tracing_subscriber::registry()
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
