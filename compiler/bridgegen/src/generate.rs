//! The generation pipeline.
//!
//! One run: enumerate the catalog, build a signature per method, collect the
//! distinct signatures per bridge kind, sort, emit. Types that cannot be
//! scanned are skipped with a [`Diagnostic`]; anything else that goes wrong
//! aborts the run.

use std::fmt;

use bridge_abi::{
    strategy_for, AbiError, BridgeKind, BridgeSets, BridgeSignature, LayoutCalculator,
    MethodShape, SignatureBuilder, SortedBridges,
};
use bridge_emit::{splice_file, BridgeEmitter};
use bridge_meta::{Catalog, InMemoryCatalog, MemberFilter, Target};

use crate::{GenError, GeneratorConfig};

/// Something the run skipped instead of failing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The type or `Type::method` skipped.
    pub subject: String,
    pub reason: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skipped `{}`: {}", self.subject, self.reason)
    }
}

/// Totals for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub types_scanned: usize,
    pub methods_seen: usize,
    pub managed_to_native: usize,
    pub native_to_managed: usize,
    pub adjustor_thunk: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn count(&self, kind: BridgeKind) -> usize {
        match kind {
            BridgeKind::ManagedToNative => self.managed_to_native,
            BridgeKind::NativeToManaged => self.native_to_managed,
            BridgeKind::AdjustorThunk => self.adjustor_thunk,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} types, {} methods -> {} managed-to-native, {} native-to-managed, \
             {} adjustor thunks ({} skipped)",
            self.types_scanned,
            self.methods_seen,
            self.managed_to_native,
            self.native_to_managed,
            self.adjustor_thunk,
            self.skipped
        )
    }
}

/// Result of a run.
#[derive(Clone, Debug)]
pub struct Generation {
    pub target: Target,
    /// The generated block, ready to splice into a template.
    pub text: String,
    pub bridges: SortedBridges,
    pub summary: RunSummary,
    pub diagnostics: Vec<Diagnostic>,
}

/// Bridge generation over one catalog for one target.
pub struct Generator<'c> {
    catalog: &'c dyn Catalog,
    target: Target,
    optimized: bool,
    hot_reload_assemblies: Vec<String>,
    extra_signatures: Vec<String>,
}

impl<'c> Generator<'c> {
    pub fn new(catalog: &'c dyn Catalog, target: Target) -> Self {
        Self {
            catalog,
            target,
            optimized: false,
            hot_reload_assemblies: Vec::new(),
            extra_signatures: Vec::new(),
        }
    }

    pub fn from_config(catalog: &'c dyn Catalog, config: &GeneratorConfig) -> Self {
        Self::new(catalog, config.target)
            .optimized(config.optimized)
            .hot_reload_assemblies(config.hot_reload_assemblies.clone())
            .extra_signatures(config.extra_signatures.clone())
    }

    #[must_use]
    pub fn optimized(mut self, optimized: bool) -> Self {
        self.optimized = optimized;
        self
    }

    #[must_use]
    pub fn hot_reload_assemblies(mut self, assemblies: Vec<String>) -> Self {
        self.hot_reload_assemblies = assemblies;
        self
    }

    #[must_use]
    pub fn extra_signatures(mut self, names: Vec<String>) -> Self {
        self.extra_signatures = names;
        self
    }

    fn filter(&self) -> MemberFilter {
        if self.optimized {
            MemberFilter::PUBLIC
        } else {
            MemberFilter::ALL
        }
    }

    /// Scan the catalog and generate the bridge block.
    pub fn run(&self) -> Result<Generation, GenError> {
        let _span = tracing::info_span!("generate", target = %self.target).entered();

        let mut summary = RunSummary::default();
        let mut diagnostics = Vec::new();
        let sets = self.collect(&mut summary, &mut diagnostics)?;
        let bridges = sets.into_sorted();

        summary.managed_to_native = bridges.managed_to_native.len();
        summary.native_to_managed = bridges.native_to_managed.len();
        summary.adjustor_thunk = bridges.adjustor_thunk.len();
        summary.skipped = diagnostics.len();

        let text = BridgeEmitter::new(strategy_for(self.target)).emit_all(&bridges)?;

        tracing::info!(
            types = summary.types_scanned,
            methods = summary.methods_seen,
            m2n = summary.managed_to_native,
            n2m = summary.native_to_managed,
            adjustor = summary.adjustor_thunk,
            skipped = summary.skipped,
            "generated bridges"
        );

        Ok(Generation {
            target: self.target,
            text,
            bridges,
            summary,
            diagnostics,
        })
    }

    fn collect(
        &self,
        summary: &mut RunSummary,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<BridgeSets, GenError> {
        let strategy = strategy_for(self.target);
        let layout = LayoutCalculator::new(self.catalog, self.target);
        let builder = SignatureBuilder::new(strategy, &layout);
        let filter = self.filter();
        let mut sets = BridgeSets::new();

        let mut skip = |subject: String, reason: String| {
            tracing::warn!(%subject, %reason, "skipped");
            diagnostics.push(Diagnostic { subject, reason });
        };

        for ty in self.catalog.types(&self.hot_reload_assemblies) {
            let def = self.catalog.type_def(ty)?;
            if !filter.admits(def.public) {
                continue;
            }

            let methods = match self.catalog.methods(ty, filter) {
                Ok(methods) => methods,
                Err(err) if err.is_skippable() => {
                    skip(def.name.clone(), err.to_string());
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            summary.types_scanned += 1;
            tracing::debug!(ty = %def.name, methods = methods.len(), "scanning type");
            let value_type = def.is_value_type();

            for method in methods {
                let qualified = format!("{}::{}", def.name, method.name);
                if method.generic {
                    skip(qualified, "generic method definition".to_owned());
                    continue;
                }

                let sig = match builder.build(&MethodShape::from(method)) {
                    Ok(sig) => sig,
                    Err(AbiError::Catalog(err)) if err.is_skippable() => {
                        skip(qualified, err.to_string());
                        continue;
                    }
                    Err(source) => {
                        return Err(GenError::Method {
                            method: qualified,
                            source,
                        })
                    }
                };

                summary.methods_seen += 1;
                sets.add_method(
                    &sig,
                    method.is_virtual,
                    value_type && method.kind.has_receiver(),
                );
            }
        }

        for name in &self.extra_signatures {
            let sig = BridgeSignature::parse(name, self.target.word_size())
                .map_err(GenError::ExtraSignature)?;
            sets.insert(BridgeKind::ManagedToNative, &sig);
            sets.insert(BridgeKind::NativeToManaged, &sig);
        }

        Ok(sets)
    }
}

/// Load the configured catalog from disk.
pub fn load_catalog(config: &GeneratorConfig) -> Result<InMemoryCatalog, GenError> {
    let path = config.catalog.as_deref().ok_or(GenError::MissingCatalog)?;
    let text = std::fs::read_to_string(path).map_err(|source| GenError::ReadCatalog {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(InMemoryCatalog::from_json(&text)?)
}

/// Run the full pipeline described by `config`: load, generate and, unless
/// `dry_run` is set, splice the result into the template.
///
/// The template is checked before any work is done, so a missing template
/// fails fast. Nothing is written unless every step succeeds.
pub fn run_config(config: &GeneratorConfig) -> Result<Generation, GenError> {
    let template = if config.dry_run {
        None
    } else {
        Some(config.template.as_deref().ok_or(GenError::MissingTemplate)?)
    };

    let catalog = load_catalog(config)?;
    let generation = Generator::from_config(&catalog, config).run()?;

    if let (Some(template), Some(output)) = (template, config.output_path()) {
        splice_file(template, output, &config.marker, &generation.text)?;
    }
    Ok(generation)
}

#[cfg(test)]
mod tests;
