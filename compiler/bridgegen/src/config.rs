//! Generator configuration.
//!
//! A run is configured by an optional JSON file with command-line flags
//! layered on top. Flags always win over the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use bridge_emit::DEFAULT_MARKER;
use bridge_meta::Target;

use crate::ConfigError;

/// Everything one generation run needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// ABI whose bridges are generated.
    pub target: Target,
    /// Scan only public types and members.
    pub optimized: bool,
    /// Assemblies whose code always runs in the interpreter; never scanned.
    pub hot_reload_assemblies: Vec<String>,
    /// Canonical signature names always emitted, whether or not any scanned
    /// method needs them.
    pub extra_signatures: Vec<String>,
    /// JSON catalog to scan.
    pub catalog: Option<PathBuf>,
    /// Template whose marker region receives the generated text.
    pub template: Option<PathBuf>,
    /// Output file. Defaults to the template itself.
    pub output: Option<PathBuf>,
    /// Marker name delimiting the generated region.
    pub marker: String,
    /// Print the generated text instead of writing it.
    pub dry_run: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            target: Target::X64,
            optimized: false,
            hot_reload_assemblies: Vec::new(),
            extra_signatures: Vec::new(),
            catalog: None,
            template: None,
            output: None,
            marker: DEFAULT_MARKER.to_owned(),
            dry_run: false,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Where generated text is written: the explicit output, else the template.
    pub fn output_path(&self) -> Option<&Path> {
        self.output.as_deref().or(self.template.as_deref())
    }

    /// Layer command-line options over this configuration.
    pub fn merge(&mut self, cli: &CliOptions) {
        if let Some(target) = cli.target {
            self.target = target;
        }
        if cli.optimized {
            self.optimized = true;
        }
        if cli.dry_run {
            self.dry_run = true;
        }
        if cli.catalog.is_some() {
            self.catalog.clone_from(&cli.catalog);
        }
        if cli.template.is_some() {
            self.template.clone_from(&cli.template);
        }
        if cli.output.is_some() {
            self.output.clone_from(&cli.output);
        }
        if let Some(marker) = &cli.marker {
            self.marker.clone_from(marker);
        }
        for extra in &cli.extra_signatures {
            if !self.extra_signatures.contains(extra) {
                self.extra_signatures.push(extra.clone());
            }
        }
        for assembly in &cli.hot_reload_assemblies {
            if !self.hot_reload_assemblies.contains(assembly) {
                self.hot_reload_assemblies.push(assembly.clone());
            }
        }
    }
}

/// Options given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct CliOptions {
    /// Configuration file (`--config=<path>`).
    pub config: Option<PathBuf>,
    /// `--target=<x86|x64|arm64>`
    pub target: Option<Target>,
    /// `--optimized`
    pub optimized: bool,
    /// `--catalog=<path>`
    pub catalog: Option<PathBuf>,
    /// `--template=<path>`
    pub template: Option<PathBuf>,
    /// `-o <path>` or `--output=<path>`
    pub output: Option<PathBuf>,
    /// `--extra=<name>[,<name>...]`, repeatable
    pub extra_signatures: Vec<String>,
    /// `--hot-reload=<assembly>[,<assembly>...]`, repeatable
    pub hot_reload_assemblies: Vec<String>,
    /// `--marker=<name>`
    pub marker: Option<String>,
    /// `--dry-run`
    pub dry_run: bool,
    /// `-v` / `--verbose`: print the per-kind signature lists.
    pub verbose: bool,
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Parse command-line flags. `-o` takes its value from the next argument.
pub fn parse_cli_options(args: &[String]) -> Result<CliOptions, ConfigError> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "-o" {
            let path = iter.next().ok_or(ConfigError::MissingValue("-o"))?;
            options.output = Some(PathBuf::from(path));
        } else if let Some(path) = arg.strip_prefix("--output=") {
            options.output = Some(PathBuf::from(path));
        } else if let Some(name) = arg.strip_prefix("--target=") {
            let target =
                Target::parse(name).ok_or_else(|| ConfigError::UnknownTarget(name.to_owned()))?;
            options.target = Some(target);
        } else if let Some(path) = arg.strip_prefix("--config=") {
            options.config = Some(PathBuf::from(path));
        } else if let Some(path) = arg.strip_prefix("--catalog=") {
            options.catalog = Some(PathBuf::from(path));
        } else if let Some(path) = arg.strip_prefix("--template=") {
            options.template = Some(PathBuf::from(path));
        } else if let Some(names) = arg.strip_prefix("--extra=") {
            options.extra_signatures.extend(split_list(names));
        } else if let Some(names) = arg.strip_prefix("--hot-reload=") {
            options.hot_reload_assemblies.extend(split_list(names));
        } else if let Some(marker) = arg.strip_prefix("--marker=") {
            if marker.is_empty() {
                return Err(ConfigError::MissingValue("--marker"));
            }
            options.marker = Some(marker.to_owned());
        } else if arg == "--optimized" {
            options.optimized = true;
        } else if arg == "--dry-run" {
            options.dry_run = true;
        } else if arg == "-v" || arg == "--verbose" {
            options.verbose = true;
        } else {
            return Err(ConfigError::UnknownOption(arg.clone()));
        }
    }

    Ok(options)
}

/// Build the effective configuration: the `--config` file if given, then
/// the flags on top.
pub fn resolve_config(cli: &CliOptions) -> Result<GeneratorConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    config.merge(cli);
    Ok(config)
}
