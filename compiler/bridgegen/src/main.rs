//! Bridge generator CLI.

use bridge_abi::{strategy_for, BridgeKind};
use bridge_meta::Target;
use bridgegen::{
    init_tracing, inspect_type, load_catalog, parse_cli_options, resolve_config, run_config,
    CliOptions, GenError, Generation,
};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let result = match args[1].as_str() {
        "generate" => generate(&args[2..]),
        "classify" => classify(&args[2..]),
        "targets" => {
            list_targets();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn generate(args: &[String]) -> Result<(), GenError> {
    let cli = parse_cli_options(args)?;
    let config = resolve_config(&cli)?;
    let generation = run_config(&config)?;

    if config.dry_run {
        print!("{}", generation.text);
    }
    report(&generation, &cli);
    if !config.dry_run {
        if let Some(output) = config.output_path() {
            eprintln!("wrote {}", output.display());
        }
    }
    Ok(())
}

/// Summary and diagnostics go to stderr so a dry run's stdout is only the
/// generated block.
fn report(generation: &Generation, cli: &CliOptions) {
    for diagnostic in &generation.diagnostics {
        eprintln!("warning: {diagnostic}");
    }
    eprintln!("{}: {}", generation.target, generation.summary);

    if cli.verbose {
        for kind in BridgeKind::ALL {
            eprintln!("{kind} ({}):", generation.summary.count(kind));
            for name in generation.bridges.names(kind) {
                eprintln!("  {name}");
            }
        }
    }
}

fn classify(args: &[String]) -> Result<(), GenError> {
    let (names, flags): (Vec<&String>, Vec<&String>) =
        args.iter().partition(|arg| !arg.starts_with('-'));
    let flags: Vec<String> = flags.into_iter().cloned().collect();

    let cli = parse_cli_options(&flags)?;
    let config = resolve_config(&cli)?;
    let catalog = load_catalog(&config)?;

    if names.is_empty() {
        eprintln!("Usage: bridgegen classify --catalog=<path> [--target=<t>] <type>...");
        std::process::exit(1);
    }

    for name in names {
        let ty = catalog
            .lookup(name)
            .ok_or_else(|| GenError::UnknownType(name.clone()))?;
        println!("{}", inspect_type(&catalog, config.target, ty)?);
    }
    Ok(())
}

fn list_targets() {
    println!("Supported targets:");
    for target in Target::ALL {
        let strategy = strategy_for(target);
        println!(
            "  {:<6} word {} bytes, object header {} bytes",
            target.name(),
            strategy.word_size(),
            strategy.object_header_size()
        );
    }
}

fn print_usage() {
    println!("bridgegen - interpreter/native bridge generator");
    println!();
    println!("Usage: bridgegen <command> [options]");
    println!();
    println!("Commands:");
    println!("  generate [options]          Generate bridges into a template");
    println!("  classify [options] <type>   Show how a type is laid out and passed");
    println!("  targets                     List supported targets");
    println!("  help                        Show this message");
    println!();
    println!("Options:");
    println!("  --config=<path>        JSON configuration file");
    println!("  --catalog=<path>       JSON type catalog");
    println!("  --template=<path>      Template containing the marker region");
    println!("  -o, --output=<path>    Output file (default: the template)");
    println!("  --target=<t>           x86, x64 or arm64 (default: x64)");
    println!("  --marker=<name>        Marker name (default: MethodBridge)");
    println!("  --extra=<names>        Comma-separated signatures to always emit");
    println!("  --hot-reload=<names>   Comma-separated assemblies to skip");
    println!("  --optimized            Scan only public types and members");
    println!("  --dry-run              Print the generated block instead of writing");
    println!("  -v, --verbose          List every generated signature");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=bridge_abi=trace) to enable logging.");
}
