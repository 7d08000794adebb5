//! BOF API CLI Application
//!
//! This is the command-line interface for the bof-api library.
//! It uses the library's symbol catalog and bindings to:
//! - Check an object's imported symbols against the Beacon API or a custom API
//! - List the functions an API provides
//! - Probe a custom API provider library

use anyhow::{bail, Context, Result};
use bof_api::{ApiLibrary, Architecture, MyApi};
use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::PathBuf;

mod config;
mod report;

use config::AppConfig;
use report::CheckReport;

/// BOF API - Check imports against the Beacon API or a custom API
#[derive(Parser, Debug)]
#[command(name = "bof-api-cli")]
#[command(about = "Check BOF imports against the Beacon API or a custom API", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve imported symbols against the selected API
    Check {
        /// Imported symbol names (e.g. __imp_BeaconPrintf)
        #[arg(value_name = "SYMBOL")]
        symbols: Vec<String>,

        /// Target machine of the object
        #[arg(short, long, value_name = "MACHINE")]
        machine: Option<Machine>,

        /// Check against the custom API instead of the Beacon API
        #[arg(long)]
        custom_api: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the functions the selected API provides
    List {
        /// List the custom API instead of the Beacon API
        #[arg(long)]
        custom_api: bool,
    },

    /// Load a custom API library and report which functions it exports
    Probe {
        /// Shared library to load (default: [custom_api].library from the config)
        #[arg(short, long, value_name = "FILE")]
        library: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Machine {
    #[value(name = "amd64", alias = "i386pep")]
    Amd64,

    #[value(name = "i386", alias = "i386pe")]
    I386,
}

impl From<Machine> for Architecture {
    fn from(value: Machine) -> Self {
        match value {
            Machine::Amd64 => Architecture::Amd64,
            Machine::I386 => Architecture::I386,
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("BOF API CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using bof-api library v{}", bof_api::VERSION);

    let config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    match args.command {
        Command::Check {
            symbols,
            machine,
            custom_api,
            json,
        } => check_mode(&config, symbols, machine, custom_api, json),
        Command::List { custom_api } => list_mode(&config, custom_api),
        Command::Probe { library } => probe_mode(&config, library),
    }
}

/// Check mode - resolve imports and print a report
fn check_mode(
    config: &AppConfig,
    mut symbols: Vec<String>,
    machine: Option<Machine>,
    custom_api: bool,
    json: bool,
) -> Result<()> {
    symbols.extend(config.check.symbols.iter().cloned());
    if symbols.is_empty() {
        bail!("No symbols to check (pass them as arguments or set [check].symbols)");
    }

    let api_config = config.api_config(machine.map(Into::into), custom_api);
    let source = api_config.symbol_source();

    let imports = bof_api::resolve_imports(source.as_ref(), symbols.iter().map(String::as_str));
    log::info!(
        "Checked {} symbol(s) against {} ({})",
        imports.len(),
        api_config.api_name(),
        api_config.architecture
    );
    let report = CheckReport::new(api_config.api_name(), api_config.architecture, &imports);

    let mut stdout = io::stdout().lock();
    if json {
        report.write_json(&mut stdout)?;
    } else {
        report.write_text(&mut stdout)?;
    }

    if !imports.is_complete() {
        bail!("{} unresolved import(s)", imports.unresolved.len());
    }

    Ok(())
}

/// List mode - print the functions of the selected API
fn list_mode(config: &AppConfig, custom_api: bool) -> Result<()> {
    let api_config = config.api_config(None, custom_api);
    let source = api_config.symbol_source();

    println!("{}:", api_config.api_name());
    for symbol in source.symbols() {
        println!("  {}", symbol);
    }

    Ok(())
}

/// Probe mode - load a custom API library and check its exports
fn probe_mode(config: &AppConfig, library: Option<PathBuf>) -> Result<()> {
    let definition = config.custom_api.clone().unwrap_or_default();

    let Some(path) = library.or_else(|| definition.library.clone()) else {
        bail!("No library given (use --library or set [custom_api].library)");
    };

    let library = ApiLibrary::open(&path)
        .with_context(|| format!("Failed to open custom API library: {:?}", path))?;

    let exports = library.exports(&definition);
    let missing = exports.iter().filter(|export| !export.exported).count();
    for export in &exports {
        if export.exported {
            println!("  exported  {}", export.symbol);
        } else {
            println!("  missing   {}", export.symbol);
        }
    }

    let missing_message = format!(
        "{} of {} '{}' symbol(s) missing from {:?}",
        missing,
        exports.len(),
        definition.name,
        library.path()
    );

    match library.bind() {
        Ok(api) => {
            log::info!("Bound MyApi from {:?}", api.path());
            println!("MyApiVersion: {}", api.version());
        }
        Err(e) => log::warn!("Library does not provide MyApi: {}", e),
    }

    if missing > 0 {
        bail!(missing_message);
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
