//! l10n-rewrite - Language file migration for the LCD message tables
//!
//! Entry point for the tool. Handles CLI argument parsing, logging
//! initialization, and dispatch to the fallback and expansion passes.

mod config;
mod definition;
mod error;
mod expand;
mod file_handler;
mod pipeline;
mod rewrite;
mod symbols;

use anyhow::Context;
use config::Config;
use pipeline::{run_expand, run_fallback, RunOptions};
use std::path::PathBuf;

/// Application name for logging
const APP_NAME: &str = "l10n-rewrite";

/// Which pass to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Fallback,
    Expand,
}

/// Parsed command line
#[derive(Debug, Clone)]
struct Args {
    command: Command,
    config_path: Option<PathBuf>,
    options: RunOptions,
}

fn main() {
    init_logging();

    let args = parse_args();
    if let Err(e) = run(args) {
        log::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Initialize the logging system
fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::load(args.config_path.as_deref()).context("Could not load configuration")?;

    match args.command {
        Command::Fallback => {
            log::info!(
                "Rewriting {} language file(s) against language_{}.h",
                config.languages.len(),
                config.reference_language
            );
            let summary = run_fallback(&config, &args.options).with_context(|| {
                format!("Fallback rewrite under {} failed", args.options.root.display())
            })?;

            for symbol in &summary.unused {
                log::warn!("{} is never looked up", symbol);
                println!("{}", symbols::unused_warning(symbol));
            }

            log::info!(
                "Done: {} symbol(s), {} language file(s), {} source file(s), {} file(s) changed, {} line(s) rewritten",
                summary.symbols_learned,
                summary.language_files,
                summary.source_files,
                summary.files_changed,
                summary.lines_changed
            );
        }
        Command::Expand => {
            log::info!(
                "Expanding {} into {} suffix(es)",
                config.expansion.base,
                config.expansion.suffixes.iter().filter(|s| !s.is_empty()).count()
            );
            let summary = run_expand(&config, &args.options).with_context(|| {
                format!("Suffix expansion under {} failed", args.options.root.display())
            })?;

            log::info!(
                "Done: {} language file(s), {} file(s) changed, {} definition(s) expanded",
                summary.language_files,
                summary.files_changed,
                summary.definitions_expanded
            );
        }
    }

    Ok(())
}

/// Parse command line arguments
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut command = None;
    let mut config_path = None;
    let mut options = RunOptions::default();
    let mut root = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-c" | "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    usage_error("--config requires a path argument");
                }
            }
            "--rewrite-sources" => options.rewrite_sources = true,
            "--dry-run" => options.dry_run = true,
            "fallback" if command.is_none() => command = Some(Command::Fallback),
            "expand" if command.is_none() => command = Some(Command::Expand),
            arg if arg.starts_with('-') => {
                usage_error(&format!("Unknown option: {}", arg));
            }
            _ => {
                if command.is_none() {
                    usage_error(&format!("Unknown command: {}", args[i]));
                }
                if root.is_some() {
                    usage_error("Only one ROOT directory may be given");
                }
                root = Some(PathBuf::from(&args[i]));
            }
        }
        i += 1;
    }

    let Some(command) = command else {
        usage_error("Missing command (fallback or expand)");
    };

    options.root = root
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    Args {
        command,
        config_path,
        options,
    }
}

fn usage_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    eprintln!("Use --help for usage information");
    std::process::exit(2);
}

/// Print help message
fn print_help() {
    println!(
        r#"l10n-rewrite - Language file migration for LCD message tables

USAGE:
    l10n-rewrite <COMMAND> [OPTIONS] [ROOT]

COMMANDS:
    fallback            Wrap reference symbols used in translations with the
                        lookup macro and report reference symbols never used
    expand              Generate suffixed variants of the expansion message

OPTIONS:
    -h, --help          Show this help message
    -v, --version       Show version information
    -c, --config FILE   Read settings from a JSON file
    --rewrite-sources   Also rewrite message references in code files
    --dry-run           Report changes without writing any file

ROOT defaults to the current directory. Without --config, settings are read
from the user configuration directory ({}/config.json) when present.

EXAMPLES:
    l10n-rewrite fallback                 Rewrite language_de.h and language_cz.h
    l10n-rewrite fallback --dry-run ~/fw  Show what would change under ~/fw
    l10n-rewrite expand -c suffixes.json  Expand using custom suffixes
"#,
        config::APP_ID
    );
}

/// Print version information
fn print_version() {
    println!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
}
