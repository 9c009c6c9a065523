//! Tabula CLI - tabular data engine on the command line.

mod cli;
mod commands;

use std::path::Path;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use tabula::{FilterSpec, Tabula, TabulaConfig};
use tracing_subscriber::EnvFilter;

use commands::{CommandResult, Output};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CommandResult {
    let tabula = match &cli.config {
        Some(path) => Tabula::with_config(load_config(path)?),
        None => Tabula::new(),
    };
    let out = Output::new(cli.compact);

    match cli.command {
        Commands::Load { file, format } => out.report(tabula.load(&file, format.as_deref())),

        Commands::Sample { file, rows } => out.report(tabula.sample(&file, rows)),

        Commands::Analyze { file } => out.report(tabula.analyze(&file)),

        Commands::Stats { file, column } => out.report(tabula.column_stats(&file, &column)),

        Commands::Filter {
            file,
            column,
            operator,
            operand,
            output,
        } => {
            let spec = FilterSpec::new(column, operator.parse()?, operand);
            out.report(tabula.filter(&file, &spec, output.as_deref()))
        }

        Commands::Sort {
            file,
            column,
            descending,
            output,
        } => out.report(tabula.sort(&file, &column, descending, output.as_deref())),

        Commands::Convert {
            source,
            destination,
            format,
        } => out.report(tabula.convert(&source, &destination, format.as_deref())),

        Commands::Formats { json } => commands::formats::run(&tabula, json, &out),

        Commands::Tools => commands::call::list_tools(&out),

        Commands::Call { tool, args } => commands::call::run(&tabula, &tool, &args, &out),

        Commands::Serve => commands::serve::run(&tabula),
    }
}

/// Log to stderr so stdout carries only responses.
fn init_logging(verbose: bool) {
    let default = if verbose { "tabula=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("TABULA_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path) -> Result<TabulaConfig, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    let config = serde_json::from_str(&text)
        .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
    Ok(config)
}
