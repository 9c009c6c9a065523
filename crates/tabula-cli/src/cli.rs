//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tabula: load, inspect, filter, sort and convert tabular data files
#[derive(Parser)]
#[command(name = "tabula")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging on stderr (TABULA_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON file with engine settings
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print responses on one line instead of indented
    #[arg(long, global = true)]
    pub compact: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a file and report its columns and inferred types
    Load {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Force a format by identifier or extension (e.g. csv, jsonl)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Show the first rows of a file
    Sample {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of rows (default from config, normally 10)
        #[arg(short = 'n', long)]
        rows: Option<usize>,
    },

    /// Describe each column's type with example values
    Analyze {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Statistics for one column
    Stats {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Column name
        #[arg(value_name = "COLUMN")]
        column: String,
    },

    /// Keep rows matching a comparison
    Filter {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Column to compare
        #[arg(value_name = "COLUMN")]
        column: String,

        /// Operator (equals, not_equals, greater_than, less_than,
        /// greater_or_equal, less_or_equal, contains, starts_with,
        /// ends_with, or a symbol such as >=)
        #[arg(value_name = "OPERATOR")]
        operator: String,

        /// Value to compare against
        #[arg(value_name = "OPERAND", allow_hyphen_values = true)]
        operand: String,

        /// Write matching rows here instead of printing them
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sort rows by a column
    Sort {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Column to sort by
        #[arg(value_name = "COLUMN")]
        column: String,

        /// Sort largest first
        #[arg(short, long)]
        descending: bool,

        /// Write sorted rows here instead of printing them
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a file to the format of the destination's extension
    Convert {
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        #[arg(value_name = "DESTINATION")]
        destination: PathBuf,

        /// Output format, overriding the destination extension
        #[arg(short, long)]
        format: Option<String>,
    },

    /// List supported file formats
    Formats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print tool names, descriptions and argument schemas
    Tools,

    /// Invoke a tool by name with JSON arguments
    Call {
        /// Tool name (e.g. filter_data or filter)
        #[arg(value_name = "TOOL")]
        tool: String,

        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Answer one JSON tool call per stdin line with one JSON result per stdout line
    Serve,
}
