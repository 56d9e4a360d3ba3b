use std::path::PathBuf;

use clap::{Parser, Subcommand};

use locality_lens::analysis::query::{DEFAULT_LIMIT, parse_limit};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

#[derive(Parser)]
#[command(name = "locality-lens")]
#[command(about = "Locality facts, trends and comparisons from a real-estate spreadsheet")]
#[command(version)]
pub struct Cli {
    /// Dataset file (.xlsx, .xls, .ods, .csv, .json, .parquet)
    #[arg(long, env = "LOCALITY_LENS_DATA", default_value = "preload/data.xlsx", global = true)]
    pub data: PathBuf,

    /// Indent JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize one locality
    #[command(after_help = "\
Examples:
  locality-lens analyze Wakad
  locality-lens --data sales.csv analyze 'pune west' --limit 20")]
    Analyze {
        /// Case-insensitive substring of the locality name
        query: String,

        /// Maximum table rows returned
        #[arg(long, default_value_t = DEFAULT_LIMIT, value_parser = parse_limit)]
        limit: usize,
    },

    /// Summarize several localities side by side
    #[command(after_help = "\
Examples:
  locality-lens compare Wakad Aundh
  locality-lens compare Wakad,Aundh,Baner")]
    Compare {
        /// Locality labels (comma-separated entries are split)
        #[arg(required = true)]
        labels: Vec<String>,

        /// Maximum table rows returned per label
        #[arg(long, default_value_t = DEFAULT_LIMIT, value_parser = parse_limit)]
        limit: usize,
    },

    /// Validate a file and make it the active dataset
    Upload {
        /// Candidate dataset, same format as --data
        file: PathBuf,
    },

    /// Copy the stored dataset file to DEST
    Download {
        /// Destination path
        dest: PathBuf,
    },

    /// Show columns and the role each one was assigned
    Columns,
}
