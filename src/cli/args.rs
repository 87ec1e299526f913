//! Command line argument parsing for the coursearch CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// coursearch - courseware and course discovery search
#[derive(Parser, Debug, Clone)]
#[command(name = "coursearch")]
#[command(about = "Courseware and course discovery search over a pluggable engine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct CoursearchArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Settings file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "COURSEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl CoursearchArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search courseware content
    Search(SearchArgs),

    /// Search course descriptions for discovery
    Discover(DiscoverArgs),

    /// Create or update a course catalog database
    #[command(name = "init-catalog")]
    InitCatalog(InitCatalogArgs),
}

/// Arguments for courseware search
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Documents file (JSON array or JSONL)
    #[arg(value_name = "DOCUMENTS")]
    pub documents: PathBuf,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Restrict to one course
    #[arg(long)]
    pub course: Option<String>,

    /// Search as this user (anonymous when omitted)
    #[arg(long)]
    pub user: Option<String>,

    /// The user is staff
    #[arg(long, requires = "user")]
    pub staff: bool,

    /// Course the user is enrolled in (repeatable)
    #[arg(long = "enrolled", value_name = "COURSE_ID", requires = "user")]
    pub enrolled: Vec<String>,

    /// Maximum number of results to return
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Offset for pagination
    #[arg(short, long, default_value = "0")]
    pub offset: usize,
}

/// Arguments for course discovery
#[derive(Parser, Debug, Clone)]
pub struct DiscoverArgs {
    /// Documents file (JSON array or JSONL)
    #[arg(value_name = "DOCUMENTS")]
    pub documents: PathBuf,

    /// Course catalog database (SQLite)
    #[arg(value_name = "CATALOG_DB")]
    pub catalog: PathBuf,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Ordering: newer, older, or anything else for relevance
    #[arg(long, default_value = "")]
    pub order_by: String,

    /// Start year
    #[arg(long)]
    pub year: Option<String>,

    /// Course state: active or finished
    #[arg(long)]
    pub state: Option<String>,

    /// Classification id
    #[arg(long)]
    pub classification: Option<String>,

    /// Classifications file (JSON array)
    #[arg(long, value_name = "FILE")]
    pub classifications: Option<PathBuf>,

    /// Field constraint as FIELD=VALUE (repeatable)
    #[arg(long = "field", value_name = "FIELD=VALUE")]
    pub fields: Vec<String>,

    /// Maximum number of results to return
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Offset for pagination
    #[arg(short, long, default_value = "0")]
    pub offset: usize,
}

/// Arguments for catalog initialization
#[derive(Parser, Debug, Clone)]
pub struct InitCatalogArgs {
    /// Course catalog database (SQLite), created if missing
    #[arg(value_name = "CATALOG_DB")]
    pub catalog: PathBuf,

    /// Course visibility as COURSE_ID=VISIBILITY (repeatable)
    #[arg(long = "course", value_name = "COURSE_ID=VISIBILITY")]
    pub courses: Vec<String>,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Split a `KEY=VALUE` argument.
pub fn parse_key_value(arg: &str) -> Option<(&str, &str)> {
    let (key, value) = arg.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        None
    } else {
        Some((key, value.trim()))
    }
}
