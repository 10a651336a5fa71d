//! CLI parse: clap types for unfurl. No behavior; definitions only.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// unfurl - materialize a bundled file tree onto the local filesystem
#[derive(Parser)]
#[command(name = "unfurl")]
#[command(about = "Materialize a read-only file tree onto the local filesystem")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root (config lookup; default destination)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the source tree
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Destination root
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the directory structure only
    Tree(RunArgs),
    /// Create directories and empty files; existing files are kept
    Touch(RunArgs),
    /// Write every file from the source, overwriting existing files
    Create(RunArgs),
    /// Create missing files; existing files are kept
    Patch(RunArgs),
    /// Run the policy named in the configuration
    Apply(RunArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// List what would change without writing anything
    #[arg(long)]
    pub list: bool,

    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Content for files created by the patch policy
    #[arg(long, value_enum)]
    pub fill: Option<FillArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillArg {
    Empty,
    Source,
}
