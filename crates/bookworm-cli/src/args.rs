use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "bookworm",
    version,
    about = "Static analysis reports over Chef cookbooks and roles"
)]
pub struct Args {
    /// Report to build (see --list-reports)
    #[arg(long, short)]
    pub report: Option<String>,

    /// List available reports and exit
    #[arg(long)]
    pub list_reports: bool,

    /// List available rules and exit
    #[arg(long)]
    pub list_rules: bool,

    /// Output format
    #[arg(long, default_value = "plain")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Read configuration from this file only, instead of the system and user files
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}
