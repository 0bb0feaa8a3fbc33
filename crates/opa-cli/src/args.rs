use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use opa_core::TOOL_NAME;

/// Sentinel output path meaning "standard output only".
pub const STDOUT_SENTINEL: &str = "STDOUT";

#[derive(Debug, Parser)]
#[command(
    name = TOOL_NAME,
    version,
    about = "Operator Permissions Advisor",
    long_about = "Operator Permissions Advisor is a CLI for getting an early preview of the permissions an \
Operator channel will need for an install of the controller through OLM"
)]
pub struct Cli {
    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Statically check the catalog for permission information
    Static(StaticArgs),
}

#[derive(Debug, Args)]
pub struct StaticArgs {
    /// Catalog index image reference, or path to a file-based catalog
    #[arg(short = 'c', long)]
    pub catalog: String,

    /// Channel to check for permissions in
    #[arg(short = 's', long)]
    pub channel: String,

    /// Operator package to check for permissions in
    #[arg(short = 'o', long)]
    pub operator: String,

    /// Location to save the aggregated Role to
    #[arg(short = 'r', long, default_value = STDOUT_SENTINEL)]
    pub role: String,

    /// Location to save the aggregated ClusterRole to
    #[arg(short = 'R', long = "clusterRole", default_value = STDOUT_SENTINEL)]
    pub cluster_role: String,

    /// STDOUT output format
    #[arg(short = 'k', long, value_enum, default_value_t = OutputFormat::Standard)]
    pub output: OutputFormat,

    /// Aggregate permissions across every bundle in the channel instead of
    /// only the channel head
    #[arg(short = 'a', long)]
    pub aggregate: bool,

    /// opm binary used to render catalog images
    #[arg(long, default_value = "opm")]
    pub opm: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Labelled Role and ClusterRole sections
    Standard,
    /// Two YAML documents separated by `---`
    Compact,
}

/// `None` for the stdout sentinel, otherwise the file to write.
pub fn destination(value: &str) -> Option<PathBuf> {
    (value != STDOUT_SENTINEL).then(|| PathBuf::from(value))
}
