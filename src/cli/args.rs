use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "fintrack_cli",
    version,
    about = "Income and expense reports from ledger snapshots"
)]
pub struct Cli {
    /// Directory holding `config/config.json` (defaults to $FINTRACK_HOME or ~/.fintrack)
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a report from income and expense JSON arrays
    Report(ReportArgs),
    /// View and manage report preferences
    Config(ConfigArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// JSON array of income records
    #[arg(long, value_name = "FILE")]
    pub income: PathBuf,

    /// JSON array of expense records
    #[arg(long, value_name = "FILE")]
    pub expenses: PathBuf,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Sort category breakdowns by label
    #[arg(long)]
    pub alphabetical: bool,

    /// Replace negative amounts with zero
    #[arg(long)]
    pub zero_negatives: bool,

    /// Disable colour
    #[arg(long)]
    pub plain: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the current preferences (default)
    Show,
    /// Change one preference
    Set { key: String, value: String },
    /// Snapshot the current preferences
    Backup,
    /// List snapshots, newest first
    Backups,
    /// Replace the current preferences with a snapshot
    Restore { name: String },
}
