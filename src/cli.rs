use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "playlist-diff")]
#[command(about = "Track a YouTube playlist and record what changed since the last run")]
#[command(version)]
pub struct Cli {
    /// Show debug logging
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true, default_value_t = false, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch the playlist, compare it with the stored one and persist changes
    Sync(SyncArgs),

    /// Show the stored playlist, diff or archived history
    Report(ReportArgs),

    /// Compare two snapshot documents without writing anything
    Diff(DiffArgs),
}

/// Where configuration and state come from.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Config file (defaults to ./config.toml, ./config.json, then the user config dir)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Directory holding playlist and diff documents
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct SyncArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Archive the previous playlist and diff before overwriting them
    #[arg(long, default_value_t = false)]
    pub keep_history: bool,

    /// Decide what would change without writing anything
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Print the outcome as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Parser)]
pub struct ReportArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Show the stored diff instead of the playlist
    #[arg(long, default_value_t = false)]
    pub diff: bool,

    /// List archived documents
    #[arg(long, default_value_t = false)]
    pub list: bool,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Parser)]
pub struct DiffArgs {
    /// Older snapshot document
    pub from: PathBuf,

    /// Newer snapshot document
    pub to: PathBuf,

    /// Output the diff snapshot as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
