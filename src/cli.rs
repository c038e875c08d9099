//! CLI argument definitions using clap with subcommand architecture

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Contact directory pipeline: merge, clean and audit alumni vCard sources
#[derive(Parser, Debug)]
#[command(name = "annuaire")]
#[command(about = "Merge, clean and audit vCard sources for the alumni contact directory")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format for reports
    #[arg(short, long, default_value = "text", value_enum, global = true)]
    pub format: OutputFormat,

    /// Show verbose (debug-level) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands for annuaire
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge vCard sources into one deduplicated contact file
    #[command(visible_alias = "m")]
    Merge(MergeArgs),

    /// Clean cards from stdin: obsolete emails, dead URLs, duplicate orgs
    #[command(visible_alias = "c")]
    Clean(CleanArgs),

    /// Inject hand-curated known email addresses into cards from stdin
    FixEmails(FixEmailsArgs),

    /// Report contacts without an email address from stdin
    #[command(visible_alias = "r")]
    Report(ReportArgs),
}

/// Arguments for the merge command
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Input vCard files, in priority order (first file's naming wins)
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file for the merged directory
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
}

/// Arguments for the clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Email domain to filter out
    #[arg(long, value_name = "DOMAIN", default_value = "centre-cired.fr")]
    pub filter_domain: String,

    /// Timeout for URL checking in seconds
    #[arg(long, value_name = "SECS", default_value = "3")]
    pub timeout: u64,

    /// Limit processing to first N cards (for testing)
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Skip URL liveness checks
    #[arg(long)]
    pub offline: bool,
}

/// Arguments for the fix-emails command
#[derive(Args, Debug)]
pub struct FixEmailsArgs {
    /// Limit processing to first N cards (for testing)
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

/// Arguments for the report command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Only output the count of people without email
    #[arg(long)]
    pub count_only: bool,

    /// Sort the output alphabetically
    #[arg(long)]
    pub sort: bool,
}

/// Output format for report-producing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
