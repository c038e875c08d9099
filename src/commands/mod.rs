//! Command modules for the annuaire CLI
//!
//! Each module implements one top-level subcommand:
//! - `merge` - the core pipeline: ingest, group, merge, write, verify
//! - `clean` - per-card filters over a stdin→stdout stream
//! - `fix_emails` - curated known-email injection over a stdin→stdout stream
//! - `report` - list contacts lacking an email address
//!
//! Handlers take their `Args` struct from `cli.rs` plus a shared
//! [`CommandContext`]; they return the text destined for stdout while all
//! diagnostics go to stderr through `tracing`.

pub mod clean;
pub mod fix_emails;
pub mod merge;
pub mod report;

// Re-export command handlers for easy access
pub use clean::run_clean;
pub use fix_emails::run_fix_emails;
pub use merge::run_merge;
pub use report::run_report;

use crate::cli::OutputFormat;

/// Shared context passed to all command handlers
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Output format for reports (text or json)
    pub format: OutputFormat,
    /// Show verbose output
    pub verbose: bool,
}

impl Default for CommandContext {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            verbose: false,
        }
    }
}

impl CommandContext {
    /// Create a new CommandContext from CLI args
    pub fn from_cli(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }
}
