//! annuaire CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use annuaire::commands::{run_clean, run_fix_emails, run_merge, run_report, CommandContext};
use annuaire::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run(cli: &Cli) -> annuaire::Result<String> {
    let ctx = CommandContext::from_cli(cli.format, cli.verbose);
    match &cli.command {
        Commands::Merge(args) => run_merge(args, &ctx),
        Commands::Clean(args) => run_clean(args, &ctx),
        Commands::FixEmails(args) => run_fix_emails(args, &ctx),
        Commands::Report(args) => run_report(args, &ctx),
    }
}

/// Diagnostics go to stderr; stdout stays clean for piped card streams.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
