//! Clean command handler - stdin→stdout per-card filters

use std::io::Read;

use tracing::info;

use crate::clean::{clean_cards, CleanOptions, HttpUrlChecker, OfflineChecker, UrlChecker};
use crate::cli::CleanArgs;
use crate::commands::CommandContext;
use crate::error::{AnnuaireError, Result};
use crate::vcard::parse_components;

/// Run the clean command over a vCard stream on stdin. Every input card is
/// present in the output: cleaned when well-formed, verbatim when malformed.
pub fn run_clean(args: &CleanArgs, _ctx: &CommandContext) -> Result<String> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    clean_stream(&input, args)
}

/// Testable body of the clean command.
pub fn clean_stream(input: &str, args: &CleanArgs) -> Result<String> {
    if input.trim().is_empty() {
        return Err(AnnuaireError::NoInput);
    }
    let cards = parse_components(input);
    if cards.is_empty() {
        return Err(AnnuaireError::NoInput);
    }
    info!("Read {} card(s)", cards.len());

    let opts = CleanOptions {
        filter_domain: args.filter_domain.clone(),
        timeout_secs: args.timeout,
        limit: args.limit,
    };
    let checker: Box<dyn UrlChecker> = if args.offline {
        Box::new(OfflineChecker)
    } else {
        Box::new(HttpUrlChecker::new(opts.timeout_secs))
    };

    let cleaned = clean_cards(cards, &opts, checker.as_ref());
    info!("Processing complete: {} processed", cleaned.len());

    let mut out = String::new();
    for card in &cleaned {
        out.push_str(card.serialize().trim_end_matches('\n'));
        out.push_str("\n\n");
    }
    Ok(out)
}
