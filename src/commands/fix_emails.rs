//! Fix-emails command handler - curated known-email injection
//!
//! Some people never appear with an email in any scraped source; their
//! addresses are known out of band and injected here. Empty table values
//! mark people looked up but still unresolved.

use std::io::Read;

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::{error, info};

use crate::cli::FixEmailsArgs;
use crate::commands::CommandContext;
use crate::error::{AnnuaireError, Result};
use crate::vcard::{parse_components, ParsedCard, Vcard};

const FIX_NOTE: &str = "Email manually added via fix script";

static KNOWN_EMAILS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Clément Feger", "clement.fege@agroparistech.fr"),
        ("Daniel Thery", ""),
        ("Guillaume Calas", "erthindol@hotmail.com"),
        ("Hoby Ratsihoarana", "hoby.ratsihoarana@gmail.com"),
        ("Héloïse Guillaumin", "heloise.guillaumin@gmail.com"),
        ("Ilaria Brunetti", "ilaria.brunetti@uzh.ch"),
        ("Isabelle Billy", "isabelle.billy348@orange.fr"),
        ("Jean-Charles Hourcade", "jch.hourcade@gmail.com"),
        ("Joël Hamann", "hamann.joel@orange.fr"),
        ("Laure Lampin", "laure.grazi@dgtresor.gouv.fr"),
        ("Li Jun", "prunush208@gmail.com"),
        ("Minh Ha-Duong", "minh.ha-duong@cnrs.fr"),
        ("Nhan Nguyen", "nhanait@yahoo.com"),
        ("Samuel Juhel", "samuel.juhel@usys.ethz.ch"),
        ("Serine Guichoud", ""),
        ("Sébastien Duquesnoy", "sebastien.duquesnoy@gmail.com"),
        ("Ta Mai-Thi", ""),
        ("Thanh Nguyen", ""),
        ("Thibault Corneloup", "thi.loup3@gmail.com"),
    ])
});

/// Run the fix-emails command over a vCard stream on stdin.
pub fn run_fix_emails(args: &FixEmailsArgs, _ctx: &CommandContext) -> Result<String> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    fix_stream(&input, args)
}

/// Testable body of the fix-emails command.
pub fn fix_stream(input: &str, args: &FixEmailsArgs) -> Result<String> {
    if input.trim().is_empty() {
        return Err(AnnuaireError::NoInput);
    }
    let mut cards = parse_components(input);
    if let Some(limit) = args.limit {
        info!("Processing limited to first {} cards", limit);
        cards.truncate(limit);
    }

    let mut out = String::new();
    for parsed in &mut cards {
        if let ParsedCard::Card(card) = parsed {
            fix_card(card);
        }
        out.push_str(parsed.serialize().trim_end_matches('\n'));
        out.push_str("\n\n");
    }
    Ok(out)
}

/// Inject the known email for this card's FN, if any and not already there.
fn fix_card(card: &mut Vcard) {
    let Some(fn_value) = card.full_name.clone() else {
        error!("No FN found for card, skipping {}", card.identifier());
        return;
    };
    let Some(email) = KNOWN_EMAILS.get(fn_value.trim()) else {
        return;
    };
    let email = email.trim();
    if email.is_empty() {
        return;
    }
    add_unique(&mut card.emails, email);
    add_unique(&mut card.notes, FIX_NOTE);
    info!("Fixed email for: {} -> {}", fn_value.trim(), email);
}

fn add_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}
