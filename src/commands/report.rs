//! Report command handler - contacts lacking an email address

use std::io::Read;

use serde_json::json;
use tracing::info;

use crate::cli::{OutputFormat, ReportArgs};
use crate::commands::CommandContext;
use crate::error::{AnnuaireError, Result};
use crate::vcard::{parse_components, ParsedCard};

/// Run the report command over a vCard stream on stdin.
pub fn run_report(args: &ReportArgs, ctx: &CommandContext) -> Result<String> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    report_stream(&input, args, ctx)
}

/// Testable body of the report command.
pub fn report_stream(input: &str, args: &ReportArgs, ctx: &CommandContext) -> Result<String> {
    let cards: Vec<_> = parse_components(input)
        .into_iter()
        .filter_map(|parsed| match parsed {
            ParsedCard::Card(card) => Some(card),
            ParsedCard::Malformed(_) => None,
        })
        .collect();
    if cards.is_empty() {
        return Err(AnnuaireError::NoInput);
    }

    let mut missing: Vec<String> = cards
        .iter()
        .filter(|card| !card.has_email())
        .map(|card| match &card.full_name {
            Some(fn_value) if !fn_value.trim().is_empty() => fn_value.trim().to_string(),
            _ => format!("[No FN] {}", card.identifier()),
        })
        .collect();
    if args.sort {
        missing.sort();
    }

    let total = cards.len();
    let with_email = total - missing.len();
    info!("Total people: {}", total);
    info!("People with email: {}", with_email);
    info!("People without email: {}", missing.len());
    info!(
        "Email coverage: {:.1}%",
        with_email as f64 / total as f64 * 100.0
    );

    if let OutputFormat::Json = ctx.format {
        let value = json!({
            "total": total,
            "without_email": missing.len(),
            "names": if args.count_only { json!(null) } else { json!(missing) },
        });
        return Ok(format!(
            "{}\n",
            serde_json::to_string_pretty(&value).unwrap_or_default()
        ));
    }

    if args.count_only {
        return Ok(format!("{}\n", missing.len()));
    }
    if missing.is_empty() {
        return Ok("All people have non-empty email addresses.\n".to_string());
    }
    let mut out = format!(
        "People without email addresses ({} total):\n{}\n",
        missing.len(),
        "=".repeat(70)
    );
    for name in &missing {
        out.push_str(name);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> CommandContext {
        CommandContext::default()
    }

    const INPUT: &str = "BEGIN:VCARD\nFN:Jean Dupont\nEMAIL:j@x.fr\nEND:VCARD\n\
BEGIN:VCARD\nFN:Zoé Martin\nEND:VCARD\n\
BEGIN:VCARD\nFN:Anne Roy\nEMAIL: \nEND:VCARD\n";

    #[test]
    fn lists_people_without_or_with_blank_email() {
        let args = ReportArgs {
            count_only: false,
            sort: true,
        };
        let out = report_stream(INPUT, &args, &ctx()).unwrap();
        assert!(out.contains("Anne Roy"));
        assert!(out.contains("Zoé Martin"));
        assert!(!out.contains("Jean Dupont"));
    }

    #[test]
    fn count_only_prints_just_the_number() {
        let args = ReportArgs {
            count_only: true,
            sort: false,
        };
        let out = report_stream(INPUT, &args, &ctx()).unwrap();
        assert_eq!(out, "2\n");
    }

    #[test]
    fn card_without_fn_uses_fallback_identifier() {
        let input = "BEGIN:VCARD\nORG:CIRED\nEND:VCARD\n";
        let args = ReportArgs {
            count_only: false,
            sort: false,
        };
        let out = report_stream(input, &args, &ctx()).unwrap();
        assert!(out.contains("[No FN] CIRED"));
    }

    #[test]
    fn empty_input_fails() {
        let args = ReportArgs {
            count_only: false,
            sort: false,
        };
        assert!(matches!(
            report_stream("", &args, &ctx()),
            Err(AnnuaireError::NoInput)
        ));
    }

    #[test]
    fn json_format_reports_counts() {
        let args = ReportArgs {
            count_only: false,
            sort: true,
        };
        let ctx = CommandContext::from_cli(OutputFormat::Json, false);
        let out = report_stream(INPUT, &args, &ctx).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["total"], 3);
        assert_eq!(value["without_email"], 2);
    }
}
