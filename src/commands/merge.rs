//! Merge command handler - the core identity-resolution pipeline

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use crate::cli::{MergeArgs, OutputFormat};
use crate::commands::CommandContext;
use crate::error::{AnnuaireError, Result};
use crate::group::group_contacts;
use crate::ingest::ingest;
use crate::merge::merge_all;
use crate::overrides::OverrideTables;
use crate::verify::{find_institute_mentions, verify};

/// Run the merge command: ingest all sources, group by normalized name,
/// merge each group, write the sorted result, then run the post-merge
/// verifiers against the serialized output.
///
/// Missing input files are fatal for the invocation. Sources that exist but
/// hold no usable data are logged and skipped; if nothing usable remains,
/// the command fails without writing a (misleading) partial output file.
pub fn run_merge(args: &MergeArgs, ctx: &CommandContext) -> Result<String> {
    for input in &args.inputs {
        if !input.exists() {
            return Err(AnnuaireError::FileNotFound {
                path: input.display().to_string(),
            });
        }
    }

    let tables = OverrideTables::curated();
    let (cards, sources) = ingest(&args.inputs, tables);
    if cards.is_empty() {
        return Err(AnnuaireError::NoInput);
    }

    // source attribution is gone after grouping, so this detector runs now
    let institute_mentions = find_institute_mentions(&cards, &sources);

    let (grouped, unkeyable) = group_contacts(cards, sources, tables);
    for record in &unkeyable {
        warn!(
            "Excluded unkeyable record from {}: '{}'",
            record.source,
            record.full_name.as_deref().unwrap_or("(no FN)")
        );
    }
    if grouped.is_empty() {
        return Err(AnnuaireError::NoInput);
    }

    let mut merged = merge_all(&grouped);
    let rev = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    let mut serialized = String::new();
    for card in &mut merged {
        card.rev = Some(rev.clone());
        serialized.push_str(&card.serialize());
        serialized.push('\n');
    }

    write_output(&args.output, &serialized)?;
    info!(
        "Wrote {} merged contacts to {}",
        merged.len(),
        args.output.display()
    );

    // Diagnostic report on stderr; stdout keeps the summary only.
    let mut report = verify(&serialized);
    report.institute_mentions = institute_mentions;
    eprintln!("{}", report.render_text());

    match ctx.format {
        OutputFormat::Text => Ok(format!(
            "Merged {} contacts into {} ({} unkeyable record(s) excluded)\n",
            merged.len(),
            args.output.display(),
            unkeyable.len()
        )),
        OutputFormat::Json => {
            let value = json!({
                "contacts": merged.len(),
                "output": args.output.display().to_string(),
                "unkeyable": unkeyable.len(),
                "report": report,
            });
            Ok(format!(
                "{}\n",
                serde_json::to_string_pretty(&value).unwrap_or_default()
            ))
        }
    }
}

fn write_output(path: &Path, serialized: &str) -> Result<()> {
    fs::write(path, serialized).map_err(|e| AnnuaireError::WriteFailure {
        message: format!("{}: {}", path.display(), e),
    })
}
