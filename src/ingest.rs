//! Source ingestion: read vCard files into a uniform in-memory collection
//!
//! Each input file is one source; its path string becomes the source id
//! attached to every card it contributes, preserved through merge for
//! attributed notes and history. Override tables are applied here, at
//! ingestion: full-name substitution first, then structured-name
//! substitution keyed on the possibly-substituted FN.
//!
//! A source that cannot be read, or holds no data, contributes nothing and
//! is logged; it never aborts ingestion of the remaining sources.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::overrides::OverrideTables;
use crate::vcard::{parse_components, ParsedCard, Vcard};

/// Apply the override tables to one freshly parsed card.
pub fn apply_overrides(card: &mut Vcard, tables: &OverrideTables) {
    if let Some(raw) = card.full_name.clone() {
        let trimmed = raw.trim();
        if let Some(corrected) = tables.expand_full_name(trimmed) {
            debug!("FN substitution: '{}' -> '{}'", trimmed, corrected);
            card.full_name = Some(corrected.to_string());
        }
    }
    if card.name.is_some() {
        if let Some(fn_value) = &card.full_name {
            if let Some(n) = tables.structured_name(fn_value.trim()) {
                debug!("N substitution for '{}'", fn_value.trim());
                card.name = Some(n.clone());
            }
        }
    }
}

/// Ingest all sources in order.
///
/// Returns the cards paired index-for-index with their source ids, in
/// arrival order (source list order, then within-source order). Later
/// stages rely on this order only for first-record-wins tie-breaks.
pub fn ingest<P: AsRef<Path>>(
    paths: &[P],
    tables: &OverrideTables,
) -> (Vec<Vcard>, Vec<String>) {
    let mut cards: Vec<Vcard> = Vec::new();
    let mut sources: Vec<String> = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let source_id = path.display().to_string();
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                warn!("Skipping source {}: {}", source_id, e);
                continue;
            }
        };
        if text.trim().is_empty() {
            warn!("Skipping source {}: no vCard data", source_id);
            continue;
        }

        let mut count = 0usize;
        for parsed in parse_components(&text) {
            match parsed {
                ParsedCard::Card(mut card) => {
                    apply_overrides(&mut card, tables);
                    cards.push(card);
                    sources.push(source_id.clone());
                    count += 1;
                }
                ParsedCard::Malformed(raw) => {
                    warn!(
                        "Skipping malformed card in {}: {}",
                        source_id,
                        raw.lines().next().unwrap_or("")
                    );
                }
            }
        }
        info!("Ingested {} ({} cards)", source_id, count);
    }

    info!("Total ingested: {} cards", cards.len());
    (cards, sources)
}
