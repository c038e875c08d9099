//! Grouping engine: partition ingested cards by normalized name key
//!
//! The normalized-key override table wins over the standard normalizer.
//! Cards whose key comes out empty (no FN, or an FN with no letters) cannot
//! be merged safely; they are excluded from every group and reported
//! separately instead of being merged into an arbitrary bucket.

use std::collections::BTreeMap;

use tracing::warn;

use crate::normalize::normalize_name;
use crate::overrides::OverrideTables;
use crate::vcard::Vcard;

/// One equivalence class of cards believed to describe the same person,
/// with their source ids in arrival order.
#[derive(Debug, Clone, Default)]
pub struct ContactGroup {
    pub cards: Vec<Vcard>,
    pub sources: Vec<String>,
}

/// A card that could not be keyed, kept for the diagnostic report.
#[derive(Debug, Clone)]
pub struct Unkeyable {
    pub full_name: Option<String>,
    pub source: String,
}

/// Compute the group key for a card: override table first, then the
/// standard normalizer. Empty means unkeyable.
pub fn group_key(card: &Vcard, tables: &OverrideTables) -> String {
    let Some(raw) = &card.full_name else {
        return String::new();
    };
    if let Some(key) = tables.normalized_key(raw) {
        return key;
    }
    normalize_name(raw)
}

/// Partition cards into groups keyed by normalized name, preserving arrival
/// order inside each group. The `BTreeMap` gives deterministic key order for
/// the merge pass.
pub fn group_contacts(
    cards: Vec<Vcard>,
    sources: Vec<String>,
    tables: &OverrideTables,
) -> (BTreeMap<String, ContactGroup>, Vec<Unkeyable>) {
    let mut grouped: BTreeMap<String, ContactGroup> = BTreeMap::new();
    let mut unkeyable = Vec::new();

    for (card, source) in cards.into_iter().zip(sources) {
        let key = group_key(&card, tables);
        if key.is_empty() {
            warn!(
                "Unkeyable card from {}: '{}'",
                source,
                card.full_name.as_deref().unwrap_or("(no FN)")
            );
            unkeyable.push(Unkeyable {
                full_name: card.full_name.clone(),
                source,
            });
            continue;
        }
        let group = grouped.entry(key).or_default();
        group.cards.push(card);
        group.sources.push(source);
    }

    (grouped, unkeyable)
}
