//! Record merger: collapse each contact group into one output card
//!
//! Deterministic given input order. The first card of a group wins for FN
//! and N, so ingestion order decides which source's naming convention
//! becomes canonical; callers wanting a specific source to win order their
//! sources accordingly.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashSet;

use tracing::{error, info};

use crate::group::ContactGroup;
use crate::normalize::collation_key;
use crate::orgs::dedup_organizations;
use crate::vcard::{TypedUrl, Vcard};

/// Merge one group of cards into a single card.
///
/// - organizations: acronym-folded, then case-insensitive first-seen dedup
/// - emails, tels, sources: case-insensitive first-seen dedup
/// - urls: dedup by (trimmed value, type set); same value under different
///   types stays as separate entries
/// - notes, history: exact-text dedup within the group, each new text
///   prefixed with its source id
pub fn merge_group(group: &ContactGroup) -> Vcard {
    let base = &group.cards[0];
    let mut merged = Vcard {
        full_name: base.full_name.clone(),
        name: base.name.clone(),
        ..Default::default()
    };

    let raw_orgs: Vec<String> = group
        .cards
        .iter()
        .flat_map(|c| c.organizations.iter().cloned())
        .collect();
    let had_orgs = raw_orgs.iter().any(|o| !o.trim().is_empty());
    merged.organizations = dedup_organizations(&raw_orgs);
    if had_orgs && merged.organizations.is_empty() {
        error!(
            "Organization list emptied by folding for '{}'",
            merged.full_name.as_deref().unwrap_or("(no FN)")
        );
    }

    merged.emails = dedup_case_insensitive(group.cards.iter().flat_map(|c| &c.emails));
    merged.tels = dedup_case_insensitive(group.cards.iter().flat_map(|c| &c.tels));
    merged.sources = dedup_case_insensitive(group.cards.iter().flat_map(|c| &c.sources));

    let mut url_seen: HashSet<(String, BTreeSet<String>)> = HashSet::new();
    for card in &group.cards {
        for url in &card.urls {
            let value = url.value.trim().to_string();
            if value.is_empty() {
                continue;
            }
            let key = (value.clone(), url.types.clone());
            if url_seen.insert(key) {
                merged.urls.push(TypedUrl {
                    value,
                    types: url.types.clone(),
                });
            }
        }
    }

    merged.notes = attribute_texts(group, |c| &c.notes);
    merged.history = attribute_texts(group, |c| &c.history);

    merged
}

/// Case-insensitive first-seen dedup over trimmed values; first casing wins.
fn dedup_case_insensitive<'a, I: Iterator<Item = &'a String>>(values: I) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::new();
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            kept.push(trimmed.to_string());
        }
    }
    kept
}

/// Concatenate free-text fields across a group in arrival order, suppressing
/// exact duplicate texts and prefixing each kept entry with its source id.
fn attribute_texts<F>(group: &ContactGroup, field: F) -> Vec<String>
where
    F: Fn(&Vcard) -> &Vec<String>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for (card, source) in group.cards.iter().zip(&group.sources) {
        for text in field(card) {
            let text = text.trim();
            if text.is_empty() || !seen.insert(text.to_string()) {
                continue;
            }
            out.push(format!("[{source}] {text}"));
        }
    }
    out
}

/// Merge every group and sort the result by a French-collation-approximating
/// key of the display name. Multi-card merges are logged with their sources.
pub fn merge_all(grouped: &BTreeMap<String, ContactGroup>) -> Vec<Vcard> {
    let mut merged: Vec<Vcard> = Vec::with_capacity(grouped.len());
    for (key, group) in grouped {
        if group.cards.len() > 1 {
            info!(
                "Merging key '{}' -> '{}'",
                key,
                group.cards[0].full_name.as_deref().unwrap_or("(no FN)")
            );
            for (card, source) in group.cards.iter().zip(&group.sources) {
                info!(
                    "  from {}: '{}'",
                    source,
                    card.full_name.as_deref().unwrap_or("(no FN)")
                );
            }
        }
        merged.push(merge_group(group));
    }
    merged.sort_by_key(|c| collation_key(c.full_name.as_deref().unwrap_or("")));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::group_contacts;
    use crate::overrides::OverrideTables;

    fn card(full_name: &str) -> Vcard {
        Vcard {
            full_name: Some(full_name.to_string()),
            ..Default::default()
        }
    }

    fn group_of(cards: Vec<Vcard>, sources: &[&str]) -> ContactGroup {
        ContactGroup {
            cards,
            sources: sources.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn first_card_wins_for_display_name() {
        let group = group_of(vec![card("Minh Ha-Duong"), card("Ha-Duong Minh")], &["a", "b"]);
        let merged = merge_group(&group);
        assert_eq!(merged.full_name.as_deref(), Some("Minh Ha-Duong"));
    }

    #[test]
    fn email_dedup_is_case_insensitive_order_preserving() {
        let mut a = card("T");
        a.emails = vec!["a@x.com".into(), "A@X.com".into()];
        let mut b = card("T");
        b.emails = vec!["b@y.com".into(), "a@x.com".into()];
        let merged = merge_group(&group_of(vec![a, b], &["s1", "s2"]));
        assert_eq!(merged.emails, vec!["a@x.com", "b@y.com"]);
    }

    #[test]
    fn url_type_sets_keep_distinct_entries() {
        let mut a = card("T");
        a.urls = vec![
            TypedUrl::with_types("https://x.fr", &["HAL"]),
            TypedUrl::with_types("https://x.fr", &["HOME"]),
        ];
        let mut b = card("T");
        b.urls = vec![TypedUrl::with_types("https://x.fr ", &["HAL"])];
        let merged = merge_group(&group_of(vec![a, b], &["s1", "s2"]));
        assert_eq!(merged.urls.len(), 2);
    }

    #[test]
    fn organizations_fold_to_acronym() {
        let mut a = card("T");
        a.organizations = vec![
            "Centre International de Recherche sur l'Environnement et le Développement".into(),
        ];
        let mut b = card("T");
        b.organizations = vec!["CIRED".into()];
        let merged = merge_group(&group_of(vec![a, b], &["s1", "s2"]));
        assert_eq!(merged.organizations, vec!["CIRED"]);
    }

    #[test]
    fn notes_are_attributed_and_deduped_by_exact_text() {
        let mut a = card("T");
        a.notes = vec!["alumnus".into()];
        let mut b = card("T");
        b.notes = vec!["alumnus".into(), "joined 1998".into()];
        let merged = merge_group(&group_of(vec![a, b], &["A", "B"]));
        assert_eq!(merged.notes, vec!["[A] alumnus", "[B] joined 1998"]);
    }

    #[test]
    fn history_attribution_matches_note_rule() {
        let mut a = card("T");
        a.history = vec!["Listed as Member in REPEC on 2025-06-11".into()];
        let merged = merge_group(&group_of(vec![a], &["askREPEC.vcf"]));
        assert_eq!(
            merged.history,
            vec!["[askREPEC.vcf] Listed as Member in REPEC on 2025-06-11"]
        );
    }

    #[test]
    fn end_to_end_three_source_scenario() {
        let tables = OverrideTables::new(
            &[
                ("M. Ha-Duong", "Minh Ha-Duong"),
                ("Ha-Duong Minh", "Minh Ha-Duong"),
            ],
            &[],
            &[],
        );
        let mut a = card("Minh Ha-Duong");
        a.emails = vec!["m@x.fr".into()];
        let mut b = card("Ha-Duong Minh");
        b.organizations = vec!["CIRED".into()];
        let mut c = card("M. Ha-Duong");
        c.notes = vec!["alumnus".into()];
        crate::ingest::apply_overrides(&mut b, &tables);
        crate::ingest::apply_overrides(&mut c, &tables);

        let (grouped, unkeyable) = group_contacts(
            vec![a, b, c],
            vec!["A".into(), "B".into(), "C".into()],
            &tables,
        );
        assert!(unkeyable.is_empty());
        assert_eq!(grouped.len(), 1);

        let merged = merge_all(&grouped);
        assert_eq!(merged.len(), 1);
        let contact = &merged[0];
        assert_eq!(contact.full_name.as_deref(), Some("Minh Ha-Duong"));
        assert_eq!(contact.emails, vec!["m@x.fr"]);
        assert_eq!(contact.organizations, vec!["CIRED"]);
        assert_eq!(contact.notes, vec!["[C] alumnus"]);
    }

    #[test]
    fn output_sorted_with_accents_near_base_letters() {
        let mut grouped = BTreeMap::new();
        for (i, name) in ["Zoé Martin", "Étienne Espagne", "Emile Durand"].iter().enumerate() {
            grouped.insert(
                format!("k{i}"),
                group_of(vec![card(name)], &["s"]),
            );
        }
        let merged = merge_all(&grouped);
        let names: Vec<_> = merged.iter().filter_map(|c| c.full_name.as_deref()).collect();
        assert_eq!(names, vec!["Emile Durand", "Étienne Espagne", "Zoé Martin"]);
    }
}
