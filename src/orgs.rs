//! Organization name folding and deduplication
//!
//! Sources spell the institute as anything from the bare acronym to the full
//! French long form, sometimes both in one ORG value. Folding rewrites known
//! long forms to their acronym so "Centre International de Recherche sur
//! l'Environnement et le Développement" and "CIRED" collapse to one entry;
//! dedup then removes case-insensitive repeats within a value and across ORG
//! lines.

use crate::normalize::collation_key;

/// Long-form institute names and their acronyms. Matching is case- and
/// accent-insensitive on the whole segment.
const ACRONYM_FOLDS: &[(&str, &str)] = &[
    (
        "Centre International de Recherche sur l'Environnement et le Développement",
        "CIRED",
    ),
    (
        "International Research Center on Environment and Development",
        "CIRED",
    ),
];

/// Fold one comma/semicolon-delimited segment of an ORG value.
///
/// A segment equal to a known long form, or to a long form with the acronym
/// appended or prepended, becomes the acronym. Adjacent case-insensitive
/// word repeats are dropped ("CIRED CIRED University" → "CIRED University").
fn fold_segment(segment: &str) -> String {
    let key = collation_key(segment.trim());
    let key = key.split_whitespace().collect::<Vec<_>>().join(" ");
    for (long_form, acronym) in ACRONYM_FOLDS {
        let long_key = collation_key(long_form);
        let acronym_key = collation_key(acronym);
        if key == long_key
            || key == format!("{long_key} {acronym_key}")
            || key == format!("{acronym_key} {long_key}")
        {
            return acronym.to_string();
        }
    }

    let mut words: Vec<&str> = Vec::new();
    for word in segment.split_whitespace() {
        if let Some(last) = words.last() {
            if collation_key(last) == collation_key(word) {
                continue;
            }
        }
        words.push(word);
    }
    words.join(" ")
}

/// Fold a whole ORG value: fold each segment, then drop case-insensitive
/// repeated segments, keeping the first spelling and the original separator.
pub fn fold_org_value(value: &str) -> String {
    let sep = if value.contains(';') { ';' } else { ',' };
    let mut kept: Vec<String> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    for segment in value.split(sep) {
        let folded = fold_segment(segment);
        if folded.is_empty() {
            continue;
        }
        let key = collation_key(&folded);
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        kept.push(folded);
    }
    kept.join(&format!("{sep} "))
}

/// Fold and deduplicate a list of ORG values (across-line pass): each value
/// is folded, empties are dropped, and case-insensitive duplicates collapse
/// to the first-seen spelling.
pub fn dedup_organizations(values: &[String]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        let folded = fold_org_value(value);
        if folded.trim().is_empty() {
            continue;
        }
        let key = collation_key(&folded);
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        kept.push(folded);
    }
    kept
}
