//! Post-merge verifiers: diagnostic passes over the pipeline output
//!
//! Read-only detectors flag residual duplicates for human review; findings
//! feed back into the override tables on a later run. Three detectors work
//! on the serialized output; a fourth scans the ingested cards for names
//! that mention the institute, which usually means an organization string
//! was scraped into the name field. Nothing here mutates data.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::vcard::{parse_components, Vcard};

const INSTITUTE_ACRONYM: &str = "cired";

/// FN names that are suspicious in form: ALLCAPS words, bare initials, or
/// a single-word name.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SuspiciousName {
    pub full_name: String,
    pub all_caps: bool,
    pub single_letter: bool,
    pub single_word: bool,
}

/// Findings of all three detectors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyReport {
    /// FN pairs where one is the exact word-reversal of the other:
    /// a missed merge due to unresolved name-order ambiguity.
    pub inverted_pairs: Vec<(String, String)>,
    /// Groups of FNs sharing their first two words: likely near-duplicate
    /// variants (middle-name differences and the like).
    pub shared_prefix_groups: Vec<Vec<String>>,
    pub suspicious: Vec<SuspiciousName>,
    /// FNs mentioning the institute acronym, as `(full_name, source)`.
    /// Filled by [`find_institute_mentions`] over the ingested cards.
    pub institute_mentions: Vec<(String, String)>,
}

impl VerifyReport {
    pub fn is_empty(&self) -> bool {
        self.inverted_pairs.is_empty()
            && self.shared_prefix_groups.is_empty()
            && self.suspicious.is_empty()
            && self.institute_mentions.is_empty()
    }

    /// Human-readable rendering for the diagnostic channel.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if self.inverted_pairs.is_empty() {
            out.push_str("No inverted FN pairs found.\n");
        } else {
            out.push_str("===== FN names that appear in both orders =====\n");
            for (a, b) in &self.inverted_pairs {
                out.push_str(&format!("{a}  <->  {b}\n"));
            }
        }
        if self.shared_prefix_groups.is_empty() {
            out.push_str("No FN names with identical first two parts found.\n");
        } else {
            out.push_str("===== FN names with identical first two parts =====\n");
            for group in &self.shared_prefix_groups {
                out.push_str(&format!("{}\n", group.join("  ~  ")));
            }
        }
        if self.suspicious.is_empty() {
            out.push_str("No FNs with suspicious form found.\n");
        } else {
            out.push_str("===== FNs with suspicious form =====\n");
            for s in &self.suspicious {
                let mut flags = Vec::new();
                if s.all_caps {
                    flags.push("ALLCAPS");
                }
                if s.single_letter {
                    flags.push("single-letter");
                }
                if s.single_word {
                    flags.push("single-word");
                }
                out.push_str(&format!("{} ({})\n", s.full_name, flags.join(", ")));
            }
        }
        if self.institute_mentions.is_empty() {
            out.push_str("No FNs containing the institute acronym found.\n");
        } else {
            out.push_str("===== FNs suspiciously containing the institute acronym =====\n");
            for (fn_value, source) in &self.institute_mentions {
                out.push_str(&format!("{fn_value}  [source: {source}]\n"));
            }
        }
        out
    }
}

/// Flag every card whose FN mentions the institute acronym,
/// case-insensitively, paired with its source id. Runs over the ingested
/// cards because source attribution is lost after merging.
pub fn find_institute_mentions(cards: &[Vcard], sources: &[String]) -> Vec<(String, String)> {
    cards
        .iter()
        .zip(sources)
        .filter_map(|(card, source)| {
            let fn_value = card.full_name.as_deref()?;
            if fn_value.to_lowercase().contains(INSTITUTE_ACRONYM) {
                Some((fn_value.to_string(), source.clone()))
            } else {
                None
            }
        })
        .collect()
}

/// Pull the FN display values out of serialized vCard text. Goes through
/// the full parser so folding and escaping are honored; malformed
/// components contribute nothing.
pub fn extract_full_names(serialized: &str) -> Vec<String> {
    parse_components(serialized)
        .iter()
        .filter_map(|parsed| parsed.as_card())
        .filter_map(|card| card.full_name.as_deref())
        .map(|fn_value| fn_value.trim().to_string())
        .filter(|fn_value| !fn_value.is_empty())
        .collect()
}

/// Run the three serialized-output detectors. Callers holding the ingested
/// cards fill `institute_mentions` via [`find_institute_mentions`].
pub fn verify(serialized: &str) -> VerifyReport {
    let names = extract_full_names(serialized);
    VerifyReport {
        inverted_pairs: find_inverted_pairs(&names),
        shared_prefix_groups: find_shared_prefix_groups(&names),
        suspicious: find_suspicious_forms(&names),
        institute_mentions: Vec::new(),
    }
}

fn invert_name(name: &str) -> Option<String> {
    let parts: Vec<&str> = name.split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }
    Some(parts.into_iter().rev().collect::<Vec<_>>().join(" "))
}

fn find_inverted_pairs(names: &[String]) -> Vec<(String, String)> {
    let name_set: HashSet<&str> = names.iter().map(|s| s.as_str()).collect();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut pairs = Vec::new();
    for name in names {
        let Some(inverted) = invert_name(name) else {
            continue;
        };
        if inverted != *name
            && name_set.contains(inverted.as_str())
            && !seen.contains(&(inverted.clone(), name.clone()))
        {
            seen.insert((name.clone(), inverted.clone()));
            seen.insert((inverted.clone(), name.clone()));
            pairs.push((name.clone(), inverted));
        }
    }
    pairs.sort();
    pairs
}

fn find_shared_prefix_groups(names: &[String]) -> Vec<Vec<String>> {
    let mut by_prefix: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for name in names {
        let parts: Vec<&str> = name.split_whitespace().collect();
        if parts.len() >= 2 {
            by_prefix
                .entry(format!("{} {}", parts[0], parts[1]))
                .or_default()
                .push(name.clone());
        }
    }
    by_prefix
        .into_values()
        .filter(|group| group.len() > 1)
        .collect()
}

fn find_suspicious_forms(names: &[String]) -> Vec<SuspiciousName> {
    let mut out = Vec::new();
    for name in names {
        let parts: Vec<&str> = name.split_whitespace().collect();
        let all_caps = parts.iter().any(|p| is_all_caps_word(p));
        let single_letter = parts.iter().any(|p| is_bare_initial(p));
        let single_word = parts.len() == 1;
        if all_caps || single_letter || single_word {
            out.push(SuspiciousName {
                full_name: name.clone(),
                all_caps,
                single_letter,
                single_word,
            });
        }
    }
    out
}

/// An ALLCAPS word of length >= 2 that is not a dotted initial like "R.".
fn is_all_caps_word(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() < 2 {
        return false;
    }
    if chars.len() == 2 && chars[1] == '.' {
        return false;
    }
    let mut has_alpha = false;
    for c in &chars {
        if c.is_alphabetic() {
            has_alpha = true;
            if !c.is_uppercase() {
                return false;
            }
        }
    }
    has_alpha
}

/// A bare single-letter token, with or without a trailing period.
fn is_bare_initial(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    match chars.as_slice() {
        [c] => c.is_ascii_alphabetic(),
        [c, '.'] => c.is_ascii_alphabetic(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serialized(names: &[&str]) -> String {
        names
            .iter()
            .map(|n| format!("BEGIN:VCARD\nFN:{n}\nEND:VCARD\n"))
            .collect()
    }

    #[test]
    fn detects_inverted_pair_once() {
        let report = verify(&serialized(&["Jean Dupont", "Dupont Jean", "Anne Roy"]));
        assert_eq!(
            report.inverted_pairs,
            vec![("Dupont Jean".to_string(), "Jean Dupont".to_string())]
        );
    }

    #[test]
    fn palindromic_single_names_are_not_inverted_pairs() {
        let report = verify(&serialized(&["Sachs", "Anne Roy"]));
        assert!(report.inverted_pairs.is_empty());
    }

    #[test]
    fn detects_shared_two_word_prefix() {
        let report = verify(&serialized(&[
            "Jean Dupont",
            "Jean Dupont Martin",
            "Anne Roy",
        ]));
        assert_eq!(report.shared_prefix_groups.len(), 1);
        assert_eq!(report.shared_prefix_groups[0].len(), 2);
    }

    #[test]
    fn flags_allcaps_words_but_not_dotted_initials() {
        let report = verify(&serialized(&["DUPONT Jean", "Dupont R.", "Anne Roy"]));
        let flagged: Vec<_> = report.suspicious.iter().map(|s| s.full_name.as_str()).collect();
        assert!(flagged.contains(&"DUPONT Jean"));
        // "R." is a single-letter flag, not ALLCAPS
        let r_dot = report
            .suspicious
            .iter()
            .find(|s| s.full_name == "Dupont R.")
            .unwrap();
        assert!(!r_dot.all_caps);
        assert!(r_dot.single_letter);
    }

    #[test]
    fn flags_single_word_names() {
        let report = verify(&serialized(&["Thubin"]));
        assert_eq!(report.suspicious.len(), 1);
        assert!(report.suspicious[0].single_word);
    }

    #[test]
    fn clean_output_produces_empty_report() {
        let report = verify(&serialized(&["Jean Dupont", "Anne Roy"]));
        assert!(report.is_empty());
        assert!(report.render_text().contains("No inverted FN pairs"));
    }

    #[test]
    fn extraction_honors_folding_and_escaping() {
        let mut card = Vcard::default();
        let long_name = format!("Jean {} Dupont", "de la Tour ".repeat(10).trim());
        card.full_name = Some(long_name.clone());
        let mut other = Vcard::default();
        other.full_name = Some("Dupont, Jean".into());
        let text = format!("{}{}", card.serialize(), other.serialize());
        // the first FN is long enough to be folded across lines
        assert!(text.lines().count() > text.matches("BEGIN:VCARD").count() * 4);
        assert_eq!(extract_full_names(&text), vec![long_name, "Dupont, Jean".to_string()]);
    }

    #[test]
    fn institute_mentions_are_flagged_with_their_source() {
        let make = |name: Option<&str>| Vcard {
            full_name: name.map(|n| n.to_string()),
            ..Default::default()
        };
        let cards = vec![
            make(Some("Jean Dupont")),
            make(Some("CIRED Secretariat")),
            make(Some("Anne cired Roy")),
            make(None),
        ];
        let sources = vec![
            "a.vcf".to_string(),
            "b.vcf".to_string(),
            "c.vcf".to_string(),
            "d.vcf".to_string(),
        ];
        let mentions = find_institute_mentions(&cards, &sources);
        assert_eq!(
            mentions,
            vec![
                ("CIRED Secretariat".to_string(), "b.vcf".to_string()),
                ("Anne cired Roy".to_string(), "c.vcf".to_string()),
            ]
        );

        let mut report = verify("");
        assert!(report.is_empty());
        report.institute_mentions = mentions;
        assert!(!report.is_empty());
        let text = report.render_text();
        assert!(text.contains("CIRED Secretariat  [source: b.vcf]"));
    }

    #[test]
    fn verifiers_do_not_mutate_input() {
        let text = serialized(&["Jean Dupont", "Dupont Jean"]);
        let before = text.clone();
        let _ = verify(&text);
        assert_eq!(text, before);
    }
}
