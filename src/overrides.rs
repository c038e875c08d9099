//! Hand-curated override tables for known-hard name cases
//!
//! Three flat, exact-match tables consulted during ingestion and grouping:
//!
//! 1. full-name substitution: raw FN → corrected display FN (ingestion)
//! 2. normalized-key override: raw FN → literal string that is itself run
//!    through the normalizer to produce the group key (grouping)
//! 3. structured-name substitution: corrected FN → explicit N components
//!    (ingestion), for particles and multi-word family names the automatic
//!    split gets wrong
//!
//! No fuzzy matching; misses fall through silently to the default algorithm.
//! The tables are built once and passed explicitly into the pipeline so tests
//! can substitute fixtures.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::normalize_name;
use crate::vcard::StructuredName;

/// Raw observed FN → corrected canonical FN.
/// For initialized given names only the base form is listed (no dot); the
/// dotted variant is derived at table construction.
const FULL_NAME_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("Annick De Barros", "Annick Osthoff Ferreira de Barros"),
    ("Barbier Bruno", "Bruno Barbier"),
    ("Boemare Catherine Agnès", "Catherine Boemare"),
    ("Ben-Ari Tamara", "Tamara Ben-Ari"),
    ("Cassen C", "Christophe Cassen"),
    ("Cointe Béatrice", "Béatrice Cointe"),
    ("Combet E", "Emmanuel Combet"),
    ("Comte Adrien", "Adrien Comte"),
    ("Espagne Etienne", "Étienne Espagne"),
    ("Etchart-vincent Nathalie", "Nathalie Etchart-Vincent"),
    ("Finon D", "Dominique Finon"),
    ("Genovese E", "Elisabetta Genovese"),
    ("Godard Olivier", "Olivier Godard"),
    ("Grazi F", "Fabio Grazi"),
    ("Gasser T", "Thomas Gasser"),
    ("Gusdorf François", "François Gusdorf"),
    ("Hallegatte Stéphane", "Stéphane Hallegatte"),
    ("Hourcade Jc", "Jean-Charles Hourcade"),
    ("Hourcade J-C", "Jean-Charles Hourcade"),
    ("HC Meriem", "Meriem Hamdi-Cherif"),
    ("Hamdi-Cherif Meriem", "Meriem Hamdi-Cherif"),
    ("Hamdi-Cherif M", "Meriem Hamdi-Cherif"),
    ("Ha-Duong Minh", "Minh Ha-Duong"),
    ("Levrel H", "Harold Levrel"),
    ("Louis-Gaetan Marc Giraudet", "Louis-Gaëtan Giraudet"),
    ("Marta Benito", "Marta Benito Garzon"),
    ("Monjon S", "Stéphanie Monjon"),
    ("Nguyen Hoai Son", "Hoai Son Nguyen"),
    ("Nguyen Nhan Than", "Nhan Than Nguyen"),
    ("Nguyen Trinh Hoang Anh", "Hoang Anh Nguyen Trinh"),
    ("Trinh Nguyen Hoang Anh", "Hoang Anh Nguyen Trinh"),
    ("Trinh Hoang Anh Nguyen", "Hoang Anh Nguyen Trinh"),
    ("Hoang Anh Trinh Nguyen", "Hoang Anh Nguyen Trinh"),
    ("Labussiere Olivier", "Olivier Labussiere"),
    ("Vallet A", "Ameline Vallet"),
    ("DE LAURETIS Simona", "Simona De Lauretis"),
    ("EOIN O Broin", "Eoin Ó Broin"),
    ("Ó Broin Eoin", "Eoin Ó Broin"),
    ("Thubin", "Camille Thubin"),
    ("Calas", "Guillaume Calas"),
    ("FERREIRA da CUNHA Roberto", "Roberto Ferreira da Cunha"),
    ("Vogt-Schilb Adrien", "Adrien Vogt-Schilb"),
    (
        "Marcos Aurélio Vasconcelos Freitas",
        "Marcos Aurélio Vasconcelos de Freitas",
    ),
    (
        "Marcos Aurelio Vasconcelos De Freitas",
        "Marcos Aurélio Vasconcelos de Freitas",
    ),
];

/// Raw FN → literal string passed through the normalizer to form the group
/// key. Used when the standard algorithm cannot unify two known variants
/// (hyphenated middle names, doubled forenames, etc.).
const NORMALIZED_KEY_OVERRIDES: &[(&str, &str)] = &[
    ("Waisman H.", "waisman henri"),
    ("Waisman H", "waisman henri"),
    ("Henri-David Waisman", "waisman henri"),
    ("Waisman Henri-David", "waisman henri"),
    ("Waisman Henri David", "waisman henri"),
    ("Olivier Pierre Sassi", "sassi olivier"),
    ("Pierre Olivier Sassi", "sassi olivier"),
    ("Sassi Olivier", "sassi olivier"),
    ("Hourcade J.C", "hourcade jean charles"),
    ("Hourcade J.C.", "hourcade jean charles"),
    ("Hourcade Jean-Charles", "hourcade jean charles"),
    ("Hourcade Jean Charles", "hourcade jean charles"),
    ("Louis-Gaëtan Giraudet", "giraudet louis gaetan"),
    ("Louis-Gaetan Giraudet", "giraudet louis gaetan"),
    ("Louis Gaetan Giraudet", "giraudet louis gaetan"),
    ("Louis Gaetan Marc Giraudet", "giraudet louis gaetan"),
    ("Franck Lecocq", "lecocq franck"),
    ("Franck Michel Lecocq", "lecocq franck"),
    ("Fisch-Romito Vivien", "vivien fisch romito"),
    ("Vivien Fisch-Romito", "vivien fisch romito"),
];

/// Corrected FN → explicit five-part N value.
const STRUCTURED_NAME_SUBSTITUTIONS: &[(&str, [&str; 5])] = &[
    ("Hoang Anh Nguyen Trinh", ["Nguyen Trinh", "Hoang Anh", "", "", ""]),
    ("Adrien Comte", ["Comte", "Adrien", "", "", ""]),
    ("Adrien Vogt-Schilb", ["Vogt-Schilb", "Adrien", "", "", ""]),
    ("Tamara Ben-Ari", ["Ben-Ari", "Tamara", "", "", ""]),
    (
        "Marcos Aurélio Vasconcelos De Freitas",
        ["Freitas", "Marcos", "Aurélio Vasconcelos de", "", ""],
    ),
    (
        "Annick Osthoff Ferreira de Barros",
        ["Barros", "Annick", "Osthoff Ferreira de", "", ""],
    ),
    ("Roberto Ferreira da Cunha", ["Cunha", "Roberto", "Ferreira da", "", ""]),
];

static INITIALED_FORM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.+ [A-Z]$").expect("valid regex"));

static CURATED: Lazy<OverrideTables> = Lazy::new(|| {
    OverrideTables::new(
        FULL_NAME_SUBSTITUTIONS,
        NORMALIZED_KEY_OVERRIDES,
        STRUCTURED_NAME_SUBSTITUTIONS,
    )
});

/// The three override tables, constructed once and injected into the
/// ingestion and grouping stages.
#[derive(Debug, Clone, Default)]
pub struct OverrideTables {
    full_name: HashMap<String, String>,
    normalized_key: HashMap<String, String>,
    structured_name: HashMap<String, StructuredName>,
}

impl OverrideTables {
    pub fn new(
        full_name_entries: &[(&str, &str)],
        key_entries: &[(&str, &str)],
        name_entries: &[(&str, [&str; 5])],
    ) -> Self {
        let mut full_name = HashMap::new();
        for (raw, corrected) in full_name_entries {
            full_name.insert(raw.to_string(), corrected.to_string());
            // "Smith A" also matches "Smith A." without duplicating entries
            if INITIALED_FORM.is_match(raw) {
                full_name.insert(format!("{raw}."), corrected.to_string());
            }
        }
        let normalized_key = key_entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let structured_name = name_entries
            .iter()
            .map(|&(k, [family, given, additional, prefix, suffix])| {
                (
                    k.to_string(),
                    StructuredName::new(family, given, additional, prefix, suffix),
                )
            })
            .collect();
        Self {
            full_name,
            normalized_key,
            structured_name,
        }
    }

    /// The hand-maintained production tables.
    pub fn curated() -> &'static OverrideTables {
        &CURATED
    }

    /// Corrected display form for a raw FN, if whitelisted.
    pub fn expand_full_name(&self, raw: &str) -> Option<&str> {
        self.full_name.get(raw).map(|s| s.as_str())
    }

    /// Group key for a whitelisted FN. The raw string is tried exact, then
    /// trimmed, then whitespace-collapsed; the table value is itself passed
    /// through the normalizer.
    pub fn normalized_key(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim().to_string();
        let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
        for candidate in [raw.to_string(), trimmed, collapsed] {
            if let Some(target) = self.normalized_key.get(&candidate) {
                return Some(normalize_name(target));
            }
        }
        None
    }

    /// Explicit N components for a (possibly already corrected) FN.
    pub fn structured_name(&self, full_name: &str) -> Option<&StructuredName> {
        self.structured_name.get(full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> OverrideTables {
        OverrideTables::new(
            &[("Cassen C", "Christophe Cassen"), ("Thubin", "Camille Thubin")],
            &[("Henri-David Waisman", "waisman henri")],
            &[("Adrien Comte", ["Comte", "Adrien", "", "", ""])],
        )
    }

    #[test]
    fn full_name_substitution_matches_exact_raw() {
        let tables = fixture();
        assert_eq!(tables.expand_full_name("Cassen C"), Some("Christophe Cassen"));
        assert_eq!(tables.expand_full_name("Cassen X"), None);
    }

    #[test]
    fn trailing_dot_variant_is_derived_for_initialed_entries() {
        let tables = fixture();
        assert_eq!(tables.expand_full_name("Cassen C."), Some("Christophe Cassen"));
        // single-word entries get no dotted variant
        assert_eq!(tables.expand_full_name("Thubin."), None);
    }

    #[test]
    fn normalized_key_override_is_renormalized() {
        let tables = fixture();
        assert_eq!(
            tables.normalized_key("Henri-David Waisman").as_deref(),
            Some("henri w")
        );
    }

    #[test]
    fn normalized_key_tries_trimmed_and_collapsed_forms() {
        let tables = fixture();
        assert!(tables.normalized_key("  Henri-David Waisman  ").is_some());
        assert!(tables.normalized_key("Henri-David   Waisman").is_some());
        assert!(tables.normalized_key("Someone Else").is_none());
    }

    #[test]
    fn structured_name_substitution() {
        let tables = fixture();
        let n = tables.structured_name("Adrien Comte").unwrap();
        assert_eq!(n.family, "Comte");
        assert_eq!(n.given, "Adrien");
    }

    #[test]
    fn curated_tables_resolve_known_hard_cases() {
        let tables = OverrideTables::curated();
        assert_eq!(tables.expand_full_name("Ha-Duong Minh"), Some("Minh Ha-Duong"));
        assert_eq!(tables.expand_full_name("Cassen C."), Some("Christophe Cassen"));
        assert_eq!(
            tables.normalized_key("Hourcade J.C."),
            tables.normalized_key("Hourcade Jean-Charles")
        );
    }
}
