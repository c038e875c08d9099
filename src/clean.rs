//! Per-card cleaning filters
//!
//! Removes obsolete emails and dead URLs and tidies organization values,
//! card by card. A card is never dropped: if anything fails while cleaning,
//! the original card is emitted unchanged. URL liveness goes through the
//! [`UrlChecker`] seam so tests stub the network, and independent cards are
//! checked in parallel.

use std::time::Duration;

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use tracing::{info, warn};

use crate::orgs::dedup_organizations;
use crate::vcard::{ParsedCard, Vcard};

/// Options for the cleaning pass.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Email domain considered obsolete.
    pub filter_domain: String,
    /// Per-request timeout for URL checks, in seconds.
    pub timeout_secs: u64,
    /// Process only the first N cards (testing aid).
    pub limit: Option<usize>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            filter_domain: "centre-cired.fr".to_string(),
            timeout_secs: 3,
            limit: None,
        }
    }
}

/// Liveness oracle for URLs. Implementations must be callable from parallel
/// workers.
pub trait UrlChecker: Sync {
    fn is_unavailable(&self, url: &str) -> bool;
}

/// HTTP HEAD-based checker. 404, request errors and malformed URLs all count
/// as unavailable.
pub struct HttpUrlChecker {
    client: reqwest::blocking::Client,
}

impl HttpUrlChecker {
    pub fn new(timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("annuaire/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl UrlChecker for HttpUrlChecker {
    fn is_unavailable(&self, url: &str) -> bool {
        let url = url.trim_end_matches(['.', ',', ';']);
        match self.client.head(url).send() {
            Ok(resp) => {
                if resp.status() == reqwest::StatusCode::NOT_FOUND {
                    info!("URL {} returned 404", url);
                    true
                } else {
                    false
                }
            }
            Err(e) => {
                warn!("Error checking URL {}: {}", url, e);
                true
            }
        }
    }
}

/// Checker that treats every URL as live. Used with `--offline`.
pub struct OfflineChecker;

impl UrlChecker for OfflineChecker {
    fn is_unavailable(&self, _url: &str) -> bool {
        false
    }
}

/// True if the email value carries the obsolete domain, either directly or
/// inside a `mailto:` URL.
pub fn is_obsolete_email(value: &str, filter_domain: &str) -> bool {
    let pattern = format!(
        r"(@|mailto:[^\s@]*@){}",
        regex::escape(&filter_domain.to_lowercase())
    );
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(&value.to_lowercase()),
        Err(_) => false,
    }
}

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s;,'"<>]+"#).expect("valid regex"));

/// Extract all URLs embedded in a property value.
pub fn find_urls(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Clean one card in place: obsolete emails out, dead URL fields out,
/// organization values folded and deduplicated.
pub fn clean_card(card: &mut Vcard, opts: &CleanOptions, checker: &dyn UrlChecker) {
    let identifier = card.identifier();

    card.emails.retain(|email| {
        if is_obsolete_email(email, &opts.filter_domain) {
            info!("Removing obsolete email from '{}': {}", identifier, email);
            false
        } else {
            true
        }
    });

    // If any URL inside a field is dead, the whole field goes.
    card.urls.retain(|url_field| {
        let urls = find_urls(&url_field.value);
        if urls.is_empty() && !url_field.value.trim().is_empty() {
            warn!(
                "Invalid URL format in '{}': {}",
                identifier, url_field.value
            );
            return false;
        }
        for url in &urls {
            if checker.is_unavailable(url) {
                info!("Removing unavailable URL from '{}': {}", identifier, url);
                return false;
            }
        }
        true
    });

    card.organizations = dedup_organizations(&card.organizations);
}

/// Clean a sequence of parsed cards. Malformed cards pass through untouched;
/// well-formed cards are cleaned independently and in parallel. Output order
/// matches input order. `limit` truncates the batch first.
pub fn clean_cards(
    cards: Vec<ParsedCard>,
    opts: &CleanOptions,
    checker: &dyn UrlChecker,
) -> Vec<ParsedCard> {
    let batch: Vec<ParsedCard> = match opts.limit {
        Some(limit) => {
            info!("Processing limited to first {} cards", limit);
            cards.into_iter().take(limit).collect()
        }
        None => cards,
    };

    batch
        .into_par_iter()
        .map(|parsed| match parsed {
            ParsedCard::Card(mut card) => {
                clean_card(&mut card, opts, checker);
                ParsedCard::Card(card)
            }
            malformed @ ParsedCard::Malformed(_) => malformed,
        })
        .collect()
}
