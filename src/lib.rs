//! annuaire: contact directory pipeline for alumni vCard sources
//!
//! Builds and maintains a deduplicated directory of people affiliated with a
//! research institute. Upstream scrapers deliver observations as vCard 4.0
//! files; this library merges them into one card per inferred real person,
//! cleans the merged set, and reports residual duplicates for manual
//! whitelist curation.
//!
//! The heart of the pipeline is identity resolution:
//!
//! 1. [`ingest`] reads every source and applies the curated
//!    [`OverrideTables`] (full-name and structured-name substitution).
//! 2. [`group_contacts`] partitions cards into equivalence classes keyed by
//!    [`normalize_name`] (accent-stripped surname + initials, tolerant of
//!    surname/given-name order).
//! 3. [`merge_group`] collapses each class into one card: deduplicated
//!    organizations/emails, type-aware URLs, and source-attributed notes and
//!    history.
//! 4. [`verify`] runs read-only detectors over the serialized output and
//!    flags suspected residual duplicates.

pub mod clean;
pub mod cli;
pub mod commands;
pub mod error;
pub mod group;
pub mod ingest;
pub mod merge;
pub mod normalize;
pub mod orgs;
pub mod overrides;
pub mod vcard;
pub mod verify;

// Re-export commonly used types
pub use cli::{Cli, Commands, OutputFormat};
pub use clean::{clean_cards, CleanOptions, HttpUrlChecker, OfflineChecker, UrlChecker};
pub use error::{AnnuaireError, Result};
pub use group::{group_contacts, ContactGroup, Unkeyable};
pub use ingest::ingest;
pub use merge::{merge_all, merge_group};
pub use normalize::{collation_key, normalize_name, strip_accents};
pub use orgs::{dedup_organizations, fold_org_value};
pub use overrides::OverrideTables;
pub use vcard::{parse_components, ParsedCard, StructuredName, TypedUrl, Vcard};
pub use verify::{find_institute_mentions, verify, SuspiciousName, VerifyReport};
