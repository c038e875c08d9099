//! vCard 4.0 data model and transport
//!
//! Minimal reader/writer tuned to the directory's field set. Every optional
//! card field is an explicit `Option`/`Vec` on [`Vcard`]; callers test
//! presence on the field, never on dynamic property existence. Properties the
//! pipeline does not understand are carried verbatim in `extra` so that a
//! parse → serialize round trip loses nothing.
//!
//! A component that fails framing (a `BEGIN:VCARD` without its matching
//! `END:VCARD`, or loose non-card text) becomes [`ParsedCard::Malformed`] and
//! is propagated unchanged through transform pipelines.

use std::collections::BTreeSet;

/// The five components of the vCard `N` property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredName {
    pub family: String,
    pub given: String,
    pub additional: String,
    pub prefix: String,
    pub suffix: String,
}

impl StructuredName {
    pub fn new(family: &str, given: &str, additional: &str, prefix: &str, suffix: &str) -> Self {
        Self {
            family: family.to_string(),
            given: given.to_string(),
            additional: additional.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }
}

/// A `URL` property value together with its `TYPE` parameter values.
///
/// Types are uppercased and kept as a set: `URL;TYPE=hal,home:` and
/// `URL;TYPE=HOME,HAL:` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TypedUrl {
    pub value: String,
    pub types: BTreeSet<String>,
}

impl TypedUrl {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            types: BTreeSet::new(),
        }
    }

    pub fn with_types(value: &str, types: &[&str]) -> Self {
        Self {
            value: value.to_string(),
            types: types.iter().map(|t| t.to_uppercase()).collect(),
        }
    }
}

/// One parsed contact card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vcard {
    pub full_name: Option<String>,
    pub name: Option<StructuredName>,
    pub organizations: Vec<String>,
    pub emails: Vec<String>,
    pub tels: Vec<String>,
    pub urls: Vec<TypedUrl>,
    pub notes: Vec<String>,
    /// Vendor extension `X-CIRED-HISTORY`: provenance free text.
    pub history: Vec<String>,
    pub sources: Vec<String>,
    /// Export timestamp. Excluded from any equality used in tests.
    pub rev: Option<String>,
    /// Unrecognized properties, kept as raw unfolded lines.
    pub extra: Vec<String>,
}

impl Vcard {
    /// True if the card has at least one non-empty email address.
    pub fn has_email(&self) -> bool {
        self.emails.iter().any(|e| !e.trim().is_empty())
    }

    /// Human-readable identifier for log messages: FN, else first email,
    /// else first organization.
    pub fn identifier(&self) -> String {
        if let Some(fn_value) = &self.full_name {
            return fn_value.clone();
        }
        if let Some(email) = self.emails.first() {
            return email.clone();
        }
        if let Some(org) = self.organizations.first() {
            return org.clone();
        }
        "Unknown contact".to_string()
    }

    /// Serialize to vCard 4.0 text, one property per folded line.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        push_line(&mut out, "BEGIN:VCARD");
        push_line(&mut out, "VERSION:4.0");
        if let Some(fn_value) = &self.full_name {
            push_line(&mut out, &format!("FN:{}", escape_text(fn_value)));
        }
        if let Some(n) = &self.name {
            let parts = [&n.family, &n.given, &n.additional, &n.prefix, &n.suffix]
                .map(|p| escape_component(p));
            push_line(&mut out, &format!("N:{}", parts.join(";")));
        }
        for org in &self.organizations {
            push_line(&mut out, &format!("ORG:{}", escape_text(org)));
        }
        for email in &self.emails {
            push_line(&mut out, &format!("EMAIL:{}", escape_text(email)));
        }
        for tel in &self.tels {
            push_line(&mut out, &format!("TEL:{}", escape_text(tel)));
        }
        for url in &self.urls {
            if url.types.is_empty() {
                push_line(&mut out, &format!("URL:{}", escape_text(&url.value)));
            } else {
                let types: Vec<&str> = url.types.iter().map(|t| t.as_str()).collect();
                push_line(
                    &mut out,
                    &format!("URL;TYPE={}:{}", types.join(","), escape_text(&url.value)),
                );
            }
        }
        for source in &self.sources {
            push_line(&mut out, &format!("SOURCE:{}", escape_text(source)));
        }
        for note in &self.notes {
            push_line(&mut out, &format!("NOTE:{}", escape_text(note)));
        }
        for hist in &self.history {
            push_line(&mut out, &format!("X-CIRED-HISTORY:{}", escape_text(hist)));
        }
        for raw in &self.extra {
            push_line(&mut out, raw);
        }
        if let Some(rev) = &self.rev {
            push_line(&mut out, &format!("REV:{}", rev));
        }
        push_line(&mut out, "END:VCARD");
        out
    }
}

/// A card as read from input: either parsed or carried as raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCard {
    Card(Vcard),
    Malformed(String),
}

impl ParsedCard {
    pub fn serialize(&self) -> String {
        match self {
            ParsedCard::Card(card) => card.serialize(),
            ParsedCard::Malformed(raw) => {
                let mut text = raw.trim_end_matches('\n').to_string();
                text.push('\n');
                text
            }
        }
    }

    pub fn as_card(&self) -> Option<&Vcard> {
        match self {
            ParsedCard::Card(card) => Some(card),
            ParsedCard::Malformed(_) => None,
        }
    }
}

/// Parse a text stream into a sequence of cards.
///
/// Framing: each `BEGIN:VCARD`..`END:VCARD` block is one card. A block whose
/// `END:VCARD` is missing (EOF or a new `BEGIN` first), and any non-blank
/// text outside card framing, yields a `Malformed` entry instead of being
/// dropped.
pub fn parse_components(input: &str) -> Vec<ParsedCard> {
    let lines = unfold_lines(input);
    let mut cards = Vec::new();
    let mut pending: Vec<String> = Vec::new(); // lines of an open card, BEGIN included
    let mut stray: Vec<String> = Vec::new(); // non-blank lines outside framing

    let mut flush_stray = |stray: &mut Vec<String>, cards: &mut Vec<ParsedCard>| {
        if !stray.is_empty() {
            cards.push(ParsedCard::Malformed(stray.join("\n")));
            stray.clear();
        }
    };

    for line in lines {
        let upper = line.trim().to_uppercase();
        if upper == "BEGIN:VCARD" {
            if !pending.is_empty() {
                // previous card never closed
                cards.push(ParsedCard::Malformed(pending.join("\n")));
                pending.clear();
            }
            flush_stray(&mut stray, &mut cards);
            pending.push(line);
        } else if upper == "END:VCARD" {
            if pending.is_empty() {
                stray.push(line);
            } else {
                cards.push(ParsedCard::Card(parse_card_lines(&pending[1..])));
                pending.clear();
            }
        } else if !pending.is_empty() {
            pending.push(line);
        } else if !line.trim().is_empty() {
            stray.push(line);
        } else {
            flush_stray(&mut stray, &mut cards);
        }
    }
    if !pending.is_empty() {
        cards.push(ParsedCard::Malformed(pending.join("\n")));
    }
    flush_stray(&mut stray, &mut cards);
    cards
}

/// Parse the property lines between BEGIN and END into a [`Vcard`].
fn parse_card_lines(lines: &[String]) -> Vcard {
    let mut card = Vcard::default();
    for line in lines {
        let Some(colon) = find_unescaped(line, ':') else {
            // not a property line; keep it so nothing is lost
            if !line.trim().is_empty() {
                card.extra.push(line.clone());
            }
            continue;
        };
        let (head, raw_value) = (&line[..colon], &line[colon + 1..]);
        let mut head_parts = head.split(';');
        let prop = head_parts.next().unwrap_or("").trim().to_uppercase();
        let params: Vec<&str> = head_parts.collect();

        match prop.as_str() {
            "VERSION" => {}
            "FN" => card.full_name = Some(unescape_text(raw_value)),
            "N" => card.name = Some(parse_structured_name(raw_value)),
            "ORG" => card.organizations.push(unescape_text(raw_value)),
            "EMAIL" => card.emails.push(unescape_text(raw_value)),
            "TEL" => card.tels.push(unescape_text(raw_value)),
            "URL" => {
                let mut types = BTreeSet::new();
                for param in &params {
                    // parameter names are case-insensitive (RFC 6350 §5)
                    let Some((name, values)) = param.trim().split_once('=') else {
                        continue;
                    };
                    if !name.trim().eq_ignore_ascii_case("TYPE") {
                        continue;
                    }
                    for v in values.split(',') {
                        let v = v.trim().trim_matches('"');
                        if !v.is_empty() {
                            types.insert(v.to_uppercase());
                        }
                    }
                }
                card.urls.push(TypedUrl {
                    value: unescape_text(raw_value),
                    types,
                });
            }
            "SOURCE" => card.sources.push(unescape_text(raw_value)),
            "NOTE" => card.notes.push(unescape_text(raw_value)),
            "X-CIRED-HISTORY" => card.history.push(unescape_text(raw_value)),
            "REV" => card.rev = Some(raw_value.trim().to_string()),
            _ => card.extra.push(line.clone()),
        }
    }
    card
}

fn parse_structured_name(value: &str) -> StructuredName {
    let mut parts = split_unescaped(value, ';')
        .into_iter()
        .map(|p| unescape_text(&p));
    StructuredName {
        family: parts.next().unwrap_or_default(),
        given: parts.next().unwrap_or_default(),
        additional: parts.next().unwrap_or_default(),
        prefix: parts.next().unwrap_or_default(),
        suffix: parts.next().unwrap_or_default(),
    }
}

/// Unfold continuation lines: a line starting with space or tab continues the
/// previous line (RFC 6350 §3.2). Handles both `\n` and `\r\n` endings.
fn unfold_lines(input: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in input.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if (line.starts_with(' ') || line.starts_with('\t')) && !out.is_empty() {
            let last = out.last_mut().unwrap();
            last.push_str(&line[1..]);
        } else {
            out.push(line.to_string());
        }
    }
    out
}

/// Fold a property line at 75 characters and append it with a `\n` ending.
fn push_line(out: &mut String, line: &str) {
    const WIDTH: usize = 75;
    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= WIDTH {
        out.push_str(line);
        out.push('\n');
        return;
    }
    let mut start = 0;
    let mut first = true;
    while start < chars.len() {
        let width = if first { WIDTH } else { WIDTH - 1 };
        let end = (start + width).min(chars.len());
        if !first {
            out.push(' ');
        }
        out.extend(&chars[start..end]);
        out.push('\n');
        start = end;
        first = false;
    }
}

fn find_unescaped(s: &str, target: char) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == target {
            return Some(i);
        }
    }
    None
}

fn split_unescaped(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for c in s.chars() {
        if escaped {
            current.push('\\');
            current.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == sep {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    if escaped {
        current.push('\\');
    }
    parts.push(current);
    parts
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Same escaping as text values; `;` additionally separates N components so
/// components are escaped before joining.
fn escape_component(s: &str) -> String {
    escape_text(s)
}

fn unescape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
