//! Field extraction from model replies.
//!
//! Replies follow the few-shot format:
//!
//! ```text
//! text: '<restored text>'
//! label: <digits>
//! noise: <1|0>
//! reason: <free text>
//! ```
//!
//! Each field is taken from the first match of its marker. A missing
//! marker yields the empty value of that field, never an error.

use crate::model::ParsedReply;
use regex::Regex;
use std::sync::LazyLock;

// Regex patterns (compiled once using LazyLock)
static RE_TEXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"text:\s'([^']*)'").unwrap());

static RE_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"label:\s([0-9]+)").unwrap());

static RE_NOISE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"noise:\s([10])").unwrap());

static RE_REASON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"reason:\s(.+)").unwrap());

/// Extracts the restored text, or an empty string.
pub fn extract_text(reply: &str) -> String {
    first_group(&RE_TEXT, reply).unwrap_or_default().to_string()
}

/// Extracts the label.
///
/// Digit runs that overflow `u32` are treated as absent.
pub fn extract_label(reply: &str) -> Option<u32> {
    let digits = first_group(&RE_LABEL, reply)?;
    match digits.parse() {
        Ok(label) => Some(label),
        Err(_) => {
            log::warn!("label out of range in reply: {}", digits);
            None
        }
    }
}

/// Extracts the noise flag.
pub fn extract_noise(reply: &str) -> Option<bool> {
    first_group(&RE_NOISE, reply).map(|flag| flag == "1")
}

/// Extracts the trimmed reason, or an empty string.
pub fn extract_reason(reply: &str) -> String {
    first_group(&RE_REASON, reply)
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

/// Extracts every field from a reply.
pub fn parse_reply(reply: &str) -> ParsedReply {
    ParsedReply {
        text: extract_text(reply),
        label: extract_label(reply),
        noise: extract_noise(reply),
        reason: extract_reason(reply),
    }
}

fn first_group<'a>(re: &Regex, haystack: &'a str) -> Option<&'a str> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
