//! Parsing of free-form model replies into a summary with pros and cons.
//!
//! The model is asked for a `SUMMARY:` / `PROS:` / `CONS:` layout but nothing
//! enforces it, so parsing is a best-effort heuristic that never fails. Any
//! section it cannot find is replaced with a placeholder.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const SUMMARY_NOT_AVAILABLE: &str = "Summary not available";
pub const PROS_NOT_AVAILABLE: &str = "Analysis of benefits not available";
pub const CONS_NOT_AVAILABLE: &str = "Analysis of drawbacks not available";

pub const FALLBACK_SUMMARY: &str = "Error processing the policy analysis";
pub const FALLBACK_PRO: &str = "Unable to analyze benefits";
pub const FALLBACK_CON: &str = "Unable to analyze drawbacks";

/// Items kept per list.
pub const MAX_ITEMS: usize = 3;

static SECTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i-u)SUMMARY:|PROS:|CONS:").unwrap());
static BOLD_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*[A-Za-z0-9_]+\*\*$").unwrap());
static ORDINAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.\s*").unwrap());
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-•*]\s*").unwrap());
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

/// A plain-language reading of a policy.
///
/// Strings may contain `<strong>` emphasis produced by [`clean_markdown`];
/// everything else in them is untrusted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplificationResult {
    pub summary: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

impl SimplificationResult {
    /// The fixed result used when analysis could not be performed.
    pub fn fallback() -> Self {
        Self {
            summary: FALLBACK_SUMMARY.to_string(),
            pros: vec![FALLBACK_PRO.to_string()],
            cons: vec![FALLBACK_CON.to_string()],
        }
    }
}

/// Parse a model reply.
///
/// The reply is split on the section markers (case-insensitive). Text before
/// the first marker is dropped, as is anything after a fourth section.
/// A missing summary marker yields an empty summary.
pub fn parse_response(reply: &str) -> SimplificationResult {
    let sections: Vec<&str> = SECTION_MARKER.split(reply).collect();

    let summary = match sections.get(1) {
        Some(fragment) => {
            let trimmed = fragment.trim();
            if trimmed.is_empty() {
                clean_markdown(SUMMARY_NOT_AVAILABLE)
            } else {
                clean_markdown(trimmed)
            }
        }
        None => String::new(),
    };

    let mut pros = sections
        .get(2)
        .map(|s| extract_list_items(s))
        .unwrap_or_default();
    let mut cons = sections
        .get(3)
        .map(|s| extract_list_items(s))
        .unwrap_or_default();

    if pros.is_empty() {
        pros.push(PROS_NOT_AVAILABLE.to_string());
    }
    if cons.is_empty() {
        cons.push(CONS_NOT_AVAILABLE.to_string());
    }

    SimplificationResult {
        summary,
        pros,
        cons,
    }
}

/// Turn a section body into at most [`MAX_ITEMS`] list entries.
///
/// Lines are trimmed and blank ones dropped. A line that is only a bold
/// heading such as `**Benefits**` is skipped. A leading `N.` ordinal and then
/// a leading `-`, `•` or `*` bullet are stripped. A line opening with `**`
/// keeps both asterisks so the emphasis survives. An item that was only an
/// ordinal is kept as an empty string.
pub fn extract_list_items(section: &str) -> Vec<String> {
    section
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !BOLD_HEADING.is_match(line))
        .map(|line| {
            let line = ORDINAL.replace(line, "");
            clean_markdown(strip_bullet(&line))
        })
        .take(MAX_ITEMS)
        .collect()
}

fn strip_bullet(line: &str) -> &str {
    if line.starts_with("**") {
        return line;
    }
    match BULLET.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Convert `**text**` into `<strong>text</strong>`. Matching is non-greedy
/// and does not cross line breaks.
pub fn clean_markdown(text: &str) -> String {
    BOLD.replace_all(text, "<strong>$1</strong>").into_owned()
}
