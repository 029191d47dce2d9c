//! Tolerant parser for model answers in the `VERDICT:`/`CONFIDENCE:`
//! marker format.
//!
//! Models drift: markers get reordered, lowercased, or dropped
//! entirely. The parser therefore never fails; every input maps to a
//! [`ParsedVerdict`], falling back to `Unverified` with confidence 0.0
//! when nothing recognizable is found.


use crate::claim::{Verdict, clamp_score, round2, truncate_chars};
use crate::constants::MAX_SOURCES_MENTIONED;

/// Markers recognized in model output, upper-cased for matching.
const MARKERS: [&str; 4] = ["VERDICT:", "CONFIDENCE:", "EXPLANATION:", "SOURCES:"];

/// Keywords whose presence suggests the answer contradicts the claim.
const CONTRADICTION_KEYWORDS: [&str; 9] = [
    "false",
    "fake",
    "misleading",
    "debunked",
    "hoax",
    "fabricated",
    "unverified",
    "not true",
    "no evidence",
];

/// Structured reading of a raw model answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedVerdict {
    pub verdict: Verdict,
    /// Clamped to `[0.0, 1.0]`; 0.0 when the model reported none.
    pub confidence: f64,
    pub explanation: String,
    /// At most five sources, in the order the model mentioned them.
    pub sources: Vec<String>,
}

/// Parses a raw model answer. Markers are matched case-insensitively
/// and may appear in any order; a marker's value runs until the next
/// marker or end of input.
pub fn parse_model_answer(raw: &str) -> ParsedVerdict {
    let verdict_value = marker_value(raw, "VERDICT:");
    let verdict = match &verdict_value {
        Some(value) => classify_verdict(value),
        // No marker at all: classify the whole answer.
        None => classify_verdict(raw),
    };

    let confidence = marker_value(raw, "CONFIDENCE:")
        .and_then(|v| parse_leading_number(&v))
        .map(clamp_score)
        .unwrap_or(0.0);

    let explanation = marker_value(raw, "EXPLANATION:")
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| truncate_chars(raw.trim(), 500));

    let sources = marker_value(raw, "SOURCES:")
        .map(|v| split_sources(&v))
        .unwrap_or_default();

    ParsedVerdict {
        verdict,
        confidence: round2(confidence),
        explanation,
        sources,
    }
}

/// Maps free text onto a verdict. Checked in fixed priority so that
/// "FALSE. NOT ENOUGH EVIDENCE to be sure" still reads as unverified
/// and "TRUE that this is FALSE" reads as false.
fn classify_verdict(text: &str) -> Verdict {
    let upper = text.to_uppercase();
    if upper.contains("NOT ENOUGH EVIDENCE") {
        Verdict::Unverified
    } else if upper.contains("FALSE") {
        Verdict::False
    } else if upper.contains("TRUE") {
        Verdict::True
    } else if upper.contains("MISLEADING") {
        Verdict::Misleading
    } else {
        Verdict::Unverified
    }
}

/// Finds a marker case-insensitively and returns its trimmed value, up
/// to the next marker or end of input.
fn marker_value(raw: &str, marker: &str) -> Option<String> {
    let start = find_ascii_ci(raw, marker, 0)? + marker.len();

    let end = MARKERS
        .iter()
        .filter(|m| **m != marker)
        .filter_map(|m| find_ascii_ci(raw, m, start))
        .min()
        .unwrap_or(raw.len());

    Some(raw[start..end].trim().to_string())
}

/// ASCII-case-insensitive substring search from `from`. Returned offsets
/// sit on char boundaries because the markers are pure ASCII.
fn find_ascii_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < from + n.len() {
        return None;
    }
    (from..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

/// Pulls the first decimal number out of a marker value, tolerating
/// prose around it ("roughly 0.8 or so").
fn parse_leading_number(value: &str) -> Option<f64> {
    let token = value
        .split_whitespace()
        .find(|t| t.chars().next().is_some_and(|c| c.is_ascii_digit() || c == '.'))?;
    let trimmed: String = token
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    trimmed.parse().ok()
}

fn split_sources(value: &str) -> Vec<String> {
    value
        .split(['\n', ';'])
        .map(|s| s.trim().trim_start_matches(['-', '*', ' ']).trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .take(MAX_SOURCES_MENTIONED)
        .collect()
}

/// Scores how strongly the answer leans on contradiction vocabulary.
/// Each distinct keyword present contributes 0.2, capped at 1.0.
pub fn contradiction_score(raw: &str) -> f64 {
    let lower = raw.to_lowercase();
    let hits = CONTRADICTION_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .count();
    round2((hits as f64 / 5.0).min(1.0))
}
