//! Response normalizer.
//!
//! Recovers an `AnalysisResult` from whatever text the model returned. The
//! model is asked for a bare JSON object but often wraps it in markdown
//! fences, surrounds it with prose, or leaves stray backticks behind.
//! Extraction gets looser step by step:
//!
//! 1. parse the raw text as-is
//! 2. parse a candidate cut out of the text (fence body, balanced braces,
//!    greedy braces, or the de-fenced text)
//! 3. parse the candidate again with every backtick removed
//! 4. give up and return `AnalysisResult::fallback()`
//!
//! None of these steps can fail towards the caller.

use crate::types::AnalysisResult;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Maximum characters of model text quoted in the fallback warning
pub const LOG_SAMPLE_CHARS: usize = 120;

/// First `{` through last `}`, used when brace depth never returns to zero
static GREEDY_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("greedy object pattern is valid"));

/// Step that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseStage {
    Direct,
    Extracted,
    Cleaned,
    Fallback,
}

impl ParseStage {
    /// Metric label
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseStage::Direct => "direct",
            ParseStage::Extracted => "extracted",
            ParseStage::Cleaned => "cleaned",
            ParseStage::Fallback => "fallback",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ParseStage::Fallback)
    }
}

/// A normalized result together with the step that recovered it
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub result: AnalysisResult,
    pub stage: ParseStage,
}

/// Turn raw model text into an `AnalysisResult`. Never fails.
pub fn normalize(raw: &str) -> AnalysisResult {
    normalize_with_stage(raw).result
}

/// Same as [`normalize`], also reporting which step succeeded.
pub fn normalize_with_stage(raw: &str) -> Normalized {
    if let Some(result) = parse_result(raw) {
        return Normalized {
            result,
            stage: ParseStage::Direct,
        };
    }

    let candidate = extract_json_candidate(raw);
    if let Some(result) = parse_result(&candidate) {
        debug!("Recovered analysis from extracted candidate");
        return Normalized {
            result,
            stage: ParseStage::Extracted,
        };
    }

    let cleaned: String = candidate.chars().filter(|c| *c != '`').collect();
    if let Some(result) = parse_result(cleaned.trim()) {
        debug!("Recovered analysis after backtick cleanup");
        return Normalized {
            result,
            stage: ParseStage::Cleaned,
        };
    }

    warn!(
        content_len = raw.len(),
        content_sample = %log_sample(raw, LOG_SAMPLE_CHARS),
        "Falling back to Neutral: model output is not a parseable analysis"
    );
    Normalized {
        result: AnalysisResult::fallback(),
        stage: ParseStage::Fallback,
    }
}

/// Only JSON objects count; serde would also accept a five-element array.
fn parse_result(text: &str) -> Option<AnalysisResult> {
    if !text.trim_start().starts_with('{') {
        return None;
    }
    serde_json::from_str(text).ok()
}

/// Cut the most likely JSON object out of free-form model text.
///
/// Fenced blocks win over brace matching; brace matching wins over the
/// greedy first-to-last brace span. When the text has no braces at all the
/// de-fenced text itself is returned.
pub fn extract_json_candidate(raw: &str) -> Cow<'_, str> {
    let text = raw.trim();

    if let Some(body) = strip_code_fence(text) {
        return Cow::Borrowed(body);
    }
    if let Some(object) = balanced_object(text) {
        return Cow::Borrowed(object);
    }
    if let Some(found) = GREEDY_OBJECT.find(text) {
        return Cow::Borrowed(found.as_str());
    }
    Cow::Owned(text.replace("```", "").trim().to_string())
}

/// Body of a markdown code fence, if `text` opens with one.
///
/// The opening fence is a run of three or more backticks followed by an
/// info line (`json`, `JSON`, nothing, ...). The body ends at the last
/// line that starts with a backtick fence, or at trailing backticks for
/// single-line fences. Fence lines left mid-body stay in and are removed by
/// the backtick cleanup step.
fn strip_code_fence(text: &str) -> Option<&str> {
    let fence_len = text.bytes().take_while(|b| *b == b'`').count();
    if fence_len < 3 {
        return None;
    }

    let after_open = &text[fence_len..];
    let body = match after_open.find('\n') {
        Some(newline) if !after_open[..newline].contains('{') => &after_open[newline + 1..],
        _ => strip_json_tag(after_open),
    };

    let body = match closing_fence_offset(body) {
        Some(end) => &body[..end],
        None => body.trim_end().trim_end_matches('`'),
    };
    Some(body.trim())
}

fn strip_json_tag(text: &str) -> &str {
    let trimmed = text.trim_start();
    match trimmed.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &trimmed[4..],
        _ => trimmed,
    }
}

fn closing_fence_offset(body: &str) -> Option<usize> {
    let mut offset = 0;
    let mut closing = None;
    for line in body.split_inclusive('\n') {
        if line.trim_start().starts_with("```") {
            closing = Some(offset);
        }
        offset += line.len();
    }
    closing
}

/// Substring from the first `{` to the `}` that brings depth back to zero.
///
/// Braces inside JSON string literals are skipped so an explanation like
/// `"uses {curly} words"` does not end the object early.
fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if *byte == b'\\' {
                escaped = true;
            } else if *byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// At most `max_chars` characters of `text`, for log lines
pub fn log_sample(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let sample: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", sample)
    } else {
        sample
    }
}
