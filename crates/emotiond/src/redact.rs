//! Redaction of upstream text before it reaches the logs.
//!
//! Gateway error bodies can echo back the request, which carries the bearer
//! credential and whole base64 media payloads.

use emotion_common::normalize::log_sample;
use regex::Regex;
use std::sync::LazyLock;

/// Maximum characters of upstream error body kept in a log line
pub const MAX_LOGGED_BODY_CHARS: usize = 300;

static REDACTION_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        // Data URL payloads
        (
            Regex::new(r"data:([a-zA-Z0-9.+/-]+)[^,\s]*;base64,[A-Za-z0-9+/=]+")
                .expect("data url pattern is valid"),
            "data:$1;base64,[REDACTED: media]",
        ),
        // Bearer tokens
        (
            Regex::new(r"(?i)bearer\s+[a-zA-Z0-9._-]{8,}").expect("bearer pattern is valid"),
            "Bearer [REDACTED]",
        ),
        // OpenAI-style secret keys
        (
            Regex::new(r"\bsk-[a-zA-Z0-9_-]{8,}").expect("secret key pattern is valid"),
            "[REDACTED: API key]",
        ),
        // Generic API keys
        (
            Regex::new(r#"(?i)(api_key|apikey|api-key)(["']?\s*[=:]\s*["']?)[a-zA-Z0-9_-]{8,}"#)
                .expect("api key pattern is valid"),
            "$1$2[REDACTED]",
        ),
    ]
});

/// Redact sensitive patterns from text
pub fn redact(text: &str) -> String {
    let mut result = text.to_string();

    for (pattern, replacement) in REDACTION_PATTERNS.iter() {
        result = pattern.replace_all(&result, *replacement).to_string();
    }

    result
}

/// Redacted and truncated form of an upstream body, ready to log
pub fn redact_for_log(text: &str) -> String {
    log_sample(&redact(text), MAX_LOGGED_BODY_CHARS)
}
