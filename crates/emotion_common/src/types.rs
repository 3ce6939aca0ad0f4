//! Wire and domain types shared by emotiond and emotionctl.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Explanation attached to the Neutral default when model output is unusable
pub const FALLBACK_EXPLANATION: &str = "Unable to parse AI response reliably; defaulting to Neutral.";

/// Input channel the user captured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputMode {
    Text,
    Voice,
    Webcam,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Text => "TEXT",
            InputMode::Voice => "VOICE",
            InputMode::Webcam => "WEBCAM",
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Emotion labels the model is instructed to choose from.
///
/// The normalizer does not enforce this set; `AnalysisResult::emotion` stays
/// a free string. Clients use it to pick a style when the model's `color`
/// token is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Surprise,
    Fear,
    Disgust,
    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Surprise,
        Emotion::Fear,
        Emotion::Disgust,
        Emotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Joy => "Joy",
            Emotion::Sadness => "Sadness",
            Emotion::Anger => "Anger",
            Emotion::Surprise => "Surprise",
            Emotion::Fear => "Fear",
            Emotion::Disgust => "Disgust",
            Emotion::Neutral => "Neutral",
        }
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Emotion::ALL
            .iter()
            .copied()
            .find(|e| e.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown emotion: {}", s))
    }
}

/// Emotion classification returned to callers.
///
/// Unknown fields in model output (for example a nested `meta` object) are
/// accepted on deserialization and dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub emotion: String,
    pub confidence: f64,
    pub explanation: String,
    pub emoji: String,
    pub color: String,
}

impl AnalysisResult {
    /// The fixed Neutral result used when model output cannot be recovered
    pub fn fallback() -> Self {
        Self {
            emotion: Emotion::Neutral.as_str().to_string(),
            confidence: 0.0,
            explanation: FALLBACK_EXPLANATION.to_string(),
            emoji: "😐".to_string(),
            color: "gray-400".to_string(),
        }
    }

    pub fn known_emotion(&self) -> Option<Emotion> {
        self.emotion.parse().ok()
    }

    /// Confidence as a whole percentage, clamped to 0..=100 for display
    pub fn confidence_percent(&self) -> u8 {
        if !self.confidence.is_finite() {
            return 0;
        }
        (self.confidence * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// Leading palette token of `color`, e.g. "yellow" for "yellow-400"
    pub fn base_color(&self) -> &str {
        self.color.split('-').next().unwrap_or("").trim()
    }
}

/// Body of `POST /v1/analyze-emotion`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub mode: InputMode,
    pub input: String,
}

/// Error body returned with every non-200 analyze response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Response of `GET /v1/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub model: String,
}
