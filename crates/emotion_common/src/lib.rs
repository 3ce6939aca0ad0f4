//! Shared types and the response normalizer for Emotion Lens components.

pub mod data_url;
pub mod error;
pub mod normalize;
pub mod types;

pub use error::EmotionError;
pub use normalize::{normalize, normalize_with_stage, Normalized, ParseStage};
pub use types::{
    AnalysisResult, AnalyzeRequest, Emotion, ErrorBody, HealthResponse, InputMode,
    FALLBACK_EXPLANATION,
};

/// Path of the analyze endpoint served by emotiond
pub const ANALYZE_PATH: &str = "/v1/analyze-emotion";

/// Default address emotiond binds to and emotionctl talks to
pub const DEFAULT_BIND: &str = "127.0.0.1:7870";
