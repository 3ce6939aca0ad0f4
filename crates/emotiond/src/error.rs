//! Error types for the analyze endpoint.
//!
//! Unparseable model output is deliberately absent: the normalizer always
//! produces a result, so only transport, upstream and local failures reach
//! the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use emotion_common::ErrorBody;
use thiserror::Error;

pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
pub const PAYMENT_REQUIRED_MESSAGE: &str = "Payment required. Please add credits to continue.";

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("{0} is not configured")]
    MissingCredential(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{}", RATE_LIMITED_MESSAGE)]
    RateLimited,

    #[error("{}", PAYMENT_REQUIRED_MESSAGE)]
    PaymentRequired,

    #[error("AI gateway error: {status}")]
    Upstream { status: u16 },

    #[error("AI gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("AI gateway returned invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AnalyzeError {
    pub fn status(&self) -> StatusCode {
        match self {
            AnalyzeError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AnalyzeError::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metric label
    pub fn outcome(&self) -> &'static str {
        match self {
            AnalyzeError::MissingCredential(_) => "config_error",
            AnalyzeError::InvalidRequest(_) => "invalid_request",
            AnalyzeError::RateLimited => "rate_limited",
            AnalyzeError::PaymentRequired => "payment_required",
            AnalyzeError::Upstream { .. } | AnalyzeError::Decode(_) => "upstream_error",
            AnalyzeError::Transport(_) => "transport_error",
        }
    }
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AnalyzeError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(AnalyzeError::PaymentRequired.status(), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(
            AnalyzeError::Upstream { status: 503 }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AnalyzeError::MissingCredential("KEY".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            AnalyzeError::MissingCredential("EMOTION_GATEWAY_API_KEY".into()).to_string(),
            "EMOTION_GATEWAY_API_KEY is not configured"
        );
        assert_eq!(
            AnalyzeError::Upstream { status: 500 }.to_string(),
            "AI gateway error: 500"
        );
        assert_eq!(AnalyzeError::RateLimited.to_string(), RATE_LIMITED_MESSAGE);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(AnalyzeError::RateLimited.outcome(), "rate_limited");
        assert_eq!(AnalyzeError::InvalidRequest("x".into()).outcome(), "invalid_request");
        assert_eq!(AnalyzeError::Upstream { status: 418 }.outcome(), "upstream_error");
    }
}
