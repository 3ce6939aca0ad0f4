//! HTTP client for communicating with emotiond.

use anyhow::{anyhow, Result};
use emotion_common::{AnalysisResult, AnalyzeRequest, ErrorBody, HealthResponse, ANALYZE_PATH};
use reqwest::StatusCode;
use std::time::Duration;

/// Covers the daemon's own gateway timeout plus transfer of large clips
const REQUEST_TIMEOUT_SECS: u64 = 90;

/// Client for communicating with emotiond
pub struct EmotionClient {
    http: reqwest::Client,
    base_url: String,
}

impl EmotionClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one capture for analysis
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult> {
        let url = format!("{}{}", self.base_url, ANALYZE_PATH);
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(anyhow!("{}", error_message(status, &body)));
        }

        serde_json::from_str(&body)
            .map_err(|e| anyhow!("emotiond returned an unreadable result: {}", e))
    }

    /// Get daemon health
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/v1/health", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Health check failed: {}", status));
        }
        Ok(response.json().await?)
    }

    fn unreachable(&self, e: reqwest::Error) -> anyhow::Error {
        anyhow!(
            "Cannot reach emotiond at {}: {}\n\n\
             Start the daemon with:\n\
             emotiond\n\n\
             or point emotionctl elsewhere with --server or EMOTION_SERVER.",
            self.base_url,
            e
        )
    }
}

/// Message to show for a failed analyze call
pub fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) if !err.error.is_empty() => err.error,
        _ => format!("Request failed with status {}", status.as_u16()),
    }
}
