//! Request dispatcher for the AI gateway.
//!
//! Shapes one chat-completions request per analysis (system instruction plus
//! a single user turn, multi-part for media), sends it with the configured
//! bearer credential, and hands back the raw model text for normalization.
//! No retries: a failed call is reported once.

use crate::config::GatewayConfig;
use crate::error::AnalyzeError;
use crate::redact::redact_for_log;
use anyhow::Context;
use emotion_common::data_url::{DataUrl, MediaKind};
use emotion_common::InputMode;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

/// Instruction sent as the system message of every request
pub const SYSTEM_PROMPT: &str = r#"You are an expert emotion analyzer. Analyze the provided input and identify the dominant emotion.
Respond ONLY with a JSON object with these fields:
- emotion: One of: Joy, Sadness, Anger, Surprise, Fear, Disgust, or Neutral
- confidence: Float between 0.0 and 1.0
- explanation: Brief explanation (1-2 sentences)
- emoji: Single emoji representing the emotion
- color: Tailwind CSS color name (e.g., "yellow-400", "blue-500", "red-500").
Do not include markdown code fences or any text outside the JSON object."#;

pub const WEBCAM_PROMPT: &str = "Analyze the emotion shown in this facial expression:";
pub const VOICE_PROMPT: &str =
    "Analyze the emotion in this voice audio based on tone, pitch, and speaking style:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioData {
    /// Base64 payload without the data URL header
    pub data: String,
    pub format: String,
}

/// One part of a multi-part user message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    Text { text: String },
    ImageUrl { image_url: MediaUrl },
    InputAudio { input_audio: AudioData },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<MessagePart>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub response_format: ResponseFormat,
}

/// Client for the upstream chat-completions gateway
pub struct Dispatcher {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl Dispatcher {
    pub fn new(config: &GatewayConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build AI gateway HTTP client")?;

        Ok(Self {
            client,
            url: config.url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            api_key_env: config.api_key_env.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the chat request for one capture
    pub fn build_request(&self, mode: InputMode, input: &str) -> Result<ChatRequest, AnalyzeError> {
        let user = ChatMessage {
            role: Role::User,
            content: user_content(mode, input)?,
        };

        Ok(ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: MessageContent::Text(SYSTEM_PROMPT.to_string()),
                },
                user,
            ],
            response_format: ResponseFormat { kind: "json_object" },
        })
    }

    /// Send one capture upstream and return the model's raw text
    pub async fn dispatch(&self, mode: InputMode, input: &str) -> Result<String, AnalyzeError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AnalyzeError::MissingCredential(self.api_key_env.clone()))?;

        let request = self.build_request(mode, input)?;
        info!("Dispatching {} analysis to {}", mode, self.model);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(match status {
                429 => AnalyzeError::RateLimited,
                402 => AnalyzeError::PaymentRequired,
                _ => {
                    let body = response.text().await.unwrap_or_default();
                    error!(status, body = %redact_for_log(&body), "AI gateway error");
                    AnalyzeError::Upstream { status }
                }
            });
        }

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;
        let content = extract_content(&body);
        debug!(content_len = content.len(), "AI gateway responded");
        Ok(content)
    }
}

fn user_content(mode: InputMode, input: &str) -> Result<MessageContent, AnalyzeError> {
    match mode {
        InputMode::Text => {
            if input.trim().is_empty() {
                return Err(AnalyzeError::InvalidRequest("TEXT input is empty".to_string()));
            }
            Ok(MessageContent::Text(format!(
                "Analyze the emotion in this text: \"{}\"",
                input
            )))
        }
        InputMode::Webcam => {
            let url = media_url(mode, input, MediaKind::Image)?;
            debug!(mime = url.mime, "Attached webcam snapshot");
            Ok(MessageContent::Parts(vec![
                MessagePart::Text {
                    text: WEBCAM_PROMPT.to_string(),
                },
                MessagePart::ImageUrl {
                    image_url: MediaUrl {
                        url: input.trim().to_string(),
                    },
                },
            ]))
        }
        InputMode::Voice => {
            let url = media_url(mode, input, MediaKind::Audio)?;
            let format = url.audio_format().unwrap_or_else(|| "wav".to_string());
            debug!(mime = url.mime, format = %format, "Attached voice recording");
            Ok(MessageContent::Parts(vec![
                MessagePart::Text {
                    text: VOICE_PROMPT.to_string(),
                },
                MessagePart::InputAudio {
                    input_audio: AudioData {
                        data: url.payload.to_string(),
                        format,
                    },
                },
            ]))
        }
    }
}

/// Validate a media data URL of the expected kind
fn media_url(mode: InputMode, input: &str, expected: MediaKind) -> Result<DataUrl<'_>, AnalyzeError> {
    let kind_name = match expected {
        MediaKind::Audio => "audio",
        MediaKind::Image => "image",
    };
    let invalid = || {
        AnalyzeError::InvalidRequest(format!(
            "{} input must be a base64 {} data URL",
            mode, kind_name
        ))
    };

    let url = DataUrl::parse(input).map_err(|_| invalid())?;
    if url.kind() != Some(expected) {
        return Err(invalid());
    }
    url.validate()
        .map_err(|e| AnalyzeError::InvalidRequest(format!("{} input: {}", mode, e)))?;
    Ok(url)
}

/// Model text from a chat-completions response body.
///
/// Prefers `choices[0].message.content`; falls back to the first tool call's
/// arguments when content is missing or empty. Non-string content is
/// re-serialized as JSON. Returns an empty string when nothing is there,
/// which the normalizer turns into its default.
pub fn extract_content(body: &Value) -> String {
    let message = &body["choices"][0]["message"];
    let mut content = &message["content"];

    let blank = match content {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    if blank {
        let arguments = &message["tool_calls"][0]["function"]["arguments"];
        if !arguments.is_null() {
            content = arguments;
        }
    }

    match content {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
