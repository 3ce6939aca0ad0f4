//! Error types for emotion_common.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmotionError {
    #[error("Not a base64 data URL")]
    NotDataUrl,

    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
