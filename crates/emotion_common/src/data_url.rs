//! Base64 data URLs for captured audio and images.

use crate::error::EmotionError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::read::DecoderReader;
use base64::Engine as _;
use std::fs;
use std::io;
use std::path::Path;

/// Broad class of a media MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Image,
}

/// Borrowed view of `data:<mime>[;params];base64,<payload>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUrl<'a> {
    pub mime: &'a str,
    pub payload: &'a str,
}

impl<'a> DataUrl<'a> {
    pub fn parse(url: &'a str) -> Result<Self, EmotionError> {
        let rest = url.trim().strip_prefix("data:").ok_or(EmotionError::NotDataUrl)?;
        let (header, payload) = rest.split_once(',').ok_or(EmotionError::NotDataUrl)?;

        let mut params = header.split(';');
        let mime = params.next().unwrap_or("").trim();
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(EmotionError::NotDataUrl);
        }
        if mime.is_empty() || payload.trim().is_empty() {
            return Err(EmotionError::NotDataUrl);
        }

        Ok(Self {
            mime,
            payload: payload.trim(),
        })
    }

    pub fn kind(&self) -> Option<MediaKind> {
        let top = self.mime.split('/').next()?;
        if top.eq_ignore_ascii_case("audio") {
            Some(MediaKind::Audio)
        } else if top.eq_ignore_ascii_case("image") {
            Some(MediaKind::Image)
        } else {
            None
        }
    }

    /// Audio container name as chat gateways expect it (`wav`, `mp3`, ...)
    pub fn audio_format(&self) -> Option<String> {
        if self.kind() != Some(MediaKind::Audio) {
            return None;
        }
        let subtype = self.mime.split('/').nth(1)?.to_ascii_lowercase();
        let format = match subtype.as_str() {
            "mpeg" | "mp3" => "mp3",
            "wav" | "wave" | "x-wav" => "wav",
            "mp4" | "m4a" | "x-m4a" => "m4a",
            "ogg" => "ogg",
            "flac" | "x-flac" => "flac",
            "webm" => "webm",
            other => return Some(other.to_string()),
        };
        Some(format.to_string())
    }

    /// Check the payload is valid base64 without buffering the decoded bytes
    pub fn validate(&self) -> Result<(), EmotionError> {
        let mut reader = DecoderReader::new(self.payload.as_bytes(), &BASE64);
        io::copy(&mut reader, &mut io::sink()).map_err(|e| {
            if let Some(decode) = e
                .get_ref()
                .and_then(|inner| inner.downcast_ref::<base64::DecodeError>())
            {
                return EmotionError::Base64(decode.clone());
            }
            EmotionError::Io(e)
        })?;
        Ok(())
    }
}

/// Encode bytes as a data URL
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// MIME type for a capture file, by extension
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "wav" => Some("audio/wav"),
        "mp3" => Some("audio/mpeg"),
        "ogg" | "oga" => Some("audio/ogg"),
        "webm" => Some("audio/webm"),
        "m4a" => Some("audio/mp4"),
        "flac" => Some("audio/flac"),
        _ => None,
    }
}

/// Read a capture file and encode it as a data URL
pub fn encode_file(path: &Path) -> Result<String, EmotionError> {
    let mime = mime_for_path(path)
        .ok_or_else(|| EmotionError::UnsupportedMedia(path.display().to_string()))?;
    let bytes = fs::read(path)?;
    Ok(encode(mime, &bytes))
}
