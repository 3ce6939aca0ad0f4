//! Turn command-line captures into analyze requests.

use anyhow::{bail, Context, Result};
use emotion_common::data_url::{self, MediaKind};
use emotion_common::{AnalyzeRequest, InputMode};
use std::io::Read;
use std::path::Path;

pub const EMPTY_TEXT_MESSAGE: &str = "Please enter some text to analyze.";

/// Typed text, sent as-is
pub fn text_request(text: &str) -> Result<AnalyzeRequest> {
    if text.trim().is_empty() {
        bail!(EMPTY_TEXT_MESSAGE);
    }
    Ok(AnalyzeRequest {
        mode: InputMode::Text,
        input: text.to_string(),
    })
}

/// Text read from a reader until EOF (used for --stdin)
pub fn text_request_from_reader(mut reader: impl Read) -> Result<AnalyzeRequest> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .context("Failed to read text from stdin")?;
    text_request(text.trim_end_matches(['\n', '\r']))
}

/// A recorded clip or snapshot file, embedded as a data URL
pub fn media_request(mode: InputMode, path: &Path) -> Result<AnalyzeRequest> {
    let expected = match mode {
        InputMode::Voice => MediaKind::Audio,
        InputMode::Webcam => MediaKind::Image,
        InputMode::Text => bail!("TEXT captures are not files"),
    };

    let mime = data_url::mime_for_path(path)
        .with_context(|| format!("Unsupported capture file type: {}", path.display()))?;
    let kind = if mime.starts_with("audio/") {
        MediaKind::Audio
    } else {
        MediaKind::Image
    };
    if kind != expected {
        bail!(
            "{} is {} but {} mode needs {}",
            path.display(),
            describe(kind),
            mode,
            describe(expected)
        );
    }

    let input = data_url::encode_file(path)
        .with_context(|| format!("Failed to read capture {}", path.display()))?;
    Ok(AnalyzeRequest { mode, input })
}

fn describe(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Audio => "an audio recording",
        MediaKind::Image => "an image",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_text_request() {
        let req = text_request("What a lovely day").unwrap();
        assert_eq!(req.mode, InputMode::Text);
        assert_eq!(req.input, "What a lovely day");
    }

    #[test]
    fn test_empty_text_rejected() {
        let err = text_request(" \n ").unwrap_err();
        assert_eq!(err.to_string(), EMPTY_TEXT_MESSAGE);
    }

    #[test]
    fn test_text_from_reader_strips_final_newline() {
        let req = text_request_from_reader("line one\nline two\n".as_bytes()).unwrap();
        assert_eq!(req.input, "line one\nline two");
        assert!(text_request_from_reader("\n".as_bytes()).is_err());
    }

    #[test]
    fn test_webcam_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.jpg");
        fs::write(&path, [0xff, 0xd8, 0xff]).unwrap();

        let req = media_request(InputMode::Webcam, &path).unwrap();
        assert_eq!(req.mode, InputMode::Webcam);
        assert_eq!(req.input, "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_voice_clip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        fs::write(&path, b"RIFF").unwrap();

        let req = media_request(InputMode::Voice, &path).unwrap();
        assert_eq!(req.input, "data:audio/wav;base64,UklGRg==");
    }

    #[test]
    fn test_wrong_media_kind_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.png");
        fs::write(&path, b"png").unwrap();

        let err = media_request(InputMode::Voice, &path).unwrap_err();
        assert!(err.to_string().contains("VOICE mode needs an audio recording"));
    }

    #[test]
    fn test_unsupported_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"hi").unwrap();
        assert!(media_request(InputMode::Webcam, &path).is_err());
        assert!(media_request(InputMode::Webcam, &dir.path().join("gone.png")).is_err());
        assert!(media_request(InputMode::Text, &path).is_err());
    }
}
