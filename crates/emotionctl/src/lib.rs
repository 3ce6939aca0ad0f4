//! Emotion Lens control client library - exposes modules for testing.

pub mod capture;
pub mod client;
pub mod render;
pub mod status;

/// Default emotiond base URL
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:7870";
