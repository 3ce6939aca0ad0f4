//! Emotion Lens daemon library - exposes modules for testing.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod redact;
pub mod routes;
pub mod server;

pub use error::AnalyzeError;
