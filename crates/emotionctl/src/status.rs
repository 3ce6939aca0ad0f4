//! Analysis status display.

use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::io::{self, IsTerminal};
use std::time::Duration;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Where a single analysis currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppStatus {
    Idle,
    Analyzing,
    Success,
    Error,
}

impl AppStatus {
    /// A new analysis may only start from a settled state
    pub fn can_start(&self) -> bool {
        !matches!(self, AppStatus::Analyzing)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppStatus::Idle => "Ready",
            AppStatus::Analyzing => "Analyzing emotions...",
            AppStatus::Success => "Analysis complete",
            AppStatus::Error => "Analysis failed",
        }
    }
}

/// Tracks status and drives the spinner while a request is in flight
pub struct StatusLine {
    status: AppStatus,
    spinner: Option<ProgressBar>,
    animate: bool,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::with_animation(io::stderr().is_terminal())
    }

    pub fn with_animation(animate: bool) -> Self {
        Self {
            status: AppStatus::Idle,
            spinner: None,
            animate,
        }
    }

    pub fn status(&self) -> AppStatus {
        self.status
    }

    /// Fails if an analysis is already running
    pub fn start(&mut self) -> Result<()> {
        if !self.status.can_start() {
            bail!("An analysis is already running");
        }
        self.status = AppStatus::Analyzing;

        if self.animate {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .tick_strings(SPINNER_FRAMES)
                .template("{spinner:.magenta} {msg}")
            {
                spinner.set_style(style);
            }
            spinner.set_message(AppStatus::Analyzing.label().dimmed().to_string());
            spinner.enable_steady_tick(Duration::from_millis(80));
            self.spinner = Some(spinner);
        }
        Ok(())
    }

    pub fn succeed(&mut self) {
        self.finish(AppStatus::Success);
    }

    pub fn fail(&mut self) {
        self.finish(AppStatus::Error);
    }

    fn finish(&mut self, status: AppStatus) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        self.status = status;
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}
