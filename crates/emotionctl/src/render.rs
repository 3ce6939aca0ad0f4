//! Terminal rendering of analysis results.

use emotion_common::{AnalysisResult, Emotion};
use owo_colors::{AnsiColors, OwoColorize};

const BAR_WIDTH: usize = 20;

/// Map the result's color token to a terminal color, falling back to the
/// label's usual color when the token is not one we know
pub fn terminal_color(result: &AnalysisResult) -> Option<AnsiColors> {
    token_color(result.base_color()).or_else(|| result.known_emotion().map(emotion_color))
}

fn token_color(token: &str) -> Option<AnsiColors> {
    match token {
        "yellow" => Some(AnsiColors::Yellow),
        "blue" => Some(AnsiColors::Blue),
        "red" => Some(AnsiColors::Red),
        "purple" => Some(AnsiColors::Magenta),
        "green" => Some(AnsiColors::Green),
        "gray" => Some(AnsiColors::BrightBlack),
        "pink" => Some(AnsiColors::BrightMagenta),
        _ => None,
    }
}

fn emotion_color(emotion: Emotion) -> AnsiColors {
    match emotion {
        Emotion::Joy => AnsiColors::Yellow,
        Emotion::Sadness => AnsiColors::Blue,
        Emotion::Anger => AnsiColors::Red,
        Emotion::Surprise => AnsiColors::BrightMagenta,
        Emotion::Fear => AnsiColors::Magenta,
        Emotion::Disgust => AnsiColors::Green,
        Emotion::Neutral => AnsiColors::BrightBlack,
    }
}

/// Filled/empty cells for a 0..=100 percentage
pub fn confidence_bar(percent: u8) -> String {
    let filled = (usize::from(percent.min(100)) * BAR_WIDTH + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Result card: emoji and emotion, confidence bar, explanation
pub fn render_result(result: &AnalysisResult, color: bool) -> String {
    let percent = result.confidence_percent();
    let bar = confidence_bar(percent);

    let (emotion, bar) = match terminal_color(result).filter(|_| color) {
        Some(c) => (
            result.emotion.color(c).bold().to_string(),
            bar.color(c).to_string(),
        ),
        None => (result.emotion.clone(), bar),
    };

    let mut out = String::new();
    out.push_str(&format!("{}  {}\n", result.emoji, emotion));
    out.push_str(&format!("{} {}%\n", bar, percent));
    if color {
        out.push_str(&format!("{}\n", result.explanation.dimmed()));
    } else {
        out.push_str(&format!("{}\n", result.explanation));
    }
    out
}

pub fn render_error(message: &str, color: bool) -> String {
    let line = format!("Analysis Failed: {}", message);
    if color {
        line.red().bold().to_string()
    } else {
        line
    }
}
