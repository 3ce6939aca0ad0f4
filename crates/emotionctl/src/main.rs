//! Emotion Lens Control - CLI client for emotiond
//!
//! Captures text, voice clips or webcam snapshots and shows the detected emotion.

use anyhow::Result;
use clap::{Parser, Subcommand};
use emotion_common::{AnalyzeRequest, InputMode};
use emotionctl::capture;
use emotionctl::client::EmotionClient;
use emotionctl::render;
use emotionctl::status::StatusLine;
use emotionctl::DEFAULT_SERVER;
use owo_colors::OwoColorize;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "emotionctl")]
#[command(about = "Emotion Lens - detect emotion in text, voice and faces", long_about = None)]
#[command(version)]
struct Cli {
    /// emotiond base URL
    #[arg(long, global = true, env = "EMOTION_SERVER", default_value = DEFAULT_SERVER)]
    server: String,

    /// Print the raw JSON result instead of the card
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze typed text
    Text {
        /// Text to analyze
        text: Option<String>,

        /// Read the text from stdin
        #[arg(long, conflicts_with = "text")]
        stdin: bool,
    },

    /// Analyze a recorded voice clip (wav, mp3, ogg, webm, m4a, flac)
    Voice {
        file: PathBuf,
    },

    /// Analyze a webcam snapshot (png, jpg, webp, gif)
    Webcam {
        file: PathBuf,
    },

    /// Show emotiond health
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let color = !cli.no_color && io::stdout().is_terminal();

    match run(&cli, color).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render::render_error(&e.to_string(), color));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, color: bool) -> Result<()> {
    let client = EmotionClient::new(&cli.server)?;

    let request = match &cli.command {
        Commands::Text { text, stdin } => {
            if *stdin {
                capture::text_request_from_reader(io::stdin().lock())?
            } else {
                capture::text_request(text.as_deref().unwrap_or(""))?
            }
        }
        Commands::Voice { file } => capture::media_request(InputMode::Voice, file)?,
        Commands::Webcam { file } => capture::media_request(InputMode::Webcam, file)?,
        Commands::Health => return health(&client, cli.json, color).await,
    };

    analyze(&client, &request, cli.json, color).await
}

async fn analyze(client: &EmotionClient, request: &AnalyzeRequest, json: bool, color: bool) -> Result<()> {
    let mut status = StatusLine::new();
    status.start()?;

    let result = match client.analyze(request).await {
        Ok(result) => {
            status.succeed();
            result
        }
        Err(e) => {
            status.fail();
            return Err(e);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::render_result(&result, color));
    }
    Ok(())
}

async fn health(client: &EmotionClient, json: bool, color: bool) -> Result<()> {
    let health = client.health().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&health)?);
        return Ok(());
    }

    let status = if !color {
        health.status.clone()
    } else if health.status == "healthy" {
        health.status.green().to_string()
    } else {
        health.status.yellow().to_string()
    };
    println!("emotiond {} at {}", health.version, client.base_url());
    println!("  Status:  {}", status);
    println!("  Model:   {}", health.model);
    println!("  Uptime:  {}s", health.uptime_seconds);
    Ok(())
}
