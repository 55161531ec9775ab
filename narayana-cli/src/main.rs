// narayana-say: speak text through the platform speech engine

use anyhow::Context;
use clap::{Parser, Subcommand};
use narayana_spk::{engines, Backend, SpeechConfig, SpeechController};
use std::future::Future;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const STOP_RETRY: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "narayana-say")]
#[command(about = "Speak text with the platform text-to-speech engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (JSON or TOML)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Speech rate in words per minute
    #[arg(long, short, global = true, allow_negative_numbers = true)]
    rate: Option<i32>,

    /// Volume (0.0-1.0)
    #[arg(long, global = true, allow_negative_numbers = true)]
    volume: Option<f32>,

    /// Voice name (see `voices`)
    #[arg(long, global = true)]
    voice: Option<String>,

    /// Speech backend (native, espeak-ng, say, sapi)
    #[arg(long, short, global = true)]
    backend: Option<Backend>,

    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Speak text, or stdin when the text is `-`
    Speak {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// List the engine's voices
    Voices,

    /// Show the current rate, volume and voice
    Describe,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    let engine = engines::open(&config)?;
    let controller = SpeechController::from_config(engine, &config)?;

    match cli.command {
        Commands::Speak { text } => {
            speak(controller, text).await?;
        }
        Commands::Voices => {
            list_voices(&controller);
        }
        Commands::Describe => {
            println!("{}", controller.describe()?);
        }
    }

    Ok(())
}

/// Defaults < config file < environment < command line
fn load_config(cli: &Cli) -> anyhow::Result<SpeechConfig> {
    let mut config = match &cli.config {
        Some(path) => SpeechConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => match SpeechConfig::default_path().filter(|path| path.exists()) {
            Some(path) => {
                debug!("Using config file {}", path.display());
                SpeechConfig::from_file(&path)?
            }
            None => SpeechConfig::default(),
        },
    };

    config.apply_env();

    if let Some(rate) = cli.rate {
        config.rate = rate;
    }
    if let Some(volume) = cli.volume {
        config.volume = volume;
    }
    if let Some(ref voice) = cli.voice {
        config.voice = Some(voice.clone());
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    Ok(config)
}

async fn speak(controller: SpeechController, text: Vec<String>) -> anyhow::Result<()> {
    let text = if text == ["-"] {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        input
    } else {
        text.join(" ")
    };

    speak_until(Arc::new(controller), text, tokio::signal::ctrl_c()).await
}

/// Speak `text` until it finishes or `interrupt` resolves
async fn speak_until<F>(
    controller: Arc<SpeechController>,
    text: String,
    interrupt: F,
) -> anyhow::Result<()>
where
    F: Future<Output = std::io::Result<()>>,
{
    let mut speaker = {
        let controller = controller.clone();
        tokio::task::spawn_blocking(move || controller.speak(&text))
    };

    tokio::select! {
        result = &mut speaker => {
            result??;
        }
        _ = interrupt => {
            info!("Interrupted, stopping speech");
            // Playback may not have started yet, so keep stopping until the speaker returns
            let mut retry = tokio::time::interval(STOP_RETRY);
            loop {
                controller.stop()?;
                tokio::select! {
                    result = &mut speaker => {
                        result??;
                        break;
                    }
                    _ = retry.tick() => {}
                }
            }
        }
    }

    Ok(())
}

fn list_voices(controller: &SpeechController) {
    let width = controller
        .voices()
        .iter()
        .map(|voice| voice.name.chars().count())
        .max()
        .unwrap_or(0);

    for voice in controller.voices().iter() {
        let marker = if voice.name == controller.voice_name() { '*' } else { ' ' };
        println!(
            "{} {:<width$}  {:<8}  {}",
            marker,
            voice.name,
            voice.language.as_deref().unwrap_or("-"),
            voice.id,
            width = width
        );
    }
}
