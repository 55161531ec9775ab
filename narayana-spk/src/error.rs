//! Error types for narayana-spk

use thiserror::Error;

/// Speech controller errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Voice \"{name}\" not found. Available voices are: {available:?}")]
    VoiceNotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("Speech engine '{0}' reported no voices")]
    NoVoices(String),

    #[error("Speech engine is already speaking")]
    Busy,

    #[error("Speech engine unavailable: {0}")]
    Unavailable(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Config file error: {0}")]
    ConfigFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
