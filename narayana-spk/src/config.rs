//! Configuration for the speech controller

use crate::error::SpeechError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Default speech rate (words per minute)
pub const DEFAULT_RATE: i32 = 200;

/// Default volume
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Speech controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Speech rate (words per minute, must be positive, default 200)
    pub rate: i32,

    /// Volume (0.0-1.0, default 1.0)
    pub volume: f32,

    /// Voice name, the engine's first voice when unset
    pub voice: Option<String>,

    /// Speech backend
    pub backend: Backend,

    /// Override for the backend's executable
    pub program: Option<PathBuf>,
}

/// Speech backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Platform default (say on macOS, SAPI on Windows, espeak-ng elsewhere)
    Native,
    /// espeak-ng
    EspeakNg,
    /// macOS say
    Say,
    /// Windows System.Speech through PowerShell
    Sapi,
}

impl FromStr for Backend {
    type Err = SpeechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(Backend::Native),
            "espeak-ng" | "espeak" => Ok(Backend::EspeakNg),
            "say" => Ok(Backend::Say),
            "sapi" => Ok(Backend::Sapi),
            other => Err(SpeechError::InvalidConfiguration(format!(
                "Unknown speech backend '{}' (expected native, espeak-ng, say or sapi)",
                other
            ))),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            volume: DEFAULT_VOLUME,
            voice: None,
            backend: Backend::Native,
            program: None,
        }
    }
}

/// Validate a speech rate
pub fn validate_rate(rate: i32) -> Result<(), SpeechError> {
    if rate > 0 {
        Ok(())
    } else {
        Err(SpeechError::InvalidConfiguration(format!(
            "Speech rate must be a positive integer. Provided value is {}",
            rate
        )))
    }
}

/// Validate a volume level
pub fn validate_volume(volume: f32) -> Result<(), SpeechError> {
    // NaN fails the range check
    if (0.0..=1.0).contains(&volume) {
        Ok(())
    } else {
        Err(SpeechError::InvalidConfiguration(format!(
            "Volume must be a float between 0 and 1. Provided value is {}",
            volume
        )))
    }
}

impl SpeechConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), SpeechError> {
        validate_rate(self.rate)?;
        validate_volume(self.volume)?;

        if let Some(ref name) = self.voice {
            if name.is_empty() {
                return Err(SpeechError::InvalidConfiguration(
                    "Voice name cannot be empty if provided".to_string(),
                ));
            }

            if name.chars().count() > 256 {
                return Err(SpeechError::InvalidConfiguration(
                    "Voice name too long (max 256 chars)".to_string(),
                ));
            }

            if name.chars().any(|c| c.is_control()) {
                return Err(SpeechError::InvalidConfiguration(
                    "Voice name contains invalid characters".to_string(),
                ));
            }
        }

        if let Some(ref program) = self.program {
            if program.as_os_str().is_empty() {
                return Err(SpeechError::InvalidConfiguration(
                    "Program path cannot be empty".to_string(),
                ));
            }

            if program.to_string_lossy().contains("..") {
                return Err(SpeechError::InvalidConfiguration(
                    "Program path cannot contain '..'".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Default config file location (`<config dir>/narayana-spk/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("narayana-spk").join("config.toml"))
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SpeechError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SpeechError::ConfigFile(format!("Failed to read {}: {}", path.display(), e))
        })?;
        debug!("Loaded speech config from {}", path.display());
        Self::from_str(&content)
    }

    /// Load configuration from a JSON or TOML string
    pub fn from_str(content: &str) -> Result<Self, SpeechError> {
        if let Ok(config) = serde_json::from_str::<SpeechConfig>(content) {
            return Ok(config);
        }

        toml::from_str::<SpeechConfig>(content)
            .map_err(|e| SpeechError::ConfigFile(format!("Unrecognized config format: {}", e)))
    }

    /// Overlay `NARAYANA_SPK_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Overlay settings looked up by environment variable name
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rate) = lookup("NARAYANA_SPK_RATE") {
            match rate.trim().parse::<i32>() {
                Ok(rate) => self.rate = rate,
                Err(_) => warn!("Ignoring NARAYANA_SPK_RATE={:?}: not an integer", rate),
            }
        }

        if let Some(volume) = lookup("NARAYANA_SPK_VOLUME") {
            match volume.trim().parse::<f32>() {
                Ok(volume) => self.volume = volume,
                Err(_) => warn!("Ignoring NARAYANA_SPK_VOLUME={:?}: not a number", volume),
            }
        }

        if let Some(voice) = lookup("NARAYANA_SPK_VOICE") {
            self.voice = Some(voice);
        }

        if let Some(backend) = lookup("NARAYANA_SPK_BACKEND") {
            match backend.parse::<Backend>() {
                Ok(backend) => self.backend = backend,
                Err(e) => warn!("Ignoring NARAYANA_SPK_BACKEND: {}", e),
            }
        }

        if let Some(program) = lookup("NARAYANA_SPK_PROGRAM") {
            self.program = Some(PathBuf::from(program));
        }
    }
}
