//! Speech capability trait and platform backends

pub mod command;
pub mod espeak;
pub mod sapi;
pub mod say;

use crate::config::{Backend, SpeechConfig};
use crate::error::SpeechError;
use std::fmt;
use std::path::Path;

pub use command::{CommandEngine, EngineSettings, SpeechProgram};
pub use espeak::{EspeakEngine, EspeakProgram};
pub use sapi::{SapiEngine, SapiProgram};
pub use say::{SayEngine, SayProgram};

/// A voice as reported by the speech engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Engine-specific identifier, passed back when selecting the voice
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Language tag, when the engine reports one
    pub language: Option<String>,
}

impl Voice {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Engine property that can be read back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Rate,
    Volume,
    Voice,
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Rate => write!(f, "rate"),
            Property::Volume => write!(f, "volume"),
            Property::Voice => write!(f, "voice"),
        }
    }
}

/// Value of an engine property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Words per minute
    Rate(i32),
    /// 0.0-1.0
    Volume(f32),
    /// Voice identifier
    Voice(String),
}

impl PropertyValue {
    pub fn property(&self) -> Property {
        match self {
            PropertyValue::Rate(_) => Property::Rate,
            PropertyValue::Volume(_) => Property::Volume,
            PropertyValue::Voice(_) => Property::Voice,
        }
    }

    pub fn into_rate(self) -> Result<i32, SpeechError> {
        match self {
            PropertyValue::Rate(rate) => Ok(rate),
            other => Err(mismatch(Property::Rate, &other)),
        }
    }

    pub fn into_volume(self) -> Result<f32, SpeechError> {
        match self {
            PropertyValue::Volume(volume) => Ok(volume),
            other => Err(mismatch(Property::Volume, &other)),
        }
    }
}

fn mismatch(expected: Property, got: &PropertyValue) -> SpeechError {
    SpeechError::Engine(format!(
        "Engine returned a {} value when {} was requested",
        got.property(),
        expected
    ))
}

/// Platform speech capability.
///
/// Implementations own whatever process-wide engine state the platform has,
/// so each controller gets its own instance.
pub trait SpeechCapability: Send + Sync {
    /// Engine name, used in logs and diagnostics
    fn name(&self) -> &'static str;

    /// Check if the engine can be used on this machine
    fn is_available(&self) -> bool {
        true
    }

    /// Enumerate the voices the engine currently offers
    fn voices(&self) -> Result<Vec<Voice>, SpeechError>;

    /// Read the current value of a property
    fn property(&self, property: Property) -> Result<PropertyValue, SpeechError>;

    /// Update a property
    fn set_property(&self, value: PropertyValue) -> Result<(), SpeechError>;

    /// Speak `text`, returning once playback has finished or was stopped
    fn speak(&self, text: &str) -> Result<(), SpeechError>;

    /// Halt in-progress playback. No-op when idle.
    fn stop(&self) -> Result<(), SpeechError>;
}

/// Open the backend selected in `config`
pub fn open(config: &SpeechConfig) -> Result<Box<dyn SpeechCapability>, SpeechError> {
    let engine = build(config.backend, config.program.as_deref());

    if !engine.is_available() {
        return Err(SpeechError::Unavailable(format!(
            "{} could not be started",
            engine.name()
        )));
    }

    Ok(engine)
}

fn build(backend: Backend, program: Option<&Path>) -> Box<dyn SpeechCapability> {
    match backend {
        Backend::Native => build(native_backend(), program),
        Backend::EspeakNg => Box::new(EspeakEngine::new(
            program.map(EspeakProgram::with_binary).unwrap_or_default(),
        )),
        Backend::Say => Box::new(SayEngine::new(
            program.map(SayProgram::with_binary).unwrap_or_default(),
        )),
        Backend::Sapi => Box::new(SapiEngine::new(
            program.map(SapiProgram::with_binary).unwrap_or_default(),
        )),
    }
}

/// Backend used for `Backend::Native` on the build target
pub fn native_backend() -> Backend {
    if cfg!(target_os = "macos") {
        Backend::Say
    } else if cfg!(target_os = "windows") {
        Backend::Sapi
    } else {
        Backend::EspeakNg
    }
}
