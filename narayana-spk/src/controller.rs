//! Speech controller: validates settings and forwards them to a speech capability

use crate::config::{self, SpeechConfig, DEFAULT_RATE, DEFAULT_VOLUME};
use crate::engines::{Property, PropertyValue, SpeechCapability};
use crate::error::SpeechError;
use crate::voices::VoiceCatalog;
use std::fmt;
use tracing::{debug, info};

/// Speech controller
///
/// Owns the capability it was given and a snapshot of the voices the
/// capability reported at construction. The snapshot is not refreshed.
///
/// `speak` and `stop` take `&self`, so a controller shared across threads can
/// stop an utterance another thread is waiting on.
pub struct SpeechController {
    capability: Box<dyn SpeechCapability>,
    voices: VoiceCatalog,
    voice_name: String,
}

impl SpeechController {
    /// Create a controller with the default rate and volume and the first voice
    pub fn new(capability: Box<dyn SpeechCapability>) -> Result<Self, SpeechError> {
        Self::with_settings(capability, DEFAULT_RATE, DEFAULT_VOLUME, None)
    }

    /// Create a controller from a validated config
    pub fn from_config(
        capability: Box<dyn SpeechCapability>,
        config: &SpeechConfig,
    ) -> Result<Self, SpeechError> {
        config.validate()?;
        Self::with_settings(capability, config.rate, config.volume, config.voice.as_deref())
    }

    /// Create a controller.
    ///
    /// Enumerates the capability's voices, then applies rate, volume and
    /// voice in that order. Without a voice name the first reported voice is
    /// selected.
    pub fn with_settings(
        capability: Box<dyn SpeechCapability>,
        rate: i32,
        volume: f32,
        voice_name: Option<&str>,
    ) -> Result<Self, SpeechError> {
        let voices = VoiceCatalog::new(capability.voices()?);
        debug!("{} offers {} voices", capability.name(), voices.len());

        // Rate and volume are checked before the voice, even when there is no voice to pick
        config::validate_rate(rate)?;
        config::validate_volume(volume)?;

        let voice_name = match voice_name {
            Some(name) => name.to_string(),
            None => voices
                .first()
                .map(|voice| voice.name.clone())
                .ok_or_else(|| SpeechError::NoVoices(capability.name().to_string()))?,
        };

        let mut controller = Self {
            capability,
            voices,
            voice_name: String::new(),
        };
        controller.set_speech_rate(rate)?;
        controller.set_volume(volume)?;
        controller.set_voice(&voice_name)?;

        info!(
            "Speech controller ready on {} (rate={}, volume={}, voice={})",
            controller.capability.name(),
            rate,
            volume,
            controller.voice_name
        );
        Ok(controller)
    }

    /// Voices captured at construction
    pub fn voices(&self) -> &VoiceCatalog {
        &self.voices
    }

    /// Set the speech rate (words per minute, must be positive)
    pub fn set_speech_rate(&mut self, rate: i32) -> Result<(), SpeechError> {
        config::validate_rate(rate)?;
        debug!("Setting speech rate to {}", rate);
        self.capability.set_property(PropertyValue::Rate(rate))
    }

    /// Set the volume (0.0-1.0)
    pub fn set_volume(&mut self, volume: f32) -> Result<(), SpeechError> {
        config::validate_volume(volume)?;
        debug!("Setting volume to {}", volume);
        self.capability.set_property(PropertyValue::Volume(volume))
    }

    /// Select a voice by name
    pub fn set_voice(&mut self, name: &str) -> Result<(), SpeechError> {
        let id = self
            .voices
            .id(name)
            .ok_or_else(|| SpeechError::VoiceNotFound {
                name: name.to_string(),
                available: self.voices.names(),
            })?;

        debug!("Setting voice to {} ({})", name, id);
        self.capability
            .set_property(PropertyValue::Voice(id.to_string()))?;
        self.voice_name = name.to_string();
        Ok(())
    }

    /// Current speech rate, as reported by the engine
    pub fn speech_rate(&self) -> Result<i32, SpeechError> {
        self.capability.property(Property::Rate)?.into_rate()
    }

    /// Current volume, as reported by the engine
    pub fn volume(&self) -> Result<f32, SpeechError> {
        self.capability.property(Property::Volume)?.into_volume()
    }

    /// Name of the selected voice
    pub fn voice_name(&self) -> &str {
        &self.voice_name
    }

    /// Name of the underlying speech engine
    pub fn engine_name(&self) -> &'static str {
        self.capability.name()
    }

    /// Speak `text`, blocking until playback finishes or is stopped
    pub fn speak(&self, text: &str) -> Result<(), SpeechError> {
        debug!("Speaking {} chars", text.chars().count());
        self.capability.speak(text)
    }

    /// Stop in-progress playback
    pub fn stop(&self) -> Result<(), SpeechError> {
        self.capability.stop()
    }

    /// Render the current rate, volume and voice
    pub fn describe(&self) -> Result<String, SpeechError> {
        Ok(format!(
            "SpeechController(rate={}, volume={:?}, voice={})",
            self.speech_rate()?,
            self.volume()?,
            self.voice_name
        ))
    }
}

impl fmt::Debug for SpeechController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechController")
            .field("engine", &self.capability.name())
            .field("voices", &self.voices.len())
            .field("voice_name", &self.voice_name)
            .finish()
    }
}
