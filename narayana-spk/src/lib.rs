//! narayana-spk: Speech control for robots
//!
//! Configures a platform text-to-speech engine and drives it:
//! - Rate, volume and voice selection with validation
//! - Blocking speech playback and cancellation
//! - Native backends (espeak-ng, macOS say, Windows SAPI) behind one trait

pub mod error;
pub mod config;
pub mod engines;
pub mod voices;
pub mod controller;

pub use error::SpeechError;
pub use config::{Backend, SpeechConfig};
pub use controller::SpeechController;
pub use engines::{Property, PropertyValue, SpeechCapability, Voice};
pub use voices::VoiceCatalog;
