//! espeak-ng backend (Linux and other Unix systems)

use crate::engines::command::{CommandEngine, EngineSettings, SpeechProgram};
use crate::engines::Voice;
use std::path::PathBuf;
use std::process::Command;

/// espeak-ng speech capability
pub type EspeakEngine = CommandEngine<EspeakProgram>;

/// espeak-ng command line
#[derive(Debug, Clone)]
pub struct EspeakProgram {
    binary: PathBuf,
}

impl Default for EspeakProgram {
    fn default() -> Self {
        Self::with_binary("espeak-ng")
    }
}

impl EspeakProgram {
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

/// espeak-ng amplitude (0-200, 100 is normal) for a 0.0-1.0 volume
pub fn amplitude(volume: f32) -> u32 {
    (volume * 100.0).round().clamp(0.0, 200.0) as u32
}

impl SpeechProgram for EspeakProgram {
    fn name(&self) -> &'static str {
        "espeak-ng"
    }

    fn voices_command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--voices");
        cmd
    }

    /// Parses the `--voices` table:
    ///
    /// ```text
    /// Pty Language       Age/Gender VoiceName          File                 Other Languages
    ///  5  en-us           --/M      English_(America)  gmw/en-US            (en 3)
    /// ```
    fn parse_voices(&self, output: &str) -> Vec<Voice> {
        output
            .lines()
            .filter(|line| !line.trim_start().starts_with("Pty"))
            .filter_map(|line| {
                let fields: Vec<&str> = line.split_whitespace().collect();
                match fields.as_slice() {
                    [_priority, language, _age_gender, name, file, ..] => {
                        Some(Voice::new(*file, *name).with_language(*language))
                    }
                    _ => None,
                }
            })
            .collect()
    }

    fn speak_command(&self, settings: &EngineSettings) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-s").arg(settings.rate.to_string());
        cmd.arg("-a").arg(amplitude(settings.volume).to_string());
        if let Some(ref voice) = settings.voice {
            cmd.arg("-v").arg(voice);
        }
        cmd.arg("--stdin");
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOICES: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 2  en-us           --/M      English_(America)  gmw/en-US            (en 3)
 5  fr-fr           --/M      French             roa/fr               (fr 5)
";

    #[test]
    fn test_parse_voices() {
        let voices = EspeakProgram::default().parse_voices(VOICES);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[1].name, "English_(America)");
        assert_eq!(voices[1].id, "gmw/en-US");
        assert_eq!(voices[1].language.as_deref(), Some("en-us"));
    }

    #[test]
    fn test_parse_voices_skips_short_lines() {
        let voices = EspeakProgram::default().parse_voices("Pty Language\n\n 5 af\n");
        assert!(voices.is_empty());
    }

    #[test]
    fn test_amplitude() {
        assert_eq!(amplitude(1.0), 100);
        assert_eq!(amplitude(0.0), 0);
        assert_eq!(amplitude(0.5), 50);
    }

    #[test]
    fn test_speak_command_args() {
        let settings = EngineSettings {
            rate: 150,
            volume: 0.8,
            voice: Some("gmw/en-US".to_string()),
        };
        let cmd = EspeakProgram::default().speak_command(&settings);
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, ["-s", "150", "-a", "80", "-v", "gmw/en-US", "--stdin"]);
    }
}
