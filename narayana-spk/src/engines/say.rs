//! macOS `say` backend

use crate::engines::command::{CommandEngine, EngineSettings, SpeechProgram};
use crate::engines::Voice;
use std::path::PathBuf;
use std::process::Command;

/// macOS speech capability
pub type SayEngine = CommandEngine<SayProgram>;

/// `say` command line
#[derive(Debug, Clone)]
pub struct SayProgram {
    binary: PathBuf,
}

impl Default for SayProgram {
    fn default() -> Self {
        Self::with_binary("say")
    }
}

impl SayProgram {
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl SpeechProgram for SayProgram {
    fn name(&self) -> &'static str {
        "say"
    }

    fn voices_command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-v").arg("?");
        cmd
    }

    fn parse_voices(&self, output: &str) -> Vec<Voice> {
        // "Bad News            en_US    # The light you see..."
        output
            .lines()
            .filter_map(|line| {
                let head = line.split('#').next()?.trim();
                let (name, language) = head.rsplit_once(char::is_whitespace)?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some(Voice::new(name, name).with_language(language))
            })
            .collect()
    }

    fn speak_command(&self, settings: &EngineSettings) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-r").arg(settings.rate.to_string());
        if let Some(ref voice) = settings.voice {
            cmd.arg("-v").arg(voice);
        }
        cmd.arg("-f").arg("-");
        cmd
    }

    fn speech_input(&self, text: &str, settings: &EngineSettings) -> String {
        // say has no volume flag; use the embedded speech command instead
        format!("[[volm {:.2}]] {}", settings.volume.clamp(0.0, 1.0), text)
    }
}
