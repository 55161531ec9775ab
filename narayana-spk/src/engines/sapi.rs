//! Windows SAPI backend (System.Speech through PowerShell)

use crate::engines::command::{CommandEngine, EngineSettings, SpeechProgram};
use crate::engines::Voice;
use std::path::PathBuf;
use std::process::Command;

/// Windows speech capability
pub type SapiEngine = CommandEngine<SapiProgram>;

const LIST_VOICES_SCRIPT: &str = r#"
Add-Type -AssemblyName System.Speech
$synth = New-Object System.Speech.Synthesis.SpeechSynthesizer
foreach ($voice in $synth.GetInstalledVoices()) {
    $info = $voice.VoiceInfo
    "{0}`t{1}`t{2}" -f $info.Id, $info.Name, $info.Culture.Name
}
$synth.Dispose()
"#;

/// PowerShell command line
#[derive(Debug, Clone)]
pub struct SapiProgram {
    binary: PathBuf,
}

impl Default for SapiProgram {
    fn default() -> Self {
        Self::with_binary("powershell")
    }
}

impl SapiProgram {
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command(&self, script: &str) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-NoProfile")
            .arg("-NonInteractive")
            .arg("-ExecutionPolicy")
            .arg("Bypass") // Needed for Add-Type
            .arg("-Command")
            .arg(script);
        cmd
    }
}

/// SpeechSynthesizer.Rate (-10 to 10) for a words-per-minute rate.
///
/// Rate 0 is about 200 WPM and every 10 steps triples or thirds the speed.
pub fn synth_rate(wpm: i32) -> i32 {
    if wpm <= 0 {
        return -10;
    }
    (10.0 * (wpm as f64 / 200.0).ln() / 3f64.ln())
        .round()
        .clamp(-10.0, 10.0) as i32
}

/// SpeechSynthesizer.Volume (0 to 100) for a 0.0-1.0 volume
pub fn synth_volume(volume: f32) -> u32 {
    (volume * 100.0).round().clamp(0.0, 100.0) as u32
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

impl SpeechProgram for SapiProgram {
    fn name(&self) -> &'static str {
        "sapi"
    }

    fn voices_command(&self) -> Command {
        self.command(LIST_VOICES_SCRIPT)
    }

    fn parse_voices(&self, output: &str) -> Vec<Voice> {
        output
            .lines()
            .filter_map(|line| {
                let mut fields = line.trim_end_matches('\r').split('\t');
                let id = fields.next()?.trim();
                let name = fields.next()?.trim();
                if id.is_empty() || name.is_empty() {
                    return None;
                }
                let voice = Voice::new(id, name);
                Some(match fields.next().map(str::trim) {
                    Some(culture) if !culture.is_empty() => voice.with_language(culture),
                    _ => voice,
                })
            })
            .collect()
    }

    fn speak_command(&self, settings: &EngineSettings) -> Command {
        let select_voice = match settings.voice {
            Some(ref id) => format!(
                "foreach ($voice in $synth.GetInstalledVoices()) {{ \
                 if ($voice.VoiceInfo.Id -eq {}) {{ $synth.SelectVoice($voice.VoiceInfo.Name) }} }}",
                quote(id)
            ),
            None => String::new(),
        };

        let script = format!(
            r#"
[Console]::InputEncoding = [System.Text.Encoding]::UTF8
Add-Type -AssemblyName System.Speech
$synth = New-Object System.Speech.Synthesis.SpeechSynthesizer
{}
$synth.Rate = {}
$synth.Volume = {}
$synth.Speak([Console]::In.ReadToEnd())
$synth.Dispose()
"#,
            select_voice,
            synth_rate(settings.rate),
            synth_volume(settings.volume),
        );
        self.command(&script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synth_rate() {
        assert_eq!(synth_rate(200), 0);
        assert_eq!(synth_rate(600), 10);
        assert_eq!(synth_rate(10_000), 10);
        assert_eq!(synth_rate(1), -10);
        assert_eq!(synth_rate(-5), -10);
        assert!(synth_rate(150) < 0);
        assert!(synth_rate(300) > 0);
    }

    #[test]
    fn test_synth_volume() {
        assert_eq!(synth_volume(1.0), 100);
        assert_eq!(synth_volume(0.8), 80);
        assert_eq!(synth_volume(0.0), 0);
    }

    #[test]
    fn test_parse_voices() {
        let output = "TTS_MS_EN-US_DAVID_11.0\tMicrosoft David Desktop\ten-US\r\n\
                      TTS_MS_EN-US_ZIRA_11.0\tMicrosoft Zira Desktop\ten-US\r\n\
                      \r\n";
        let voices = SapiProgram::default().parse_voices(output);
        assert_eq!(voices.len(), 2);
        assert_eq!(voices[0].id, "TTS_MS_EN-US_DAVID_11.0");
        assert_eq!(voices[1].name, "Microsoft Zira Desktop");
        assert_eq!(voices[1].language.as_deref(), Some("en-US"));
    }

    #[test]
    fn test_voice_id_is_quoted() {
        let settings = EngineSettings {
            voice: Some("it's".to_string()),
            ..EngineSettings::default()
        };
        let cmd = SapiProgram::default().speak_command(&settings);
        let script = cmd.get_args().last().unwrap().to_string_lossy().into_owned();
        assert!(script.contains("-eq 'it''s'"));
    }
}
