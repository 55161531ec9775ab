//! Speech capability backed by a command-line synthesizer
//!
//! The synthesizer process is spawned once per utterance with the current
//! rate/volume/voice on its command line and the text on stdin. `speak` polls
//! the process until it exits; `stop` kills it.

use crate::engines::{Property, PropertyValue, SpeechCapability, Voice};
use crate::error::SpeechError;
use parking_lot::{Mutex, RwLock};
use std::io::{Read, Write};
use std::process::{Child, ChildStderr, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const MAX_VOICES: usize = 1000;

/// Settings passed to the synthesizer on every utterance
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Words per minute
    pub rate: i32,
    /// 0.0-1.0
    pub volume: f32,
    /// Voice identifier, `None` for the synthesizer's default voice
    pub voice: Option<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            rate: 200,
            volume: 1.0,
            voice: None,
        }
    }
}

/// A command-line speech synthesizer
pub trait SpeechProgram: Send + Sync {
    /// Program name, used as the engine name
    fn name(&self) -> &'static str;

    /// Command printing the installed voices on stdout
    fn voices_command(&self) -> Command;

    /// Parse the output of `voices_command`
    fn parse_voices(&self, output: &str) -> Vec<Voice>;

    /// Command that speaks stdin using `settings`
    fn speak_command(&self, settings: &EngineSettings) -> Command;

    /// Text written to the speak command's stdin
    fn speech_input(&self, text: &str, _settings: &EngineSettings) -> String {
        text.to_string()
    }
}

struct Playback {
    id: u64,
    child: Child,
    stderr: Option<JoinHandle<String>>,
}

/// Collect stderr while the process runs; a full pipe stalls the synthesizer
fn drain_stderr(name: &'static str, mut pipe: ChildStderr) -> Option<JoinHandle<String>> {
    let spawned = thread::Builder::new()
        .name(format!("{}-stderr", name))
        .spawn(move || {
            let mut buf = Vec::new();
            if let Err(e) = pipe.read_to_end(&mut buf) {
                warn!("Failed to read {} stderr: {}", name, e);
            }
            String::from_utf8_lossy(&buf).into_owned()
        });

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Failed to start {} stderr reader: {}", name, e);
            None
        }
    }
}

/// Speech capability driving a `SpeechProgram`
pub struct CommandEngine<P: SpeechProgram> {
    program: P,
    settings: RwLock<EngineSettings>,
    playback: Mutex<Option<Playback>>,
    next_id: AtomicU64,
}

impl<P: SpeechProgram> CommandEngine<P> {
    pub fn new(program: P) -> Self {
        Self {
            program,
            settings: RwLock::new(EngineSettings::default()),
            playback: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Snapshot of the current settings
    pub fn settings(&self) -> EngineSettings {
        self.settings.read().clone()
    }

    /// Check if an utterance is currently playing
    pub fn is_speaking(&self) -> bool {
        self.playback.lock().is_some()
    }

    fn start(&self, text: &str) -> Result<u64, SpeechError> {
        let settings = self.settings();
        let input = self.program.speech_input(text, &settings);

        let (id, stdin) = {
            let mut slot = self.playback.lock();
            if slot.is_some() {
                return Err(SpeechError::Busy);
            }

            let mut command = self.program.speak_command(&settings);
            command
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::piped());

            let mut child = command.spawn().map_err(|e| {
                SpeechError::Engine(format!("Failed to start {}: {}", self.program.name(), e))
            })?;
            let stdin = child.stdin.take();
            let stderr = child
                .stderr
                .take()
                .and_then(|pipe| drain_stderr(self.program.name(), pipe));
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            *slot = Some(Playback { id, child, stderr });
            (id, stdin)
        };

        if let Some(mut stdin) = stdin {
            // The process may exit (or be stopped) before reading everything
            if let Err(e) = stdin.write_all(input.as_bytes()) {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    self.stop()?;
                    return Err(SpeechError::Io(e));
                }
            }
        }

        Ok(id)
    }

    fn wait(&self, id: u64) -> Result<(), SpeechError> {
        loop {
            {
                let mut slot = self.playback.lock();
                let status = match slot.as_mut() {
                    Some(playback) if playback.id == id => playback.child.try_wait()?,
                    _ => {
                        debug!("{} playback {} stopped", self.program.name(), id);
                        return Ok(());
                    }
                };

                if let Some(status) = status {
                    let finished = slot.take();
                    drop(slot);
                    return self.check_exit(status, finished);
                }
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn check_exit(&self, status: ExitStatus, finished: Option<Playback>) -> Result<(), SpeechError> {
        if status.success() {
            return Ok(());
        }

        let stderr = finished
            .and_then(|playback| playback.stderr)
            .and_then(|reader| reader.join().ok())
            .unwrap_or_default();

        Err(SpeechError::Engine(format!(
            "{} exited with {}: {}",
            self.program.name(),
            status,
            stderr.trim()
        )))
    }
}

impl<P: SpeechProgram> SpeechCapability for CommandEngine<P> {
    fn name(&self) -> &'static str {
        self.program.name()
    }

    fn is_available(&self) -> bool {
        self.program
            .voices_command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn voices(&self) -> Result<Vec<Voice>, SpeechError> {
        let output = self
            .program
            .voices_command()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                SpeechError::Engine(format!("Failed to list {} voices: {}", self.program.name(), e))
            })?;

        if !output.status.success() {
            return Err(SpeechError::Engine(format!(
                "{} voice listing failed: {}",
                self.program.name(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let mut voices = self
            .program
            .parse_voices(&String::from_utf8_lossy(&output.stdout));
        voices.truncate(MAX_VOICES);
        debug!("{} reported {} voices", self.program.name(), voices.len());
        Ok(voices)
    }

    fn property(&self, property: Property) -> Result<PropertyValue, SpeechError> {
        let settings = self.settings.read();
        match property {
            Property::Rate => Ok(PropertyValue::Rate(settings.rate)),
            Property::Volume => Ok(PropertyValue::Volume(settings.volume)),
            Property::Voice => settings
                .voice
                .clone()
                .map(PropertyValue::Voice)
                .ok_or_else(|| {
                    SpeechError::Engine(format!("No voice selected on {}", self.program.name()))
                }),
        }
    }

    fn set_property(&self, value: PropertyValue) -> Result<(), SpeechError> {
        let mut settings = self.settings.write();
        match value {
            PropertyValue::Rate(rate) => settings.rate = rate,
            PropertyValue::Volume(volume) => settings.volume = volume,
            PropertyValue::Voice(id) => settings.voice = Some(id),
        }
        Ok(())
    }

    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let id = self.start(text)?;
        debug!("{} playback {} started", self.program.name(), id);
        self.wait(id)
    }

    fn stop(&self) -> Result<(), SpeechError> {
        let playback = self.playback.lock().take();
        if let Some(mut playback) = playback {
            debug!("Stopping {} playback {}", self.program.name(), playback.id);
            if let Err(e) = playback.child.kill() {
                // Already exited
                if e.kind() != std::io::ErrorKind::InvalidInput {
                    return Err(SpeechError::Io(e));
                }
            }
            playback.child.wait()?;
        }
        Ok(())
    }
}

impl<P: SpeechProgram> Drop for CommandEngine<P> {
    fn drop(&mut self) {
        if let Some(mut playback) = self.playback.get_mut().take() {
            let _ = playback.child.kill();
            let _ = playback.child.wait();
        }
    }
}
