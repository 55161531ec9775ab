//! In-memory speech capability for controller tests

#![allow(dead_code)]

use narayana_spk::engines::{Property, PropertyValue, SpeechCapability, Voice};
use narayana_spk::error::SpeechError;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Set(PropertyValue),
    Speak(String),
    Completed,
    Stop,
}

#[derive(Default)]
struct FakeState {
    voices: Vec<Voice>,
    rate: i32,
    volume: f32,
    voice: Option<String>,
    events: Vec<Event>,
    gated: bool,
    playing: bool,
    speak_error: Option<String>,
}

#[derive(Default)]
struct Inner {
    state: Mutex<FakeState>,
    changed: Condvar,
}

/// Test-side handle onto a `FakeCapability`
#[derive(Clone, Default)]
pub struct FakeHandle {
    inner: Arc<Inner>,
}

impl FakeHandle {
    pub fn events(&self) -> Vec<Event> {
        self.inner.state.lock().events.clone()
    }

    pub fn clear_events(&self) {
        self.inner.state.lock().events.clear();
    }

    pub fn rate(&self) -> i32 {
        self.inner.state.lock().rate
    }

    pub fn volume(&self) -> f32 {
        self.inner.state.lock().volume
    }

    pub fn voice(&self) -> Option<String> {
        self.inner.state.lock().voice.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.inner.state.lock().playing
    }

    /// Replace the engine's voices (a controller keeps its own snapshot)
    pub fn set_voices(&self, voices: Vec<Voice>) {
        self.inner.state.lock().voices = voices;
    }

    pub fn fail_speak(&self, message: &str) {
        self.inner.state.lock().speak_error = Some(message.to_string());
    }

    /// Block until a gated `speak` is in progress
    pub fn wait_until_playing(&self) {
        let mut state = self.inner.state.lock();
        while !state.playing {
            let result = self.inner.changed.wait_for(&mut state, Duration::from_secs(5));
            if result.timed_out() && !state.playing {
                panic!("speak never started");
            }
        }
    }

    /// Signal that the gated utterance has finished playing
    pub fn complete(&self) {
        let mut state = self.inner.state.lock();
        if state.playing {
            state.events.push(Event::Completed);
            state.playing = false;
            self.inner.changed.notify_all();
        }
    }
}

/// Speech capability that records every call
pub struct FakeCapability {
    handle: FakeHandle,
}

impl FakeCapability {
    /// Capability whose `speak` returns immediately
    pub fn new(voices: &[(&str, &str)]) -> (Box<dyn SpeechCapability>, FakeHandle) {
        Self::build(voices, false)
    }

    /// Capability whose `speak` blocks until `FakeHandle::complete` or `stop`
    pub fn gated(voices: &[(&str, &str)]) -> (Box<dyn SpeechCapability>, FakeHandle) {
        Self::build(voices, true)
    }

    fn build(voices: &[(&str, &str)], gated: bool) -> (Box<dyn SpeechCapability>, FakeHandle) {
        let handle = FakeHandle::default();
        {
            let mut state = handle.inner.state.lock();
            state.voices = voices
                .iter()
                .map(|(name, id)| Voice::new(*id, *name))
                .collect();
            state.gated = gated;
        }
        let capability: Box<dyn SpeechCapability> = Box::new(FakeCapability {
            handle: handle.clone(),
        });
        (capability, handle)
    }
}

impl SpeechCapability for FakeCapability {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn voices(&self) -> Result<Vec<Voice>, SpeechError> {
        Ok(self.handle.inner.state.lock().voices.clone())
    }

    fn property(&self, property: Property) -> Result<PropertyValue, SpeechError> {
        let state = self.handle.inner.state.lock();
        match property {
            Property::Rate => Ok(PropertyValue::Rate(state.rate)),
            Property::Volume => Ok(PropertyValue::Volume(state.volume)),
            Property::Voice => state
                .voice
                .clone()
                .map(PropertyValue::Voice)
                .ok_or_else(|| SpeechError::Engine("no voice".to_string())),
        }
    }

    fn set_property(&self, value: PropertyValue) -> Result<(), SpeechError> {
        let mut state = self.handle.inner.state.lock();
        match &value {
            PropertyValue::Rate(rate) => state.rate = *rate,
            PropertyValue::Volume(volume) => state.volume = *volume,
            PropertyValue::Voice(id) => state.voice = Some(id.clone()),
        }
        state.events.push(Event::Set(value));
        Ok(())
    }

    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let inner = &self.handle.inner;
        let mut state = inner.state.lock();
        if let Some(message) = state.speak_error.clone() {
            return Err(SpeechError::Engine(message));
        }

        state.events.push(Event::Speak(text.to_string()));
        if !state.gated {
            state.events.push(Event::Completed);
            return Ok(());
        }

        state.playing = true;
        inner.changed.notify_all();
        while state.playing {
            inner.changed.wait(&mut state);
        }
        Ok(())
    }

    fn stop(&self) -> Result<(), SpeechError> {
        let inner = &self.handle.inner;
        let mut state = inner.state.lock();
        state.events.push(Event::Stop);
        if state.playing {
            state.playing = false;
            inner.changed.notify_all();
        }
        Ok(())
    }
}
