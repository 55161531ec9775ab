//! Voice snapshot taken when a controller is created

use crate::engines::Voice;
use indexmap::IndexMap;

/// Ordered voice name → voice mapping.
///
/// Keeps the order the engine reported. A repeated name keeps its first
/// position and takes the later identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoiceCatalog {
    voices: IndexMap<String, Voice>,
}

impl VoiceCatalog {
    pub fn new(voices: impl IntoIterator<Item = Voice>) -> Self {
        let mut map = IndexMap::new();
        for voice in voices {
            map.insert(voice.name.clone(), voice);
        }
        Self { voices: map }
    }

    /// Identifier of the voice called `name`
    pub fn id(&self, name: &str) -> Option<&str> {
        self.voices.get(name).map(|voice| voice.id.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.voices.contains_key(name)
    }

    /// First voice the engine reported
    pub fn first(&self) -> Option<&Voice> {
        self.voices.values().next()
    }

    /// Voice names in engine order
    pub fn names(&self) -> Vec<String> {
        self.voices.keys().cloned().collect()
    }

    /// (name, identifier) pairs in engine order
    pub fn ids(&self) -> impl Iterator<Item = (&str, &str)> {
        self.voices
            .iter()
            .map(|(name, voice)| (name.as_str(), voice.id.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.values()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}
