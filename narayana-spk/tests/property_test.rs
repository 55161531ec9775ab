//! Property tests for controller validation

mod common;

use common::FakeCapability;
use narayana_spk::error::SpeechError;
use narayana_spk::SpeechController;
use proptest::prelude::*;

const VOICES: &[(&str, &str)] = &[("Alice", "voice.alice"), ("Bob", "voice.bob"), ("Carol", "voice.carol")];

fn controller() -> SpeechController {
    let (engine, _fake) = FakeCapability::new(VOICES);
    SpeechController::new(engine).unwrap()
}

proptest! {
    #[test]
    fn test_positive_rate_round_trips(rate in 1i32..=i32::MAX) {
        let mut controller = controller();
        controller.set_speech_rate(rate).unwrap();
        prop_assert_eq!(controller.speech_rate().unwrap(), rate);
    }

    #[test]
    fn test_non_positive_rate_rejected(rate in i32::MIN..=0i32) {
        let mut controller = controller();
        let result = controller.set_speech_rate(rate);
        prop_assert!(matches!(result, Err(SpeechError::InvalidConfiguration(_))));
        prop_assert_eq!(controller.speech_rate().unwrap(), 200);
    }

    #[test]
    fn test_volume_in_range_accepted(volume in 0.0f32..=1.0f32) {
        let mut controller = controller();
        controller.set_volume(volume).unwrap();
        prop_assert_eq!(controller.volume().unwrap(), volume);
    }

    #[test]
    fn test_volume_above_range_rejected(volume in 1.000_001f32..1.0e6f32) {
        let mut controller = controller();
        let result = controller.set_volume(volume);
        prop_assert!(matches!(result, Err(SpeechError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_volume_below_range_rejected(volume in -1.0e6f32..-0.000_001f32) {
        let mut controller = controller();
        let result = controller.set_volume(volume);
        prop_assert!(matches!(result, Err(SpeechError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_known_voice_selected(index in 0usize..3) {
        let mut controller = controller();
        let name = VOICES[index].0;
        controller.set_voice(name).unwrap();
        let description = controller.describe().unwrap();
        let expected = format!("voice={})", name);
        prop_assert!(description.ends_with(&expected));
    }

    #[test]
    fn test_unknown_voice_rejected(name in "[a-z ]{1,16}") {
        let mut controller = controller();
        match controller.set_voice(&name) {
            Err(SpeechError::VoiceNotFound { name: missing, available }) => {
                prop_assert_eq!(missing, name);
                prop_assert_eq!(available, vec!["Alice", "Bob", "Carol"]);
            }
            other => prop_assert!(false, "expected VoiceNotFound, got {:?}", other),
        }
    }
}
