//! Basic speech example

use narayana_spk::{engines, SpeechConfig, SpeechController};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut config = SpeechConfig::default();
    config.rate = 150;
    config.volume = 0.8;

    let engine = engines::open(&config)?;
    let mut controller = SpeechController::from_config(engine, &config)?;

    println!("Available voices:");
    for voice in controller.voices().iter() {
        println!("  {} ({})", voice.name, voice.id);
    }

    println!("{}", controller.describe()?);
    controller.speak("Hello, I am a robot. I can speak using text to speech synthesis.")?;

    controller.set_speech_rate(220)?;
    controller.speak("And now a little faster.")?;

    Ok(())
}
