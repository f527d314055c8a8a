//! Speech synthesis stage.

pub mod elevenlabs;
pub mod synthesizer;

pub use elevenlabs::ElevenLabsSynthesizer;
pub use synthesizer::{MockSynthesizer, Synthesizer};
