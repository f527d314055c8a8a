//! redub - Video dubbing for Indian languages
//!
//! Extracts a video's dialogue, transcribes it, translates it, voices
//! it with synthesized speech, and remuxes the result back into the
//! video.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod asr;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
#[cfg(feature = "cli")]
pub mod diagnostics;
pub mod error;
pub mod languages;
pub mod media;
pub mod output;
pub mod pipeline;
pub mod segment;
pub mod translate;
pub mod tts;

// Composition root
pub mod app;

// Core traits (one per pipeline seam)
pub use asr::Transcriber;
pub use media::runner::{CommandExecutor, SystemCommandExecutor};
pub use translate::Translator;
pub use tts::Synthesizer;

// Pipeline
pub use pipeline::{DubReport, Dubber, RunPaths, Stage};

// Error handling
pub use error::{DubError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
