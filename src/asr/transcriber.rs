//! Transcription abstraction.
//!
//! The `Transcriber` trait is the seam between the pipeline and the ASR
//! backend, enabling tests to run the whole pipeline without network
//! access.

use crate::error::{DubError, Result};
use crate::segment::Segment;
use async_trait::async_trait;
use std::path::Path;

/// Trait for speech-to-text backends.
///
/// Implementations take a WAV file and return timestamped,
/// speaker-attributed utterances in source order.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &Path) -> Result<Vec<Segment>>;
}

enum MockOutcome {
    Segments(Vec<Segment>),
    Empty,
    Failure(String),
}

/// Mock transcriber for testing.
pub struct MockTranscriber {
    outcome: MockOutcome,
}

impl MockTranscriber {
    /// Transcriber that returns the given segments.
    pub fn with_segments(segments: Vec<Segment>) -> Self {
        Self {
            outcome: MockOutcome::Segments(segments),
        }
    }

    /// Transcriber that finds no speech.
    pub fn with_empty() -> Self {
        Self {
            outcome: MockOutcome::Empty,
        }
    }

    /// Transcriber that fails with a transcription error.
    pub fn with_failure(message: &str) -> Self {
        Self {
            outcome: MockOutcome::Failure(message.to_string()),
        }
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio: &Path) -> Result<Vec<Segment>> {
        match &self.outcome {
            MockOutcome::Segments(segments) => Ok(segments.clone()),
            MockOutcome::Empty => Err(DubError::EmptyResult),
            MockOutcome::Failure(message) => Err(DubError::Transcription {
                message: message.clone(),
            }),
        }
    }
}
