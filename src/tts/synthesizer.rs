//! Synthesis abstraction.

use crate::error::{DubError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for text-to-speech backends.
///
/// Implementations render `text` spoken by a voice chosen from the
/// diarized `speaker` index and write the encoded clip to `output`.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, speaker: u32, output: &Path) -> Result<()>;
}

/// Mock synthesizer for testing.
///
/// Writes a small dummy clip to the output path and counts invocations.
pub struct MockSynthesizer {
    fail_message: Option<String>,
    pub calls: AtomicUsize,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self {
            fail_message: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Synthesizer that fails with a synthesis error.
    pub fn with_failure(message: &str) -> Self {
        Self {
            fail_message: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str, _speaker: u32, output: &Path) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_message {
            return Err(DubError::Synthesis {
                message: message.clone(),
            });
        }
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output, text.as_bytes())?;
        Ok(())
    }
}
