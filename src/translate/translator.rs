//! Translator trait for segment text translation.

use crate::error::{DubError, Result};
use crate::languages::Language;
use crate::segment::Segment;

/// Trait for translating transcript segments.
///
/// Implementations translate the text of every segment into the target
/// language while leaving timing and speaker attribution untouched. The
/// output must have exactly one segment per input segment, in order.
pub trait Translator: Send + 'static {
    fn translate_segments(
        &mut self,
        segments: &[Segment],
        target: &Language,
    ) -> Result<Vec<Segment>>;

    /// Return the name of this translator for logging.
    fn name(&self) -> &str;
}

/// Translator that returns segments unchanged.
///
/// Used when the source and target language are the same, which re-voices
/// the original dialogue without translation.
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate_segments(
        &mut self,
        segments: &[Segment],
        _target: &Language,
    ) -> Result<Vec<Segment>> {
        Ok(segments.to_vec())
    }

    fn name(&self) -> &str {
        "identity"
    }
}

enum MockOutcome {
    Prefix(String),
    Failure(String),
}

/// Mock translator for testing.
///
/// By default prefixes each segment's text with the target language code
/// so tests can assert the translation actually ran.
pub struct MockTranslator {
    outcome: MockOutcome,
    pub calls: usize,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self {
            outcome: MockOutcome::Prefix(String::new()),
            calls: 0,
        }
    }

    /// Translator that prefixes every segment text with `prefix`.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            outcome: MockOutcome::Prefix(prefix.to_string()),
            calls: 0,
        }
    }

    /// Translator that fails with a translation error.
    pub fn with_failure(message: &str) -> Self {
        Self {
            outcome: MockOutcome::Failure(message.to_string()),
            calls: 0,
        }
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for MockTranslator {
    fn translate_segments(
        &mut self,
        segments: &[Segment],
        target: &Language,
    ) -> Result<Vec<Segment>> {
        self.calls += 1;
        match &self.outcome {
            MockOutcome::Prefix(prefix) => Ok(segments
                .iter()
                .map(|s| {
                    let mut out = s.clone();
                    if prefix.is_empty() {
                        out.text = format!("[{}] {}", target.code, s.text);
                    } else {
                        out.text = format!("{}{}", prefix, s.text);
                    }
                    out
                })
                .collect()),
            MockOutcome::Failure(message) => Err(DubError::Translation {
                message: message.clone(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
