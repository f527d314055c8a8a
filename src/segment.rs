//! Transcript segments.
//!
//! A segment is one timestamped utterance: where it starts and ends in
//! the source audio, which speaker said it, and what was said. Segments
//! are the unit of handoff between the transcribe, translate, and
//! synthesize stages, and are persisted as JSON between runs.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One timestamped utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in the source audio, in seconds.
    pub start: f64,
    /// End time in the source audio, in seconds.
    pub end: f64,
    /// Speaker index from diarization (0 when diarization is unavailable).
    #[serde(default)]
    pub speaker: u32,
    /// Utterance text (source or target language depending on stage).
    pub text: String,
}

impl Segment {
    /// Duration of the source slot in seconds. Never negative.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Render segments as a human-readable transcript, one line per utterance.
pub fn render_transcript(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| format!("[Speaker {}] {}", s.speaker, s.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Persist segments as pretty-printed JSON, creating parent directories.
pub fn save_segments(path: &Path, segments: &[Segment]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(segments)
        .map_err(|e| crate::error::DubError::Other(format!("Serialize segments: {e}")))?;
    fs::write(path, json)?;
    Ok(())
}

/// Load segments from a JSON file written by [`save_segments`].
pub fn load_segments(path: &Path) -> Result<Vec<Segment>> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| crate::error::DubError::Other(format!("Parse segments {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_segments() -> Vec<Segment> {
        vec![
            Segment {
                start: 0.0,
                end: 2.5,
                speaker: 0,
                text: "Hello there.".to_string(),
            },
            Segment {
                start: 2.5,
                end: 5.0,
                speaker: 1,
                text: "Hi, how are you?".to_string(),
            },
        ]
    }

    #[test]
    fn duration_is_end_minus_start() {
        let seg = Segment {
            start: 1.5,
            end: 4.0,
            speaker: 0,
            text: "x".to_string(),
        };
        assert!((seg.duration() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn duration_never_negative() {
        let seg = Segment {
            start: 5.0,
            end: 2.0,
            speaker: 0,
            text: "x".to_string(),
        };
        assert_eq!(seg.duration(), 0.0);
    }

    #[test]
    fn render_transcript_one_line_per_segment() {
        let rendered = render_transcript(&sample_segments());
        assert_eq!(
            rendered,
            "[Speaker 0] Hello there.\n[Speaker 1] Hi, how are you?"
        );
    }

    #[test]
    fn render_transcript_empty_input() {
        assert_eq!(render_transcript(&[]), "");
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("transcript.json");
        let segments = sample_segments();

        save_segments(&path, &segments).unwrap();
        let loaded = load_segments(&path).unwrap();

        assert_eq!(loaded, segments);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = load_segments(Path::new("/nonexistent/transcript.json"));
        assert!(matches!(result, Err(crate::error::DubError::Io(_))));
    }

    #[test]
    fn load_invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "not json").unwrap();

        assert!(load_segments(&path).is_err());
    }

    #[test]
    fn speaker_defaults_to_zero_when_absent() {
        let json = r#"[{"start": 0.0, "end": 1.0, "text": "hi"}]"#;
        let segments: Vec<Segment> = serde_json::from_str(json).unwrap();
        assert_eq!(segments[0].speaker, 0);
    }
}
