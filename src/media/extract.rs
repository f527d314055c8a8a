//! Audio extraction stage.
//!
//! Demuxes and decodes the audio track of a video into a PCM WAV file
//! that the transcriber can submit to the ASR service.

use crate::error::{DubError, Result};
use crate::media::probe::has_audio_stream;
use crate::media::runner::CommandExecutor;
use std::fs;
use std::path::Path;

/// Extract the audio track of `video` into a WAV file at `wav_out`.
///
/// Preconditions are checked up front so the error names the actual
/// problem rather than whatever ffmpeg prints:
/// - the input file must exist,
/// - it must contain at least one audio stream.
///
/// The output file is overwritten if it already exists.
pub fn extract_audio(executor: &dyn CommandExecutor, video: &Path, wav_out: &Path) -> Result<()> {
    if !video.exists() {
        return Err(DubError::Extraction {
            message: format!("input video not found: {}", video.display()),
        });
    }

    let has_audio = has_audio_stream(executor, video).map_err(|e| DubError::Extraction {
        message: format!("could not probe {}: {}", video.display(), e),
    })?;
    if !has_audio {
        return Err(DubError::Extraction {
            message: format!("no audio stream in {}", video.display()),
        });
    }

    if let Some(parent) = wav_out.parent() {
        fs::create_dir_all(parent)?;
    }

    let video_str = video.to_string_lossy();
    let wav_str = wav_out.to_string_lossy();
    executor
        .execute("ffmpeg", &["-y", "-i", &video_str, &wav_str])
        .map_err(|e| DubError::Extraction {
            message: e.to_string(),
        })?;

    if !wav_out.exists() {
        return Err(DubError::Extraction {
            message: format!("ffmpeg produced no output at {}", wav_out.display()),
        });
    }

    Ok(())
}
