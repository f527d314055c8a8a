//! Final remux stage.
//!
//! Replaces the video's audio track with the assembled dub track. Both
//! streams are copied, never re-encoded, so the only work is container
//! remuxing.

use crate::defaults;
use crate::error::{DubError, Result};
use crate::media::probe::media_duration;
use crate::media::runner::CommandExecutor;
use std::fs;
use std::path::Path;

/// Remux `video` with `audio` as its sole audio track into `output`.
///
/// The two inputs must agree on duration to within
/// [`defaults::MERGE_DURATION_TOLERANCE_SECS`]; a larger divergence
/// means an earlier stage produced a mis-sized track and the result
/// would drift, so the merge refuses to run.
pub fn merge_video(
    executor: &dyn CommandExecutor,
    video: &Path,
    audio: &Path,
    output: &Path,
) -> Result<()> {
    if !video.exists() {
        return Err(DubError::Merge {
            message: format!("input video not found: {}", video.display()),
        });
    }
    if !audio.exists() {
        return Err(DubError::Merge {
            message: format!("dub track not found: {}", audio.display()),
        });
    }

    let video_secs = media_duration(executor, video).map_err(|e| DubError::Merge {
        message: format!("could not probe {}: {}", video.display(), e),
    })?;
    let audio_secs = media_duration(executor, audio).map_err(|e| DubError::Merge {
        message: format!("could not probe {}: {}", audio.display(), e),
    })?;

    let divergence = (video_secs - audio_secs).abs();
    if divergence > defaults::MERGE_DURATION_TOLERANCE_SECS {
        return Err(DubError::Merge {
            message: format!(
                "video ({:.2}s) and dub track ({:.2}s) durations diverge by {:.2}s",
                video_secs, audio_secs, divergence
            ),
        });
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }

    let video_str = video.to_string_lossy();
    let audio_str = audio.to_string_lossy();
    let output_str = output.to_string_lossy();
    executor
        .execute(
            "ffmpeg",
            &[
                "-y",
                "-i",
                &video_str,
                "-i",
                &audio_str,
                "-map",
                "0:v:0",
                "-map",
                "1:a:0",
                "-c:v",
                "copy",
                "-c:a",
                "copy",
                "-shortest",
                &output_str,
            ],
        )
        .map_err(|e| DubError::Merge {
            message: e.to_string(),
        })?;

    if !output.exists() {
        return Err(DubError::Merge {
            message: format!("ffmpeg produced no output at {}", output.display()),
        });
    }

    Ok(())
}
