//! Media inspection via ffprobe.

use crate::error::{DubError, Result};
use crate::media::runner::CommandExecutor;
use std::path::Path;

/// Duration of a media file in seconds.
pub fn media_duration(executor: &dyn CommandExecutor, path: &Path) -> Result<f64> {
    let path_str = path.to_string_lossy();
    let stdout = executor.execute(
        "ffprobe",
        &[
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
            &path_str,
        ],
    )?;

    stdout
        .trim()
        .parse::<f64>()
        .map_err(|_| DubError::CommandFailed {
            message: format!(
                "ffprobe returned unparseable duration for {}: {:?}",
                path.display(),
                stdout.trim()
            ),
        })
}

/// Whether a media file contains at least one audio stream.
pub fn has_audio_stream(executor: &dyn CommandExecutor, path: &Path) -> Result<bool> {
    let path_str = path.to_string_lossy();
    let stdout = executor.execute(
        "ffprobe",
        &[
            "-v",
            "error",
            "-select_streams",
            "a",
            "-show_entries",
            "stream=index",
            "-of",
            "csv=p=0",
            &path_str,
        ],
    )?;

    Ok(!stdout.trim().is_empty())
}
