//! Dub track assembly.
//!
//! Turns per-segment TTS clips into one continuous audio track: each
//! clip is delayed to its utterance's start time and mixed over a silent
//! base whose length equals the source audio, so the assembled track
//! always spans the full video even when speech is sparse.

use crate::defaults;
use crate::error::{DubError, Result};
use crate::media::probe::media_duration;
use crate::media::runner::CommandExecutor;
use std::fs;
use std::path::{Path, PathBuf};

/// One synthesized clip positioned on the source timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedClip {
    pub path: PathBuf,
    /// Start time in the source audio, in seconds.
    pub start: f64,
}

/// Speed up a TTS clip that overruns its source slot.
///
/// If the clip is more than 5% longer than the slot (and the slot is
/// long enough to matter), re-encode it with `atempo` capped at
/// [`defaults::ATEMPO_MAX`] and return the path of the adjusted clip.
/// Otherwise the original path is returned untouched.
pub fn adjust_tempo(
    executor: &dyn CommandExecutor,
    clip: &Path,
    slot_secs: f64,
) -> Result<PathBuf> {
    let clip_secs = media_duration(executor, clip).map_err(|e| DubError::Synthesis {
        message: format!("could not probe TTS clip {}: {}", clip.display(), e),
    })?;

    if clip_secs <= slot_secs * defaults::ATEMPO_SLACK || slot_secs <= defaults::MIN_SLOT_SECS {
        return Ok(clip.to_path_buf());
    }

    let factor = (clip_secs / slot_secs).min(defaults::ATEMPO_MAX);
    let adjusted = tempo_output_path(clip);

    let clip_str = clip.to_string_lossy();
    let adjusted_str = adjusted.to_string_lossy();
    let filter = format!("atempo={:.4}", factor);
    executor
        .execute(
            "ffmpeg",
            &["-y", "-i", &clip_str, "-filter:a", &filter, "-vn", &adjusted_str],
        )
        .map_err(|e| DubError::Synthesis {
            message: format!("tempo adjustment failed for {}: {}", clip.display(), e),
        })?;

    if !adjusted.exists() {
        return Err(DubError::Synthesis {
            message: format!("ffmpeg produced no output at {}", adjusted.display()),
        });
    }

    Ok(adjusted)
}

/// Sibling path for the tempo-adjusted variant of a clip.
fn tempo_output_path(clip: &Path) -> PathBuf {
    let stem = clip
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "clip".to_string());
    let ext = clip
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp3".to_string());
    clip.with_file_name(format!("{}_fast.{}", stem, ext))
}

/// Build the `-filter_complex` graph for mixing `delays_ms.len()` clips.
///
/// Input 0 is the silent base; clips are inputs 1..=n. Each clip is
/// normalized to the mix format, delayed to its start time, mixed into a
/// dialogue bus, boosted, and mixed against the base with
/// `duration=first` so the base's length wins.
fn build_mix_filter(delays_ms: &[u64]) -> String {
    let mut parts = Vec::with_capacity(delays_ms.len() + 3);
    let mut dialogue_inputs = String::new();

    for (i, delay) in delays_ms.iter().enumerate() {
        parts.push(format!(
            "[{}:a]aformat=sample_rates={}:channel_layouts={},adelay={}|{}[seg{}]",
            i + 1,
            defaults::MIX_SAMPLE_RATE,
            defaults::MIX_CHANNEL_LAYOUT,
            delay,
            delay,
            i
        ));
        dialogue_inputs.push_str(&format!("[seg{}]", i));
    }

    parts.push(format!(
        "{}amix=inputs={}:dropout_transition=0[dialogue]",
        dialogue_inputs,
        delays_ms.len()
    ));
    parts.push(format!("[dialogue]volume={}[dialogue_loud]", defaults::DIALOGUE_GAIN));
    parts.push("[0:a][dialogue_loud]amix=inputs=2:duration=first:dropout_transition=0[out]".to_string());

    parts.join(";")
}

/// Assemble timed clips into one AAC track of `base_secs` length.
///
/// With no clips, the output is a silent track of the full length.
pub fn assemble_track(
    executor: &dyn CommandExecutor,
    clips: &[TimedClip],
    base_secs: f64,
    output: &Path,
) -> Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }

    let base_input = format!(
        "anullsrc=r={}:cl={}",
        defaults::MIX_SAMPLE_RATE,
        defaults::MIX_CHANNEL_LAYOUT
    );
    let base_secs_str = format!("{:.3}", base_secs);
    let output_str = output.to_string_lossy().into_owned();

    let mut args: Vec<String> = vec![
        "-y".into(),
        "-f".into(),
        "lavfi".into(),
        "-t".into(),
        base_secs_str,
        "-i".into(),
        base_input,
    ];

    for clip in clips {
        args.push("-i".into());
        args.push(clip.path.to_string_lossy().into_owned());
    }

    if clips.is_empty() {
        // Nothing to mix; encode the silent base directly.
        args.extend(["-c:a".into(), "aac".into()]);
    } else {
        let delays_ms: Vec<u64> = clips
            .iter()
            .map(|c| (c.start.max(0.0) * 1000.0) as u64)
            .collect();
        args.extend([
            "-filter_complex".into(),
            build_mix_filter(&delays_ms),
            "-map".into(),
            "[out]".into(),
            "-c:a".into(),
            "aac".into(),
        ]);
    }

    args.extend([
        "-b:a".into(),
        defaults::MIX_AUDIO_BITRATE.into(),
        output_str,
    ]);

    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    executor
        .execute("ffmpeg", &arg_refs)
        .map_err(|e| DubError::Synthesis {
            message: format!("dub track assembly failed: {}", e),
        })?;

    if !output.exists() {
        return Err(DubError::Synthesis {
            message: format!("ffmpeg produced no output at {}", output.display()),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeFfmpeg {
        probe_secs: f64,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeFfmpeg {
        fn new(probe_secs: f64) -> Self {
            Self {
                probe_secs,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn last_ffmpeg_args(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|c| c[0] == "ffmpeg")
                .cloned()
                .unwrap()
        }
    }

    impl CommandExecutor for FakeFfmpeg {
        fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
            let mut call = vec![command.to_string()];
            call.extend(args.iter().map(|s| s.to_string()));
            self.calls.lock().unwrap().push(call);
            match command {
                "ffprobe" => Ok(format!("{}\n", self.probe_secs)),
                "ffmpeg" => {
                    if let Some(out) = args.last() {
                        fs::write(out, b"").unwrap();
                    }
                    Ok(String::new())
                }
                other => panic!("unexpected command: {}", other),
            }
        }
    }

    #[test]
    fn clip_within_slot_is_untouched() {
        let executor = FakeFfmpeg::new(2.0);
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("segment_0.mp3");
        fs::write(&clip, b"").unwrap();

        let adjusted = adjust_tempo(&executor, &clip, 2.0).unwrap();

        assert_eq!(adjusted, clip);
        // Only the probe ran
        assert_eq!(executor.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn overlong_clip_is_sped_up() {
        let executor = FakeFfmpeg::new(3.0);
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("segment_0.mp3");
        fs::write(&clip, b"").unwrap();

        let adjusted = adjust_tempo(&executor, &clip, 2.0).unwrap();

        assert_eq!(adjusted, dir.path().join("segment_0_fast.mp3"));
        let args = executor.last_ffmpeg_args();
        // 3.0 / 2.0 = 1.5, capped at 1.3
        assert!(args.contains(&"atempo=1.3000".to_string()));
    }

    #[test]
    fn tempo_factor_below_cap_is_exact() {
        let executor = FakeFfmpeg::new(2.4);
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("seg.mp3");
        fs::write(&clip, b"").unwrap();

        adjust_tempo(&executor, &clip, 2.0).unwrap();

        let args = executor.last_ffmpeg_args();
        assert!(args.contains(&"atempo=1.2000".to_string()));
    }

    #[test]
    fn short_slot_is_never_adjusted() {
        let executor = FakeFfmpeg::new(2.0);
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("seg.mp3");
        fs::write(&clip, b"").unwrap();

        let adjusted = adjust_tempo(&executor, &clip, 0.3).unwrap();

        assert_eq!(adjusted, clip);
    }

    #[test]
    fn mix_filter_delays_and_buses() {
        let filter = build_mix_filter(&[0, 2500]);

        assert!(filter.contains("[1:a]aformat=sample_rates=44100:channel_layouts=stereo,adelay=0|0[seg0]"));
        assert!(filter.contains("[2:a]aformat=sample_rates=44100:channel_layouts=stereo,adelay=2500|2500[seg1]"));
        assert!(filter.contains("[seg0][seg1]amix=inputs=2:dropout_transition=0[dialogue]"));
        assert!(filter.contains("[dialogue]volume=2[dialogue_loud]"));
        assert!(filter.ends_with(
            "[0:a][dialogue_loud]amix=inputs=2:duration=first:dropout_transition=0[out]"
        ));
    }

    #[test]
    fn assemble_track_builds_silent_base_of_source_length() {
        let executor = FakeFfmpeg::new(0.0);
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("segment_0.mp3");
        fs::write(&clip, b"").unwrap();
        let output = dir.path().join("dubbed.aac");

        let clips = vec![TimedClip {
            path: clip,
            start: 1.25,
        }];
        assemble_track(&executor, &clips, 10.0, &output).unwrap();

        assert!(output.exists());
        let args = executor.last_ffmpeg_args();
        assert!(args.contains(&"lavfi".to_string()));
        assert!(args.contains(&"10.000".to_string()));
        assert!(args.contains(&"anullsrc=r=44100:cl=stereo".to_string()));
        assert!(args.contains(&"192k".to_string()));

        let filter_idx = args.iter().position(|a| a == "-filter_complex").unwrap();
        assert!(args[filter_idx + 1].contains("adelay=1250|1250"));
    }

    #[test]
    fn assemble_track_without_clips_encodes_silence() {
        let executor = FakeFfmpeg::new(0.0);
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("dubbed.aac");

        assemble_track(&executor, &[], 7.5, &output).unwrap();

        assert!(output.exists());
        let args = executor.last_ffmpeg_args();
        assert!(!args.contains(&"-filter_complex".to_string()));
        assert!(args.contains(&"7.500".to_string()));
        assert!(args.contains(&"aac".to_string()));
    }
}
