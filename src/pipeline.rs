//! The dubbing pipeline driver.
//!
//! Runs the stages in order — extract, transcribe, translate,
//! synthesize, assemble, merge — against injected stage backends, and
//! aborts on the first failure. Every intermediate artifact is written
//! under the run's work directory so a failed run leaves its evidence
//! behind.

use crate::asr::Transcriber;
use crate::defaults;
use crate::error::{DubError, Result};
use crate::languages::Language;
use crate::media::extract::extract_audio;
use crate::media::merge::merge_video;
use crate::media::mix::{TimedClip, adjust_tempo, assemble_track};
use crate::media::probe::media_duration;
use crate::media::runner::CommandExecutor;
use crate::output::Progress;
use crate::segment::{Segment, render_transcript, save_segments};
use crate::translate::Translator;
use crate::tts::Synthesizer;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extraction,
    Transcription,
    Translation,
    Synthesis,
    Assembly,
    Merge,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extraction => "extraction",
            Stage::Transcription => "transcription",
            Stage::Translation => "translation",
            Stage::Synthesis => "synthesis",
            Stage::Assembly => "assembly",
            Stage::Merge => "merge",
        };
        write!(f, "{}", name)
    }
}

impl DubError {
    /// The stage an error variant belongs to, where it is unambiguous.
    ///
    /// Authentication and subprocess errors can arise from more than one
    /// stage, so they map to `None`; the driver's progress output still
    /// names the stage that was running.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            DubError::Extraction { .. } => Some(Stage::Extraction),
            DubError::Transcription { .. } | DubError::EmptyResult => Some(Stage::Transcription),
            DubError::Translation { .. } | DubError::UnsupportedLanguage { .. } => {
                Some(Stage::Translation)
            }
            DubError::Synthesis { .. } => Some(Stage::Synthesis),
            DubError::Merge { .. } => Some(Stage::Merge),
            _ => None,
        }
    }
}

/// Per-stage wall-clock timings for a run.
#[derive(Debug, Default, Clone)]
pub struct StageTimings {
    entries: Vec<(Stage, Duration)>,
}

impl StageTimings {
    pub fn record(&mut self, stage: Stage, elapsed: Duration) {
        self.entries.push((stage, elapsed));
    }

    pub fn entries(&self) -> &[(Stage, Duration)] {
        &self.entries
    }

    pub fn total(&self) -> Duration {
        self.entries.iter().map(|(_, d)| *d).sum()
    }
}

/// Outcome of a successful dubbing run.
#[derive(Debug, Clone)]
pub struct DubReport {
    pub output_video: PathBuf,
    /// Human-readable rendering of the translated transcript.
    pub transcript: String,
    /// Number of segments that were actually voiced.
    pub segments: usize,
    pub timings: StageTimings,
}

/// Filesystem layout for one dubbing run.
///
/// All intermediates live under `<work_dir>/audio`, the final video
/// under `<work_dir>/output`, named after the input video's stem and
/// the target language.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPaths {
    pub original_audio: PathBuf,
    pub transcript: PathBuf,
    pub translated_transcript: PathBuf,
    pub tts_scratch: PathBuf,
    pub dub_track: PathBuf,
    pub output_video: PathBuf,
}

impl RunPaths {
    pub fn for_video(video: &Path, work_dir: &Path, target: &str) -> Self {
        let stem = video
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        let audio = work_dir.join(defaults::AUDIO_SUBDIR);
        let output = work_dir.join(defaults::OUTPUT_SUBDIR);

        Self {
            original_audio: audio.join(format!("{}_original.wav", stem)),
            transcript: audio.join(format!("{}_transcript.json", stem)),
            translated_transcript: audio.join(format!("{}_transcript_{}.json", stem, target)),
            tts_scratch: audio
                .join(defaults::TTS_SCRATCH_SUBDIR)
                .join(format!("{}_{}", stem, target)),
            dub_track: audio.join(format!("{}_dubbed_{}.aac", stem, target)),
            output_video: output.join(format!("{}_{}.mp4", stem, target)),
        }
    }

    /// Override the final video location (e.g., from `--output`).
    pub fn with_output_video(mut self, path: PathBuf) -> Self {
        self.output_video = path;
        self
    }
}

/// The pipeline driver.
///
/// Owns the stage backends and a run's path layout. `run` executes the
/// stages sequentially and stops at the first error; the stage that
/// failed is identifiable from the error variant.
pub struct Dubber {
    executor: Arc<dyn CommandExecutor>,
    transcriber: Arc<dyn Transcriber>,
    translator: Box<dyn Translator>,
    synthesizer: Arc<dyn Synthesizer>,
    target: &'static Language,
    paths: RunPaths,
    /// Courtesy delay between TTS requests to stay under rate limits.
    tts_delay: Duration,
    progress: Progress,
}

impl Dubber {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        transcriber: Arc<dyn Transcriber>,
        translator: Box<dyn Translator>,
        synthesizer: Arc<dyn Synthesizer>,
        target: &'static Language,
        paths: RunPaths,
        progress: Progress,
    ) -> Self {
        Self {
            executor,
            transcriber,
            translator,
            synthesizer,
            target,
            paths,
            tts_delay: Duration::from_millis(defaults::TTS_SEGMENT_DELAY_MS),
            progress,
        }
    }

    /// Override the inter-segment TTS delay (tests set this to zero).
    pub fn with_tts_delay(mut self, delay: Duration) -> Self {
        self.tts_delay = delay;
        self
    }

    pub fn paths(&self) -> &RunPaths {
        &self.paths
    }

    /// Run the full pipeline on `video`.
    pub async fn run(&mut self, video: &Path) -> Result<DubReport> {
        let mut timings = StageTimings::default();
        self.progress.banner(video, self.target);

        // Extraction
        self.progress.stage_start(Stage::Extraction);
        let started = Instant::now();
        let base_secs = self.finish(
            Stage::Extraction,
            started,
            &mut timings,
            self.extract(video),
        )?;

        // Transcription
        self.progress.stage_start(Stage::Transcription);
        let started = Instant::now();
        let transcription = self.transcribe().await;
        let segments = self.finish(Stage::Transcription, started, &mut timings, transcription)?;
        self.progress
            .detail(&format!("{} segments transcribed", segments.len()));

        // Translation
        self.progress.stage_start(Stage::Translation);
        let started = Instant::now();
        let translation = self.translate(&segments);
        let translated = self.finish(Stage::Translation, started, &mut timings, translation)?;

        // Synthesis
        self.progress.stage_start(Stage::Synthesis);
        let started = Instant::now();
        let synthesis = self.synthesize(&translated).await;
        let clips = self.finish(Stage::Synthesis, started, &mut timings, synthesis)?;
        let voiced = clips.len();

        // Assembly
        self.progress.stage_start(Stage::Assembly);
        let started = Instant::now();
        let assembly = assemble_track(
            self.executor.as_ref(),
            &clips,
            base_secs,
            &self.paths.dub_track,
        );
        self.finish(Stage::Assembly, started, &mut timings, assembly)?;

        // Merge
        self.progress.stage_start(Stage::Merge);
        let started = Instant::now();
        let merge = merge_video(
            self.executor.as_ref(),
            video,
            &self.paths.dub_track,
            &self.paths.output_video,
        );
        self.finish(Stage::Merge, started, &mut timings, merge)?;

        let report = DubReport {
            output_video: self.paths.output_video.clone(),
            transcript: render_transcript(&translated),
            segments: voiced,
            timings,
        };
        self.progress.report(&report);
        Ok(report)
    }

    fn finish<T>(
        &self,
        stage: Stage,
        started: Instant,
        timings: &mut StageTimings,
        result: Result<T>,
    ) -> Result<T> {
        match result {
            Ok(value) => {
                let elapsed = started.elapsed();
                timings.record(stage, elapsed);
                self.progress.stage_done(stage, elapsed);
                Ok(value)
            }
            Err(e) => {
                self.progress.stage_failed(stage, &e);
                Err(e)
            }
        }
    }

    /// Extract the source audio and return its duration.
    fn extract(&self, video: &Path) -> Result<f64> {
        extract_audio(self.executor.as_ref(), video, &self.paths.original_audio)?;
        media_duration(self.executor.as_ref(), &self.paths.original_audio)
    }

    async fn transcribe(&self) -> Result<Vec<Segment>> {
        let segments = self
            .transcriber
            .transcribe(&self.paths.original_audio)
            .await?;
        save_segments(&self.paths.transcript, &segments)?;
        Ok(segments)
    }

    fn translate(&mut self, segments: &[Segment]) -> Result<Vec<Segment>> {
        let translated = self.translator.translate_segments(segments, self.target)?;
        save_segments(&self.paths.translated_transcript, &translated)?;
        Ok(translated)
    }

    /// Voice each non-empty segment and fit overruns back into their slots.
    async fn synthesize(&self, segments: &[Segment]) -> Result<Vec<TimedClip>> {
        let mut clips = Vec::new();
        for (i, segment) in segments.iter().enumerate() {
            if segment.text.trim().is_empty() {
                continue;
            }

            let clip_path = self.paths.tts_scratch.join(format!("segment_{}.mp3", i));
            self.synthesizer
                .synthesize(&segment.text, segment.speaker, &clip_path)
                .await?;
            self.progress
                .detail(&format!("segment {} voiced (speaker {})", i, segment.speaker));

            if !self.tts_delay.is_zero() {
                tokio::time::sleep(self.tts_delay).await;
            }

            let fitted = adjust_tempo(self.executor.as_ref(), &clip_path, segment.duration())?;
            clips.push(TimedClip {
                path: fitted,
                start: segment.start,
            });
        }
        Ok(clips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_paths_derive_from_video_stem() {
        let paths = RunPaths::for_video(Path::new("/videos/lecture.mp4"), Path::new("/work"), "hi");

        assert_eq!(
            paths.original_audio,
            Path::new("/work/audio/lecture_original.wav")
        );
        assert_eq!(
            paths.transcript,
            Path::new("/work/audio/lecture_transcript.json")
        );
        assert_eq!(
            paths.translated_transcript,
            Path::new("/work/audio/lecture_transcript_hi.json")
        );
        assert_eq!(
            paths.tts_scratch,
            Path::new("/work/audio/tts-segments/lecture_hi")
        );
        assert_eq!(
            paths.dub_track,
            Path::new("/work/audio/lecture_dubbed_hi.aac")
        );
        assert_eq!(
            paths.output_video,
            Path::new("/work/output/lecture_hi.mp4")
        );
    }

    #[test]
    fn run_paths_output_override() {
        let paths = RunPaths::for_video(Path::new("a.mp4"), Path::new("."), "ta")
            .with_output_video(PathBuf::from("/tmp/custom.mp4"));
        assert_eq!(paths.output_video, Path::new("/tmp/custom.mp4"));
    }

    #[test]
    fn stage_display_names() {
        assert_eq!(Stage::Extraction.to_string(), "extraction");
        assert_eq!(Stage::Merge.to_string(), "merge");
    }

    #[test]
    fn unambiguous_errors_map_to_their_stage() {
        let err = DubError::Extraction {
            message: "x".to_string(),
        };
        assert_eq!(err.stage(), Some(Stage::Extraction));
        assert_eq!(DubError::EmptyResult.stage(), Some(Stage::Transcription));

        // Authentication can come from either network stage
        let err = DubError::Authentication {
            message: "x".to_string(),
        };
        assert_eq!(err.stage(), None);
    }

    #[test]
    fn timings_total_sums_entries() {
        let mut timings = StageTimings::default();
        timings.record(Stage::Extraction, Duration::from_secs(2));
        timings.record(Stage::Merge, Duration::from_secs(3));

        assert_eq!(timings.total(), Duration::from_secs(5));
        assert_eq!(timings.entries().len(), 2);
    }
}
