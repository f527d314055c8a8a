//! Default configuration constants for redub.
//!
//! Shared constants used across configuration types and pipeline stages
//! to ensure consistency and eliminate duplication.

/// Default source language code.
///
/// The cloud ASR model is tuned for English input; change this if the
/// source material is in another language the provider supports.
pub const DEFAULT_SOURCE_LANGUAGE: &str = "en";

/// Default target language code (Hindi).
pub const DEFAULT_TARGET_LANGUAGE: &str = "hi";

/// Sample rate of the assembled dub track in Hz.
///
/// 44.1kHz stereo matches the TTS provider's MP3 output format, so the
/// mix stage never resamples synthesized speech.
pub const MIX_SAMPLE_RATE: u32 = 44_100;

/// Channel layout of the assembled dub track.
pub const MIX_CHANNEL_LAYOUT: &str = "stereo";

/// AAC bitrate for the assembled dub track.
pub const MIX_AUDIO_BITRATE: &str = "192k";

/// Gain applied to the mixed dialogue bus.
///
/// `amix` attenuates each input by the input count; this restores the
/// dialogue level after mixing against the silent base track.
pub const DIALOGUE_GAIN: f64 = 2.0;

/// Maximum tempo factor when speeding up an overlong TTS segment.
///
/// Above 1.3x, sped-up speech becomes noticeably unnatural.
pub const ATEMPO_MAX: f64 = 1.3;

/// Slack before a TTS segment is considered overlong.
///
/// A segment up to 5% longer than its source slot is left untouched.
pub const ATEMPO_SLACK: f64 = 1.05;

/// Minimum source slot duration eligible for tempo adjustment, in seconds.
///
/// Slots shorter than this produce degenerate tempo factors.
pub const MIN_SLOT_SECS: f64 = 0.5;

/// Maximum allowed divergence between video and dub-track durations
/// before the merge stage refuses to mux, in seconds.
///
/// `-shortest` clips the overhang anyway, so this only guards against
/// grossly mismatched inputs.
pub const MERGE_DURATION_TOLERANCE_SECS: f64 = 1.0;

/// Default network timeout for cloud ASR/TTS requests, in seconds.
pub const NETWORK_TIMEOUT_SECS: u64 = 30;

/// Default number of retries after a failed network request.
pub const NETWORK_MAX_RETRIES: u32 = 1;

/// Default delay before retrying a failed network request, in milliseconds.
pub const NETWORK_BACKOFF_MS: u64 = 500;

/// Courtesy delay between sequential TTS requests, in milliseconds.
///
/// The TTS provider's free tier throttles rapid-fire requests.
pub const TTS_SEGMENT_DELAY_MS: u64 = 500;

/// Subdirectory of the work dir for intermediate audio artifacts.
pub const AUDIO_SUBDIR: &str = "audio";

/// Subdirectory of the work dir for final output videos.
pub const OUTPUT_SUBDIR: &str = "output";

/// Subdirectory of the audio dir for per-segment TTS scratch files.
pub const TTS_SCRATCH_SUBDIR: &str = "tts-segments";
