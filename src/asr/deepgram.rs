//! Deepgram speech-to-text client.
//!
//! Posts the extracted WAV to Deepgram's pre-recorded endpoint with
//! diarization and utterance splitting, and maps the response into the
//! pipeline's segment model. Utterance timestamps come straight from
//! the service; when utterances are missing the flat channel transcript
//! is used as a single untimed segment.

use crate::asr::transcriber::Transcriber;
use crate::config::{AsrConfig, NetworkConfig};
use crate::error::{DubError, Result};
use crate::segment::Segment;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEEPGRAM_API_URL: &str = "https://api.deepgram.com/v1/listen";

/// Deepgram-backed transcriber.
pub struct DeepgramTranscriber {
    api_key: Option<String>,
    model: String,
    diarize: bool,
    language: String,
    timeout: Duration,
    max_retries: u32,
    backoff: Duration,
    base_url: String,
}

impl DeepgramTranscriber {
    pub fn new(asr: &AsrConfig, network: &NetworkConfig, source_language: &str) -> Self {
        Self {
            api_key: asr.api_key.clone(),
            model: asr.model.clone(),
            diarize: asr.diarize,
            language: source_language.to_string(),
            timeout: network.timeout(),
            max_retries: network.max_retries,
            backoff: network.backoff(),
            base_url: DEEPGRAM_API_URL.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Credential check deferred to call time so construction never fails
    /// and the missing key surfaces at the transcription stage.
    fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(DubError::Authentication {
                message: "Deepgram API key not set (DEEPGRAM_API_KEY or [asr] api_key)"
                    .to_string(),
            }),
        }
    }

    async fn request(&self, audio: &[u8]) -> Result<DeepgramResponse> {
        let key = self.api_key()?;
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| DubError::Transcription {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        let diarize = if self.diarize { "true" } else { "false" };
        let query = [
            ("model", self.model.as_str()),
            ("language", self.language.as_str()),
            ("smart_format", "true"),
            ("punctuate", "true"),
            ("utterances", "true"),
            ("diarize", diarize),
        ];

        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.backoff).await;
            }

            let response = client
                .post(&self.base_url)
                .query(&query)
                .header("Authorization", format!("Token {}", key))
                .header("Content-Type", "audio/wav")
                .body(audio.to_vec())
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    if status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                    {
                        // Bad credentials never recover; do not retry.
                        return Err(DubError::Authentication {
                            message: format!("Deepgram rejected the API key ({})", status),
                        });
                    }
                    if status.is_success() {
                        return resp.json::<DeepgramResponse>().await.map_err(|e| {
                            DubError::Transcription {
                                message: format!("invalid Deepgram response: {}", e),
                            }
                        });
                    }
                    last_error = Some(format!("Deepgram returned {}", status));
                }
                Err(e) => {
                    last_error = Some(format!("Deepgram request failed: {}", e));
                }
            }
        }

        Err(DubError::Transcription {
            message: last_error.unwrap_or_else(|| "Deepgram request failed".to_string()),
        })
    }
}

#[async_trait]
impl Transcriber for DeepgramTranscriber {
    async fn transcribe(&self, audio: &Path) -> Result<Vec<Segment>> {
        self.api_key()?;

        // Validate the WAV before shipping it; a malformed file would
        // otherwise only fail remotely with an opaque 400.
        hound::WavReader::open(audio).map_err(|e| DubError::Transcription {
            message: format!("not a readable WAV file {}: {}", audio.display(), e),
        })?;

        let bytes = std::fs::read(audio)?;
        let response = self.request(&bytes).await?;
        segments_from_response(&response)
    }
}

/// Map a Deepgram response to timed segments.
///
/// Prefers utterances (timed, diarized). When the service returns none,
/// falls back to the flat channel transcript as a single zero-timed
/// segment. A response with no speech at all is `EmptyResult`.
fn segments_from_response(response: &DeepgramResponse) -> Result<Vec<Segment>> {
    if let Some(utterances) = &response.results.utterances
        && !utterances.is_empty()
    {
        let segments: Vec<Segment> = utterances
            .iter()
            .filter(|u| !u.transcript.trim().is_empty())
            .map(|u| Segment {
                start: u.start,
                end: u.end,
                speaker: u.speaker.unwrap_or(0),
                text: u.transcript.clone(),
            })
            .collect();
        if !segments.is_empty() {
            return Ok(segments);
        }
    }

    let flat = response
        .results
        .channels
        .first()
        .and_then(|c| c.alternatives.first())
        .map(|a| a.transcript.trim())
        .unwrap_or("");

    if flat.is_empty() {
        return Err(DubError::EmptyResult);
    }

    Ok(vec![Segment {
        start: 0.0,
        end: 0.0,
        speaker: 0,
        text: flat.to_string(),
    }])
}

#[derive(Debug, Deserialize)]
struct DeepgramResponse {
    results: DgResults,
}

#[derive(Debug, Deserialize)]
struct DgResults {
    #[serde(default)]
    utterances: Option<Vec<DgUtterance>>,
    #[serde(default)]
    channels: Vec<DgChannel>,
}

#[derive(Debug, Deserialize)]
struct DgUtterance {
    start: f64,
    end: f64,
    transcript: String,
    #[serde(default)]
    speaker: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DgChannel {
    #[serde(default)]
    alternatives: Vec<DgAlternative>,
}

#[derive(Debug, Deserialize)]
struct DgAlternative {
    #[serde(default)]
    transcript: String,
}
