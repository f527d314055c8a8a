//! ElevenLabs text-to-speech client.
//!
//! Renders segment text with the multilingual voice model and writes
//! MP3 clips. Diarized speakers alternate between two stock voices so
//! two-party dialogue stays distinguishable in the dub.

use crate::config::{NetworkConfig, TtsConfig};
use crate::error::{DubError, Result};
use crate::tts::synthesizer::Synthesizer;
use async_trait::async_trait;
use serde_json::json;
use std::path::Path;
use std::time::Duration;

const ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io/v1/text-to-speech";
const OUTPUT_FORMAT: &str = "mp3_44100_128";

/// ElevenLabs-backed synthesizer.
pub struct ElevenLabsSynthesizer {
    api_key: Option<String>,
    model_id: String,
    voice_primary: String,
    voice_secondary: String,
    timeout: Duration,
    max_retries: u32,
    backoff: Duration,
    base_url: String,
}

impl ElevenLabsSynthesizer {
    pub fn new(tts: &TtsConfig, network: &NetworkConfig) -> Self {
        Self {
            api_key: tts.api_key.clone(),
            model_id: tts.model_id.clone(),
            voice_primary: tts.voice_primary.clone(),
            voice_secondary: tts.voice_secondary.clone(),
            timeout: network.timeout(),
            max_retries: network.max_retries,
            backoff: network.backoff(),
            base_url: ELEVENLABS_API_URL.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(DubError::Authentication {
                message: "ElevenLabs API key not set (ELEVENLABS_API_KEY or [tts] api_key)"
                    .to_string(),
            }),
        }
    }

    /// Voice for a diarized speaker index. Even speakers get the primary
    /// voice, odd ones the secondary, so alternating dialogue alternates
    /// voices.
    fn voice_for_speaker(&self, speaker: u32) -> &str {
        if speaker % 2 == 0 {
            &self.voice_primary
        } else {
            &self.voice_secondary
        }
    }

    async fn request(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        let key = self.api_key()?;
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| DubError::Synthesis {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        let url = format!("{}/{}", self.base_url, voice);
        let body = json!({
            "text": text,
            "model_id": self.model_id,
        });

        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.backoff).await;
            }

            let response = client
                .post(&url)
                .query(&[("output_format", OUTPUT_FORMAT)])
                .header("xi-api-key", key)
                .json(&body)
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
                            message: format!("ElevenLabs rejected the API key ({})", status),
                        });
                    }
                    if status.is_success() {
                        return resp
                            .bytes()
                            .await
                            .map(|b| b.to_vec())
                            .map_err(|e| DubError::Synthesis {
                                message: format!("failed to read audio body: {}", e),
                            });
                    }
                    last_error = Some(format!("ElevenLabs returned {}", status));
                }
                Err(e) => {
                    last_error = Some(format!("ElevenLabs request failed: {}", e));
                }
            }
        }

        Err(DubError::Synthesis {
            message: last_error.unwrap_or_else(|| "ElevenLabs request failed".to_string()),
        })
    }
}

#[async_trait]
impl Synthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str, speaker: u32, output: &Path) -> Result<()> {
        if text.trim().is_empty() {
            return Err(DubError::Synthesis {
                message: "refusing to synthesize empty text".to_string(),
            });
        }

        let voice = self.voice_for_speaker(speaker);
        let audio = self.request(text, voice).await?;

        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output, &audio)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NetworkConfig, TtsConfig};

    fn synthesizer_with_key() -> ElevenLabsSynthesizer {
        let tts = TtsConfig {
            api_key: Some("el-key".to_string()),
            ..TtsConfig::default()
        };
        ElevenLabsSynthesizer::new(&tts, &NetworkConfig::default())
    }

    #[test]
    fn even_speakers_use_primary_voice() {
        let synthesizer = synthesizer_with_key();
        assert_eq!(synthesizer.voice_for_speaker(0), "JBFqnCBsd6RMkjVDRZzb");
        assert_eq!(synthesizer.voice_for_speaker(2), "JBFqnCBsd6RMkjVDRZzb");
    }

    #[test]
    fn odd_speakers_use_secondary_voice() {
        let synthesizer = synthesizer_with_key();
        assert_eq!(synthesizer.voice_for_speaker(1), "HP3OkBOPWanmqpjL7XVM");
        assert_eq!(synthesizer.voice_for_speaker(3), "HP3OkBOPWanmqpjL7XVM");
    }

    #[tokio::test]
    async fn missing_api_key_is_authentication_error() {
        let synthesizer =
            ElevenLabsSynthesizer::new(&TtsConfig::default(), &NetworkConfig::default());
        let dir = tempfile::tempdir().unwrap();

        let result = synthesizer
            .synthesize("hello", 0, &dir.path().join("out.mp3"))
            .await;

        match result {
            Err(DubError::Authentication { message }) => {
                assert!(message.contains("ELEVENLABS_API_KEY"));
            }
            other => panic!("Expected Authentication error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_any_request() {
        // Unroutable base URL: a network attempt would error differently.
        let synthesizer = synthesizer_with_key().with_base_url("http://127.0.0.1:1/v1/tts");
        let dir = tempfile::tempdir().unwrap();

        let result = synthesizer
            .synthesize("   ", 0, &dir.path().join("out.mp3"))
            .await;

        match result {
            Err(DubError::Synthesis { message }) => {
                assert!(message.contains("empty text"));
            }
            other => panic!("Expected Synthesis error, got {:?}", other),
        }
    }
}
