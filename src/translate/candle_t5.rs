//! Offline translation using candle quantized T5.
//!
//! Downloads model artifacts from HuggingFace on first use, then runs
//! greedy T5 decoding to translate each segment's text.

use crate::error::{DubError, Result};
use crate::languages::Language;
use crate::segment::Segment;
use crate::translate::translator::Translator;

use candle_core::{Device, Tensor};
use candle_transformers::models::quantized_t5::{Config as T5Config, T5ForConditionalGeneration};
use candle_transformers::quantized_var_builder::VarBuilder;
use hf_hub::api::sync::Api;
use tokenizers::Tokenizer;

/// Default quantized T5 repo on HuggingFace.
pub const DEFAULT_HF_REPO: &str = "lmz/candle-quantized-t5";
const MODEL_FILENAME: &str = "model.gguf";
const CONFIG_FILENAME: &str = "config.json";
const TOKENIZER_FILENAME: &str = "tokenizer.json";

/// Maximum number of tokens to generate per segment.
const MAX_DECODE_TOKENS: usize = 512;

/// Quantized T5 translator that runs inference via candle on CPU.
pub struct CandleT5Translator {
    model: T5ForConditionalGeneration,
    tokenizer: Tokenizer,
    device: Device,
}

impl CandleT5Translator {
    /// Load the quantized T5 model from the HuggingFace cache.
    ///
    /// Downloads model, config, and tokenizer on first call.
    pub fn load() -> Result<Self> {
        Self::load_repo(DEFAULT_HF_REPO)
    }

    pub fn load_repo(hf_repo: &str) -> Result<Self> {
        let device = Device::Cpu;
        let api = Api::new().map_err(|e| DubError::Translation {
            message: format!("HF Hub API init: {e}"),
        })?;
        let repo = api.model(hf_repo.to_string());

        let model_path = repo.get(MODEL_FILENAME).map_err(|e| DubError::Translation {
            message: format!("Download model {MODEL_FILENAME}: {e}"),
        })?;
        let config_path = repo.get(CONFIG_FILENAME).map_err(|e| DubError::Translation {
            message: format!("Download config {CONFIG_FILENAME}: {e}"),
        })?;
        let tokenizer_path = repo
            .get(TOKENIZER_FILENAME)
            .map_err(|e| DubError::Translation {
                message: format!("Download tokenizer: {e}"),
            })?;

        let config_bytes = std::fs::read(&config_path)?;
        let config: T5Config =
            serde_json::from_slice(&config_bytes).map_err(|e| DubError::Translation {
                message: format!("Parse T5 config: {e}"),
            })?;

        let vb = VarBuilder::from_gguf(&model_path, &device).map_err(|e| DubError::Translation {
            message: format!("Load GGUF model {}: {e}", model_path.display()),
        })?;
        let model =
            T5ForConditionalGeneration::load(vb, &config).map_err(|e| DubError::Translation {
                message: format!("Init T5 model: {e}"),
            })?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| DubError::Translation {
            message: format!("Load tokenizer {}: {e}", tokenizer_path.display()),
        })?;

        Ok(Self {
            model,
            tokenizer,
            device,
        })
    }

    /// Encode a translation prompt and run greedy decoding.
    fn generate(&mut self, prompt: &str) -> Result<String> {
        let encoding = self
            .tokenizer
            .encode(prompt, true)
            .map_err(|e| DubError::Translation {
                message: format!("Tokenize: {e}"),
            })?;

        let input_ids: Vec<u32> = encoding.get_ids().to_vec();
        let input_tensor = Tensor::new(input_ids.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| DubError::Translation {
                message: format!("Create input tensor: {e}"),
            })?;

        let encoder_output = self
            .model
            .encode(&input_tensor)
            .map_err(|e| DubError::Translation {
                message: format!("Encoder forward: {e}"),
            })?;

        // Greedy decode with incremental KV cache.
        // First step: feed pad token (0). Subsequent steps: feed only the
        // new token; the KV cache accumulates across steps.
        let mut decoded_ids: Vec<u32> = vec![0];
        let mut next_input = vec![0u32];

        for _ in 0..MAX_DECODE_TOKENS {
            let decoder_input = Tensor::new(next_input.as_slice(), &self.device)
                .and_then(|t| t.unsqueeze(0))
                .map_err(|e| DubError::Translation {
                    message: format!("Create decoder input: {e}"),
                })?;

            let logits = self
                .model
                .decode(&decoder_input, &encoder_output)
                .map_err(|e| DubError::Translation {
                    message: format!("Decoder forward: {e}"),
                })?;

            let next_token = logits
                .dim(1)
                .and_then(|seq_len| logits.get_on_dim(1, seq_len - 1))
                .and_then(|l| l.argmax(candle_core::D::Minus1))
                .and_then(|a| a.reshape(()))
                .and_then(|a| a.to_scalar::<u32>())
                .map_err(|e| DubError::Translation {
                    message: format!("Sample next token: {e}"),
                })?;

            // EOS token (1 for T5)
            if next_token == 1 {
                break;
            }

            decoded_ids.push(next_token);
            next_input = vec![next_token];
        }

        // Skip the leading pad token for decoding
        let output = self
            .tokenizer
            .decode(&decoded_ids[1..], true)
            .map_err(|e| DubError::Translation {
                message: format!("Detokenize: {e}"),
            })?;

        Ok(output)
    }
}

/// T5 translation task prompt.
fn translation_prompt(target: &Language, text: &str) -> String {
    format!("translate English to {}: {}", target.name, text)
}

impl Translator for CandleT5Translator {
    fn translate_segments(
        &mut self,
        segments: &[Segment],
        target: &Language,
    ) -> Result<Vec<Segment>> {
        let mut translated = Vec::with_capacity(segments.len());
        for segment in segments {
            let mut out = segment.clone();
            if !segment.text.trim().is_empty() {
                self.model.clear_kv_cache();
                let text = self.generate(&translation_prompt(target, &segment.text))?;
                if text.trim().is_empty() {
                    return Err(DubError::Translation {
                        message: format!(
                            "model produced no output for segment at {:.2}s",
                            segment.start
                        ),
                    });
                }
                out.text = text;
            }
            translated.push(out);
        }
        Ok(translated)
    }

    fn name(&self) -> &str {
        "candle-t5"
    }
}
