use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub dubbing: DubbingConfig,
    pub asr: AsrConfig,
    pub tts: TtsConfig,
    pub network: NetworkConfig,
    pub cleanup: CleanupConfig,
}

/// Dubbing run configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DubbingConfig {
    pub source_language: String,
    pub target_language: String,
    /// Working directory for intermediate and output files.
    /// Defaults to the current directory.
    pub work_dir: Option<String>,
}

/// Cloud ASR (Deepgram) configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AsrConfig {
    /// API key; usually supplied via the DEEPGRAM_API_KEY environment variable.
    pub api_key: Option<String>,
    pub model: String,
    pub diarize: bool,
}

/// Cloud TTS (ElevenLabs) configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TtsConfig {
    /// API key; usually supplied via the ELEVENLABS_API_KEY environment variable.
    pub api_key: Option<String>,
    pub model_id: String,
    /// Voice used for even-numbered speakers.
    pub voice_primary: String,
    /// Voice used for odd-numbered speakers.
    pub voice_secondary: String,
}

/// Retry/timeout policy for network-calling stages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_ms: u64,
}

/// Intermediate-file cleanup policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CleanupConfig {
    /// Remove the per-segment TTS scratch directory after a successful run.
    /// Intermediates are always left in place after a failed run.
    pub clean_tts_scratch: bool,
}

impl Default for DubbingConfig {
    fn default() -> Self {
        Self {
            source_language: defaults::DEFAULT_SOURCE_LANGUAGE.to_string(),
            target_language: defaults::DEFAULT_TARGET_LANGUAGE.to_string(),
            work_dir: None,
        }
    }
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "nova-3".to_string(),
            diarize: true,
        }
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_id: "eleven_multilingual_v2".to_string(),
            // Public stock voices from the provider's library (George, Sarah)
            voice_primary: "JBFqnCBsd6RMkjVDRZzb".to_string(),
            voice_secondary: "HP3OkBOPWanmqpjL7XVM".to_string(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::NETWORK_TIMEOUT_SECS,
            max_retries: defaults::NETWORK_MAX_RETRIES,
            backoff_ms: defaults::NETWORK_BACKOFF_MS,
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            clean_tts_scratch: false,
        }
    }
}

/// Parse a raw CLI value into the narrowest matching TOML scalar.
fn parse_toml_scalar(raw: &str) -> toml::Value {
    if let Ok(b) = raw.parse::<bool>() {
        return toml::Value::Boolean(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return toml::Value::Integer(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return toml::Value::Float(f);
    }
    toml::Value::String(raw.to_string())
}

impl NetworkConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - DEEPGRAM_API_KEY → asr.api_key
    /// - ELEVENLABS_API_KEY → tts.api_key
    /// - REDUB_TARGET_LANGUAGE → dubbing.target_language
    /// - REDUB_WORK_DIR → dubbing.work_dir
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("DEEPGRAM_API_KEY")
            && !key.is_empty()
        {
            self.asr.api_key = Some(key);
        }

        if let Ok(key) = std::env::var("ELEVENLABS_API_KEY")
            && !key.is_empty()
        {
            self.tts.api_key = Some(key);
        }

        if let Ok(lang) = std::env::var("REDUB_TARGET_LANGUAGE")
            && !lang.is_empty()
        {
            self.dubbing.target_language = lang;
        }

        if let Ok(dir) = std::env::var("REDUB_WORK_DIR")
            && !dir.is_empty()
        {
            self.dubbing.work_dir = Some(dir);
        }

        self
    }

    /// Serialize the effective configuration as TOML.
    ///
    /// API keys are redacted so the output is safe to paste into bug reports.
    pub fn to_display_toml(&self) -> anyhow::Result<String> {
        let mut redacted = self.clone();
        if redacted.asr.api_key.is_some() {
            redacted.asr.api_key = Some("<redacted>".to_string());
        }
        if redacted.tts.api_key.is_some() {
            redacted.tts.api_key = Some("<redacted>".to_string());
        }
        Ok(toml::to_string_pretty(&redacted)?)
    }

    /// Look up a configuration value by dotted path (e.g. "network.timeout_secs").
    pub fn get_value_by_path(&self, key: &str) -> anyhow::Result<String> {
        let root = toml::Value::try_from(self)?;
        let mut current = &root;
        for part in key.split('.') {
            current = current
                .get(part)
                .ok_or_else(|| anyhow::anyhow!("unknown config key: {}", key))?;
        }
        Ok(match current {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Set a configuration value by dotted path, writing the file in place.
    ///
    /// Creates the file (and parent directories) if it does not exist.
    /// Only keys present in the schema are accepted. Values are parsed as
    /// bool, integer, or float where possible, falling back to string.
    pub fn set_value_by_path(path: &Path, key: &str, raw: &str) -> anyhow::Result<()> {
        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| anyhow::anyhow!("key must be <section>.<field>, got: {}", key))?;

        // Validate against the schema before touching the file
        let schema = toml::Value::try_from(Config::default())?;
        let known = schema.get(section).and_then(|s| s.get(field)).is_some();
        // work_dir and the api keys default to None and are absent from
        // the serialized defaults, so allow them explicitly
        let optional = matches!(
            (section, field),
            ("dubbing", "work_dir") | ("asr", "api_key") | ("tts", "api_key")
        );
        if !known && !optional {
            anyhow::bail!("unknown config key: {}", key);
        }

        let contents = fs::read_to_string(path).unwrap_or_default();
        let mut table: toml::Table = toml::from_str(&contents)?;
        let section_table = table
            .entry(section.to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        let section_table = section_table
            .as_table_mut()
            .ok_or_else(|| anyhow::anyhow!("config key '{}' is not a section", section))?;
        section_table.insert(field.to_string(), parse_toml_scalar(raw));

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(&table)?)?;
        Ok(())
    }

    /// Full commented configuration template for `redub config dump`.
    pub fn dump_template() -> String {
        r#"# redub configuration
# Place at ~/.config/redub/config.toml (or pass --config <path>).
# Every field is optional; values shown are the defaults.

[dubbing]
source_language = "en"
target_language = "hi"
# Working directory for intermediates and output (default: current dir)
# work_dir = "/path/to/work"

[asr]
# Deepgram API key; usually set via DEEPGRAM_API_KEY instead
# api_key = ""
model = "nova-3"
diarize = true

[tts]
# ElevenLabs API key; usually set via ELEVENLABS_API_KEY instead
# api_key = ""
model_id = "eleven_multilingual_v2"
voice_primary = "JBFqnCBsd6RMkjVDRZzb"
voice_secondary = "HP3OkBOPWanmqpjL7XVM"

[network]
timeout_secs = 30
max_retries = 1
backoff_ms = 500

[cleanup]
clean_tts_scratch = false
"#
        .to_string()
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/redub/config.toml on Linux
    #[cfg(feature = "cli")]
    pub fn default_path() -> std::path::PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("redub")
            .join("config.toml")
    }
}
