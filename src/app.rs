//! High-level command orchestration.
//!
//! Wires configuration and CLI overrides into concrete stage backends
//! and hands them to the pipeline driver.

use crate::asr::DeepgramTranscriber;
use crate::config::Config;
use crate::error::{DubError, Result};
use crate::languages::{self, Language};
use crate::media::runner::SystemCommandExecutor;
use crate::output::Progress;
use crate::pipeline::{Dubber, RunPaths};
use crate::translate::{IdentityTranslator, Translator};
use crate::tts::ElevenLabsSynthesizer;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI overrides applied on top of the loaded configuration.
#[derive(Debug, Default)]
pub struct DubOptions {
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
    pub output: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub retries: Option<u32>,
    pub clean: bool,
    pub quiet: bool,
    pub verbose: u8,
}

/// Run a dubbing pipeline on `video`.
pub async fn run_dub_command(mut config: Config, video: PathBuf, options: DubOptions) -> Result<()> {
    if let Some(lang) = options.source_lang {
        config.dubbing.source_language = lang;
    }
    if let Some(lang) = options.target_lang {
        config.dubbing.target_language = lang;
    }
    if let Some(dir) = options.work_dir {
        config.dubbing.work_dir = Some(dir.to_string_lossy().into_owned());
    }
    if let Some(secs) = options.timeout_secs {
        config.network.timeout_secs = secs;
    }
    if let Some(retries) = options.retries {
        config.network.max_retries = retries;
    }

    if config.network.timeout_secs == 0 {
        return Err(DubError::ConfigInvalidValue {
            key: "network.timeout_secs".to_string(),
            message: "must be positive".to_string(),
        });
    }

    let target = languages::get(&config.dubbing.target_language).ok_or_else(|| {
        DubError::UnsupportedLanguage {
            code: config.dubbing.target_language.clone(),
        }
    })?;

    let work_dir = config
        .dubbing
        .work_dir
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut paths = RunPaths::for_video(&video, &work_dir, target.code);
    if let Some(output) = options.output {
        paths = paths.with_output_video(output);
    }

    let translator = build_translator(&config.dubbing.source_language, target)?;
    let executor = Arc::new(SystemCommandExecutor::new());
    let transcriber = Arc::new(DeepgramTranscriber::new(
        &config.asr,
        &config.network,
        &config.dubbing.source_language,
    ));
    let synthesizer = Arc::new(ElevenLabsSynthesizer::new(&config.tts, &config.network));
    let progress = Progress::new(options.quiet, options.verbose);

    let mut dubber = Dubber::new(
        executor,
        transcriber,
        translator,
        synthesizer,
        target,
        paths,
        progress,
    );
    dubber.run(&video).await?;

    if options.clean || config.cleanup.clean_tts_scratch {
        let scratch = &dubber.paths().tts_scratch;
        if scratch.exists() {
            std::fs::remove_dir_all(scratch)?;
        }
    }

    Ok(())
}

/// Pick the translation backend for a language pair.
///
/// A matching source and target re-voices the original dialogue, so no
/// translation model is needed. Everything else requires the offline
/// model.
fn build_translator(source: &str, target: &'static Language) -> Result<Box<dyn Translator>> {
    if source == target.code {
        return Ok(Box::new(IdentityTranslator));
    }

    #[cfg(feature = "offline-translation")]
    {
        Ok(Box::new(crate::translate::CandleT5Translator::load()?))
    }

    #[cfg(not(feature = "offline-translation"))]
    {
        Err(DubError::Translation {
            message: format!(
                "translating {} to {} requires a build with the offline-translation feature",
                source, target.code
            ),
        })
    }
}

/// Print the supported target language catalog.
pub fn print_languages() {
    println!("Supported target languages:");
    for lang in languages::LANGUAGES {
        println!("  {}  {}", lang.code, lang.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_languages_use_identity_translator() {
        let target = languages::get("hi").unwrap();
        let translator = build_translator("hi", target).unwrap();
        assert_eq!(translator.name(), "identity");
    }

    #[cfg(not(feature = "offline-translation"))]
    #[test]
    fn cross_language_without_model_is_translation_error() {
        let target = languages::get("hi").unwrap();
        let result = build_translator("en", target);
        assert!(matches!(result, Err(DubError::Translation { .. })));
    }

    #[tokio::test]
    async fn zero_timeout_is_rejected() {
        let config = Config::default();
        let options = DubOptions {
            timeout_secs: Some(0),
            quiet: true,
            ..DubOptions::default()
        };

        let result = run_dub_command(config, PathBuf::from("in.mp4"), options).await;

        assert!(matches!(result, Err(DubError::ConfigInvalidValue { .. })));
    }

    #[tokio::test]
    async fn unsupported_target_language_is_rejected() {
        let config = Config::default();
        let options = DubOptions {
            target_lang: Some("xx".to_string()),
            quiet: true,
            ..DubOptions::default()
        };

        let result = run_dub_command(config, PathBuf::from("in.mp4"), options).await;

        match result {
            Err(DubError::UnsupportedLanguage { code }) => assert_eq!(code, "xx"),
            other => panic!("Expected UnsupportedLanguage, got {:?}", other),
        }
    }
}
