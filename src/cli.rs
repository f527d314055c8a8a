//! Command-line interface for redub
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Dub videos into Indian languages
#[derive(Parser, Debug)]
#[command(name = "redub", version, about = "Dub videos into Indian languages")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Video file to dub
    #[arg(value_name = "VIDEO")]
    pub video: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: per-segment progress)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Source language of the video (default: en)
    #[arg(long, value_name = "LANG")]
    pub source_lang: Option<String>,

    /// Target language code (run `redub languages` for the catalog)
    #[arg(long, short = 't', value_name = "LANG")]
    pub target_lang: Option<String>,

    /// Path for the dubbed video (default: <work-dir>/output/<stem>_<lang>.mp4)
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Working directory for intermediate files (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Network timeout per request. Examples: 30s, 2m
    #[arg(long, value_name = "DURATION", value_parser = parse_timeout_secs)]
    pub timeout: Option<u64>,

    /// Retries per failed network request
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Remove per-segment TTS scratch files after a successful run
    #[arg(long)]
    pub clean: bool,
}

/// Parse a timeout duration string into seconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (seconds), single-unit (`30s`, `2m`), and compound (`1m30s`).
fn parse_timeout_secs(s: &str) -> Result<u64, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs())
        .map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List supported target languages
    Languages,

    /// Check external tools and credentials
    Check,

    /// Show or edit configuration
    Config {
        /// Action to perform (default: print the effective configuration)
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Configuration subactions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print a single value, e.g. `redub config get dubbing.target_language`
    Get {
        /// Dotted key (section.field)
        key: String,
    },

    /// Set a value in the configuration file
    Set {
        /// Dotted key (section.field)
        key: String,
        /// Value to store
        value: String,
    },

    /// Print a fully commented configuration template
    Dump,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_bare_video_path() {
        let cli = Cli::parse_from(["redub", "lecture.mp4"]);
        assert_eq!(cli.video, Some(PathBuf::from("lecture.mp4")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_dub_flags() {
        let cli = Cli::parse_from([
            "redub",
            "lecture.mp4",
            "-t",
            "ta",
            "--source-lang",
            "en",
            "-o",
            "out.mp4",
            "--work-dir",
            "/tmp/dub",
            "--clean",
        ]);
        assert_eq!(cli.target_lang.as_deref(), Some("ta"));
        assert_eq!(cli.source_lang.as_deref(), Some("en"));
        assert_eq!(cli.output, Some(PathBuf::from("out.mp4")));
        assert_eq!(cli.work_dir, Some(PathBuf::from("/tmp/dub")));
        assert!(cli.clean);
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::parse_from(["redub", "languages"]);
        assert!(matches!(cli.command, Some(Commands::Languages)));

        let cli = Cli::parse_from(["redub", "check"]);
        assert!(matches!(cli.command, Some(Commands::Check)));
    }

    #[test]
    fn cli_parses_config_subactions() {
        let cli = Cli::parse_from(["redub", "config"]);
        assert!(matches!(cli.command, Some(Commands::Config { action: None })));

        let cli = Cli::parse_from(["redub", "config", "get", "dubbing.target_language"]);
        match cli.command {
            Some(Commands::Config {
                action: Some(ConfigAction::Get { key }),
            }) => assert_eq!(key, "dubbing.target_language"),
            other => panic!("Expected config get, got {:?}", other),
        }

        let cli = Cli::parse_from(["redub", "config", "set", "network.timeout_secs", "60"]);
        match cli.command {
            Some(Commands::Config {
                action: Some(ConfigAction::Set { key, value }),
            }) => {
                assert_eq!(key, "network.timeout_secs");
                assert_eq!(value, "60");
            }
            other => panic!("Expected config set, got {:?}", other),
        }

        let cli = Cli::parse_from(["redub", "config", "dump"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: Some(ConfigAction::Dump)
            })
        ));
    }

    #[test]
    fn timeout_accepts_bare_seconds_and_humantime() {
        assert_eq!(parse_timeout_secs("45"), Ok(45));
        assert_eq!(parse_timeout_secs("2m"), Ok(120));
        assert_eq!(parse_timeout_secs("1m30s"), Ok(90));
        assert!(parse_timeout_secs("soon").is_err());
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
