use anyhow::Result;
use clap::{CommandFactory, Parser};
use redub::app::{DubOptions, print_languages, run_dub_command};
use redub::cli::{Cli, Commands, ConfigAction};
use redub::config::Config;
use redub::diagnostics::check_dependencies;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            let Some(video) = cli.video else {
                Cli::command().print_help()?;
                std::process::exit(2);
            };
            let config = load_config(cli.config.as_deref())?;
            let options = DubOptions {
                source_lang: cli.source_lang,
                target_lang: cli.target_lang,
                output: cli.output,
                work_dir: cli.work_dir,
                timeout_secs: cli.timeout,
                retries: cli.retries,
                clean: cli.clean,
                quiet: cli.quiet,
                verbose: cli.verbose,
            };
            run_dub_command(config, video, options).await?;
        }
        Some(Commands::Languages) => {
            print_languages();
        }
        Some(Commands::Check) => {
            if !check_dependencies() {
                std::process::exit(1);
            }
        }
        Some(Commands::Config { action }) => match action {
            None => {
                let config = load_config(cli.config.as_deref())?;
                print!("{}", config.to_display_toml()?);
            }
            Some(ConfigAction::Get { key }) => {
                let config = load_config(cli.config.as_deref())?;
                match config.get_value_by_path(&key) {
                    Ok(value) => println!("{}", value),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            }
            Some(ConfigAction::Set { key, value }) => {
                let path = cli
                    .config
                    .clone()
                    .unwrap_or_else(Config::default_path);
                match Config::set_value_by_path(&path, &key, &value) {
                    Ok(()) => println!("Set {} = {}", key, value),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            }
            Some(ConfigAction::Dump) => {
                print!("{}", Config::dump_template());
            }
        },
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "redub", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/redub/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        let default_path = Config::default_path();
        Config::load_or_default(&default_path)
    };

    Ok(config.with_env_overrides())
}
