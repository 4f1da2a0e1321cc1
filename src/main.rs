//! Hinglish Subs
//! 
//! Entry point: an HTTP service plus local transcribe/translate commands
//! built on whisper.cpp, ffmpeg and an LLM translation provider.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use hinglish_subs::cli::{Args, Commands};
use hinglish_subs::config::Config;
use hinglish_subs::error::HinglishError;
use hinglish_subs::server::{self, AppState};
use hinglish_subs::workflow::{TranscribeOptions, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    let config = load_config(args.config.as_deref())?;

    match args.command {
        Commands::InitConfig { output } => {
            config.save_to_file(&output)?;
            println!("Wrote configuration to {}", output.display());
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let workflow = Workflow::new(config)?;
            server::serve(AppState::new(workflow), &host, port).await?;
        }
        Commands::Transcribe { input, output_dir, language, no_translate } => {
            info!("Transcribing: {}", input.display());

            let options = TranscribeOptions {
                language: language.unwrap_or_else(|| config.transcriber.default_language.clone()),
                translate_to_hinglish: !no_translate,
            };
            let output_dir = output_dir.unwrap_or_else(|| parent_dir(&input));
            let stem = input.file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .ok_or_else(|| HinglishError::FileNotFound(input.display().to_string()))?;

            let workflow = Workflow::new(config)?;
            let outcome = workflow.process_file(&input, &options).await?;
            let written = workflow.save_outcome(&outcome, &output_dir, &stem).await?;

            if options.translate_to_hinglish && !outcome.translated_to_hinglish {
                warn!("Subtitles were not translated to Hinglish");
            }
            for path in written {
                println!("{}", path.display());
            }
        }
        Commands::Translate { input, output_dir } => {
            let workflow = Workflow::new(config)?;
            if !workflow.pipeline().is_available() {
                warn!("Translation not available; subtitles will be copied unchanged");
            }

            if input.is_dir() {
                let output_dir = output_dir.unwrap_or_else(|| sibling_output_dir(&input));
                info!("Translating directory {} -> {}", input.display(), output_dir.display());

                let count = workflow.translate_directory(&input, &output_dir).await?;
                println!("Translated {} files into {}", count, output_dir.display());
            } else {
                let output_path = match output_dir {
                    Some(dir) => dir.join(input.file_name().unwrap_or_default()),
                    None => hinglish_file_name(&input),
                };

                let alignment = workflow.translate_subtitle_file(&input, &output_path).await?;
                info!("Alignment: {:?}", alignment);
                println!("{}", output_path.display());
            }
        }
    }

    Ok(())
}

/// `--config` first, then `./config.toml`, then built-in defaults
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };
    Ok(config)
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `talk.srt` -> `talk.hinglish.srt`
fn hinglish_file_name(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    match path.extension() {
        Some(ext) => path.with_file_name(format!("{}.hinglish.{}", stem, ext.to_string_lossy())),
        None => path.with_file_name(format!("{}.hinglish", stem)),
    }
}

/// `subs/` -> `subs_hinglish/`
fn sibling_output_dir(dir: &Path) -> PathBuf {
    let name = dir.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "subtitles".to_string());
    parent_dir(dir).join(format!("{}_hinglish", name))
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".hinglish").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "hinglish.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("hinglish.log").display());

    Ok(())
}
