//! lrcshift - LRC lyric timestamp shifting
//!
//! Entry point: parses arguments, loads configuration, sets up logging and
//! runs the requested command.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use lrcshift::cli::{Args, Commands};
use lrcshift::config::Config;
use lrcshift::error::LrcShiftError;
use lrcshift::lyrics::RequestedKind;
use lrcshift::output::OutputTarget;
use lrcshift::persist::{export_backup, SaveManifest};
use lrcshift::shift::Offset;
use lrcshift::workflow::{ShiftRequest, Workflow};

const DEFAULT_CONFIG_FILE: &str = "lrcshift.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::InitConfig { force } => init_config(args.config, force),
        command => run(command, args.config.as_deref(), args.verbose).await,
    }
}

/// Write the default settings; runs before logging so no work directory is created
fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    Config::default().init_file(&path, force)?;
    println!("Wrote {}", path.display());
    Ok(())
}

async fn run(command: Commands, config_path: Option<&Path>, verbose: bool) -> Result<()> {
    let config = load_config(config_path)?;

    // Setup logging to both console and file
    setup_logging(verbose, &config.log_dir())?;

    match command {
        Commands::Shift { input, kind, offset, output, convert, save, show_diff } => {
            let kind: RequestedKind = kind.as_deref().unwrap_or(&config.input_kind).parse()?;
            let offset = Offset::parse(offset.as_deref(), config.strict_offset)?;

            let output = OutputTarget::from_template(
                output.map(|o| o.unwrap_or_else(|| config.output_template.clone())),
            );
            let convert_format = convert.map(|c| c.unwrap_or_else(|| config.convert_format.clone()));

            let request = ShiftRequest {
                input,
                kind,
                offset,
                output,
                convert_format,
                save,
                show_diff: show_diff || config.show_diff,
            };

            let workflow = Workflow::new(config)?;
            let prepared = workflow.prepare(&request).await?;

            // Diff goes out before the save runs
            if let Some(summary) = &prepared.summary {
                eprintln!("\n{}\n", summary);
            }

            workflow.finish(&request, prepared).await?;
        }
        Commands::InitConfig { force } => init_config(config_path.map(Path::to_path_buf), force)?,
        Commands::ExportBackup { yes } => {
            let manifest_path = config.manifest_path();
            export_backup(&manifest_path, |manifest, target| confirm_export(manifest, target, yes)).await?;
        }
    }

    Ok(())
}

/// Load the explicit config file, else `lrcshift.toml` in the current directory, else defaults
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new(DEFAULT_CONFIG_FILE).exists() {
                Config::from_file(DEFAULT_CONFIG_FILE)?
            } else {
                Config::default()
            }
        }
    };
    Ok(config)
}

fn confirm_export(manifest: &SaveManifest, target: &Path, yes: bool) -> lrcshift::error::Result<bool> {
    if yes {
        return Ok(true);
    }

    dialoguer::Confirm::new()
        .with_prompt(format!(
            "export file '{}' (saved {}) to '{}'. Do you confirm the operation?",
            manifest.file.display(),
            manifest.saved_at.format("%Y-%m-%d %H:%M:%S"),
            target.display()
        ))
        .default(true)
        .interact()
        .map_err(|e| LrcShiftError::Prompt(e.to_string()))
}

/// Setup logging to both console (stderr) and file
fn setup_logging(verbose: bool, log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(log_dir, "lrcshift.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console output goes to stderr, stdout carries the lyrics
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    debug!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("lrcshift.log").display());

    Ok(())
}
