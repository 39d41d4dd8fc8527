use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use transit_identity::domain::ResolveError;
use transit_identity::engine::{ConfigError, EngineConfig, FeedBatch, IdentityEngine};
use transit_identity::rules::RulesError;

const USAGE: &str = "usage: transit-identity <batch.json> | --dump-rules";

#[derive(Debug, thiserror::Error)]
enum DriverError {
    #[error("invalid arguments")]
    Usage,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error("failed to read feed batch {path}: {source}")]
    ReadBatch {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse feed batch {path}: {source}")]
    ParseBatch {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

enum Command {
    Resolve(PathBuf),
    DumpRules,
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the JSON output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(DriverError::Usage) => {
            eprintln!("{USAGE}");
            ExitCode::from(2)
        }
        Err(e) => {
            error!(error = %e, "Identity resolution failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), DriverError> {
    let command = parse_args(std::env::args().skip(1))?;
    let config = EngineConfig::from_env()?;
    let rules = config.rule_tables()?;
    info!(
        revision = rules.revision(),
        strictness = ?config.strictness,
        "Loaded rule tables"
    );

    let stdout = std::io::stdout().lock();
    match command {
        Command::DumpRules => write_json(stdout, &rules.to_document()),
        Command::Resolve(path) => {
            let json = std::fs::read_to_string(&path).map_err(|source| DriverError::ReadBatch {
                path: path.clone(),
                source,
            })?;
            let batch: FeedBatch = serde_json::from_str(&json)
                .map_err(|source| DriverError::ParseBatch { path, source })?;

            let feed = IdentityEngine::new(&rules, config.strictness).run(&batch)?;
            write_json(stdout, &feed)
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command, DriverError> {
    let command = match args.next().as_deref() {
        Some("--dump-rules") => Command::DumpRules,
        Some(arg) if !arg.starts_with('-') => Command::Resolve(PathBuf::from(arg)),
        _ => return Err(DriverError::Usage),
    };
    if args.next().is_some() {
        return Err(DriverError::Usage);
    }
    Ok(command)
}

fn write_json<T: serde::Serialize>(mut out: impl Write, value: &T) -> Result<(), DriverError> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out).map_err(serde_json::Error::io)?;
    Ok(())
}
