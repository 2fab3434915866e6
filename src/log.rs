use crate::config::Config;
use crate::errors::{FsError, FsErrorType, Result};
use crate::locations::get_log_dir;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, Registry};

/// Log files older than this are removed at start-up.
const LOG_RETENTION_DAYS: i64 = 30;

pub fn init_logging(config: &Config) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_file = get_log_location(config.log_dir.as_deref())?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let default_level = if config.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let formatter = BunyanFormattingLayer::new("deskfs".into(), non_blocking);

    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatter);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| FsError::new(FsErrorType::IOError, e.to_string()))?;
    // Route `log` records from dependencies into the same file.
    tracing_log::LogTracer::init()
        .map_err(|e| FsError::new(FsErrorType::IOError, e.to_string()))?;

    tracing::info!("Logging to {}", log_file.display());
    Ok(guard)
}

fn get_log_location(base: Option<&Path>) -> Result<PathBuf> {
    let log_dir = get_log_dir(base)?;
    let timestamp = Utc::now().format("%Y-%m-%d-%H-%M-%S");
    let log_file = log_dir.join(format!("deskfs-{}.log", timestamp));
    clean_logfiles(&log_dir)?;
    Ok(log_file)
}

fn clean_logfiles(log_dir: &Path) -> Result<()> {
    for file in std::fs::read_dir(log_dir)? {
        let file = file?;
        let modified = file.metadata()?.modified()?;
        let modified: chrono::DateTime<Utc> = chrono::DateTime::from(modified);
        let age = Utc::now().signed_duration_since(modified);
        if age.num_days() > LOG_RETENTION_DAYS {
            std::fs::remove_file(file.path())?;
        }
    }
    Ok(())
}
