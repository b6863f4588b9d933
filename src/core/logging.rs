//! Logging Initialization
//!
//! Routes `tracing` events (and `log` records through `tracing-log`) to a
//! daily-rolling JSON file and the terminal, and installs the miette report
//! hook used by the binary.

use std::fs;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer, Registry};

use crate::config::LoggingConfig;

const LOG_FILE_NAME: &str = "campaign-core.log";

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Failed to create log directory {path}: {source}")]
    LogDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("A global subscriber is already installed: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("Failed to bridge log records: {0}")]
    LogBridge(#[from] tracing_log::log_tracer::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, LoggingError>;

/// Where terminal output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Console {
    Stdout,
    Stderr,
}

/// `RUST_LOG` wins over the configured level.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Initialize logging with a pretty stdout layer and, unless disabled, a
/// JSON file layer.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// life of the process.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    install(config, Console::Stdout)
}

/// Like [`init`], but terminal output goes to stderr so stdout stays clean
/// for machine-readable results.
pub fn init_stderr(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    install(config, Console::Stderr)
}

fn install(config: &LoggingConfig, console: Console) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = if config.json_file {
        let log_dir = config.log_dir();
        fs::create_dir_all(&log_dir).map_err(|source| LoggingError::LogDir {
            path: log_dir.clone(),
            source,
        })?;

        let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .json()
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .with_target(true)
            .with_filter(env_filter(config));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let console_layer = match console {
        Console::Stdout => tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(io::stdout().is_terminal())
            .pretty()
            .with_filter(env_filter(config))
            .boxed(),
        Console::Stderr => tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .compact()
            .with_filter(env_filter(config))
            .boxed(),
    };

    let subscriber = Registry::default().with(file_layer).with(console_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;

    init_miette();

    if config.json_file {
        tracing::info!(
            log_file = %config.log_dir().join(LOG_FILE_NAME).display(),
            "Logging initialized (daily rolling)"
        );
    }

    Ok(guard)
}

fn init_miette() {
    let color = io::stderr().is_terminal();
    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .color(color)
                .build(),
        )
    }))
    .ok(); // Already set
}
