/// TTRPG Campaign Core
///
/// Campaign hierarchy, content rollups, initiative building and the combat
/// turn engine behind a facilitator's session tracker.

pub mod config;
pub mod core;


use thiserror::Error;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Campaign(#[from] core::campaign::CampaignError),

    #[error(transparent)]
    Logging(#[from] core::logging::LoggingError),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),
}

pub type Result<T> = std::result::Result<T, Error>;
