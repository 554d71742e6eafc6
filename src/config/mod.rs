//! Configuration: file locations, `settings.conf` and pre-run validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::words::substitutions::SubstitutionError;

pub mod paths;
pub mod settings;

pub use settings::{Settings, load_settings, parse_settings};

/// Default title length ceiling of the store.
pub const DEFAULT_TITLE_MAX_LEN: usize = 30;
/// Default number of locales processed at the same time.
pub const DEFAULT_CONCURRENCY: usize = 4;
/// Default attempts per remote call, including the first.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 4;
/// Default delay before the first retry.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 500;
/// Default cap for a single retry delay.
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 8000;

/// Configuration problem detected before any remote call.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No credentials file configured.
    #[error("no credentials file given (use --credentials or `credentials` in settings.conf)")]
    NoCredentials,
    /// A required directory is not configured.
    #[error("no {0} directory given")]
    NoDirectory(&'static str),
    /// A configured path is unusable.
    #[error("{kind}: {reason}")]
    BadPath {
        /// What the path is for.
        kind: &'static str,
        /// Why it is unusable.
        reason: String,
    },
    /// A settings value does not parse.
    #[error("{path}: invalid value '{value}' for '{key}'")]
    InvalidValue {
        /// Settings file.
        path: PathBuf,
        /// Key being set.
        key: String,
        /// Rejected value.
        value: String,
    },
    /// The settings file exists but cannot be read.
    #[error("reading {path}: {source}")]
    Unreadable {
        /// Settings file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The substitution file is malformed.
    #[error(transparent)]
    Substitutions(#[from] SubstitutionError),
    /// The credentials file is not a service-account key.
    #[error("credentials: {0}")]
    Credentials(String),
}
