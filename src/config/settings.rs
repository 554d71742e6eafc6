//! `settings.conf` parsing.
//!
//! ```text
//! # ~/.config/playlisting/settings.conf
//! credentials = ~/keys/play.json
//! words_dir = ~/game/words
//! images_dir = ~/game/images
//! substitutions = ~/game/titles.txt
//! title_max_len = 30
//! retry_attempts = 4
//! concurrency = 4
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, warn};

use super::paths::expand_home;
use super::{
    ConfigError, DEFAULT_CONCURRENCY, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_BASE_DELAY_MS,
    DEFAULT_RETRY_MAX_DELAY_MS, DEFAULT_TITLE_MAX_LEN,
};
use crate::store::google::DEFAULT_API_BASE;
use crate::store::retry::RetryPolicy;
use crate::util::config::{parse_key_value, skip_comment_or_empty, strip_inline_comment};
use crate::util::{ensure_dir, ensure_file};

/// Effective configuration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Service-account key file.
    pub credentials: Option<PathBuf>,
    /// Words directory.
    pub words_dir: Option<PathBuf>,
    /// Image tree root.
    pub images_dir: Option<PathBuf>,
    /// Title substitution file.
    pub substitutions: Option<PathBuf>,
    /// Title length ceiling.
    pub title_max_len: usize,
    /// Attempts per remote call.
    pub retry_attempts: u32,
    /// First retry delay in milliseconds.
    pub retry_base_delay_ms: u64,
    /// Retry delay cap in milliseconds.
    pub retry_max_delay_ms: u64,
    /// Locales processed at the same time.
    pub concurrency: usize,
    /// Base URL of the Android Publisher API.
    pub api_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials: None,
            words_dir: None,
            images_dir: None,
            substitutions: None,
            title_max_len: DEFAULT_TITLE_MAX_LEN,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            retry_max_delay_ms: DEFAULT_RETRY_MAX_DELAY_MS,
            concurrency: DEFAULT_CONCURRENCY,
            api_base_url: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Settings {
    /// Retry policy built from the retry settings.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_attempts.max(1),
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
            jitter: true,
        }
    }

    /// What: Check that the configured files exist for the requested work.
    ///
    /// Inputs:
    /// - `text`: Text translation is requested (needs the words directory).
    /// - `images`: Image reconciliation is requested (needs the images directory).
    ///
    /// Output:
    /// - `Ok(())` when everything needed is present.
    ///
    /// # Errors
    /// - `NoCredentials` / `BadPath` for the credentials file.
    /// - `NoDirectory` / `BadPath` for a required directory.
    pub fn validate(&self, text: bool, images: bool) -> Result<(), ConfigError> {
        let credentials = self.credentials.as_deref().ok_or(ConfigError::NoCredentials)?;
        ensure_file(credentials).map_err(|reason| ConfigError::BadPath {
            kind: "credentials",
            reason,
        })?;
        if text {
            let words = self
                .words_dir
                .as_deref()
                .ok_or(ConfigError::NoDirectory("words"))?;
            ensure_dir(words).map_err(|reason| ConfigError::BadPath {
                kind: "words",
                reason,
            })?;
        }
        if images {
            let images_dir = self
                .images_dir
                .as_deref()
                .ok_or(ConfigError::NoDirectory("images"))?;
            ensure_dir(images_dir).map_err(|reason| ConfigError::BadPath {
                kind: "images",
                reason,
            })?;
        }
        Ok(())
    }
}

/// Parse a numeric settings value.
fn parse_num<T: FromStr>(path: &Path, key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        path: path.to_path_buf(),
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// What: Parse `settings.conf` content on top of the defaults.
///
/// Inputs:
/// - `content`: File contents.
/// - `path`: File path, for error messages.
///
/// Output:
/// - Settings with every recognized key applied.
///
/// # Errors
/// - `ConfigError::InvalidValue` for numeric keys that do not parse or are zero.
///
/// Details:
/// - Keys are case-insensitive; `-`, `.` and spaces count as `_`.
/// - Unknown keys are logged and ignored.
pub fn parse_settings(content: &str, path: &Path) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();
    for line in content.lines() {
        if skip_comment_or_empty(line) {
            continue;
        }
        let Some((raw_key, raw_val)) = parse_key_value(line, '=') else {
            warn!(path = %path.display(), line, "ignoring settings line without '='");
            continue;
        };
        let key = raw_key.to_lowercase().replace(['.', '-', ' '], "_");
        let val = strip_inline_comment(&raw_val);
        match key.as_str() {
            "credentials" | "credentials_json" => settings.credentials = Some(expand_home(val)),
            "words_dir" | "words" => settings.words_dir = Some(expand_home(val)),
            "images_dir" | "images" => settings.images_dir = Some(expand_home(val)),
            "substitutions" | "substitution_file" => {
                settings.substitutions = Some(expand_home(val));
            }
            "title_max_len" => settings.title_max_len = parse_num(path, &key, val)?,
            "retry_attempts" => settings.retry_attempts = parse_num(path, &key, val)?,
            "retry_base_delay_ms" => settings.retry_base_delay_ms = parse_num(path, &key, val)?,
            "retry_max_delay_ms" => settings.retry_max_delay_ms = parse_num(path, &key, val)?,
            "concurrency" => settings.concurrency = parse_num(path, &key, val)?,
            "api_base_url" => settings.api_base_url = val.trim_end_matches('/').to_string(),
            _ => warn!(path = %path.display(), key, "unknown settings key"),
        }
    }
    for (key, zero) in [
        ("title_max_len", settings.title_max_len == 0),
        ("retry_attempts", settings.retry_attempts == 0),
        ("concurrency", settings.concurrency == 0),
    ] {
        if zero {
            return Err(ConfigError::InvalidValue {
                path: path.to_path_buf(),
                key: key.to_string(),
                value: "0".to_string(),
            });
        }
    }
    Ok(settings)
}

/// What: Load settings from `path`, or defaults when it does not exist.
///
/// Inputs:
/// - `path`: Settings file.
///
/// Output:
/// - Parsed settings.
///
/// # Errors
/// - `ConfigError::Unreadable` when the file exists but cannot be read.
/// - Errors from [`parse_settings`].
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            debug!(path = %path.display(), bytes = content.len(), "loaded settings.conf");
            parse_settings(&content, path)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no settings.conf; using defaults");
            Ok(Settings::default())
        }
        Err(source) => Err(ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}
