//! Command-line argument parsing and handling.

use thiserror::Error;

use playlisting::config::ConfigError;
use playlisting::store::StoreError;
use playlisting::sync::SyncError;
use playlisting::words::WordsError;

pub mod definition;
pub mod info;
pub mod locales;
pub mod update;
pub mod utils;

// Re-export commonly used items
pub use definition::{Args, Command, UpdateArgs};
pub use utils::determine_log_level;

/// Failure of a CLI command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Bad configuration or usage.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Remote store failure outside the engine.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Engine failure before any locale was processed.
    #[error(transparent)]
    Sync(#[from] SyncError),
    /// Local words store failure.
    #[error(transparent)]
    Words(#[from] WordsError),
}

impl CommandError {
    /// What: Map the error to a process exit code.
    ///
    /// Inputs: None
    ///
    /// Output:
    /// - `2` for configuration and usage errors, `1` for run failures.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Sync(e) if e.is_usage() => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Usage problems exit with 2, run failures with 1.
    ///
    /// Inputs:
    /// - Config error, unknown-locale error, store error.
    ///
    /// Output:
    /// - 2, 2, 1.
    fn exit_codes_by_kind() {
        assert_eq!(CommandError::from(ConfigError::NoCredentials).exit_code(), 2);
        assert_eq!(
            CommandError::from(SyncError::UnknownLocales(vec!["xx".into()])).exit_code(),
            2
        );
        assert_eq!(
            CommandError::from(StoreError::from_status(500, "boom")).exit_code(),
            1
        );
    }
}
