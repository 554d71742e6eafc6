//! Shared utilities for argument processing.

use playlisting::config::{ConfigError, Settings, load_settings, paths};
use playlisting::store::ListingStore;
use playlisting::store::dry_run::DryRunStore;
use playlisting::store::google::PlayPublisherClient;
use playlisting::store::google::auth::{Authenticator, ServiceAccountKey};
use playlisting::store::retry::RetryingStore;

use crate::args::{Args, CommandError};

/// What: Determine the log level based on command-line arguments.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Log level string (trace, debug, info, warn, error).
///
/// Details:
/// - Verbose flag overrides `--log-level`.
#[must_use]
pub fn determine_log_level(args: &Args) -> String {
    if args.verbose {
        "debug".to_string()
    } else {
        args.log_level.clone()
    }
}

/// What: Build the effective settings: file values overridden by CLI flags.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Merged settings.
///
/// # Errors
/// - Errors from loading `settings.conf`.
pub fn settings_from_args(args: &Args) -> Result<Settings, ConfigError> {
    let path = args.config.clone().unwrap_or_else(paths::settings_path);
    let mut settings = load_settings(&path)?;
    if let Some(p) = &args.credentials {
        settings.credentials = Some(p.clone());
    }
    if let Some(p) = &args.words {
        settings.words_dir = Some(p.clone());
    }
    if let Some(p) = &args.images {
        settings.images_dir = Some(p.clone());
    }
    if let Some(p) = &args.substitutions {
        settings.substitutions = Some(p.clone());
    }
    Ok(settings)
}

/// What: Connect to the Play Publisher API with retries, optionally in dry-run mode.
///
/// Inputs:
/// - `settings`: Validated settings (credentials present).
/// - `dry_run`: Log mutations instead of sending them.
///
/// Output:
/// - Boxed store ready for the engine.
///
/// # Errors
/// - `CommandError::Config` when the credentials are missing or not a service-account key.
/// - `CommandError::Store` when the HTTP client cannot be built.
pub fn build_store(settings: &Settings, dry_run: bool) -> Result<Box<dyn ListingStore>, CommandError> {
    let path = settings
        .credentials
        .as_deref()
        .ok_or(ConfigError::NoCredentials)?;
    let key = ServiceAccountKey::from_file(path)
        .map_err(|e| ConfigError::Credentials(e.to_string()))?;
    tracing::debug!(client = %key.client_email, "service account loaded");
    let client = PlayPublisherClient::new(
        &settings.api_base_url,
        Authenticator::service_account(key),
    )?;
    let store = RetryingStore::new(client, settings.retry_policy());
    if dry_run {
        tracing::info!("dry run: no listing, image or commit will be sent");
        Ok(Box::new(DryRunStore::new(store)))
    } else {
        Ok(Box::new(store))
    }
}
