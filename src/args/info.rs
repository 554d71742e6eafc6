//! `info` command.

use playlisting::info::package_info;

use crate::args::{Args, CommandError, utils};

/// What: Print the package overview.
///
/// Inputs:
/// - `args`: Global arguments (credentials and settings).
/// - `package`: Package name.
/// - `locales`: Listing filter.
///
/// Output:
/// - `Ok(())` after printing to stdout.
///
/// # Errors
/// - Configuration problems and store failures.
pub async fn handle_info(args: &Args, package: &str, locales: &[String]) -> Result<(), CommandError> {
    tracing::info!(package, "package info requested from CLI");
    let settings = utils::settings_from_args(args)?;
    settings.validate(false, false)?;
    let store = utils::build_store(&settings, false)?;
    let text = package_info(store.as_ref(), package, locales).await?;
    print!("{text}");
    Ok(())
}
