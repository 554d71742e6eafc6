//! Config, settings and log file locations.

use std::env;
use std::path::{Path, PathBuf};

/// Directory name under the XDG config home.
const APP_DIR: &str = "playlisting";

/// Resolve an XDG base directory from environment or default to `$HOME` + segments.
///
/// Inputs:
/// - `var`: Environment variable to check (e.g., `XDG_CONFIG_HOME`).
/// - `home_default`: Fallback path segments relative to `$HOME` if `var` is unset/empty.
///
/// Output: Resolved base directory path.
fn xdg_base_dir(var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(p) = env::var(var)
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let mut base = PathBuf::from(home);
    for seg in home_default {
        base = base.join(seg);
    }
    base
}

/// Config directory: `$XDG_CONFIG_HOME/playlisting` or `$HOME/.config/playlisting`.
#[must_use]
pub fn config_dir() -> PathBuf {
    xdg_base_dir("XDG_CONFIG_HOME", &[".config"]).join(APP_DIR)
}

/// Logs directory under config: `<config>/logs` (ensured to exist).
#[must_use]
pub fn logs_dir() -> PathBuf {
    let dir = config_dir().join("logs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Default `settings.conf` location.
#[must_use]
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.conf")
}

/// What: Expand a leading `~/` in a configured path.
///
/// Inputs:
/// - `raw`: Path as written in settings or on the command line.
///
/// Output:
/// - Path with `~` replaced by `$HOME` when set; otherwise unchanged.
#[must_use]
pub fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Ok(home) = env::var("HOME")
    {
        return Path::new(&home).join(rest);
    }
    PathBuf::from(raw)
}
