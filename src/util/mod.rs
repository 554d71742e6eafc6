//! Small utility helpers for encoding, timestamps and path checks.

pub mod config;

use std::fmt::Write;
use std::path::Path;

/// What: Percent-encode a string for use in URLs and form bodies.
///
/// Inputs:
/// - `input`: String to encode.
///
/// Output:
/// - Returns a percent-encoded string where reserved characters are escaped.
///
/// Details:
/// - Unreserved characters as per RFC 3986 (`A-Z`, `a-z`, `0-9`, `-`, `.`, `_`, `~`) are left as-is.
/// - Space is encoded as `%20`; all other bytes are encoded as two uppercase hexadecimal digits prefixed by `%`.
#[must_use]
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push_str("%20"),
            _ => {
                out.push('%');
                let _ = write!(out, "{b:02X}");
            }
        }
    }
    out
}

/// What: Check that `path` is an existing directory.
///
/// Inputs:
/// - `path`: Path to check.
///
/// Output:
/// - `Ok(())` for a directory; `Err` with a user-facing reason otherwise.
///
/// # Errors
/// - Returns `Err` when the path does not exist or is not a directory.
pub fn ensure_dir(path: &Path) -> Result<(), String> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(format!("{} is not a directory", path.display())),
        Err(e) => Err(format!("bad path {}: {e}", path.display())),
    }
}

/// What: Check that `path` is an existing regular file.
///
/// Inputs:
/// - `path`: Path to check.
///
/// Output:
/// - `Ok(())` for a file; `Err` with a user-facing reason otherwise.
///
/// # Errors
/// - Returns `Err` when the path does not exist or is a directory.
pub fn ensure_file(path: &Path) -> Result<(), String> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(format!("{} is not a file", path.display())),
        Err(e) => Err(format!("bad path {}: {e}", path.display())),
    }
}

/// Local timestamp used in log lines: `YYYY-MM-DD-T HH:MM:SS`.
#[must_use]
pub fn log_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d-T %H:%M:%S").to_string()
}
