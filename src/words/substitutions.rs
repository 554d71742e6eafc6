//! Title substitution file.
//!
//! One `original: alternate` pair per line. The alternate replaces a whole
//! translated title when the line-by-line translation would not read well or
//! would not fit. Blank lines and `#` comments are ignored.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::util::config::{parse_key_value, skip_comment_or_empty};

/// Failure while loading a substitution file.
#[derive(Debug, Error)]
pub enum SubstitutionError {
    /// The file exists but could not be read.
    #[error("reading {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A line is not a single `original: alternate` pair.
    #[error("bad substitution '{line}' in {path} (line {number})")]
    Malformed {
        /// File containing the line.
        path: PathBuf,
        /// 1-based line number.
        number: usize,
        /// Offending line, trimmed.
        line: String,
    },
}

/// Original title → alternate title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    /// Parsed pairs.
    map: HashMap<String, String>,
}

impl Substitutions {
    /// What: Load substitutions from `path`.
    ///
    /// Inputs:
    /// - `path`: Substitution file.
    ///
    /// Output:
    /// - Parsed substitutions; empty when the file does not exist.
    ///
    /// # Errors
    /// - `SubstitutionError::Io` when the file exists but cannot be read.
    /// - `SubstitutionError::Malformed` for any line that is not one `a: b` pair.
    ///
    /// Details:
    /// - A missing file is logged as a warning rather than failing the run.
    pub fn load(path: &Path) -> Result<Self, SubstitutionError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "no substitution file");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SubstitutionError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let subs = Self::parse(&text).map_err(|(number, line)| SubstitutionError::Malformed {
            path: path.to_path_buf(),
            number,
            line,
        })?;
        tracing::debug!(path = %path.display(), count = subs.len(), "loaded substitutions");
        Ok(subs)
    }

    /// What: Parse substitution text.
    ///
    /// Inputs:
    /// - `text`: File contents.
    ///
    /// Output:
    /// - Parsed substitutions, or `(line_number, line)` of the first malformed line.
    ///
    /// # Errors
    /// - Returns the first line that lacks exactly one `:` separator.
    pub fn parse(text: &str) -> Result<Self, (usize, String)> {
        let mut map = HashMap::new();
        for (i, raw) in text.lines().enumerate() {
            if skip_comment_or_empty(raw) {
                continue;
            }
            let malformed = || (i + 1, raw.trim().to_string());
            let (orig, alt) = parse_key_value(raw, ':').ok_or_else(malformed)?;
            if alt.contains(':') || orig.is_empty() {
                return Err(malformed());
            }
            map.insert(orig, alt);
        }
        Ok(Self { map })
    }

    /// Alternate for `original`, if one is configured.
    #[must_use]
    pub fn get(&self, original: &str) -> Option<&str> {
        self.map.get(original).map(String::as_str)
    }

    /// Number of configured pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no pair is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<(String, String)> for Substitutions {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}
