//! Local meaning-ordered words store.
//!
//! # Layout
//!
//! ```text
//! words/
//!   en.txt
//!   de.txt
//!   pt.txt
//!   pt-BR.txt
//! ```
//!
//! Each file holds one phrase per line. Line *i* of every file means the
//! same thing, so a translation map between two languages is the pairing
//! of their lines by index.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::locale::{self, Locale};

pub mod substitutions;
pub mod translation;

pub use substitutions::Substitutions;
pub use translation::TranslationMap;

/// File extension of words files.
const WORDS_EXT: &str = "txt";

/// Failure of the local words store.
#[derive(Debug, Error)]
pub enum WordsError {
    /// No words file for the language.
    #[error("no words for language '{0}'")]
    MissingLanguage(String),
    /// A words file could not be read.
    #[error("reading {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Two words files are not aligned.
    #[error("{base} has {base_lines} lines but {target} has {target_lines}")]
    Misaligned {
        /// Base language.
        base: String,
        /// Line count of the base file.
        base_lines: usize,
        /// Target language.
        target: String,
        /// Line count of the target file.
        target_lines: usize,
    },
}

/// Read-only view of a words directory.
#[derive(Debug, Clone)]
pub struct WordsStore {
    /// Directory holding `<lang>.txt` files.
    dir: PathBuf,
}

impl WordsStore {
    /// Open the store rooted at `dir`; nothing is read until queried.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory of the store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the words file for `lang`.
    fn file_for(&self, lang: &str) -> PathBuf {
        self.dir.join(format!("{lang}.{WORDS_EXT}"))
    }

    /// Whether a words file exists for exactly `lang`.
    #[must_use]
    pub fn has_language(&self, lang: &str) -> bool {
        !lang.is_empty() && self.file_for(lang).is_file()
    }

    /// What: List the languages present in the store.
    ///
    /// Inputs: None
    ///
    /// Output:
    /// - Sorted language names (file stems of `*.txt`).
    ///
    /// # Errors
    /// - `WordsError::Io` when the directory cannot be read.
    pub fn languages(&self) -> Result<BTreeSet<String>, WordsError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| WordsError::Io {
            path: self.dir.clone(),
            source,
        })?;
        Ok(entries
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == WORDS_EXT))
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect())
    }

    /// What: Resolve a distribution locale to a local language.
    ///
    /// Inputs:
    /// - `locale`: Distribution locale.
    ///
    /// Output:
    /// - Full code when authored, otherwise the base language when authored, otherwise `None`.
    #[must_use]
    pub fn resolve(&self, locale: &Locale) -> Option<String> {
        locale::resolve(locale, |name| self.has_language(name))
    }

    /// Read the lines of one language file.
    fn read_lines(&self, lang: &str) -> Result<Vec<String>, WordsError> {
        let path = self.file_for(lang);
        if !path.is_file() {
            return Err(WordsError::MissingLanguage(lang.to_string()));
        }
        let text = std::fs::read_to_string(&path).map_err(|source| WordsError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(text.lines().map(|l| l.trim_end().to_string()).collect())
    }

    /// What: Build the line-indexed translation map from `base` to `target`.
    ///
    /// Inputs:
    /// - `base`: Local language of the source text.
    /// - `target`: Local language to translate into.
    ///
    /// Output:
    /// - Map from each base line to the target line with the same index.
    ///
    /// # Errors
    /// - `WordsError::MissingLanguage` when either file is absent.
    /// - `WordsError::Misaligned` when line counts differ.
    /// - `WordsError::Io` on read failures.
    pub fn translation_map(&self, base: &str, target: &str) -> Result<TranslationMap, WordsError> {
        let base_lines = self.read_lines(base)?;
        let target_lines = self.read_lines(target)?;
        if base_lines.len() != target_lines.len() {
            return Err(WordsError::Misaligned {
                base: base.to_string(),
                base_lines: base_lines.len(),
                target: target.to_string(),
                target_lines: target_lines.len(),
            });
        }
        Ok(TranslationMap::from_pairs(
            base_lines.into_iter().zip(target_lines),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Write a words directory with the given `(lang, contents)` files.
    fn words_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        for (lang, contents) in files {
            std::fs::write(dir.path().join(format!("{lang}.txt")), contents).expect("write words");
        }
        dir
    }

    #[test]
    /// What: Languages are listed from `.txt` stems only.
    ///
    /// Inputs:
    /// - `en.txt`, `pt-BR.txt` and a stray `README.md`.
    ///
    /// Output:
    /// - `{en, pt-BR}`.
    fn languages_lists_txt_stems() {
        let dir = words_dir(&[("en", "a\n"), ("pt-BR", "b\n")]);
        std::fs::write(dir.path().join("README.md"), "x").expect("write readme");
        let store = WordsStore::new(dir.path());
        let langs: Vec<String> = store.languages().expect("languages").into_iter().collect();
        assert_eq!(langs, vec!["en".to_string(), "pt-BR".to_string()]);
    }

    #[test]
    /// What: Locale resolution uses the words files with the fallback chain.
    ///
    /// Inputs:
    /// - Files for `pt` and `zh-TW`.
    ///
    /// Output:
    /// - `pt-BR` → `pt`, `zh-TW` → `zh-TW`, `zh-CN` → none.
    fn resolve_uses_words_files() {
        let dir = words_dir(&[("pt", ""), ("zh-TW", "")]);
        let store = WordsStore::new(dir.path());
        assert_eq!(store.resolve(&"pt-BR".into()).as_deref(), Some("pt"));
        assert_eq!(store.resolve(&"zh-TW".into()).as_deref(), Some("zh-TW"));
        assert_eq!(store.resolve(&"zh-CN".into()), None);
    }

    #[test]
    /// What: Translation maps pair lines by index.
    ///
    /// Inputs:
    /// - `en`: Hello / Play now; `de`: Hallo / Jetzt spielen.
    ///
    /// Output:
    /// - `Play now` maps to `Jetzt spielen`.
    fn translation_map_pairs_lines() {
        let dir = words_dir(&[("en", "Hello\nPlay now\n"), ("de", "Hallo\nJetzt spielen\n")]);
        let map = WordsStore::new(dir.path())
            .translation_map("en", "de")
            .expect("map");
        assert_eq!(map.get("Play now"), Some("Jetzt spielen"));
    }

    #[test]
    /// What: Missing and misaligned files are hard errors.
    ///
    /// Inputs:
    /// - `en` with two lines, `fr` with one, no `it`.
    ///
    /// Output:
    /// - `Misaligned` for en→fr, `MissingLanguage` for en→it.
    fn translation_map_errors() {
        let dir = words_dir(&[("en", "a\nb\n"), ("fr", "a\n")]);
        let store = WordsStore::new(dir.path());
        assert!(matches!(
            store.translation_map("en", "fr"),
            Err(WordsError::Misaligned { base_lines: 2, target_lines: 1, .. })
        ));
        assert!(matches!(
            store.translation_map("en", "it"),
            Err(WordsError::MissingLanguage(l)) if l == "it"
        ));
    }
}
