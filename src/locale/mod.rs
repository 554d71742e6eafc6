//! Distribution locales and the local-asset fallback chain.
//!
//! # Overview
//!
//! The store names listings by distribution locale (`pt-BR`, `fr-CA`, `es-419`).
//! Local assets are usually authored per base language (`pt`, `fr`) with a
//! few locale-specific variants. Resolution tries the full code first, then
//! the base language:
//!
//! ```text
//! pt-BR -> pt-BR (if authored) -> pt (if authored) -> not found
//! ```
//!
//! The same chain serves the words store (translation languages) and the
//! image directories (file name prefixes), see [`resolve_first`].

use std::fmt;

pub mod distribution;

/// A distribution locale code with its base-language projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    /// Full code as used by the store (e.g. `pt-BR`).
    code: String,
}

impl Locale {
    /// Wrap a distribution locale code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into().trim().to_string(),
        }
    }

    /// Full distribution code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Base language: the code up to the first `-` or `_` (`pt-BR` → `pt`).
    #[must_use]
    pub fn base_language(&self) -> &str {
        base_language(&self.code)
    }

    /// What: Candidate local names, most specific first.
    ///
    /// Inputs: None
    ///
    /// Output:
    /// - `[code, base]`, or just `[code]` when the locale has no region.
    #[must_use]
    pub fn candidates(&self) -> Vec<&str> {
        let base = self.base_language();
        if base == self.code {
            vec![self.code.as_str()]
        } else {
            vec![self.code.as_str(), base]
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// What: Project a locale code onto its base language.
///
/// Inputs:
/// - `code`: Locale code (`pt-BR`, `zh_TW`, `fr`).
///
/// Output:
/// - Language part (`pt`, `zh`, `fr`).
///
/// Details:
/// - Pure and deterministic; a code without separator is its own base language.
#[must_use]
pub fn base_language(code: &str) -> &str {
    code.split(['-', '_']).next().unwrap_or(code)
}

/// Outcome of resolving a locale against a local asset source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    /// Local name that matched (`pt-BR` or `pt`).
    pub name: String,
    /// Whether the match came from the base-language fallback.
    pub fallback: bool,
    /// Value produced by the lookup for that name.
    pub value: T,
}

/// What: Resolve `locale` through the fallback chain.
///
/// Inputs:
/// - `locale`: Distribution locale to resolve.
/// - `lookup`: Read-only lookup returning `Some(value)` when the local source has `name`.
///
/// Output:
/// - The first candidate (full code, then base language) whose lookup returns `Some`.
/// - `None` when neither candidate is available.
///
/// Details:
/// - `lookup` must be side-effect free; resolution is then idempotent.
pub fn resolve_first<T, F>(locale: &Locale, mut lookup: F) -> Option<Resolved<T>>
where
    F: FnMut(&str) -> Option<T>,
{
    locale
        .candidates()
        .into_iter()
        .enumerate()
        .find_map(|(i, name)| {
            lookup(name).map(|value| Resolved {
                name: name.to_string(),
                fallback: i > 0,
                value,
            })
        })
}

/// What: Resolve `locale` against a set of available local names.
///
/// Inputs:
/// - `locale`: Distribution locale.
/// - `has`: Predicate telling whether a local name is available.
///
/// Output:
/// - The matching local name, or `None` (not found).
pub fn resolve<F>(locale: &Locale, mut has: F) -> Option<String>
where
    F: FnMut(&str) -> bool,
{
    resolve_first(locale, |name| has(name).then_some(())).map(|r| r.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Base language strips the region for both separators.
    ///
    /// Inputs:
    /// - `pt-BR`, `zh_TW`, `es-419`, `fr`.
    ///
    /// Output:
    /// - `pt`, `zh`, `es`, `fr`.
    fn base_language_strips_region() {
        assert_eq!(Locale::new("pt-BR").base_language(), "pt");
        assert_eq!(Locale::new("zh_TW").base_language(), "zh");
        assert_eq!(Locale::new("es-419").base_language(), "es");
        assert_eq!(Locale::new("fr").base_language(), "fr");
    }

    #[test]
    /// What: Region-specific variants win over the base language.
    ///
    /// Inputs:
    /// - Local names `pt`, `pt-BR`, `zh-TW`.
    ///
    /// Output:
    /// - `pt-BR` → `pt-BR`; `pt-PT` → `pt`; `zh-CN` → not found.
    fn resolve_prefers_specific_match() {
        let available = ["pt", "pt-BR", "zh-TW"];
        let has = |name: &str| available.contains(&name);
        assert_eq!(resolve(&"pt-BR".into(), has).as_deref(), Some("pt-BR"));
        assert_eq!(resolve(&"pt-PT".into(), has).as_deref(), Some("pt"));
        assert_eq!(resolve(&"zh-CN".into(), has), None);
    }

    #[test]
    /// What: Base-only stores serve every regional locale of that language.
    ///
    /// Inputs:
    /// - Local names `pt` only.
    ///
    /// Output:
    /// - `pt-BR` and `pt-PT` both resolve to `pt` via fallback.
    fn resolve_falls_back_to_base_language() {
        let has = |name: &str| name == "pt";
        let br = resolve_first(&"pt-BR".into(), |n| has(n).then_some(()))
            .expect("pt-BR resolves");
        assert_eq!(br.name, "pt");
        assert!(br.fallback);
        assert_eq!(resolve(&"pt-PT".into(), has).as_deref(), Some("pt"));
    }

    #[test]
    /// What: A bare language is looked up once.
    ///
    /// Inputs:
    /// - Locale `fr` and a lookup counting calls.
    ///
    /// Output:
    /// - One lookup call, result not found.
    fn resolve_bare_language_looks_up_once() {
        let mut calls = 0;
        let r = resolve(&"fr".into(), |_| {
            calls += 1;
            false
        });
        assert_eq!(r, None);
        assert_eq!(calls, 1);
    }
}
