//! Listing text translation for one locale.

use std::sync::atomic::AtomicBool;

use tracing::{debug, info};

use super::session::{CommitCoordinator, EditSession};
use super::{SyncError, ensure_not_cancelled, run_blocking};
use crate::locale::Locale;
use crate::store::{ListingStore, ListingText};
use crate::words::{Substitutions, TranslationMap, WordsStore};

/// Local sources used to translate listing text.
#[derive(Debug, Clone, Copy)]
pub struct TextSources<'a> {
    /// Meaning-ordered words store.
    pub words: &'a WordsStore,
    /// Title substitutions.
    pub substitutions: &'a Substitutions,
    /// Store-imposed title length ceiling, in characters.
    pub title_max_len: usize,
}

/// What: Translate the base listing into `locale`.
///
/// Inputs:
/// - `base`: Base-locale listing.
/// - `locale`: Target distribution locale.
/// - `map`: Base → target line map.
/// - `substitutions`: Title alternates keyed by the base title.
/// - `title_max_len`: Title length ceiling.
///
/// Output:
/// - Candidate listing for `locale`; `video` is left empty.
///
/// Details:
/// - Every field is translated line by line.
/// - The title uses the substitution for the exact base title when it fits.
#[must_use]
pub fn translate_listing(
    base: &ListingText,
    locale: &str,
    map: &TranslationMap,
    substitutions: &Substitutions,
    title_max_len: usize,
) -> ListingText {
    ListingText {
        language: locale.to_string(),
        title: map.translate_by_line_with_alternate(
            &base.title,
            substitutions.get(&base.title),
            title_max_len,
        ),
        short_description: map.translate_by_line(&base.short_description),
        full_description: map.translate_by_line(&base.full_description),
        video: None,
    }
}

/// What: Bring the remote listing text of `locale` in line with the translated base.
///
/// Inputs:
/// - `store`, `session`, `coordinator`: Remote store, edit and change signal.
/// - `sources`: Words, substitutions and title ceiling.
/// - `locale`: Target locale; must differ from the base locale.
/// - `cancel`: Stops before the next remote call when set.
///
/// Output:
/// - `Ok(true)` when the listing was written, `Ok(false)` when it already matched.
///
/// # Errors
/// - `SyncError::SelfTranslation` when `locale` is the base locale.
/// - `SyncError::Resolution` when no words resolve for `locale` or the base locale.
/// - `SyncError::Words` when the translation map cannot be built.
/// - `SyncError::Store` on remote failures.
/// - `SyncError::Cancelled` when `cancel` is set.
///
/// Details:
/// - The base listing and the target listing are read fresh on every call.
/// - Words files are read on the blocking pool.
/// - The remote `video` field is carried over on write.
pub async fn apply_translation(
    store: &dyn ListingStore,
    session: &EditSession,
    coordinator: &CommitCoordinator,
    sources: TextSources<'_>,
    locale: &Locale,
    cancel: &AtomicBool,
) -> Result<bool, SyncError> {
    let base_locale = session.base_locale();
    if locale == base_locale {
        return Err(SyncError::SelfTranslation(locale.code().to_string()));
    }
    let base_lang = sources
        .words
        .resolve(base_locale)
        .ok_or_else(|| SyncError::Resolution(base_locale.code().to_string()))?;
    let target_lang = sources
        .words
        .resolve(locale)
        .ok_or_else(|| SyncError::Resolution(locale.code().to_string()))?;
    let map = {
        let words = sources.words.clone();
        let (base_lang, target_lang) = (base_lang.clone(), target_lang.clone());
        run_blocking(move || {
            words
                .translation_map(&base_lang, &target_lang)
                .map_err(SyncError::from)
        })
        .await?
    };
    debug!(
        locale = %locale,
        base = %base_lang,
        target = %target_lang,
        lines = map.len(),
        "translation map loaded"
    );

    ensure_not_cancelled(cancel)?;
    let base = store
        .get_listing(session.key(), base_locale.code())
        .await?;
    ensure_not_cancelled(cancel)?;
    let current = store.get_listing(session.key(), locale.code()).await?;

    let mut translated = translate_listing(
        &base,
        locale.code(),
        &map,
        sources.substitutions,
        sources.title_max_len,
    );
    if translated.same_text(&current) {
        debug!(locale = %locale, "listing text unchanged");
        return Ok(false);
    }
    translated.video = current.video;

    ensure_not_cancelled(cancel)?;
    store
        .put_listing(session.key(), locale.code(), &translated)
        .await?;
    coordinator.note_change();
    info!(locale = %locale, title = %translated.title, "listing text updated");
    Ok(true)
}
