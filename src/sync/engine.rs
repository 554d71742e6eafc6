//! Run orchestration: session, locale fan-out, commit join point.

use std::sync::atomic::AtomicBool;

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use super::images::reconcile_category;
use super::report::{CommitStatus, LocaleReport, SyncReport, WorkOutcome};
use super::session::{CommitCoordinator, CommitOutcome, EditSession};
use super::text::{TextSources, apply_translation};
use super::{LocalAssets, SyncError, SyncOptions, ensure_not_cancelled};
use crate::locale::{Locale, distribution};
use crate::store::{ImageCategory, ListingStore, ListingText};

/// Shared, read-only state of the locale workers.
struct RunContext<'a> {
    /// Remote store.
    store: &'a dyn ListingStore,
    /// Open edit.
    session: &'a EditSession,
    /// Change signal.
    coordinator: &'a CommitCoordinator,
    /// Local sources.
    assets: &'a LocalAssets,
    /// Title ceiling.
    title_max_len: usize,
    /// Interrupt flag.
    cancel: &'a AtomicBool,
}

/// What: Reconcile the package's listings with the local sources.
///
/// Inputs:
/// - `store`: Remote listing store (possibly wrapped for retry or dry run).
/// - `assets`: Words, images and substitutions; a missing source skips that work.
/// - `options`: Package, locale filter and limits.
/// - `cancel`: Interrupt flag; once set no new remote call is issued and nothing is committed.
///
/// Output:
/// - Report with one entry per processed locale and the commit status.
///
/// # Errors
/// - Failures before locale processing starts (session, details, listings).
/// - `SyncError::UnknownLocales` when the filter names a locale without a listing.
/// - `SyncError::NoListings` when nothing is left to process.
///
/// Details:
/// - Per-locale failures are recorded in the report and never stop other locales.
/// - A failed commit is reported as `CommitStatus::Failed`.
pub async fn run(
    store: &dyn ListingStore,
    assets: &LocalAssets,
    options: &SyncOptions,
    cancel: &AtomicBool,
) -> Result<SyncReport, SyncError> {
    ensure_not_cancelled(cancel)?;
    let key = store.open_session(&options.package).await?;
    info!(edit = %key, "edit session opened");

    let details = store.app_details(&key).await?;
    if details.default_language.trim().is_empty() {
        return Err(SyncError::NoBaseLocale);
    }
    let base_locale = Locale::new(details.default_language.as_str());
    info!(
        package = %options.package,
        base_locale = %base_locale,
        email = %details.contact_email,
        website = %details.contact_website,
        "package details"
    );

    let listings = store.list_listings(&key).await?;
    let locales = select_locales(&listings, &options.locales)?;
    for locale in locales.iter().filter(|l| !distribution::is_supported(l.code())) {
        warn!(locale = %locale, "listing locale is not in the distribution table");
    }
    let base_listing = if options.show_base_listing {
        listings
            .iter()
            .find(|l| l.language == base_locale.code())
            .cloned()
    } else {
        None
    };

    let untranslatable: Vec<String> = assets.words.as_ref().map_or_else(Vec::new, |words| {
        locales
            .iter()
            .filter(|l| **l != base_locale && words.resolve(l).is_none())
            .map(|l| l.code().to_string())
            .collect()
    });
    if !untranslatable.is_empty() {
        warn!(locales = ?untranslatable, "no local words for these locales");
    }

    let session = EditSession::new(key, base_locale);
    let coordinator = CommitCoordinator::new();
    let ctx = RunContext {
        store,
        session: &session,
        coordinator: &coordinator,
        assets,
        title_max_len: options.title_max_len,
        cancel,
    };
    let ctx = &ctx;

    let mut results: Vec<(usize, LocaleReport)> = stream::iter(locales.into_iter().enumerate())
        .map(|(order, locale)| async move { (order, process_locale(ctx, locale).await) })
        .buffer_unordered(options.concurrency.max(1))
        .collect()
        .await;
    results.sort_by_key(|(order, _)| *order);
    let reports: Vec<LocaleReport> = results.into_iter().map(|(_, r)| r).collect();

    let commit = if ensure_not_cancelled(cancel).is_err() {
        warn!(edit = %session.key(), "run cancelled; staged changes not committed");
        CommitStatus::Cancelled
    } else {
        match coordinator.finalize(store, &session).await {
            Ok(CommitOutcome::Committed) => CommitStatus::Committed,
            Ok(CommitOutcome::NothingToCommit) => CommitStatus::NothingToCommit,
            Err(e) => {
                error!(edit = %session.key(), error = %e, "commit failed");
                CommitStatus::Failed(e.to_string())
            }
        }
    };

    Ok(SyncReport {
        package: session.package().to_string(),
        base_locale: session.base_locale().code().to_string(),
        base_listing,
        untranslatable,
        locales: reports,
        commit,
    })
}

/// What: Apply the locale filter to the listings.
///
/// Inputs:
/// - `listings`: Listings of the edit, in store order.
/// - `requested`: Filter; empty keeps everything.
///
/// Output:
/// - Locales to process, in listing order.
///
/// # Errors
/// - `SyncError::UnknownLocales` for requested locales without a listing.
/// - `SyncError::NoListings` when the result is empty.
fn select_locales(listings: &[ListingText], requested: &[String]) -> Result<Vec<Locale>, SyncError> {
    let unknown: Vec<String> = requested
        .iter()
        .filter(|r| !listings.iter().any(|l| &l.language == *r))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(SyncError::UnknownLocales(unknown));
    }
    let locales: Vec<Locale> = listings
        .iter()
        .filter(|l| requested.is_empty() || requested.contains(&l.language))
        .map(|l| Locale::new(l.language.as_str()))
        .collect();
    if locales.is_empty() {
        return Err(SyncError::NoListings);
    }
    Ok(locales)
}

/// Turn a work result into an outcome, logging failures.
fn outcome(locale: &Locale, kind: &str, result: Result<bool, SyncError>) -> WorkOutcome {
    match result {
        Ok(true) => WorkOutcome::Updated,
        Ok(false) => WorkOutcome::Unchanged,
        Err(e) => {
            warn!(locale = %locale, kind, error = %e, "locale work failed");
            WorkOutcome::Failed(e.to_string())
        }
    }
}

/// Run text and image work for one locale.
async fn process_locale(ctx: &RunContext<'_>, locale: Locale) -> LocaleReport {
    let is_base = &locale == ctx.session.base_locale();
    let text = async {
        let words = ctx.assets.words.as_ref()?;
        if is_base {
            info!(locale = %locale, "base locale text is the source; not translating");
            return None;
        }
        let sources = TextSources {
            words,
            substitutions: &ctx.assets.substitutions,
            title_max_len: ctx.title_max_len,
        };
        let result = apply_translation(
            ctx.store,
            ctx.session,
            ctx.coordinator,
            sources,
            &locale,
            ctx.cancel,
        )
        .await;
        Some(outcome(&locale, "text", result))
    };
    let images = async {
        let dir = ctx.assets.images_dir.as_deref()?;
        Some(reconcile_images(ctx, dir, &locale).await)
    };
    let (text, images) = futures::join!(text, images);
    LocaleReport {
        locale: locale.code().to_string(),
        text,
        images,
    }
}

/// Reconcile every image category of one locale concurrently.
async fn reconcile_images(
    ctx: &RunContext<'_>,
    dir: &std::path::Path,
    locale: &Locale,
) -> WorkOutcome {
    let results = join_all(ImageCategory::ALL.into_iter().map(|category| async move {
        let result = reconcile_category(
            ctx.store,
            ctx.session,
            ctx.coordinator,
            dir,
            locale,
            category,
            ctx.cancel,
        )
        .await;
        (category, result)
    }))
    .await;

    let mut changed = false;
    let mut failures = Vec::new();
    for (category, result) in results {
        match result {
            Ok(c) => changed |= c,
            Err(e) => {
                warn!(locale = %locale, category = %category, error = %e, "image reconciliation failed");
                failures.push(format!("{category}: {e}"));
            }
        }
    }
    match (failures.is_empty(), changed) {
        (false, _) => WorkOutcome::Failed(failures.join("; ")),
        (true, true) => WorkOutcome::Updated,
        (true, false) => WorkOutcome::Unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Listing with only a language set.
    fn listing(lang: &str) -> ListingText {
        ListingText {
            language: lang.into(),
            ..ListingText::default()
        }
    }

    #[test]
    /// What: The locale filter keeps listing order and rejects unknown locales.
    ///
    /// Inputs:
    /// - Listings `en-US`, `de-DE`, `fr-FR`; filters `[fr-FR, de-DE]`, `[xx]`, `[]`.
    ///
    /// Output:
    /// - `[de-DE, fr-FR]`; `UnknownLocales([xx])`; all three.
    fn select_locales_filters_in_listing_order() {
        let listings = [listing("en-US"), listing("de-DE"), listing("fr-FR")];
        let picked = select_locales(&listings, &["fr-FR".into(), "de-DE".into()]).expect("select");
        let codes: Vec<&str> = picked.iter().map(Locale::code).collect();
        assert_eq!(codes, vec!["de-DE", "fr-FR"]);

        let err = select_locales(&listings, &["xx".into()]).expect_err("unknown");
        assert!(matches!(err, SyncError::UnknownLocales(ref l) if l == &["xx".to_string()]));
        assert!(err.is_usage());

        assert_eq!(select_locales(&listings, &[]).expect("all").len(), 3);
    }

    #[test]
    /// What: No listings is an error.
    ///
    /// Inputs:
    /// - Empty listings, empty filter.
    ///
    /// Output:
    /// - `NoListings`.
    fn select_locales_empty() {
        assert!(matches!(select_locales(&[], &[]), Err(SyncError::NoListings)));
    }
}
