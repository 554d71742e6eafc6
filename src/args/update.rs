//! `update` command.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use playlisting::config::ConfigError;
use playlisting::sync::{self, LocalAssets, SyncOptions, SyncReport};
use playlisting::words::{Substitutions, WordsStore};

use crate::args::{Args, CommandError, UpdateArgs, utils};

/// What: Reconcile the package listings and print the summary.
///
/// Inputs:
/// - `args`: Global arguments (paths, settings).
/// - `update`: Flags of the `update` command.
/// - `cancel`: Set by the Ctrl-C handler.
///
/// Output:
/// - Run report; the caller decides the exit code from it.
///
/// # Errors
/// - Configuration problems (checked before any remote call).
/// - Engine failures before locale processing starts.
pub async fn handle_update(
    args: &Args,
    update: &UpdateArgs,
    cancel: Arc<AtomicBool>,
) -> Result<SyncReport, CommandError> {
    let mut settings = utils::settings_from_args(args)?;
    if let Some(n) = update.concurrency {
        settings.concurrency = n.max(1);
    }
    settings.validate(update.do_text(), update.do_images())?;
    tracing::info!(
        package = %update.package,
        text = update.do_text(),
        images = update.do_images(),
        dry_run = update.dry_run,
        "update requested from CLI"
    );

    let substitutions = match (&settings.substitutions, update.do_text()) {
        (Some(path), true) => Substitutions::load(path).map_err(ConfigError::from)?,
        _ => Substitutions::default(),
    };
    let assets = LocalAssets {
        words: update
            .do_text()
            .then(|| settings.words_dir.clone().map(WordsStore::new))
            .flatten(),
        images_dir: update
            .do_images()
            .then(|| settings.images_dir.clone())
            .flatten(),
        substitutions,
    };
    let options = SyncOptions {
        package: update.package.clone(),
        locales: update.locales.clone(),
        title_max_len: settings.title_max_len,
        concurrency: settings.concurrency,
        show_base_listing: update.show_base,
    };

    let store = utils::build_store(&settings, update.dry_run)?;
    let report = sync::run(store.as_ref(), &assets, &options, &cancel).await?;

    if let Some(base) = &report.base_listing {
        println!("{} (base)", base.language);
        println!("{}", base.title);
        println!("{}", base.short_description);
        println!("{}", base.full_description);
        println!();
    }
    if !report.untranslatable.is_empty() {
        println!("no local words for: {}", report.untranslatable.join(" "));
    }
    println!("{report}");
    if update.dry_run {
        println!("(dry run: nothing was written)");
    }
    Ok(report)
}
