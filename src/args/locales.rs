//! `locales` command.

use playlisting::locale::distribution::{
    DISTRIBUTION, find, locale_for_language, partition_translatable,
};
use playlisting::words::WordsStore;

use crate::args::{Args, CommandError, utils};

/// What: Print the distribution locale table and, with a words directory, local coverage.
///
/// Inputs:
/// - `args`: Global arguments (words directory).
/// - `query`: Optional display name or code; prints only that entry.
/// - `base`: Base locale excluded from the coverage report.
///
/// Output:
/// - `Ok(())` after printing to stdout.
///
/// # Errors
/// - Configuration problems when the settings file cannot be loaded.
/// - `CommandError::Words` when the words directory cannot be listed.
///
/// Details:
/// - Without a words directory only the table is printed.
pub fn handle_locales(args: &Args, query: Option<&str>, base: &str) -> Result<(), CommandError> {
    let settings = utils::settings_from_args(args)?;
    if let Some(query) = query {
        match find(query) {
            Some(entry) => println!("{:<10} {}", entry.code, entry.name),
            None => println!("{query}: not a store distribution locale"),
        }
        return Ok(());
    }
    for entry in DISTRIBUTION {
        println!("{:<10} {}", entry.code, entry.name);
    }
    let Some(dir) = settings.words_dir else {
        return Ok(());
    };
    let words = WordsStore::new(dir);
    let languages = words.languages()?;
    tracing::debug!(count = languages.len(), dir = %words.dir().display(), "words languages");

    println!();
    println!("Words ({}):", languages.len());
    for lang in &languages {
        let locale = if lang.contains(['-', '_']) {
            Some(lang.as_str())
        } else {
            locale_for_language(lang)
        };
        println!("\t{lang:<8} {}", locale.unwrap_or("-"));
    }

    let (yes, no) = partition_translatable(base, |lang| words.has_language(lang));
    println!();
    println!("Translateable ({}): {}", yes.len(), yes.join(" "));
    println!("Untranslateable ({}): {}", no.len(), no.join(" "));
    Ok(())
}
