//! Play Store distribution locales.
//!
//! Copied from the Play Console "manage translations" dialog; the API offers
//! no way to list them.

use super::{Locale, base_language};

/// A store language as shown in the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Distribution {
    /// Console display name.
    pub name: &'static str,
    /// BCP-47 code used by the API.
    pub code: &'static str,
}

/// Shorthand constructor for the table below.
const fn d(name: &'static str, code: &'static str) -> Distribution {
    Distribution { name, code }
}

/// Every distribution locale supported by the store.
pub const DISTRIBUTION: &[Distribution] = &[
    d("Afrikaans", "af"),
    d("Albanian", "sq"),
    d("Amharic", "am"),
    d("Arabic", "ar"),
    d("Armenian", "hy-AM"),
    d("Azerbaijani", "az-AZ"),
    d("Bangla", "bn-BD"),
    d("Basque", "eu-ES"),
    d("Belarusian", "be"),
    d("Bulgarian", "bg"),
    d("Burmese", "my-MM"),
    d("Catalan", "ca"),
    d("Chinese (Hong Kong)", "zh-HK"),
    d("Chinese (Simplified)", "zh-CN"),
    d("Chinese (Traditional)", "zh-TW"),
    d("Croatian", "hr"),
    d("Czech", "cs-CZ"),
    d("Danish", "da-DK"),
    d("Dutch", "nl-NL"),
    d("English (Australia)", "en-AU"),
    d("English (Canada)", "en-CA"),
    d("English (India)", "en-IN"),
    d("English (Singapore)", "en-SG"),
    d("English (South Africa)", "en-ZA"),
    d("English (United Kingdom)", "en-GB"),
    d("English (United States)", "en-US"),
    d("Estonian", "et"),
    d("Filipino", "fil"),
    d("Finnish", "fi-FI"),
    d("French (Canada)", "fr-CA"),
    d("French (France)", "fr-FR"),
    d("Galician", "gl-ES"),
    d("Georgian", "ka-GE"),
    d("German", "de-DE"),
    d("Greek", "el-GR"),
    d("Gujarati", "gu"),
    d("Hebrew", "iw-IL"),
    d("Hindi", "hi-IN"),
    d("Hungarian", "hu-HU"),
    d("Icelandic", "is-IS"),
    d("Indonesian", "id"),
    d("Italian", "it-IT"),
    d("Japanese", "ja-JP"),
    d("Kannada", "kn-IN"),
    d("Kazakh", "kk"),
    d("Khmer", "km-KH"),
    d("Korean", "ko-KR"),
    d("Kyrgyz", "ky-KG"),
    d("Lao", "lo-LA"),
    d("Latvian", "lv"),
    d("Lithuanian", "lt"),
    d("Macedonian", "mk-MK"),
    d("Malay (Malaysia)", "ms-MY"),
    d("Malay", "ms"),
    d("Malayalam", "ml-IN"),
    d("Marathi", "mr-IN"),
    d("Mongolian", "mn-MN"),
    d("Nepali", "ne-NP"),
    d("Norwegian", "no-NO"),
    d("Persian", "fa"),
    d("Persian (UAE)", "fa-AE"),
    d("Persian (Afghanistan)", "fa-AF"),
    d("Persian (Iran)", "fa-IR"),
    d("Polish", "pl-PL"),
    d("Portuguese (Brazil)", "pt-BR"),
    d("Portuguese (Portugal)", "pt-PT"),
    d("Punjabi", "pa"),
    d("Romanian", "ro"),
    d("Romansh", "rm"),
    d("Russian", "ru-RU"),
    d("Serbian", "sr"),
    d("Sinhala", "si-LK"),
    d("Slovak", "sk"),
    d("Slovenian", "sl"),
    d("Spanish (Latin America)", "es-419"),
    d("Spanish (Spain)", "es-ES"),
    d("Spanish (United States)", "es-US"),
    d("Swahili", "sw"),
    d("Swedish", "sv-SE"),
    d("Tamil", "ta-IN"),
    d("Telugu", "te-IN"),
    d("Thai", "th"),
    d("Turkish", "tr-TR"),
    d("Ukrainian", "uk"),
    d("Urdu", "ur"),
    d("Vietnamese", "vi"),
    d("Zulu", "zu"),
];

/// What: Look up a distribution entry by display name or code.
///
/// Inputs:
/// - `query`: Display name (`German`) or code (`de-DE`), case-insensitive.
///
/// Output:
/// - Matching entry, or `None`.
#[must_use]
pub fn find(query: &str) -> Option<&'static Distribution> {
    let q = query.trim();
    DISTRIBUTION
        .iter()
        .find(|e| e.code.eq_ignore_ascii_case(q) || e.name.eq_ignore_ascii_case(q))
}

/// Whether the store distributes to `code`.
#[must_use]
pub fn is_supported(code: &str) -> bool {
    DISTRIBUTION.iter().any(|e| e.code == code)
}

/// What: Find a distribution locale for a bare language.
///
/// Inputs:
/// - `lang`: Language code (`de`, `pt`).
///
/// Output:
/// - `xx-XX` when the store has it (`de` → `de-DE`), else the first locale of that language.
/// - `None` when the store has no locale for the language.
#[must_use]
pub fn locale_for_language(lang: &str) -> Option<&'static str> {
    let doubled = format!("{lang}-{}", lang.to_ascii_uppercase());
    DISTRIBUTION
        .iter()
        .find(|e| e.code == doubled)
        .or_else(|| DISTRIBUTION.iter().find(|e| base_language(e.code) == lang))
        .map(|e| e.code)
}

/// What: Split the distribution locales by whether local words resolve for them.
///
/// Inputs:
/// - `base_locale`: Source-of-truth locale, excluded from both lists.
/// - `has_language`: Lookup into the words store.
///
/// Output:
/// - `(translatable, untranslatable)` distribution codes, table order.
pub fn partition_translatable<F>(
    base_locale: &str,
    mut has_language: F,
) -> (Vec<&'static str>, Vec<&'static str>)
where
    F: FnMut(&str) -> bool,
{
    let mut yes = Vec::new();
    let mut no = Vec::new();
    for entry in DISTRIBUTION.iter().filter(|e| e.code != base_locale) {
        if super::resolve(&Locale::new(entry.code), &mut has_language).is_some() {
            yes.push(entry.code);
        } else {
            no.push(entry.code);
        }
    }
    (yes, no)
}
