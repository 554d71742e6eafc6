//! Line-by-line translation with a meaning-ordered map.

use std::collections::HashMap;

/// Mapping from base-language lines to target-language lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationMap {
    /// Base line → translated line.
    lines: HashMap<String, String>,
}

impl TranslationMap {
    /// What: Build a map from `(base, target)` line pairs.
    ///
    /// Inputs:
    /// - `pairs`: Lines with equal meaning.
    ///
    /// Output:
    /// - Map keyed by base line; blank base lines are skipped.
    ///
    /// Details:
    /// - When a base line repeats, the first pairing wins.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut lines = HashMap::new();
        for (base, target) in pairs {
            if base.trim().is_empty() {
                continue;
            }
            lines.entry(base).or_insert(target);
        }
        Self { lines }
    }

    /// Translation of exactly `line`, if known.
    #[must_use]
    pub fn get(&self, line: &str) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    /// Number of known lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the map knows no line.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// What: Translate `text` one line at a time.
    ///
    /// Inputs:
    /// - `text`: Multi-line base-language text.
    ///
    /// Output:
    /// - Text with every known line replaced; unknown and blank lines are kept.
    ///
    /// Details:
    /// - A field with N lines yields N lines; line breaks, including a trailing
    ///   newline, are preserved.
    /// - Lookup is on the line with trailing whitespace removed.
    #[must_use]
    pub fn translate_by_line(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let (body, cr) = line
                .strip_suffix('\r')
                .map_or((line, ""), |body| (body, "\r"));
            let key = body.trim_end();
            match self.get(key) {
                Some(translated) => out.push_str(translated),
                None => out.push_str(body),
            }
            out.push_str(cr);
        }
        out
    }

    /// What: Translate a length-limited field, preferring an alternate literal.
    ///
    /// Inputs:
    /// - `text`: Base-language text.
    /// - `alternate`: Preferred replacement for the whole field, if any.
    /// - `max_chars`: Store-imposed length ceiling in characters.
    ///
    /// Output:
    /// - `alternate` when present, non-empty and within `max_chars`;
    ///   otherwise the line-by-line translation of `text`.
    #[must_use]
    pub fn translate_by_line_with_alternate(
        &self,
        text: &str,
        alternate: Option<&str>,
        max_chars: usize,
    ) -> String {
        match alternate {
            Some(alt) if !alt.is_empty() && alt.chars().count() <= max_chars => alt.to_string(),
            _ => self.translate_by_line(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// English → Spanish fixture.
    fn es_map() -> TranslationMap {
        TranslationMap::from_pairs([
            ("Free Game".to_string(), "Juego Gratis".to_string()),
            ("Play now".to_string(), "Juega ahora".to_string()),
            ("No ads".to_string(), "Sin anuncios".to_string()),
        ])
    }

    #[test]
    /// What: Each line is translated independently and line breaks survive.
    ///
    /// Inputs:
    /// - `Play now\n\nNo ads\nUnknown line\n`.
    ///
    /// Output:
    /// - Same number of lines, known ones translated, blank and unknown kept.
    fn translate_by_line_keeps_structure() {
        let out = es_map().translate_by_line("Play now\n\nNo ads\nUnknown line\n");
        assert_eq!(out, "Juega ahora\n\nSin anuncios\nUnknown line\n");
    }

    #[test]
    /// What: CRLF text keeps its carriage returns.
    ///
    /// Inputs:
    /// - `Play now\r\nNo ads`.
    ///
    /// Output:
    /// - `Juega ahora\r\nSin anuncios`.
    fn translate_by_line_handles_crlf() {
        assert_eq!(
            es_map().translate_by_line("Play now\r\nNo ads"),
            "Juega ahora\r\nSin anuncios"
        );
    }

    #[test]
    /// What: The alternate wins only when it fits the ceiling.
    ///
    /// Inputs:
    /// - Title `Free Game`, alternate `Gratis`, ceilings 30 and 3.
    ///
    /// Output:
    /// - `Gratis` under 30; line translation under 3; line translation without alternate.
    fn alternate_respects_length_ceiling() {
        let map = es_map();
        assert_eq!(
            map.translate_by_line_with_alternate("Free Game", Some("Gratis"), 30),
            "Gratis"
        );
        assert_eq!(
            map.translate_by_line_with_alternate("Free Game", Some("Gratis"), 3),
            "Juego Gratis"
        );
        assert_eq!(
            map.translate_by_line_with_alternate("Free Game", None, 30),
            "Juego Gratis"
        );
    }

    #[test]
    /// What: Blank base lines never become keys and the first pairing wins.
    ///
    /// Inputs:
    /// - Pairs with a blank base line and a repeated base line.
    ///
    /// Output:
    /// - One entry, mapped to the first target.
    fn from_pairs_skips_blank_and_keeps_first() {
        let map = TranslationMap::from_pairs([
            (String::new(), "x".to_string()),
            ("A".to_string(), "1".to_string()),
            ("A".to_string(), "2".to_string()),
        ]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("A"), Some("1"));
    }
}
