use super::SelectorConfig;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

/// Subtitle convention for sung or non-speech lines.
pub const MUSIC_MARKER: char = '♪';

fn markup_regex() -> &'static Regex {
    static MARKUP: OnceLock<Regex> = OnceLock::new();
    MARKUP.get_or_init(|| {
        Regex::new(r"(?i)</?[ibu]>|<font[^>]*>|</font>|\{\\[^}]*\}").expect("Invalid regex")
    })
}

/// Why a line was not selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rejection {
    Music,
    TooLong,
    NotCapitalized,
    Unterminated,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Music => write!(f, "music"),
            Rejection::TooLong => write!(f, "too long"),
            Rejection::NotCapitalized => write!(f, "not capitalized"),
            Rejection::Unterminated => write!(f, "unterminated"),
        }
    }
}

/// Strip inline markup and line breaks, collapse whitespace and trim.
///
/// Always succeeds; the result may be empty. Applying it twice gives the
/// same result as applying it once.
pub fn normalize(text: &str) -> String {
    let mut current = text.to_string();
    // Removing one tag can expose another, e.g. "<<i>i>"
    loop {
        let stripped = match markup_regex().replace_all(&current, " ") {
            Cow::Borrowed(_) => break,
            Cow::Owned(stripped) => stripped,
        };
        current = stripped;
    }

    current.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First rule the normalized `text` fails, checked in order: music marker,
/// length, capital first character, terminal punctuation.
///
/// Only the first and last characters are inspected, so a line wrapped
/// in quotes or brackets is rejected even when it reads as a sentence.
pub fn rejection(text: &str, config: &SelectorConfig) -> Option<Rejection> {
    if text.contains(MUSIC_MARKER) {
        return Some(Rejection::Music);
    }

    if text.chars().count() > config.max_line_length {
        return Some(Rejection::TooLong);
    }

    match text.chars().next() {
        Some(first) if first.is_uppercase() => {}
        _ => return Some(Rejection::NotCapitalized),
    }

    match text.chars().last() {
        Some(last) if config.terminal_punctuation.contains(&last) => None,
        _ => Some(Rejection::Unterminated),
    }
}

/// Whether the normalized `text` can stand alone as a clip.
pub fn is_eligible(text: &str, config: &SelectorConfig) -> bool {
    rejection(text, config).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SelectorConfig {
        SelectorConfig::default()
    }

    #[test]
    fn test_normalize_markup_and_breaks() {
        assert_eq!(normalize("<i>What are you</i>\ndoing?"), "What are you doing?");
        assert_eq!(normalize("  Run!  "), "Run!");
        assert_eq!(normalize("<font color=\"#ffff00\">Hey!</font>"), "Hey!");
        assert_eq!(normalize("{\\an8}Up here."), "Up here.");
        assert_eq!(normalize("A\r\n  B"), "A B");
    }

    #[test]
    fn test_normalize_can_be_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("<i></i>\n"), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "<i>What?</i>",
            "<<i>i>Nested</i>",
            "<font<i>>Odd</font>",
            "Line one\nline two",
            "  spaced   out  ",
            "\u{00a0}Who?\t",
            "",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_music_marker_rejects_first() {
        // Music wins even over a lowercase start or missing punctuation
        assert_eq!(rejection("♪ love is all you need ♪", &config()), Some(Rejection::Music));
        assert_eq!(rejection("Sing ♪!", &config()), Some(Rejection::Music));
        assert!(!is_eligible("♪", &config()));
    }

    #[test]
    fn test_length_ceiling() {
        let at_limit = format!("A{}.", "b".repeat(33));
        assert_eq!(at_limit.chars().count(), 35);
        assert!(is_eligible(&at_limit, &config()));

        let over_limit = format!("A{}.", "b".repeat(34));
        assert_eq!(rejection(&over_limit, &config()), Some(Rejection::TooLong));
    }

    #[test]
    fn test_length_counts_characters() {
        let accented = format!("É{}!", "é".repeat(33));
        assert_eq!(accented.chars().count(), 35);
        assert!(is_eligible(&accented, &config()));
    }

    #[test]
    fn test_capital_start() {
        assert_eq!(
            rejection("were running away from him but", &config()),
            Some(Rejection::NotCapitalized)
        );
        assert_eq!(rejection("", &config()), Some(Rejection::NotCapitalized));
        assert_eq!(rejection("3 more.", &config()), Some(Rejection::NotCapitalized));
        assert!(is_eligible("Who?", &config()));
    }

    #[test]
    fn test_terminal_punctuation() {
        assert!(is_eligible("I'm done.", &config()));
        assert!(is_eligible("You are crazy!", &config()));
        assert!(is_eligible("What are you doing?", &config()));
        assert_eq!(rejection("Wait,", &config()), Some(Rejection::Unterminated));
        assert_eq!(rejection("Hello", &config()), Some(Rejection::Unterminated));
    }

    #[test]
    fn test_quoted_lines_are_rejected() {
        assert_eq!(rejection("\"Run!\"", &config()), Some(Rejection::NotCapitalized));
        assert_eq!(rejection("Run!\"", &config()), Some(Rejection::Unterminated));
    }
}
