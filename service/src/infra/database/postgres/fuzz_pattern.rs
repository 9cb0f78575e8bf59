//! [`FuzzPattern`] definition.

use derive_more::Display;
use itertools::Itertools as _;
use postgres_types::{FromSql, ToSql};

/// Characters having a special meaning in `SIMILAR TO` patterns.
const SPECIAL_CHARS: [char; 13] = [
    '\\', '%', '_', '|', '*', '+', '?', '{', '}', '(', ')', '[', ']',
];

/// `SIMILAR TO` pattern matching a text which contains any word of a search
/// input.
///
/// Words are separated by whitespaces or commas, so `Lisbon, Portugal` matches
/// any text mentioning either `Lisbon` or `Portugal`.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct FuzzPattern(String);

impl FuzzPattern {
    /// Creates a new [`FuzzPattern`] out of the given search `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        let words = input
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|w| !w.is_empty());
        Self(format!(
            "%({})%",
            words.format_with("|", |w, f| f(&escape(w))),
        ))
    }
}

/// Escapes [`SPECIAL_CHARS`] in the provided `word`.
fn escape(word: &str) -> String {
    let mut escaped = String::with_capacity(word.len());
    for c in word.chars() {
        if SPECIAL_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod spec {
    use super::FuzzPattern;

    #[test]
    fn matches_any_word() {
        assert_eq!(
            FuzzPattern::new("Lisbon, Portugal").to_string(),
            "%(Lisbon|Portugal)%",
        );
        assert_eq!(
            FuzzPattern::new("  New   York ").to_string(),
            "%(New|York)%",
        );
    }

    #[test]
    fn escapes_special_chars() {
        assert_eq!(
            FuzzPattern::new(r"50%_off (a|b)\").to_string(),
            r"%(50\%\_off|\(a\|b\)\\)%",
        );
    }
}
