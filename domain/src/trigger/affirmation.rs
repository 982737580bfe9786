//! Affirmative intent detection
//!
//! A message confirms a pending question when its normalized text equals one
//! of the configured affirmation tokens. Matching is exact on the whole
//! message: "yes" confirms, "yes but not today" does not.

/// Default affirmation tokens, including Swedish and Norwegian variants
pub const DEFAULT_AFFIRMATIONS: &[&str] = &[
    "yes",
    "do it",
    "confirmed",
    "ja",
    "kör",
    "stemmer",
    "gör det",
];

/// Normalize message text for matching.
///
/// Trims, lowercases, collapses inner whitespace and drops trailing `.`/`!`.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .trim_end_matches(['.', '!'])
        .trim_end()
        .to_string()
}

/// Matches messages against a configurable set of affirmation tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffirmationMatcher {
    tokens: Vec<String>,
}

impl Default for AffirmationMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_AFFIRMATIONS.iter().copied())
    }
}

impl AffirmationMatcher {
    /// Tokens are normalized the same way as messages; blanks are dropped.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = tokens
            .into_iter()
            .map(|t| normalize(t.as_ref()))
            .filter(|t| !t.is_empty())
            .collect();
        normalized.sort();
        normalized.dedup();
        Self { tokens: normalized }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_affirmative(&self, text: &str) -> bool {
        let normalized = normalize(text);
        !normalized.is_empty() && self.tokens.iter().any(|t| *t == normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Yes!  "), "yes");
        assert_eq!(normalize("Do   IT."), "do it");
        assert_eq!(normalize("KÖR"), "kör");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_default_tokens_match() {
        let matcher = AffirmationMatcher::default();
        for text in ["yes", "YES", " Confirmed. ", "Gör det!", "Stemmer", "ja"] {
            assert!(matcher.is_affirmative(text), "{} should match", text);
        }
    }

    #[test]
    fn test_non_affirmative_messages() {
        let matcher = AffirmationMatcher::default();
        for text in ["no", "yes but later", "maybe", "", "   ", "!"] {
            assert!(!matcher.is_affirmative(text), "{} should not match", text);
        }
    }

    #[test]
    fn test_custom_tokens_are_normalized() {
        let matcher = AffirmationMatcher::new(["  Go Ahead ", "", "go ahead"]);
        assert_eq!(matcher.tokens(), &["go ahead".to_string()]);
        assert!(matcher.is_affirmative("go ahead!"));
        assert!(!matcher.is_affirmative("yes"));
    }
}
