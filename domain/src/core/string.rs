//! String utilities for the domain layer.

/// Truncate a string to at most `max_len` bytes, ending in "..." when cut.
///
/// The cut always lands on a UTF-8 character boundary.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_strings_untouched() {
        assert_eq!(truncate("yes", 10), "yes");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn test_ascii_cut() {
        assert_eq!(truncate("The Architect is planning", 12), "The Archi...");
    }

    #[test]
    fn test_cut_respects_char_boundaries() {
        // "ö" is two bytes; a cut inside it backs off to the previous boundary
        assert_eq!(truncate("kör kör kör", 7), "kör...");
        assert_eq!(truncate("gör det nu", 5), "g...");
    }
}
