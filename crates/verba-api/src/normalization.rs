//! Term normalization for vocabulary storage and lookup.
//!
//! Words and meanings arrive from different keyboards and IMEs, so the same
//! term can be spelled with composed or decomposed accents. Everything is
//! stored in NFC with collapsed whitespace, and lookups normalize the same
//! way, so `"café"` typed either way finds the same card. Case is preserved:
//! capitalization is meaningful vocabulary information (German nouns, proper
//! names).

use unicode_normalization::UnicodeNormalization;

/// Normalize a term before storing or matching it.
///
/// Applies Unicode NFC composition, trims, and collapses runs of whitespace
/// to a single space.
pub fn normalize_term(s: &str) -> String {
    s.nfc()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        assert_eq!(normalize_term("hello"), "hello");
    }

    #[test]
    fn test_case_preserved() {
        assert_eq!(normalize_term("Haus"), "Haus");
        assert_ne!(normalize_term("Haus"), normalize_term("haus"));
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(normalize_term("guten   Tag"), "guten Tag");
        assert_eq!(normalize_term("  hello  "), "hello");
        assert_eq!(normalize_term("a\tb\nc"), "a b c");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(normalize_term(""), "");
        assert_eq!(normalize_term("   "), "");
    }

    #[test]
    fn test_composed_and_decomposed_accents_agree() {
        // "café" with a precomposed e-acute vs. "e" + combining acute accent
        let composed = "caf\u{e9}";
        let decomposed = "cafe\u{301}";
        assert_eq!(normalize_term(composed), normalize_term(decomposed));
    }

    #[test]
    fn test_accents_are_kept() {
        assert_eq!(normalize_term("über"), "über");
        assert_ne!(normalize_term("über"), normalize_term("uber"));
    }
}
