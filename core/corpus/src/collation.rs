//! FILENAME: core/corpus/src/collation.rs
//! PURPOSE: Norwegian (bokmål/nynorsk) string collation.
//! CONTEXT: Titles, authors and row ids are sorted the way a Norwegian reader
//! expects: case and accents only break ties, and æ, ø, å are letters of
//! their own that come after z.
//!
//! Comparison is done in three levels, like a UCA collator:
//! 1. primary   - base letters (a..z, æ, ø, å), digits, punctuation
//! 2. secondary - accents and letter variants (é vs e, ä vs æ)
//! 3. tertiary  - case (lowercase first)
//!
//! Remaining ties fall back to codepoint order so the order is total.

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const WEIGHT_SPACE: u32 = 1;
const WEIGHT_PUNCT: u32 = 100;
const WEIGHT_DIGIT: u32 = 1_000;
const WEIGHT_LETTER: u32 = 2_000;
const WEIGHT_OTHER: u32 = 10_000;

/// Index of æ, ø, å in the Norwegian alphabet (after a..z = 0..25).
const AE: u32 = 26;
const OE: u32 = 27;
const AA: u32 = 28;

/// One collation element: (primary, secondary, tertiary).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Element {
    primary: u32,
    secondary: u32,
    tertiary: u8,
}

/// Precomputed sort key for a string. Build once per row when sorting many
/// rows, then compare keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollationKey {
    primary: Vec<u32>,
    secondary: Vec<u32>,
    tertiary: Vec<u8>,
    raw: String,
}

impl CollationKey {
    pub fn new(s: &str) -> Self {
        let elements = elements(s);
        CollationKey {
            primary: elements.iter().map(|e| e.primary).collect(),
            secondary: elements.iter().map(|e| e.secondary).collect(),
            tertiary: elements.iter().map(|e| e.tertiary).collect(),
            raw: s.to_string(),
        }
    }
}

impl Ord for CollationKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.primary
            .cmp(&other.primary)
            .then_with(|| self.secondary.cmp(&other.secondary))
            .then_with(|| self.tertiary.cmp(&other.tertiary))
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for CollationKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Letters with a Norwegian-specific placement, checked before decomposition.
/// Returns (alphabet index, secondary variant).
fn nordic_letter(c: char) -> Option<(u32, u32)> {
    let mapped = match c {
        'æ' | 'Æ' => (AE, 0),
        'ä' | 'Ä' => (AE, 1),
        'ø' | 'Ø' => (OE, 0),
        'ö' | 'Ö' => (OE, 1),
        'œ' | 'Œ' => (OE, 2),
        'å' | 'Å' => (AA, 0),
        'ü' | 'Ü' => ('y' as u32 - 'a' as u32, 1),
        'ð' | 'Ð' | 'đ' | 'Đ' => ('d' as u32 - 'a' as u32, 1),
        _ => return None,
    };
    Some(mapped)
}

fn elements(s: &str) -> Vec<Element> {
    let mut out: Vec<Element> = Vec::with_capacity(s.len());

    for c in s.chars() {
        let tertiary = if c.is_uppercase() { 1 } else { 0 };

        if let Some((index, variant)) = nordic_letter(c) {
            out.push(Element { primary: WEIGHT_LETTER + index, secondary: variant, tertiary });
            continue;
        }

        for d in std::iter::once(c).nfd() {
            if is_combining_mark(d) {
                // Accents attach to the preceding base character.
                if let Some(last) = out.last_mut() {
                    last.secondary = last.secondary.saturating_mul(31).saturating_add(d as u32);
                }
                continue;
            }
            out.push(Element { primary: primary_weight(d), secondary: 0, tertiary });
        }
    }

    out
}

fn primary_weight(c: char) -> u32 {
    if c.is_whitespace() {
        return WEIGHT_SPACE;
    }
    if let Some(d) = c.to_digit(10) {
        return WEIGHT_DIGIT + d;
    }
    let lower = c.to_lowercase().next().unwrap_or(c);
    if lower.is_ascii_lowercase() {
        return WEIGHT_LETTER + (lower as u32 - 'a' as u32);
    }
    if lower.is_alphanumeric() {
        return WEIGHT_OTHER + lower as u32;
    }
    WEIGHT_PUNCT + (c as u32 % (WEIGHT_DIGIT - WEIGHT_PUNCT))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare_nb(a: &str, b: &str) -> Ordering {
        CollationKey::new(a).cmp(&CollationKey::new(b))
    }

    fn sorted(words: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = words.iter().map(|s| s.to_string()).collect();
        v.sort_by(|a, b| compare_nb(a, b));
        v
    }

    #[test]
    fn test_nordic_letters_after_z() {
        assert_eq!(
            sorted(&["ål", "øy", "zebra", "ære", "abc"]),
            vec!["abc", "zebra", "ære", "øy", "ål"]
        );
    }

    #[test]
    fn test_case_is_tertiary() {
        assert_eq!(sorted(&["Bok", "ape", "bok"]), vec!["ape", "bok", "Bok"]);
    }

    #[test]
    fn test_accents_are_secondary() {
        // é sorts with e, not after z
        assert_eq!(sorted(&["ezra", "éa", "ea"]), vec!["ea", "éa", "ezra"]);
    }

    #[test]
    fn test_swedish_variants_sort_with_nordic_letters() {
        assert_eq!(compare_nb("ä", "æ"), Ordering::Greater);
        assert_eq!(compare_nb("äb", "æc"), Ordering::Less);
        assert_eq!(compare_nb("ö", "å"), Ordering::Less);
    }

    #[test]
    fn test_digits_before_letters() {
        assert_eq!(sorted(&["b", "10", "2", "a"]), vec!["10", "2", "a", "b"]);
    }

    #[test]
    fn test_precomposed_and_decomposed_are_close() {
        let composed = "\u{e9}t\u{e9}";
        let decomposed = "e\u{301}te\u{301}";
        let a = CollationKey::new(composed);
        let b = CollationKey::new(decomposed);
        assert_eq!(a.primary, b.primary);
        assert_eq!(a.secondary, b.secondary);
    }

    #[test]
    fn test_equal_strings() {
        assert_eq!(compare_nb("Hamsun", "Hamsun"), Ordering::Equal);
        assert_eq!(compare_nb("", ""), Ordering::Equal);
        assert_eq!(compare_nb("", "a"), Ordering::Less);
    }
}
