//! Text normalization for comparisons
//!
//! The engine uses two canonical forms. The "loose" form keeps word
//! boundaries and backs catalog lookups and tokenization; the "tight" form
//! erases spacing and hyphenation so that feed variants of the same value
//! ("CG 160" / "CG160" / "cr-v" / "crv") compare equal. Both forms are total
//! and idempotent.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Loose normalization: diacritics stripped, lowercased, everything outside
/// `[a-z0-9 ]` dropped, whitespace collapsed to single spaces, trimmed.
pub fn loose(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.nfd().filter(|c| !is_combining_mark(*c)) {
        for lc in ch.to_lowercase() {
            if lc.is_ascii_alphanumeric() {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(lc);
            } else if lc.is_whitespace() {
                pending_space = true;
            }
            // other punctuation is removed without splitting the word
        }
    }

    out
}

/// Tight normalization: diacritics stripped, lowercased, hyphens and all
/// whitespace removed. Used for identity comparisons on filter values.
pub fn tight(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

/// Loose-normalized whitespace tokens of a text.
pub fn loose_words(text: &str) -> Vec<String> {
    loose(text).split_whitespace().map(str::to_string).collect()
}
