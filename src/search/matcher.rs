//! Three-tier query matching
//!
//! A query (already split into words) is tested against a text field in two
//! passes: an exact containment pass, then a fuzzy pass whose policy depends
//! on the vehicle kind. Motorcycle model names are short alphanumeric codes
//! ("CB 500") where a loose any-word policy produces false positives, so
//! motorcycles require EVERY word to hold and a near-perfect similarity
//! floor; other kinds accept any single matching word at a lower floor.
//!
//! All tiers are total: empty queries and empty fields simply do not match.

use super::normalize;
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

/// Similarity floor for motorcycles (strict AND policy).
pub const MOTO_SIMILARITY_MIN: f64 = 98.0;
/// Similarity floor for every other vehicle kind (lenient OR policy).
pub const DEFAULT_SIMILARITY_MIN: f64 = 90.0;

/// Word-combination policy of the fuzzy tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Every query word must independently match (motorcycles).
    AllWords,
    /// Any single matching query word is enough.
    AnyWord,
}

impl MatchPolicy {
    /// Select the policy for a vehicle kind string.
    pub fn for_kind(tipo: Option<&str>) -> Self {
        match tipo {
            Some(t) if t.to_lowercase().contains("moto") => MatchPolicy::AllWords,
            _ => MatchPolicy::AnyWord,
        }
    }

    fn similarity_min(self) -> f64 {
        match self {
            MatchPolicy::AllWords => MOTO_SIMILARITY_MIN,
            MatchPolicy::AnyWord => DEFAULT_SIMILARITY_MIN,
        }
    }
}

/// Outcome of a match attempt. The reason is diagnostic only — it feeds the
/// fallback trace logs, never a correctness decision.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub matched: bool,
    pub reason: String,
}

impl MatchOutcome {
    fn hit(reason: impl Into<String>) -> Self {
        MatchOutcome {
            matched: true,
            reason: reason.into(),
        }
    }

    fn miss(reason: impl Into<String>) -> Self {
        MatchOutcome {
            matched: false,
            reason: reason.into(),
        }
    }
}

/// Test query words against a text field.
///
/// Tier 1 (exact): every word of length ≥ 2 must appear as a substring of
/// the field, both sides tight-normalized so spacing variants collapse.
/// Tier 2 (fuzzy): per-word substring / token-prefix / token-infix /
/// similarity tests, combined per `policy`. First tier to succeed wins.
pub fn match_query(words: &[String], field: &str, policy: MatchPolicy) -> MatchOutcome {
    let field_loose = normalize::loose(field);
    if field_loose.is_empty() {
        return MatchOutcome::miss("empty field");
    }
    let field_tight = normalize::tight(field);
    if words.is_empty() {
        return MatchOutcome::miss("empty query");
    }

    let exact_miss = match exact_tier(words, &field_tight) {
        Ok(()) => return MatchOutcome::hit("exact"),
        Err(reason) => reason,
    };

    let outcome = match fuzzy_tier(words, &field_loose, &field_tight, policy) {
        Ok(reason) => MatchOutcome::hit(reason),
        Err(fuzzy_miss) => MatchOutcome::miss(format!("exact: {exact_miss}; fuzzy: {fuzzy_miss}")),
    };
    trace!(
        "match {:?} vs '{}': {} ({})",
        words,
        field_loose,
        outcome.matched,
        outcome.reason
    );
    outcome
}

/// AND over all words of length ≥ 2, tight containment.
fn exact_tier(words: &[String], field_tight: &str) -> Result<(), String> {
    let eligible: Vec<String> = words
        .iter()
        .map(|w| normalize::tight(w))
        .filter(|w| w.len() >= 2)
        .collect();
    if eligible.is_empty() {
        return Err("no words of length >= 2".to_string());
    }
    for word in &eligible {
        if !field_tight.contains(word.as_str()) {
            return Err(format!("'{word}' not contained"));
        }
    }
    Ok(())
}

fn fuzzy_tier(
    words: &[String],
    field_loose: &str,
    field_tight: &str,
    policy: MatchPolicy,
) -> Result<String, String> {
    let tokens: Vec<&str> = field_loose.unicode_words().collect();
    let min = policy.similarity_min();

    let usable: Vec<String> = words
        .iter()
        .map(|w| normalize::loose(w))
        .filter(|w| !w.is_empty())
        .collect();
    if usable.is_empty() {
        return Err("no usable words".to_string());
    }

    match policy {
        MatchPolicy::AllWords => {
            for w in &usable {
                if !word_matches(w, field_loose, field_tight, &tokens, min) {
                    return Err(format!("'{w}' failed all fuzzy tests"));
                }
            }
            Ok("fuzzy: all words matched".to_string())
        }
        MatchPolicy::AnyWord => {
            for w in &usable {
                if word_matches(w, field_loose, field_tight, &tokens, min) {
                    return Ok(format!("fuzzy: '{w}' matched"));
                }
            }
            Err("no word matched".to_string())
        }
    }
}

/// A single word matches when it is a substring of the field, a prefix of
/// any field token, an infix of any token (words ≥ 3 chars), or similar
/// enough to the whole field.
fn word_matches(
    word: &str,
    field_loose: &str,
    field_tight: &str,
    tokens: &[&str],
    similarity_min: f64,
) -> bool {
    let word_tight = normalize::tight(word);
    if field_tight.contains(word_tight.as_str()) {
        return true;
    }
    if tokens.iter().any(|t| t.starts_with(word)) {
        return true;
    }
    if word.len() >= 3 && tokens.iter().any(|t| t.contains(word)) {
        return true;
    }
    similarity(word, field_loose) >= similarity_min
}

/// Worst-of similarity: the lower of plain and partial ratio. Partial ratio
/// alone scores high whenever the word aligns with any window of the field;
/// taking the minimum keeps single-word matches against long fields honest.
pub fn similarity(a: &str, b: &str) -> f64 {
    ratio(a, b).min(partial_ratio(a, b))
}

/// Normalized edit-distance similarity on a 0–100 scale.
pub fn ratio(a: &str, b: &str) -> f64 {
    let av: Vec<char> = a.chars().collect();
    let bv: Vec<char> = b.chars().collect();
    ratio_chars(&av, &bv)
}

/// Best `ratio` of the shorter string against every same-length window of
/// the longer one.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let av: Vec<char> = a.chars().collect();
    let bv: Vec<char> = b.chars().collect();
    if av.is_empty() || bv.is_empty() {
        return ratio_chars(&av, &bv);
    }
    let (short, long) = if av.len() <= bv.len() {
        (&av, &bv)
    } else {
        (&bv, &av)
    };
    let mut best = 0.0f64;
    for start in 0..=(long.len() - short.len()) {
        let window = &long[start..start + short.len()];
        best = best.max(ratio_chars(short, window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 100.0;
    }
    let dist = levenshtein(a, b);
    (1.0 - dist as f64 / max_len as f64) * 100.0
}

// Two-row dynamic programming, O(len(a) * len(b)).
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
