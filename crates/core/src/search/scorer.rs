//! Weighted string similarity used to rank titles against a query.
//!
//! All scores are on a 0-100 scale. The weighted ratio takes the best of
//! several measures, each discounted by how loose it is:
//!
//! 1. Full-string similarity (Damerau-Levenshtein, so swapped letters cost one edit)
//! 2. Token-sort similarity (word order ignored)
//! 3. Token-set similarity (shared words count fully, extra words partially)
//! 4. Partial similarity (best window of the longer string), only when lengths differ a lot
//! 5. Prefix-weighted similarity (Jaro-Winkler), for queries that get the start right

use std::collections::BTreeSet;

use strsim::{jaro_winkler, normalized_damerau_levenshtein};

/// Score given to identical (normalized) strings.
pub const MAX_SCORE: f64 = 100.0;

const TOKEN_SCALE: f64 = 0.95;
const PARTIAL_SCALE: f64 = 0.90;
const PREFIX_SCALE: f64 = 0.90;
/// Length ratio above which partial matching is considered.
const PARTIAL_LENGTH_RATIO: f64 = 1.5;

/// Lowercase, replace anything that is not alphanumeric with a space and
/// collapse runs of whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full case fold for equality checks.
///
/// `to_lowercase` plus the multi-character folds that lowercasing alone
/// misses, so "STRASSE" and "Straße" compare equal.
pub fn fold_case(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        match c {
            'ß' => folded.push_str("ss"),
            'ς' => folded.push('σ'),
            'ſ' => folded.push('s'),
            'ﬀ' => folded.push_str("ff"),
            'ﬁ' => folded.push_str("fi"),
            'ﬂ' => folded.push_str("fl"),
            'ﬃ' => folded.push_str("ffi"),
            'ﬄ' => folded.push_str("ffl"),
            'ﬅ' | 'ﬆ' => folded.push_str("st"),
            _ => folded.push(c),
        }
    }
    folded
}

/// Case-insensitive equality of the trimmed strings; empty never matches.
pub fn same_title(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    !a.is_empty() && fold_case(a) == fold_case(b)
}

/// Plain similarity of two already-normalized strings.
fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return MAX_SCORE;
    }
    normalized_damerau_levenshtein(a, b) * MAX_SCORE
}

fn sorted_tokens(text: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = text.split(' ').filter(|t| !t.is_empty()).collect();
    tokens.sort_unstable();
    tokens
}

fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a).join(" "), &sorted_tokens(b).join(" "))
}

fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split(' ').filter(|t| !t.is_empty()).collect();
    let tokens_b: BTreeSet<&str> = b.split(' ').filter(|t| !t.is_empty()).collect();

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    // One side is a subset of the other.
    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return MAX_SCORE;
    }

    let sect = intersection.join(" ");
    let rest_ab = diff_ab.join(" ");
    let rest_ba = diff_ba.join(" ");

    if sect.is_empty() {
        return ratio(&rest_ab, &rest_ba);
    }

    let combined_ab = format!("{} {}", sect, rest_ab);
    let combined_ba = format!("{} {}", sect, rest_ba);

    ratio(&sect, &combined_ab)
        .max(ratio(&sect, &combined_ba))
        .max(ratio(&combined_ab, &combined_ba))
}

/// Best similarity of `shorter` against every equally long window of `longer`.
fn partial_ratio(shorter: &str, longer: &str) -> f64 {
    let short_chars: Vec<char> = shorter.chars().collect();
    let long_chars: Vec<char> = longer.chars().collect();

    if short_chars.is_empty() || short_chars.len() > long_chars.len() {
        return ratio(shorter, longer);
    }

    long_chars
        .windows(short_chars.len())
        .map(|window| {
            let window: String = window.iter().collect();
            ratio(shorter, &window)
        })
        .fold(0.0, f64::max)
}

/// Weighted similarity of two raw strings, in [0, 100].
///
/// Identical strings (ignoring case, or ignoring case and punctuation)
/// score exactly 100. Otherwise either string normalizing to nothing
/// scores 0.
pub fn weighted_ratio(query: &str, candidate: &str) -> f64 {
    if same_title(query, candidate) {
        return MAX_SCORE;
    }

    let a = normalize(query);
    let b = normalize(candidate);

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return MAX_SCORE;
    }

    let len_a = a.chars().count() as f64;
    let len_b = b.chars().count() as f64;
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);

    let mut best = ratio(&a, &b);
    best = best.max(token_sort_ratio(&a, &b) * TOKEN_SCALE);
    best = best.max(token_set_ratio(&a, &b) * TOKEN_SCALE);
    best = best.max(jaro_winkler(&a, &b) * MAX_SCORE * PREFIX_SCALE);

    if len_ratio >= PARTIAL_LENGTH_RATIO {
        let (shorter, longer) = if len_a <= len_b { (&a, &b) } else { (&b, &a) };
        best = best.max(partial_ratio(shorter, longer) * PARTIAL_SCALE);
    }

    best.clamp(0.0, MAX_SCORE)
}
