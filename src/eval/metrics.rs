//! Per-query metrics: Recall@K, Precision@K and Average Precision@K.
//!
//! Every function has a plain form over identifiers (`&[S]` where `S: AsRef<str>`)
//! and a `_by` form taking an extractor for richer recommendation records.
//! None of them fail: degenerate inputs score 0.0.
//!
//! Matches are counted per position. A duplicated recommended identifier that is
//! relevant counts once for each occurrence in the top K.

use crate::eval::RelevantSet;

/// Number of relevant entries among the first `k` recommendations.
fn hits_in_top_k<T, F>(recommended: &[T], relevant: &RelevantSet, k: usize, id: &F) -> usize
where
    F: Fn(&T) -> &str,
{
    recommended
        .iter()
        .take(k)
        .filter(|&item| relevant.contains(id(item)))
        .count()
}

/// Recall at K: relevant entries in top-K / |relevant|.
///
/// Returns 0.0 when `relevant` is empty. The result is not capped: duplicate
/// relevant entries in the top K can push it above 1.0.
pub fn recall_at_k<S: AsRef<str>>(recommended: &[S], relevant: &RelevantSet, k: usize) -> f64 {
    recall_at_k_by(recommended, relevant, k, |s| s.as_ref())
}

pub fn recall_at_k_by<T, F>(recommended: &[T], relevant: &RelevantSet, k: usize, id: F) -> f64
where
    F: Fn(&T) -> &str,
{
    if relevant.is_empty() {
        return 0.0;
    }
    hits_in_top_k(recommended, relevant, k, &id) as f64 / relevant.len() as f64
}

/// Precision at K: relevant entries in top-K / K.
///
/// The denominator is the requested `k`, not the list length, so a list shorter
/// than `k` is penalized for the missing positions. If k is 0, returns 0.0.
pub fn precision_at_k<S: AsRef<str>>(recommended: &[S], relevant: &RelevantSet, k: usize) -> f64 {
    precision_at_k_by(recommended, relevant, k, |s| s.as_ref())
}

pub fn precision_at_k_by<T, F>(recommended: &[T], relevant: &RelevantSet, k: usize, id: F) -> f64
where
    F: Fn(&T) -> &str,
{
    if k == 0 {
        return 0.0;
    }
    hits_in_top_k(recommended, relevant, k, &id) as f64 / k as f64
}

/// Average Precision at K.
///
/// Sums precision@(i+1) at each relevant position `i` in the top K and divides
/// by `min(k, |relevant|)`, so relevant items missing from the top K lower the
/// score. Returns 0.0 when `relevant` is empty or nothing relevant is found.
pub fn average_precision_at_k<S: AsRef<str>>(
    recommended: &[S],
    relevant: &RelevantSet,
    k: usize,
) -> f64 {
    average_precision_at_k_by(recommended, relevant, k, |s| s.as_ref())
}

pub fn average_precision_at_k_by<T, F>(
    recommended: &[T],
    relevant: &RelevantSet,
    k: usize,
    id: F,
) -> f64
where
    F: Fn(&T) -> &str,
{
    if relevant.is_empty() {
        return 0.0;
    }
    let mut hits = 0usize;
    let mut precision_sum = 0.0;
    for (i, item) in recommended.iter().take(k).enumerate() {
        if relevant.contains(id(item)) {
            hits += 1;
            precision_sum += hits as f64 / (i + 1) as f64;
        }
    }
    if hits == 0 {
        return 0.0;
    }
    precision_sum / k.min(relevant.len()) as f64
}
