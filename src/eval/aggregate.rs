//! Batch aggregation: mean Recall@K, MAP@K and mean Precision@K over a query set.

use crate::error::{EvalError, Result};
use crate::eval::metrics::{average_precision_at_k_by, precision_at_k_by, recall_at_k_by};
use crate::eval::QueryCase;
use serde::Serialize;

/// Metric families reported per cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Recall,
    /// Mean Average Precision (MAP@K)
    Map,
    Precision,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Recall, Metric::Map, Metric::Precision];

    /// Key prefix used in flat metric names such as `recall@3`.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Recall => "recall",
            Metric::Map => "map",
            Metric::Precision => "precision",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }
}

/// Scores for a single query at one cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueryScores {
    pub recall: f64,
    pub precision: f64,
    pub average_precision: f64,
}

/// Mean scores across all queries at one cutoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutoffMetrics {
    pub k: usize,
    pub mean_recall: f64,
    pub mean_average_precision: f64,
    pub mean_precision: f64,
}

impl CutoffMetrics {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Recall => self.mean_recall,
            Metric::Map => self.mean_average_precision,
            Metric::Precision => self.mean_precision,
        }
    }
}

/// Result of [`evaluate`]: one [`CutoffMetrics`] per requested K, in request order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricResult {
    query_count: usize,
    cutoffs: Vec<CutoffMetrics>,
}

impl MetricResult {
    /// Number of queries the means were taken over.
    pub fn query_count(&self) -> usize {
        self.query_count
    }

    pub fn cutoffs(&self) -> &[CutoffMetrics] {
        &self.cutoffs
    }

    /// Metrics for cutoff `k` (the first entry if `k` was requested twice).
    pub fn at(&self, k: usize) -> Option<&CutoffMetrics> {
        self.cutoffs.iter().find(|c| c.k == k)
    }

    /// Looks up a flat metric name such as `"recall@3"` or `"map@10"`.
    pub fn get(&self, name: &str) -> Option<f64> {
        let (metric, k) = name.split_once('@')?;
        let metric = Metric::from_key(metric)?;
        let k: usize = k.parse().ok()?;
        self.at(k).map(|c| c.value(metric))
    }

    /// All metrics as `(name, value)` pairs, grouped by cutoff in request order.
    pub fn flatten(&self) -> Vec<(String, f64)> {
        self.cutoffs
            .iter()
            .flat_map(|c| {
                Metric::ALL
                    .into_iter()
                    .map(move |m| (format!("{}@{}", m.key(), c.k), c.value(m)))
            })
            .collect()
    }
}

/// Rejects cutoff lists that are empty or contain K = 0.
///
/// The metric functions accept any K; this check is for configuration and
/// command-line input where a zero cutoff is a user mistake.
pub fn validate_cutoffs(k_values: &[usize]) -> Result<()> {
    if k_values.is_empty() {
        return Err(EvalError::InvalidInput(
            "at least one cutoff K is required".to_string(),
        ));
    }
    if k_values.contains(&0) {
        return Err(EvalError::InvalidInput(format!(
            "cutoff K must be a positive integer, got {:?}",
            k_values
        )));
    }
    Ok(())
}

pub fn score_query_by<T, F>(case: &QueryCase<T>, k: usize, id: F) -> QueryScores
where
    F: Fn(&T) -> &str,
{
    QueryScores {
        recall: recall_at_k_by(&case.recommended, &case.relevant, k, &id),
        precision: precision_at_k_by(&case.recommended, &case.relevant, k, &id),
        average_precision: average_precision_at_k_by(&case.recommended, &case.relevant, k, &id),
    }
}

/// Per-query scores at cutoff `k`, in query order.
pub fn score_queries<S: AsRef<str>>(queries: &[QueryCase<S>], k: usize) -> Vec<QueryScores> {
    score_queries_by(queries, k, |s| s.as_ref())
}

pub fn score_queries_by<T, F>(queries: &[QueryCase<T>], k: usize, id: F) -> Vec<QueryScores>
where
    F: Fn(&T) -> &str,
{
    queries.iter().map(|case| score_query_by(case, k, &id)).collect()
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Evaluates a batch of plain-identifier queries at every cutoff in `k_values`.
///
/// Means are unweighted across queries. An empty batch yields 0.0 for every
/// metric and cutoff.
pub fn evaluate<S: AsRef<str>>(queries: &[QueryCase<S>], k_values: &[usize]) -> MetricResult {
    evaluate_by(queries, k_values, |s| s.as_ref())
}

/// Same as [`evaluate`], identifying each recommendation through `id`.
pub fn evaluate_by<T, F>(queries: &[QueryCase<T>], k_values: &[usize], id: F) -> MetricResult
where
    F: Fn(&T) -> &str,
{
    let cutoffs = k_values
        .iter()
        .map(|&k| {
            let (mut recall, mut ap, mut precision) = (0.0, 0.0, 0.0);
            for case in queries {
                let scores = score_query_by(case, k, &id);
                recall += scores.recall;
                ap += scores.average_precision;
                precision += scores.precision;
            }
            let metrics = CutoffMetrics {
                k,
                mean_recall: mean(recall, queries.len()),
                mean_average_precision: mean(ap, queries.len()),
                mean_precision: mean(precision, queries.len()),
            };
            log::debug!(
                "k={}: recall={:.4} map={:.4} precision={:.4} over {} queries",
                k,
                metrics.mean_recall,
                metrics.mean_average_precision,
                metrics.mean_precision,
                queries.len()
            );
            metrics
        })
        .collect();

    MetricResult {
        query_count: queries.len(),
        cutoffs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{EvalQuery, Recommendation, RelevantSet};

    const EPS: f64 = 1e-9;

    fn case(recommended: &[&'static str], relevant: &[&str]) -> QueryCase<&'static str> {
        QueryCase::new(recommended.to_vec(), relevant.iter().copied().collect::<RelevantSet>())
    }

    #[test]
    fn mean_recall_over_two_queries() {
        let queries = vec![
            case(&["a", "b", "c", "d"], &["a", "b", "c"]),
            case(&["x", "a", "y", "b", "c"], &["a", "b", "c"]),
        ];
        let result = evaluate(&queries, &[3]);
        assert_eq!(result.query_count(), 2);
        let at3 = result.at(3).unwrap();
        assert!((at3.mean_recall - (1.0 + 1.0 / 3.0) / 2.0).abs() < EPS);
        assert!((at3.mean_average_precision - (1.0 + 0.5 / 3.0) / 2.0).abs() < EPS);
        assert!((at3.mean_precision - (1.0 + 1.0 / 3.0) / 2.0).abs() < EPS);
    }

    #[test]
    fn empty_batch_is_all_zero() {
        let queries: Vec<QueryCase> = Vec::new();
        let result = evaluate(&queries, &[1, 3, 10]);
        assert_eq!(result.cutoffs().len(), 3);
        for (name, value) in result.flatten() {
            assert_eq!(value, 0.0, "{} should be 0.0", name);
        }
    }

    #[test]
    fn cutoff_order_is_preserved() {
        let queries = vec![case(&["a"], &["a"])];
        let result = evaluate(&queries, &[10, 1, 5]);
        let ks: Vec<usize> = result.cutoffs().iter().map(|c| c.k).collect();
        assert_eq!(ks, vec![10, 1, 5]);
    }

    #[test]
    fn flat_lookup_by_name() {
        let queries = vec![case(&["x", "a", "y", "b", "c"], &["a", "b", "c"])];
        let result = evaluate(&queries, &[3, 5]);
        assert!((result.get("recall@3").unwrap() - 1.0 / 3.0).abs() < EPS);
        assert!((result.get("recall@5").unwrap() - 1.0).abs() < EPS);
        assert!(result.get("map@5").is_some());
        assert!(result.get("precision@3").is_some());
        assert!(result.get("recall@4").is_none());
        assert!(result.get("ndcg@3").is_none());
        assert!(result.get("recall").is_none());

        let names: Vec<String> = result.flatten().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec!["recall@3", "map@3", "precision@3", "recall@5", "map@5", "precision@5"]
        );
    }

    #[test]
    fn queries_are_unweighted() {
        // One long relevant set and one short one contribute equally.
        let queries = vec![
            case(&["a"], &["a"]),
            case(&["x"], &["b", "c", "d", "e", "f", "g"]),
        ];
        let result = evaluate(&queries, &[1]);
        assert!((result.get("recall@1").unwrap() - 0.5).abs() < EPS);
    }

    #[test]
    fn evaluate_is_idempotent() {
        let queries = vec![
            case(&["a", "q", "b"], &["a", "b"]),
            case(&["z"], &[]),
        ];
        let first = evaluate(&queries, &[1, 2, 3]);
        let second = evaluate(&queries, &[1, 2, 3]);
        assert_eq!(first, second);
    }

    #[test]
    fn evaluate_by_scores_recorded_queries() {
        let dataset: Vec<EvalQuery> = serde_json::from_str(
            r#"[
                {"query": "java", "relevant_assessments": ["java-test", "collab-test"],
                 "recommendations": [{"assessment_name": "java-test"}, {"assessment_name": "collab-test"}]},
                {"query": "analyst", "relevant_items": ["cognitive-test"],
                 "recommended_items": ["personality-test", "cognitive-test"]}
            ]"#,
        )
        .unwrap();
        let cases: Vec<QueryCase<Recommendation>> = dataset.iter().map(EvalQuery::to_case).collect();
        let result = evaluate_by(&cases, &[1, 3], Recommendation::identifier);
        // recall@1: (1/2 + 0) / 2
        assert!((result.get("recall@1").unwrap() - 0.25).abs() < EPS);
        assert!((result.get("recall@3").unwrap() - 1.0).abs() < EPS);
        assert!((result.get("map@3").unwrap() - (1.0 + 0.5) / 2.0).abs() < EPS);
    }

    #[test]
    fn per_query_scores_follow_query_order() {
        let queries = vec![case(&["a"], &["a"]), case(&["x"], &["a"])];
        let scores = score_queries(&queries, 1);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].recall, 1.0);
        assert_eq!(scores[1].recall, 0.0);
    }

    #[test]
    fn validate_cutoffs_rejects_zero_and_empty() {
        assert!(validate_cutoffs(&[3, 5]).is_ok());
        assert!(matches!(validate_cutoffs(&[]), Err(EvalError::InvalidInput(_))));
        assert!(matches!(validate_cutoffs(&[3, 0]), Err(EvalError::InvalidInput(_))));
    }
}
