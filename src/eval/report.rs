//! Rendering of evaluation results and pass/fail thresholds.

use crate::error::Result;
use crate::eval::aggregate::{CutoffMetrics, Metric, MetricResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;

/// Minimum acceptable scores. Unset thresholds are not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default)]
    pub min_recall: Option<f64>,
    #[serde(default)]
    pub min_map: Option<f64>,
    #[serde(default)]
    pub min_precision: Option<f64>,
}

impl Thresholds {
    fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        [
            (Metric::Recall, self.min_recall),
            (Metric::Map, self.min_map),
            (Metric::Precision, self.min_precision),
        ]
        .into_iter()
        .filter_map(|(metric, min)| min.map(|m| (metric, m)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// A metric that fell below its threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdFailure {
    pub metric: Metric,
    pub k: usize,
    pub actual: f64,
    pub required: f64,
}

impl fmt::Display for ThresholdFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} = {:.4} is below {:.4}",
            self.metric.key(),
            self.k,
            self.actual,
            self.required
        )
    }
}

/// Checks thresholds against the deepest cutoff evaluated.
pub fn check_thresholds(result: &MetricResult, thresholds: &Thresholds) -> Vec<ThresholdFailure> {
    let deepest = match result.cutoffs().iter().max_by_key(|c| c.k) {
        Some(c) => c,
        None => return Vec::new(),
    };
    thresholds
        .iter()
        .filter_map(|(metric, required)| {
            let actual = deepest.value(metric);
            (actual < required).then_some(ThresholdFailure {
                metric,
                k: deepest.k,
                actual,
                required,
            })
        })
        .collect()
}

fn label(metric: Metric) -> &'static str {
    match metric {
        Metric::Recall => "Mean Recall@K",
        Metric::Map => "MAP@K",
        Metric::Precision => "Mean Precision@K",
    }
}

fn write_cutoff(out: &mut String, cutoff: &CutoffMetrics) {
    let _ = writeln!(out, "\nK = {}:", cutoff.k);
    for metric in Metric::ALL {
        let _ = writeln!(out, "  {:<18} {:.4}", format!("{}:", label(metric)), cutoff.value(metric));
    }
}

/// Human-readable report, one block per cutoff.
pub fn render_text(result: &MetricResult) -> String {
    let mut out = String::new();
    out.push_str("=== Evaluation Results ===\n");
    let _ = writeln!(out, "Queries: {}", result.query_count());
    for cutoff in result.cutoffs() {
        write_cutoff(&mut out, cutoff);
    }
    out
}

/// JSON report with a generation timestamp and both nested and flat metrics.
pub fn render_json(result: &MetricResult) -> Result<String> {
    let flat: serde_json::Map<String, serde_json::Value> = result
        .flatten()
        .into_iter()
        .map(|(name, value)| (name, serde_json::Value::from(value)))
        .collect();
    let report = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "query_count": result.query_count(),
        "cutoffs": result.cutoffs(),
        "metrics": flat,
    });
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{evaluate, QueryCase};

    fn sample() -> MetricResult {
        let queries: Vec<QueryCase<&str>> = vec![
            QueryCase::new(vec!["a", "b", "c", "d"], ["a", "b", "c"].into_iter().collect()),
            QueryCase::new(vec!["x", "a", "y", "b", "c"], ["a", "b", "c"].into_iter().collect()),
        ];
        evaluate(&queries, &[1, 3])
    }

    #[test]
    fn text_report_lists_every_cutoff() {
        let text = render_text(&sample());
        assert!(text.contains("Queries: 2"));
        assert!(text.contains("K = 1:"));
        assert!(text.contains("K = 3:"));
        assert!(text.contains("Mean Recall@K:"));
        assert!(text.contains("MAP@K:"));
        assert!(text.contains("0.6667"));
    }

    #[test]
    fn json_report_has_flat_metrics() {
        let json = render_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["query_count"], 2);
        assert!(value["generated_at"].is_string());
        assert_eq!(value["cutoffs"].as_array().unwrap().len(), 2);
        let recall = value["metrics"]["recall@3"].as_f64().unwrap();
        assert!((recall - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn thresholds_use_deepest_cutoff() {
        let result = sample();
        let thresholds = Thresholds {
            min_recall: Some(0.6),
            min_map: Some(0.9),
            min_precision: None,
        };
        let failures = check_thresholds(&result, &thresholds);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].metric, Metric::Map);
        assert_eq!(failures[0].k, 3);
        assert!(failures[0].to_string().starts_with("map@3"));
    }

    #[test]
    fn no_thresholds_never_fail() {
        let thresholds = Thresholds::default();
        assert!(thresholds.is_empty());
        assert!(check_thresholds(&sample(), &thresholds).is_empty());
        assert!(check_thresholds(&MetricResult::default(), &thresholds).is_empty());
    }
}
