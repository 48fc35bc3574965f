//! Ranking evaluation: per-query metrics (R@K, P@K, AP@K), batch aggregation
//! (mean R@K, MAP@K), the test-query dataset and report rendering.

pub mod aggregate;
pub mod dataset;
pub mod metrics;
pub mod query;
pub mod report;

pub use aggregate::{
    evaluate, evaluate_by, score_queries, score_queries_by, validate_cutoffs, CutoffMetrics,
    Metric, MetricResult, QueryScores,
};
pub use metrics::{
    average_precision_at_k, average_precision_at_k_by, precision_at_k, precision_at_k_by,
    recall_at_k, recall_at_k_by,
};
pub use query::{EvalQuery, QueryCase, Recommendation, RecommendationRecord, RelevantSet};
pub use report::Thresholds;
