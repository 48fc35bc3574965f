//! Query-level data model: relevant sets, query cases and dataset records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Ground-truth identifiers for one query.
///
/// Membership is exact string equality; no case or whitespace folding is
/// applied here (see [`crate::eval::dataset::normalize_identifier`] for the
/// normalization used when bootstrapping ground truth).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelevantSet(HashSet<String>);

impl RelevantSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.0.insert(id.into())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Number of distinct relevant identifiers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RelevantSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// One query to score: a ranked recommendation list and its relevant set.
///
/// `T` is the recommendation entry type. Plain identifiers (`String`, `&str`)
/// score directly; richer records are scored through an identifier extractor
/// (see [`crate::eval::evaluate_by`]).
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCase<T = String> {
    /// Ranked entries, position 0 is the top recommendation. Duplicates are kept.
    pub recommended: Vec<T>,
    pub relevant: RelevantSet,
}

impl<T> QueryCase<T> {
    pub fn new(recommended: Vec<T>, relevant: RelevantSet) -> Self {
        Self {
            recommended,
            relevant,
        }
    }
}

/// A single recommendation as recorded from the recommender.
///
/// Replies come either as plain names or as objects carrying an
/// `assessment_name` field alongside other attributes (url, duration, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recommendation {
    Name(String),
    Record(RecommendationRecord),
}

/// Structured recommendation; fields other than `assessment_name` are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    #[serde(default)]
    pub assessment_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recommendation {
    /// Identifier used for relevance matching. A record without a name yields "".
    pub fn identifier(&self) -> &str {
        match self {
            Recommendation::Name(name) => name,
            Recommendation::Record(record) => &record.assessment_name,
        }
    }
}

impl From<&str> for Recommendation {
    fn from(name: &str) -> Self {
        Recommendation::Name(name.to_string())
    }
}

/// Single evaluation query as stored in the test-query dataset file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalQuery {
    /// Free-text query that was sent to the recommender.
    pub query: String,
    /// Ground-truth identifiers, in the order they were curated.
    #[serde(default, alias = "relevant_items")]
    pub relevant_assessments: Vec<String>,
    /// Recorded ranked recommendations for this query.
    #[serde(default, alias = "recommended_items")]
    pub recommendations: Vec<Recommendation>,
}

impl EvalQuery {
    pub fn relevant_set(&self) -> RelevantSet {
        self.relevant_assessments.iter().cloned().collect()
    }

    /// Builds the scoring case for this query.
    pub fn to_case(&self) -> QueryCase<Recommendation> {
        QueryCase::new(self.recommendations.clone(), self.relevant_set())
    }
}
