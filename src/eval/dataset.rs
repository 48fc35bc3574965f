//! Test-query dataset: JSON load/save, recorded reply parsing and ground-truth bootstrap.

use crate::error::{EvalError, Result};
use crate::eval::{EvalQuery, Recommendation};
use serde_json::Value;
use std::path::Path;

/// Load the test-query dataset (a JSON array of [`EvalQuery`]).
pub fn load_queries(path: &Path) -> Result<Vec<EvalQuery>> {
    let content = std::fs::read_to_string(path)?;
    let queries: Vec<EvalQuery> = serde_json::from_str(&content)?;
    log::info!("Loaded {} test queries from {}", queries.len(), path.display());
    Ok(queries)
}

/// Write the dataset back as pretty-printed JSON.
pub fn save_queries(path: &Path, queries: &[EvalQuery]) -> Result<()> {
    let json = serde_json::to_string_pretty(queries)?;
    std::fs::write(path, json)?;
    log::info!("Saved {} test queries to {}", queries.len(), path.display());
    Ok(())
}

/// Parse a recorded recommender reply into a ranked list.
///
/// Markdown code fences are stripped first. Accepts either
/// `{"recommendations": [...]}` or a bare array; entries are names or
/// objects with an `assessment_name` field.
pub fn parse_recommendations(body: &str) -> Result<Vec<Recommendation>> {
    let cleaned = body.replace("```json", "").replace("```", "");
    let value: Value = serde_json::from_str(cleaned.trim())?;
    let list = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => match map.remove("recommendations") {
            Some(list @ Value::Array(_)) => list,
            Some(other) => {
                return Err(EvalError::Parse(format!(
                    "\"recommendations\" must be a list, got {}",
                    json_kind(&other)
                )))
            }
            None => {
                return Err(EvalError::Parse(
                    "reply has no \"recommendations\" field".to_string(),
                ))
            }
        },
        other => {
            return Err(EvalError::Parse(format!(
                "expected a list or an object with \"recommendations\", got {}",
                json_kind(&other)
            )))
        }
    };
    Ok(serde_json::from_value(list)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Ground-truth form of an assessment name: lowercased, trimmed, spaces as hyphens.
///
/// Scoring never applies this; it is only used when ground truth is generated
/// from recommender output so both sides share one spelling.
pub fn normalize_identifier(name: &str) -> String {
    name.to_lowercase().trim().replace(' ', "-")
}

/// Replace each query's relevant set with its normalized top-`top_n` recommendations.
///
/// Queries without recorded recommendations keep their existing ground truth.
/// Returns the number of queries updated.
pub fn bootstrap_ground_truth(queries: &mut [EvalQuery], top_n: usize) -> usize {
    let mut updated = 0;
    for query in queries.iter_mut() {
        if query.recommendations.is_empty() {
            log::warn!("No recommendations recorded for query, skipping: {}", query.query);
            continue;
        }
        query.relevant_assessments = query
            .recommendations
            .iter()
            .take(top_n)
            .map(|rec| normalize_identifier(rec.identifier()))
            .collect();
        updated += 1;
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_fenced_object_reply() {
        let body = "```json\n{\"query_analysis\": {}, \"recommendations\": [{\"assessment_name\": \"Java Test\", \"duration\": 40}, \"sql-test\"]}\n```";
        let recs = parse_recommendations(body).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].identifier(), "Java Test");
        assert_eq!(recs[1].identifier(), "sql-test");
    }

    #[test]
    fn parse_bare_list_reply() {
        let recs = parse_recommendations(r#"  ["a", "b"]  "#).unwrap();
        let ids: Vec<&str> = recs.iter().map(Recommendation::identifier).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn parse_rejects_unexpected_shapes() {
        assert!(matches!(parse_recommendations("42"), Err(EvalError::Parse(_))));
        assert!(matches!(
            parse_recommendations(r#"{"items": []}"#),
            Err(EvalError::Parse(_))
        ));
        assert!(matches!(
            parse_recommendations(r#"{"recommendations": "a"}"#),
            Err(EvalError::Parse(_))
        ));
        assert!(matches!(parse_recommendations("not json"), Err(EvalError::Json(_))));
    }

    #[test]
    fn normalize_lowercases_trims_and_hyphenates() {
        assert_eq!(normalize_identifier("  Java Programming Test "), "java-programming-test");
        assert_eq!(normalize_identifier("SQL"), "sql");
    }

    #[test]
    fn bootstrap_takes_normalized_top_n() {
        let mut queries: Vec<EvalQuery> = serde_json::from_str(
            r#"[
                {"query": "java", "relevant_assessments": ["old"],
                 "recommendations": [{"assessment_name": "Java Test"}, "Collab Test", "Comm Test", "Extra"]},
                {"query": "none", "relevant_assessments": ["kept"]}
            ]"#,
        )
        .unwrap();
        let updated = bootstrap_ground_truth(&mut queries, 3);
        assert_eq!(updated, 1);
        assert_eq!(
            queries[0].relevant_assessments,
            vec!["java-test", "collab-test", "comm-test"]
        );
        assert_eq!(queries[1].relevant_assessments, vec!["kept"]);
    }

    #[test]
    fn save_then_load_preserves_dataset() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("queries.json");
        let queries: Vec<EvalQuery> = serde_json::from_str(
            r#"[{"query": "q", "relevant_assessments": ["b", "a"],
                 "recommendations": ["a", {"assessment_name": "b", "url": "https://example.com"}]}]"#,
        )
        .unwrap();
        save_queries(&path, &queries).unwrap();
        let loaded = load_queries(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].relevant_assessments, vec!["b", "a"]);
        assert_eq!(loaded[0].recommendations, queries[0].recommendations);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_queries(&temp_dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, EvalError::Io(_)));
    }
}
