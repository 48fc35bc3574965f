//! Bootstrap ground truth: take each query's normalized top-N recorded
//! recommendations as its relevant set and write an updated dataset.

use clap::Parser;
use rankeval::{eval::dataset, Config};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bootstrap")]
struct Args {
    /// Path to test queries JSON (default: rankeval.queries_path from config).
    #[arg(long)]
    queries: Option<PathBuf>,

    /// Where to write the updated dataset.
    #[arg(long, default_value = "updated_test_queries.json")]
    output: PathBuf,

    /// Recommendations per query to keep as ground truth (default: evaluation.bootstrap_top_n).
    #[arg(long)]
    top_n: Option<usize>,
}

/// First `max` characters of `text`, with an ellipsis when truncated.
fn preview(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.rankeval.log_level.as_str()),
    )
    .init();

    let top_n = args.top_n.unwrap_or(config.evaluation.bootstrap_top_n);
    if top_n == 0 {
        anyhow::bail!("--top-n must be greater than 0");
    }

    let queries_path = args
        .queries
        .unwrap_or_else(|| config.queries_path().to_path_buf());
    let mut queries = dataset::load_queries(&queries_path)
        .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", queries_path.display(), e))?;

    let updated = dataset::bootstrap_ground_truth(&mut queries, top_n);
    for query in queries.iter().filter(|q| !q.recommendations.is_empty()) {
        println!(
            "Updated: {} -> {:?}",
            preview(&query.query, 30),
            query.relevant_assessments
        );
    }

    dataset::save_queries(&args.output, &queries)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", args.output.display(), e))?;

    println!(
        "\n{} of {} queries updated; written to {}",
        updated,
        queries.len(),
        args.output.display()
    );
    Ok(())
}
