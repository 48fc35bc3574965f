//! Evaluation CLI: score recorded recommendations against ground truth and report
//! mean Recall@K and MAP@K.

use clap::Parser;
use rankeval::{
    eval::{
        dataset, evaluate_by, report, score_queries_by, validate_cutoffs, EvalQuery, QueryCase,
        Recommendation,
    },
    Config,
};
use std::path::PathBuf;

/// Evaluation framework: score test queries and report metrics.
#[derive(Parser, Debug)]
#[command(name = "eval")]
struct Args {
    /// Path to test queries JSON (default: rankeval.queries_path from config).
    #[arg(long)]
    queries: Option<PathBuf>,

    /// Cutoff K; repeat to evaluate several (default: evaluation.k_values from config).
    #[arg(long = "k")]
    k_values: Vec<usize>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.rankeval.log_level.as_str()),
    )
    .init();

    let k_values = if args.k_values.is_empty() {
        config.evaluation.k_values.clone()
    } else {
        args.k_values
    };
    validate_cutoffs(&k_values)?;

    let queries_path = args
        .queries
        .unwrap_or_else(|| config.queries_path().to_path_buf());
    let queries = dataset::load_queries(&queries_path)
        .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", queries_path.display(), e))?;

    if queries.is_empty() {
        log::warn!("No queries in {}; all metrics will be 0.0", queries_path.display());
    }

    let cases: Vec<QueryCase<Recommendation>> = queries.iter().map(EvalQuery::to_case).collect();

    if !args.json {
        let deepest = k_values.iter().copied().max().unwrap_or_default();
        println!("Running evaluation on {} queries (K = {:?})\n", queries.len(), k_values);
        let per_query = score_queries_by(&cases, deepest, Recommendation::identifier);
        for (query, scores) in queries.iter().zip(per_query.iter()) {
            println!(
                "  {} (R@{k}: {:.2}, AP@{k}: {:.2})",
                query.query,
                scores.recall,
                scores.average_precision,
                k = deepest
            );
        }
        println!();
    }

    let result = evaluate_by(&cases, &k_values, Recommendation::identifier);

    if args.json {
        println!("{}", report::render_json(&result)?);
    } else {
        print!("{}", report::render_text(&result));
    }

    let failures = report::check_thresholds(&result, &config.thresholds);
    if failures.is_empty() {
        if !config.thresholds.is_empty() {
            eprintln!("\nAll metrics pass configured thresholds.");
        }
        Ok(())
    } else {
        eprintln!("\nMetrics below threshold:");
        for failure in &failures {
            eprintln!("  {}", failure);
        }
        std::process::exit(1);
    }
}
