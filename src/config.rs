use crate::eval::{validate_cutoffs, Thresholds};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rankeval: RankevalConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
}

/// General settings
#[derive(Debug, Clone, Deserialize)]
pub struct RankevalConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Test-query dataset used when no --queries flag is given.
    #[serde(default = "default_queries_path")]
    pub queries_path: PathBuf,
}

impl Default for RankevalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            queries_path: default_queries_path(),
        }
    }
}

/// Evaluation settings
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    /// Cutoffs to report, in output order.
    #[serde(default = "default_k_values")]
    pub k_values: Vec<usize>,
    /// How many top recommendations become ground truth when bootstrapping.
    #[serde(default = "default_bootstrap_top_n")]
    pub bootstrap_top_n: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            k_values: default_k_values(),
            bootstrap_top_n: default_bootstrap_top_n(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_queries_path() -> PathBuf {
    PathBuf::from("test_queries.json")
}

fn default_k_values() -> Vec<usize> {
    vec![3]
}

fn default_bootstrap_top_n() -> usize {
    3
}

const DEFAULT_CONFIG_PATH: &str = "config.toml";

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in RANKEVAL_CONFIG environment variable (must exist)
    /// 2. ./config.toml in current directory (defaults apply when absent)
    pub fn load() -> Result<Self> {
        // Optional; missing .env is fine
        let _ = dotenv::dotenv();

        let config = match std::env::var("RANKEVAL_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            Err(_) => {
                log::debug!("No {} found, using default configuration", DEFAULT_CONFIG_PATH);
                let config = Config::default();
                config.validate()?;
                config
            }
        };

        Ok(config)
    }

    /// Read and validate a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        validate_cutoffs(&self.evaluation.k_values).context("evaluation.k_values")?;

        if self.evaluation.bootstrap_top_n == 0 {
            anyhow::bail!("evaluation.bootstrap_top_n must be greater than 0");
        }

        for (name, value) in [
            ("min_recall", self.thresholds.min_recall),
            ("min_map", self.thresholds.min_map),
            ("min_precision", self.thresholds.min_precision),
        ] {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    anyhow::bail!("thresholds.{} must be between 0.0 and 1.0", name);
                }
            }
        }

        Ok(())
    }

    /// Get the default dataset path
    pub fn queries_path(&self) -> &Path {
        &self.rankeval.queries_path
    }
}
