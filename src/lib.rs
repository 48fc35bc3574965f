pub mod config;
pub mod error;
pub mod eval;

pub use config::Config;
pub use error::{EvalError, Result};
pub use eval::{evaluate, evaluate_by, MetricResult, QueryCase, RelevantSet};
