use thiserror::Error;

/// Errors emitted by the evaluation engine.
///
/// Every variant signals a misuse by the caller. Poor metadata never surfaces
/// here; it is scored instead.
#[derive(Debug, Error)]
pub enum EvalError {
    /// An evaluation was asked for a pid one of its checks never ran for.
    #[error("{check} has no result for {pid}")]
    ChecksNotRun { check: String, pid: String },
    #[error("invalid evaluation: {0}")]
    InvalidEvaluation(String),
    #[error("invalid benchmark: {0}")]
    InvalidBenchmark(String),
    #[error("unknown evaluation: {0}")]
    UnknownEvaluation(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EvalError>;
