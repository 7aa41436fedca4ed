//! Check, evaluation and benchmark engine for research data product metadata.
//!
//! Checks test one aspect of an [`Rdp`](rdpbench_core::Rdp) and log a typed
//! result per pid. Evaluations turn the latest results of their checks into
//! a score in `[0, 1]`; a benchmark aggregates weighted evaluations, skipping
//! the ones that do not apply to a given RDP.

pub mod benchmark;
pub mod bpg;
pub mod checks;
pub mod errors;
pub mod evaluation;
pub mod log;
pub mod markdown;
pub mod report;
pub mod result;

pub use benchmark::{AggregationInfo, Benchmark, SkipFn, WeightShare, WeightedEvaluation};
pub use bpg::{bpg_benchmark, bpg_skip};
pub use checks::{Check, CheckKind, Determinism};
pub use errors::{EvalError, Result};
pub use evaluation::{Evaluation, ScoreFn, Strategy};
pub use log::{Log, LogEntry};
pub use markdown::render_markdown;
pub use report::{BenchmarkReport, CheckReport, EvaluationReport, ReportHeader};
pub use result::{CheckResult, Item, Outcome, Shape};
