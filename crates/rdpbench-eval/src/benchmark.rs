use std::fmt;
use std::sync::Arc;

use rdpbench_core::Rdp;
use serde::Serialize;
use uuid::Uuid;

use crate::checks::Check;
use crate::errors::{EvalError, Result};
use crate::evaluation::{DEFAULT_ROUNDED, Evaluation, round_to};
use crate::report::BenchmarkReport;

/// Decides whether an evaluation does not apply to an RDP.
///
/// Must be deterministic and free of side effects; it is asked again on
/// every `score`/`report` call.
pub type SkipFn = Arc<dyn Fn(&Evaluation, &Rdp) -> bool + Send + Sync>;

const AGGREGATION_METHOD: &str = "weighted_mean";

/// An evaluation registered under its key with a weight.
#[derive(Debug, Clone)]
pub struct WeightedEvaluation {
    key: String,
    evaluation: Evaluation,
    weight: f64,
}

impl WeightedEvaluation {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// Normalised weight of one evaluation for a given RDP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightShare {
    pub key: String,
    pub weight: f64,
    pub share: f64,
}

/// How the benchmark score of one RDP was aggregated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationInfo {
    pub method: String,
    pub weights: Vec<WeightShare>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

/// Weighted aggregation of evaluations into one score.
pub struct Benchmark {
    id: Uuid,
    name: String,
    version: String,
    description: String,
    rounded: u32,
    evaluations: Vec<WeightedEvaluation>,
    skip: SkipFn,
}

impl Benchmark {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
        skip: impl Fn(&Evaluation, &Rdp) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            version: version.into(),
            description: description.into(),
            rounded: DEFAULT_ROUNDED,
            evaluations: Vec::new(),
            skip: Arc::new(skip),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn rounded(&self) -> u32 {
        self.rounded
    }

    pub fn evaluations(&self) -> &[WeightedEvaluation] {
        &self.evaluations
    }

    pub fn len(&self) -> usize {
        self.evaluations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluations.is_empty()
    }

    /// Register `evaluation` under its key. An evaluation with the same key
    /// is replaced in place and keeps its position.
    pub fn add_evaluation(&mut self, evaluation: Evaluation, weight: f64) -> Result<()> {
        validate_weight(weight)?;
        let key = evaluation.key();
        let entry = WeightedEvaluation {
            key: key.clone(),
            evaluation,
            weight,
        };
        match self.evaluations.iter_mut().find(|existing| existing.key == key) {
            Some(slot) => {
                tracing::warn!(event = "evaluation_replaced", benchmark = %self.name, key = %key);
                *slot = entry;
            }
            None => self.evaluations.push(entry),
        }
        Ok(())
    }

    pub fn set_weight(&mut self, key: &str, weight: f64) -> Result<()> {
        validate_weight(weight)?;
        let slot = self
            .evaluations
            .iter_mut()
            .find(|existing| existing.key == key)
            .ok_or_else(|| EvalError::UnknownEvaluation(key.to_string()))?;
        slot.weight = weight;
        Ok(())
    }

    /// Distinct checks over all evaluations, in first-use order.
    pub fn checks(&self) -> Vec<Arc<Check>> {
        let mut distinct: Vec<Arc<Check>> = Vec::new();
        for entry in &self.evaluations {
            for check in entry.evaluation.checks() {
                if !distinct.iter().any(|seen| Arc::ptr_eq(seen, check)) {
                    distinct.push(Arc::clone(check));
                }
            }
        }
        distinct
    }

    pub fn is_skipped(&self, evaluation: &Evaluation, rdp: &Rdp) -> bool {
        (self.skip)(evaluation, rdp)
    }

    /// Evaluations that apply to `rdp`, in registration order.
    pub fn applicable(&self, rdp: &Rdp) -> Vec<&WeightedEvaluation> {
        self.evaluations
            .iter()
            .filter(|entry| {
                let skipped = self.is_skipped(&entry.evaluation, rdp);
                if skipped {
                    tracing::debug!(
                        event = "evaluation_skipped",
                        benchmark = %self.name,
                        key = %entry.key,
                        pid = %rdp.pid()
                    );
                }
                !skipped
            })
            .collect()
    }

    /// Run every distinct check once against `rdp`.
    pub fn check_all(&self, rdp: &Rdp) {
        let checks = self.checks();
        for check in &checks {
            check.check(rdp);
        }
        tracing::info!(
            event = "checks_run",
            benchmark = %self.name,
            pid = %rdp.pid(),
            checks = checks.len()
        );
    }

    /// Run the checks of applicable evaluations that have no result for `rdp`.
    pub(crate) fn ensure_checked(&self, rdp: &Rdp) {
        let mut seen: Vec<&Arc<Check>> = Vec::new();
        for entry in self.applicable(rdp) {
            for check in entry.evaluation.checks() {
                if seen.iter().any(|done| Arc::ptr_eq(done, check)) {
                    continue;
                }
                seen.push(check);
                if check.last_result(rdp.pid()).is_none() {
                    check.check(rdp);
                }
            }
        }
    }

    /// Weighted mean over the applicable evaluations, with weights
    /// renormalised against the skip set.
    pub fn score(&self, rdp: &Rdp) -> Result<f64> {
        self.ensure_checked(rdp);
        let applicable = self.applicable(rdp);
        let total: f64 = applicable.iter().map(|entry| entry.weight).sum();
        if applicable.is_empty() || total <= 0.0 {
            tracing::info!(
                event = "all_evaluations_skipped",
                benchmark = %self.name,
                pid = %rdp.pid()
            );
            return Ok(0.0);
        }
        let mut score = 0.0;
        for entry in applicable {
            score += entry.evaluation.evaluate(rdp.pid())? * entry.weight / total;
        }
        let score = round_to(score, self.rounded);
        tracing::info!(
            event = "benchmark_scored",
            benchmark = %self.name,
            pid = %rdp.pid(),
            score
        );
        Ok(score)
    }

    pub fn aggregation_info(&self, rdp: &Rdp) -> AggregationInfo {
        let applicable = self.applicable(rdp);
        let total: f64 = applicable.iter().map(|entry| entry.weight).sum();
        let weights = applicable
            .iter()
            .map(|entry| WeightShare {
                key: entry.key.clone(),
                weight: entry.weight,
                share: if total > 0.0 { entry.weight / total } else { 0.0 },
            })
            .collect();
        let skipped = self
            .evaluations
            .iter()
            .filter(|entry| self.is_skipped(&entry.evaluation, rdp))
            .map(|entry| entry.key.clone())
            .collect();
        AggregationInfo {
            method: AGGREGATION_METHOD.to_string(),
            weights,
            skipped,
        }
    }

    /// Structured report for `rdp`; runs missing checks but never re-runs.
    pub fn report(&self, rdp: &Rdp) -> Result<BenchmarkReport> {
        BenchmarkReport::new(self, rdp)
    }
}

fn validate_weight(weight: f64) -> Result<()> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(EvalError::InvalidBenchmark(format!(
            "weight must be finite and positive, got {weight}"
        )))
    }
}

impl fmt::Debug for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Benchmark")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("version", &self.version)
            .field("evaluations", &self.evaluations)
            .finish()
    }
}
