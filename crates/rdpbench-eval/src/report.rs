//! Read-only projections of checks, evaluations and benchmarks for one pid.
//!
//! Building a report never mutates the log except for running checks a
//! benchmark needs and has not run yet, so two reports without a new
//! `check_all` in between are identical.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rdpbench_core::Rdp;
use serde::Serialize;
use serde_json::Value;

use crate::benchmark::{AggregationInfo, Benchmark};
use crate::checks::{Check, Determinism};
use crate::errors::Result;
use crate::evaluation::Evaluation;
use crate::result::Outcome;

/// Identity shared by every report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportHeader {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
}

/// Latest log entry of a check for one pid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    #[serde(flatten)]
    pub header: ReportHeader,
    #[serde(rename = "type")]
    pub determinism: Determinism,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckReport {
    /// Fields of the last run stay empty when the check never ran for `pid`.
    pub fn new(check: &Check, pid: &str) -> Self {
        let entry = check.last_entry(pid);
        Self {
            header: ReportHeader {
                id: check.id().to_string(),
                name: check.name(),
                version: check.version().to_string(),
                description: check.description().to_string(),
            },
            determinism: check.determinism(),
            start: entry.as_ref().map(|entry| entry.start),
            end: entry.as_ref().map(|entry| entry.end),
            success: entry.as_ref().map(|entry| entry.result.success()),
            result: entry.as_ref().map(|entry| entry.result.outcome().clone()),
            message: entry.map(|entry| entry.result.message().to_string()),
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    #[serde(flatten)]
    pub header: ReportHeader,
    pub key: String,
    /// Ids of the evaluated checks.
    pub checks: Vec<String>,
    pub rounded: u32,
    pub evaluation: f64,
}

impl EvaluationReport {
    pub fn new(evaluation: &Evaluation, pid: &str) -> Result<Self> {
        Ok(Self {
            header: ReportHeader {
                id: evaluation.id().to_string(),
                name: evaluation.name(),
                version: evaluation.version().to_string(),
                description: evaluation.description(),
            },
            key: evaluation.key(),
            checks: evaluation
                .checks()
                .iter()
                .map(|check| check.id().to_string())
                .collect(),
            rounded: evaluation.rounded(),
            evaluation: evaluation.evaluate(pid)?,
        })
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    #[serde(flatten)]
    pub header: ReportHeader,
    pub pid: String,
    pub score: f64,
    pub rounded: u32,
    /// Mantissa bits of the float type scores are computed in.
    pub precision: u32,
    pub aggregation_info: AggregationInfo,
    pub evaluation_reports: Vec<EvaluationReport>,
    pub check_reports: Vec<CheckReport>,
}

impl BenchmarkReport {
    /// Covers the evaluations that apply to `rdp` and the checks they use.
    pub fn new(benchmark: &Benchmark, rdp: &Rdp) -> Result<Self> {
        let score = benchmark.score(rdp)?;
        let applicable = benchmark.applicable(rdp);

        let evaluation_reports = applicable
            .iter()
            .map(|entry| EvaluationReport::new(entry.evaluation(), rdp.pid()))
            .collect::<Result<Vec<_>>>()?;

        let mut checks: Vec<&Arc<Check>> = Vec::new();
        for entry in &applicable {
            for check in entry.evaluation().checks() {
                if !checks.iter().any(|seen| Arc::ptr_eq(seen, check)) {
                    checks.push(check);
                }
            }
        }
        let check_reports = checks
            .into_iter()
            .map(|check| CheckReport::new(check, rdp.pid()))
            .collect();

        Ok(Self {
            header: ReportHeader {
                id: benchmark.id().to_string(),
                name: benchmark.name().to_string(),
                version: benchmark.version().to_string(),
                description: benchmark.description().to_string(),
            },
            pid: rdp.pid().to_string(),
            score,
            rounded: benchmark.rounded(),
            precision: f64::MANTISSA_DIGITS,
            aggregation_info: benchmark.aggregation_info(rdp),
            evaluation_reports,
            check_reports,
        })
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Check reports whose last run could not determine an outcome.
    pub fn unsuccessful_checks(&self) -> impl Iterator<Item = &CheckReport> {
        self.check_reports
            .iter()
            .filter(|report| report.success == Some(false))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::checks::CheckKind;
    use crate::evaluation::Strategy;
    use crate::result::{CheckResult, Shape};

    #[test]
    fn unrun_check_report_has_identity_only() {
        let check = Check::new(CheckKind::IsValidDoi);
        let value = CheckReport::new(&check, "10.123/x").to_value().expect("json");
        assert_eq!(value["id"], "0");
        assert_eq!(value["name"], "IsValidDoiCheck");
        assert_eq!(value["type"], "deterministic");
        assert!(value.get("success").is_none());
        assert!(value.get("start").is_none());
    }

    #[test]
    fn check_report_reflects_last_entry() {
        let check = Check::new(CheckKind::DoiResolves);
        let now = Utc::now();
        check.record(now, now, "10.123/x", CheckResult::boolean(true, "first"));
        check.record(
            now,
            now,
            "10.123/x",
            CheckResult::undetermined(Shape::Boolean, "no resolver configured"),
        );
        let value = CheckReport::new(&check, "10.123/x").to_value().expect("json");
        assert_eq!(value["type"], "nondeterministic");
        assert_eq!(value["success"], false);
        assert_eq!(value["result"], false);
        assert_eq!(value["message"], "no resolver configured");
    }

    #[test]
    fn evaluation_report_lists_check_ids() {
        let number = Check::new(CheckKind::DescriptionsNumber).shared();
        let now = Utc::now();
        number.record(now, now, "10.123/x", CheckResult::metric(2.0, ""));
        let evaluation = Evaluation::of(&number, Strategy::IsBetween { low: 1.0, high: 100.0 })
            .expect("valid");
        let value = EvaluationReport::new(&evaluation, "10.123/x")
            .and_then(|report| report.to_value())
            .expect("json");
        assert_eq!(value["checks"], serde_json::json!(["2"]));
        assert_eq!(value["rounded"], 10);
        assert_eq!(value["evaluation"], 1.0);
        assert_eq!(value["name"], "IsBetweenEvaluation");
    }
}
