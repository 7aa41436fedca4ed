use std::collections::{BTreeMap, HashSet};
use std::fs::{OpenOptions, create_dir_all};
use std::path::PathBuf;
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use rdpbench_eval::BenchmarkReport;

use crate::workspace::{write_bytes_atomic, write_json_atomic};

use super::RegistryResult;

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub run_dir: PathBuf,
    pub settings_path: PathBuf,
    pub records: Vec<PathBuf>,
    pub benchmark: String,
    pub benchmark_version: String,
    pub weights: BTreeMap<String, f64>,
    pub offline_uris: usize,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig {
    pub run_id: String,
    pub started_at: String,
    pub settings_path: PathBuf,
    pub records: Vec<PathBuf>,
    pub benchmark: String,
    pub benchmark_version: String,
    pub weights: BTreeMap<String, f64>,
    pub offline_uris: usize,
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub logs_path: PathBuf,
    pub reports_dir: PathBuf,
}

pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let root = ctx.run_dir.join(format!("{timestamp}__run_{}", ctx.run_id));
    let reports_dir = root.join("reports");
    create_dir_all(&reports_dir)?;

    let config_path = root.join("config.json");
    let logs_path = root.join("logs.ndjson");

    let config = RunConfig {
        run_id: ctx.run_id.clone(),
        started_at: ctx.started_at.to_rfc3339(),
        settings_path: ctx.settings_path.clone(),
        records: ctx.records.clone(),
        benchmark: ctx.benchmark.clone(),
        benchmark_version: ctx.benchmark_version.clone(),
        weights: ctx.weights.clone(),
        offline_uris: ctx.offline_uris,
        git: collect_git_info(),
    };
    write_json_atomic(&config_path, &config)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logs_path)?;

    Ok(RunPaths {
        root,
        config_path,
        logs_path,
        reports_dir,
    })
}

/// Write `reports/<slug>.json` and `reports/<slug>.md`, returning the json path.
pub fn write_report(
    paths: &RunPaths,
    slug: &str,
    report: &BenchmarkReport,
    markdown: &str,
) -> RegistryResult<PathBuf> {
    let json_path = paths.reports_dir.join(format!("{slug}.json"));
    let markdown_path = paths.reports_dir.join(format!("{slug}.md"));
    write_json_atomic(&json_path, report)?;
    write_bytes_atomic(&markdown_path, markdown.as_bytes())?;
    Ok(json_path)
}

/// File-name stems for reports, unique within one run.
#[derive(Debug, Default)]
pub struct ReportSlugs {
    used: HashSet<String>,
}

impl ReportSlugs {
    pub fn next(&mut self, pid: &str) -> String {
        let base: String = pid
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
            .collect();
        let base = if base.is_empty() { "rdp".to_string() } else { base };

        let mut candidate = base.clone();
        let mut suffix = 2;
        while !self.used.insert(candidate.clone()) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        candidate
    }
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}
