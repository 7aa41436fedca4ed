mod registry;
mod workspace;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use rdpbench_core::{Rdp, RdpRecord};
use rdpbench_eval::{Benchmark, CheckKind, EvalError, bpg_benchmark, render_markdown};
use registry::{ReportSlugs, RunContext, init_run_logging, start_run, write_report};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;
use workspace::{DEFAULT_SETTINGS_FILE, Settings, load_or_create_settings};

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("settings error: {0}")]
    Workspace(#[from] workspace::WorkspaceError),
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid record {path}: {source}")]
    Record {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "rdpbench",
    version,
    about = "Metadata quality benchmarks for research data products"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Benchmark RDP records; network checks answer from the settings file.
    ///
    /// Checks that resolve URIs never touch the network. They ask an offline
    /// resolver that knows only the URIs listed under `[resolutions]` in
    /// rdpbench.toml (a `status_code` and an optional `location` each); any
    /// other URI counts as unreachable and its check is unsuccessful.
    Bench(BenchArgs),
    /// List the check catalog.
    Checks(ChecksArgs),
}

#[derive(Args, Debug)]
struct BenchArgs {
    /// RDP record files (JSON).
    #[arg(value_name = "RECORD", required = true)]
    records: Vec<PathBuf>,
    /// Settings file, created with defaults when missing.
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    /// Output directory for runs; overrides the settings file.
    #[arg(long)]
    run_dir: Option<PathBuf>,
    /// Also print each markdown report to stdout.
    #[arg(long, default_value_t = false)]
    stdout: bool,
}

#[derive(Args, Debug)]
struct ChecksArgs {
    /// Print the catalog as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Bench(args) => run_bench(args),
        Command::Checks(args) => run_checks(args),
    }
}

fn run_bench(args: BenchArgs) -> Result<(), CliError> {
    let BenchArgs {
        records,
        config,
        run_dir,
        stdout,
    } = args;

    let settings = load_or_create_settings(&config)?;
    let run_dir = run_dir.unwrap_or_else(|| settings.run_dir.clone());

    let run_id = Uuid::new_v4().to_string();
    let template = build_benchmark(&settings)?;
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        run_dir,
        settings_path: config,
        records: records.clone(),
        benchmark: template.name().to_string(),
        benchmark_version: template.version().to_string(),
        weights: settings.weights.clone(),
        offline_uris: settings.resolutions.len(),
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;

    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        records = records.len(),
        benchmark = %run_ctx.benchmark,
        config = %run_paths.config_path.display()
    );

    let timer = Instant::now();
    let mut slugs = ReportSlugs::default();

    for path in &records {
        let rdp = load_record(path)?;
        // Check logs are per benchmark; a fresh one keeps records independent.
        let benchmark = build_benchmark(&settings)?;
        benchmark.check_all(&rdp);
        let report = benchmark.report(&rdp)?;
        let markdown = render_markdown(&report, settings.max_messages);

        let slug = slugs.next(rdp.pid());
        let report_path = write_report(&run_paths, &slug, &report, &markdown)?;
        tracing::info!(
            event = "report_written",
            pid = %rdp.pid(),
            score = report.score,
            path = %report_path.display()
        );

        if stdout {
            println!("{markdown}");
            println!();
        }
        println!("{} {}", rdp.pid(), report.score);
    }

    println!("run_dir={}", run_paths.root.display());

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(event = "run_finished", status = "success", duration_ms = duration_ms);

    Ok(())
}

fn build_benchmark(settings: &Settings) -> Result<Benchmark, CliError> {
    let mut benchmark = bpg_benchmark(Arc::new(settings.resolver()))?;
    for (key, weight) in &settings.weights {
        benchmark.set_weight(key, *weight)?;
    }
    Ok(benchmark)
}

fn load_record(path: &Path) -> Result<Rdp, CliError> {
    let content = std::fs::read(path)?;
    let record: RdpRecord =
        serde_json::from_slice(&content).map_err(|source| CliError::Record {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(record.into_rdp())
}

#[derive(Debug, Serialize)]
struct CatalogEntry {
    id: u32,
    name: String,
    version: &'static str,
    #[serde(rename = "type")]
    determinism: &'static str,
    network: bool,
    shape: &'static str,
    description: &'static str,
}

fn run_checks(args: ChecksArgs) -> Result<(), CliError> {
    let catalog: Vec<CatalogEntry> = CheckKind::all()
        .iter()
        .map(|kind| CatalogEntry {
            id: kind.id(),
            name: kind.name(),
            version: kind.version(),
            determinism: kind.determinism().as_str(),
            network: kind.needs_network(),
            shape: kind.shape().as_str(),
            description: kind.description(),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!("| id | check | type | result |");
    println!("| --- | --- | --- | --- |");
    for entry in &catalog {
        println!(
            "| {} | {} | {} | {} |",
            entry.id, entry.name, entry.determinism, entry.shape
        );
    }
    Ok(())
}
