use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use rdpbench_core::{RdpRecord, StaticResolver};
use rdpbench_eval::{bpg_benchmark, render_markdown};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let mut record_path: Option<PathBuf> = None;
    let mut json = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--record" => record_path = args.next().map(PathBuf::from),
            "--json" => json = true,
            _ => {
                if record_path.is_none() {
                    record_path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let record_path = record_path.ok_or("missing --record path")?;
    let record_json = std::fs::read_to_string(&record_path)?;
    let record: RdpRecord = serde_json::from_str(&record_json)?;
    let rdp = record.into_rdp();

    // Offline: network checks come out undetermined.
    let benchmark = bpg_benchmark(Arc::new(StaticResolver::new()))?;
    benchmark.check_all(&rdp);
    let report = benchmark.report(&rdp)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_markdown(&report, 20));
    }
    Ok(())
}
