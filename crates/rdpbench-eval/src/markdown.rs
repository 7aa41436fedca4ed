use crate::report::{BenchmarkReport, EvaluationReport};

/// Render a deterministic markdown report for one RDP.
pub fn render_markdown(report: &BenchmarkReport, max_messages: usize) -> String {
    let mut lines = Vec::new();

    lines.push(format!("# {} Report", report.header.name));
    lines.push(String::new());
    lines.push("## Summary".to_string());
    lines.push(format!("- pid: {}", report.pid));
    lines.push(format!(
        "- benchmark: {} {}",
        report.header.name, report.header.version
    ));
    lines.push(format!("- score: {:.4}", report.score));
    lines.push(format!(
        "- aggregation: {}",
        report.aggregation_info.method
    ));
    lines.push(format!(
        "- evaluations: {} applied, {} skipped",
        report.evaluation_reports.len(),
        report.aggregation_info.skipped.len()
    ));
    lines.push(String::new());

    lines.push("## Evaluations".to_string());
    lines.push("| evaluation | weight | share | score |".to_string());
    lines.push("| --- | --- | --- | --- |".to_string());
    for evaluation in &report.evaluation_reports {
        let (weight, share) = report
            .aggregation_info
            .weights
            .iter()
            .find(|share| share.key == evaluation.key)
            .map(|share| (format!("{}", share.weight), format!("{:.4}", share.share)))
            .unwrap_or_else(|| ("-".to_string(), "-".to_string()));
        lines.push(format!(
            "| {} | {} | {} | {:.4} |",
            evaluation.key, weight, share, evaluation.evaluation
        ));
    }
    lines.push(String::new());

    if !report.aggregation_info.skipped.is_empty() {
        lines.push("## Skipped evaluations".to_string());
        for key in &report.aggregation_info.skipped {
            lines.push(format!("- {key}"));
        }
        lines.push(String::new());
    }

    lines.push("## Checks".to_string());
    lines.push("| check | type | success | result |".to_string());
    lines.push("| --- | --- | --- | --- |".to_string());
    for check in &report.check_reports {
        let success = check
            .success
            .map(|success| success.to_string())
            .unwrap_or_else(|| "-".to_string());
        let result = check
            .result
            .as_ref()
            .map(|outcome| outcome.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "| {} | {} | {} | {} |",
            check.header.name,
            check.determinism.as_str(),
            success,
            result
        ));
    }
    lines.push(String::new());

    let unsuccessful: Vec<_> = report.unsuccessful_checks().collect();
    if !unsuccessful.is_empty() {
        lines.push("## Undetermined checks".to_string());
        for check in unsuccessful.iter().take(max_messages) {
            let message = check.message.as_deref().unwrap_or_default();
            lines.push(format!("- {}: {}", check.header.name, message));
        }
        if unsuccessful.len() > max_messages {
            lines.push(format!("- ... {} more", unsuccessful.len() - max_messages));
        }
        lines.push(String::new());
    }

    lines.push("## Recommendations".to_string());
    lines.extend(recommendations(report));
    lines.join("\n")
}

fn recommendations(report: &BenchmarkReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut weakest: Vec<&EvaluationReport> = report
        .evaluation_reports
        .iter()
        .filter(|evaluation| evaluation.evaluation < 1.0)
        .collect();
    weakest.sort_by(|a, b| a.evaluation.total_cmp(&b.evaluation).then(a.key.cmp(&b.key)));
    for evaluation in weakest {
        lines.push(format!(
            "- improve metadata for {} (scored {:.4}).",
            evaluation.key, evaluation.evaluation
        ));
    }
    if report.unsuccessful_checks().next().is_some() {
        lines.push("- fill in the metadata fields listed under undetermined checks.".to_string());
    }
    if report.evaluation_reports.is_empty() {
        lines.push("- no evaluation applied to this RDP; review the skip rules.".to_string());
    } else if lines.is_empty() {
        lines.push("- every evaluation reached the maximum score.".to_string());
    }
    lines
}
