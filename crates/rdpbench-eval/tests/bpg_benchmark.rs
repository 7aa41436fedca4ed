use std::sync::Arc;

use rdpbench_core::{Rdp, RdpRecord, Resolution, Resolver, StaticResolver};
use rdpbench_eval::{bpg_benchmark, render_markdown};
use serde_json::json;

const PID: &str = "10.5281/zenodo.3490396";
const LICENSE: &str = "https://creativecommons.org/licenses/by/4.0/legalcode";

fn record() -> Rdp {
    let abstract_text = "This dataset contains hourly soil moisture measurements that were \
        collected at twelve field stations in Saxony between the spring of 2017 and the \
        autumn of 2019. Every value was checked by hand before publication and is given \
        in percent of volume. The files also hold the air temperature and the amount of \
        rain that were recorded at the same stations, so that the soil moisture can be \
        compared with the weather of each day and each season.";
    let value = json!({
        "pid": PID,
        "metadata": {
            "pid": PID,
            "descriptions": [
                {"text": abstract_text, "description_type": "Abstract", "lang": "en"},
                {"text": "Three word methods", "description_type": "Methods", "lang": "en"}
            ],
            "titles": [{"text": "Soil moisture measurements in Saxony", "lang": "en"}],
            "formats": ["text/csv"],
            "rights": [{"text": "CC BY 4.0", "uri": LICENSE, "spdx": "CC-BY-4.0"}],
            "subjects": [
                {"value": "551", "scheme": "DDC", "scheme_uri": "https://www.oclc.org/en/dewey.html"},
                {
                    "value": "soil",
                    "scheme": "Wikidata",
                    "scheme_uri": "https://www.wikidata.org",
                    "value_uri": "https://www.wikidata.org/wiki/Q36133"
                }
            ],
            "creators": [{
                "name": "Weber, Tobias",
                "given_name": "Tobias",
                "family_name": "Weber",
                "name_type": "Personal",
                "name_identifiers": [{"value": "0000-0003-1815-7041", "scheme": "ORCID"}]
            }],
            "contributors": [{
                "name": "Weber, Tobias",
                "given_name": "Tobias",
                "family_name": "Weber",
                "name_type": "Personal",
                "contributor_type": "ContactPerson",
                "name_identifiers": [{"value": "https://orcid.org/0000-0003-1815-7041", "scheme": "ORCID"}]
            }],
            "sizes": ["12 MB"],
            "language": "en",
            "version": "1.0.0",
            "publication_year": 2019,
            "dates": [{"value": "2019-10-17", "date_type": "Issued"}],
            "related_resources": [{
                "identifier": "10.5281/zenodo.1",
                "identifier_type": "DOI",
                "relation_type": "IsVersionOf",
                "related_metadata_scheme": "DataCite"
            }],
            "resource_type": "Dataset"
        },
        "services": [{
            "name": "zenodo",
            "protocol": "oai-pmh",
            "endpoint": "https://zenodo.org/oai2d",
            "capacities": ["GetRecord"]
        }]
    });
    serde_json::from_value::<RdpRecord>(value)
        .expect("valid record")
        .into_rdp()
}

fn online() -> Arc<dyn Resolver> {
    Arc::new(
        StaticResolver::new()
            .answer(
                format!("https://doi.org/{PID}"),
                Resolution::new(302).with_header("Location", "https://zenodo.org/record/3490396"),
            )
            .answer(LICENSE, Resolution::new(200)),
    )
}

fn rounded(value: f64) -> f64 {
    (value * 1e10).round() / 1e10
}

#[test]
fn exemplary_record_scores_perfectly() {
    let rdp = record();
    let benchmark = bpg_benchmark(online()).expect("benchmark");
    benchmark.check_all(&rdp);
    let report = benchmark.report(&rdp).expect("report");

    for evaluation in &report.evaluation_reports {
        assert_eq!(evaluation.evaluation, 1.0, "{}", evaluation.key);
    }
    assert_eq!(report.score, 1.0);
    assert!(report.aggregation_info.skipped.is_empty());
}

#[test]
fn offline_network_checks_degrade_one_evaluation_each() {
    let rdp = record();
    let benchmark = bpg_benchmark(Arc::new(StaticResolver::new())).expect("benchmark");
    benchmark.check_all(&rdp);
    let score = benchmark.score(&rdp).expect("score");
    assert_eq!(score, rounded(33.0 / 35.0));

    let report = benchmark.report(&rdp).expect("report");
    let undetermined: Vec<&str> = report
        .unsuccessful_checks()
        .map(|check| check.header.name.as_str())
        .collect();
    assert_eq!(
        undetermined,
        vec!["DoiResolvesCheck", "RightsHasAtLeastOneLicenseCheck"]
    );
}

#[test]
fn report_is_idempotent() {
    let rdp = record();
    let benchmark = bpg_benchmark(online()).expect("benchmark");
    benchmark.check_all(&rdp);
    let first = benchmark.report(&rdp).expect("report").to_value().expect("json");
    let second = benchmark.report(&rdp).expect("report").to_value().expect("json");
    assert_eq!(first, second);
}

#[test]
fn report_runs_missing_checks_once() {
    let rdp = record();
    let benchmark = bpg_benchmark(online()).expect("benchmark");
    let first = benchmark.report(&rdp).expect("report");
    let second = benchmark.report(&rdp).expect("report");
    assert_eq!(first, second);
    for check in benchmark.checks() {
        assert_eq!(check.log_len(), 1, "{}", check.name());
    }
}

#[test]
fn report_json_shape() {
    let rdp = record();
    let benchmark = bpg_benchmark(online()).expect("benchmark");
    benchmark.check_all(&rdp);
    let value = benchmark.report(&rdp).expect("report").to_value().expect("json");

    assert_eq!(value["name"], "BPGBenchmark");
    assert_eq!(value["version"], "0.0.1");
    assert_eq!(value["pid"], PID);
    assert_eq!(value["rounded"], 10);
    assert_eq!(value["precision"], 53);
    assert_eq!(value["aggregation_info"]["method"], "weighted_mean");
    assert_eq!(value["evaluation_reports"].as_array().map(Vec::len), Some(35));

    let doi = &value["check_reports"][1];
    assert_eq!(doi["name"], "DoiResolvesCheck");
    assert_eq!(doi["type"], "nondeterministic");
    assert_eq!(doi["success"], true);
    assert_eq!(doi["message"], "Location of resolved doi: https://zenodo.org/record/3490396");
}

#[test]
fn optional_properties_are_skipped() {
    let value = json!({
        "pid": "10.5281/zenodo.2",
        "metadata": {
            "titles": [{"text": "Herbarium sheet"}],
            "resource_type": "Image"
        }
    });
    let rdp = serde_json::from_value::<RdpRecord>(value)
        .expect("valid record")
        .into_rdp();
    let benchmark = bpg_benchmark(online()).expect("benchmark");
    benchmark.check_all(&rdp);
    let report = benchmark.report(&rdp).expect("report");

    let skipped = &report.aggregation_info.skipped;
    for key in [
        "ContainsAllEvaluation[4]",
        "DoesNotContainEvaluation[4]",
        "ContainsAllEvaluation[8]",
        "TrueEvaluation[25]",
        "TrueEvaluation[11]",
        "InListEvaluation[29]",
        "InListEvaluation[35]",
        "TheMoreTrueTheBetterEvaluation[36]",
    ] {
        assert!(skipped.iter().any(|skip| skip == key), "{key} not skipped");
    }
    assert_eq!(report.evaluation_reports.len() + skipped.len(), 35);
    let shares: f64 = report
        .aggregation_info
        .weights
        .iter()
        .map(|share| share.share)
        .sum();
    assert!((shares - 1.0).abs() < 1e-9);
}

#[test]
fn record_without_metadata_still_reports() {
    let rdp = Rdp::without_metadata("10.5281/zenodo.404");
    let benchmark = bpg_benchmark(online()).expect("benchmark");
    benchmark.check_all(&rdp);
    let report = benchmark.report(&rdp).expect("report");
    assert!(report.score < 0.1);
    let undetermined = report.unsuccessful_checks().count();
    assert!(undetermined > 20);
    let markdown = render_markdown(&report, 5);
    assert!(markdown.contains("## Undetermined checks"));
    assert!(markdown.contains("metadata unavailable"));
    assert!(markdown.contains("more"));
}

#[test]
fn markdown_is_deterministic() {
    let rdp = record();
    let benchmark = bpg_benchmark(online()).expect("benchmark");
    benchmark.check_all(&rdp);
    let report = benchmark.report(&rdp).expect("report");
    let markdown = render_markdown(&report, 10);
    assert_eq!(markdown, render_markdown(&report, 10));
    assert!(markdown.starts_with("# BPGBenchmark Report"));
    assert!(markdown.contains(&format!("- pid: {PID}")));
    assert!(markdown.contains("- score: 1.0000"));
    assert!(markdown.contains("- every evaluation reached the maximum score."));
}
