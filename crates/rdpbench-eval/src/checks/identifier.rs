use std::sync::LazyLock;

use rdpbench_core::Resolver;
use regex::Regex;

use crate::result::{CheckResult, Shape};

static DOI: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^10\.\d{4}\d*/.*").ok());

/// Syntactic DOI test: `10.` prefix, registrant code of four or more digits,
/// a slash and any suffix.
pub fn is_valid_doi(pid: &str) -> bool {
    DOI.as_ref().is_some_and(|re| re.is_match(pid))
}

pub(crate) fn is_valid_doi_check(pid: &str) -> CheckResult {
    if pid.is_empty() {
        return CheckResult::undetermined(Shape::Boolean, "RDP has no PID");
    }
    if is_valid_doi(pid) {
        CheckResult::boolean(true, "")
    } else {
        CheckResult::boolean(false, format!("{pid} is not a valid DOI"))
    }
}

pub(crate) fn doi_resolves(pid: &str, resolver: Option<&dyn Resolver>) -> CheckResult {
    if pid.is_empty() {
        return CheckResult::undetermined(Shape::Boolean, "RDP has no PID");
    }
    let Some(resolver) = resolver else {
        return CheckResult::undetermined(Shape::Boolean, "no resolver configured");
    };
    let resolution = match resolver.resolve(&format!("https://doi.org/{pid}")) {
        Ok(resolution) => resolution,
        Err(err) => return CheckResult::undetermined(Shape::Boolean, err.to_string()),
    };
    if resolution.status_code != 302 {
        return CheckResult::boolean(
            false,
            format!(
                "Could not resolve {pid}, status code: {}",
                resolution.status_code
            ),
        );
    }
    CheckResult::boolean(
        true,
        format!(
            "Location of resolved doi: {}",
            resolution.location().unwrap_or("unknown")
        ),
    )
}
