use std::collections::BTreeSet;
use std::sync::LazyLock;

use rdpbench_core::{Metadata, Rdp};
use regex::Regex;

use crate::result::{CheckResult, Item, Shape};

static SEMVER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
    )
    .ok()
});

fn declared_version(md: &Metadata) -> Option<&str> {
    md.version.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn version_specified(md: &Metadata) -> CheckResult {
    CheckResult::boolean(declared_version(md).is_some(), "")
}

pub(crate) fn version_semver(md: &Metadata) -> CheckResult {
    let Some(version) = declared_version(md) else {
        return CheckResult::undetermined(Shape::Boolean, "no version given");
    };
    let conforms = SEMVER.as_ref().is_some_and(|re| re.is_match(version));
    let message = if conforms {
        String::new()
    } else {
        format!("{version} is not a semantic version")
    };
    CheckResult::boolean(conforms, message)
}

pub(crate) fn publication_year(md: &Metadata) -> CheckResult {
    match md.publication_year {
        Some(year) => CheckResult::metric(f64::from(year), ""),
        None => CheckResult::undetermined(Shape::Metric, "no publication year given"),
    }
}

fn per_date(md: &Metadata, measure: impl Fn(&rdpbench_core::DateEntry) -> Item) -> CheckResult {
    if md.dates.is_empty() {
        return CheckResult::undetermined(Shape::List, "no dates given");
    }
    CheckResult::list(md.dates.iter().map(measure).collect(), "")
}

pub(crate) fn dates_type(md: &Metadata) -> CheckResult {
    per_date(md, |date| Item::from(date.date_type.as_deref()))
}

pub(crate) fn dates_information(md: &Metadata) -> CheckResult {
    per_date(md, |date| Item::from(date.information.as_deref()))
}

pub(crate) fn dates_issued_year(md: &Metadata) -> CheckResult {
    let issued = md.dates.iter().find(|date| {
        date.date_type
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case("issued"))
    });
    let Some(issued) = issued else {
        return CheckResult::undetermined(Shape::Metric, "no issued date given");
    };
    match issued.year() {
        Some(year) => CheckResult::metric(f64::from(year), ""),
        None => CheckResult::undetermined(
            Shape::Metric,
            format!("issued date {} has no year", issued.value),
        ),
    }
}

pub(crate) fn related_resource_type(md: &Metadata) -> CheckResult {
    if md.related_resources.is_empty() {
        return CheckResult::undetermined(Shape::List, "no related resources given");
    }
    let outcome = md
        .related_resources
        .iter()
        .map(|related| Item::from(related.relation_type.as_deref()))
        .collect();
    CheckResult::list(outcome, "")
}

pub(crate) fn related_resource_metadata(md: &Metadata) -> CheckResult {
    if md.related_resources.is_empty() {
        return CheckResult::undetermined(Shape::List, "no related resources given");
    }
    let outcome = md
        .related_resources
        .iter()
        .map(|related| Item::from(related.related_metadata_scheme.is_some()))
        .collect();
    CheckResult::list(outcome, "")
}

/// Distinct capacities over all services, sorted.
pub(crate) fn capacities_supported(rdp: &Rdp) -> CheckResult {
    let capacities: BTreeSet<&str> = rdp
        .services()
        .values()
        .flat_map(|service| service.capacities.iter().map(String::as_str))
        .collect();
    CheckResult::list(capacities.into_iter().map(Item::from).collect(), "")
}
