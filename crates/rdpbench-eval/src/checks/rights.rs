use rdpbench_core::{Metadata, Resolver, Rights};

use crate::result::{CheckResult, Item, Shape};

const SPDX_IDENTIFIERS: &[&str] = &[
    "0BSD",
    "AGPL-3.0-only",
    "AGPL-3.0-or-later",
    "Apache-2.0",
    "BSD-2-Clause",
    "BSD-3-Clause",
    "CC-BY-3.0",
    "CC-BY-3.0-DE",
    "CC-BY-4.0",
    "CC-BY-NC-4.0",
    "CC-BY-NC-ND-4.0",
    "CC-BY-NC-SA-4.0",
    "CC-BY-ND-4.0",
    "CC-BY-SA-3.0",
    "CC-BY-SA-3.0-DE",
    "CC-BY-SA-4.0",
    "CC0-1.0",
    "EUPL-1.2",
    "GPL-2.0-only",
    "GPL-2.0-or-later",
    "GPL-3.0-only",
    "GPL-3.0-or-later",
    "LGPL-2.1-only",
    "LGPL-3.0-only",
    "MIT",
    "MPL-2.0",
    "ODC-By-1.0",
    "ODbL-1.0",
    "PDDL-1.0",
    "Unlicense",
];

/// URI fragments of licenses that allow reuse without restriction beyond
/// attribution or share-alike.
const OPEN_LICENSE_URIS: &[&str] = &[
    "creativecommons.org/publicdomain/zero/",
    "creativecommons.org/publicdomain/mark/",
    "creativecommons.org/licenses/by/",
    "creativecommons.org/licenses/by-sa/",
    "opendatacommons.org/licenses/pddl/",
    "opendatacommons.org/licenses/by/",
    "opendatacommons.org/licenses/odbl/",
    "opensource.org/licenses/mit",
    "apache.org/licenses/license-2.0",
    "info:eu-repo/semantics/openaccess",
];

pub fn is_known_spdx(identifier: &str) -> bool {
    SPDX_IDENTIFIERS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(identifier.trim()))
}

/// Whether a rights statement names an open license, by URI or SPDX id.
pub fn is_open_license(rights: &Rights) -> bool {
    if let Some(uri) = rights.uri.as_deref() {
        let uri = uri.to_ascii_lowercase();
        if OPEN_LICENSE_URIS.iter().any(|open| uri.contains(open)) {
            return true;
        }
    }
    rights.spdx.as_deref().is_some_and(|id| {
        let id = id.trim().to_ascii_uppercase();
        is_known_spdx(&id) && !id.contains("-NC") && !id.contains("-ND")
    })
}

pub(crate) fn spdx_identifiers(md: &Metadata) -> CheckResult {
    if md.rights.is_empty() {
        return CheckResult::undetermined(Shape::List, "no rights given");
    }
    let outcome = md
        .rights
        .iter()
        .map(|rights| Item::from(rights.spdx.as_deref().is_some_and(is_known_spdx)))
        .collect();
    CheckResult::list(outcome, "")
}

pub(crate) fn rights_are_open(md: &Metadata) -> CheckResult {
    if md.rights.is_empty() {
        return CheckResult::undetermined(Shape::Boolean, "no rights given");
    }
    match md.rights.iter().find(|rights| is_open_license(rights)) {
        Some(open) => CheckResult::boolean(true, format!("open license: {}", open.text)),
        None => CheckResult::boolean(false, ""),
    }
}

/// At least one rights URI answering 200 counts as a reachable license.
pub(crate) fn has_license(md: &Metadata, resolver: Option<&dyn Resolver>) -> CheckResult {
    let uris: Vec<&str> = md
        .rights
        .iter()
        .filter_map(|rights| rights.uri.as_deref())
        .collect();
    if uris.is_empty() {
        return CheckResult::boolean(false, "no rights URI given");
    }
    let Some(resolver) = resolver else {
        return CheckResult::undetermined(Shape::Boolean, "no resolver configured");
    };

    let mut answered = false;
    let mut failures = Vec::new();
    for uri in uris {
        match resolver.resolve(uri) {
            Ok(resolution) if resolution.status_code == 200 => {
                return CheckResult::boolean(true, format!("{uri} resolves"));
            }
            Ok(_) => answered = true,
            Err(err) => failures.push(err.to_string()),
        }
    }
    if answered {
        CheckResult::boolean(false, "no rights URI resolves")
    } else {
        CheckResult::undetermined(Shape::Boolean, failures.join("; "))
    }
}
