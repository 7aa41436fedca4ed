//! Atomic checks over one aspect of an RDP.
//!
//! A [`Check`] is a [`CheckKind`] plus the run history of that kind. Running
//! it never fails: missing data and network faults become unsuccessful
//! results in the log.

mod agents;
mod descriptive;
mod identifier;
mod kind;
mod provenance;
mod rights;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rdpbench_core::{Metadata, Rdp, Resolver};

use crate::log::{Log, LogEntry};
use crate::result::{CheckResult, Shape};

pub use agents::is_valid_orcid;
pub use identifier::is_valid_doi;
pub use kind::{CheckKind, Determinism};
pub use rights::{is_known_spdx, is_open_license};

/// A check kind together with its run log.
///
/// Checks are shared between evaluations as `Arc<Check>`; the log sits
/// behind a mutex so a shared check can be run from several callers.
pub struct Check {
    kind: CheckKind,
    resolver: Option<Arc<dyn Resolver>>,
    log: Mutex<Log>,
}

impl Check {
    pub fn new(kind: CheckKind) -> Self {
        Self {
            kind,
            resolver: None,
            log: Mutex::new(Log::new()),
        }
    }

    /// A check that may resolve URIs through `resolver`.
    pub fn with_resolver(kind: CheckKind, resolver: Arc<dyn Resolver>) -> Self {
        Self {
            kind,
            resolver: Some(resolver),
            log: Mutex::new(Log::new()),
        }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn kind(&self) -> CheckKind {
        self.kind
    }

    pub fn id(&self) -> u32 {
        self.kind.id()
    }

    pub fn name(&self) -> String {
        self.kind.name()
    }

    pub fn version(&self) -> &'static str {
        self.kind.version()
    }

    pub fn description(&self) -> &'static str {
        self.kind.description()
    }

    pub fn determinism(&self) -> Determinism {
        self.kind.determinism()
    }

    /// Run the check against `rdp` and append the result to the log.
    pub fn check(&self, rdp: &Rdp) {
        let start = Utc::now();
        let result = self.measure(rdp);
        let end = Utc::now();
        debug_assert_eq!(result.shape(), self.kind.shape());
        tracing::debug!(
            event = "check_finished",
            check = %self.name(),
            pid = %rdp.pid(),
            success = result.success(),
            duration_ms = (end - start).num_milliseconds()
        );
        self.record(start, end, rdp.pid(), result);
    }

    /// Append an externally determined result, e.g. when a prerequisite
    /// check already failed and running this one would be pointless.
    pub fn record(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        pid: impl Into<String>,
        result: CheckResult,
    ) {
        self.lock().add(LogEntry {
            start,
            end,
            pid: pid.into(),
            result,
        });
    }

    pub fn last_result(&self, pid: &str) -> Option<CheckResult> {
        self.lock().last_for(pid).map(|entry| entry.result.clone())
    }

    pub fn last_entry(&self, pid: &str) -> Option<LogEntry> {
        self.lock().last_for(pid).cloned()
    }

    /// Every entry for `pid`, oldest first.
    pub fn entries_for(&self, pid: &str) -> Vec<LogEntry> {
        self.lock().by_pid(pid).into_iter().cloned().collect()
    }

    pub fn log_len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Log> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn measure(&self, rdp: &Rdp) -> CheckResult {
        use CheckKind::*;

        let shape = self.kind.shape();
        let resolver = self.resolver.as_deref();
        match self.kind {
            IsValidDoi => identifier::is_valid_doi_check(rdp.pid()),
            DoiResolves => identifier::doi_resolves(rdp.pid(), resolver),
            CapacitiesSupported => provenance::capacities_supported(rdp),
            RightsHasAtLeastOneLicense => {
                on_metadata(rdp, shape, |md| rights::has_license(md, resolver))
            }
            DescriptionsNumber => on_metadata(rdp, shape, descriptive::descriptions_number),
            DescriptionsLength => on_metadata(rdp, shape, descriptive::descriptions_length),
            DescriptionsLanguage => on_metadata(rdp, shape, descriptive::descriptions_language),
            DescriptionsType => on_metadata(rdp, shape, descriptive::descriptions_type),
            TitlesNumber => on_metadata(rdp, shape, descriptive::titles_number),
            TitlesLength => on_metadata(rdp, shape, descriptive::titles_length),
            TitlesLanguage => on_metadata(rdp, shape, descriptive::titles_language),
            TitlesJustAFileName => on_metadata(rdp, shape, descriptive::titles_just_a_file_name),
            TitlesType => on_metadata(rdp, shape, descriptive::titles_type),
            FormatsAreValidMediaType => on_metadata(rdp, shape, descriptive::formats_media_type),
            SubjectsAreQualified => on_metadata(rdp, shape, descriptive::subjects_qualified),
            SubjectsNumber => on_metadata(rdp, shape, descriptive::subjects_number),
            SubjectsHaveDdc => on_metadata(rdp, shape, descriptive::subjects_have_ddc),
            SubjectsHaveWikidataKeywords => on_metadata(rdp, shape, descriptive::subjects_wikidata),
            SizesNumber => on_metadata(rdp, shape, descriptive::sizes_number),
            SizesByteSize => on_metadata(rdp, shape, descriptive::sizes_byte_size),
            LanguageSpecified => on_metadata(rdp, shape, descriptive::language_specified),
            RightsHaveValidSpdxIdentifier => on_metadata(rdp, shape, rights::spdx_identifiers),
            RightsAreOpen => on_metadata(rdp, shape, rights::rights_are_open),
            CreatorsOrcid => on_metadata(rdp, shape, |md| agents::orcids(&md.creators, "creators")),
            CreatorsFamilyAndGivenName => on_metadata(rdp, shape, |md| {
                agents::family_and_given_names(&md.creators, "creators")
            }),
            CreatorsContainInstitutions => on_metadata(rdp, shape, |md| {
                agents::institutions(&md.creators, "creators")
            }),
            ContributorsOrcid => on_metadata(rdp, shape, |md| {
                agents::orcids(&md.contributors, "contributors")
            }),
            ContributorsFamilyAndGivenName => on_metadata(rdp, shape, |md| {
                agents::family_and_given_names(&md.contributors, "contributors")
            }),
            ContributorsContainInstitutions => on_metadata(rdp, shape, |md| {
                agents::institutions(&md.contributors, "contributors")
            }),
            ContributorsType => on_metadata(rdp, shape, agents::contributor_types),
            VersionSpecified => on_metadata(rdp, shape, provenance::version_specified),
            VersionConformsToSemVer => on_metadata(rdp, shape, provenance::version_semver),
            PublicationYear => on_metadata(rdp, shape, provenance::publication_year),
            DatesType => on_metadata(rdp, shape, provenance::dates_type),
            DatesInformation => on_metadata(rdp, shape, provenance::dates_information),
            DatesIssuedYear => on_metadata(rdp, shape, provenance::dates_issued_year),
            RelatedResourceType => on_metadata(rdp, shape, provenance::related_resource_type),
            RelatedResourceMetadata => {
                on_metadata(rdp, shape, provenance::related_resource_metadata)
            }
        }
    }
}

fn on_metadata(
    rdp: &Rdp,
    shape: Shape,
    measure: impl FnOnce(&Metadata) -> CheckResult,
) -> CheckResult {
    match rdp.metadata() {
        Some(metadata) => measure(metadata),
        None => CheckResult::undetermined(shape, "metadata unavailable"),
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("kind", &self.kind)
            .field("has_resolver", &self.resolver.is_some())
            .field("entries", &self.log_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rdpbench_core::{Description, Metadata, Resolution, StaticResolver};

    use super::*;
    use crate::result::{Item, Outcome};

    fn described(texts: &[&str]) -> Rdp {
        let metadata = Metadata {
            descriptions: texts
                .iter()
                .map(|text| Description {
                    text: text.to_string(),
                    description_type: Some("Abstract".to_string()),
                    lang: Some("en".to_string()),
                })
                .collect(),
            ..Metadata::default()
        };
        Rdp::from_metadata("10.5281/zenodo.3490396", metadata)
    }

    #[test]
    fn rerun_appends_and_last_result_wins() {
        let check = Check::new(CheckKind::DescriptionsNumber);
        check.check(&described(&["one"]));
        check.check(&described(&["one", "two"]));

        assert_eq!(check.log_len(), 2);
        let entries = check.entries_for("10.5281/zenodo.3490396");
        assert_eq!(entries.len(), 2);
        assert!(entries[0].start <= entries[1].start);
        let last = check
            .last_result("10.5281/zenodo.3490396")
            .expect("check ran");
        assert_eq!(last.outcome(), &Outcome::Metric(2.0));
    }

    #[test]
    fn never_run_has_no_result() {
        let check = Check::new(CheckKind::TitlesType);
        assert!(check.last_result("10.123/unknown").is_none());
        assert!(check.entries_for("10.123/unknown").is_empty());
    }

    #[test]
    fn missing_metadata_is_unsuccessful() {
        let check = Check::new(CheckKind::DescriptionsLength);
        check.check(&Rdp::without_metadata("10.123/void"));
        let result = check.last_result("10.123/void").expect("check ran");
        assert!(!result.success());
        assert_eq!(result.message(), "metadata unavailable");
        assert_eq!(result.outcome(), &Outcome::List(Vec::new()));
    }

    #[test]
    fn recorded_results_are_served_like_run_ones() {
        let check = Check::new(CheckKind::DescriptionsLength);
        let now = Utc::now();
        check.record(
            now,
            now,
            "10.123/injected",
            CheckResult::list(vec![Item::from(69usize), Item::from(3usize)], ""),
        );
        let result = check.last_result("10.123/injected").expect("recorded");
        assert!(result.success());
        assert_eq!(
            result.outcome(),
            &Outcome::List(vec![Item::Number(69.0), Item::Number(3.0)])
        );
    }

    #[test]
    fn doi_resolution_goes_through_the_resolver() {
        let resolver = StaticResolver::new().answer(
            "https://doi.org/10.5281/zenodo.3490396",
            Resolution::new(302).with_header("Location", "https://zenodo.org/record/3490396"),
        );
        let check = Check::with_resolver(CheckKind::DoiResolves, Arc::new(resolver));
        check.check(&described(&[]));
        let result = check
            .last_result("10.5281/zenodo.3490396")
            .expect("check ran");
        assert!(result.success());
        assert_eq!(result.outcome(), &Outcome::Boolean(true));
        assert_eq!(
            result.message(),
            "Location of resolved doi: https://zenodo.org/record/3490396"
        );
    }

    #[test]
    fn every_kind_produces_its_declared_shape() {
        let resolver: Arc<dyn Resolver> = Arc::new(StaticResolver::new());
        let rdp = described(&["a short abstract"]);
        for kind in CheckKind::all() {
            let check = Check::with_resolver(*kind, Arc::clone(&resolver));
            check.check(&rdp);
            let result = check.last_result(rdp.pid()).expect("check ran");
            assert_eq!(result.shape(), kind.shape(), "{kind:?}");
        }
    }
}
