//! Benchmark following the DataCite best practice guide
//! (doi:10.5281/zenodo.3559800).

use std::sync::Arc;

use rdpbench_core::{Rdp, Resolver};

use crate::benchmark::Benchmark;
use crate::checks::{Check, CheckKind};
use crate::errors::Result;
use crate::evaluation::{Evaluation, ScoreFn, Strategy};
use crate::result::{Item, Outcome};

pub const BPG_NAME: &str = "BPGBenchmark";
pub const BPG_VERSION: &str = "0.0.1";

const CONTRIBUTOR_TYPES: &[&str] = &[
    "ContactPerson",
    "DataCollector",
    "DataCurator",
    "DataManager",
    "Distributor",
    "Editor",
    "HostingInstitution",
    "Producer",
    "ProjectLeader",
    "ProjectManager",
    "ProjectMember",
    "RegistrationAgency",
    "RegistrationAuthority",
    "RelatedPerson",
    "Researcher",
    "ResearchGroup",
    "RightsHolder",
    "Sponsor",
    "Supervisor",
    "WorkPackageLeader",
    "Other",
];

const RELATION_TYPES: &[&str] = &[
    "IsCitedBy",
    "Cites",
    "IsSupplementTo",
    "IsSupplementedBy",
    "IsContinuedBy",
    "Continues",
    "IsDescribedBy",
    "Describes",
    "HasMetadata",
    "IsMetadataFor",
    "HasVersion",
    "IsVersionOf",
    "IsNewVersionOf",
    "IsPreviousVersionOf",
    "IsPartOf",
    "HasPart",
    "IsPublishedIn",
    "IsReferencedBy",
    "References",
    "IsDocumentedBy",
    "Documents",
    "IsCompiledBy",
    "Compiles",
    "IsVariantFormOf",
    "IsOriginalFormOf",
    "IsIdenticalTo",
    "IsReviewedBy",
    "Reviews",
    "IsDerivedFrom",
    "IsSourceOf",
    "IsRequiredBy",
    "Requires",
    "IsObsoletedBy",
    "Obsoletes",
];

const LANGUAGE_CHECKS: &[CheckKind] = &[
    CheckKind::DescriptionsLanguage,
    CheckKind::TitlesLanguage,
    CheckKind::LanguageSpecified,
];

const VERSION_CHECKS: &[CheckKind] = &[CheckKind::VersionConformsToSemVer];

const CONTRIBUTOR_CHECKS: &[CheckKind] = &[
    CheckKind::ContributorsOrcid,
    CheckKind::ContributorsFamilyAndGivenName,
    CheckKind::ContributorsContainInstitutions,
    CheckKind::ContributorsType,
];

const RELATED_RESOURCE_CHECKS: &[CheckKind] = &[
    CheckKind::RelatedResourceType,
    CheckKind::RelatedResourceMetadata,
];

fn involves_any(evaluation: &Evaluation, kinds: &[CheckKind]) -> bool {
    kinds.iter().any(|kind| evaluation.involves(*kind))
}

/// Skip rules of the guide: optional properties that are absent, and
/// language for resources without language.
pub fn bpg_skip(evaluation: &Evaluation, rdp: &Rdp) -> bool {
    let Some(metadata) = rdp.metadata() else {
        return false;
    };
    let languageless = matches!(
        metadata.resource_type.as_deref(),
        Some("Image") | Some("PhysicalObject")
    );
    if languageless && involves_any(evaluation, LANGUAGE_CHECKS) {
        return true;
    }
    if metadata.version.is_none() && involves_any(evaluation, VERSION_CHECKS) {
        return true;
    }
    if metadata.contributors.is_empty() && involves_any(evaluation, CONTRIBUTOR_CHECKS) {
        return true;
    }
    if metadata.related_resources.is_empty() && involves_any(evaluation, RELATED_RESOURCE_CHECKS)
    {
        return true;
    }
    false
}

fn texts(values: &[&str]) -> Vec<Item> {
    values.iter().map(|value| Item::from(*value)).collect()
}

/// Publication year equals the year of the issued date.
fn publication_year_matches_issued() -> ScoreFn {
    ScoreFn::new(
        "publication_year_matches_issued",
        |checks: &[Arc<Check>], pid: &str| {
            let years: Vec<Option<f64>> = checks
                .iter()
                .map(|check| {
                    check
                        .last_result(pid)
                        .filter(|result| result.success())
                        .and_then(|result| match result.outcome() {
                            Outcome::Metric(year) => Some(*year),
                            _ => None,
                        })
                })
                .collect();
            match years.as_slice() {
                [Some(published), Some(issued)] if published == issued => 1.0,
                _ => 0.0,
            }
        },
    )
}

/// A fresh best-practice-guide benchmark; checks that touch the network use
/// `resolver`.
pub fn bpg_benchmark(resolver: Arc<dyn Resolver>) -> Result<Benchmark> {
    let check = |kind: CheckKind| -> Arc<Check> {
        if kind.needs_network() {
            Check::with_resolver(kind, Arc::clone(&resolver)).shared()
        } else {
            Check::new(kind).shared()
        }
    };

    let is_valid_doi = check(CheckKind::IsValidDoi);
    let doi_resolves = check(CheckKind::DoiResolves);
    let descriptions_number = check(CheckKind::DescriptionsNumber);
    let descriptions_length = check(CheckKind::DescriptionsLength);
    let descriptions_language = check(CheckKind::DescriptionsLanguage);
    let descriptions_type = check(CheckKind::DescriptionsType);
    let titles_number = check(CheckKind::TitlesNumber);
    let titles_length = check(CheckKind::TitlesLength);
    let titles_language = check(CheckKind::TitlesLanguage);
    let titles_file_name = check(CheckKind::TitlesJustAFileName);
    let titles_type = check(CheckKind::TitlesType);
    let formats = check(CheckKind::FormatsAreValidMediaType);
    let rights_spdx = check(CheckKind::RightsHaveValidSpdxIdentifier);
    let rights_license = check(CheckKind::RightsHasAtLeastOneLicense);
    let rights_open = check(CheckKind::RightsAreOpen);
    let subjects_qualified = check(CheckKind::SubjectsAreQualified);
    let subjects_number = check(CheckKind::SubjectsNumber);
    let subjects_ddc = check(CheckKind::SubjectsHaveDdc);
    let subjects_wikidata = check(CheckKind::SubjectsHaveWikidataKeywords);
    let creators_orcid = check(CheckKind::CreatorsOrcid);
    let creators_names = check(CheckKind::CreatorsFamilyAndGivenName);
    let creators_institutions = check(CheckKind::CreatorsContainInstitutions);
    let sizes_number = check(CheckKind::SizesNumber);
    let sizes_bytes = check(CheckKind::SizesByteSize);
    let version_semver = check(CheckKind::VersionConformsToSemVer);
    let language = check(CheckKind::LanguageSpecified);
    let contributors_orcid = check(CheckKind::ContributorsOrcid);
    let contributors_names = check(CheckKind::ContributorsFamilyAndGivenName);
    let contributors_institutions = check(CheckKind::ContributorsContainInstitutions);
    let contributors_type = check(CheckKind::ContributorsType);
    let publication_year = check(CheckKind::PublicationYear);
    let dates_type = check(CheckKind::DatesType);
    let dates_issued = check(CheckKind::DatesIssuedYear);
    let related_type = check(CheckKind::RelatedResourceType);
    let related_metadata = check(CheckKind::RelatedResourceMetadata);

    let evaluations = vec![
        (Evaluation::of(&is_valid_doi, Strategy::True)?, 1.0),
        (Evaluation::of(&doi_resolves, Strategy::True)?, 1.0),
        (
            Evaluation::of(&descriptions_number, Strategy::IsBetween { low: 1.0, high: 100.0 })?,
            1.0,
        ),
        (
            Evaluation::of(&descriptions_length, Strategy::IsBetween { low: 1.0, high: 300.0 })?,
            1.0,
        ),
        (
            Evaluation::of(&descriptions_language, Strategy::ContainsAll(texts(&["en"])))?,
            1.0,
        ),
        (
            Evaluation::of(&descriptions_language, Strategy::DoesNotContain(vec![Item::Null]))?,
            1.0,
        ),
        (
            Evaluation::of(
                &descriptions_type,
                Strategy::ContainsAtLeastOne(texts(&["Abstract"])),
            )?,
            1.0,
        ),
        (
            Evaluation::of(&titles_number, Strategy::IsBetween { low: 1.0, high: 10.0 })?,
            1.0,
        ),
        (
            Evaluation::of(&titles_length, Strategy::IsBetween { low: 2.0, high: 30.0 })?,
            1.0,
        ),
        (Evaluation::of(&titles_language, Strategy::ContainsAll(texts(&["en"])))?, 1.0),
        (Evaluation::of(&titles_file_name, Strategy::False)?, 1.0),
        (
            Evaluation::of(
                &titles_type,
                Strategy::ContainsItemExactlyNTimes {
                    item: Item::Null,
                    n: 1,
                },
            )?,
            1.0,
        ),
        (Evaluation::of(&formats, Strategy::TheMoreTrueTheBetter)?, 1.0),
        (Evaluation::of(&rights_spdx, Strategy::TheMoreTrueTheBetter)?, 1.0),
        (Evaluation::of(&rights_license, Strategy::True)?, 1.0),
        (Evaluation::of(&rights_open, Strategy::True)?, 1.0),
        (Evaluation::of(&subjects_qualified, Strategy::TheMoreTrueTheBetter)?, 1.0),
        (
            Evaluation::of(&subjects_number, Strategy::IsBetween { low: 1.0, high: 1000.0 })?,
            1.0,
        ),
        (Evaluation::of(&subjects_ddc, Strategy::True)?, 1.0),
        (Evaluation::of(&subjects_wikidata, Strategy::True)?, 1.0),
        (Evaluation::of(&creators_orcid, Strategy::TheMoreTrueTheBetter)?, 1.0),
        (Evaluation::of(&creators_names, Strategy::TheMoreTrueTheBetter)?, 1.0),
        (
            Evaluation::of(&creators_institutions, Strategy::TheMoreFalseTheBetter)?,
            1.0,
        ),
        (
            Evaluation::of(&sizes_number, Strategy::IsBetween { low: 1.0, high: 1000.0 })?,
            1.0,
        ),
        (Evaluation::of(&sizes_bytes, Strategy::TheMoreTrueTheBetter)?, 1.0),
        (Evaluation::of(&version_semver, Strategy::True)?, 1.0),
        (Evaluation::of(&language, Strategy::True)?, 1.0),
        (Evaluation::of(&contributors_orcid, Strategy::TheMoreTrueTheBetter)?, 1.0),
        (Evaluation::of(&contributors_names, Strategy::TheMoreTrueTheBetter)?, 1.0),
        (
            Evaluation::of(&contributors_institutions, Strategy::TheMoreFalseTheBetter)?,
            1.0,
        ),
        (
            Evaluation::of(&contributors_type, Strategy::InList(texts(CONTRIBUTOR_TYPES)))?,
            1.0,
        ),
        (
            Evaluation::new(
                vec![publication_year, dates_issued],
                Strategy::Function(publication_year_matches_issued()),
            )?,
            1.0,
        ),
        (
            Evaluation::of(
                &dates_type,
                Strategy::ContainsAtLeastOne(texts(&["Issued", "Created"])),
            )?,
            1.0,
        ),
        (
            Evaluation::of(&related_type, Strategy::InList(texts(RELATION_TYPES)))?,
            1.0,
        ),
        (Evaluation::of(&related_metadata, Strategy::TheMoreTrueTheBetter)?, 1.0),
    ];

    let mut benchmark = Benchmark::new(
        BPG_NAME,
        BPG_VERSION,
        "Assesses metadata against the DataCite best practice guide",
        bpg_skip,
    );
    for (evaluation, weight) in evaluations {
        benchmark.add_evaluation(evaluation, weight)?;
    }
    Ok(benchmark)
}
