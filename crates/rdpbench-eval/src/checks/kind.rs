use serde::Serialize;

use crate::result::Shape;

/// Whether a check's answer can change between runs on identical metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Determinism {
    Deterministic,
    Nondeterministic,
}

impl Determinism {
    pub fn as_str(self) -> &'static str {
        match self {
            Determinism::Deterministic => "deterministic",
            Determinism::Nondeterministic => "nondeterministic",
        }
    }
}

/// Tag of every concrete check in the catalog.
///
/// The tag fixes the check's identity, its result shape and whether it needs
/// the network. Skip predicates match on it instead of on type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CheckKind {
    IsValidDoi,
    DoiResolves,
    DescriptionsNumber,
    DescriptionsLength,
    DescriptionsLanguage,
    DescriptionsType,
    TitlesNumber,
    TitlesLength,
    TitlesLanguage,
    TitlesJustAFileName,
    TitlesType,
    FormatsAreValidMediaType,
    RightsHaveValidSpdxIdentifier,
    RightsHasAtLeastOneLicense,
    RightsAreOpen,
    SubjectsAreQualified,
    SubjectsNumber,
    SubjectsHaveDdc,
    SubjectsHaveWikidataKeywords,
    CreatorsOrcid,
    CreatorsFamilyAndGivenName,
    CreatorsContainInstitutions,
    SizesNumber,
    SizesByteSize,
    VersionSpecified,
    VersionConformsToSemVer,
    LanguageSpecified,
    ContributorsOrcid,
    ContributorsFamilyAndGivenName,
    ContributorsContainInstitutions,
    ContributorsType,
    PublicationYear,
    DatesType,
    DatesInformation,
    DatesIssuedYear,
    RelatedResourceType,
    RelatedResourceMetadata,
    CapacitiesSupported,
}

use CheckKind::*;

/// Catalog in id order. Ids 11 and 37 were free in the original catalog;
/// the semver check took 11.
const ALL: [CheckKind; 38] = [
    IsValidDoi,
    DoiResolves,
    DescriptionsNumber,
    DescriptionsLength,
    DescriptionsLanguage,
    DescriptionsType,
    TitlesNumber,
    TitlesLength,
    TitlesLanguage,
    TitlesJustAFileName,
    TitlesType,
    VersionConformsToSemVer,
    FormatsAreValidMediaType,
    RightsHaveValidSpdxIdentifier,
    RightsHasAtLeastOneLicense,
    SubjectsAreQualified,
    SubjectsNumber,
    SubjectsHaveDdc,
    SubjectsHaveWikidataKeywords,
    CreatorsOrcid,
    CreatorsFamilyAndGivenName,
    CreatorsContainInstitutions,
    SizesNumber,
    SizesByteSize,
    VersionSpecified,
    LanguageSpecified,
    ContributorsOrcid,
    ContributorsFamilyAndGivenName,
    ContributorsContainInstitutions,
    ContributorsType,
    RightsAreOpen,
    PublicationYear,
    DatesType,
    DatesIssuedYear,
    DatesInformation,
    RelatedResourceType,
    RelatedResourceMetadata,
    CapacitiesSupported,
];

impl CheckKind {
    /// Every kind, ordered by id.
    pub fn all() -> &'static [CheckKind] {
        &ALL
    }

    /// Stable catalog id; reports and evaluation keys carry it.
    pub fn id(self) -> u32 {
        match self {
            IsValidDoi => 0,
            DoiResolves => 1,
            DescriptionsNumber => 2,
            DescriptionsLength => 3,
            DescriptionsLanguage => 4,
            DescriptionsType => 5,
            TitlesNumber => 6,
            TitlesLength => 7,
            TitlesLanguage => 8,
            TitlesJustAFileName => 9,
            TitlesType => 10,
            VersionConformsToSemVer => 11,
            FormatsAreValidMediaType => 12,
            RightsHaveValidSpdxIdentifier => 13,
            RightsHasAtLeastOneLicense => 14,
            SubjectsAreQualified => 15,
            SubjectsNumber => 16,
            SubjectsHaveDdc => 17,
            SubjectsHaveWikidataKeywords => 18,
            CreatorsOrcid => 19,
            CreatorsFamilyAndGivenName => 20,
            CreatorsContainInstitutions => 21,
            SizesNumber => 22,
            SizesByteSize => 23,
            VersionSpecified => 24,
            LanguageSpecified => 25,
            ContributorsOrcid => 26,
            ContributorsFamilyAndGivenName => 27,
            ContributorsContainInstitutions => 28,
            ContributorsType => 29,
            RightsAreOpen => 30,
            PublicationYear => 31,
            DatesType => 32,
            DatesIssuedYear => 33,
            DatesInformation => 34,
            RelatedResourceType => 35,
            RelatedResourceMetadata => 36,
            CapacitiesSupported => 38,
        }
    }

    pub fn version(self) -> &'static str {
        "0.0.1"
    }

    /// Report name of the check (`DoiResolvesCheck`, ...).
    pub fn name(self) -> String {
        format!("{self:?}Check")
    }

    pub fn determinism(self) -> Determinism {
        match self {
            DoiResolves | RightsHasAtLeastOneLicense => Determinism::Nondeterministic,
            _ => Determinism::Deterministic,
        }
    }

    /// Whether the check resolves URIs through a [`Resolver`](rdpbench_core::Resolver).
    pub fn needs_network(self) -> bool {
        self.determinism() == Determinism::Nondeterministic
    }

    pub fn shape(self) -> Shape {
        match self {
            IsValidDoi
            | DoiResolves
            | RightsHasAtLeastOneLicense
            | RightsAreOpen
            | SubjectsHaveDdc
            | SubjectsHaveWikidataKeywords
            | VersionSpecified
            | VersionConformsToSemVer
            | LanguageSpecified => Shape::Boolean,
            DescriptionsNumber | TitlesNumber | SubjectsNumber | SizesNumber
            | PublicationYear | DatesIssuedYear => Shape::Metric,
            _ => Shape::List,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            IsValidDoi => "checks whether the pid of the RDP is a syntactically valid DOI",
            DoiResolves => "checks whether the DOI of the RDP resolves at doi.org",
            DescriptionsNumber => "checks how many descriptions are part of the metadata",
            DescriptionsLength => "checks the word count of every description",
            DescriptionsLanguage => "checks the language of every description",
            DescriptionsType => "checks the type of every description",
            TitlesNumber => "checks how many titles are part of the metadata",
            TitlesLength => "checks the word count of every title",
            TitlesLanguage => "checks the language of every title",
            TitlesJustAFileName => "checks for every title whether it is just a file name",
            TitlesType => "checks the type of every title",
            FormatsAreValidMediaType => "checks for every format whether it is a valid media type",
            RightsHaveValidSpdxIdentifier => {
                "checks for every rights statement whether it carries a known SPDX identifier"
            }
            RightsHasAtLeastOneLicense => {
                "checks whether at least one rights URI resolves to a license document"
            }
            RightsAreOpen => "checks whether the rights grant open access",
            SubjectsAreQualified => {
                "checks for every subject whether it names its scheme and scheme URI"
            }
            SubjectsNumber => "checks how many subjects are part of the metadata",
            SubjectsHaveDdc => "checks whether a Dewey Decimal Classification subject is given",
            SubjectsHaveWikidataKeywords => "checks whether a subject links to a Wikidata entity",
            CreatorsOrcid => "checks for every creator whether a valid ORCID is given",
            CreatorsFamilyAndGivenName => {
                "checks for every personal creator whether family and given name are given"
            }
            CreatorsContainInstitutions => {
                "checks for every creator whether it looks like an institution"
            }
            SizesNumber => "checks how many size statements are part of the metadata",
            SizesByteSize => "checks for every size statement whether it states a byte size",
            VersionSpecified => "checks whether a version is given",
            VersionConformsToSemVer => "checks whether the version follows semantic versioning",
            LanguageSpecified => "checks whether the language of the resource is given",
            ContributorsOrcid => "checks for every contributor whether a valid ORCID is given",
            ContributorsFamilyAndGivenName => {
                "checks for every personal contributor whether family and given name are given"
            }
            ContributorsContainInstitutions => {
                "checks for every contributor whether it looks like an institution"
            }
            ContributorsType => "checks the role of every contributor",
            PublicationYear => "checks the publication year",
            DatesType => "checks the type of every date",
            DatesInformation => "checks the free-text information of every date",
            DatesIssuedYear => "checks the year of the date typed as issued",
            RelatedResourceType => "checks the relation type of every related resource",
            RelatedResourceMetadata => {
                "checks for every related resource whether its metadata scheme is given"
            }
            CapacitiesSupported => "checks the capacities offered by the services of the RDP",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_sorted_by_unique_id() {
        let ids: Vec<u32> = CheckKind::all().iter().map(|kind| kind.id()).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]), "{ids:?}");
        assert_eq!(ids.len(), 38);
    }

    #[test]
    fn ids_match_the_published_catalog() {
        for (kind, id) in [
            (IsValidDoi, 0),
            (DoiResolves, 1),
            (TitlesType, 10),
            (FormatsAreValidMediaType, 12),
            (RightsHasAtLeastOneLicense, 14),
            (VersionSpecified, 24),
            (LanguageSpecified, 25),
            (ContributorsType, 29),
            (RightsAreOpen, 30),
            (DatesIssuedYear, 33),
            (DatesInformation, 34),
            (RelatedResourceMetadata, 36),
            (CapacitiesSupported, 38),
        ] {
            assert_eq!(kind.id(), id, "{}", kind.name());
        }
    }

    #[test]
    fn network_checks_are_nondeterministic() {
        let networked: Vec<CheckKind> = CheckKind::all()
            .iter()
            .copied()
            .filter(|kind| kind.needs_network())
            .collect();
        assert_eq!(networked, vec![DoiResolves, RightsHasAtLeastOneLicense]);
        assert_eq!(DoiResolves.name(), "DoiResolvesCheck");
        assert_eq!(IsValidDoi.determinism().as_str(), "deterministic");
    }
}
