use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Metadata record describing a research data product.
///
/// The fields follow the DataCite kernel. Collections default to empty and
/// scalars to `None`, so a sparse record still deserializes; checks decide
/// what an absent field means.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Metadata {
    /// Identifier asserted by the record itself (may differ from the RDP pid).
    pub pid: Option<String>,
    pub descriptions: Vec<Description>,
    pub titles: Vec<Title>,
    /// Media types of the payload (e.g. `text/csv`).
    pub formats: Vec<String>,
    pub rights: Vec<Rights>,
    pub subjects: Vec<Subject>,
    pub creators: Vec<Person>,
    pub contributors: Vec<Person>,
    /// Free-text size statements (e.g. `1.2 MB`).
    pub sizes: Vec<String>,
    /// Primary language of the resource (ISO 639-1).
    pub language: Option<String>,
    pub version: Option<String>,
    pub publication_year: Option<i32>,
    pub dates: Vec<DateEntry>,
    pub related_resources: Vec<RelatedResource>,
    /// General resource type (e.g. `Dataset`, `Image`).
    pub resource_type: Option<String>,
}

/// A description of the resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Description {
    pub text: String,
    /// Description type (`Abstract`, `Methods`, ...), if tagged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_type: Option<String>,
    /// Declared language tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// A title of the resource. Untyped titles are main titles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Title {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// Rights or license statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rights {
    pub text: String,
    /// URI pointing to the license text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// SPDX license identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spdx: Option<String>,
}

/// Subject, keyword or classification code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Subject {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_uri: Option<String>,
}

/// Kind of agent named as creator or contributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum NameType {
    Personal,
    Organizational,
}

/// Creator or contributor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Person {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_type: Option<NameType>,
    /// Contributor role (`ContactPerson`, `Editor`, ...); unused for creators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name_identifiers: Vec<NameIdentifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affiliations: Vec<String>,
}

impl Person {
    /// Identifiers declared under the given scheme (case-insensitive).
    pub fn identifiers_in(&self, scheme: &str) -> impl Iterator<Item = &str> {
        self.name_identifiers
            .iter()
            .filter(move |id| {
                id.scheme
                    .as_deref()
                    .is_some_and(|value| value.eq_ignore_ascii_case(scheme))
            })
            .map(|id| id.value.as_str())
    }
}

/// Identifier of a person or organisation (ORCID, ROR, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NameIdentifier {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

/// A dated event in the life cycle of the resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DateEntry {
    /// Date or date range as written in the record (`2019-10-17`, `2019`).
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
}

impl DateEntry {
    /// Leading four-digit year of the date value.
    pub fn year(&self) -> Option<i32> {
        let digits: String = self.value.trim().chars().take(4).collect();
        if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
            digits.parse().ok()
        } else {
            None
        }
    }
}

/// Link to a related resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RelatedResource {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_type: Option<String>,
    /// Relation (`IsSourceOf`, `IsVersionOf`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_type: Option<String>,
    /// Metadata scheme of the related resource, when declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_metadata_scheme: Option<String>,
}
