use rdpbench_core::{Metadata, NameType, Person};

use crate::result::{CheckResult, Item, Shape};

const INSTITUTION_MARKERS: &[&str] = &[
    "university",
    "universität",
    "universitat",
    "université",
    "institute",
    "institut",
    "centre",
    "center",
    "zentrum",
    "laboratory",
    "library",
    "museum",
    "foundation",
    "society",
    "consortium",
    "agency",
    "ministry",
    "department",
    "gmbh",
    "e.v.",
];

/// ORCID iD check: `dddd-dddd-dddd-dddX` with an ISO 7064 MOD 11-2 check
/// character. The `https://orcid.org/` prefix is accepted.
pub fn is_valid_orcid(value: &str) -> bool {
    let id = value
        .trim()
        .trim_start_matches("https://orcid.org/")
        .trim_start_matches("http://orcid.org/");
    let groups: Vec<&str> = id.split('-').collect();
    if !id.is_ascii() || groups.len() != 4 || groups.iter().any(|group| group.len() != 4) {
        return false;
    }
    let chars: Vec<char> = groups.concat().chars().collect();
    let (body, check) = chars.split_at(15);
    if !body.iter().all(char::is_ascii_digit) {
        return false;
    }
    let total = body
        .iter()
        .filter_map(|c| c.to_digit(10))
        .fold(0, |total, digit| (total + digit) * 2);
    let expected = match (12 - total % 11) % 11 {
        10 => 'X',
        digit => char::from_digit(digit, 10).unwrap_or('?'),
    };
    check.first() == Some(&expected)
}

fn is_personal(person: &Person) -> bool {
    person.name_type != Some(NameType::Organizational)
}

fn looks_like_institution(person: &Person) -> bool {
    if person.name_type == Some(NameType::Organizational) {
        return true;
    }
    let name = person.name.to_lowercase();
    INSTITUTION_MARKERS.iter().any(|marker| name.contains(marker))
}

fn per_agent(people: &[Person], role: &str, measure: impl Fn(&Person) -> Item) -> CheckResult {
    if people.is_empty() {
        return CheckResult::undetermined(Shape::List, format!("no {role} given"));
    }
    CheckResult::list(people.iter().map(measure).collect(), "")
}

pub(crate) fn orcids(people: &[Person], role: &str) -> CheckResult {
    per_agent(people, role, |person| {
        Item::from(person.identifiers_in("ORCID").any(is_valid_orcid))
    })
}

/// Organisations carry no family or given name and are left out.
pub(crate) fn family_and_given_names(people: &[Person], role: &str) -> CheckResult {
    if people.is_empty() {
        return CheckResult::undetermined(Shape::List, format!("no {role} given"));
    }
    let personal: Vec<Item> = people
        .iter()
        .filter(|person| is_personal(person))
        .map(|person| {
            let given = person.given_name.as_deref().is_some_and(|n| !n.trim().is_empty());
            let family = person.family_name.as_deref().is_some_and(|n| !n.trim().is_empty());
            Item::from(given && family)
        })
        .collect();
    let message = if personal.is_empty() {
        format!("all {role} are organisations")
    } else {
        String::new()
    };
    CheckResult::list(personal, message)
}

pub(crate) fn institutions(people: &[Person], role: &str) -> CheckResult {
    per_agent(people, role, |person| Item::from(looks_like_institution(person)))
}

pub(crate) fn contributor_types(md: &Metadata) -> CheckResult {
    per_agent(&md.contributors, "contributors", |person| {
        Item::from(person.contributor_type.as_deref())
    })
}

#[cfg(test)]
mod tests {
    use rdpbench_core::NameIdentifier;

    use super::*;
    use crate::result::Outcome;

    fn person(name: &str, orcid: Option<&str>, name_type: Option<NameType>) -> Person {
        Person {
            name: name.to_string(),
            given_name: None,
            family_name: None,
            name_type,
            contributor_type: None,
            name_identifiers: orcid
                .map(|value| NameIdentifier {
                    value: value.to_string(),
                    scheme: Some("ORCID".to_string()),
                })
                .into_iter()
                .collect(),
            affiliations: Vec::new(),
        }
    }

    #[test]
    fn orcid_checksum() {
        assert!(is_valid_orcid("0000-0003-1815-7041"));
        assert!(is_valid_orcid("https://orcid.org/0000-0003-1815-7041"));
        assert!(is_valid_orcid("0000-0002-1694-233X"));
        assert!(!is_valid_orcid("0000-0003-1815-7042"));
        assert!(!is_valid_orcid("0000-0003-1815"));
        assert!(!is_valid_orcid("000a-0003-1815-7041"));
    }

    #[test]
    fn orcids_per_person() {
        let people = vec![
            person("Weber, Tobias", Some("0000-0003-1815-7041"), Some(NameType::Personal)),
            person("Doe, Jane", None, None),
        ];
        assert_eq!(
            orcids(&people, "creators").outcome(),
            &Outcome::List(vec![Item::Bool(true), Item::Bool(false)])
        );
    }

    #[test]
    fn institutions_by_type_or_name() {
        let people = vec![
            person("Leibniz Rechenzentrum", None, Some(NameType::Organizational)),
            person("Leipzig University", None, None),
            person("Weber, Tobias", None, None),
        ];
        assert_eq!(
            institutions(&people, "creators").outcome(),
            &Outcome::List(vec![Item::Bool(true), Item::Bool(true), Item::Bool(false)])
        );
        let names = family_and_given_names(&people, "creators");
        assert_eq!(
            names.outcome(),
            &Outcome::List(vec![Item::Bool(false), Item::Bool(false)])
        );
    }

    #[test]
    fn no_people_cannot_be_assessed() {
        let result = orcids(&[], "contributors");
        assert!(!result.success());
        assert_eq!(result.message(), "no contributors given");
    }
}
