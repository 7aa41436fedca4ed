use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::checks::{Check, CheckKind};
use crate::errors::{EvalError, Result};
use crate::result::{CheckResult, Item, Outcome, format_items};

/// Decimal digits scores are rounded to.
pub const DEFAULT_ROUNDED: u32 = 10;

const VERSION: &str = "0.0.1";

type ScoreCallback = dyn Fn(&[Arc<Check>], &str) -> f64 + Send + Sync;

/// Named scoring callback for [`Strategy::Function`].
#[derive(Clone)]
pub struct ScoreFn {
    name: String,
    callback: Arc<ScoreCallback>,
}

impl ScoreFn {
    pub fn new(
        name: impl Into<String>,
        callback: impl Fn(&[Arc<Check>], &str) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            callback: Arc::new(callback),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, checks: &[Arc<Check>], pid: &str) -> f64 {
        (self.callback)(checks, pid)
    }
}

impl fmt::Debug for ScoreFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreFn").field("name", &self.name).finish()
    }
}

/// The closed scoring vocabulary.
///
/// Every strategy except `Function` scores each check on its own and the
/// evaluation averages over the checks. A result of the wrong shape scores 0.
#[derive(Debug, Clone)]
pub enum Strategy {
    IsBetween { low: f64, high: f64 },
    IsIdenticalTo(Outcome),
    ContainsAll(Vec<Item>),
    ContainsAtLeastOne(Vec<Item>),
    DoesNotContain(Vec<Item>),
    True,
    False,
    TheMoreTrueTheBetter,
    TheMoreFalseTheBetter,
    ContainsItemExactlyNTimes { item: Item, n: usize },
    InList(Vec<Item>),
    /// The callback sees all checks and its output is the score.
    Function(ScoreFn),
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::IsBetween { .. } => "IsBetween",
            Strategy::IsIdenticalTo(_) => "IsIdenticalTo",
            Strategy::ContainsAll(_) => "ContainsAll",
            Strategy::ContainsAtLeastOne(_) => "ContainsAtLeastOne",
            Strategy::DoesNotContain(_) => "DoesNotContain",
            Strategy::True => "True",
            Strategy::False => "False",
            Strategy::TheMoreTrueTheBetter => "TheMoreTrueTheBetter",
            Strategy::TheMoreFalseTheBetter => "TheMoreFalseTheBetter",
            Strategy::ContainsItemExactlyNTimes { .. } => "ContainsItemExactlyNTimes",
            Strategy::InList(_) => "InList",
            Strategy::Function(_) => "Function",
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        match self {
            Strategy::IsBetween { low, high } => {
                if !low.is_finite() || !high.is_finite() {
                    return Err(format!("bounds must be finite, got [{low}, {high}]"));
                }
                if low > high {
                    return Err(format!("lower bound {low} exceeds upper bound {high}"));
                }
                Ok(())
            }
            Strategy::ContainsAll(items)
            | Strategy::ContainsAtLeastOne(items)
            | Strategy::DoesNotContain(items)
            | Strategy::InList(items) => {
                if items.is_empty() {
                    Err(format!("{} needs at least one item", self.name()))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    fn describe(&self) -> String {
        match self {
            Strategy::IsBetween { low, high } => format!(
                "Each check's result's item between the (included) bounds adds \
                 (1/#items)*1/#checks to the score. \
                 The lower bound is {low} the upper bound is {high}."
            ),
            Strategy::IsIdenticalTo(comparatum) => format!(
                "Each check's result identical to the comparatum adds 1/#checks to the score; \
                 list order is not compared. The comparatum is {comparatum}."
            ),
            Strategy::ContainsAll(items) => format!(
                "Each check's result containing all items adds 1/#checks to the score. \
                 The items are {}.",
                format_items(items)
            ),
            Strategy::ContainsAtLeastOne(items) => format!(
                "Each check's result containing at least one of the items adds 1/#checks \
                 to the score. The items are {}.",
                format_items(items)
            ),
            Strategy::DoesNotContain(items) => format!(
                "Each non-empty check's result containing none of the items adds 1/#checks \
                 to the score. The items are {}.",
                format_items(items)
            ),
            Strategy::True => {
                "Each check's result with only true values adds 1/#checks to the score.".to_string()
            }
            Strategy::False => {
                "Each check's result with only false values adds 1/#checks to the score."
                    .to_string()
            }
            Strategy::TheMoreTrueTheBetter => {
                "Each check's result adds (#true/#items)*1/#checks to the score.".to_string()
            }
            Strategy::TheMoreFalseTheBetter => {
                "Each check's result adds (#false/#items)*1/#checks to the score.".to_string()
            }
            Strategy::ContainsItemExactlyNTimes { item, n } => format!(
                "Each check's result in which {item} occurs exactly {n} times adds 1/#checks \
                 to the score."
            ),
            Strategy::InList(items) => format!(
                "Each check's result's item in the candidates adds (1/#items)*1/#checks to \
                 the score. The candidates are {}.",
                format_items(items)
            ),
            Strategy::Function(callback) => format!(
                "The function '{}' determines the score from the results of all checks.",
                callback.name()
            ),
        }
    }

    /// Score of one successful result, in `[0, 1]`.
    fn contribution(&self, outcome: &Outcome) -> f64 {
        match (self, outcome) {
            (Strategy::IsBetween { low, high }, Outcome::Metric(value)) => {
                indicator(low <= value && value <= high)
            }
            (Strategy::IsBetween { low, high }, Outcome::List(items)) => {
                fraction(items, |item| {
                    item.as_f64()
                        .is_some_and(|value| *low <= value && value <= *high)
                })
            }
            (Strategy::IsIdenticalTo(Outcome::List(expected)), Outcome::List(items)) => {
                indicator(same_multiset(expected, items))
            }
            (Strategy::IsIdenticalTo(expected), outcome) => indicator(expected == outcome),
            (Strategy::ContainsAll(wanted), Outcome::List(items)) if !items.is_empty() => {
                indicator(wanted.iter().all(|item| items.contains(item)))
            }
            (Strategy::ContainsAtLeastOne(wanted), Outcome::List(items)) => {
                indicator(wanted.iter().any(|item| items.contains(item)))
            }
            (Strategy::DoesNotContain(unwanted), Outcome::List(items)) if !items.is_empty() => {
                indicator(!unwanted.iter().any(|item| items.contains(item)))
            }
            (Strategy::True, Outcome::Boolean(value)) => indicator(*value),
            (Strategy::False, Outcome::Boolean(value)) => indicator(!*value),
            (Strategy::True, Outcome::List(items)) if !items.is_empty() => {
                indicator(items.iter().all(|item| item.as_bool() == Some(true)))
            }
            (Strategy::False, Outcome::List(items)) if !items.is_empty() => {
                indicator(items.iter().all(|item| item.as_bool() == Some(false)))
            }
            (Strategy::TheMoreTrueTheBetter, Outcome::List(items)) => {
                fraction(items, |item| item.as_bool() == Some(true))
            }
            (Strategy::TheMoreFalseTheBetter, Outcome::List(items)) => {
                fraction(items, |item| item.as_bool() == Some(false))
            }
            (Strategy::ContainsItemExactlyNTimes { item, n }, Outcome::List(items))
                if !items.is_empty() =>
            {
                indicator(items.iter().filter(|candidate| *candidate == item).count() == *n)
            }
            (Strategy::InList(candidates), Outcome::List(items)) => {
                fraction(items, |item| candidates.contains(item))
            }
            _ => 0.0,
        }
    }
}

fn indicator(hit: bool) -> f64 {
    if hit { 1.0 } else { 0.0 }
}

/// Share of items matching `predicate`; an empty list scores 0.
fn fraction(items: &[Item], predicate: impl Fn(&Item) -> bool) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    items.iter().filter(|item| predicate(item)).count() as f64 / items.len() as f64
}

/// Order-insensitive list equality that respects multiplicity.
fn same_multiset(left: &[Item], right: &[Item]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut remaining: Vec<&Item> = right.iter().collect();
    left.iter().all(|item| {
        match remaining.iter().position(|candidate| *candidate == item) {
            Some(idx) => {
                remaining.swap_remove(idx);
                true
            }
            None => false,
        }
    })
}

pub(crate) fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Combines the latest results of one or more checks into a score in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct Evaluation {
    id: Uuid,
    checks: Vec<Arc<Check>>,
    strategy: Strategy,
    rounded: u32,
}

impl Evaluation {
    pub fn new(checks: Vec<Arc<Check>>, strategy: Strategy) -> Result<Self> {
        if checks.is_empty() {
            return Err(EvalError::InvalidEvaluation(format!(
                "no checks in {}Evaluation",
                strategy.name()
            )));
        }
        strategy.validate().map_err(EvalError::InvalidEvaluation)?;
        Ok(Self {
            id: Uuid::new_v4(),
            checks,
            strategy,
            rounded: DEFAULT_ROUNDED,
        })
    }

    /// Single-check shorthand.
    pub fn of(check: &Arc<Check>, strategy: Strategy) -> Result<Self> {
        Self::new(vec![Arc::clone(check)], strategy)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> String {
        match &self.strategy {
            Strategy::Function(callback) => format!("FunctionEvaluation-{}", callback.name()),
            strategy => format!("{}Evaluation", strategy.name()),
        }
    }

    pub fn version(&self) -> &'static str {
        VERSION
    }

    pub fn description(&self) -> String {
        self.strategy.describe()
    }

    pub fn rounded(&self) -> u32 {
        self.rounded
    }

    pub fn checks(&self) -> &[Arc<Check>] {
        &self.checks
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Registration key: evaluation name plus the ids of its checks.
    pub fn key(&self) -> String {
        let ids: Vec<String> = self.checks.iter().map(|c| c.id().to_string()).collect();
        format!("{}[{}]", self.name(), ids.join(","))
    }

    pub fn involves(&self, kind: CheckKind) -> bool {
        self.checks.iter().any(|check| check.kind() == kind)
    }

    /// Score for `pid` from the checks' latest results.
    ///
    /// Fails with [`EvalError::ChecksNotRun`] if any check has no result for
    /// `pid`. Unsuccessful results contribute 0 without failing the rest.
    pub fn evaluate(&self, pid: &str) -> Result<f64> {
        let results = self.latest_results(pid)?;
        let raw = match &self.strategy {
            Strategy::Function(callback) => {
                bounded(callback.name(), pid, callback.call(&self.checks, pid))
            }
            strategy => {
                let total: f64 = results
                    .iter()
                    .filter(|result| result.success())
                    .map(|result| strategy.contribution(result.outcome()))
                    .sum();
                total / results.len() as f64
            }
        };
        let score = round_to(raw, self.rounded);
        tracing::debug!(
            event = "evaluation_scored",
            evaluation = %self.name(),
            pid = %pid,
            score
        );
        Ok(score)
    }

    fn latest_results(&self, pid: &str) -> Result<Vec<CheckResult>> {
        self.checks
            .iter()
            .map(|check| {
                check.last_result(pid).ok_or_else(|| EvalError::ChecksNotRun {
                    check: check.name(),
                    pid: pid.to_string(),
                })
            })
            .collect()
    }
}

/// Pulls a callback's score into `[0, 1]`, logging when it had to.
fn bounded(callback: &str, pid: &str, value: f64) -> f64 {
    let score = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    if score != value {
        tracing::warn!(
            event = "score_out_of_range",
            callback = %callback,
            pid = %pid,
            value,
            score
        );
    }
    score
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    const PID: &str = "10.5281/zenodo.3490396";

    fn recorded(kind: CheckKind, result: CheckResult) -> Arc<Check> {
        let check = Check::new(kind).shared();
        let now = Utc::now();
        check.record(now, now, PID, result);
        check
    }

    fn items(values: &[&str]) -> Vec<Item> {
        values.iter().map(|value| Item::from(*value)).collect()
    }

    fn bools(values: &[bool]) -> Vec<Item> {
        values.iter().map(|value| Item::from(*value)).collect()
    }

    fn score(check: &Arc<Check>, strategy: Strategy) -> f64 {
        Evaluation::of(check, strategy)
            .expect("valid evaluation")
            .evaluate(PID)
            .expect("checks ran")
    }

    #[test]
    fn is_between_on_metric_and_list() {
        let between = || Strategy::IsBetween { low: 1.0, high: 100.0 };
        let two = recorded(CheckKind::DescriptionsNumber, CheckResult::metric(2.0, ""));
        let zero = recorded(CheckKind::DescriptionsNumber, CheckResult::metric(0.0, ""));
        assert_eq!(score(&two, between()), 1.0);
        assert_eq!(score(&zero, between()), 0.0);

        let lengths = recorded(
            CheckKind::DescriptionsLength,
            CheckResult::list(vec![Item::from(69usize), Item::from(300usize)], ""),
        );
        assert_eq!(score(&lengths, between()), 0.5);

        let texts = recorded(
            CheckKind::DescriptionsLanguage,
            CheckResult::list(items(&["en"]), ""),
        );
        assert_eq!(score(&texts, between()), 0.0);
    }

    #[test]
    fn is_identical_to_ignores_list_order() {
        let lengths = recorded(
            CheckKind::DescriptionsLength,
            CheckResult::list(vec![Item::from(3usize), Item::from(69usize)], ""),
        );
        let expected = Outcome::List(vec![Item::from(69usize), Item::from(3usize)]);
        assert_eq!(score(&lengths, Strategy::IsIdenticalTo(expected)), 1.0);

        let doubled = Outcome::List(vec![Item::from(69usize), Item::from(69usize)]);
        assert_eq!(score(&lengths, Strategy::IsIdenticalTo(doubled)), 0.0);

        let flag = recorded(CheckKind::IsValidDoi, CheckResult::boolean(true, ""));
        assert_eq!(score(&flag, Strategy::IsIdenticalTo(Outcome::Boolean(true))), 1.0);
    }

    #[test]
    fn contains_all_needs_every_item() {
        let both = recorded(CheckKind::TitlesLanguage, CheckResult::list(items(&["en", "de"]), ""));
        let german = recorded(CheckKind::TitlesLanguage, CheckResult::list(items(&["de"]), ""));
        assert_eq!(score(&both, Strategy::ContainsAll(items(&["en"]))), 1.0);
        assert_eq!(score(&german, Strategy::ContainsAll(items(&["en"]))), 0.0);
    }

    #[test]
    fn contains_at_least_one_counts_once() {
        let types = recorded(
            CheckKind::DatesType,
            CheckResult::list(items(&["Issued", "Created"]), ""),
        );
        let strategy = Strategy::ContainsAtLeastOne(items(&["Issued", "Created"]));
        assert_eq!(score(&types, strategy), 1.0);
    }

    #[test]
    fn does_not_contain_rejects_empty_lists() {
        let empty = recorded(CheckKind::DescriptionsLanguage, CheckResult::list(Vec::new(), ""));
        let tagged = recorded(
            CheckKind::DescriptionsLanguage,
            CheckResult::list(items(&["en"]), ""),
        );
        let untagged = recorded(
            CheckKind::DescriptionsLanguage,
            CheckResult::list(vec![Item::from("en"), Item::Null], ""),
        );
        let strategy = || Strategy::DoesNotContain(vec![Item::Null]);
        assert_eq!(score(&empty, strategy()), 0.0);
        assert_eq!(score(&tagged, strategy()), 1.0);
        assert_eq!(score(&untagged, strategy()), 0.0);
    }

    #[test]
    fn true_and_false() {
        let yes = recorded(CheckKind::IsValidDoi, CheckResult::boolean(true, ""));
        let mixed = recorded(
            CheckKind::CreatorsOrcid,
            CheckResult::list(bools(&[true, false]), ""),
        );
        let none = recorded(CheckKind::CreatorsOrcid, CheckResult::list(Vec::new(), ""));
        let file_names =
            recorded(CheckKind::TitlesJustAFileName, CheckResult::list(bools(&[false]), ""));
        assert_eq!(score(&yes, Strategy::True), 1.0);
        assert_eq!(score(&yes, Strategy::False), 0.0);
        assert_eq!(score(&mixed, Strategy::True), 0.0);
        assert_eq!(score(&none, Strategy::True), 0.0);
        assert_eq!(score(&file_names, Strategy::False), 1.0);
    }

    #[test]
    fn the_more_true_the_better() {
        let check = recorded(
            CheckKind::CreatorsOrcid,
            CheckResult::list(bools(&[true, true, false, false]), ""),
        );
        assert_eq!(score(&check, Strategy::TheMoreTrueTheBetter), 0.5);
        let check = recorded(
            CheckKind::CreatorsContainInstitutions,
            CheckResult::list(bools(&[true, false, false, false]), ""),
        );
        assert_eq!(score(&check, Strategy::TheMoreFalseTheBetter), 0.75);
        let empty = recorded(CheckKind::CreatorsOrcid, CheckResult::list(Vec::new(), ""));
        assert_eq!(score(&empty, Strategy::TheMoreTrueTheBetter), 0.0);
    }

    #[test]
    fn exactly_n_times_and_in_list() {
        let types = recorded(
            CheckKind::TitlesType,
            CheckResult::list(vec![Item::Null, Item::from("Subtitle")], ""),
        );
        let once = Strategy::ContainsItemExactlyNTimes { item: Item::Null, n: 1 };
        let twice = Strategy::ContainsItemExactlyNTimes { item: Item::Null, n: 2 };
        assert_eq!(score(&types, once), 1.0);
        assert_eq!(score(&types, twice), 0.0);

        let roles = recorded(
            CheckKind::ContributorsType,
            CheckResult::list(items(&["Editor", "Astronaut", "ContactPerson"]), ""),
        );
        let strategy = Strategy::InList(items(&["ContactPerson", "Editor"]));
        let expected = round_to(2.0 / 3.0, DEFAULT_ROUNDED);
        assert_eq!(score(&roles, strategy), expected);
    }

    #[test]
    fn function_controls_the_score() {
        let year = recorded(CheckKind::PublicationYear, CheckResult::metric(2019.0, ""));
        let issued = recorded(CheckKind::DatesIssuedYear, CheckResult::metric(2019.0, ""));
        let same_year = ScoreFn::new("same_year", |checks: &[Arc<Check>], pid: &str| {
            let years: Vec<Option<CheckResult>> =
                checks.iter().map(|check| check.last_result(pid)).collect();
            if years[0] == years[1] { 1.0 } else { 0.0 }
        });
        let evaluation = Evaluation::new(vec![year, issued], Strategy::Function(same_year))
            .expect("valid evaluation");
        assert_eq!(evaluation.name(), "FunctionEvaluation-same_year");
        assert_eq!(evaluation.evaluate(PID).expect("checks ran"), 1.0);
    }

    #[test]
    fn function_scores_outside_the_unit_interval_are_bounded() {
        for (raw, expected) in [(1.7, 1.0), (-0.2, 0.0), (f64::NAN, 0.0)] {
            let year = recorded(CheckKind::PublicationYear, CheckResult::metric(2019.0, ""));
            let wild = ScoreFn::new("wild", move |_: &[Arc<Check>], _: &str| raw);
            let evaluation = Evaluation::new(vec![year], Strategy::Function(wild))
                .expect("valid evaluation");
            assert_eq!(evaluation.evaluate(PID).expect("checks ran"), expected);
        }
        assert_eq!(bounded("identity", PID, 0.25), 0.25);
    }

    #[test]
    fn unsuccessful_checks_give_partial_credit() {
        let ok = recorded(CheckKind::TitlesLanguage, CheckResult::list(items(&["en"]), ""));
        let failed = recorded(
            CheckKind::DescriptionsLanguage,
            CheckResult::undetermined(crate::result::Shape::List, "no descriptions given"),
        );
        let evaluation = Evaluation::new(vec![ok, failed], Strategy::ContainsAll(items(&["en"])))
            .expect("valid evaluation");
        assert_eq!(evaluation.evaluate(PID).expect("checks ran"), 0.5);
    }

    #[test]
    fn checks_not_run_is_a_distinct_error() {
        let check = Check::new(CheckKind::DescriptionsNumber).shared();
        let evaluation = Evaluation::of(&check, Strategy::IsBetween { low: 1.0, high: 100.0 })
            .expect("valid evaluation");
        match evaluation.evaluate(PID) {
            Err(EvalError::ChecksNotRun { check, pid }) => {
                assert_eq!(check, "DescriptionsNumberCheck");
                assert_eq!(pid, PID);
            }
            other => panic!("expected ChecksNotRun, got {other:?}"),
        }
    }

    #[test]
    fn configuration_errors_fail_at_construction() {
        let check = Check::new(CheckKind::DescriptionsNumber).shared();
        assert!(matches!(
            Evaluation::new(Vec::new(), Strategy::True),
            Err(EvalError::InvalidEvaluation(_))
        ));
        assert!(matches!(
            Evaluation::of(&check, Strategy::IsBetween { low: 5.0, high: 1.0 }),
            Err(EvalError::InvalidEvaluation(_))
        ));
        assert!(matches!(
            Evaluation::of(&check, Strategy::IsBetween { low: f64::NAN, high: 1.0 }),
            Err(EvalError::InvalidEvaluation(_))
        ));
        assert!(matches!(
            Evaluation::of(&check, Strategy::InList(Vec::new())),
            Err(EvalError::InvalidEvaluation(_))
        ));
    }

    #[test]
    fn identity_and_description() {
        let check = Check::new(CheckKind::DescriptionsLength).shared();
        let evaluation = Evaluation::of(&check, Strategy::IsBetween { low: 1.0, high: 300.0 })
            .expect("valid evaluation");
        assert_eq!(evaluation.name(), "IsBetweenEvaluation");
        assert_eq!(evaluation.key(), "IsBetweenEvaluation[3]");
        assert_eq!(evaluation.rounded(), 10);
        assert!(evaluation.description().ends_with("The lower bound is 1 the upper bound is 300."));
        assert!(evaluation.involves(CheckKind::DescriptionsLength));
        assert!(!evaluation.involves(CheckKind::TitlesLength));
    }
}
