use std::fmt;

use serde::{Deserialize, Serialize};

/// Element of a list outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Item {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Item {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Item::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Item::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Item::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Null => f.write_str("null"),
            Item::Bool(value) => write!(f, "{value}"),
            Item::Number(value) => write!(f, "{value}"),
            Item::Text(value) => write!(f, "{value:?}"),
        }
    }
}

/// `[a, b, c]` rendering used in descriptions and reports.
pub fn format_items(items: &[Item]) -> String {
    let inner: Vec<String> = items.iter().map(Item::to_string).collect();
    format!("[{}]", inner.join(", "))
}

impl From<bool> for Item {
    fn from(value: bool) -> Self {
        Item::Bool(value)
    }
}

impl From<f64> for Item {
    fn from(value: f64) -> Self {
        Item::Number(value)
    }
}

impl From<usize> for Item {
    fn from(value: usize) -> Self {
        Item::Number(value as f64)
    }
}

impl From<&str> for Item {
    fn from(value: &str) -> Self {
        Item::Text(value.to_string())
    }
}

impl From<String> for Item {
    fn from(value: String) -> Self {
        Item::Text(value)
    }
}

impl From<Option<&str>> for Item {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Item::Null, Item::from)
    }
}

/// Payload of a check result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Boolean(bool),
    Metric(f64),
    Categorical(String),
    List(Vec<Item>),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Boolean(value) => write!(f, "{value}"),
            Outcome::Metric(value) => write!(f, "{value}"),
            Outcome::Categorical(value) => write!(f, "{value:?}"),
            Outcome::List(items) => f.write_str(&format_items(items)),
        }
    }
}

impl Outcome {
    pub fn shape(&self) -> Shape {
        match self {
            Outcome::Boolean(_) => Shape::Boolean,
            Outcome::Metric(_) => Shape::Metric,
            Outcome::Categorical(_) => Shape::Categorical,
            Outcome::List(_) => Shape::List,
        }
    }
}

/// The four result shapes a check can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Boolean,
    Metric,
    Categorical,
    List,
}

impl Shape {
    /// Placeholder outcome carried by unsuccessful results.
    pub fn sentinel(self) -> Outcome {
        match self {
            Shape::Boolean => Outcome::Boolean(false),
            Shape::Metric => Outcome::Metric(f64::NAN),
            Shape::Categorical => Outcome::Categorical(String::new()),
            Shape::List => Outcome::List(Vec::new()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Boolean => "boolean",
            Shape::Metric => "metric",
            Shape::Categorical => "categorical",
            Shape::List => "list",
        }
    }
}

/// Immutable outcome of one check run.
///
/// `success == false` means the check could not determine anything (missing
/// data, unreachable service); a negative finding is `success == true` with a
/// negative outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    outcome: Outcome,
    message: String,
    success: bool,
}

impl CheckResult {
    pub fn boolean(outcome: bool, message: impl Into<String>) -> Self {
        Self::determined(Outcome::Boolean(outcome), message)
    }

    pub fn metric(outcome: f64, message: impl Into<String>) -> Self {
        Self::determined(Outcome::Metric(outcome), message)
    }

    pub fn categorical(outcome: impl Into<String>, message: impl Into<String>) -> Self {
        Self::determined(Outcome::Categorical(outcome.into()), message)
    }

    pub fn list(outcome: Vec<Item>, message: impl Into<String>) -> Self {
        Self::determined(Outcome::List(outcome), message)
    }

    /// A result for a check that could not produce a meaningful outcome.
    pub fn undetermined(shape: Shape, message: impl Into<String>) -> Self {
        Self {
            outcome: shape.sentinel(),
            message: message.into(),
            success: false,
        }
    }

    fn determined(outcome: Outcome, message: impl Into<String>) -> Self {
        Self {
            outcome,
            message: message.into(),
            success: true,
        }
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn shape(&self) -> Shape {
        self.outcome.shape()
    }
}
