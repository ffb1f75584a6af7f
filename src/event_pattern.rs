//! EventBridge event pattern matching.
//!
//! Lets rule patterns be checked against recorded event payloads without
//! deploying them. Patterns are validated when loaded so a typo in a content
//! filter fails loudly instead of silently never matching.

use crate::error::EventPatternError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct EventPattern {
    root: BTreeMap<String, Node>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Fields(BTreeMap<String, Node>),
    Alternatives(Vec<Matcher>),
}

#[derive(Debug, Clone, PartialEq)]
enum Matcher {
    Exact(Value),
    Prefix(String),
    Suffix(String),
    EqualsIgnoreCase(String),
    Wildcard(String),
    AnythingBut(Exclusion),
    Numeric(Vec<(NumericOp, f64)>),
    Exists(bool),
}

#[derive(Debug, Clone, PartialEq)]
enum Exclusion {
    Values(Vec<Value>),
    Prefix(String),
    Suffix(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum NumericOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl EventPattern {
    pub fn load(pattern: &str) -> Result<Self, EventPatternError> {
        let value: Value = serde_json::from_str(pattern)?;
        Self::from_value(&value)
    }

    pub fn from_value(pattern: &Value) -> Result<Self, EventPatternError> {
        match pattern {
            Value::Object(fields) => Ok(EventPattern {
                root: parse_fields(fields, "")?,
            }),
            _ => Err(EventPatternError::NotAnObject),
        }
    }

    pub fn matches_event(&self, event: &Value) -> bool {
        match event {
            Value::Object(fields) => matches_fields(&self.root, fields),
            _ => false,
        }
    }
}

fn parse_fields(
    fields: &Map<String, Value>,
    path: &str,
) -> Result<BTreeMap<String, Node>, EventPatternError> {
    fields
        .iter()
        .map(|(key, value)| -> Result<(String, Node), EventPatternError> {
            let path = if path.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", path, key)
            };
            Ok((key.clone(), parse_node(value, &path)?))
        })
        .collect()
}

fn parse_node(value: &Value, path: &str) -> Result<Node, EventPatternError> {
    match value {
        Value::Object(fields) => Ok(Node::Fields(parse_fields(fields, path)?)),
        Value::Array(values) if values.is_empty() => {
            Err(EventPatternError::EmptyAlternatives(path.to_string()))
        }
        Value::Array(values) => values
            .iter()
            .map(parse_matcher)
            .collect::<Result<Vec<_>, _>>()
            .map(Node::Alternatives),
        _ => Err(EventPatternError::UnsupportedValue(path.to_string())),
    }
}

fn parse_matcher(value: &Value) -> Result<Matcher, EventPatternError> {
    let filter = match value {
        Value::Object(filter) => filter,
        Value::Array(_) => return Err(EventPatternError::UnsupportedValue(value.to_string())),
        scalar => return Ok(Matcher::Exact(scalar.clone())),
    };

    let mut entries = filter.iter();
    let (name, argument) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => return Err(EventPatternError::UnknownFilter(value.to_string())),
    };

    match (name.as_str(), argument) {
        ("prefix", Value::String(prefix)) => Ok(Matcher::Prefix(prefix.clone())),
        ("suffix", Value::String(suffix)) => Ok(Matcher::Suffix(suffix.clone())),
        ("equals-ignore-case", Value::String(expected)) => {
            Ok(Matcher::EqualsIgnoreCase(expected.to_lowercase()))
        }
        ("wildcard", Value::String(pattern)) => Ok(Matcher::Wildcard(pattern.clone())),
        ("exists", Value::Bool(exists)) => Ok(Matcher::Exists(*exists)),
        ("numeric", Value::Array(comparisons)) => parse_numeric(comparisons),
        ("anything-but", argument) => parse_exclusion(argument).map(Matcher::AnythingBut),
        _ => Err(EventPatternError::UnknownFilter(value.to_string())),
    }
}

fn parse_exclusion(argument: &Value) -> Result<Exclusion, EventPatternError> {
    match argument {
        Value::Array(values) if values.is_empty() => {
            Err(EventPatternError::EmptyAlternatives("anything-but".to_string()))
        }
        Value::Array(values) => {
            if values.iter().any(|v| v.is_object() || v.is_array()) {
                return Err(EventPatternError::UnknownFilter(argument.to_string()));
            }
            Ok(Exclusion::Values(values.clone()))
        }
        Value::Object(filter) => match filter.iter().next() {
            Some((name, Value::String(affix))) if filter.len() == 1 => match name.as_str() {
                "prefix" => Ok(Exclusion::Prefix(affix.clone())),
                "suffix" => Ok(Exclusion::Suffix(affix.clone())),
                _ => Err(EventPatternError::UnknownFilter(argument.to_string())),
            },
            _ => Err(EventPatternError::UnknownFilter(argument.to_string())),
        },
        scalar => Ok(Exclusion::Values(vec![scalar.clone()])),
    }
}

fn parse_numeric(comparisons: &[Value]) -> Result<Matcher, EventPatternError> {
    if comparisons.is_empty() || comparisons.len() % 2 != 0 || comparisons.len() > 4 {
        return Err(EventPatternError::InvalidNumeric(format!(
            "expected one or two operator/value pairs, got {}",
            Value::Array(comparisons.to_vec())
        )));
    }

    comparisons
        .chunks(2)
        .map(|pair| -> Result<(NumericOp, f64), EventPatternError> {
            let op = match pair[0].as_str() {
                Some("=") => NumericOp::Eq,
                Some("<") => NumericOp::Lt,
                Some("<=") => NumericOp::Le,
                Some(">") => NumericOp::Gt,
                Some(">=") => NumericOp::Ge,
                _ => {
                    return Err(EventPatternError::InvalidNumeric(format!(
                        "unknown operator {}",
                        pair[0]
                    )))
                }
            };
            let bound = pair[1].as_f64().ok_or_else(|| {
                EventPatternError::InvalidNumeric(format!("{} is not a number", pair[1]))
            })?;
            Ok((op, bound))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Matcher::Numeric)
}

fn matches_fields(pattern: &BTreeMap<String, Node>, event: &Map<String, Value>) -> bool {
    pattern
        .iter()
        .all(|(key, node)| matches_node(node, event.get(key)))
}

fn matches_node(node: &Node, value: Option<&Value>) -> bool {
    match node {
        Node::Fields(fields) => match value {
            Some(Value::Object(object)) => matches_fields(fields, object),
            Some(Value::Array(items)) => items.iter().any(|item| match item {
                Value::Object(object) => matches_fields(fields, object),
                _ => false,
            }),
            _ => false,
        },
        Node::Alternatives(matchers) => matchers.iter().any(|matcher| match value {
            None => *matcher == Matcher::Exists(false),
            Some(Value::Array(items)) => items.iter().any(|item| matcher.matches(item)),
            Some(value) => matcher.matches(value),
        }),
    }
}

impl Matcher {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Matcher::Exact(expected) => values_equal(expected, value),
            Matcher::Prefix(prefix) => value
                .as_str()
                .map_or(false, |s| s.starts_with(prefix.as_str())),
            Matcher::Suffix(suffix) => value
                .as_str()
                .map_or(false, |s| s.ends_with(suffix.as_str())),
            Matcher::EqualsIgnoreCase(expected) => {
                value.as_str().map_or(false, |s| s.to_lowercase() == *expected)
            }
            Matcher::Wildcard(pattern) => value
                .as_str()
                .map_or(false, |s| wildcard_match(pattern, s)),
            Matcher::AnythingBut(exclusion) => exclusion.allows(value),
            Matcher::Numeric(comparisons) => value.as_f64().map_or(false, |n| {
                comparisons.iter().all(|(op, bound)| op.holds(n, *bound))
            }),
            Matcher::Exists(exists) => *exists,
        }
    }
}

impl Exclusion {
    fn allows(&self, value: &Value) -> bool {
        match self {
            Exclusion::Values(excluded) => !excluded.iter().any(|e| values_equal(e, value)),
            Exclusion::Prefix(prefix) => value
                .as_str()
                .map_or(false, |s| !s.starts_with(prefix.as_str())),
            Exclusion::Suffix(suffix) => value
                .as_str()
                .map_or(false, |s| !s.ends_with(suffix.as_str())),
        }
    }
}

impl NumericOp {
    fn holds(self, n: f64, bound: f64) -> bool {
        match self {
            NumericOp::Eq => (n - bound).abs() < f64::EPSILON,
            NumericOp::Lt => n < bound,
            NumericOp::Le => n <= bound,
            NumericOp::Gt => n > bound,
            NumericOp::Ge => n >= bound,
        }
    }
}

fn values_equal(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
            _ => a == b,
        },
        _ => expected == actual,
    }
}

fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((star_p, star_t)) = star {
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|c| *c == '*')
}
