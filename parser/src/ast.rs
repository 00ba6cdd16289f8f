use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tokens::{LITERAL_FALSE, LITERAL_TRUE};

/// A single filter value element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Boolean(bool),
    Number(f64),
    Text(String),
    /// Serialized as epoch milliseconds. Never produced by deserialization because a JSON number
    /// always matches `Number` first.
    Timestamp(#[serde(with = "chrono::serde::ts_milliseconds")] DateTime<Utc>),
}

impl Scalar {
    pub fn text(s: impl Into<String>) -> Self {
        Scalar::Text(s.into())
    }

    /// Guess the most specific scalar for a raw string: booleans, then finite numbers, then text.
    pub fn infer(raw: &str) -> Self {
        match raw {
            LITERAL_TRUE => return Scalar::Boolean(true),
            LITERAL_FALSE => return Scalar::Boolean(false),
            _ => {}
        }
        match parse_finite(raw) {
            Some(number) => Scalar::Number(number),
            None => Scalar::Text(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Scalar::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Renders the value the way it appears inside a serialized filter token. Timestamps render as
/// epoch milliseconds.
impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Boolean(b) => write!(f, "{b}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => write!(f, "{s}"),
            Scalar::Timestamp(t) => write!(f, "{}", t.timestamp_millis()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n as f64)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Boolean(b)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(t: DateTime<Utc>) -> Self {
        Scalar::Timestamp(t)
    }
}

/// The declared element type of a filter column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    #[default]
    Text,
    Number,
    Boolean,
    Timestamp,
}

impl ScalarKind {
    pub fn coerce(&self, raw: &str) -> Option<Scalar> {
        match self {
            ScalarKind::Text => Some(Scalar::Text(raw.to_string())),
            ScalarKind::Number => parse_finite(raw).map(Scalar::Number),
            ScalarKind::Boolean => match raw {
                LITERAL_TRUE => Some(Scalar::Boolean(true)),
                LITERAL_FALSE => Some(Scalar::Boolean(false)),
                _ => None,
            },
            ScalarKind::Timestamp => parse_timestamp(raw).map(Scalar::Timestamp),
        }
    }
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScalarKind::Text => "text",
            ScalarKind::Number => "number",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Timestamp => "timestamp",
        };
        write!(f, "{name}")
    }
}

/// The value of one filter.
///
/// Deserialization tries the variants in declaration order, so a two element JSON array becomes
/// a `List`. `Range` is produced by the range grammars and by callers that construct it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
    /// One tuple per entry, for `in` filters over several columns.
    Rows(Vec<Vec<Scalar>>),
    Range(Scalar, Scalar),
}

impl FilterValue {
    /// Empty text, an empty list and empty rows all mean "no filter".
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Scalar(s) => s.is_empty(),
            FilterValue::List(items) => items.is_empty(),
            FilterValue::Rows(rows) => rows.is_empty(),
            FilterValue::Range(_, _) => false,
        }
    }

    /// The two ends of a range, accepting a two element list as well.
    pub fn as_pair(&self) -> Option<(&Scalar, &Scalar)> {
        match self {
            FilterValue::Range(a, b) => Some((a, b)),
            FilterValue::List(items) => match items.as_slice() {
                [a, b] => Some((a, b)),
                _ => None,
            },
            _ => None,
        }
    }

    /// The scalar elements of a list or range, in order.
    pub fn elements(&self) -> Option<Vec<&Scalar>> {
        match self {
            FilterValue::List(items) => Some(items.iter().collect()),
            FilterValue::Range(a, b) => Some(vec![a, b]),
            _ => None,
        }
    }

    /// Apply `f` to every scalar, keeping the shape of the value.
    pub fn map_scalars(self, f: impl Fn(Scalar) -> Scalar) -> FilterValue {
        match self {
            FilterValue::Scalar(s) => FilterValue::Scalar(f(s)),
            FilterValue::List(items) => FilterValue::List(items.into_iter().map(&f).collect()),
            FilterValue::Rows(rows) => FilterValue::Rows(
                rows.into_iter()
                    .map(|row| row.into_iter().map(&f).collect())
                    .collect(),
            ),
            FilterValue::Range(a, b) => FilterValue::Range(f(a), f(b)),
        }
    }
}

macro_rules! filter_value_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FilterValue {
                fn from(value: $t) -> Self {
                    FilterValue::Scalar(value.into())
                }
            }
        )*
    };
}

filter_value_from_scalar!(&str, String, f64, i64, i32, bool, DateTime<Utc>);

impl From<Scalar> for FilterValue {
    fn from(value: Scalar) -> Self {
        FilterValue::Scalar(value)
    }
}

impl From<Vec<Scalar>> for FilterValue {
    fn from(items: Vec<Scalar>) -> Self {
        FilterValue::List(items)
    }
}

impl<T: Into<Scalar>> FromIterator<T> for FilterValue {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        FilterValue::List(iter.into_iter().map(Into::into).collect())
    }
}

/// One `name:value` pair from a serialized filter string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub name: String,
    pub value: String,
}

/// A decoded sort parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortToken {
    pub id: String,
    pub desc: bool,
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Accepts epoch milliseconds or an RFC 3339 timestamp.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(millis) = raw.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer() {
        assert_eq!(Scalar::infer("true"), Scalar::Boolean(true));
        assert_eq!(Scalar::infer("42"), Scalar::Number(42.0));
        assert_eq!(Scalar::infer("-1.5"), Scalar::Number(-1.5));
        assert_eq!(Scalar::infer("abc"), Scalar::text("abc"));
        assert_eq!(Scalar::infer("NaN"), Scalar::text("NaN"));
        assert_eq!(Scalar::infer("inf"), Scalar::text("inf"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Scalar::Number(42.0).to_string(), "42");
        assert_eq!(Scalar::Number(0.25).to_string(), "0.25");
        let t = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(Scalar::Timestamp(t).to_string(), "1700000000123");
    }

    #[test]
    fn test_coerce() {
        assert_eq!(ScalarKind::Number.coerce("7"), Some(Scalar::Number(7.0)));
        assert_eq!(ScalarKind::Number.coerce("seven"), None);
        assert_eq!(ScalarKind::Text.coerce("7"), Some(Scalar::text("7")));
        assert_eq!(ScalarKind::Boolean.coerce("yes"), None);
        assert_eq!(
            ScalarKind::Timestamp.coerce("2024-01-02T03:04:05Z"),
            Some(Scalar::Timestamp(
                DateTime::from_timestamp_millis(1_704_164_645_000).unwrap()
            ))
        );
    }

    #[test]
    fn test_is_empty() {
        assert!(FilterValue::from("").is_empty());
        assert!(FilterValue::List(vec![]).is_empty());
        assert!(!FilterValue::from("a").is_empty());
        assert!(!FilterValue::from(0.0).is_empty());
        assert!(!FilterValue::from(false).is_empty());
    }

    #[test]
    fn test_deserialize_filter_value() {
        let value: FilterValue = serde_json::from_str("[1, 10]").unwrap();
        assert_eq!(
            value,
            FilterValue::List(vec![Scalar::Number(1.0), Scalar::Number(10.0)])
        );
        let value: FilterValue = serde_json::from_str(r#"[[1, "a"], [2, "b"]]"#).unwrap();
        assert!(matches!(value, FilterValue::Rows(rows) if rows.len() == 2));
        let value: FilterValue = serde_json::from_str(r#""x""#).unwrap();
        assert_eq!(value, FilterValue::from("x"));
    }
}
