use rowquery_parser::ast::FilterValue;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{msg, Error},
    sql::tree::LimitOffset,
};

pub const DEFAULT_SCHEMA: &str = "public";

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

fn default_true() -> bool {
    true
}

/// The table a statement targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTable {
    pub name: String,
    #[serde(default = "default_schema")]
    pub schema: String,
}

impl QueryTable {
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=", alias = "equals", alias = "eq")]
    Eq,
    #[serde(rename = "<>", alias = "!=", alias = "neq")]
    Neq,
    #[serde(rename = ">", alias = "gt")]
    Gt,
    #[serde(rename = ">=", alias = "gte")]
    Gte,
    #[serde(rename = "<", alias = "lt")]
    Lt,
    #[serde(rename = "<=", alias = "lte")]
    Lte,
    #[serde(rename = "~~", alias = "like")]
    Like,
    #[serde(rename = "~~*", alias = "ilike")]
    ILike,
    #[serde(rename = "!~~", alias = "not_like")]
    NotLike,
    #[serde(rename = "!~~*", alias = "not_ilike")]
    NotILike,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "is")]
    Is,
    #[serde(rename = "range")]
    Range,
    #[serde(rename = "contains")]
    Contains,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Neq => "<>",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Like => "~~",
            Operator::ILike => "~~*",
            Operator::NotLike => "!~~",
            Operator::NotILike => "!~~*",
            Operator::In => "in",
            Operator::Is => "is",
            Operator::Range => "range",
            Operator::Contains => "contains",
        }
    }

    /// Whether the operator can compare a row of columns against a row of values.
    pub fn supports_tuples(&self) -> bool {
        matches!(
            self,
            Operator::Eq
                | Operator::Neq
                | Operator::Gt
                | Operator::Gte
                | Operator::Lt
                | Operator::Lte
                | Operator::In
        )
    }
}

/// One column, or several columns compared as a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterColumn {
    Single(String),
    Tuple(Vec<String>),
}

impl FilterColumn {
    pub fn tuple<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        FilterColumn::Tuple(columns.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for FilterColumn {
    fn from(column: &str) -> Self {
        FilterColumn::Single(column.to_string())
    }
}

impl From<String> for FilterColumn {
    fn from(column: String) -> Self {
        FilterColumn::Single(column)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub column: FilterColumn,
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
}

impl Filter {
    pub fn new(
        column: impl Into<FilterColumn>,
        operator: Operator,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            column: column.into(),
            operator,
            value: Some(value.into()),
        }
    }

    /// The value, unless it is absent or empty. Inactive filters produce no SQL.
    pub fn active_value(&self) -> Option<&FilterValue> {
        self.value.as_ref().filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sort {
    /// Defaults to the table being queried.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub column: String,
    #[serde(default = "default_true")]
    pub ascending: bool,
    #[serde(default)]
    pub nulls_first: bool,
}

impl Sort {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
            ascending: true,
            nulls_first: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            ascending: false,
            ..Self::asc(column)
        }
    }

    pub fn on_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_nulls_first(mut self) -> Self {
        self.nulls_first = true;
        self
    }
}

/// An inclusive window of row indexes, starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub from: u64,
    pub to: u64,
}

impl Pagination {
    /// `page` is 1-based; page 0 is read as page 1.
    pub fn from_page(page: u64, limit: u64) -> Result<Self, Error> {
        if limit == 0 {
            return Err(Error::InvalidPagination(msg::zero_limit()));
        }
        let from = page.max(1).saturating_sub(1).saturating_mul(limit);
        Ok(Self {
            from,
            to: from.saturating_add(limit - 1),
        })
    }

    pub fn from_range(from: u64, to: u64) -> Result<Self, Error> {
        if to < from {
            return Err(Error::InvalidPagination(msg::inverted_range(from, to)));
        }
        Ok(Self { from, to })
    }

    pub fn limit(&self) -> u64 {
        (self.to - self.from).saturating_add(1)
    }

    pub fn offset(&self) -> u64 {
        self.from
    }
}

impl From<Pagination> for LimitOffset {
    fn from(pagination: Pagination) -> Self {
        LimitOffset {
            limit: pagination.limit(),
            offset: pagination.offset(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReturningOptions {
    pub returning: bool,
    /// Columns cast to `text[]` in the returning clause so enum arrays come back as plain text.
    pub enum_array_columns: Vec<String>,
}

impl ReturningOptions {
    pub fn all() -> Self {
        Self {
            returning: true,
            enum_array_columns: vec![],
        }
    }

    pub fn with_enum_arrays<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            returning: true,
            enum_array_columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rowquery_parser::ast::Scalar;

    use super::*;

    #[test]
    fn test_pagination_window() {
        let p = Pagination::from_page(1, 20).unwrap();
        assert_eq!((p.from, p.to), (0, 19));
        let p = Pagination::from_page(3, 10).unwrap();
        assert_eq!((p.from, p.to), (20, 29));
        assert_eq!((p.limit(), p.offset()), (10, 20));
        let p = Pagination::from_page(0, 5).unwrap();
        assert_eq!((p.from, p.to), (0, 4));
        let p = Pagination::from_page(2, 5).unwrap();
        assert_eq!(p.offset(), 5);
    }

    #[test]
    fn test_pagination_errors() {
        assert!(matches!(
            Pagination::from_page(1, 0),
            Err(Error::InvalidPagination(_))
        ));
        assert!(matches!(
            Pagination::from_range(10, 9),
            Err(Error::InvalidPagination(_))
        ));
        let p = Pagination::from_range(10, 19).unwrap();
        assert_eq!(p.limit(), 10);
    }

    #[test]
    fn test_deserialize_filter() {
        let filter: Filter =
            serde_json::from_str(r#"{"column": "id", "operator": "equals", "value": 3}"#).unwrap();
        assert_eq!(filter, Filter::new("id", Operator::Eq, 3.0));

        let filter: Filter =
            serde_json::from_str(r#"{"column": ["id", "version"], "operator": "in", "value": [[1, 2]]}"#)
                .unwrap();
        assert_eq!(filter.column, FilterColumn::tuple(["id", "version"]));
        assert_eq!(
            filter.value,
            Some(FilterValue::Rows(vec![vec![Scalar::Number(1.0), Scalar::Number(2.0)]]))
        );

        let filter: Filter =
            serde_json::from_str(r#"{"column": "email", "operator": "is", "value": null}"#).unwrap();
        assert_eq!(filter.active_value(), None);
    }

    #[test]
    fn test_deserialize_sort() {
        let sort: Sort = serde_json::from_str(r#"{"column": "name", "nullsFirst": true}"#).unwrap();
        assert_eq!(sort, Sort::asc("name").with_nulls_first());
        let sort: Sort =
            serde_json::from_str(r#"{"table": "users", "column": "id", "ascending": false}"#)
                .unwrap();
        assert_eq!(sort, Sort::desc("id").on_table("users"));
    }

    #[test]
    fn test_operator_names() {
        let op: Operator = serde_json::from_str(r#""~~*""#).unwrap();
        assert_eq!(op, Operator::ILike);
        assert_eq!(serde_json::to_string(&Operator::Neq).unwrap(), r#""<>""#);
        assert!(!Operator::Is.supports_tuples());
        assert!(Operator::In.supports_tuples());
    }
}
