use chrono::{DateTime, SecondsFormat, Utc};
use rowquery_parser::ast::Scalar;

use super::expr::SqlExpr;

/// Text values starting with this prefix are array literals and are inlined without quoting.
const ARRAY_LITERAL_PREFIX: &str = "ARRAY[";

pub struct PatternFlags {
    pub is_case_sensitive: bool,
}

pub trait Dialect: Send + Sync {
    /// Quote a schema, table or column for use in SQL.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string for use in SQL.
    fn quote_string(&self, string: &str) -> String;

    /// Render a timestamp literal
    fn timestamp(&self, timestamp: &DateTime<Utc>) -> String {
        self.quote_string(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Render a schema-qualified table reference
    fn qualified_table(&self, schema: &str, table: &str) -> String {
        format!(
            "{}.{}",
            self.quote_identifier(schema),
            self.quote_identifier(table)
        )
    }

    /// Render a table and column reference
    fn table_column(&self, table: &str, column: &str) -> String {
        format!(
            "{}.{}",
            self.quote_identifier(table),
            self.quote_identifier(column)
        )
    }

    /// Cast an expression to the named type, e.g. `text[]`.
    fn cast(&self, expr: SqlExpr, type_name: &str) -> SqlExpr;

    fn text_cast(&self, expr: SqlExpr) -> SqlExpr {
        self.cast(expr, "text")
    }

    fn text_array_cast(&self, expr: SqlExpr) -> SqlExpr {
        self.cast(expr, "text[]")
    }

    /// The first `len` elements of an array column.
    fn array_slice(&self, expr: SqlExpr, len: usize) -> SqlExpr;

    /// Render a pattern match (`LIKE` family) between two values
    ///
    /// * `a` - The left-hand side of the comparison
    /// * `b` - The pattern
    /// * `is_positive` - true when you want the comparison to return true for matching values,
    ///   false when the comparison is negated.
    /// * `flags` - Flags to control the behavior of the pattern match
    fn match_pattern(&self, a: SqlExpr, b: SqlExpr, is_positive: bool, flags: &PatternFlags)
        -> SqlExpr;

    /// Render a filter value element as a literal.
    fn literal(&self, value: &Scalar) -> SqlExpr {
        let content = match value {
            Scalar::Text(s) if s.starts_with(ARRAY_LITERAL_PREFIX) => s.clone(),
            Scalar::Text(s) => self.quote_string(s),
            Scalar::Number(n) => n.to_string(),
            Scalar::Boolean(b) => b.to_string(),
            Scalar::Timestamp(t) => self.timestamp(t),
        };
        SqlExpr::atom(content)
    }
}
