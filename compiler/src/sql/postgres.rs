use super::{
    dialect::{Dialect, PatternFlags},
    expr::{SqlExpr, SqlExprPrecedence},
};

/// Keywords which Postgres will not accept as bare identifiers.
///
/// https://www.postgresql.org/docs/current/sql-keywords-appendix.html
#[rustfmt::skip]
const RESERVED_WORDS: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric", "authorization",
    "binary", "both", "case", "cast", "check", "collate", "collation", "column", "concurrently",
    "constraint", "create", "cross", "current_catalog", "current_date", "current_role",
    "current_schema", "current_time", "current_timestamp", "current_user", "default",
    "deferrable", "desc", "distinct", "do", "else", "end", "except", "false", "fetch", "for",
    "foreign", "freeze", "from", "full", "grant", "group", "having", "ilike", "in", "initially",
    "inner", "intersect", "into", "is", "isnull", "join", "lateral", "leading", "left", "like",
    "limit", "localtime", "localtimestamp", "natural", "not", "notnull", "null", "offset", "on",
    "only", "or", "order", "outer", "overlaps", "placing", "primary", "references", "returning",
    "right", "select", "session_user", "similar", "some", "symmetric", "system_user", "table",
    "tablesample", "then", "to", "trailing", "true", "union", "unique", "user", "using",
    "variadic", "verbose", "when", "where", "window", "with",
];

fn is_bare_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    let starts_well = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_');
    starts_well
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$')
        && !RESERVED_WORDS.contains(&ident)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Postgres();

impl Dialect for Postgres {
    /// Identifiers are only quoted when Postgres would otherwise fold or reject them.
    fn quote_identifier(&self, ident: &str) -> String {
        if is_bare_identifier(ident) {
            return ident.to_string();
        }
        format!(r#""{}""#, ident.replace('"', r#""""#))
    }

    /// Strings containing a backslash use the escape string syntax so that the backslash keeps
    /// its literal meaning regardless of `standard_conforming_strings`.
    fn quote_string(&self, string: &str) -> String {
        let quoted = string.replace('\'', "''");
        if quoted.contains('\\') {
            format!("E'{}'", quoted.replace('\\', r"\\"))
        } else {
            format!("'{quoted}'")
        }
    }

    fn cast(&self, expr: SqlExpr, type_name: &str) -> SqlExpr {
        SqlExpr::atom(format!(
            "{}::{type_name}",
            expr.for_precedence(SqlExprPrecedence::Atom)
        ))
    }

    fn array_slice(&self, expr: SqlExpr, len: usize) -> SqlExpr {
        SqlExpr::atom(format!(
            "{}[1:{len}]",
            expr.for_precedence(SqlExprPrecedence::Atom)
        ))
    }

    fn match_pattern(
        &self,
        a: SqlExpr,
        b: SqlExpr,
        is_positive: bool,
        flags: &PatternFlags,
    ) -> SqlExpr {
        let op = match (is_positive, flags.is_case_sensitive) {
            (true, true) => "~~",
            (true, false) => "~~*",
            (false, true) => "!~~",
            (false, false) => "!~~*",
        };
        let precedence = SqlExprPrecedence::Other;
        SqlExpr::with_precedence(
            format!(
                "{} {} {}",
                a.for_precedence(precedence),
                op,
                b.for_precedence(precedence)
            ),
            precedence,
        )
    }
}
