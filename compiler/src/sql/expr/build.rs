use itertools::Itertools;

use super::{SqlExpr, SqlExprPrecedence};

fn binary_op(a: SqlExpr, op: &str, b: SqlExpr, precedence: SqlExprPrecedence) -> SqlExpr {
    SqlExpr {
        content: format!(
            "{} {} {}",
            a.for_precedence(precedence),
            op,
            b.for_precedence(precedence)
        ),
        precedence,
    }
}

fn sql_func(name: &str, args: impl IntoIterator<Item = SqlExpr>) -> SqlExpr {
    SqlExpr::atom(format!("{}({})", name, args.into_iter().join(", ")))
}

pub mod agg {
    use super::*;

    pub fn count_star() -> SqlExpr {
        SqlExpr::atom("count(*)".to_string())
    }
}

pub mod arrays {
    use super::*;

    pub fn ndims(a: SqlExpr) -> SqlExpr {
        sql_func("array_ndims", [a])
    }

    pub fn cat(a: SqlExpr, b: SqlExpr) -> SqlExpr {
        sql_func("array_cat", [a, b])
    }
}

pub mod cmp {
    use super::*;

    /// A set of conditions joined by `and`. Empty conditions are dropped.
    pub fn and(conditions: impl IntoIterator<Item = SqlExpr>) -> SqlExpr {
        let precedence = SqlExprPrecedence::LogicalAnd;
        let entries = conditions
            .into_iter()
            .filter(|e| !e.is_empty())
            .collect::<Vec<_>>();
        if entries.len() == 1 {
            return entries.into_iter().next().unwrap_or_default();
        }
        SqlExpr {
            content: entries
                .into_iter()
                .map(|c| c.for_precedence(precedence).content)
                .join(" and "),
            precedence,
        }
    }

    pub fn comparison(a: SqlExpr, op: &str, b: SqlExpr) -> SqlExpr {
        binary_op(a, op, b, SqlExprPrecedence::Comparison)
    }

    pub fn gte(a: SqlExpr, b: SqlExpr) -> SqlExpr {
        comparison(a, ">=", b)
    }

    pub fn lte(a: SqlExpr, b: SqlExpr) -> SqlExpr {
        comparison(a, "<=", b)
    }

    pub fn gt(a: SqlExpr, b: SqlExpr) -> SqlExpr {
        comparison(a, ">", b)
    }

    /// `a in (b, c)`. The list is written without spaces.
    pub fn in_list(a: SqlExpr, items: impl IntoIterator<Item = SqlExpr>) -> SqlExpr {
        SqlExpr {
            content: format!(
                "{} in ({})",
                a.for_precedence(SqlExprPrecedence::Comparison),
                items.into_iter().join(",")
            ),
            precedence: SqlExprPrecedence::Comparison,
        }
    }

    /// `a is <keyword>` where the keyword is inlined as given, e.g. `null` or `not null`.
    pub fn is(a: SqlExpr, keyword: &str) -> SqlExpr {
        SqlExpr {
            content: format!(
                "{} is {}",
                a.for_precedence(SqlExprPrecedence::Comparison),
                keyword
            ),
            precedence: SqlExprPrecedence::Comparison,
        }
    }

    /// Array containment, `a @> b`.
    pub fn contains(a: SqlExpr, b: SqlExpr) -> SqlExpr {
        binary_op(a, "@>", b, SqlExprPrecedence::Other)
    }
}

pub mod cond {
    use super::*;

    pub fn case_when(condition: SqlExpr, then: SqlExpr, otherwise: SqlExpr) -> SqlExpr {
        SqlExpr::atom(format!(
            "case when {condition} then {then} else {otherwise} end"
        ))
    }
}

pub mod strings {
    use super::*;

    pub fn concat(a: SqlExpr, b: SqlExpr) -> SqlExpr {
        binary_op(a, "||", b, SqlExprPrecedence::Other)
    }

    pub fn left(a: SqlExpr, n: usize) -> SqlExpr {
        sql_func("left", [a, value::number(n)])
    }

    pub fn octet_length(a: SqlExpr) -> SqlExpr {
        sql_func("octet_length", [a])
    }
}

pub mod value {
    use super::*;

    pub fn number(n: usize) -> SqlExpr {
        SqlExpr::atom(n.to_string())
    }

    /// `array[a,b]`
    pub fn array(items: impl IntoIterator<Item = SqlExpr>) -> SqlExpr {
        SqlExpr::atom(format!("array[{}]", items.into_iter().join(",")))
    }

    /// `(select a)`
    pub fn subquery(a: SqlExpr) -> SqlExpr {
        SqlExpr::atom(format!("(select {a})"))
    }

    /// `(a, b)`
    pub fn row(items: impl IntoIterator<Item = SqlExpr>) -> SqlExpr {
        SqlExpr::atom(format!("({})", items.into_iter().join(", ")))
    }
}
