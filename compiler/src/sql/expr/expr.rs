use std::fmt::{Display, Formatter};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SqlExpr {
    pub content: String,
    pub precedence: SqlExprPrecedence,
}

impl SqlExpr {
    pub fn empty() -> SqlExpr {
        SqlExpr {
            content: String::new(),
            precedence: SqlExprPrecedence::Atom,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn atom(content: String) -> SqlExpr {
        SqlExpr {
            content,
            precedence: SqlExprPrecedence::Atom,
        }
    }

    /// An expression with an explicit precedence, such as a cast or a `CASE` block.
    pub fn with_precedence(content: String, precedence: SqlExprPrecedence) -> SqlExpr {
        SqlExpr {
            content,
            precedence,
        }
    }

    fn parenthesize(&mut self) {
        self.content = format!("({})", self.content);
        self.precedence = SqlExprPrecedence::Atom;
    }

    pub fn for_precedence(mut self, precedence: SqlExprPrecedence) -> SqlExpr {
        if precedence > self.precedence {
            self.parenthesize();
        }
        self
    }
}

impl Display for SqlExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
/// https://www.postgresql.org/docs/current/sql-syntax-lexical.html#SQL-PRECEDENCE
pub enum SqlExprPrecedence {
    /// A literal value, a column name, a function call, a type cast or parentheses.
    #[default]
    Atom = 0,
    /// `||` and other operators such as `@>` and `~~`
    Other = -1,
    /// `=` `<>` `>` `>=` `<` `<=` `IS` `IS NOT` `IN` `LIKE` `NOT LIKE`
    Comparison = -2,
    /// `AND`
    LogicalAnd = -3,
}
