pub use super::expr::SqlExpr;

/// A table reference. Tables without a schema are CTE aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    pub fn alias(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }
}

#[derive(Debug)]
pub struct Select {
    pub table: TableRef,
    /// Empty means `*`.
    pub columns: Vec<Column>,
    pub ctes: Vec<Cte>,
    pub conditions: SqlExpr,
    pub sorting: Vec<SortEntry>,
    pub limit: Option<LimitOffset>,
}

impl From<TableRef> for Select {
    fn from(table: TableRef) -> Self {
        Self {
            table,
            columns: vec![],
            ctes: vec![],
            conditions: SqlExpr::default(),
            sorting: vec![],
            limit: None,
        }
    }
}

#[derive(Debug)]
pub struct Cte {
    pub alias: String,
    pub select: Select,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub expr: SqlExpr,
    pub alias: Option<String>,
}

impl Column {
    pub fn new(expr: SqlExpr, alias: Option<String>) -> Self {
        Self { expr, alias }
    }
}

impl From<SqlExpr> for Column {
    fn from(expr: SqlExpr) -> Self {
        Self { expr, alias: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsSort {
    First,
    Last,
}

#[derive(Debug, Clone)]
pub struct SortEntry {
    pub expr: SqlExpr,
    pub direction: SortDirection,
    pub nulls_sort: NullsSort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOffset {
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug)]
pub struct Delete {
    pub table: TableRef,
    pub conditions: SqlExpr,
    /// Empty means no `returning` clause.
    pub returning: Vec<Column>,
}

/// Rows are passed as one JSON document and expanded by `jsonb_populate_recordset`.
#[derive(Debug)]
pub struct Insert {
    pub table: TableRef,
    pub columns: Vec<String>,
    pub payload: String,
    pub returning: Vec<Column>,
}

/// The new values are passed as one JSON object and expanded by `json_populate_record`.
#[derive(Debug)]
pub struct Update {
    pub table: TableRef,
    pub columns: Vec<String>,
    pub payload: String,
    pub conditions: SqlExpr,
    pub returning: Vec<Column>,
}

#[derive(Debug)]
pub struct Truncate {
    pub table: TableRef,
    pub cascade: bool,
}

#[derive(Debug)]
pub enum Statement {
    Select(Select),
    Delete(Delete),
    Insert(Insert),
    Update(Update),
    Truncate(Truncate),
}
