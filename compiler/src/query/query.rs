use itertools::Itertools;
use rowquery_parser::ast::FilterValue;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::{
    errors::Error,
    sql::{
        expr::build::agg,
        tree::{
            Column, Delete, Insert, Select, SqlExpr, Statement, TableRef, Truncate, Update,
        },
        Dialect,
    },
};

use super::{
    conditions::convert_filters,
    rendering::Render,
    sorting::SortingStack,
    types::{
        Filter, FilterColumn, Operator, Pagination, QueryTable, ReturningOptions, Sort,
        DEFAULT_SCHEMA,
    },
};

/// One JSON object per row, keyed by column name.
pub type Row = Map<String, Value>;

/// Entry point of the fluent builder.
///
/// ```
/// use rowquery::{Operator, Postgres, Query};
///
/// let sql = Query::from_public("users")
///     .select("id, name")
///     .filter("id", Operator::Gt, 10)
///     .to_sql(&Postgres())
///     .unwrap();
/// assert_eq!(sql, "select id, name from public.users where id > 10;");
/// ```
pub struct Query;

impl Query {
    pub fn from(table: impl Into<String>, schema: impl Into<String>) -> QueryAction {
        QueryAction::new(QueryTable::new(table, schema))
    }

    pub fn from_public(table: impl Into<String>) -> QueryAction {
        Self::from(table, DEFAULT_SCHEMA)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Action {
    Select { columns: String },
    Count,
    Delete { returning: ReturningOptions },
    Insert { rows: Vec<Row>, returning: ReturningOptions },
    Update { row: Row, returning: ReturningOptions },
    Truncate { cascade: bool },
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Select { .. } => "select",
            Action::Count => "count",
            Action::Delete { .. } => "delete",
            Action::Insert { .. } => "insert",
            Action::Update { .. } => "update",
            Action::Truncate { .. } => "truncate",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryAction {
    table: QueryTable,
}

impl QueryAction {
    pub fn new(table: QueryTable) -> Self {
        Self { table }
    }

    fn action(self, action: Action) -> QueryFilter {
        QueryFilter {
            table: self.table,
            action,
            filters: vec![],
            sorts: vec![],
        }
    }

    /// `columns` is inlined as given, e.g. `"id, name"` or `"*"`.
    pub fn select(self, columns: impl Into<String>) -> QueryFilter {
        self.action(Action::Select {
            columns: columns.into(),
        })
    }

    pub fn count(self) -> QueryFilter {
        self.action(Action::Count)
    }

    pub fn delete(self, returning: ReturningOptions) -> QueryFilter {
        self.action(Action::Delete { returning })
    }

    pub fn insert(self, rows: Vec<Row>, returning: ReturningOptions) -> QueryFilter {
        self.action(Action::Insert { rows, returning })
    }

    pub fn update(self, row: Row, returning: ReturningOptions) -> QueryFilter {
        self.action(Action::Update { row, returning })
    }

    pub fn truncate(self, cascade: bool) -> QueryFilter {
        self.action(Action::Truncate { cascade })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryFilter {
    table: QueryTable,
    action: Action,
    filters: Vec<Filter>,
    sorts: Vec<Sort>,
}

impl QueryFilter {
    pub fn filter(
        mut self,
        column: impl Into<FilterColumn>,
        operator: Operator,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.filters.push(Filter::new(column, operator, value));
        self
    }

    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// One `=` filter per column/value pair.
    pub fn match_all<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<FilterValue>,
    {
        self.filters.extend(
            pairs
                .into_iter()
                .map(|(k, v)| Filter::new(FilterColumn::Single(k.into()), Operator::Eq, v)),
        );
        self
    }

    pub fn order(
        self,
        table: impl Into<String>,
        column: impl Into<String>,
        ascending: bool,
        nulls_first: bool,
    ) -> Self {
        self.sort(Sort {
            table: Some(table.into()),
            column: column.into(),
            ascending,
            nulls_first,
        })
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sorts.push(sort);
        self
    }

    pub fn sorts(mut self, sorts: impl IntoIterator<Item = Sort>) -> Self {
        self.sorts.extend(sorts);
        self
    }

    /// Restrict the statement to the rows `from..=to`.
    pub fn range(self, from: u64, to: u64) -> Result<QueryModifier, Error> {
        QueryModifier::from(self).range(from, to)
    }

    pub fn paginate(self, pagination: Pagination) -> QueryModifier {
        QueryModifier {
            filter: self,
            pagination: Some(pagination),
        }
    }

    pub fn to_statement(&self, dialect: &dyn Dialect) -> Result<Statement, Error> {
        self.statement(None, dialect)
    }

    pub fn to_sql(&self, dialect: &dyn Dialect) -> Result<String, Error> {
        let sql = self.to_statement(dialect)?.render(dialect);
        debug!(action = self.action.name(), %sql, "built statement");
        Ok(sql)
    }

    fn statement(
        &self,
        pagination: Option<Pagination>,
        dialect: &dyn Dialect,
    ) -> Result<Statement, Error> {
        let table = TableRef::new(&self.table.schema, &self.table.name);
        let conditions = convert_filters(&self.filters, dialect)?;
        if pagination.is_some() && !matches!(self.action, Action::Select { .. }) {
            trace!(action = self.action.name(), "ignoring range");
        }
        let statement = match &self.action {
            Action::Select { columns } => {
                let mut sorting = SortingStack::new(&self.table.name);
                sorting.extend(&self.sorts, dialect);
                let mut select = Select::from(table);
                select.columns = select_columns(columns);
                select.conditions = conditions;
                select.sorting = sorting.into();
                select.limit = pagination.map(Into::into);
                Statement::Select(select)
            }
            Action::Count => {
                let mut select = Select::from(table);
                select.columns = vec![Column::from(agg::count_star())];
                select.conditions = conditions;
                Statement::Select(select)
            }
            Action::Delete { returning } => {
                if conditions.is_empty() {
                    debug!(table = %self.table.name, "delete without filters affects every row");
                }
                Statement::Delete(Delete {
                    table,
                    conditions,
                    returning: returning_columns(returning, dialect),
                })
            }
            Action::Insert { rows, returning } => {
                if rows.is_empty() {
                    return Err(Error::NoValues("insert"));
                }
                Statement::Insert(Insert {
                    table,
                    columns: rows.iter().flat_map(|r| r.keys()).unique().cloned().collect(),
                    payload: Value::from(rows.clone()).to_string(),
                    returning: returning_columns(returning, dialect),
                })
            }
            Action::Update { row, returning } => {
                if row.is_empty() {
                    return Err(Error::NoValues("update"));
                }
                if conditions.is_empty() {
                    return Err(Error::MissingFilters("update"));
                }
                Statement::Update(Update {
                    table,
                    columns: row.keys().cloned().collect(),
                    payload: Value::Object(row.clone()).to_string(),
                    conditions,
                    returning: returning_columns(returning, dialect),
                })
            }
            Action::Truncate { cascade } => Statement::Truncate(Truncate {
                table,
                cascade: *cascade,
            }),
        };
        Ok(statement)
    }
}

/// A query with a row window applied.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryModifier {
    filter: QueryFilter,
    pagination: Option<Pagination>,
}

impl From<QueryFilter> for QueryModifier {
    fn from(filter: QueryFilter) -> Self {
        Self {
            filter,
            pagination: None,
        }
    }
}

impl QueryModifier {
    pub fn range(mut self, from: u64, to: u64) -> Result<Self, Error> {
        self.pagination = Some(Pagination::from_range(from, to)?);
        Ok(self)
    }

    pub fn to_statement(&self, dialect: &dyn Dialect) -> Result<Statement, Error> {
        self.filter.statement(self.pagination, dialect)
    }

    pub fn to_sql(&self, dialect: &dyn Dialect) -> Result<String, Error> {
        let sql = self.to_statement(dialect)?.render(dialect);
        debug!(action = self.filter.action.name(), %sql, "built statement");
        Ok(sql)
    }
}

fn select_columns(columns: &str) -> Vec<Column> {
    let columns = columns.trim();
    if columns.is_empty() || columns == "*" {
        return vec![];
    }
    vec![Column::from(SqlExpr::atom(columns.to_string()))]
}

/// `*` followed by every enum array column cast to `text[]`.
pub(crate) fn returning_columns(options: &ReturningOptions, dialect: &dyn Dialect) -> Vec<Column> {
    if !options.returning {
        return vec![];
    }
    let star = Column::from(SqlExpr::atom("*".to_string()));
    let casts = options.enum_array_columns.iter().map(|c| {
        Column::from(dialect.text_array_cast(SqlExpr::atom(dialect.quote_identifier(c))))
    });
    std::iter::once(star).chain(casts).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::sql::Postgres;

    fn users() -> QueryAction {
        Query::from_public("users")
    }

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_select() {
        let d = Postgres();
        assert_eq!(users().select("*").to_sql(&d).unwrap(), "select * from public.users;");
        assert_eq!(
            Query::from("orders", "shop").select("").to_sql(&d).unwrap(),
            "select * from shop.orders;"
        );
        assert_eq!(
            users().select("id, name").filter("id", Operator::Eq, 1).to_sql(&d).unwrap(),
            "select id, name from public.users where id = 1;"
        );
    }

    #[test]
    fn test_select_chain() {
        let sql = users()
            .select("id, name")
            .filter("id", Operator::Gt, 10)
            .filter("name", Operator::Like, "%John%")
            .order("users", "name", true, false)
            .range(0, 9)
            .unwrap()
            .to_sql(&Postgres())
            .unwrap();
        assert_eq!(
            sql,
            "select id, name from public.users where id > 10 and name::text ~~ '%John%' order by users.name asc nulls last limit 10 offset 0;"
        );
    }

    #[test]
    fn test_paginate() {
        let query = users()
            .select("*")
            .paginate(Pagination::from_page(3, 10).unwrap());
        assert_eq!(
            query.to_sql(&Postgres()).unwrap(),
            "select * from public.users limit 10 offset 20;"
        );
        assert!(matches!(
            users().select("*").range(5, 4),
            Err(Error::InvalidPagination(_))
        ));
    }

    #[test]
    fn test_sorts() {
        let sql = users()
            .select("*")
            .order("users", "last_name", true, false)
            .order("users", "first_name", true, false)
            .order("users", "", true, false)
            .to_sql(&Postgres())
            .unwrap();
        assert_eq!(
            sql,
            "select * from public.users order by users.last_name asc nulls last, users.first_name asc nulls last;"
        );
    }

    #[test]
    fn test_count() {
        let sql = users()
            .count()
            .filter("active", Operator::Eq, true)
            .to_sql(&Postgres())
            .unwrap();
        assert_eq!(sql, "select count(*) from public.users where active = true;");
    }

    #[test]
    fn test_match_all() {
        let sql = users()
            .select("*")
            .match_all([("name", "John"), ("city", "Oslo")])
            .to_sql(&Postgres())
            .unwrap();
        assert_eq!(
            sql,
            "select * from public.users where name = 'John' and city = 'Oslo';"
        );
    }

    #[test]
    fn test_delete() {
        let d = Postgres();
        let sql = users()
            .delete(ReturningOptions::with_enum_arrays(["tags"]))
            .filter("id", Operator::Eq, 1)
            .to_sql(&d)
            .unwrap();
        assert_eq!(sql, "delete from public.users where id = 1 returning *, tags::text[];");
        let sql = users()
            .delete(ReturningOptions::default())
            .filter("id", Operator::Eq, 1)
            .to_sql(&d)
            .unwrap();
        assert_eq!(sql, "delete from public.users where id = 1;");
    }

    #[test]
    fn test_delete_without_filters_is_unconditional() {
        let sql = users()
            .delete(ReturningOptions::default())
            .to_sql(&Postgres())
            .unwrap();
        assert_eq!(sql, "delete from public.users;");
    }

    #[test]
    fn test_insert() {
        let d = Postgres();
        let rows = vec![row(json!({"id": 1, "name": "John O'Reilly"}))];
        let sql = users()
            .insert(rows, ReturningOptions::all())
            .to_sql(&d)
            .unwrap();
        assert_eq!(
            sql,
            r#"insert into public.users (id,name) select id,name from jsonb_populate_recordset(null::public.users, '[{"id":1,"name":"John O''Reilly"}]') returning *;"#
        );
        assert_eq!(
            users().insert(vec![], ReturningOptions::all()).to_sql(&d),
            Err(Error::NoValues("insert"))
        );
    }

    #[test]
    fn test_insert_column_union() {
        let rows = vec![row(json!({"id": 1})), row(json!({"name": "a", "id": 2}))];
        let sql = users()
            .insert(rows, ReturningOptions::default())
            .to_sql(&Postgres())
            .unwrap();
        assert!(sql.starts_with("insert into public.users (id,name) select id,name from"));
    }

    #[test]
    fn test_update() {
        let d = Postgres();
        let sql = users()
            .update(row(json!({"name": "John"})), ReturningOptions::with_enum_arrays(["tags"]))
            .filter("id", Operator::Eq, 1)
            .to_sql(&d)
            .unwrap();
        assert_eq!(
            sql,
            r#"update public.users set (name) = (select name from json_populate_record(null::public.users, '{"name":"John"}')) where id = 1 returning *, tags::text[];"#
        );
        assert_eq!(
            users()
                .update(row(json!({"name": "John"})), ReturningOptions::default())
                .to_sql(&d),
            Err(Error::MissingFilters("update"))
        );
    }

    #[test]
    fn test_truncate() {
        let d = Postgres();
        assert_eq!(users().truncate(false).to_sql(&d).unwrap(), "truncate public.users;");
        assert_eq!(
            users().truncate(true).to_sql(&d).unwrap(),
            "truncate public.users cascade;"
        );
    }

    #[test]
    fn test_quoted_names() {
        let sql = Query::from_public("table with spaces")
            .select(r#""column with spaces""#)
            .filter("column with spaces", Operator::Eq, "test value")
            .to_sql(&Postgres())
            .unwrap();
        assert_eq!(
            sql,
            r#"select "column with spaces" from public."table with spaces" where "column with spaces" = 'test value';"#
        );
    }
}
