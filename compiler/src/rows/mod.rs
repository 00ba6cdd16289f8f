mod coercion;
mod projection;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    errors::Error,
    options::Options,
    query::{
        convert_filters, rendering::Render, returning_columns, Filter, Pagination,
        ReturningOptions, Sort, SortingStack,
    },
    schema::Table,
    sql::{
        expr::build::agg,
        tree::{Column, Cte, Delete, Select, SqlExpr, Statement, TableRef},
    },
};

pub use coercion::coerce_numeric;

const BASE_QUERY_ALIAS: &str = "_base_query";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Select,
    Count,
    Delete,
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OperationKind::Select => "select",
            OperationKind::Count => "count",
            OperationKind::Delete => "delete",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RowsRequest {
    pub filters: Vec<Filter>,
    pub sorts: Vec<Sort>,
    /// 1-based.
    pub page: u64,
    pub limit: u64,
    /// Order by the table's default columns when no sort is given.
    pub sort_by_default: bool,
}

impl Default for RowsRequest {
    fn default() -> Self {
        Self {
            filters: vec![],
            sorts: vec![],
            page: 1,
            limit: 100,
            sort_by_default: false,
        }
    }
}

/// Primary keys that are not excluded, or else the first sortable column.
pub fn default_order_by_columns(table: &Table, excluded: &[&str]) -> Vec<String> {
    let keys = table
        .primary_keys
        .iter()
        .filter(|k| !excluded.contains(&k.as_str()))
        .cloned()
        .collect::<Vec<_>>();
    if !keys.is_empty() {
        return keys;
    }
    table
        .columns_in_order()
        .into_iter()
        .find(|c| c.is_sortable() && !excluded.contains(&c.name.as_str()))
        .map(|c| vec![c.name.clone()])
        .unwrap_or_default()
}

/// Builds the row statements of the table grid from column descriptors.
pub struct RowQuery<'a> {
    table: &'a Table,
    options: &'a Options,
}

impl<'a> RowQuery<'a> {
    pub fn new(table: &'a Table, options: &'a Options) -> Self {
        Self { table, options }
    }

    pub fn build(&self, kind: OperationKind, request: &RowsRequest) -> Result<String, Error> {
        let statement = match kind {
            OperationKind::Select => self.select_statement(request)?,
            OperationKind::Count => self.count_statement(request)?,
            OperationKind::Delete => self.delete_statement(request)?,
        };
        let sql = statement.render(self.options.dialect.as_ref());
        debug!(table = %self.table.name, %kind, %sql, "built rows statement");
        Ok(sql)
    }

    pub fn select(&self, request: &RowsRequest) -> Result<String, Error> {
        self.build(OperationKind::Select, request)
    }

    pub fn count(&self, request: &RowsRequest) -> Result<String, Error> {
        self.build(OperationKind::Count, request)
    }

    /// Deletes every matching row. Without a filter that is every row in the table.
    pub fn delete(&self, request: &RowsRequest) -> Result<String, Error> {
        self.build(OperationKind::Delete, request)
    }

    fn table_ref(&self) -> TableRef {
        TableRef::new(&self.table.schema, &self.table.name)
    }

    fn select_statement(&self, request: &RowsRequest) -> Result<Statement, Error> {
        let dialect = self.options.dialect.as_ref();
        let pagination = Pagination::from_page(request.page, request.limit)?;

        let mut sorting = SortingStack::new(&self.table.name);
        sorting.extend(&request.sorts, dialect);
        if request.sort_by_default && request.sorts.iter().all(|s| s.column.is_empty()) {
            let defaults = default_order_by_columns(self.table, &[])
                .into_iter()
                .map(Sort::asc)
                .collect::<Vec<_>>();
            sorting.extend(&defaults, dialect);
        }

        let mut base = Select::from(self.table_ref());
        base.conditions = self.conditions(request)?;
        base.sorting = sorting.into();
        base.limit = Some(pagination.into());

        let mut select = Select::from(TableRef::alias(BASE_QUERY_ALIAS));
        select.ctes.push(Cte {
            alias: BASE_QUERY_ALIAS.to_string(),
            select: base,
        });
        select.columns = projection::projection(self.table, &self.options.cell_limits, dialect);
        Ok(Statement::Select(select))
    }

    fn count_statement(&self, request: &RowsRequest) -> Result<Statement, Error> {
        let mut select = Select::from(self.table_ref());
        select.columns = vec![Column::from(agg::count_star())];
        select.conditions = self.conditions(request)?;
        Ok(Statement::Select(select))
    }

    fn delete_statement(&self, request: &RowsRequest) -> Result<Statement, Error> {
        let returning = ReturningOptions::with_enum_arrays(self.table.enum_array_columns());
        let conditions = self.conditions(request)?;
        if conditions.is_empty() {
            debug!(table = %self.table.name, "delete without filters affects every row");
        }
        Ok(Statement::Delete(Delete {
            table: self.table_ref(),
            conditions,
            returning: returning_columns(&returning, self.options.dialect.as_ref()),
        }))
    }

    fn conditions(&self, request: &RowsRequest) -> Result<SqlExpr, Error> {
        let filters = coercion::coerce_filters(&request.filters, self.table, self.options);
        convert_filters(&filters, self.options.dialect.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{query::Operator, tests::test_utils::get_test_resource};

    fn users() -> Table {
        Table::from_json(&get_test_resource("users.json")).unwrap()
    }

    fn request(filters: Vec<Filter>) -> RowsRequest {
        RowsRequest {
            filters,
            ..RowsRequest::default()
        }
    }

    #[test]
    fn test_select() {
        let table = users();
        let options = Options::default();
        let sql = RowQuery::new(&table, &options)
            .select(&RowsRequest {
                filters: vec![Filter::new("name", Operator::Like, "Test%")],
                sorts: vec![Sort::asc("name"), Sort::desc("id")],
                page: 2,
                limit: 10,
                sort_by_default: false,
            })
            .unwrap();
        assert!(sql.starts_with(
            "with _base_query as (select * from public.users where name::text ~~ 'Test%' order by users.name asc nulls last, users.id desc nulls last limit 10 offset 10) select id, case when octet_length(name::text) > 10240 then left(name::text, 10240) || '...' else name::text end as name, age, status, "
        ));
        assert!(sql.ends_with(", created_at from _base_query;"));
    }

    #[test]
    fn test_select_default_order() {
        let table = users();
        let options = Options::default();
        let query = RowQuery::new(&table, &options);
        let mut req = request(vec![]);
        assert!(query.select(&req).unwrap().contains("from public.users limit 100 offset 0)"));
        req.sort_by_default = true;
        assert!(query
            .select(&req)
            .unwrap()
            .contains("from public.users order by users.id asc nulls last limit 100 offset 0)"));
    }

    #[test]
    fn test_numeric_coercion() {
        let table = users();
        let options = Options::default();
        let query = RowQuery::new(&table, &options);
        assert_eq!(
            query.count(&request(vec![Filter::new("age", Operator::Eq, "42")])).unwrap(),
            "select count(*) from public.users where age = 42;"
        );
        assert_eq!(
            query.count(&request(vec![Filter::new("age", Operator::Eq, "abc")])).unwrap(),
            "select count(*) from public.users where age = 'abc';"
        );
        assert_eq!(
            query.count(&request(vec![Filter::new("name", Operator::Eq, "42")])).unwrap(),
            "select count(*) from public.users where name = '42';"
        );
    }

    #[test]
    fn test_delete() {
        let table = users();
        let options = Options::default();
        let query = RowQuery::new(&table, &options);
        assert_eq!(
            query.delete(&request(vec![Filter::new("id", Operator::Eq, "1")])).unwrap(),
            "delete from public.users where id = 1 returning *, history::text[];"
        );
        assert_eq!(
            query.delete(&request(vec![])).unwrap(),
            "delete from public.users returning *, history::text[];"
        );
    }

    #[test]
    fn test_invalid_page_size() {
        let table = users();
        let options = Options::default();
        let req = RowsRequest {
            limit: 0,
            ..RowsRequest::default()
        };
        assert!(matches!(
            RowQuery::new(&table, &options).build(OperationKind::Select, &req),
            Err(Error::InvalidPagination(_))
        ));
    }

    #[test]
    fn test_default_order_by_columns() {
        let table = users();
        assert_eq!(default_order_by_columns(&table, &[]), vec!["id"]);
        assert_eq!(default_order_by_columns(&table, &["id"]), vec!["name"]);
        let empty = Table::from_json(r#"{"name": "t"}"#).unwrap();
        assert!(default_order_by_columns(&empty, &[]).is_empty());
    }

    #[test]
    fn test_request_from_json() {
        let req: RowsRequest = serde_json::from_str(
            r#"{"filters": [{"column": "age", "operator": ">", "value": "30"}], "page": 3, "limit": 10}"#,
        )
        .unwrap();
        assert_eq!(req.page, 3);
        assert_eq!(req.filters[0].operator, Operator::Gt);
        assert!(!req.sort_by_default);
    }
}
