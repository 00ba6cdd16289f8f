use itertools::Itertools;

use crate::sql::{tree::*, Dialect};

pub trait Render {
    fn render(&self, dialect: &dyn Dialect) -> String;
}

impl Render for SqlExpr {
    fn render(&self, _: &dyn Dialect) -> String {
        self.to_string()
    }
}

impl Render for TableRef {
    fn render(&self, dialect: &dyn Dialect) -> String {
        match &self.schema {
            Some(schema) => dialect.qualified_table(schema, &self.name),
            None => dialect.quote_identifier(&self.name),
        }
    }
}

impl Render for Statement {
    fn render(&self, dialect: &dyn Dialect) -> String {
        let body = match self {
            Statement::Select(s) => s.render(dialect),
            Statement::Delete(d) => d.render(dialect),
            Statement::Insert(i) => i.render(dialect),
            Statement::Update(u) => u.render(dialect),
            Statement::Truncate(t) => t.render(dialect),
        };
        format!("{body};")
    }
}

impl Render for Select {
    fn render(&self, dialect: &dyn Dialect) -> String {
        let ctes = self.ctes.render(dialect);
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.render(dialect)
        };
        let main = format!("select {columns} from {}", self.table.render(dialect));
        let order = if self.sorting.is_empty() {
            String::new()
        } else {
            format!("order by {}", self.sorting.render(dialect))
        };
        let limit = self
            .limit
            .map(|l| format!("limit {} offset {}", l.limit, l.offset))
            .unwrap_or_default();
        [ctes, main, where_clause(&self.conditions), order, limit]
            .into_iter()
            .filter(|s| !s.is_empty())
            .join(" ")
    }
}

impl Render for Vec<Cte> {
    fn render(&self, dialect: &dyn Dialect) -> String {
        if self.is_empty() {
            return String::new();
        }
        let ctes = self.iter().map(|cte| cte.render(dialect)).join(", ");
        format!("with {ctes}")
    }
}

impl Render for Cte {
    fn render(&self, dialect: &dyn Dialect) -> String {
        let alias = dialect.quote_identifier(&self.alias);
        format!("{alias} as ({})", self.select.render(dialect))
    }
}

impl Render for Vec<Column> {
    fn render(&self, dialect: &dyn Dialect) -> String {
        self.iter()
            .map(|c| c.render(dialect))
            .filter(|s| !s.is_empty())
            .join(", ")
    }
}

impl Render for Column {
    fn render(&self, dialect: &dyn Dialect) -> String {
        let alias = self
            .alias
            .as_ref()
            .map(|a| format!(" as {}", dialect.quote_identifier(a)))
            .unwrap_or_default();
        format!("{}{}", self.expr, alias)
    }
}

impl Render for Vec<SortEntry> {
    fn render(&self, dialect: &dyn Dialect) -> String {
        self.iter().map(|s| s.render(dialect)).join(", ")
    }
}

impl Render for SortEntry {
    fn render(&self, _: &dyn Dialect) -> String {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        let nulls_sort = match self.nulls_sort {
            NullsSort::First => "nulls first",
            NullsSort::Last => "nulls last",
        };
        format!("{} {} {}", self.expr, direction, nulls_sort)
    }
}

impl Render for Delete {
    fn render(&self, dialect: &dyn Dialect) -> String {
        [
            format!("delete from {}", self.table.render(dialect)),
            where_clause(&self.conditions),
            returning_clause(&self.returning, dialect),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .join(" ")
    }
}

impl Render for Insert {
    fn render(&self, dialect: &dyn Dialect) -> String {
        let table = self.table.render(dialect);
        let columns = column_list(&self.columns, dialect);
        let payload = dialect.quote_string(&self.payload);
        let insert = format!(
            "insert into {table} ({columns}) select {columns} from jsonb_populate_recordset(null::{table}, {payload})"
        );
        [insert, returning_clause(&self.returning, dialect)]
            .into_iter()
            .filter(|s| !s.is_empty())
            .join(" ")
    }
}

impl Render for Update {
    fn render(&self, dialect: &dyn Dialect) -> String {
        let table = self.table.render(dialect);
        let columns = column_list(&self.columns, dialect);
        let payload = dialect.quote_string(&self.payload);
        let update = format!(
            "update {table} set ({columns}) = (select {columns} from json_populate_record(null::{table}, {payload}))"
        );
        [
            update,
            where_clause(&self.conditions),
            returning_clause(&self.returning, dialect),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .join(" ")
    }
}

impl Render for Truncate {
    fn render(&self, dialect: &dyn Dialect) -> String {
        let table = self.table.render(dialect);
        if self.cascade {
            format!("truncate {table} cascade")
        } else {
            format!("truncate {table}")
        }
    }
}

fn where_clause(conditions: &SqlExpr) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("where {conditions}")
    }
}

fn returning_clause(returning: &Vec<Column>, dialect: &dyn Dialect) -> String {
    if returning.is_empty() {
        String::new()
    } else {
        format!("returning {}", returning.render(dialect))
    }
}

fn column_list(columns: &[String], dialect: &dyn Dialect) -> String {
    columns.iter().map(|c| dialect.quote_identifier(c)).join(",")
}
