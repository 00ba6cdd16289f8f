use itertools::Itertools;
use tracing::trace;

use crate::sql::{
    tree::{NullsSort, SortDirection, SortEntry, SqlExpr},
    Dialect,
};

use super::types::Sort;

struct KeyedSortEntry {
    table: String,
    column: String,
    entry: SortEntry,
}

/// Collects sorts in the order they were given. A column sorted more than once keeps only its
/// last sort, in the position of that last sort.
pub struct SortingStack<'a> {
    default_table: &'a str,
    entries: Vec<KeyedSortEntry>,
}

impl<'a> SortingStack<'a> {
    pub fn new(default_table: &'a str) -> Self {
        Self {
            default_table,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, sort: &Sort, dialect: &dyn Dialect) {
        if sort.column.is_empty() {
            trace!("ignoring sort without a column");
            return;
        }
        let table = sort.table.as_deref().unwrap_or(self.default_table);
        let entry = SortEntry {
            expr: SqlExpr::atom(dialect.table_column(table, &sort.column)),
            direction: if sort.ascending {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            },
            nulls_sort: if sort.nulls_first {
                NullsSort::First
            } else {
                NullsSort::Last
            },
        };
        self.entries.push(KeyedSortEntry {
            table: table.to_string(),
            column: sort.column.clone(),
            entry,
        });
    }

    pub fn extend<'s>(&mut self, sorts: impl IntoIterator<Item = &'s Sort>, dialect: &dyn Dialect) {
        for sort in sorts {
            self.push(sort, dialect);
        }
    }
}

impl From<SortingStack<'_>> for Vec<SortEntry> {
    fn from(stack: SortingStack) -> Self {
        let mut entries = stack
            .entries
            .into_iter()
            .rev()
            .unique_by(|e| (e.table.clone(), e.column.clone()))
            .map(|e| e.entry)
            .collect::<Vec<_>>();
        entries.reverse();
        entries
    }
}
