use rowquery_parser::ast::Scalar;
use tracing::trace;

use crate::{
    options::Options,
    query::{Filter, FilterColumn},
    schema::Table,
};

/// Numeric text becomes a number. Anything else, including text that only partly looks numeric,
/// is kept verbatim so that it is still inlined as written.
pub fn coerce_numeric(value: Scalar) -> Scalar {
    match value {
        Scalar::Text(text) => match text.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Scalar::Number(n),
            _ => Scalar::Text(text),
        },
        other => other,
    }
}

/// Resolve each filter's column against the table and coerce values aimed at numeric columns.
/// Columns the table does not describe pass through untouched.
pub fn coerce_filters(filters: &[Filter], table: &Table, options: &Options) -> Vec<Filter> {
    filters
        .iter()
        .map(|filter| {
            let FilterColumn::Single(name) = &filter.column else {
                return filter.clone();
            };
            let Some(column) = table.get_column(name, options) else {
                trace!(column = %name, table = %table.name, "filter column is not described");
                return filter.clone();
            };
            let value = match &filter.value {
                Some(value) if column.is_numeric() => {
                    trace!(column = %column.name, "coercing numeric filter value");
                    Some(value.clone().map_scalars(coerce_numeric))
                }
                other => other.clone(),
            };
            Filter {
                column: FilterColumn::Single(column.name.clone()),
                operator: filter.operator,
                value,
            }
        })
        .collect()
}
