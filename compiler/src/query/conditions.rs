use rowquery_parser::ast::{FilterValue, Scalar};
use tracing::trace;

use crate::{
    errors::Error,
    sql::{
        expr::build::{cmp, value},
        tree::SqlExpr,
        Dialect, PatternFlags,
    },
};

use super::types::{Filter, FilterColumn, Operator};

const LIST_SEPARATOR: char = ',';

/// All active filters joined with `and`.
pub fn convert_filters<'a>(
    filters: impl IntoIterator<Item = &'a Filter>,
    dialect: &dyn Dialect,
) -> Result<SqlExpr, Error> {
    let conditions = filters
        .into_iter()
        .map(|f| convert_filter(f, dialect))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cmp::and(conditions))
}

/// A filter without an active value converts to an empty expression.
pub fn convert_filter(filter: &Filter, dialect: &dyn Dialect) -> Result<SqlExpr, Error> {
    let Some(value) = filter.active_value() else {
        trace!(column = ?filter.column, "skipping filter without a value");
        return Ok(SqlExpr::empty());
    };
    match &filter.column {
        FilterColumn::Single(column) => convert_single(column, filter.operator, value, dialect),
        FilterColumn::Tuple(columns) => convert_tuple(columns, filter.operator, value, dialect),
    }
}

fn literals<'a, I>(
    items: I,
    dialect: &'a dyn Dialect,
) -> impl Iterator<Item = SqlExpr> + 'a
where
    I: IntoIterator<Item = &'a Scalar>,
    I::IntoIter: 'a,
{
    items.into_iter().map(move |s| dialect.literal(s))
}

fn split_text(text: &str) -> impl Iterator<Item = Scalar> + '_ {
    text.split(LIST_SEPARATOR).map(Scalar::text)
}

/// The raw text following `is`, e.g. `null`, `not null` or `true`.
fn is_keyword(value: &Scalar) -> String {
    value.to_string()
}

fn convert_single(
    column: &str,
    operator: Operator,
    value: &FilterValue,
    dialect: &dyn Dialect,
) -> Result<SqlExpr, Error> {
    let col = SqlExpr::atom(dialect.quote_identifier(column));
    let unsupported = || Error::UnsupportedValue {
        operator: operator.symbol(),
        column: column.to_string(),
    };
    let expr = match operator {
        Operator::Eq
        | Operator::Neq
        | Operator::Gt
        | Operator::Gte
        | Operator::Lt
        | Operator::Lte => {
            let rhs = match value {
                FilterValue::Scalar(s) => dialect.literal(s),
                FilterValue::Rows(_) => return Err(unsupported()),
                other => {
                    let items = other.elements().ok_or_else(unsupported)?;
                    value::array(literals(items, dialect))
                }
            };
            cmp::comparison(col, operator.symbol(), rhs)
        }
        Operator::Like | Operator::ILike | Operator::NotLike | Operator::NotILike => {
            let FilterValue::Scalar(pattern) = value else {
                return Err(unsupported());
            };
            let is_positive = matches!(operator, Operator::Like | Operator::ILike);
            let flags = PatternFlags {
                is_case_sensitive: matches!(operator, Operator::Like | Operator::NotLike),
            };
            dialect.match_pattern(
                dialect.text_cast(col),
                dialect.literal(pattern),
                is_positive,
                &flags,
            )
        }
        Operator::In => match value {
            FilterValue::Scalar(Scalar::Text(text)) => {
                let items = split_text(text).collect::<Vec<_>>();
                cmp::in_list(col, literals(&items, dialect))
            }
            FilterValue::Scalar(s) => cmp::in_list(col, [dialect.literal(s)]),
            FilterValue::Rows(_) => return Err(unsupported()),
            other => {
                let items = other.elements().ok_or_else(unsupported)?;
                cmp::in_list(col, literals(items, dialect))
            }
        },
        Operator::Is => match value {
            FilterValue::Scalar(s) => cmp::is(col, &is_keyword(s)),
            _ => return Err(unsupported()),
        },
        Operator::Range => {
            let (a, b) = value.as_pair().ok_or_else(unsupported)?;
            cmp::and([
                cmp::gte(col.clone(), dialect.literal(a)),
                cmp::lte(col, dialect.literal(b)),
            ])
        }
        Operator::Contains => match value {
            FilterValue::Scalar(s) => dialect.match_pattern(
                dialect.text_cast(col),
                dialect.literal(&Scalar::Text(format!("%{s}%"))),
                true,
                &PatternFlags {
                    is_case_sensitive: false,
                },
            ),
            FilterValue::Rows(_) => return Err(unsupported()),
            other => {
                let items = other.elements().ok_or_else(unsupported)?;
                cmp::contains(col, value::array(literals(items, dialect)))
            }
        },
    };
    Ok(expr)
}

fn convert_tuple(
    columns: &[String],
    operator: Operator,
    value: &FilterValue,
    dialect: &dyn Dialect,
) -> Result<SqlExpr, Error> {
    if !operator.supports_tuples() {
        return Err(Error::UnsupportedTupleOperator(operator.symbol()));
    }
    let row = |items: Vec<Scalar>| -> Result<SqlExpr, Error> {
        if items.len() != columns.len() {
            return Err(Error::TupleLengthMismatch);
        }
        Ok(value::row(literals(&items, dialect)))
    };
    let lhs = value::row(
        columns
            .iter()
            .map(|c| SqlExpr::atom(dialect.quote_identifier(c))),
    );
    let rhs = if operator == Operator::In {
        let rows = match value {
            FilterValue::Rows(rows) => rows.clone(),
            FilterValue::List(items) => items
                .iter()
                .map(|item| {
                    item.as_text()
                        .map(|text| split_text(text).collect())
                        .ok_or(Error::TupleValueNotList)
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => return Err(Error::TupleValueNotList),
        };
        value::row(rows.into_iter().map(row).collect::<Result<Vec<_>, _>>()?)
    } else {
        let items = value.elements().ok_or(Error::TupleValueNotList)?;
        row(items.into_iter().cloned().collect())?
    };
    Ok(cmp::comparison(lhs, operator.symbol(), rhs))
}
