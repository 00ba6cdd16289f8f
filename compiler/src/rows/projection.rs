use rowquery_parser::ast::Scalar;

use crate::{
    options::CellLimits,
    schema::{Column as TableColumn, Table},
    sql::{
        expr::build::{arrays, cmp, cond, strings, value},
        tree::{Column, SqlExpr},
        Dialect,
    },
};

const ELLIPSIS: &str = "...";

/// Appended to cut down `json` and `jsonb` arrays in place of the ellipsis.
const JSON_TRUNCATION_MARKER: &str = r#"{"truncated": true}"#;

/// The select list used on top of a page of rows, with large values cut down to `limits`.
pub fn projection(table: &Table, limits: &CellLimits, dialect: &dyn Dialect) -> Vec<Column> {
    table
        .columns_in_order()
        .into_iter()
        .map(|c| project_column(c, limits, dialect))
        .collect()
}

fn project_column(column: &TableColumn, limits: &CellLimits, dialect: &dyn Dialect) -> Column {
    let col = SqlExpr::atom(dialect.quote_identifier(&column.name));
    let too_long = cmp::gt(
        strings::octet_length(dialect.text_cast(col.clone())),
        value::number(limits.max_characters),
    );
    let expr = if column.is_array() {
        cond::case_when(
            too_long,
            truncated_array(col.clone(), column.array_element_type(), limits, dialect),
            dialect.cast(col, &array_type(column.array_element_type())),
        )
    } else if column.is_truncatable() {
        let text = dialect.text_cast(col);
        cond::case_when(
            too_long,
            strings::concat(
                strings::left(text.clone(), limits.max_characters),
                dialect.literal(&Scalar::text(ELLIPSIS)),
            ),
            text,
        )
    } else {
        return Column::from(col);
    };
    Column::new(expr, Some(column.name.clone()))
}

fn array_type(element_type: &str) -> String {
    format!("{element_type}[]")
}

/// One dimensional arrays keep their first elements followed by a marker element. Other arrays
/// are only sliced.
fn truncated_array(
    col: SqlExpr,
    element_type: &str,
    limits: &CellLimits,
    dialect: &dyn Dialect,
) -> SqlExpr {
    let array_type = array_type(element_type);
    let slice = dialect.cast(
        dialect.array_slice(col.clone(), limits.max_array_elements),
        &array_type,
    );
    let marker = match element_type {
        "json" | "jsonb" => {
            dialect.cast(dialect.literal(&Scalar::text(JSON_TRUNCATION_MARKER)), "json")
        }
        _ => dialect.literal(&Scalar::text(ELLIPSIS)),
    };
    let appended = dialect.cast(
        value::subquery(arrays::cat(
            slice.clone(),
            dialect.cast(value::array([marker]), &array_type),
        )),
        &array_type,
    );
    cond::case_when(
        cmp::comparison(arrays::ndims(col), "=", value::number(1)),
        appended,
        slice,
    )
}
