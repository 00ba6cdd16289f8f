mod codec;
mod errors;
mod facets;
mod options;
mod query;
mod rows;
mod schema;
mod sql;
mod utils;

pub use codec::{
    ColumnFilter, Delimiters, FieldKind, FieldOption, FilterCodec, FilterField, SortParam,
    ValueParser,
};
pub use errors::Error;
pub use facets::{aggregate_facets, FacetKey, FacetMetadata, FacetRow};
pub use options::{CellLimits, Config, DialectName, IdentifierResolution, Options};
pub use query::{
    rendering::Render, Filter, FilterColumn, Operator, Pagination, Query, QueryAction,
    QueryFilter, QueryModifier, QueryTable, ReturningOptions, Row, Sort, DEFAULT_SCHEMA,
};
pub use rows::{coerce_numeric, default_order_by_columns, OperationKind, RowQuery, RowsRequest};
pub use rowquery_parser::ast::{FilterValue, Scalar, ScalarKind};
pub use schema::{Column, PrimitiveColumn, PrimitivePrimaryKey, PrimitiveTable, Table};
pub use sql::{tree::Statement, Dialect, Postgres};
