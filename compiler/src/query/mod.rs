mod conditions;
mod query;
mod sorting;
mod types;

pub mod rendering;

pub(crate) use conditions::convert_filters;
pub(crate) use query::returning_columns;
pub use query::{Query, QueryAction, QueryFilter, QueryModifier, Row};
pub(crate) use sorting::SortingStack;
pub use types::*;
