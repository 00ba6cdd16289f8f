mod dialect;
mod postgres;

pub mod expr;
pub mod tree;

pub use dialect::*;
pub use postgres::*;
