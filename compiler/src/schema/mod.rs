mod primitive_schema;
mod table;

pub use primitive_schema::*;
pub use table::*;
