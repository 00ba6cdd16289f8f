mod utils;
mod value;

pub use value::{list, slider, timerange};
