pub fn not_json(what: &str, err: impl std::fmt::Display) -> String {
    format!("{what} is not valid JSON ({err}).")
}

pub fn duplicate_column(column_name: &str, table_name: &str) -> String {
    format!("Column `{column_name}` appears more than once in table `{table_name}`.")
}

pub fn zero_limit() -> String {
    "Page size must be greater than zero.".to_string()
}

pub fn inverted_range(from: u64, to: u64) -> String {
    format!("Range end {to} is before range start {from}.")
}

pub fn reserved_delimiter(name: &str, delimiter: char) -> String {
    format!("The {name} delimiter `{delimiter}` collides with the token separators.")
}

pub fn numeric_delimiter(delimiter: char) -> String {
    format!("The slider delimiter `{delimiter}` is part of number syntax.")
}

pub fn shared_delimiter(a: &str, b: &str, delimiter: char) -> String {
    format!("The {a} and {b} delimiters are both `{delimiter}`.")
}

pub fn unknown_dialect(name: &str) -> String {
    format!("Unknown dialect `{name}`.")
}
