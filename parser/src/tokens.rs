/// Separates tokens within a serialized filter string.
pub const TOKEN_SEPARATOR: char = ' ';

/// Separates a column name from its encoded value within a token.
pub const KEY_VALUE_SEPARATOR: char = ':';

pub const ARRAY_DELIMITER: char = '.';
pub const SLIDER_DELIMITER: char = '-';
pub const RANGE_DELIMITER: char = '~';
pub const SORT_DELIMITER: char = '.';

pub const SORT_ASC: &str = "asc";
pub const SORT_DESC: &str = "desc";

pub const LITERAL_TRUE: &str = "true";
pub const LITERAL_FALSE: &str = "false";
