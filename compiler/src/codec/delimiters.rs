use itertools::Itertools;
use rowquery_parser::tokens::{
    ARRAY_DELIMITER, KEY_VALUE_SEPARATOR, RANGE_DELIMITER, SLIDER_DELIMITER, SORT_DELIMITER,
    TOKEN_SEPARATOR,
};
use serde::{Deserialize, Serialize};

use crate::errors::{msg, Error};

/// The characters joining the parts of encoded filter values.
///
/// Persisted URLs depend on these, so changing them breaks old links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delimiters {
    pub array: char,
    pub slider: char,
    pub range: char,
    pub sort: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            array: ARRAY_DELIMITER,
            slider: SLIDER_DELIMITER,
            range: RANGE_DELIMITER,
            sort: SORT_DELIMITER,
        }
    }
}

impl Delimiters {
    /// The value delimiters must differ from each other and from the token separators. The sort
    /// delimiter lives in its own parameter and may repeat one of them. The slider delimiter
    /// can't be a digit or the decimal point.
    pub fn validate(&self) -> Result<(), Error> {
        let named = [
            ("array", self.array),
            ("slider", self.slider),
            ("range", self.range),
            ("sort", self.sort),
        ];
        for (name, delimiter) in named {
            if delimiter == TOKEN_SEPARATOR
                || delimiter == KEY_VALUE_SEPARATOR
                || delimiter.is_whitespace()
            {
                return Err(Error::InvalidConfig(msg::reserved_delimiter(name, delimiter)));
            }
        }
        if self.slider == '.' || self.slider.is_ascii_digit() {
            return Err(Error::InvalidConfig(msg::numeric_delimiter(self.slider)));
        }
        for ((a, x), (b, y)) in named[..3].iter().tuple_combinations() {
            if x == y {
                return Err(Error::InvalidConfig(msg::shared_delimiter(a, b, *x)));
            }
        }
        Ok(())
    }
}
