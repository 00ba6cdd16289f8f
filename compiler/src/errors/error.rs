use thiserror::Error;

/// Everything that can go wrong while building SQL or loading configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid table description: {0}")]
    InvalidSchema(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Tuple filter value must be an array")]
    TupleValueNotList,

    #[error("Tuple filter value must have the same length as the column array")]
    TupleLengthMismatch,

    #[error("Operator `{0}` cannot be used in a tuple filter")]
    UnsupportedTupleOperator(&'static str),

    #[error("Operator `{operator}` does not accept this value for column `{column}`")]
    UnsupportedValue {
        operator: &'static str,
        column: String,
    },

    #[error("{0} requires at least one value")]
    NoValues(&'static str),

    #[error("{0} requires at least one filter")]
    MissingFilters(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_error_display() {
        assert_eq!(
            Error::TupleLengthMismatch.to_string(),
            "Tuple filter value must have the same length as the column array"
        );
        assert_eq!(
            Error::UnsupportedTupleOperator("is").to_string(),
            "Operator `is` cannot be used in a tuple filter"
        );
    }

    #[test]
    fn test_unsupported_value_display() {
        let err = Error::UnsupportedValue {
            operator: "range",
            column: "age".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Operator `range` does not accept this value for column `age`"
        );
    }

    #[test]
    fn test_missing_filters_display() {
        assert_eq!(
            Error::MissingFilters("update").to_string(),
            "update requires at least one filter"
        );
    }
}
