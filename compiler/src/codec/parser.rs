use rowquery_parser::{
    ast::{FilterValue, Scalar},
    parse_list, parse_slider, parse_timerange,
};

use super::{
    delimiters::Delimiters,
    field::{FieldKind, FilterField},
};

/// Turns the raw value of one `name:value` token into a filter value.
pub trait ValueParser {
    fn parse_value(&self, raw: &str, delimiters: &Delimiters) -> Result<FilterValue, String>;
}

impl ValueParser for FilterField {
    fn parse_value(&self, raw: &str, delimiters: &Delimiters) -> Result<FilterValue, String> {
        match &self.kind {
            FieldKind::Input => Ok(FilterValue::Scalar(Scalar::infer(raw))),
            FieldKind::Checkbox { scalar, .. } => {
                parse_list(raw, delimiters.array, *scalar).map(FilterValue::List)
            }
            FieldKind::Slider { .. } => parse_slider(raw, delimiters.slider)
                .map(|(a, b)| FilterValue::List(vec![Scalar::Number(a), Scalar::Number(b)])),
            FieldKind::Timerange => parse_timerange(raw, delimiters.range)
                .map(|(a, b)| FilterValue::List(vec![Scalar::Timestamp(a), Scalar::Timestamp(b)])),
        }
    }
}

impl<F> ValueParser for F
where
    F: Fn(&str) -> Result<FilterValue, String>,
{
    fn parse_value(&self, raw: &str, _: &Delimiters) -> Result<FilterValue, String> {
        self(raw)
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use rowquery_parser::ast::ScalarKind;

    use super::*;

    fn parse(field: FilterField, raw: &str) -> Result<FilterValue, String> {
        field.parse_value(raw, &Delimiters::default())
    }

    #[test]
    fn test_input() {
        assert_eq!(parse(FilterField::input("a"), "42"), Ok(FilterValue::from(42)));
        assert_eq!(parse(FilterField::input("a"), "true"), Ok(FilterValue::from(true)));
        assert_eq!(parse(FilterField::input("a"), "db-1"), Ok(FilterValue::from("db-1")));
    }

    #[test]
    fn test_checkbox() {
        let field = FilterField::checkbox("status", ScalarKind::Number);
        assert_eq!(
            parse(field.clone(), "200.404"),
            Ok([200, 404].into_iter().collect::<FilterValue>())
        );
        assert!(parse(field, "200.ok").is_err());
        let field = FilterField::checkbox("level", ScalarKind::Text);
        assert_eq!(
            parse(field, "error.warn"),
            Ok(["error", "warn"].into_iter().collect::<FilterValue>())
        );
    }

    #[test]
    fn test_slider() {
        let field = FilterField::slider("latency", -100.0, 100.0);
        assert_eq!(
            parse(field.clone(), "-5--1"),
            Ok([-5, -1].into_iter().collect::<FilterValue>())
        );
        assert!(parse(field, "5").is_err());
    }

    #[test]
    fn test_timerange() {
        let field = FilterField::timerange("date");
        let a = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let b = DateTime::from_timestamp_millis(1_700_000_600_000).unwrap();
        assert_eq!(
            parse(field.clone(), "1700000000000~1700000600000"),
            Ok([a, b].into_iter().collect::<FilterValue>())
        );
        assert!(parse(field, "yesterday~today").is_err());
    }

    #[test]
    fn test_closure_parser() {
        let upper = |raw: &str| -> Result<FilterValue, String> { Ok(raw.to_uppercase().into()) };
        assert_eq!(
            upper.parse_value("abc", &Delimiters::default()),
            Ok(FilterValue::from("ABC"))
        );
    }
}
