use chrono::{DateTime, Utc};
use chumsky::prelude::*;

use crate::ast::{parse_timestamp, Scalar, ScalarKind};

use super::utils::*;

/// Values of the declared `kind`, separated by `delimiter`.
pub fn list(delimiter: char, kind: ScalarKind) -> impl Psr<Vec<Scalar>> {
    segment(delimiter)
        .try_map(move |raw, span| {
            kind.coerce(&raw)
                .ok_or_else(|| Simple::custom(span, format!("expected a {kind} value")))
        })
        .separated_by(just(delimiter))
        .at_least(1)
        .then_ignore(end())
}

/// Two numbers around `delimiter`. The numbers may be negative even when the delimiter is `-`,
/// so `-5--1` is the range from -5 to -1.
pub fn slider(delimiter: char) -> impl Psr<(f64, f64)> {
    decimal()
        .then_ignore(just(delimiter))
        .then(decimal())
        .then_ignore(end())
}

/// Two timestamps around `delimiter`, each as epoch milliseconds or RFC 3339.
pub fn timerange(delimiter: char) -> impl Psr<(DateTime<Utc>, DateTime<Utc>)> {
    let timestamp = segment(delimiter).try_map(|raw, span| {
        parse_timestamp(&raw).ok_or_else(|| Simple::custom(span, "invalid timestamp"))
    });
    timestamp
        .clone()
        .then_ignore(just(delimiter))
        .then(timestamp)
        .then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    #[test]
    fn test_list() {
        assert_eq!(
            list('.', ScalarKind::Text).parse("GET.POST"),
            Ok(vec![Scalar::text("GET"), Scalar::text("POST")])
        );
        assert_eq!(
            list(',', ScalarKind::Number).parse("200,404"),
            Ok(vec![Scalar::Number(200.0), Scalar::Number(404.0)])
        );
        assert_eq!(
            list('.', ScalarKind::Boolean).parse("true"),
            Ok(vec![Scalar::Boolean(true)])
        );
        assert!(list(',', ScalarKind::Number).parse("200,abc").is_err());
        assert!(list('.', ScalarKind::Text).parse("a..b").is_err());
        assert!(list('.', ScalarKind::Text).parse("").is_err());
    }

    #[test]
    fn test_slider() {
        assert_eq!(slider('-').parse("5-10"), Ok((5.0, 10.0)));
        assert_eq!(slider('-').parse("-5--1"), Ok((-5.0, -1.0)));
        assert_eq!(slider('-').parse("0.5-1.5"), Ok((0.5, 1.5)));
        assert!(slider('-').parse("5").is_err());
        assert!(slider('-').parse("5-10-15").is_err());
    }

    #[test]
    fn test_timerange() {
        assert_eq!(
            timerange('~').parse("1700000000000~1700000360000"),
            Ok((ms(1_700_000_000_000), ms(1_700_000_360_000)))
        );
        assert_eq!(
            timerange('~').parse("2024-01-02T03:04:05Z~1704164646000"),
            Ok((ms(1_704_164_645_000), ms(1_704_164_646_000)))
        );
        assert!(timerange('~').parse("yesterday~today").is_err());
    }
}
