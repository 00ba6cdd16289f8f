use itertools::Itertools;
use rowquery_parser::{
    ast::{FilterValue, Scalar},
    tokens::{KEY_VALUE_SEPARATOR, TOKEN_SEPARATOR},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{delimiters::Delimiters, field::FieldKind};

/// An active filter as the table UI holds it: a column id and its current value. A cleared
/// filter has no value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub id: String,
    #[serde(default)]
    pub value: Option<FilterValue>,
}

impl ColumnFilter {
    pub fn new(id: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            id: id.into(),
            value: Some(value.into()),
        }
    }
}

fn join<'a>(items: impl IntoIterator<Item = &'a Scalar>, delimiter: char) -> String {
    items.into_iter().join(&delimiter.to_string())
}

/// The encoded form of one value, or `None` when the value has no token form.
pub(super) fn encode_value(
    value: &FilterValue,
    kind: Option<&FieldKind>,
    delimiters: &Delimiters,
) -> Option<String> {
    let encoded = match value {
        FilterValue::Scalar(s) => s.to_string(),
        FilterValue::List(_) | FilterValue::Range(_, _) => {
            let items = value.elements()?;
            let delimiter = match kind {
                Some(FieldKind::Slider { .. }) => delimiters.slider,
                Some(FieldKind::Timerange) => delimiters.range,
                Some(FieldKind::Checkbox { .. } | FieldKind::Input) | None => delimiters.array,
            };
            join(items, delimiter)
        }
        FilterValue::Rows(_) => return None,
    };
    Some(encoded)
}

/// `name:value` followed by the token separator.
pub(super) fn write_token(out: &mut String, name: &str, encoded: &str) {
    out.push_str(name);
    out.push(KEY_VALUE_SEPARATOR);
    out.push_str(encoded);
    out.push(TOKEN_SEPARATOR);
}

pub(super) fn log_unencodable(filter: &ColumnFilter) {
    debug!(column = %filter.id, "filter value has no token form");
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    fn encode(value: FilterValue, kind: Option<FieldKind>) -> Option<String> {
        encode_value(&value, kind.as_ref(), &Delimiters::default())
    }

    #[test]
    fn test_encode_value() {
        let pair = [1, 10].into_iter().collect::<FilterValue>();
        assert_eq!(encode(FilterValue::from(2.5), None).as_deref(), Some("2.5"));
        assert_eq!(
            encode(pair.clone(), Some(FieldKind::Slider { min: 0.0, max: 10.0 })).as_deref(),
            Some("1-10")
        );
        assert_eq!(encode(pair, None).as_deref(), Some("1.10"));
        let t = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let range = FilterValue::Range(Scalar::Timestamp(t), Scalar::Timestamp(t));
        assert_eq!(
            encode(range, Some(FieldKind::Timerange)).as_deref(),
            Some("1700000000000~1700000000000")
        );
        assert_eq!(encode(FilterValue::Rows(vec![]), None), None);
    }

    #[test]
    fn test_cleared_filter_from_json() {
        let filters: Vec<ColumnFilter> = serde_json::from_str(
            r#"[{"id": "host", "value": null}, {"id": "date"}, {"id": "level", "value": ["a"]}]"#,
        )
        .unwrap();
        assert_eq!(filters[0].value, None);
        assert_eq!(filters[1].value, None);
        assert_eq!(filters[2], ColumnFilter::new("level", ["a"].into_iter().collect::<FilterValue>()));
    }
}
