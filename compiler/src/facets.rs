use std::{collections::HashMap, hash::Hash};

use serde::{Deserialize, Serialize};

/// The key of a raw facet entry. Array columns produce one entry per distinct array.
///
/// `Many` is tried first so that a JSON array is never read as a single key, even when `K`
/// itself could hold an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetKey<K> {
    Many(Vec<K>),
    One(K),
}

impl<K> IntoIterator for FacetKey<K> {
    type Item = K;
    type IntoIter = std::vec::IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            FacetKey::One(k) => vec![k].into_iter(),
            FacetKey::Many(keys) => keys.into_iter(),
        }
    }
}

/// Flatten raw facet counts into per value totals. Every element of an array key receives the
/// entry's full count, once per occurrence.
pub fn aggregate_facets<K, I>(entries: I) -> HashMap<K, u64>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (FacetKey<K>, u64)>,
{
    entries
        .into_iter()
        .fold(HashMap::new(), |mut totals, (key, count)| {
            for k in key {
                *totals.entry(k).or_insert(0) += count;
            }
            totals
        })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetRow<K> {
    pub value: FacetKey<K>,
    pub total: u64,
}

/// Facet data returned for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetMetadata<K> {
    #[serde(default = "Vec::new")]
    pub rows: Vec<FacetRow<K>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl<K: Eq + Hash + Clone> FacetMetadata<K> {
    pub fn unique_values(&self) -> HashMap<K, u64> {
        aggregate_facets(self.rows.iter().map(|r| (r.value.clone(), r.total)))
    }

    /// The numeric bounds, using the known one for both ends when only one is present.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some((min, max)),
            (Some(min), None) => Some((min, min)),
            (None, Some(max)) => Some((max, max)),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_is_order_independent() {
        let entries = vec![
            (FacetKey::Many(vec!["a", "b"]), 3),
            (FacetKey::One("a"), 2),
        ];
        let expected = HashMap::from([("a", 5), ("b", 3)]);
        assert_eq!(aggregate_facets(entries.clone()), expected);
        assert_eq!(aggregate_facets(entries.into_iter().rev()), expected);
    }

    #[test]
    fn test_repeated_element_counts_twice() {
        let totals = aggregate_facets([(FacetKey::Many(vec!["x", "x"]), 4)]);
        assert_eq!(totals[&"x"], 8);
        assert!(aggregate_facets(Vec::<(FacetKey<&str>, u64)>::new()).is_empty());
    }

    #[test]
    fn test_metadata() {
        let metadata: FacetMetadata<String> = serde_json::from_str(
            r#"{"rows": [{"value": ["GET", "POST"], "total": 3}, {"value": "GET", "total": 1}], "min": 4}"#,
        )
        .unwrap();
        let unique = metadata.unique_values();
        assert_eq!(unique["GET"], 4);
        assert_eq!(unique["POST"], 3);
        assert_eq!(metadata.min_max(), Some((4.0, 4.0)));

        let metadata = FacetMetadata::<String> {
            rows: vec![],
            min: None,
            max: None,
        };
        assert_eq!(metadata.min_max(), None);
    }

    #[test]
    fn test_json_array_key_is_many() {
        use serde_json::Value;

        let rows: Vec<FacetRow<Value>> = serde_json::from_str(
            r#"[{"value": ["a", "b"], "total": 3}, {"value": "a", "total": 2}]"#,
        )
        .unwrap();
        assert_eq!(
            rows[0].value,
            FacetKey::Many(vec![Value::from("a"), Value::from("b")])
        );
        assert_eq!(rows[1].value, FacetKey::One(Value::from("a")));
    }
}
