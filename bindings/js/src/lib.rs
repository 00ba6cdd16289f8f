use std::collections::BTreeMap;

use rowquery::{
    aggregate_facets as aggregate, ColumnFilter, Config, FacetRow, FilterCodec, OperationKind,
    Options, RowQuery, RowsRequest, Table,
};
use wasm_bindgen::prelude::*;

fn options(config_json: &str) -> Result<Options, String> {
    let config = if config_json.trim().is_empty() {
        Config::default()
    } else {
        Config::from_json(config_json).map_err(|e| e.to_string())?
    };
    Options::try_from(config).map_err(|e| e.to_string())
}

fn codec(fields_json: &str, options: &Options) -> Result<FilterCodec, String> {
    FilterCodec::from_json(fields_json, options.delimiters).map_err(|e| e.to_string())
}

/// `operation` is one of `select`, `count` or `delete`.
#[wasm_bindgen]
pub fn rows_sql(
    table_json: &str,
    config_json: &str,
    operation: &str,
    request_json: &str,
) -> Result<String, String> {
    let options = options(config_json)?;
    let table =
        Table::from_json_in(table_json, &options.default_schema).map_err(|e| e.to_string())?;
    let kind: OperationKind = serde_json::from_value(operation.into())
        .map_err(|_| format!("Invalid operation `{operation}`"))?;
    let request: RowsRequest = serde_json::from_str(request_json).map_err(|e| e.to_string())?;
    RowQuery::new(&table, &options)
        .build(kind, &request)
        .map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub fn encode_filters(
    fields_json: &str,
    config_json: &str,
    filters_json: &str,
) -> Result<String, String> {
    let options = options(config_json)?;
    let filters: Vec<ColumnFilter> =
        serde_json::from_str(filters_json).map_err(|e| e.to_string())?;
    Ok(codec(fields_json, &options)?.encode(&filters))
}

/// Returns a JSON object from column id to filter value.
#[wasm_bindgen]
pub fn decode_filters(fields_json: &str, config_json: &str, input: &str) -> Result<String, String> {
    let options = options(config_json)?;
    let decoded = codec(fields_json, &options)?.decode(input);
    serde_json::to_string(&decoded).map_err(|e| e.to_string())
}

/// Takes a JSON array of `{value, total}` rows with text values.
#[wasm_bindgen]
pub fn aggregate_facets(rows_json: &str) -> Result<String, String> {
    let rows: Vec<FacetRow<String>> = serde_json::from_str(rows_json).map_err(|e| e.to_string())?;
    let totals = aggregate(rows.into_iter().map(|r| (r.value, r.total)))
        .into_iter()
        .collect::<BTreeMap<_, _>>();
    serde_json::to_string(&totals).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS: &str = r#"{
        "name": "users",
        "primary_keys": [{"name": "id"}],
        "columns": [
            {"name": "id", "data_type": "bigint", "format": "int8", "ordinal_position": 1},
            {"name": "age", "data_type": "integer", "format": "int4", "ordinal_position": 2}
        ]
    }"#;

    const FIELDS: &str = r#"[
        {"column": "level", "type": "checkbox", "scalar": "text"},
        {"column": "host", "type": "input"}
    ]"#;

    #[test]
    fn test_rows_sql() {
        assert_eq!(
            rows_sql(USERS, "", "count", r#"{"filters": [{"column": "age", "operator": "=", "value": "42"}]}"#),
            Ok("select count(*) from public.users where age = 42;".to_string())
        );
        assert_eq!(
            rows_sql(USERS, "{}", "delete", "{}"),
            Ok("delete from public.users returning *;".to_string())
        );
        assert_eq!(
            rows_sql(USERS, r#"{"default_schema": "shop"}"#, "count", "{}"),
            Ok("select count(*) from shop.users;".to_string())
        );
        assert!(rows_sql(USERS, "", "drop", "{}").is_err());
        assert!(rows_sql("{", "", "count", "{}").is_err());
    }

    #[test]
    fn test_filters() {
        let encoded = encode_filters(
            FIELDS,
            "",
            r#"[{"id": "level", "value": ["error", "warn"]}, {"id": "host", "value": ""}]"#,
        );
        assert_eq!(encoded, Ok("level:error.warn ".to_string()));
        assert_eq!(
            encode_filters(
                FIELDS,
                "",
                r#"[{"id": "host", "value": null}, {"id": "level", "value": ["a"]}]"#
            ),
            Ok("level:a ".to_string())
        );
        assert_eq!(
            decode_filters(FIELDS, "", "level:error.warn host:db"),
            Ok(r#"{"host":"db","level":["error","warn"]}"#.to_string())
        );
        assert!(decode_filters(FIELDS, r#"{"delimiters": {"array": " "}}"#, "").is_err());
    }

    #[test]
    fn test_aggregate_facets() {
        assert_eq!(
            aggregate_facets(r#"[{"value": ["a", "b"], "total": 3}, {"value": "a", "total": 2}]"#),
            Ok(r#"{"a":5,"b":3}"#.to_string())
        );
    }
}
