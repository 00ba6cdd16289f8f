use std::collections::{
    hash_map::Entry::{Occupied, Vacant},
    HashMap,
};

use itertools::Itertools;

use crate::{
    errors::{msg, Error},
    options::Options,
    query::DEFAULT_SCHEMA,
};

use super::primitive_schema::{PrimitiveColumn, PrimitiveTable};

pub type ColumnName = String;
pub type ColumnId = usize;

#[rustfmt::skip]
const NUMERIC_TYPES: &[&str] = &[
    "int2", "int4", "int8", "float4", "float8", "numeric",
    "smallint", "integer", "bigint", "real", "double precision", "decimal",
];

/// Types whose text form can grow large enough to be cut down in the rows grid.
#[rustfmt::skip]
const TRUNCATED_TYPES: &[&str] = &[
    "text", "varchar", "character varying", "bpchar", "character", "json", "jsonb", "bytea",
    "xml", "hstore", "geometry", "geography", "tsvector", "tsquery",
    "int4range", "int8range", "numrange", "tsrange", "tstzrange", "daterange",
];

/// Matched anywhere in the type name, e.g. `vector(1536)` or `halfvec`.
const VECTOR_TYPE_MARKERS: &[&str] = &["vector", "halfvec", "sparsevec"];

/// Types that are truncated unless they are enums.
const OPAQUE_TYPES: &[&str] = &["user-defined", "domain"];

const UNSORTABLE_TYPES: &[&str] = &["json", "jsonb"];

const ARRAY_DATA_TYPE: &str = "ARRAY";

/// Postgres prefixes the element type of array columns with an underscore, e.g. `_int4`.
const ARRAY_FORMAT_PREFIX: char = '_';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub id: ColumnId,
    pub name: ColumnName,
    pub data_type: String,
    pub format: String,
    /// Allowed values when the column (or its element type) is an enum.
    pub enums: Vec<String>,
    pub ordinal_position: u32,
}

impl Column {
    fn is_any_of(&self, types: &[&str]) -> bool {
        types.contains(&self.format.as_str()) || types.contains(&self.data_type.as_str())
    }

    pub fn is_numeric(&self) -> bool {
        self.is_any_of(NUMERIC_TYPES)
    }

    pub fn is_array(&self) -> bool {
        self.data_type.eq_ignore_ascii_case(ARRAY_DATA_TYPE)
            || self.format.starts_with(ARRAY_FORMAT_PREFIX)
    }

    pub fn is_enum_array(&self) -> bool {
        self.is_array() && !self.enums.is_empty()
    }

    pub fn is_truncatable(&self) -> bool {
        let format = self.format.to_ascii_lowercase();
        let data_type = self.data_type.to_ascii_lowercase();
        let named = |types: &[&str]| types.iter().any(|t| *t == format || *t == data_type);
        named(TRUNCATED_TYPES)
            || VECTOR_TYPE_MARKERS
                .iter()
                .any(|m| format.contains(m) || data_type.contains(m))
            || (self.enums.is_empty() && named(OPAQUE_TYPES))
    }

    /// The type array values are cast to when projected: `json` or `jsonb` arrays keep their
    /// element type, everything else is read as `text`.
    pub fn array_element_type(&self) -> &'static str {
        match self.format.as_str() {
            "_json" => "json",
            "_jsonb" => "jsonb",
            _ => "text",
        }
    }

    pub fn is_sortable(&self) -> bool {
        !self.is_array() && !self.is_any_of(UNSORTABLE_TYPES)
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub schema: String,
    pub columns: HashMap<ColumnId, Column>,
    pub column_lookup: HashMap<ColumnName, ColumnId>,
    pub primary_keys: Vec<ColumnName>,
}

impl Table {
    /// Tables described without a schema are placed in `public`.
    pub fn from_json(json: &str) -> Result<Table, Error> {
        Table::from_json_in(json, DEFAULT_SCHEMA)
    }

    /// Tables described without a schema are placed in `default_schema`.
    pub fn from_json_in(json: &str, default_schema: &str) -> Result<Table, Error> {
        let mut primitive: PrimitiveTable = serde_json::from_str(json)
            .map_err(|e| Error::InvalidSchema(msg::not_json("Table description", e)))?;
        primitive
            .schema
            .get_or_insert_with(|| default_schema.to_string());
        Table::try_from(primitive)
    }

    /// Columns by ordinal position. Ties keep declaration order.
    pub fn columns_in_order(&self) -> Vec<&Column> {
        self.columns
            .values()
            .sorted_by_key(|c| (c.ordinal_position, c.id))
            .collect()
    }

    pub fn get_column(&self, name: &str, options: &Options) -> Option<&Column> {
        let id = options.resolve_identifier(&self.column_lookup, name)?;
        self.columns.get(id)
    }

    pub fn enum_array_columns(&self) -> Vec<&str> {
        self.columns_in_order()
            .into_iter()
            .filter(|c| c.is_enum_array())
            .map(|c| c.name.as_str())
            .collect()
    }
}

fn make_column(id: ColumnId, primitive_column: PrimitiveColumn) -> Column {
    Column {
        id,
        name: primitive_column.name,
        data_type: primitive_column.data_type,
        format: primitive_column.format,
        enums: primitive_column.enums,
        ordinal_position: primitive_column.ordinal_position,
    }
}

impl TryFrom<PrimitiveTable> for Table {
    type Error = Error;

    fn try_from(primitive_table: PrimitiveTable) -> Result<Table, Error> {
        let mut max_column_id: ColumnId = 0;
        let mut columns = HashMap::<ColumnId, Column>::new();
        let mut column_lookup = HashMap::<ColumnName, ColumnId>::new();
        for primitive_column in primitive_table.columns {
            max_column_id += 1;
            match column_lookup.entry(primitive_column.name.clone()) {
                Occupied(e) => {
                    return Err(Error::InvalidSchema(msg::duplicate_column(
                        e.key(),
                        &primitive_table.name,
                    )));
                }
                Vacant(e) => {
                    e.insert(max_column_id);
                }
            }
            columns.insert(max_column_id, make_column(max_column_id, primitive_column));
        }
        Ok(Table {
            name: primitive_table.name,
            schema: primitive_table
                .schema
                .unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
            columns,
            column_lookup,
            primary_keys: primitive_table
                .primary_keys
                .into_iter()
                .map(|k| k.name)
                .collect(),
        })
    }
}
