use serde::Deserialize;

/// A table description as returned by the database metadata endpoint. Unknown fields are
/// ignored.
#[derive(Debug, Deserialize)]
pub struct PrimitiveTable {
    pub name: String,
    /// Missing when the description leaves the schema to the caller's default.
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub columns: Vec<PrimitiveColumn>,
    #[serde(default)]
    pub primary_keys: Vec<PrimitivePrimaryKey>,
}

#[derive(Debug, Deserialize)]
pub struct PrimitiveColumn {
    pub name: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub enums: Vec<String>,
    #[serde(default)]
    pub ordinal_position: u32,
}

#[derive(Debug, Deserialize)]
pub struct PrimitivePrimaryKey {
    pub name: String,
}
