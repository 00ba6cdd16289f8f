use std::{collections::HashMap, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    codec::Delimiters,
    errors::{msg, Error},
    query::DEFAULT_SCHEMA,
    sql::{Dialect, Postgres},
    utils::FlexMap,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierResolution {
    /// Column names must match exactly.
    #[default]
    Strict,
    /// Column names match ignoring case, whitespace and punctuation, as long as the match is
    /// unambiguous.
    Flexible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectName {
    #[default]
    #[serde(alias = "postgresql")]
    Postgres,
}

impl DialectName {
    pub fn dialect(&self) -> Box<dyn Dialect> {
        match self {
            DialectName::Postgres => Box::new(Postgres()),
        }
    }
}

impl FromStr for DialectName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DialectName::Postgres),
            _ => Err(Error::InvalidConfig(msg::unknown_dialect(s))),
        }
    }
}

/// Bounds applied to large cells when selecting table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellLimits {
    /// Text longer than this many bytes is cut to this many characters.
    pub max_characters: usize,
    /// Arrays are cut to this many elements once their text form exceeds `max_characters`.
    pub max_array_elements: usize,
}

impl Default for CellLimits {
    fn default() -> Self {
        Self {
            max_characters: 10240,
            max_array_elements: 50,
        }
    }
}

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

/// User facing configuration, read from `rowquery.toml` or passed as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dialect: DialectName,
    pub identifier_resolution: IdentifierResolution,
    pub default_schema: String,
    pub delimiters: Delimiters,
    pub cell_limits: CellLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: DialectName::default(),
            identifier_resolution: IdentifierResolution::default(),
            default_schema: default_schema(),
            delimiters: Delimiters::default(),
            cell_limits: CellLimits::default(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Config, Error> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(msg::not_json("Configuration", e)))
    }
}

pub struct Options {
    pub dialect: Box<dyn Dialect>,
    pub identifier_resolution: IdentifierResolution,
    pub default_schema: String,
    pub delimiters: Delimiters,
    pub cell_limits: CellLimits,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dialect: Box::new(Postgres()),
            identifier_resolution: IdentifierResolution::default(),
            default_schema: default_schema(),
            delimiters: Delimiters::default(),
            cell_limits: CellLimits::default(),
        }
    }
}

impl TryFrom<Config> for Options {
    type Error = Error;

    fn try_from(config: Config) -> Result<Options, Error> {
        config.delimiters.validate()?;
        Ok(Options {
            dialect: config.dialect.dialect(),
            identifier_resolution: config.identifier_resolution,
            default_schema: config.default_schema,
            delimiters: config.delimiters,
            cell_limits: config.cell_limits,
        })
    }
}

impl Options {
    pub fn resolve_identifier<'b, T>(
        &self,
        map: &'b HashMap<String, T>,
        identifier: &str,
    ) -> Option<&'b T> {
        match self.identifier_resolution {
            IdentifierResolution::Strict => map.get(identifier),
            IdentifierResolution::Flexible => map.flex_get(identifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_toml() {
        let config: Config = toml::from_str(
            r#"
            identifier_resolution = "flexible"
            default_schema = "shop"

            [delimiters]
            array = ","

            [cell_limits]
            max_characters = 100
            "#,
        )
        .unwrap();
        assert_eq!(config.dialect, DialectName::Postgres);
        assert_eq!(config.identifier_resolution, IdentifierResolution::Flexible);
        assert_eq!(config.default_schema, "shop");
        assert_eq!(config.delimiters.array, ',');
        assert_eq!(config.delimiters.slider, '-');
        assert_eq!(config.cell_limits.max_characters, 100);
        assert_eq!(config.cell_limits.max_array_elements, 50);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
        assert!(Options::try_from(config).is_ok());
    }

    #[test]
    fn test_invalid_delimiters_rejected() {
        let mut config = Config::default();
        config.delimiters.range = config.delimiters.slider;
        assert!(matches!(
            Options::try_from(config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_dialect_name() {
        assert_eq!("PostgreSQL".parse::<DialectName>(), Ok(DialectName::Postgres));
        assert!("sqlite".parse::<DialectName>().is_err());
    }

    #[test]
    fn test_resolve_identifier() {
        let mut map = HashMap::new();
        map.insert("created_at".to_string(), 1);
        let mut options = Options::default();
        assert_eq!(options.resolve_identifier(&map, "Created At"), None);
        options.identifier_resolution = IdentifierResolution::Flexible;
        assert_eq!(options.resolve_identifier(&map, "Created At"), Some(&1));
    }
}
