mod decode;
mod delimiters;
mod encode;
mod field;
mod parser;
mod sort;

use std::collections::{BTreeMap, HashMap};

use rowquery_parser::ast::FilterValue;
use tracing::debug;

use crate::errors::{msg, Error};

pub use delimiters::Delimiters;
pub use encode::ColumnFilter;
pub use field::{FieldKind, FieldOption, FilterField};
pub use parser::ValueParser;
pub use sort::SortParam;

/// Converts between active column filters and the single line `name:value` string kept in the
/// URL and the command input.
///
/// ```
/// use rowquery::{ColumnFilter, Delimiters, FilterCodec, FilterField, FilterValue, ScalarKind};
///
/// let codec = FilterCodec::new(
///     vec![FilterField::checkbox("level", ScalarKind::Text)],
///     Delimiters::default(),
/// );
/// let level: FilterValue = ["error", "warn"].into_iter().collect();
/// let encoded = codec.encode(&[ColumnFilter::new("level", level)]);
/// assert_eq!(encoded, "level:error.warn ");
/// assert_eq!(codec.decode(&encoded).len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCodec {
    fields: Vec<FilterField>,
    delimiters: Delimiters,
}

impl FilterCodec {
    pub fn new(fields: Vec<FilterField>, delimiters: Delimiters) -> Self {
        Self { fields, delimiters }
    }

    pub fn from_json(fields: &str, delimiters: Delimiters) -> Result<Self, Error> {
        let fields = serde_json::from_str(fields)
            .map_err(|e| Error::InvalidConfig(msg::not_json("Filter fields", e)))?;
        Ok(Self::new(fields, delimiters))
    }

    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    fn field(&self, column: &str) -> Option<&FilterField> {
        self.fields.iter().find(|f| f.column == column)
    }

    fn enabled_field(&self, column: &str) -> Option<&FilterField> {
        self.field(column).filter(|f| !f.command_disabled)
    }

    /// Every filter with a non-empty value becomes one `name:value ` token. The trailing
    /// separator is kept; callers trim it when they need to.
    pub fn encode(&self, filters: &[ColumnFilter]) -> String {
        let mut out = String::new();
        for filter in filters {
            let Some(value) = filter.value.as_ref().filter(|v| !v.is_empty()) else {
                continue;
            };
            let field = self.field(&filter.id);
            if field.map_or(false, |f| f.command_disabled) {
                continue;
            }
            match encode::encode_value(value, field.map(|f| &f.kind), &self.delimiters) {
                Some(encoded) => encode::write_token(&mut out, &filter.id, &encoded),
                None => encode::log_unencodable(filter),
            }
        }
        debug!(filters = filters.len(), encoded = %out, "encoded filters");
        out
    }

    /// Decode with the registered fields.
    pub fn decode(&self, input: &str) -> BTreeMap<String, FilterValue> {
        decode::decode_tokens(input, |name| self.enabled_field(name), &self.delimiters)
    }

    /// Decode with caller supplied parsers instead of the registered fields.
    pub fn decode_with(
        &self,
        input: &str,
        parsers: &HashMap<String, Box<dyn ValueParser>>,
    ) -> BTreeMap<String, FilterValue> {
        decode::decode_tokens(
            input,
            |name| parsers.get(name).map(|p| p.as_ref()),
            &self.delimiters,
        )
    }

    pub fn encode_sort(&self, sort: &SortParam) -> String {
        sort.encode(self.delimiters.sort)
    }

    pub fn decode_sort(&self, input: &str) -> Option<SortParam> {
        SortParam::decode(input, self.delimiters.sort)
    }
}
