use std::collections::BTreeMap;

use rowquery_parser::{ast::FilterValue, tokenize};
use tracing::{debug, trace};

use super::{delimiters::Delimiters, parser::ValueParser};

/// Parse every token whose name has a parser. Unknown names and values that fail to parse are
/// dropped; decoding itself never fails.
pub(super) fn decode_tokens<'p, P, L>(
    input: &str,
    lookup: L,
    delimiters: &Delimiters,
) -> BTreeMap<String, FilterValue>
where
    P: ValueParser + ?Sized + 'p,
    L: Fn(&str) -> Option<&'p P>,
{
    tokenize(input).fold(BTreeMap::new(), |mut decoded, token| {
        let Some(parser) = lookup(&token.name) else {
            trace!(name = %token.name, "dropping token without a field");
            return decoded;
        };
        match parser.parse_value(&token.value, delimiters) {
            // A column named twice keeps its last value.
            Ok(value) => {
                decoded.insert(token.name, value);
            }
            Err(e) => debug!(name = %token.name, error = %e, "dropping token"),
        }
        decoded
    })
}
