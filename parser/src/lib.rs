mod parser;

pub mod ast;
pub mod tokens;

use ast::{Scalar, ScalarKind, SortToken, Token};
use chrono::{DateTime, Utc};
use chumsky::Parser;
use tokens::*;

/// Split a serialized filter string into `name:value` tokens.
///
/// Tokens are separated by whitespace and split on their first `:`. Tokens without a name, a
/// separator or a value are skipped.
pub fn tokenize(input: &str) -> impl Iterator<Item = Token> + '_ {
    input.split_whitespace().filter_map(|word| {
        let (name, value) = word.split_once(KEY_VALUE_SEPARATOR)?;
        if name.is_empty() || value.is_empty() {
            return None;
        }
        Some(Token {
            name: name.to_string(),
            value: value.to_string(),
        })
    })
}

pub fn parse_list(input: &str, delimiter: char, kind: ScalarKind) -> Result<Vec<Scalar>, String> {
    parser::list(delimiter, kind)
        .parse(input)
        .map_err(|_| format!("Invalid {kind} list `{input}`"))
}

pub fn parse_slider(input: &str, delimiter: char) -> Result<(f64, f64), String> {
    parser::slider(delimiter)
        .parse(input)
        .map_err(|_| format!("Invalid numeric range `{input}`"))
}

pub fn parse_timerange(
    input: &str,
    delimiter: char,
) -> Result<(DateTime<Utc>, DateTime<Utc>), String> {
    parser::timerange(delimiter)
        .parse(input)
        .map_err(|_| format!("Invalid time range `{input}`"))
}

/// Parse `column<delimiter>asc` or `column<delimiter>desc`. The column itself may contain the
/// delimiter; only the last one separates the direction.
pub fn parse_sort(input: &str, delimiter: char) -> Result<SortToken, String> {
    let invalid = || format!("Invalid sort `{input}`");
    let (id, direction) = input.rsplit_once(delimiter).ok_or_else(invalid)?;
    if id.is_empty() {
        return Err(invalid());
    }
    let desc = match direction {
        SORT_ASC => false,
        SORT_DESC => true,
        _ => return Err(invalid()),
    };
    Ok(SortToken {
        id: id.to_string(),
        desc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(input: &str) -> Vec<(String, String)> {
        tokenize(input).map(|t| (t.name, t.value)).collect()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            pairs("  level:error.warn   host:db-1 "),
            vec![
                ("level".to_string(), "error.warn".to_string()),
                ("host".to_string(), "db-1".to_string()),
            ]
        );
        assert_eq!(pairs("url:http://x"), vec![("url".to_string(), "http://x".to_string())]);
        assert!(pairs("nocolon :novalue trailing:").is_empty());
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(
            parse_sort("created_at.desc", '.'),
            Ok(SortToken {
                id: "created_at".to_string(),
                desc: true
            })
        );
        assert_eq!(parse_sort("a.b.asc", '.').map(|s| s.id), Ok("a.b".to_string()));
        assert!(parse_sort("created_at.up", '.').is_err());
        assert!(parse_sort(".asc", '.').is_err());
        assert!(parse_sort("created_at", '.').is_err());
    }
}
