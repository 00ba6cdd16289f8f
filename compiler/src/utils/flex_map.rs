use std::collections::HashMap;

use itertools::Itertools;

/// Lowercased ASCII letters and digits. Everything else is ignored when comparing identifiers.
fn normalized(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
}

/// `Created At`, `created_at` and `createdAt` all name the same column.
pub fn flex_eq(a: &str, b: &str) -> bool {
    itertools::equal(normalized(a), normalized(b))
}

pub trait FlexMap<T> {
    /// An exact match, or else the only key that is loosely equal to `key`.
    fn flex_get(&self, key: &str) -> Option<&T>;
}

impl<T> FlexMap<T> for HashMap<String, T> {
    fn flex_get(&self, key: &str) -> Option<&T> {
        if let Some(value) = self.get(key) {
            return Some(value);
        }
        // Ambiguous matches resolve to nothing.
        self.iter()
            .filter(|(k, _)| flex_eq(k, key))
            .map(|(_, v)| v)
            .exactly_one()
            .ok()
    }
}
