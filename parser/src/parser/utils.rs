use std::str::FromStr;

use chumsky::{prelude::*, text::*};

/// `Psr` is an abbreviation for "Parser". This is abbreviated because it is used in many places,
/// and we don't want it to conflict with Chumsky's `Parser` trait.
///
/// This is a utility type to reduce code duplication in types. It would be easier to write as
/// follows:
///
/// ```rs
/// pub type Psr<T> = Parser<char, T, Error = Simple<char>> + Clone + 'static;
/// ```
///
/// However, we can't do that without [trait aliases][1].
///
/// [1]: https://github.com/rust-lang/rust/issues/41517
pub trait Psr<T>: Parser<char, T, Error = Simple<char>> + Clone + 'static {}
impl<S, T> Psr<T> for S where S: Parser<char, T, Error = Simple<char>> + Clone + 'static {}

/// A signed decimal number such as `-12`, `3` or `0.25`.
pub fn decimal() -> impl Psr<f64> {
    just('-')
        .or_not()
        .chain::<char, _, _>(int(10))
        .chain::<char, _, _>(
            just('.')
                .chain(digits::<char, Simple<char>>(10))
                .or_not()
                .flatten(),
        )
        .collect::<String>()
        .try_map(|v, span| f64::from_str(&v).map_err(|_| Simple::custom(span, "invalid number")))
        .labelled("number")
}

/// One or more characters up to (not including) `delimiter`.
pub fn segment(delimiter: char) -> impl Psr<String> {
    filter(move |c: &char| *c != delimiter)
        .repeated()
        .at_least(1)
        .collect::<String>()
}
