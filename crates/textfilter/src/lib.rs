//! Compiles gmail-style search strings into predicates over JSON records.

mod cache;
mod dig;
mod engine;
mod error;
mod macros;
mod operator;
mod options;
mod predicate;
mod sort;
mod split;
mod token;
mod tokenize;

pub use cache::{RegexCache, SharedCache};
pub use dig::{dig, Subject};
pub use engine::{global, Engine, SortKey};
pub use error::Error;
pub use macros::{HaystackExpansion, HaystackMacro, KeyAlias, Macro, MacroExpansion};
pub use operator::Operator;
pub use options::{FaultPolicy, Options, Settings};
pub use predicate::Predicate;
pub use sort::{compare_values, dig_sort, dig_sort_many};
pub use split::{split, split_chain, Delimiters};
pub use token::{Arg, ComposeRule, ConditionToken, Literal, Polarity};

/// Compiles a query into a standalone predicate.
///
/// Prefer [`Engine::compile_cached`] when the same queries are compiled repeatedly.
pub fn compile(query: &str, options: &Options) -> Predicate {
    Predicate::compile(query, options, &RegexCache::default())
}

/// Compiles a query into condition tokens, one list per chained sub-query.
///
/// Within each list the free-text portion is always the last token.
pub fn tokenize(query: &str, options: &Options) -> Vec<Vec<ConditionToken>> {
    split_chain(query)
        .iter()
        .map(|sub_query| tokenize::tokenize(sub_query, options))
        .collect()
}

#[cfg(test)]
mod test;
