use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Literal;

/// Comparison applied between a record value and a query literal.
#[derive(Clone, Copy, Debug, Deserialize, Hash, PartialEq, Eq, Serialize)]
pub enum Operator {
    /// Resolved at evaluation time: `FastHaystack` for strings, `Equal` otherwise.
    Unspecified,
    Exists,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    /// The literal is an element (or substring) of the record value.
    ArgValueInItemSeq,
    NotArgValueInItemSeq,
    /// The record value is an element of the literal list.
    ItemValueInArgSeq,
    NotItemValueInArgSeq,
    /// Case-sensitive regex search.
    Haystack,
    /// Case-insensitive regex search.
    InsensitiveHaystack,
    /// Plain substring search.
    FastHaystack,
}

// Longest prefixes first, the first match wins.
const PREFIXES: &[(&str, Operator)] = &[
    ("!has:", Operator::NotArgValueInItemSeq),
    ("has:", Operator::ArgValueInItemSeq),
    ("!in:", Operator::NotItemValueInArgSeq),
    ("in:", Operator::ItemValueInArgSeq),
    (">=", Operator::GreaterThanOrEqual),
    ("<=", Operator::LessThanOrEqual),
    ("!=", Operator::NotEqual),
    ("i/", Operator::InsensitiveHaystack),
    ("=", Operator::Equal),
    ("!", Operator::NotEqual),
    (">", Operator::GreaterThan),
    ("<", Operator::LessThan),
    ("/", Operator::Haystack),
    ("~", Operator::Haystack),
    ("%", Operator::FastHaystack),
    ("?", Operator::Exists),
    ("$", Operator::ArgValueInItemSeq),
];

impl Operator {
    /// Strips the longest operator prefix from a query argument.
    ///
    /// A prefix only counts when it leaves a non-empty literal, except for `?` which takes none.
    /// Arguments without a known prefix resolve to [`Operator::Unspecified`].
    ///
    /// # Examples
    ///
    /// ```
    /// use textfilter::Operator;
    ///
    /// assert_eq!(Operator::parse_prefix(">=30"), (Operator::GreaterThanOrEqual, "30"));
    /// assert_eq!(Operator::parse_prefix("!has:x"), (Operator::NotArgValueInItemSeq, "x"));
    /// assert_eq!(Operator::parse_prefix("han"), (Operator::Unspecified, "han"));
    /// ```
    pub fn parse_prefix(arg: &str) -> (Operator, &str) {
        for (prefix, operator) in PREFIXES {
            if let Some(rest) = arg.strip_prefix(prefix) {
                if !rest.is_empty() || *operator == Operator::Exists {
                    return (*operator, rest);
                }
            }
        }
        (Operator::Unspecified, arg)
    }

    /// The canonical query prefix of this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Unspecified => "",
            Operator::Exists => "?",
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::ArgValueInItemSeq => "has:",
            Operator::NotArgValueInItemSeq => "!has:",
            Operator::ItemValueInArgSeq => "in:",
            Operator::NotItemValueInArgSeq => "!in:",
            Operator::Haystack => "/",
            Operator::InsensitiveHaystack => "i/",
            Operator::FastHaystack => "%",
        }
    }

    /// Whether the literal of this operator is a regular expression.
    pub fn is_regex(&self) -> bool {
        matches!(self, Operator::Haystack | Operator::InsensitiveHaystack)
    }

    /// Whether the literal of this operator is a list.
    pub fn takes_list(&self) -> bool {
        matches!(
            self,
            Operator::ItemValueInArgSeq | Operator::NotItemValueInArgSeq
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "a null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn fold(s: &str, enabled: bool) -> Cow<'_, str> {
    if enabled {
        Cow::Owned(s.to_lowercase())
    } else {
        Cow::Borrowed(s)
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Loose equality between a record value and a literal.
///
/// Numeric strings compare equal to numbers, and booleans compare as `0`/`1` against numbers.
pub(crate) fn loose_eq(value: &Value, literal: &Literal, folded: bool) -> bool {
    match (value, literal) {
        (Value::String(s), Literal::Text(t)) => fold(s, folded) == t.as_str(),
        (Value::String(s), Literal::Number(n)) => parse_number(s) == Some(*n),
        (Value::Number(v), Literal::Number(n)) => v.as_f64() == Some(*n),
        (Value::Bool(b), Literal::Bool(l)) => b == l,
        (Value::Bool(b), Literal::Number(n)) => (*b as u8 as f64) == *n,
        (Value::Number(v), Literal::Bool(l)) => v.as_f64() == Some(*l as u8 as f64),
        _ => false,
    }
}

/// Orders a record value against a literal, `None` when the two are not comparable.
pub(crate) fn order(value: &Value, literal: &Literal, folded: bool) -> Option<Ordering> {
    match (value, literal) {
        (Value::Number(v), Literal::Number(n)) => v.as_f64()?.partial_cmp(n),
        (Value::String(s), Literal::Number(n)) => parse_number(s)?.partial_cmp(n),
        (Value::String(s), Literal::Text(t)) => Some(str::cmp(&fold(s, folded), t.as_str())),
        (Value::Bool(b), Literal::Bool(l)) => Some(b.cmp(l)),
        _ => None,
    }
}

/// Tests whether a record value contains the literal.
///
/// Arrays are searched element-wise, strings by substring. Any other value is not a sequence.
pub(crate) fn contains(value: &Value, literal: &Literal, text: &str, folded: bool) -> Option<bool> {
    match value {
        Value::Array(items) => Some(items.iter().any(|item| loose_eq(item, literal, folded))),
        Value::String(s) => Some(fold(s, folded).contains(text)),
        _ => None,
    }
}

/// Tests whether a record value is one of the literal's elements.
///
/// An array value matches when any of its elements is a member.
pub(crate) fn member(value: &Value, literal: &Literal, folded: bool) -> bool {
    let candidates: &[Literal] = match literal {
        Literal::List(items) => items,
        single => std::slice::from_ref(single),
    };

    match value {
        Value::Array(items) => items
            .iter()
            .any(|item| candidates.iter().any(|c| loose_eq(item, c, folded))),
        _ => candidates.iter().any(|c| loose_eq(value, c, folded)),
    }
}

/// Substring search over the textual form of strings and numbers.
pub(crate) fn substring(value: &Value, needle: &str, folded: bool) -> bool {
    if needle.is_empty() {
        return false;
    }

    match value {
        Value::String(s) => fold(s, folded).contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        _ => false,
    }
}

/// The text a regex is tested against, if the value has one.
pub(crate) fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}
