/// Characters separating top-level query tokens.
pub(crate) const WHITESPACE: &str = " \t\r\n";

/// Token separating chained sub-queries.
pub(crate) const CHAIN_SEPARATOR: &str = "|";

/// Block delimiters recognized by [`split`].
///
/// Separators found inside an open block are treated as literal content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiters {
    /// `"…"`, `'…'` and `` `…` ``.
    Quotes,
    /// Quotes, plus `(…)` and `[…]`.
    All,
}

impl Delimiters {
    fn closing(self, c: char) -> Option<char> {
        match (self, c) {
            (_, '"') => Some('"'),
            (_, '\'') => Some('\''),
            (_, '`') => Some('`'),
            (Delimiters::All, '(') => Some(')'),
            (Delimiters::All, '[') => Some(']'),
            _ => None,
        }
    }
}

/// Splits `text` on any of the `separators` characters, respecting block delimiters.
///
/// Empty fragments are discarded. An unterminated block consumes the rest of the string.
/// When `strip` is set, the delimiter characters themselves are removed from the output.
///
/// # Examples
///
/// ```
/// use textfilter::{split, Delimiters};
///
/// let tokens = split(r#"name:han "a long phrase""#, " ", Delimiters::Quotes, false);
/// assert_eq!(tokens, vec!["name:han", "\"a long phrase\""]);
/// ```
pub fn split(text: &str, separators: &str, delimiters: Delimiters, strip: bool) -> Vec<String> {
    let mut partitions = Vec::new();
    let mut current = String::new();
    let mut closing: Option<char> = None;

    for c in text.chars() {
        match closing {
            Some(end) => {
                if c == end {
                    closing = None;
                    if !strip {
                        current.push(c);
                    }
                } else {
                    current.push(c);
                }
            }
            None if separators.contains(c) => {
                if !current.is_empty() {
                    partitions.push(std::mem::take(&mut current));
                }
            }
            None => {
                closing = delimiters.closing(c);
                if closing.is_none() || !strip {
                    current.push(c);
                }
            }
        }
    }

    if !current.is_empty() {
        partitions.push(current);
    }

    partitions
}

/// Splits a raw query into its chained sub-queries.
///
/// Sub-queries are separated by a standalone `|` token. Empty sub-queries are dropped.
pub fn split_chain(query: &str) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for token in split(query, WHITESPACE, Delimiters::Quotes, false) {
        if token == CHAIN_SEPARATOR {
            if !current.is_empty() {
                chain.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(token);
        }
    }

    if !current.is_empty() {
        chain.push(current.join(" "));
    }

    chain
}
