use tracing::trace;

use crate::split::{split, Delimiters, WHITESPACE};
use crate::{ConditionToken, Options, Polarity};

const QUOTES: &[char] = &['"', '\'', '`'];

/// A top-level token, classified.
#[derive(Debug, PartialEq, Eq)]
enum Classified {
    Condition { key: String, rest: String },
    FreeText(String),
}

/// Classifies a top-level token.
///
/// A token is a condition when an unescaped `:` appears before any quote opens.
fn classify(token: &str) -> Classified {
    let mut escaped = false;

    for (idx, c) in token.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            c if QUOTES.contains(&c) => break,
            ':' => {
                return Classified::Condition {
                    key: token[..idx].replace("\\:", ":"),
                    rest: token[idx + 1..].to_string(),
                }
            }
            _ => {}
        }
    }

    Classified::FreeText(unwrap_free_text(token))
}

fn unwrap_free_text(token: &str) -> String {
    let mut chars = token.chars();
    if let (Some(first), Some(last)) = (chars.next(), chars.next_back()) {
        if first == last && QUOTES.contains(&first) {
            return chars.as_str().to_string();
        }
    }
    token.replace("\\:", ":")
}

/// Compiles a single (unchained) query into condition tokens.
///
/// Free-text tokens go through the haystack macros, conditions through the key macros,
/// and the remaining free text always ends up in the last token.
pub(crate) fn tokenize(query: &str, options: &Options) -> Vec<ConditionToken> {
    let mut conditions = Vec::new();
    let mut free_text = Vec::new();

    for token in split(query, WHITESPACE, Delimiters::Quotes, false) {
        match classify(&token) {
            Classified::Condition { key, rest } => conditions.push((key, rest)),
            Classified::FreeText(text) => free_text.push(text),
        }
    }

    let mut haystack = Vec::with_capacity(free_text.len());
    for text in free_text {
        let mut expanded = false;

        for (pattern, haystack_macro) in options.haystack_macros() {
            if !pattern.is_match(&text) {
                continue;
            }

            expanded = true;
            let expansion = haystack_macro.expand(&text);
            trace!(token = %text, pattern = pattern.as_str(), ?expansion, "haystack macro");

            for condition in expansion.conditions {
                match classify(&condition) {
                    Classified::Condition { key, rest } => conditions.push((key, rest)),
                    Classified::FreeText(text) => haystack.push(text),
                }
            }
            haystack.extend(expansion.haystack);
        }

        if !expanded {
            haystack.push(text);
        }
    }

    let mut tokens = Vec::with_capacity(conditions.len() + 1);
    for (key, rest) in conditions {
        let (polarity, bare) = Polarity::split_key(&key);
        let mut key = bare.to_string();
        let mut args = split(&rest, ",", Delimiters::All, true);

        let expansion = options.macro_for(&key).and_then(|m| m.expand(&key, &args));
        if let Some(expansion) = expansion {
            trace!(key = %key, ?expansion, "condition macro");
            key = expansion.key;
            args = expansion.args;
            haystack.extend(expansion.haystack);
        }

        tokens.push(ConditionToken::compile(
            polarity,
            &key,
            &args,
            options.haystack_key(),
        ));
    }

    haystack.retain(|fragment| !fragment.is_empty());
    if options.haystack_as_one_token() && haystack.len() > 1 {
        haystack = vec![haystack.join(" ")];
    }

    tokens.push(ConditionToken::haystack(options.haystack_key(), haystack));
    tokens
}
