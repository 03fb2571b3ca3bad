use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::Fault;
use crate::operator::{self, kind};
use crate::split::split_chain;
use crate::tokenize::tokenize;
use crate::{
    Arg, ComposeRule, ConditionToken, FaultPolicy, Literal, Operator, Options, Polarity,
    RegexCache, Subject,
};

struct CompiledArg {
    operator: Operator,
    literal: Literal,
    /// Raw literal, used for substring search.
    text: String,
    fold: bool,
    regex: Option<Arc<Regex>>,
}

impl CompiledArg {
    fn compile(arg: &Arg, options: &Options, regexes: &RegexCache) -> Self {
        let mut compiled = CompiledArg {
            operator: arg.operator,
            literal: arg.literal.clone(),
            text: arg.raw.clone(),
            fold: false,
            regex: None,
        };

        if arg.operator.is_regex() {
            // Case folding is delegated to the regex engine.
            let case_insensitive =
                arg.operator == Operator::InsensitiveHaystack || options.ignore_case();
            match regexes.get(&arg.raw, case_insensitive) {
                Ok(regex) => compiled.regex = Some(regex),
                Err(e) => warn!(pattern = %arg.raw, error = %e, "invalid regex will never match"),
            }
        } else if options.ignore_case() {
            compiled.fold = true;
            compiled.literal = arg.literal.to_lowercase();
            compiled.text = arg.raw.to_lowercase();
        }

        compiled
    }

    fn apply(&self, value: &Value) -> Result<bool, Fault> {
        let operator = match self.operator {
            Operator::Unspecified if value.is_string() => Operator::FastHaystack,
            Operator::Unspecified => Operator::Equal,
            op => op,
        };

        let fold = self.fold;
        let incompatible = || Fault::Incompatible {
            operator,
            found: kind(value),
        };

        let matched = match operator {
            Operator::Exists => true,
            Operator::Equal | Operator::Unspecified => {
                operator::loose_eq(value, &self.literal, fold)
            }
            Operator::NotEqual => !operator::loose_eq(value, &self.literal, fold),
            Operator::LessThan
            | Operator::LessThanOrEqual
            | Operator::GreaterThan
            | Operator::GreaterThanOrEqual => {
                let ordering =
                    operator::order(value, &self.literal, fold).ok_or_else(incompatible)?;
                match operator {
                    Operator::LessThan => ordering.is_lt(),
                    Operator::LessThanOrEqual => ordering.is_le(),
                    Operator::GreaterThan => ordering.is_gt(),
                    _ => ordering.is_ge(),
                }
            }
            Operator::ArgValueInItemSeq => {
                operator::contains(value, &self.literal, &self.text, fold)
                    .ok_or_else(incompatible)?
            }
            Operator::NotArgValueInItemSeq => {
                !operator::contains(value, &self.literal, &self.text, fold)
                    .ok_or_else(incompatible)?
            }
            Operator::ItemValueInArgSeq => operator::member(value, &self.literal, fold),
            Operator::NotItemValueInArgSeq => !operator::member(value, &self.literal, fold),
            Operator::FastHaystack => operator::substring(value, &self.text, fold),
            Operator::Haystack | Operator::InsensitiveHaystack => {
                match (&self.regex, operator::scalar_text(value)) {
                    (Some(regex), Some(text)) => regex.is_match(&text),
                    _ => false,
                }
            }
        };

        Ok(matched)
    }
}

struct CompiledToken {
    polarity: Polarity,
    key: String,
    compose: ComposeRule,
    args: Vec<CompiledArg>,
}

impl CompiledToken {
    fn compile(token: &ConditionToken, options: &Options, regexes: &RegexCache) -> Self {
        Self {
            polarity: token.polarity,
            key: token.key.clone(),
            compose: token.compose,
            args: token
                .args
                .iter()
                .map(|arg| CompiledArg::compile(arg, options, regexes))
                .collect(),
        }
    }

    fn matches(&self, subject: &Subject<'_>, policy: FaultPolicy) -> bool {
        if self.args.is_empty() {
            return true;
        }

        let value = subject.dig(&self.key);
        let mut result = true;

        for arg in self.args.iter() {
            result = match value {
                None => false,
                Some(value) => arg.apply(value).unwrap_or_else(|fault| {
                    trace!(key = %self.key, %fault, "resolving operator fault");
                    policy.outcome()
                }),
            };

            if self.polarity == Polarity::Exclude {
                result = !result;
            }

            match self.compose {
                ComposeRule::Or if result => return true,
                ComposeRule::And if !result => return false,
                _ => {}
            }
        }

        result
    }
}

/// One sub-query of a chain.
struct Clause {
    normal: Vec<CompiledToken>,
    additive: Vec<CompiledToken>,
}

impl Clause {
    fn compile(tokens: &[ConditionToken], options: &Options, regexes: &RegexCache) -> Self {
        let (additive, normal) = tokens
            .iter()
            .map(|token| CompiledToken::compile(token, options, regexes))
            .partition(|token| token.polarity == Polarity::Additive);

        Self { normal, additive }
    }

    fn matches(&self, subject: &Subject<'_>, policy: FaultPolicy) -> bool {
        self.normal.iter().all(|t| t.matches(subject, policy))
            && (self.additive.is_empty() || self.additive.iter().any(|t| t.matches(subject, policy)))
    }
}

/// A compiled query, testing whether records match.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use textfilter::{compile, Options};
///
/// let predicate = compile("age:<30", &Options::default());
///
/// assert!(predicate.matches(&json!({"name": "Leia", "age": 21})));
/// assert!(!predicate.matches(&json!({"name": "Han", "age": 35})));
/// ```
pub struct Predicate {
    query: String,
    clauses: Vec<Clause>,
    fault_policy: FaultPolicy,
}

impl Predicate {
    pub(crate) fn compile(query: &str, options: &Options, regexes: &RegexCache) -> Self {
        let clauses: Vec<Clause> = split_chain(query)
            .iter()
            .map(|sub_query| Clause::compile(&tokenize(sub_query, options), options, regexes))
            .collect();

        debug!(query, clauses = clauses.len(), "compiled query");

        Self {
            query: String::from(query),
            clauses,
            fault_policy: options.fault_policy(),
        }
    }

    /// The query this predicate was compiled from.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Tests a record, or a list of records merged into one view.
    pub fn matches<'a, S: Into<Subject<'a>>>(&self, subject: S) -> bool {
        let subject = subject.into();
        self.clauses
            .iter()
            .all(|clause| clause.matches(&subject, self.fault_policy))
    }

    /// Borrows the predicate as a closure, for use with iterator adapters.
    pub fn as_fn(&self) -> impl Fn(&Value) -> bool + '_ {
        move |record: &Value| self.matches(record)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("query", &self.query)
            .field("clauses", &self.clauses.len())
            .field("fault_policy", &self.fault_policy)
            .finish()
    }
}
