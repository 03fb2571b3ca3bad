use std::fmt;

use serde::{Deserialize, Serialize};

use crate::split::{split, Delimiters};
use crate::Operator;

/// Whether a matching condition includes, excludes, or additively includes a record.
#[derive(Clone, Copy, Debug, Default, Deserialize, Hash, PartialEq, Eq, Serialize)]
pub enum Polarity {
    #[default]
    Include,
    /// Negates every argument result. Written with a leading `-`.
    Exclude,
    /// Joins the group of conditions of which at least one must hold. Written with a leading `+`.
    Additive,
}

impl Polarity {
    /// Splits the polarity prefix off a condition key.
    pub fn split_key(key: &str) -> (Polarity, &str) {
        if let Some(bare) = key.strip_prefix('-') {
            (Polarity::Exclude, bare)
        } else if let Some(bare) = key.strip_prefix('+') {
            (Polarity::Additive, bare)
        } else {
            (Polarity::Include, key)
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Polarity::Include => "",
            Polarity::Exclude => "-",
            Polarity::Additive => "+",
        }
    }
}

/// How the arguments of a single condition combine.
#[derive(Clone, Copy, Debug, Default, Deserialize, Hash, PartialEq, Eq, Serialize)]
pub enum ComposeRule {
    #[default]
    Or,
    And,
}

impl ComposeRule {
    fn parse(arg: &str) -> Option<ComposeRule> {
        match arg {
            "or" | "|" => Some(ComposeRule::Or),
            "and" | "&" => Some(ComposeRule::And),
            _ => None,
        }
    }
}

/// A query literal, coerced when the condition is compiled.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Number(f64),
    Bool(bool),
    Text(String),
    List(Vec<Literal>),
}

impl Literal {
    /// Coerces a raw argument for the given operator.
    ///
    /// Regex literals always stay textual, list operators split their literal on `,`.
    ///
    /// # Examples
    ///
    /// ```
    /// use textfilter::{Literal, Operator};
    ///
    /// assert_eq!(Literal::coerce("30", Operator::LessThan), Literal::Number(30.0));
    /// assert_eq!(Literal::coerce("t", Operator::Equal), Literal::Bool(true));
    /// assert_eq!(Literal::coerce("true", Operator::Haystack), Literal::Text("true".into()));
    /// ```
    pub fn coerce(raw: &str, operator: Operator) -> Literal {
        if operator.is_regex() {
            Literal::Text(raw.to_string())
        } else if operator.takes_list() {
            Literal::List(
                split(raw, ",", Delimiters::All, true)
                    .iter()
                    .map(|item| Literal::scalar(item))
                    .collect(),
            )
        } else {
            Literal::scalar(raw)
        }
    }

    fn scalar(raw: &str) -> Literal {
        if let Some(n) = raw.parse::<f64>().ok().filter(|n| n.is_finite()) {
            return Literal::Number(n);
        }

        match raw {
            "t" | "true" => Literal::Bool(true),
            "f" | "false" => Literal::Bool(false),
            _ => Literal::Text(raw.to_string()),
        }
    }

    /// Whether case folding applies to this literal.
    pub fn is_textual(&self) -> bool {
        match self {
            Literal::Text(_) => true,
            Literal::List(items) => items.iter().any(Literal::is_textual),
            _ => false,
        }
    }

    pub(crate) fn to_lowercase(&self) -> Literal {
        match self {
            Literal::Text(t) => Literal::Text(t.to_lowercase()),
            Literal::List(items) => Literal::List(items.iter().map(Literal::to_lowercase).collect()),
            other => other.clone(),
        }
    }
}

/// One `(operator, literal)` pair of a condition.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Arg {
    pub operator: Operator,
    pub literal: Literal,
    /// The literal as typed, before coercion.
    pub raw: String,
}

impl Arg {
    pub fn parse(arg: &str) -> Arg {
        let (operator, raw) = Operator::parse_prefix(arg);
        Arg {
            operator,
            literal: Literal::coerce(raw, operator),
            raw: raw.to_string(),
        }
    }

    /// A free-text fragment searched in the haystack field.
    pub fn haystack<S: Into<String>>(fragment: S) -> Arg {
        let raw = fragment.into();
        Arg {
            operator: Operator::FastHaystack,
            literal: Literal::Text(raw.clone()),
            raw,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!("{}{}", self.operator.symbol(), self.raw);
        if text.contains(|c: char| " ,:\"'()[]".contains(c)) {
            write!(f, "`{}`", text)
        } else {
            write!(f, "{}", text)
        }
    }
}

/// A compiled query condition.
///
/// A condition without arguments places no constraint on the record and always matches.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ConditionToken {
    pub polarity: Polarity,
    /// Dot-separated path of the field under test.
    pub key: String,
    pub compose: ComposeRule,
    pub args: Vec<Arg>,
}

impl ConditionToken {
    /// Compiles a bare key and its comma-split arguments.
    ///
    /// The keys `""` and `_` address the haystack field.
    pub fn compile<S: AsRef<str>>(
        polarity: Polarity,
        key: &str,
        args: &[S],
        haystack_key: &str,
    ) -> ConditionToken {
        let key = match key {
            "" | "_" => haystack_key.to_string(),
            k => k.to_string(),
        };

        let mut compose = ComposeRule::default();
        let mut args = args.iter().map(AsRef::as_ref).peekable();
        if let Some(rule) = args.peek().and_then(|first| ComposeRule::parse(first)) {
            compose = rule;
            args.next();
        }

        ConditionToken {
            polarity,
            key,
            compose,
            args: args.filter(|a| !a.is_empty()).map(Arg::parse).collect(),
        }
    }

    /// The synthetic condition matching free text against the haystack field.
    ///
    /// Empty fragments are dropped.
    pub fn haystack(haystack_key: &str, fragments: Vec<String>) -> ConditionToken {
        ConditionToken {
            polarity: Polarity::Include,
            key: haystack_key.to_string(),
            compose: ComposeRule::Or,
            args: fragments
                .into_iter()
                .filter(|fragment| !fragment.is_empty())
                .map(Arg::haystack)
                .collect(),
        }
    }

    /// Whether this condition places no constraint on the record.
    pub fn is_unconstrained(&self) -> bool {
        self.args.is_empty()
    }

    /// Describes the condition in plain English.
    ///
    /// ```
    /// use textfilter::{ConditionToken, Polarity};
    ///
    /// let token = ConditionToken::compile(Polarity::Exclude, "age", &["and", ">3", "<9"], "haystack");
    /// assert_eq!(
    ///     token.describe(),
    ///     "Exclude results where age matches GreaterThan |3| and LessThan |9|"
    /// );
    /// ```
    pub fn describe(&self) -> String {
        if self.args.is_empty() {
            return format!("{:?} results with any {}", self.polarity, self.key);
        }

        let joiner = match self.compose {
            ComposeRule::Or => " or ",
            ComposeRule::And => " and ",
        };

        let conditions = self
            .args
            .iter()
            .map(|arg| format!("{} |{}|", arg.operator, arg.raw))
            .collect::<Vec<_>>()
            .join(joiner);

        format!(
            "{:?} results where {} matches {}",
            self.polarity, self.key, conditions
        )
    }
}

/// Renders the condition back to query syntax.
impl fmt::Display for ConditionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}:", self.polarity.symbol(), self.key)?;
        if self.compose == ComposeRule::And {
            write!(f, "and,")?;
        }

        let args = self
            .args
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(",");

        write!(f, "{}", args)
    }
}
