/// The rewritten form of a condition, produced by a [`Macro`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MacroExpansion {
    /// Replacement key (without polarity prefix).
    pub key: String,
    /// Replacement arguments.
    pub args: Vec<String>,
    /// Extra free-text fragments searched in the haystack.
    pub haystack: Vec<String>,
}

impl MacroExpansion {
    pub fn new<K: Into<String>, S: Into<String>, I: IntoIterator<Item = S>>(key: K, args: I) -> Self {
        Self {
            key: key.into(),
            args: args.into_iter().map(Into::into).collect(),
            haystack: Vec::new(),
        }
    }

    pub fn with_haystack<S: Into<String>>(mut self, fragment: S) -> Self {
        self.haystack.push(fragment.into());
        self
    }
}

/// Rewrites a `key:args` condition before it is compiled.
///
/// Macros are looked up by bare key (polarity prefix removed) and applied once per occurrence.
/// Returning `None` leaves the condition untouched.
pub trait Macro: Send + Sync {
    fn expand(&self, key: &str, args: &[String]) -> Option<MacroExpansion>;
}

impl<F> Macro for F
where
    F: Fn(&str, &[String]) -> Option<MacroExpansion> + Send + Sync,
{
    fn expand(&self, key: &str, args: &[String]) -> Option<MacroExpansion> {
        self(key, args)
    }
}

/// Renames a condition key, keeping its arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyAlias {
    target: String,
}

impl KeyAlias {
    pub fn new<S: Into<String>>(target: S) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl Macro for KeyAlias {
    fn expand(&self, _key: &str, args: &[String]) -> Option<MacroExpansion> {
        Some(MacroExpansion::new(self.target.clone(), args.iter().cloned()))
    }
}

/// The output of a [`HaystackMacro`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HaystackExpansion {
    /// Condition strings (`key:args`) added to the query.
    pub conditions: Vec<String>,
    /// Free-text fragments that remain in the haystack.
    pub haystack: Vec<String>,
}

impl HaystackExpansion {
    pub fn with_condition<S: Into<String>>(mut self, condition: S) -> Self {
        self.conditions.push(condition.into());
        self
    }

    pub fn with_haystack<S: Into<String>>(mut self, fragment: S) -> Self {
        self.haystack.push(fragment.into());
        self
    }
}

/// Rewrites a free-text token matched by the macro's registration pattern.
pub trait HaystackMacro: Send + Sync {
    fn expand(&self, token: &str) -> HaystackExpansion;
}

impl<F> HaystackMacro for F
where
    F: Fn(&str) -> HaystackExpansion + Send + Sync,
{
    fn expand(&self, token: &str) -> HaystackExpansion {
        self(token)
    }
}
