use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::{Error, InvalidPatternSnafu};
use crate::{HaystackMacro, KeyAlias, Macro};

const DEFAULT_HAYSTACK_KEY: &str = "haystack";

/// Outcome of an argument whose operator cannot be applied to the record value.
#[derive(Clone, Copy, Debug, Default, Deserialize, Hash, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultPolicy {
    /// The argument matches.
    Open,
    /// The argument does not match.
    #[default]
    Closed,
}

impl FaultPolicy {
    pub(crate) fn outcome(&self) -> bool {
        matches!(self, FaultPolicy::Open)
    }
}

fn default_haystack_key() -> String {
    String::from(DEFAULT_HAYSTACK_KEY)
}

/// Serializable subset of [`Options`], suitable for configuration files.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct Settings {
    #[serde(default = "default_haystack_key")]
    pub haystack_key: String,

    #[serde(default)]
    pub ignore_case: bool,

    #[serde(default)]
    pub haystack_as_one_token: bool,

    #[serde(default)]
    pub fault_policy: FaultPolicy,

    /// Maximum number of entries per cache. Unbounded when absent.
    #[serde(default)]
    pub cache_capacity: Option<usize>,

    /// Key renames, installed as [`KeyAlias`] macros.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            haystack_key: default_haystack_key(),
            ignore_case: false,
            haystack_as_one_token: false,
            fault_policy: FaultPolicy::default(),
            cache_capacity: None,
            aliases: HashMap::new(),
        }
    }
}

/// Query compilation options.
#[derive(Clone)]
pub struct Options {
    haystack_key: String,
    macros: HashMap<String, Arc<dyn Macro>>,
    haystack_macros: Vec<(Regex, Arc<dyn HaystackMacro>)>,
    ignore_case: bool,
    haystack_as_one_token: bool,
    fault_policy: FaultPolicy,
    cache_capacity: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            haystack_key: default_haystack_key(),
            macros: HashMap::new(),
            haystack_macros: Vec::new(),
            ignore_case: false,
            haystack_as_one_token: false,
            fault_policy: FaultPolicy::default(),
            cache_capacity: None,
        }
    }
}

impl Options {
    pub fn from_settings(settings: Settings) -> Self {
        let mut options = Options::default()
            .with_haystack_key(settings.haystack_key)
            .with_ignore_case(settings.ignore_case)
            .with_haystack_as_one_token(settings.haystack_as_one_token)
            .with_fault_policy(settings.fault_policy);
        options.cache_capacity = settings.cache_capacity;

        for (key, target) in settings.aliases {
            options = options.with_macro(key, KeyAlias::new(target));
        }

        options
    }

    /// Sets the field free text is matched against.
    pub fn with_haystack_key<S: Into<String>>(mut self, key: S) -> Self {
        self.haystack_key = key.into();
        self
    }

    /// Registers a condition macro for a bare key, replacing any previous one.
    pub fn with_macro<S: Into<String>, M: Macro + 'static>(mut self, key: S, m: M) -> Self {
        self.macros.insert(key.into(), Arc::new(m));
        self
    }

    /// Registers a haystack macro fired for free-text tokens matching `pattern`.
    ///
    /// Macros are tried in registration order. Returns an error if `pattern` is not a valid regex.
    pub fn with_haystack_macro<S: AsRef<str>, M: HaystackMacro + 'static>(
        mut self,
        pattern: S,
        m: M,
    ) -> Result<Self, Error> {
        let pattern = pattern.as_ref();
        let regex = Regex::new(pattern).context(InvalidPatternSnafu { pattern })?;
        self.haystack_macros.push((regex, Arc::new(m)));
        Ok(self)
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Joins every free-text fragment into a single fragment instead of OR-ing them.
    pub fn with_haystack_as_one_token(mut self, one_token: bool) -> Self {
        self.haystack_as_one_token = one_token;
        self
    }

    pub fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    /// Bounds the engine caches, evicting the least recently used entries.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    pub fn haystack_key(&self) -> &str {
        &self.haystack_key
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn haystack_as_one_token(&self) -> bool {
        self.haystack_as_one_token
    }

    pub fn fault_policy(&self) -> FaultPolicy {
        self.fault_policy
    }

    pub fn cache_capacity(&self) -> Option<usize> {
        self.cache_capacity
    }

    pub(crate) fn macro_for(&self, key: &str) -> Option<&dyn Macro> {
        self.macros.get(key).map(|m| m.as_ref())
    }

    pub(crate) fn haystack_macros(&self) -> impl Iterator<Item = (&Regex, &dyn HaystackMacro)> {
        self.haystack_macros.iter().map(|(re, m)| (re, m.as_ref()))
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("haystack_key", &self.haystack_key)
            .field("macros", &self.macros.keys().collect::<Vec<_>>())
            .field(
                "haystack_macros",
                &self
                    .haystack_macros
                    .iter()
                    .map(|(re, _)| re.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("ignore_case", &self.ignore_case)
            .field("haystack_as_one_token", &self.haystack_as_one_token)
            .field("fault_policy", &self.fault_policy)
            .field("cache_capacity", &self.cache_capacity)
            .finish()
    }
}
