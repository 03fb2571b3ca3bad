use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::{dig_sort, ConditionToken, Options, Predicate, RegexCache, SharedCache};

static GLOBAL: Lazy<Engine> = Lazy::new(Engine::default);

/// The process-wide engine, configured with default options.
pub fn global() -> &'static Engine {
    &GLOBAL
}

/// A sort directive trailing a query, such as `age::desc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortKey {
    pub key: String,
    pub reverse: bool,
}

impl SortKey {
    /// Splits a trailing `key::asc` or `key::desc` token from a query.
    pub fn extract(query: &str) -> (&str, Option<SortKey>) {
        let trimmed = query.trim_end();
        let (head, last) = match trimmed.rsplit_once(|c: char| c.is_whitespace()) {
            Some((head, last)) => (head, last),
            None => ("", trimmed),
        };

        let parsed = if let Some(key) = last.strip_suffix("::desc") {
            Some((key, true))
        } else {
            last.strip_suffix("::asc").map(|key| (key, false))
        };

        match parsed {
            Some((key, reverse)) if !key.is_empty() => (
                head,
                Some(SortKey {
                    key: String::from(key),
                    reverse,
                }),
            ),
            _ => (query, None),
        }
    }
}

/// Compiles queries with a fixed set of options, memoizing predicates and regexes.
///
/// An engine is safe to share between threads.
pub struct Engine {
    options: Options,
    regexes: RegexCache,
    predicates: SharedCache<String, Arc<Predicate>>,
}

impl Engine {
    pub fn new(options: Options) -> Self {
        let capacity = options.cache_capacity();
        Self {
            options,
            regexes: RegexCache::new(capacity),
            predicates: SharedCache::new(capacity),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Compiles a query without consulting the predicate cache.
    ///
    /// Regexes are still shared with every other predicate compiled by this engine.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn compile(&self, query: &str) -> Predicate {
        Predicate::compile(query, &self.options, &self.regexes)
    }

    /// Returns the cached predicate for `query`, compiling it on first use.
    ///
    /// Repeated calls with the same query return the same [`Arc`].
    pub fn compile_cached(&self, query: &str) -> Arc<Predicate> {
        if let Some(predicate) = self.predicates.get(query) {
            tracing::trace!(query, "predicate cache hit");
            return predicate;
        }

        self.predicates
            .get_or_insert_with(query, || Arc::new(self.compile(query)))
    }

    pub fn tokenize(&self, query: &str) -> Vec<Vec<ConditionToken>> {
        crate::tokenize(query, &self.options)
    }

    /// Returns the records matching `query`, in their original order.
    pub fn search<'a>(&self, records: &'a [Value], query: &str) -> Vec<&'a Value> {
        let predicate = self.compile_cached(query);
        records
            .iter()
            .filter(|record| predicate.matches(*record))
            .collect()
    }

    /// Like [`Engine::search`], honoring a trailing `key::asc` or `key::desc` sort directive.
    pub fn search_and_sort<'a>(&self, records: &'a [Value], query: &str) -> Vec<&'a Value> {
        let (query, sort) = SortKey::extract(query);
        let mut matches = self.search(records, query);

        if let Some(sort) = sort {
            tracing::debug!(key = %sort.key, reverse = sort.reverse, "sorting matches");
            dig_sort(&mut matches, &sort.key, sort.reverse);
        }

        matches
    }

    pub fn cached_predicates(&self) -> usize {
        self.predicates.len()
    }

    pub fn cached_regexes(&self) -> usize {
        self.regexes.len()
    }

    pub fn clear_caches(&self) {
        self.predicates.clear();
        self.regexes.clear();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Options::default())
    }
}
