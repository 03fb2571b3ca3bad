use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use linked_hash_map::LinkedHashMap;
use parking_lot::Mutex;
use regex::{Regex, RegexBuilder};

enum Store<K, V>
where
    K: Hash + Eq,
{
    Unbounded(HashMap<K, V>),
    Lru {
        data: LinkedHashMap<K, V>,
        capacity: usize,
    },
}

impl<K, V> Store<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    fn get<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        match self {
            Store::Unbounded(data) => data.get(key).cloned(),
            Store::Lru { data, .. } => data.get_refresh(key).map(|v| v.clone()),
        }
    }

    fn insert(&mut self, key: K, value: V) {
        match self {
            Store::Unbounded(data) => {
                data.insert(key, value);
            }
            Store::Lru { data, capacity } => {
                data.insert(key, value);
                while data.len() > *capacity {
                    data.pop_front();
                }
            }
        }
    }

    fn len(&self) -> usize {
        match self {
            Store::Unbounded(data) => data.len(),
            Store::Lru { data, .. } => data.len(),
        }
    }

    fn clear(&mut self) {
        match self {
            Store::Unbounded(data) => data.clear(),
            Store::Lru { data, .. } => data.clear(),
        }
    }
}

/// A get-or-insert map safe to share between threads.
///
/// Unbounded unless constructed with a capacity, in which case the least recently used entry is
/// evicted first. Values are computed outside the lock, so two threads racing on the same key may
/// both compute it; the last insert wins.
pub struct SharedCache<K, V>
where
    K: Hash + Eq,
{
    store: Mutex<Store<K, V>>,
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    pub fn unbounded() -> Self {
        Self {
            store: Mutex::new(Store::Unbounded(HashMap::new())),
        }
    }

    /// Creates a cache holding at most `capacity` entries (at least one).
    pub fn bounded(capacity: usize) -> Self {
        Self {
            store: Mutex::new(Store::Lru {
                data: LinkedHashMap::new(),
                capacity: capacity.max(1),
            }),
        }
    }

    pub fn new(capacity: Option<usize>) -> Self {
        match capacity {
            Some(capacity) => Self::bounded(capacity),
            None => Self::unbounded(),
        }
    }

    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.store.lock().get(key)
    }

    pub fn insert(&self, key: K, value: V) {
        self.store.lock().insert(key, value)
    }

    pub fn get_or_insert_with<Q, F>(&self, key: &Q, f: F) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(key) {
            return value;
        }

        let value = f();
        self.insert(key.to_owned(), value.clone());
        value
    }

    /// Like [`SharedCache::get_or_insert_with`], but failed computations are not cached.
    pub fn get_or_try_insert_with<Q, F, E>(&self, key: &Q, f: F) -> Result<V, E>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + ToOwned<Owned = K>,
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let value = f()?;
        self.insert(key.to_owned(), value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.store.lock().clear()
    }
}

impl<K, V> Default for SharedCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Compiled regular expressions keyed by pattern and case sensitivity.
#[derive(Default)]
pub struct RegexCache {
    sensitive: SharedCache<String, Arc<Regex>>,
    insensitive: SharedCache<String, Arc<Regex>>,
}

impl RegexCache {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            sensitive: SharedCache::new(capacity),
            insensitive: SharedCache::new(capacity),
        }
    }

    /// Returns the compiled regex for `pattern`, compiling it on first use.
    pub fn get(&self, pattern: &str, case_insensitive: bool) -> Result<Arc<Regex>, regex::Error> {
        let cache = if case_insensitive {
            &self.insensitive
        } else {
            &self.sensitive
        };

        cache.get_or_try_insert_with(pattern, || {
            tracing::trace!(pattern, case_insensitive, "compiling regex");
            RegexBuilder::new(pattern)
                .case_insensitive(case_insensitive)
                .build()
                .map(Arc::new)
        })
    }

    pub fn len(&self) -> usize {
        self.sensitive.len() + self.insensitive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.sensitive.clear();
        self.insensitive.clear();
    }
}
