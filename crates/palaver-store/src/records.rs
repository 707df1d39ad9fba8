//! Keyed record map underlying every entity store.

use std::hash::Hash;

use indexmap::IndexMap;

/// Outcome of a [`Records::set`]: whether the key was new or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Added,
    Updated,
}

/// An insertion-ordered mapping from entity id to record.
///
/// Exactly one record per key; an absent key means "not loaded", never
/// "deleted".  Iteration order is insertion order and survives removals.
#[derive(Debug)]
pub struct Records<K, V> {
    inner: IndexMap<K, V>,
}

impl<K, V> Default for Records<K, V> {
    fn default() -> Self {
        Self {
            inner: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq, V> Records<K, V> {
    pub fn new() -> Self {
        Self {
            inner: IndexMap::new(),
        }
    }

    /// Insert or fully replace the record for `key`; last write wins.
    pub fn set(&mut self, key: K, value: V) -> Applied {
        match self.inner.insert(key, value) {
            None => Applied::Added,
            Some(_) => Applied::Updated,
        }
    }

    /// Mutate an existing record in place.  Returns `false` without
    /// calling `f` when the key is absent.
    pub fn update<F: FnOnce(&mut V)>(&mut self, key: &K, f: F) -> bool {
        match self.inner.get_mut(key) {
            Some(value) => {
                f(value);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.inner.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Remove a record, preserving the order of the remaining ones.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.inner.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.inner.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.inner.values()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
