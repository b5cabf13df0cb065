//! HashTable: chained hash map with an injected key equivalence.

use crate::capability::{KeyEquivalence, Structural};
use crate::chains::{self, Chains};
use crate::config::HashTableConfig;
use crate::entry::MapEntry;
use crate::error::ConfigError;
use core::fmt;
use core::mem;

/// Unordered map over separate-chaining buckets.
///
/// Keys are compared through `E`, never by identity. The bucket array starts
/// at [`HashTableConfig::DEFAULT_CAPACITY`] buckets and doubles whenever the
/// entry count exceeds `capacity * load_factor`.
pub struct HashTable<K, V, E = Structural> {
    equivalence: E,
    chains: Chains<(K, V)>,
}

impl<K, V> HashTable<K, V>
where
    K: Eq + core::hash::Hash,
{
    pub fn new() -> Self {
        Self::with_equivalence(Structural::default())
    }
}

impl<K, V> Default for HashTable<K, V>
where
    K: Eq + core::hash::Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, E> HashTable<K, V, E>
where
    E: KeyEquivalence<K>,
{
    pub fn with_equivalence(equivalence: E) -> Self {
        Self {
            equivalence,
            chains: Chains::new(HashTableConfig::default()),
        }
    }

    pub fn with_config(config: HashTableConfig, equivalence: E) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            equivalence,
            chains: Chains::new(config),
        })
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.len() == 0
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.chains.capacity()
    }

    /// Insert or overwrite; returns the value previously mapped to `key`.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.equivalence.hash(&key);
        let eq = &self.equivalence;
        if let Some(slot) = self.chains.find_mut(hash, |(k, _)| eq.equals(k, &key)) {
            return Some(mem::replace(&mut slot.1, value));
        }
        self.chains.insert_unique(hash, (key, value));
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let hash = self.equivalence.hash(key);
        self.chains
            .find(hash, |(k, _)| self.equivalence.equals(k, key))
            .map(|(k, v)| (k, v))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.equivalence.hash(key);
        let eq = &self.equivalence;
        self.chains
            .find_mut(hash, |(k, _)| eq.equals(k, key))
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get_key_value(key).is_some()
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.chains.iter().any(|(_, v)| v == value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.equivalence.hash(key);
        let eq = &self.equivalence;
        self.chains.remove(hash, |(k, _)| eq.equals(k, key))
    }

    pub fn clear(&mut self) {
        self.chains.clear();
    }

    /// Entries in bucket order; unrelated to insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.chains.iter(),
            remaining: self.chains.len(),
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.chains.assert_invariants();
        for (k, _) in self.chains.iter() {
            assert!(
                self.chains
                    .find(self.equivalence.hash(k), |(kk, _)| self.equivalence.equals(kk, k))
                    .is_some(),
                "stored key is not reachable through its own hash"
            );
        }
    }
}

/// Iterator over [`HashTable`] entries.
pub struct Iter<'a, K, V> {
    it: chains::Iter<'a, (K, V)>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = MapEntry<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let (k, v) = self.it.next()?;
        self.remaining -= 1;
        Some(MapEntry::new(k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, E> IntoIterator for &'a HashTable<K, V, E>
where
    E: KeyEquivalence<K>,
{
    type Item = MapEntry<'a, K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, E> Extend<(K, V)> for HashTable<K, V, E>
where
    E: KeyEquivalence<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for HashTable<K, V>
where
    K: Eq + core::hash::Hash,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<K: fmt::Debug, V: fmt::Debug, E> fmt::Debug for HashTable<K, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.chains.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::FnEquivalence;

    /// Invariant: `insert` on an existing key overwrites and hands back the
    /// old value without changing `len`.
    #[test]
    fn insert_overwrites_existing_key() {
        let mut m: HashTable<String, i32> = HashTable::new();
        assert_eq!(m.insert("a".to_string(), 1), None);
        assert_eq!(m.insert("a".to_string(), 2), Some(1));
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(&"a".to_string()), Some(&2));
        m.assert_invariants();
    }

    /// Invariant: `len`/`is_empty` track inserts, removals and `clear`.
    #[test]
    fn len_and_is_empty_behaviors() {
        let mut m: HashTable<u32, u32> = HashTable::new();
        assert!(m.is_empty());
        for k in 0..50 {
            m.insert(k, k * 2);
        }
        assert_eq!(m.len(), 50);
        assert_eq!(m.remove(&10), Some(20));
        assert_eq!(m.remove(&10), None);
        assert_eq!(m.len(), 49);
        m.clear();
        assert!(m.is_empty());
        assert_eq!(m.get(&1), None);
        m.assert_invariants();
    }

    /// Invariant: equality goes through the injected equivalence, so keys
    /// that differ only by case collapse to one entry.
    #[test]
    fn injected_equivalence_decides_identity() {
        let eq = FnEquivalence::new(
            |s: &String| {
                use std::hash::{Hash, Hasher};
                let mut h = std::collections::hash_map::DefaultHasher::new();
                s.to_ascii_lowercase().hash(&mut h);
                h.finish()
            },
            |a: &String, b: &String| a.eq_ignore_ascii_case(b),
        );
        let mut m = HashTable::with_equivalence(eq);
        m.insert("Key".to_string(), 1);
        assert_eq!(m.insert("KEY".to_string(), 2), Some(1));
        assert_eq!(m.len(), 1);
        assert!(m.contains_key(&"key".to_string()));
        assert_eq!(m.get_key_value(&"kEy".to_string()).map(|(k, _)| k.as_str()), Some("Key"));
    }

    /// Invariant: lookups survive heavy collisions and bucket growth.
    #[test]
    fn collisions_and_growth() {
        let eq = FnEquivalence::new(|_: &u32| 0, |a: &u32, b: &u32| a == b);
        let mut m = HashTable::with_equivalence(eq);
        for k in 0..100 {
            m.insert(k, k + 1);
        }
        assert!(m.capacity() > 20);
        for k in 0..100 {
            assert_eq!(m.get(&k), Some(&(k + 1)));
        }
        assert_eq!(m.remove(&50), Some(51));
        assert!(!m.contains_key(&50));
        m.assert_invariants();
    }

    #[test]
    fn contains_value_and_get_mut() {
        let mut m: HashTable<&str, String> = HashTable::new();
        m.insert("k", "v".to_string());
        assert!(m.contains_value(&"v".to_string()));
        if let Some(v) = m.get_mut(&"k") {
            v.push('!');
        }
        assert!(m.contains_value(&"v!".to_string()));
        assert!(!m.contains_value(&"v".to_string()));
    }

    #[test]
    fn with_config_validates() {
        let bad = HashTableConfig { initial_capacity: 0, load_factor: 0.75 };
        assert!(matches!(
            HashTable::<u8, u8>::with_config(bad, Structural::default()),
            Err(ConfigError::ZeroCapacity)
        ));
        let tiny = HashTableConfig { initial_capacity: 1, load_factor: 1.0 };
        let mut m = HashTable::<u8, u8>::with_config(tiny, Structural::default()).unwrap();
        for k in 0..10 {
            m.insert(k, k);
        }
        assert_eq!(m.len(), 10);
        assert_eq!(m.capacity(), 16);
        m.assert_invariants();
    }

    #[test]
    fn iteration_visits_each_entry_once() {
        let m: HashTable<u32, u32> = (0..40).map(|k| (k, k)).collect();
        let mut keys: Vec<u32> = m.iter().map(|e| *e.key()).collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..40).collect::<Vec<_>>());
        assert_eq!(m.iter().len(), 40);
    }
}
