//! OrderedHashMap: hash storage for point operations plus a sorted key
//! index for navigation.
//!
//! Values live only in the [`HashTable`]. The index is a
//! [`BalancedTreeMap`] of keys with unit values; navigation asks the index
//! for the boundary key and then reads the entry from the table.

use crate::capability::{Comparator, KeyEquivalence, NaturalOrder, Structural};
use crate::config::HashTableConfig;
use crate::entry::MapEntry;
use crate::error::ConfigError;
use crate::hash_table::HashTable;
use crate::navigable::navigable_via_inherent;
use crate::tree_map::{self, BalancedTreeMap};
use core::fmt;
use core::mem;

/// Navigable map with O(1) average `get`/`insert`/`remove`.
///
/// The comparator and the key equivalence must agree: keys equal under one
/// must be equal under the other.
pub struct OrderedHashMap<K, V, C = NaturalOrder, E = Structural> {
    table: HashTable<K, V, E>,
    index: BalancedTreeMap<K, (), C>,
}

impl<K, V> OrderedHashMap<K, V>
where
    K: Ord + Eq + core::hash::Hash + Clone,
{
    pub fn new() -> Self {
        Self::with_parts(NaturalOrder, Structural::default())
    }
}

impl<K, V> Default for OrderedHashMap<K, V>
where
    K: Ord + Eq + core::hash::Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C, E> OrderedHashMap<K, V, C, E>
where
    K: Clone,
    C: Comparator<K>,
    E: KeyEquivalence<K>,
{
    pub fn with_parts(comparator: C, equivalence: E) -> Self {
        Self {
            table: HashTable::with_equivalence(equivalence),
            index: BalancedTreeMap::with_comparator(comparator),
        }
    }

    pub fn with_config(
        comparator: C,
        equivalence: E,
        config: HashTableConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            table: HashTable::with_config(config, equivalence)?,
            index: BalancedTreeMap::with_comparator(comparator),
        })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.table.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.table.get_mut(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.table.contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.table.contains_value(value)
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.table.get_mut(&key) {
            return Some(mem::replace(slot, value));
        }
        self.index.insert(key.clone(), ());
        self.table.insert(key, value);
        self.check_sync();
        None
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let removed = self.table.remove_entry(key)?;
        self.index
            .remove(key)
            .expect("key removed from the table must be indexed");
        self.check_sync();
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.table.clear();
        self.index.clear();
    }

    // Comparator and equivalence disagreeing on a key shows up here first.
    fn check_sync(&self) {
        assert_eq!(
            self.index.len(),
            self.table.len(),
            "ordered index out of sync with hash storage"
        );
    }

    fn resolve(&self, indexed: Option<MapEntry<'_, K, ()>>) -> Option<MapEntry<'_, K, V>> {
        let key = indexed?.key();
        let (k, v) = self
            .table
            .get_key_value(key)
            .expect("indexed key must be present in the table");
        Some(MapEntry::new(k, v))
    }

    pub fn first_entry(&self) -> Option<MapEntry<'_, K, V>> {
        self.resolve(self.index.first_entry())
    }

    pub fn last_entry(&self) -> Option<MapEntry<'_, K, V>> {
        self.resolve(self.index.last_entry())
    }

    pub fn ceiling_entry(&self, key: &K) -> Option<MapEntry<'_, K, V>> {
        self.resolve(self.index.ceiling_entry(key))
    }

    pub fn floor_entry(&self, key: &K) -> Option<MapEntry<'_, K, V>> {
        self.resolve(self.index.floor_entry(key))
    }

    pub fn higher_entry(&self, key: &K) -> Option<MapEntry<'_, K, V>> {
        self.resolve(self.index.higher_entry(key))
    }

    pub fn lower_entry(&self, key: &K) -> Option<MapEntry<'_, K, V>> {
        self.resolve(self.index.lower_entry(key))
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V, E> {
        Iter {
            keys: self.index.iter(),
            table: &self.table,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|e| e.key())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|e| e.value())
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.table.assert_invariants();
        self.index.assert_invariants();
        self.check_sync();
        for e in self.index.iter() {
            assert!(self.table.contains_key(e.key()), "indexed key missing from table");
        }
    }
}

navigable_via_inherent!(
    [K, V, C, E] OrderedHashMap<K, V, C, E>
    where K: Clone, C: Comparator<K>, E: KeyEquivalence<K>
);

/// Ascending iterator over an [`OrderedHashMap`].
pub struct Iter<'a, K, V, E> {
    keys: tree_map::Iter<'a, K, ()>,
    table: &'a HashTable<K, V, E>,
}

impl<'a, K, V, E> Iterator for Iter<'a, K, V, E>
where
    E: KeyEquivalence<K>,
{
    type Item = MapEntry<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.next()?.key();
        let (k, v) = self
            .table
            .get_key_value(key)
            .expect("indexed key must be present in the table");
        Some(MapEntry::new(k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<K, V, E> ExactSizeIterator for Iter<'_, K, V, E> where E: KeyEquivalence<K> {}

impl<'a, K, V, C, E> IntoIterator for &'a OrderedHashMap<K, V, C, E>
where
    K: Clone,
    C: Comparator<K>,
    E: KeyEquivalence<K>,
{
    type Item = MapEntry<'a, K, V>;
    type IntoIter = Iter<'a, K, V, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C, E> Extend<(K, V)> for OrderedHashMap<K, V, C, E>
where
    K: Clone,
    C: Comparator<K>,
    E: KeyEquivalence<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedHashMap<K, V>
where
    K: Ord + Eq + core::hash::Hash + Clone,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C, E> fmt::Debug for OrderedHashMap<K, V, C, E>
where
    K: fmt::Debug + Clone,
    V: fmt::Debug,
    C: Comparator<K>,
    E: KeyEquivalence<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|e| e.into_parts()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: the index mirrors the table through inserts, overwrites,
    /// removals and `clear`.
    #[test]
    fn index_tracks_table() {
        let mut m = OrderedHashMap::new();
        for k in [5, 1, 9, 3, 7] {
            assert_eq!(m.insert(k, k * 10), None);
        }
        assert_eq!(m.insert(3, 33), Some(30));
        m.assert_invariants();
        assert_eq!(m.remove(&9), Some(90));
        assert_eq!(m.remove(&9), None);
        m.assert_invariants();
        assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![1, 3, 5, 7]);
        m.clear();
        assert!(m.first_entry().is_none());
        m.assert_invariants();
    }

    /// Invariant: navigation hands back the value stored in the table.
    #[test]
    fn navigation_reads_values_from_table() {
        let mut m: OrderedHashMap<u32, String> =
            (1..=5).map(|k| (k * 100, format!("{}blah", k * 100))).collect();
        if let Some(v) = m.get_mut(&300) {
            v.push('!');
        }
        assert_eq!(m.ceiling_entry(&201).map(|e| e.value().as_str()), Some("300blah!"));
        assert_eq!(m.lower_entry(&300).map(|e| *e.key()), Some(200));
        assert_eq!(m.floor_entry(&99), None);
        assert!(m.contains_value(&"500blah".to_string()));
    }

    #[test]
    fn custom_comparator_drives_order() {
        let mut m = OrderedHashMap::with_parts(|a: &i32, b: &i32| b.cmp(a), Structural::new());
        for k in 0..5 {
            m.insert(k, ());
        }
        assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![4, 3, 2, 1, 0]);
        assert_eq!(m.first_entry().map(|e| *e.key()), Some(4));
    }

    #[test]
    fn with_config_validates_table_parameters() {
        let bad = HashTableConfig {
            initial_capacity: 4,
            load_factor: f32::NAN,
        };
        let res = OrderedHashMap::<u8, u8>::with_config(NaturalOrder, Structural::default(), bad);
        assert!(matches!(res, Err(ConfigError::InvalidLoadFactor(_))));
    }
}
