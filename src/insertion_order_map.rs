//! InsertionOrderMap: chained hash index over an arena of linked entries.
//!
//! The hash buckets hold only slot keys into a `SlotMap`; each slot carries
//! the key/value pair plus `before`/`after` links of a circular list headed
//! by a payload-free sentinel slot. Walking `after` from the sentinel visits
//! every live entry once, oldest first.
//!
//! Each slot also keeps the hash computed at insert time, so removal finds
//! the bucket without calling back into the key's hash.

use crate::capability::{KeyEquivalence, Structural};
use crate::chains::Chains;
use crate::config::HashTableConfig;
use crate::entry::MapEntry;
use crate::error::ConfigError;
use core::fmt;
use core::mem;
use slotmap::{DefaultKey, SlotMap};

/// Decides, after each insert of a new key, whether the eldest entry goes.
/// Receives the eldest entry and the current length.
pub type EvictionPolicy<K, V> = Box<dyn FnMut(MapEntry<'_, K, V>, usize) -> bool>;

#[derive(Debug)]
struct Link<K, V> {
    // `None` only for the sentinel.
    entry: Option<(K, V)>,
    hash: u64,
    before: DefaultKey,
    after: DefaultKey,
}

/// Hash map that iterates in insertion order.
///
/// Re-inserting an existing key replaces its value in place; the entry keeps
/// its position.
pub struct InsertionOrderMap<K, V, E = Structural> {
    equivalence: E,
    index: Chains<DefaultKey>,
    links: SlotMap<DefaultKey, Link<K, V>>,
    sentinel: DefaultKey,
    evict: Option<EvictionPolicy<K, V>>,
}

impl<K, V> InsertionOrderMap<K, V>
where
    K: Eq + core::hash::Hash,
{
    pub fn new() -> Self {
        Self::with_equivalence(Structural::default())
    }

    /// Keeps at most `max_len` entries by evicting the eldest.
    pub fn bounded(max_len: usize) -> Self
    where
        K: 'static,
        V: 'static,
    {
        Self::new().with_eviction(move |_, len| len > max_len)
    }
}

impl<K, V> Default for InsertionOrderMap<K, V>
where
    K: Eq + core::hash::Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, E> InsertionOrderMap<K, V, E>
where
    E: KeyEquivalence<K>,
{
    pub fn with_equivalence(equivalence: E) -> Self {
        Self::from_parts(HashTableConfig::default(), equivalence)
    }

    pub fn with_config(config: HashTableConfig, equivalence: E) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, equivalence))
    }

    fn from_parts(config: HashTableConfig, equivalence: E) -> Self {
        let mut links = SlotMap::with_key();
        let sentinel = links.insert_with_key(|k| Link {
            entry: None,
            hash: 0,
            before: k,
            after: k,
        });
        Self {
            equivalence,
            index: Chains::new(config),
            links,
            sentinel,
            evict: None,
        }
    }

    /// Install the eviction policy consulted after every new-key insert.
    pub fn with_eviction<F>(mut self, policy: F) -> Self
    where
        F: FnMut(MapEntry<'_, K, V>, usize) -> bool + 'static,
    {
        self.evict = Some(Box::new(policy));
        self
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.len() == 0
    }

    fn entry_at(&self, id: DefaultKey) -> (&K, &V) {
        let (k, v) = self.links[id]
            .entry
            .as_ref()
            .expect("indexed slot must hold an entry");
        (k, v)
    }

    fn find(&self, key: &K) -> Option<DefaultKey> {
        let hash = self.equivalence.hash(key);
        self.index
            .find(hash, |&id| self.equivalence.equals(self.entry_at(id).0, key))
            .copied()
    }

    /// Insert or overwrite. A new key is appended to the order chain, then
    /// the eviction policy may drop the eldest entry.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(id) = self.find(&key) {
            let slot = self.links[id]
                .entry
                .as_mut()
                .expect("indexed slot must hold an entry");
            return Some(mem::replace(&mut slot.1, value));
        }
        let hash = self.equivalence.hash(&key);
        let tail = self.links[self.sentinel].before;
        let id = self.links.insert(Link {
            entry: Some((key, value)),
            hash,
            before: tail,
            after: self.sentinel,
        });
        self.links[tail].after = id;
        self.links[self.sentinel].before = id;
        self.index.insert_unique(hash, id);
        self.maybe_evict();
        None
    }

    fn maybe_evict(&mut self) {
        let Some(policy) = self.evict.as_mut() else {
            return;
        };
        let eldest = self.links[self.sentinel].after;
        let Some((k, v)) = self.links[eldest].entry.as_ref() else {
            return;
        };
        if policy(MapEntry::new(k, v), self.index.len()) {
            log::debug!("evicting eldest entry at len {}", self.index.len());
            self.unlink(eldest);
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|id| self.entry_at(id).1)
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).map(|id| self.entry_at(id))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key)?;
        self.links[id].entry.as_mut().map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|e| e.value() == value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let id = self.find(key)?;
        Some(self.unlink(id))
    }

    // Drop `id` from the bucket chain and the order chain together.
    fn unlink(&mut self, id: DefaultKey) -> (K, V) {
        let link = self
            .links
            .remove(id)
            .expect("unlink target must be a live slot");
        self.links[link.before].after = link.after;
        self.links[link.after].before = link.before;
        let (key, value) = link.entry.expect("sentinel is never unlinked");
        self.index
            .remove(link.hash, |&k| k == id)
            .expect("live slot must be indexed");
        (key, value)
    }

    pub fn clear(&mut self) {
        self.index.clear();
        let sentinel = self.sentinel;
        self.links.retain(|k, _| k == sentinel);
        let head = &mut self.links[sentinel];
        head.before = sentinel;
        head.after = sentinel;
    }

    /// Oldest live entry.
    pub fn eldest(&self) -> Option<MapEntry<'_, K, V>> {
        self.view(self.links[self.sentinel].after)
    }

    /// Most recently inserted live entry.
    pub fn newest(&self) -> Option<MapEntry<'_, K, V>> {
        self.view(self.links[self.sentinel].before)
    }

    fn view(&self, id: DefaultKey) -> Option<MapEntry<'_, K, V>> {
        self.links[id]
            .entry
            .as_ref()
            .map(|(k, v)| MapEntry::new(k, v))
    }

    /// Entries oldest first.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            links: &self.links,
            sentinel: self.sentinel,
            cursor: self.links[self.sentinel].after,
            remaining: self.len(),
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
        self.index.assert_invariants();
        let mut walked = 0;
        let mut prev = self.sentinel;
        let mut cur = self.links[self.sentinel].after;
        while cur != self.sentinel {
            let link = &self.links[cur];
            assert_eq!(link.before, prev, "before link does not mirror after link");
            assert!(self.index.iter().any(|&id| id == cur), "chained entry missing from index");
            walked += 1;
            assert!(walked <= self.len(), "order chain longer than the map");
            prev = cur;
            cur = link.after;
        }
        assert_eq!(self.links[self.sentinel].before, prev);
        assert_eq!(walked, self.len(), "order chain misses live entries");
        assert_eq!(self.links.len(), self.len() + 1);
    }
}

/// Iterator over [`InsertionOrderMap`] entries in insertion order.
pub struct Iter<'a, K, V> {
    links: &'a SlotMap<DefaultKey, Link<K, V>>,
    sentinel: DefaultKey,
    cursor: DefaultKey,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = MapEntry<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == self.sentinel {
            return None;
        }
        let link = &self.links[self.cursor];
        self.cursor = link.after;
        self.remaining -= 1;
        link.entry.as_ref().map(|(k, v)| MapEntry::new(k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, E> IntoIterator for &'a InsertionOrderMap<K, V, E>
where
    E: KeyEquivalence<K>,
{
    type Item = MapEntry<'a, K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, E> Extend<(K, V)> for InsertionOrderMap<K, V, E>
where
    E: KeyEquivalence<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for InsertionOrderMap<K, V>
where
    K: Eq + core::hash::Hash,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, E> fmt::Debug for InsertionOrderMap<K, V, E>
where
    K: fmt::Debug,
    V: fmt::Debug,
    E: KeyEquivalence<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|e| e.into_parts()))
            .finish()
    }
}
