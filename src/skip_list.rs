//! SkipListMap: probabilistic ordered map.
//!
//! ```text
//! level 2:  HEAD ──────────────► 50 ─────────────► NIL
//! level 1:  HEAD ──────► 20 ───► 50 ─────────────► NIL
//! level 0:  HEAD ► 10 ► 20 ► 30 ► 50 ► 60 ► 70 ──► NIL
//! ```
//!
//! Nodes live in a `SlotMap`; forward pointers are slot keys and `None`
//! marks the end of a level. The header is the `head` array itself, one
//! pointer per level up to the configured bound. A node's height is drawn
//! at insert by repeated coin flips and never changes, so no rebalancing
//! ever happens.

use crate::capability::{Comparator, NaturalOrder};
use crate::config::SkipListConfig;
use crate::entry::MapEntry;
use crate::error::ConfigError;
use crate::navigable::navigable_via_inherent;
use core::cmp::Ordering;
use core::fmt;
use core::mem;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use slotmap::{DefaultKey, SlotMap};

type NodeId = DefaultKey;

#[derive(Debug)]
struct SkipNode<K, V> {
    key: K,
    value: V,
    /// `forward[i]` is the next node on level `i`; the length is the
    /// node's level count.
    forward: Vec<Option<NodeId>>,
}

/// Ordered map over a skip list with expected logarithmic cost.
pub struct SkipListMap<K, V, C = NaturalOrder> {
    comparator: C,
    nodes: SlotMap<NodeId, SkipNode<K, V>>,
    head: Vec<Option<NodeId>>,
    /// Number of levels currently holding at least one node.
    level: usize,
    probability: f64,
    rng: SmallRng,
}

impl<K: Ord, V> SkipListMap<K, V> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K: Ord, V> Default for SkipListMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> SkipListMap<K, V, C>
where
    C: Comparator<K>,
{
    pub fn with_comparator(comparator: C) -> Self {
        Self::from_parts(comparator, SkipListConfig::default())
    }

    pub fn with_config(comparator: C, config: SkipListConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(comparator, config))
    }

    fn from_parts(comparator: C, config: SkipListConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        Self {
            comparator,
            nodes: SlotMap::with_key(),
            head: vec![None; config.max_level],
            level: 0,
            probability: config.probability,
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of levels currently in use.
    pub fn level(&self) -> usize {
        self.level
    }

    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.head.len() && self.rng.random_bool(self.probability) {
            level += 1;
        }
        level
    }

    /// Successor of `pred` on `level`; `None` as `pred` stands for the header.
    #[inline]
    fn next_of(&self, pred: Option<NodeId>, level: usize) -> Option<NodeId> {
        match pred {
            None => self.head[level],
            Some(id) => self.nodes[id].forward[level],
        }
    }

    fn set_next(&mut self, pred: Option<NodeId>, level: usize, to: Option<NodeId>) {
        match pred {
            None => self.head[level] = to,
            Some(id) => self.nodes[id].forward[level] = to,
        }
    }

    /// Top-down search: on each level advance while `advance(next.key)`
    /// holds, then drop a level. Returns the level-0 node where the walk
    /// stopped (`None` means the header).
    fn descend(&self, mut advance: impl FnMut(&K) -> bool) -> Option<NodeId> {
        let mut pred = None;
        for level in (0..self.level).rev() {
            while let Some(next) = self.next_of(pred, level) {
                if !advance(&self.nodes[next].key) {
                    break;
                }
                pred = Some(next);
            }
        }
        pred
    }

    /// Last node with a key below `key`, per level.
    fn predecessors(&self, key: &K) -> Vec<Option<NodeId>> {
        let mut update = vec![None; self.head.len()];
        let mut pred = None;
        for level in (0..self.level).rev() {
            while let Some(next) = self.next_of(pred, level) {
                if self.comparator.compare(&self.nodes[next].key, key) != Ordering::Less {
                    break;
                }
                pred = Some(next);
            }
            update[level] = pred;
        }
        update
    }

    fn find(&self, key: &K) -> Option<NodeId> {
        let pred = self.descend(|k| self.comparator.compare(k, key) == Ordering::Less);
        self.next_of(pred, 0)
            .filter(|&id| self.comparator.compare(&self.nodes[id].key, key) == Ordering::Equal)
    }

    fn view(&self, id: NodeId) -> MapEntry<'_, K, V> {
        let node = &self.nodes[id];
        MapEntry::new(&node.key, &node.value)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|id| &self.nodes[id].value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key)?;
        Some(&mut self.nodes[id].value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.nodes.values().any(|n| n.value == *value)
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let update = self.predecessors(&key);
        if let Some(id) = self.next_of(update[0], 0) {
            if self.comparator.compare(&self.nodes[id].key, &key) == Ordering::Equal {
                return Some(mem::replace(&mut self.nodes[id].value, value));
            }
        }
        let height = self.random_level();
        if height > self.level {
            log::trace!("skip list grows from {} to {} levels", self.level, height);
            // `update` already holds the header for the new levels.
            self.level = height;
        }
        let id = self.nodes.insert(SkipNode {
            key,
            value,
            forward: vec![None; height],
        });
        for (level, &pred) in update.iter().enumerate().take(height) {
            let next = self.next_of(pred, level);
            self.nodes[id].forward[level] = next;
            self.set_next(pred, level, Some(id));
        }
        None
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let update = self.predecessors(key);
        let id = self.next_of(update[0], 0)?;
        if self.comparator.compare(&self.nodes[id].key, key) != Ordering::Equal {
            return None;
        }
        let node = self.nodes.remove(id).expect("located node must be live");
        for (level, next) in node.forward.iter().enumerate() {
            debug_assert_eq!(self.next_of(update[level], level), Some(id));
            self.set_next(update[level], level, *next);
        }
        while self.level > 0 && self.head[self.level - 1].is_none() {
            self.level -= 1;
        }
        Some((node.key, node.value))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head.fill(None);
        self.level = 0;
    }

    pub fn first_entry(&self) -> Option<MapEntry<'_, K, V>> {
        self.head[0].map(|id| self.view(id))
    }

    pub fn last_entry(&self) -> Option<MapEntry<'_, K, V>> {
        self.descend(|_| true).map(|id| self.view(id))
    }

    pub fn ceiling_entry(&self, key: &K) -> Option<MapEntry<'_, K, V>> {
        let pred = self.descend(|k| self.comparator.compare(k, key) == Ordering::Less);
        self.next_of(pred, 0).map(|id| self.view(id))
    }

    pub fn higher_entry(&self, key: &K) -> Option<MapEntry<'_, K, V>> {
        let pred = self.descend(|k| self.comparator.compare(k, key) != Ordering::Greater);
        self.next_of(pred, 0).map(|id| self.view(id))
    }

    pub fn floor_entry(&self, key: &K) -> Option<MapEntry<'_, K, V>> {
        self.descend(|k| self.comparator.compare(k, key) != Ordering::Greater)
            .map(|id| self.view(id))
    }

    pub fn lower_entry(&self, key: &K) -> Option<MapEntry<'_, K, V>> {
        self.descend(|k| self.comparator.compare(k, key) == Ordering::Less)
            .map(|id| self.view(id))
    }

    /// Entries in ascending key order (a walk of level 0).
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            cursor: self.head.first().copied().flatten(),
            remaining: self.nodes.len(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|e| e.key())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|e| e.value())
    }

    /// Panics unless level 0 is strictly increasing and holds every node,
    /// each higher level is a subsequence of the one below, and `level`
    /// matches the highest non-empty list.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let walk = |level: usize| {
            let mut out = Vec::new();
            let mut cur = self.head[level];
            while let Some(id) = cur {
                assert!(self.nodes[id].forward.len() > level, "node linked above its height");
                out.push(id);
                cur = self.nodes[id].forward[level];
            }
            out
        };
        let base = walk(0);
        assert_eq!(base.len(), self.nodes.len(), "level 0 misses nodes");
        for pair in base.windows(2) {
            assert_eq!(
                self.comparator
                    .compare(&self.nodes[pair[0]].key, &self.nodes[pair[1]].key),
                Ordering::Less,
                "level 0 not strictly increasing"
            );
        }
        let mut below = base;
        for level in 1..self.head.len() {
            let here = walk(level);
            let mut it = below.iter();
            for id in &here {
                assert!(it.any(|b| b == id), "level {level} is not a subsequence");
            }
            let expected: Vec<NodeId> = below
                .iter()
                .copied()
                .filter(|&id| self.nodes[id].forward.len() > level)
                .collect();
            assert_eq!(here, expected, "level {level} skips a tall node");
            below = here;
        }
        let used = self.head.iter().take_while(|h| h.is_some()).count();
        assert_eq!(used, self.level, "level count out of sync");
        assert!(self.head[self.level..].iter().all(Option::is_none));
    }
}

navigable_via_inherent!([K, V, C] SkipListMap<K, V, C> where C: Comparator<K>);

/// Level-0 iterator over a [`SkipListMap`].
pub struct Iter<'a, K, V> {
    nodes: &'a SlotMap<NodeId, SkipNode<K, V>>,
    cursor: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = MapEntry<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.nodes[self.cursor?];
        self.cursor = node.forward[0];
        self.remaining -= 1;
        Some(MapEntry::new(&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, C> IntoIterator for &'a SkipListMap<K, V, C>
where
    C: Comparator<K>,
{
    type Item = MapEntry<'a, K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> Extend<(K, V)> for SkipListMap<K, V, C>
where
    C: Comparator<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SkipListMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C> fmt::Debug for SkipListMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Comparator<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|e| e.into_parts()))
            .finish()
    }
}
