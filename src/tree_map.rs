//! BalancedTreeMap: AVL tree in a slot arena.
//!
//! Nodes live in a `SlotMap` and refer to their children by slot key.
//! Insert and remove recurse from the root and rebuild the path on the way
//! back up, rotating wherever a subtree's height difference reaches two, so
//! every subtree stays within one level of balance.

use crate::capability::{Comparator, NaturalOrder};
use crate::entry::MapEntry;
use crate::navigable::navigable_via_inherent;
use core::cmp::{self, Ordering};
use core::fmt;
use core::mem;
use slotmap::{DefaultKey, SlotMap};

type NodeId = DefaultKey;

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    left: Option<NodeId>,
    right: Option<NodeId>,
    height: u8,
}

/// Ordered map kept height-balanced under every insert and remove.
pub struct BalancedTreeMap<K, V, C = NaturalOrder> {
    comparator: C,
    nodes: SlotMap<NodeId, Node<K, V>>,
    root: Option<NodeId>,
}

impl<K: Ord, V> BalancedTreeMap<K, V> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K: Ord, V> Default for BalancedTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> BalancedTreeMap<K, V, C>
where
    C: Comparator<K>,
{
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            comparator,
            nodes: SlotMap::with_key(),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Height of the tree; 0 when empty.
    pub fn height(&self) -> usize {
        usize::from(self.height_of(self.root))
    }

    fn find(&self, key: &K) -> Option<NodeId> {
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            cur = match self.comparator.compare(key, &node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
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
        let (root, old) = self.insert_at(self.root, key, value);
        self.root = Some(root);
        old
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let (root, removed) = self.remove_at(self.root, key);
        self.root = root;
        removed
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub fn first_entry(&self) -> Option<MapEntry<'_, K, V>> {
        let mut id = self.root?;
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        Some(self.view(id))
    }

    pub fn last_entry(&self) -> Option<MapEntry<'_, K, V>> {
        let mut id = self.root?;
        while let Some(right) = self.nodes[id].right {
            id = right;
        }
        Some(self.view(id))
    }

    pub fn ceiling_entry(&self, key: &K) -> Option<MapEntry<'_, K, V>> {
        self.bound(key, true, true).map(|id| self.view(id))
    }

    pub fn floor_entry(&self, key: &K) -> Option<MapEntry<'_, K, V>> {
        self.bound(key, true, false).map(|id| self.view(id))
    }

    pub fn higher_entry(&self, key: &K) -> Option<MapEntry<'_, K, V>> {
        self.bound(key, false, true).map(|id| self.view(id))
    }

    pub fn lower_entry(&self, key: &K) -> Option<MapEntry<'_, K, V>> {
        self.bound(key, false, false).map(|id| self.view(id))
    }

    // Descend from the root remembering the closest node seen so far on the
    // requested side of `key`.
    fn bound(&self, key: &K, inclusive: bool, above: bool) -> Option<NodeId> {
        let mut best = None;
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            let ord = self.comparator.compare(&node.key, key);
            if ord == Ordering::Equal && inclusive {
                return Some(id);
            }
            let on_side = if above {
                ord == Ordering::Greater
            } else {
                ord == Ordering::Less
            };
            if on_side {
                best = Some(id);
            }
            // Anything closer to `key` lies in the subtree facing it.
            cur = if on_side == above { node.left } else { node.right };
        }
        best
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut it = Iter {
            nodes: &self.nodes,
            stack: Vec::new(),
            remaining: self.nodes.len(),
        };
        it.push_left(self.root);
        it
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|e| e.key())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|e| e.value())
    }

    fn height_of(&self, id: Option<NodeId>) -> u8 {
        id.map_or(0, |id| self.nodes[id].height)
    }

    fn update_height(&mut self, id: NodeId) {
        let node = &self.nodes[id];
        let h = 1 + cmp::max(self.height_of(node.left), self.height_of(node.right));
        self.nodes[id].height = h;
    }

    fn balance_factor(&self, id: NodeId) -> i16 {
        let node = &self.nodes[id];
        i16::from(self.height_of(node.left)) - i16::from(self.height_of(node.right))
    }

    fn rotate_right(&mut self, id: NodeId) -> NodeId {
        let pivot = self.nodes[id]
            .left
            .expect("right rotation requires a left child");
        self.nodes[id].left = self.nodes[pivot].right;
        self.nodes[pivot].right = Some(id);
        self.update_height(id);
        self.update_height(pivot);
        pivot
    }

    fn rotate_left(&mut self, id: NodeId) -> NodeId {
        let pivot = self.nodes[id]
            .right
            .expect("left rotation requires a right child");
        self.nodes[id].right = self.nodes[pivot].left;
        self.nodes[pivot].left = Some(id);
        self.update_height(id);
        self.update_height(pivot);
        pivot
    }

    /// Restore the height bound at `id`; returns the subtree's new root.
    fn rebalance(&mut self, id: NodeId) -> NodeId {
        self.update_height(id);
        match self.balance_factor(id) {
            2..=i16::MAX => {
                let left = self.nodes[id].left.expect("left-heavy node has a left child");
                if self.balance_factor(left) < 0 {
                    let l = self.rotate_left(left);
                    self.nodes[id].left = Some(l);
                }
                self.rotate_right(id)
            }
            i16::MIN..=-2 => {
                let right = self.nodes[id].right.expect("right-heavy node has a right child");
                if self.balance_factor(right) > 0 {
                    let r = self.rotate_right(right);
                    self.nodes[id].right = Some(r);
                }
                self.rotate_left(id)
            }
            _ => id,
        }
    }

    fn insert_at(&mut self, root: Option<NodeId>, key: K, value: V) -> (NodeId, Option<V>) {
        let Some(id) = root else {
            let leaf = self.nodes.insert(Node {
                key,
                value,
                left: None,
                right: None,
                height: 1,
            });
            return (leaf, None);
        };
        match self.comparator.compare(&key, &self.nodes[id].key) {
            Ordering::Equal => (id, Some(mem::replace(&mut self.nodes[id].value, value))),
            Ordering::Less => {
                let (child, old) = self.insert_at(self.nodes[id].left, key, value);
                self.nodes[id].left = Some(child);
                if old.is_some() {
                    return (id, old);
                }
                (self.rebalance(id), None)
            }
            Ordering::Greater => {
                let (child, old) = self.insert_at(self.nodes[id].right, key, value);
                self.nodes[id].right = Some(child);
                if old.is_some() {
                    return (id, old);
                }
                (self.rebalance(id), None)
            }
        }
    }

    fn remove_at(&mut self, root: Option<NodeId>, key: &K) -> (Option<NodeId>, Option<(K, V)>) {
        let Some(id) = root else {
            return (None, None);
        };
        match self.comparator.compare(key, &self.nodes[id].key) {
            Ordering::Less => {
                let (child, removed) = self.remove_at(self.nodes[id].left, key);
                if removed.is_none() {
                    return (Some(id), None);
                }
                self.nodes[id].left = child;
                (Some(self.rebalance(id)), removed)
            }
            Ordering::Greater => {
                let (child, removed) = self.remove_at(self.nodes[id].right, key);
                if removed.is_none() {
                    return (Some(id), None);
                }
                self.nodes[id].right = child;
                (Some(self.rebalance(id)), removed)
            }
            Ordering::Equal => {
                let replacement = match (self.nodes[id].left, self.nodes[id].right) {
                    (None, only) | (only, None) => only,
                    (Some(left), Some(right)) => {
                        let (rest, successor) = self.detach_min(right);
                        self.nodes[successor].left = Some(left);
                        self.nodes[successor].right = rest;
                        Some(self.rebalance(successor))
                    }
                };
                let node = self
                    .nodes
                    .remove(id)
                    .expect("matched node must be live");
                (replacement, Some((node.key, node.value)))
            }
        }
    }

    /// Unhook the minimum of the subtree at `id`. Returns the rebalanced
    /// remainder and the detached node.
    fn detach_min(&mut self, id: NodeId) -> (Option<NodeId>, NodeId) {
        match self.nodes[id].left {
            None => (self.nodes[id].right, id),
            Some(left) => {
                let (rest, min) = self.detach_min(left);
                self.nodes[id].left = rest;
                (Some(self.rebalance(id)), min)
            }
        }
    }

    /// Panics unless keys are strictly increasing in order, stored heights
    /// are exact, and no node is out of balance.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        fn walk<K, V, C: Comparator<K>>(
            map: &BalancedTreeMap<K, V, C>,
            id: Option<NodeId>,
            count: &mut usize,
        ) -> u8 {
            let Some(id) = id else { return 0 };
            let node = &map.nodes[id];
            *count += 1;
            if let Some(l) = node.left {
                assert_eq!(
                    map.comparator.compare(&map.nodes[l].key, &node.key),
                    Ordering::Less,
                    "left child out of order"
                );
            }
            if let Some(r) = node.right {
                assert_eq!(
                    map.comparator.compare(&map.nodes[r].key, &node.key),
                    Ordering::Greater,
                    "right child out of order"
                );
            }
            let lh = walk(map, node.left, count);
            let rh = walk(map, node.right, count);
            assert!(lh.abs_diff(rh) <= 1, "subtree out of balance");
            assert_eq!(node.height, 1 + lh.max(rh), "stale height");
            node.height
        }
        let mut count = 0;
        walk(self, self.root, &mut count);
        assert_eq!(count, self.nodes.len(), "unreachable nodes in arena");
        let keys: Vec<&K> = self.keys().collect();
        for pair in keys.windows(2) {
            assert_eq!(
                self.comparator.compare(pair[0], pair[1]),
                Ordering::Less,
                "in-order walk not strictly increasing"
            );
        }
    }
}

navigable_via_inherent!([K, V, C] BalancedTreeMap<K, V, C> where C: Comparator<K>);

/// In-order iterator over a [`BalancedTreeMap`].
pub struct Iter<'a, K, V> {
    nodes: &'a SlotMap<NodeId, Node<K, V>>,
    stack: Vec<NodeId>,
    remaining: usize,
}

impl<K, V> Iter<'_, K, V> {
    fn push_left(&mut self, mut cur: Option<NodeId>) {
        while let Some(id) = cur {
            self.stack.push(id);
            cur = self.nodes[id].left;
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = MapEntry<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let nodes = self.nodes;
        let node = &nodes[id];
        self.push_left(node.right);
        self.remaining -= 1;
        Some(MapEntry::new(&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, C> IntoIterator for &'a BalancedTreeMap<K, V, C>
where
    C: Comparator<K>,
{
    type Item = MapEntry<'a, K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> Extend<(K, V)> for BalancedTreeMap<K, V, C>
where
    C: Comparator<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BalancedTreeMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C> fmt::Debug for BalancedTreeMap<K, V, C>
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
