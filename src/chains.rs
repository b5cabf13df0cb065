//! Chains: separate-chaining bucket storage shared by the hash-backed maps.
//!
//! Every node carries the hash computed when it was inserted. Bucket
//! placement and rehashing only ever read that stored hash, so user hash
//! code runs once per insert and never during a resize.
//!
//! The storage knows nothing about keys; callers pass the hash and an
//! equality predicate over the stored item.

use crate::config::HashTableConfig;
use core::mem;

type Link<T> = Option<Box<ChainNode<T>>>;

#[derive(Debug)]
struct ChainNode<T> {
    hash: u64,
    item: T,
    next: Link<T>,
}

#[derive(Debug)]
pub(crate) struct Chains<T> {
    buckets: Vec<Link<T>>,
    len: usize,
    load_factor: f32,
}

impl<T> Chains<T> {
    /// `config` must already be validated.
    pub(crate) fn new(config: HashTableConfig) -> Self {
        Self {
            buckets: Self::empty_buckets(config.initial_capacity),
            len: 0,
            load_factor: config.load_factor,
        }
    }

    fn empty_buckets(n: usize) -> Vec<Link<T>> {
        let mut buckets = Vec::with_capacity(n);
        buckets.resize_with(n, || None);
        buckets
    }

    #[inline]
    fn bucket_of(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn find(&self, hash: u64, mut eq: impl FnMut(&T) -> bool) -> Option<&T> {
        let mut link = self.buckets[self.bucket_of(hash)].as_deref();
        while let Some(node) = link {
            if node.hash == hash && eq(&node.item) {
                return Some(&node.item);
            }
            link = node.next.as_deref();
        }
        None
    }

    pub(crate) fn find_mut(
        &mut self,
        hash: u64,
        mut eq: impl FnMut(&T) -> bool,
    ) -> Option<&mut T> {
        let idx = self.bucket_of(hash);
        let mut link = self.buckets[idx].as_deref_mut();
        while let Some(node) = link {
            if node.hash == hash && eq(&node.item) {
                return Some(&mut node.item);
            }
            link = node.next.as_deref_mut();
        }
        None
    }

    /// Push `item` onto its bucket. The caller has already checked that no
    /// equal item is stored.
    pub(crate) fn insert_unique(&mut self, hash: u64, item: T) {
        let idx = self.bucket_of(hash);
        let next = self.buckets[idx].take();
        self.buckets[idx] = Some(Box::new(ChainNode { hash, item, next }));
        self.len += 1;
        // A small load factor can need more than one doubling.
        while self.overloaded() {
            self.grow();
        }
    }

    #[inline]
    fn overloaded(&self) -> bool {
        self.len as f64 > self.buckets.len() as f64 * f64::from(self.load_factor)
    }

    pub(crate) fn remove(&mut self, hash: u64, mut eq: impl FnMut(&T) -> bool) -> Option<T> {
        let idx = self.bucket_of(hash);
        let mut cursor = &mut self.buckets[idx];
        while cursor
            .as_ref()
            .is_some_and(|node| !(node.hash == hash && eq(&node.item)))
        {
            cursor = &mut cursor.as_mut()?.next;
        }
        let mut node = cursor.take()?;
        *cursor = node.next.take();
        self.len -= 1;
        Some(node.item)
    }

    pub(crate) fn clear(&mut self) {
        for bucket in &mut self.buckets {
            Self::drop_chain(bucket.take());
        }
        self.len = 0;
    }

    // Unlink iteratively; the default recursive drop could overflow the
    // stack on a long chain.
    fn drop_chain(mut link: Link<T>) {
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }

    fn grow(&mut self) {
        let new_capacity = self.buckets.len() * 2;
        log::trace!(
            "growing hash table from {} to {} buckets ({} entries)",
            self.buckets.len(),
            new_capacity,
            self.len
        );
        let old = mem::replace(&mut self.buckets, Self::empty_buckets(new_capacity));
        for mut link in old {
            while let Some(mut node) = link {
                link = node.next.take();
                let idx = self.bucket_of(node.hash);
                node.next = self.buckets[idx].take();
                self.buckets[idx] = Some(node);
            }
        }
    }

    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            buckets: self.buckets.iter(),
            node: None,
        }
    }

    /// Panics unless every node sits in the bucket its hash selects and
    /// `len` matches the node count.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut seen = 0;
        for (i, bucket) in self.buckets.iter().enumerate() {
            let mut link = bucket.as_deref();
            while let Some(node) = link {
                assert_eq!(self.bucket_of(node.hash), i, "node stored in wrong bucket");
                seen += 1;
                link = node.next.as_deref();
            }
        }
        assert_eq!(seen, self.len, "len out of sync with stored nodes");
        assert!(!self.overloaded(), "load factor exceeded without growing");
    }
}

impl<T> Drop for Chains<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Items in bucket order.
pub(crate) struct Iter<'a, T> {
    buckets: core::slice::Iter<'a, Link<T>>,
    node: Option<&'a ChainNode<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.node {
                self.node = node.next.as_deref();
                return Some(&node.item);
            }
            self.node = self.buckets.next()?.as_deref();
        }
    }
}
