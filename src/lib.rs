//! navmap: interchangeable in-memory maps sharing one navigable contract.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: several map engines with very different internals that are
//!   indistinguishable through [`NavigableMap`]. One test suite drives all
//!   navigable variants identically.
//! - Engines:
//!   - HashTable<K, V, E>: separate chaining over a bucket array, keys
//!     compared through an injected [`KeyEquivalence`].
//!   - InsertionOrderMap<K, V, E>: the same chained buckets indexing an
//!     arena of entries linked into a circular, sentinel-headed order chain;
//!     optional eviction policy for bounded caches.
//!   - BalancedTreeMap<K, V, C>: AVL tree ordered by a [`Comparator`]; the
//!     reference navigable map.
//!   - SkipListMap<K, V, C>: randomized levels, no rebalancing.
//!   - OrderedHashMap<K, V, C, E>: HashTable for point operations plus a
//!     BalancedTreeMap of keys serving navigation.
//!
//! Constraints
//! - Single-threaded, synchronous. Callers serialize shared access.
//! - Linked structures use `SlotMap` arenas and slot keys instead of owning
//!   pointers, so cycles (the order chain) need no `Rc` or `unsafe`.
//! - "Not found" is always `None`. Invalid numeric configuration is a
//!   `ConfigError` at construction. A broken internal invariant panics.
//!
//! Hashing
//! - Each chained node stores the hash computed at insert; bucket placement
//!   and growth use only that stored hash, so `E::hash` runs once per insert
//!   and once per lookup.
//! - The bucket array starts at 20 buckets and doubles once
//!   `len > capacity * load_factor` (0.75 by default).
//!
//! Ordering
//! - Keys comparing `Equal` are the same key: inserting overwrites the value
//!   and keeps the originally stored key.
//! - `Option<K>` keys under [`NaturalOrder`] place `None` first.
//!
//! Notes and non-goals
//! - No persistence, no serialization, no concurrent mutation.
//! - Entry views ([`MapEntry`]) borrow the map; they cannot be held across a
//!   mutation.
//! - Iterating while mutating is prevented by the borrow checker rather than
//!   detected at runtime.

pub mod capability;
mod chains;
pub mod config;
pub mod entry;
pub mod error;
pub mod hash_table;
pub mod insertion_order_map;
pub mod navigable;
mod navigable_proptest;
pub mod ordered_hash_map;
pub mod skip_list;
pub mod tree_map;

// Public surface
pub use capability::{Comparator, FnEquivalence, KeyEquivalence, NaturalOrder, Structural};
pub use config::{HashTableConfig, SkipListConfig};
pub use entry::MapEntry;
pub use error::ConfigError;
pub use hash_table::HashTable;
pub use insertion_order_map::{EvictionPolicy, InsertionOrderMap};
pub use navigable::NavigableMap;
pub use ordered_hash_map::OrderedHashMap;
pub use skip_list::SkipListMap;
pub use tree_map::BalancedTreeMap;
