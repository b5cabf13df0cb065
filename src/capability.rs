//! Key capabilities consumed by the maps: a total order for the navigable
//! maps and a hash/equality pair for the hash-backed ones.

use core::cmp::Ordering;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use hashbrown::hash_map::DefaultHashBuilder;

/// Strict total order over keys. `compare(a, b) == Equal` means the maps
/// treat `a` and `b` as the same key.
///
/// Absent keys are expressed as `Option<K>`; with [`NaturalOrder`] a `None`
/// key sorts before every `Some`.
pub trait Comparator<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Orders keys by their `Ord` impl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Paired hash and equality over keys.
///
/// Implementations must be consistent: `equals(a, b)` implies
/// `hash(a) == hash(b)`.
pub trait KeyEquivalence<K: ?Sized> {
    fn hash(&self, key: &K) -> u64;
    fn equals(&self, a: &K, b: &K) -> bool;
}

/// Default equivalence: hashes through a `BuildHasher` and compares with
/// `Eq`. For plain data keys `#[derive(Hash, PartialEq, Eq)]` gives the
/// field-by-field behaviour.
#[derive(Debug, Clone, Default)]
pub struct Structural<S = DefaultHashBuilder> {
    build: S,
}

impl Structural {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: BuildHasher> Structural<S> {
    pub fn with_hasher(build: S) -> Self {
        Self { build }
    }
}

impl<K, S> KeyEquivalence<K> for Structural<S>
where
    K: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self.build.hash_one(key)
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Equivalence assembled from two closures, for keys whose identity is a
/// projection of their fields.
pub struct FnEquivalence<K: ?Sized, H, Q> {
    hash: H,
    eq: Q,
    _key: PhantomData<fn(&K)>,
}

impl<K: ?Sized, H, Q> FnEquivalence<K, H, Q>
where
    H: Fn(&K) -> u64,
    Q: Fn(&K, &K) -> bool,
{
    pub fn new(hash: H, eq: Q) -> Self {
        Self {
            hash,
            eq,
            _key: PhantomData,
        }
    }
}

impl<K: ?Sized, H, Q> KeyEquivalence<K> for FnEquivalence<K, H, Q>
where
    H: Fn(&K) -> u64,
    Q: Fn(&K, &K) -> bool,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        (self.hash)(key)
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        (self.eq)(a, b)
    }
}

impl<K: ?Sized, H, Q> core::fmt::Debug for FnEquivalence<K, H, Q> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("FnEquivalence")
    }
}
