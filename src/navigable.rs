//! The navigable-map contract shared by the ordered implementations.

use crate::entry::MapEntry;

/// Key-ordered map with boundary queries.
///
/// Every query that finds nothing returns `None`, including any query on an
/// empty map. Keys are ordered by the implementation's comparator; two keys
/// that compare `Equal` are the same key.
pub trait NavigableMap<K, V> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &K) -> Option<&V>;

    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Insert or overwrite; returns the previous value for `key`.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    fn remove(&mut self, key: &K) -> Option<V>;

    fn clear(&mut self);

    /// Entry with the smallest key.
    fn first_entry(&self) -> Option<MapEntry<'_, K, V>>;

    /// Entry with the largest key.
    fn last_entry(&self) -> Option<MapEntry<'_, K, V>>;

    /// Entry with the smallest key `>= key`.
    fn ceiling_entry(&self, key: &K) -> Option<MapEntry<'_, K, V>>;

    /// Entry with the largest key `<= key`.
    fn floor_entry(&self, key: &K) -> Option<MapEntry<'_, K, V>>;

    /// Entry with the smallest key `> key`.
    fn higher_entry(&self, key: &K) -> Option<MapEntry<'_, K, V>>;

    /// Entry with the largest key `< key`.
    fn lower_entry(&self, key: &K) -> Option<MapEntry<'_, K, V>>;

    fn first_key<'a>(&'a self) -> Option<&'a K>
    where
        V: 'a,
    {
        self.first_entry().map(|e| e.key())
    }

    fn last_key<'a>(&'a self) -> Option<&'a K>
    where
        V: 'a,
    {
        self.last_entry().map(|e| e.key())
    }

    fn ceiling_key<'a>(&'a self, key: &K) -> Option<&'a K>
    where
        V: 'a,
    {
        self.ceiling_entry(key).map(|e| e.key())
    }

    fn floor_key<'a>(&'a self, key: &K) -> Option<&'a K>
    where
        V: 'a,
    {
        self.floor_entry(key).map(|e| e.key())
    }

    fn higher_key<'a>(&'a self, key: &K) -> Option<&'a K>
    where
        V: 'a,
    {
        self.higher_entry(key).map(|e| e.key())
    }

    fn lower_key<'a>(&'a self, key: &K) -> Option<&'a K>
    where
        V: 'a,
    {
        self.lower_entry(key).map(|e| e.key())
    }
}

/// Implements [`NavigableMap`] by forwarding to inherent methods of the
/// same names.
macro_rules! navigable_via_inherent {
    ([$($g:ident),*] $ty:ty where $($bound:tt)*) => {
        impl<$($g),*> $crate::navigable::NavigableMap<K, V> for $ty
        where
            $($bound)*
        {
            fn len(&self) -> usize {
                <$ty>::len(self)
            }

            fn get(&self, key: &K) -> Option<&V> {
                <$ty>::get(self, key)
            }

            fn contains_key(&self, key: &K) -> bool {
                <$ty>::contains_key(self, key)
            }

            fn insert(&mut self, key: K, value: V) -> Option<V> {
                <$ty>::insert(self, key, value)
            }

            fn remove(&mut self, key: &K) -> Option<V> {
                <$ty>::remove(self, key)
            }

            fn clear(&mut self) {
                <$ty>::clear(self)
            }

            fn first_entry(&self) -> Option<$crate::entry::MapEntry<'_, K, V>> {
                <$ty>::first_entry(self)
            }

            fn last_entry(&self) -> Option<$crate::entry::MapEntry<'_, K, V>> {
                <$ty>::last_entry(self)
            }

            fn ceiling_entry(&self, key: &K) -> Option<$crate::entry::MapEntry<'_, K, V>> {
                <$ty>::ceiling_entry(self, key)
            }

            fn floor_entry(&self, key: &K) -> Option<$crate::entry::MapEntry<'_, K, V>> {
                <$ty>::floor_entry(self, key)
            }

            fn higher_entry(&self, key: &K) -> Option<$crate::entry::MapEntry<'_, K, V>> {
                <$ty>::higher_entry(self, key)
            }

            fn lower_entry(&self, key: &K) -> Option<$crate::entry::MapEntry<'_, K, V>> {
                <$ty>::lower_entry(self, key)
            }
        }
    };
}

pub(crate) use navigable_via_inherent;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BalancedTreeMap, OrderedHashMap, SkipListMap};

    // Drives only the provided `_key` methods, through the trait.
    fn key_answers<M: NavigableMap<u32, String>>(m: &M) -> [Option<u32>; 6] {
        [
            m.first_key().copied(),
            m.last_key().copied(),
            m.ceiling_key(&25).copied(),
            m.floor_key(&25).copied(),
            m.higher_key(&30).copied(),
            m.lower_key(&10).copied(),
        ]
    }

    /// Invariant: every `_key` default agrees with its `_entry` form.
    #[test]
    fn key_defaults_follow_entries() {
        let pairs = [10u32, 20, 30, 40].map(|k| (k, k.to_string()));
        let tree: BalancedTreeMap<u32, String> = pairs.clone().into_iter().collect();
        let skip: SkipListMap<u32, String> = pairs.clone().into_iter().collect();
        let hashed: OrderedHashMap<u32, String> = pairs.into_iter().collect();
        let expected = [Some(10), Some(40), Some(30), Some(20), Some(40), None];
        assert_eq!(key_answers(&tree), expected);
        assert_eq!(key_answers(&skip), expected);
        assert_eq!(key_answers(&hashed), expected);
        assert_eq!(key_answers(&BalancedTreeMap::new()), [None; 6]);
    }
}
