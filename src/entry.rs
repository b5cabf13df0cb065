//! Borrowed key/value views returned by lookups and navigation.

/// Read-only view of one entry. The view borrows the owning map, so it
/// cannot outlive the next mutation of that map.
#[derive(Debug, PartialEq, Eq)]
pub struct MapEntry<'a, K, V> {
    key: &'a K,
    value: &'a V,
}

impl<'a, K, V> MapEntry<'a, K, V> {
    pub(crate) fn new(key: &'a K, value: &'a V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &'a K {
        self.key
    }

    pub fn value(&self) -> &'a V {
        self.value
    }

    pub fn into_parts(self) -> (&'a K, &'a V) {
        (self.key, self.value)
    }

    /// Owned copy of the pair.
    pub fn cloned(&self) -> (K, V)
    where
        K: Clone,
        V: Clone,
    {
        (self.key.clone(), self.value.clone())
    }
}

// Manual impls: a derive would demand `K: Clone, V: Clone`.
impl<K, V> Clone for MapEntry<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for MapEntry<'_, K, V> {}

impl<'a, K, V> From<(&'a K, &'a V)> for MapEntry<'a, K, V> {
    fn from((key, value): (&'a K, &'a V)) -> Self {
        Self::new(key, value)
    }
}
