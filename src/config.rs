//! Tunables for the hash-backed maps and the skip list.

use crate::error::ConfigError;

/// Bucket-array sizing for the chained hash tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HashTableConfig {
    /// Number of buckets allocated up front.
    pub initial_capacity: usize,
    /// The bucket array doubles once `len > capacity * load_factor`.
    pub load_factor: f32,
}

impl HashTableConfig {
    pub const DEFAULT_CAPACITY: usize = 20;
    pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(ConfigError::InvalidLoadFactor(self.load_factor));
        }
        Ok(())
    }
}

impl Default for HashTableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_CAPACITY,
            load_factor: Self::DEFAULT_LOAD_FACTOR,
        }
    }
}

/// Level assignment for [`SkipListMap`](crate::SkipListMap).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkipListConfig {
    /// Upper bound on the number of levels any node may occupy.
    pub max_level: usize,
    /// Chance that a node is promoted one more level.
    pub probability: f64,
    /// Fixed RNG seed; `None` seeds from the thread RNG.
    pub seed: Option<u64>,
}

impl SkipListConfig {
    pub const DEFAULT_MAX_LEVEL: usize = 16;
    pub const LEVEL_LIMIT: usize = 32;
    pub const DEFAULT_PROBABILITY: f64 = 0.5;

    /// Level bound sized for roughly `expected_len` entries at p = 0.5.
    pub fn for_expected_len(expected_len: usize) -> Self {
        let bits = usize::BITS - expected_len.saturating_sub(1).leading_zeros();
        Self {
            max_level: (bits as usize).clamp(1, Self::LEVEL_LIMIT),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_level == 0 || self.max_level > Self::LEVEL_LIMIT {
            return Err(ConfigError::InvalidMaxLevel {
                got: self.max_level,
                max: Self::LEVEL_LIMIT,
            });
        }
        if !(self.probability > 0.0 && self.probability < 1.0) {
            return Err(ConfigError::InvalidProbability(self.probability));
        }
        Ok(())
    }
}

impl Default for SkipListConfig {
    fn default() -> Self {
        Self {
            max_level: Self::DEFAULT_MAX_LEVEL,
            probability: Self::DEFAULT_PROBABILITY,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(HashTableConfig::default().validate(), Ok(()));
        assert_eq!(SkipListConfig::default().validate(), Ok(()));
    }

    #[test]
    fn hash_table_rejects_bad_parameters() {
        let zero = HashTableConfig { initial_capacity: 0, ..Default::default() };
        assert_eq!(zero.validate(), Err(ConfigError::ZeroCapacity));
        for lf in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let c = HashTableConfig { load_factor: lf, ..Default::default() };
            assert!(matches!(c.validate(), Err(ConfigError::InvalidLoadFactor(_))));
        }
    }

    #[test]
    fn skip_list_rejects_bad_parameters() {
        let c = SkipListConfig { max_level: 0, ..Default::default() };
        assert_eq!(
            c.validate(),
            Err(ConfigError::InvalidMaxLevel { got: 0, max: 32 })
        );
        let c = SkipListConfig { max_level: 33, ..Default::default() };
        assert!(c.validate().is_err());
        for p in [0.0, 1.0, -0.5, f64::NAN] {
            let c = SkipListConfig { probability: p, ..Default::default() };
            assert!(matches!(c.validate(), Err(ConfigError::InvalidProbability(_))));
        }
    }

    #[test]
    fn level_bound_tracks_expected_len() {
        assert_eq!(SkipListConfig::for_expected_len(0).max_level, 1);
        assert_eq!(SkipListConfig::for_expected_len(1).max_level, 1);
        assert_eq!(SkipListConfig::for_expected_len(1024).max_level, 10);
        assert_eq!(SkipListConfig::for_expected_len(1025).max_level, 11);
        assert_eq!(SkipListConfig::for_expected_len(usize::MAX).max_level, 32);
    }
}
