//! Construction parameters for [`SkipList`](crate::SkipList).

use crate::error::{Error, Result};

pub const DEFAULT_MAX_LEVEL_HINT: usize = 16;
pub const DEFAULT_PROMOTION_PROBABILITY: f64 = 0.5;

/// Tuning knobs for a skip list.
///
/// `max_level_hint` is a soft cap on node height. The engine only lets a node
/// climb past it one lane at a time, once the current top lane is occupied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkipListConfig {
    pub max_level_hint: usize,
    pub promotion_probability: f64,
}

impl Default for SkipListConfig {
    fn default() -> Self {
        Self {
            max_level_hint: DEFAULT_MAX_LEVEL_HINT,
            promotion_probability: DEFAULT_PROMOTION_PROBABILITY,
        }
    }
}

impl SkipListConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_level_hint(mut self, max_level_hint: usize) -> Self {
        self.max_level_hint = max_level_hint;
        self
    }

    pub fn promotion_probability(mut self, p: f64) -> Self {
        self.promotion_probability = p;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_level_hint == 0 {
            return Err(Error::InvalidMaxLevel(self.max_level_hint));
        }
        check_probability(self.promotion_probability)
    }
}

/// Rejects anything outside the open interval (0, 1), NaN included.
pub(crate) fn check_probability(p: f64) -> Result<()> {
    if p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidProbability(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SkipListConfig::default();
        assert_eq!(config.max_level_hint, 16);
        assert_eq!(config.promotion_probability, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_max_level() {
        let config = SkipListConfig::new().max_level_hint(0);
        assert!(matches!(config.validate(), Err(Error::InvalidMaxLevel(0))));
    }

    #[test]
    fn rejects_probability_outside_open_interval() {
        for p in [0.0, 1.0, -0.25, 1.5, f64::NAN] {
            let config = SkipListConfig::new().promotion_probability(p);
            assert!(
                matches!(config.validate(), Err(Error::InvalidProbability(_))),
                "accepted p={p}"
            );
        }
        assert!(
            SkipListConfig::new()
                .promotion_probability(0.25)
                .validate()
                .is_ok()
        );
    }
}
