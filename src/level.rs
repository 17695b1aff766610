//! Height selection for new nodes.
//!
//! Every node lives in lane 0; each further lane is reached with probability
//! `p` given the one below it, so heights are geometrically distributed and
//! the expected number of lanes a node occupies is `1 / (1 - p)`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{DEFAULT_PROMOTION_PROBABILITY, check_probability};
use crate::error::Result;

/// Source of node heights.
///
/// Implementations must return a value in `[0, cap]`; the engine clamps
/// anything larger.
pub trait LevelGenerator {
    fn choose_height(&mut self, cap: usize) -> usize;
}

/// Geometric level generator driven by a `StdRng`.
#[derive(Debug, Clone)]
pub struct GeometricLevel {
    p: f64,
    rng: StdRng,
}

impl GeometricLevel {
    /// Seeded from the operating system.
    pub fn new(p: f64) -> Result<Self> {
        check_probability(p)?;
        Ok(Self::from_rng(p, StdRng::from_os_rng()))
    }

    /// Deterministic sequence of heights for a given seed.
    pub fn seeded(p: f64, seed: u64) -> Result<Self> {
        check_probability(p)?;
        Ok(Self::from_rng(p, StdRng::seed_from_u64(seed)))
    }

    pub(crate) fn from_rng(p: f64, rng: StdRng) -> Self {
        Self { p, rng }
    }

    pub fn probability(&self) -> f64 {
        self.p
    }
}

impl Default for GeometricLevel {
    fn default() -> Self {
        Self::from_rng(DEFAULT_PROMOTION_PROBABILITY, StdRng::from_os_rng())
    }
}

impl LevelGenerator for GeometricLevel {
    fn choose_height(&mut self, cap: usize) -> usize {
        let mut level = 0;
        while level < cap && self.rng.random_bool(self.p) {
            level += 1;
        }
        level
    }
}

impl<G: LevelGenerator + ?Sized> LevelGenerator for Box<G> {
    fn choose_height(&mut self, cap: usize) -> usize {
        (**self).choose_height(cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heights_never_exceed_cap() {
        let mut level = GeometricLevel::seeded(0.9, 7).unwrap();
        for cap in 0..8 {
            for _ in 0..200 {
                assert!(level.choose_height(cap) <= cap);
            }
        }
    }

    #[test]
    fn zero_cap_always_yields_ground_lane() {
        let mut level = GeometricLevel::seeded(0.99, 1).unwrap();
        for _ in 0..100 {
            assert_eq!(level.choose_height(0), 0);
        }
    }

    #[test]
    fn same_seed_same_heights() {
        let mut a = GeometricLevel::seeded(0.5, 42).unwrap();
        let mut b = GeometricLevel::seeded(0.5, 42).unwrap();
        let left: Vec<usize> = (0..64).map(|_| a.choose_height(16)).collect();
        let right: Vec<usize> = (0..64).map(|_| b.choose_height(16)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn distribution_is_roughly_geometric() {
        let mut level = GeometricLevel::seeded(0.5, 1234).unwrap();
        let samples = 20_000;
        let ground = (0..samples)
            .filter(|_| level.choose_height(16) == 0)
            .count();
        // about half the nodes should stay in lane 0
        assert!(ground > samples * 4 / 10 && ground < samples * 6 / 10, "{ground}");
    }

    #[test]
    fn rejects_bad_probability() {
        assert!(GeometricLevel::new(0.0).is_err());
        assert!(GeometricLevel::seeded(1.0, 0).is_err());
    }
}
