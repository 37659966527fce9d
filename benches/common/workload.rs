//! Workload generators for hit-rate benchmarks.
//!
//! Key streams are deterministic for a given seed so runs are comparable.

use lrukit::lru::LruCore;
use lrukit::strategy::{CostFn, EvictionListener};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Zipf};

#[derive(Debug, Clone, Copy)]
pub enum Workload {
    /// Uniform random keys in `[0, universe)`.
    Uniform,
    /// Hot/cold split: `hot_prob` of accesses land in the first `hot_fraction` of keys.
    HotSet { hot_fraction: f64, hot_prob: f64 },
    /// Sequential scan in `[0, universe)`, wrapping.
    Scan,
    /// Zipfian skew; larger `exponent` concentrates on low keys.
    Zipfian { exponent: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct WorkloadSpec {
    pub universe: u64,
    pub workload: Workload,
    pub seed: u64,
}

impl WorkloadSpec {
    pub fn generator(self) -> WorkloadGenerator {
        WorkloadGenerator::new(self.universe, self.workload, self.seed)
    }
}

#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    universe: u64,
    workload: Workload,
    rng: SmallRng,
    scan_pos: u64,
    zipf: Option<Zipf<f64>>,
}

impl WorkloadGenerator {
    pub fn new(universe: u64, workload: Workload, seed: u64) -> Self {
        let universe = universe.max(1);
        let zipf = match workload {
            Workload::Zipfian { exponent } => Zipf::new(universe as f64, exponent).ok(),
            _ => None,
        };
        Self {
            universe,
            workload,
            rng: SmallRng::seed_from_u64(seed),
            scan_pos: 0,
            zipf,
        }
    }

    pub fn next_key(&mut self) -> u64 {
        match self.workload {
            Workload::Uniform => self.rng.random_range(0..self.universe),
            Workload::HotSet {
                hot_fraction,
                hot_prob,
            } => {
                let hot_size =
                    ((self.universe as f64) * hot_fraction.clamp(0.0, 1.0)).round() as u64;
                let hot_size = hot_size.clamp(1, self.universe);
                if self.rng.random::<f64>() < hot_prob || hot_size == self.universe {
                    self.rng.random_range(0..hot_size)
                } else {
                    self.rng.random_range(hot_size..self.universe)
                }
            },
            Workload::Scan => {
                let key = self.scan_pos;
                self.scan_pos = (self.scan_pos + 1) % self.universe;
                key
            },
            Workload::Zipfian { .. } => match &self.zipf {
                // Zipf samples are 1-based ranks.
                Some(zipf) => (zipf.sample(&mut self.rng) as u64).saturating_sub(1),
                None => self.rng.random_range(0..self.universe),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HitRate {
    pub hits: u64,
    pub misses: u64,
}

impl HitRate {
    pub fn hit_rate(self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Drives a cache with lookup-then-insert-on-miss traffic.
pub fn run_hit_rate<V, C, L, F>(
    cache: &mut LruCore<u64, V, C, L>,
    generator: &mut WorkloadGenerator,
    operations: usize,
    value_for_key: F,
) -> HitRate
where
    C: CostFn<u64, V>,
    L: EvictionListener<u64, V>,
    F: Fn(u64) -> V,
{
    let mut hits = 0u64;
    let mut misses = 0u64;

    for _ in 0..operations {
        let key = generator.next_key();
        if cache.get(&key).is_some() {
            hits += 1;
        } else {
            misses += 1;
            cache.put(key, value_for_key(key));
        }
    }

    HitRate { hits, misses }
}
