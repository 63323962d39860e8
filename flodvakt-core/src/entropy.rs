//! ## flodvakt-core::entropy
//! **Shannon entropy over weighted distributions**
//!
//! Low entropy means weight concentrates on a few keys (a handful of sources
//! generating most packets), high entropy means it is spread evenly.

use std::collections::HashMap;
use std::hash::Hash;

/// Shannon entropy in bits of a set of counts against `total`.
///
/// Returns `0.0` when `total == 0`. Zero counts are skipped. Summation order
/// follows the iterator, so results for the same distribution iterated in a
/// different order may differ in the last bits.
pub fn shannon_entropy<I>(counts: I, total: u64) -> f64
where
    I: IntoIterator<Item = u64>,
{
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let sum: f64 = counts
        .into_iter()
        .filter(|&count| count > 0)
        .map(|count| {
            let p = count as f64 / total;
            p * p.log2()
        })
        .sum();
    // -0.0 for single-key distributions
    (-sum).max(0.0)
}

/// Key to weight mapping accumulated over a window.
///
/// Keys added with zero weight are still tracked, so `distinct()` counts every
/// key that was observed.
#[derive(Debug, Clone)]
pub struct Distribution<K> {
    counts: HashMap<K, u64>,
}

impl<K: Eq + Hash> Distribution<K> {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    #[inline]
    pub fn add(&mut self, key: K, weight: u64) {
        let count = self.counts.entry(key).or_insert(0);
        *count = count.saturating_add(weight);
    }

    pub fn get(&self, key: &K) -> Option<u64> {
        self.counts.get(key).copied()
    }

    /// Number of distinct keys observed, regardless of weight.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn entropy(&self, total: u64) -> f64 {
        shannon_entropy(self.counts.values().copied(), total)
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

impl<K: Eq + Hash> Default for Distribution<K> {
    fn default() -> Self {
        Self::new()
    }
}
