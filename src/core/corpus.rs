// File: src/core/corpus.rs
use crate::core::pool::Pool;
use crate::core::types::Count;
use std::collections::{BTreeMap, HashMap};

/// All pools of a classifier plus a corpus-wide view of every token.
///
/// `vocabulary` maps each token to its summed count over all pools. Like the
/// per-pool totals it is derived data: every mutation goes through this type
/// so both stay in step, and [`Corpus::from_pools`] rebuilds them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    pools: BTreeMap<String, Pool>,
    vocabulary: HashMap<String, Count>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pools(mut pools: BTreeMap<String, Pool>) -> Self {
        let mut vocabulary: HashMap<String, Count> = HashMap::new();
        for pool in pools.values_mut() {
            pool.rebuild_total();
            for (token, count) in pool.tokens() {
                *vocabulary.entry(token.to_string()).or_insert(0) += count;
            }
        }
        Self { pools, vocabulary }
    }

    pub fn pools(&self) -> &BTreeMap<String, Pool> {
        &self.pools
    }

    pub fn pool(&self, label: &str) -> Option<&Pool> {
        self.pools.get(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.pools.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Number of distinct tokens seen in any pool.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn knows_token(&self, token: &str) -> bool {
        self.vocabulary.contains_key(token)
    }

    /// Sum of trained-item counters over all pools.
    pub fn trained_total(&self) -> Count {
        self.pools.values().map(Pool::trained).sum()
    }

    /// Returns the pool for `label`, creating it if needed.
    pub(crate) fn ensure_pool(&mut self, label: &str) -> &mut Pool {
        self.pools.entry(label.to_string()).or_default()
    }

    pub(crate) fn increment(&mut self, label: &str, token: &str, by: Count) {
        self.ensure_pool(label).increment(token, by);
        *self.vocabulary.entry(token.to_string()).or_insert(0) += by;
    }

    pub(crate) fn decrement(&mut self, label: &str, token: &str, by: Count) {
        let Some(pool) = self.pools.get_mut(label) else {
            return;
        };
        let removed = pool.decrement(token, by);
        if removed > 0 {
            self.forget(token, removed);
        }
    }

    pub(crate) fn pool_mut(&mut self, label: &str) -> Option<&mut Pool> {
        self.pools.get_mut(label)
    }

    pub(crate) fn remove_pool(&mut self, label: &str) -> Option<Pool> {
        let pool = self.pools.remove(label)?;
        for (token, count) in pool.tokens() {
            self.forget(token, count);
        }
        Some(pool)
    }

    pub(crate) fn rename_pool(&mut self, from: &str, to: &str) -> bool {
        match self.pools.remove(from) {
            Some(pool) => {
                self.pools.insert(to.to_string(), pool);
                true
            }
            None => false,
        }
    }

    /// Adds `source`'s counts into `dest`. `source` is left untouched.
    pub(crate) fn merge_into(&mut self, dest: &str, source: &str) -> bool {
        let Some(source_pool) = self.pools.get(source).cloned() else {
            return false;
        };
        for (token, count) in source_pool.tokens() {
            self.increment(dest, token, count);
        }
        self.ensure_pool(dest).add_trained(source_pool.trained());
        true
    }

    fn forget(&mut self, token: &str, by: Count) {
        if let Some(count) = self.vocabulary.get_mut(token) {
            *count = count.saturating_sub(by);
            if *count == 0 {
                self.vocabulary.remove(token);
            }
        }
    }

    /// Checks every cached value against the raw counts.
    pub fn is_consistent(&self) -> bool {
        self.pools.values().all(Pool::total_is_consistent)
            && *self == Corpus::from_pools(self.pools.clone())
    }
}
