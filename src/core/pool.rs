// File: src/core/pool.rs
use crate::core::types::Count;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Token statistics for one category.
///
/// `total` caches the sum of all token counts. It is never serialized and is
/// kept in step by every mutating method; [`Pool::rebuild_total`] restores it
/// after deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    tokens: HashMap<String, Count>,
    /// Number of items trained into this pool, used as the prior.
    trained: Count,
    #[serde(skip)]
    total: Count,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, token: &str) -> Count {
        self.tokens.get(token).copied().unwrap_or(0)
    }

    pub fn total(&self) -> Count {
        self.total
    }

    pub fn trained(&self) -> Count {
        self.trained
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = (&str, Count)> {
        self.tokens.iter().map(|(token, &count)| (token.as_str(), count))
    }

    pub(crate) fn increment(&mut self, token: &str, by: Count) {
        *self.tokens.entry(token.to_string()).or_insert(0) += by;
        self.total += by;
    }

    /// Lowers a token count, flooring at zero. Returns how much was actually
    /// removed. Tokens that reach zero are dropped from the map.
    pub(crate) fn decrement(&mut self, token: &str, by: Count) -> Count {
        let Some(count) = self.tokens.get_mut(token) else {
            return 0;
        };
        let removed = by.min(*count);
        *count -= removed;
        if *count == 0 {
            self.tokens.remove(token);
        }
        self.total -= removed;
        removed
    }

    pub(crate) fn add_trained(&mut self, by: Count) {
        self.trained += by;
    }

    pub(crate) fn remove_trained(&mut self, by: Count) {
        self.trained = self.trained.saturating_sub(by);
    }

    pub(crate) fn rebuild_total(&mut self) {
        self.total = self.tokens.values().sum();
    }

    /// True when the cached total matches the token counts.
    pub fn total_is_consistent(&self) -> bool {
        self.total == self.tokens.values().sum::<Count>()
    }
}
