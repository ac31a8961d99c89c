// src/core/types.rs
use serde::Serialize;

/// A category label, already normalised by the classifier's label policy.
pub type Label = String;

/// A single token count inside a pool.
pub type Count = u64;

/// The ordered, de-duplicated tokens of one piece of text.
/// Only the tokenizer builds these, so every sequence that reaches the
/// corpus has already gone through the same policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSequence(Vec<String>);

impl TokenSequence {
    pub(crate) fn from_distinct(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// One ranked entry of a guess result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Guess {
    pub label: Label,
    /// Posterior probability. Across one result these sum to 1.0.
    pub probability: f64,
}
