// File: src/learning.rs
use crate::core::corpus::Corpus;
use crate::core::types::TokenSequence;
use crate::error::{ClassifierError, Result};

/// Applies training examples to a corpus.
///
/// Both operations validate before they touch the corpus, so an error never
/// leaves a half-applied example behind.
#[derive(Debug)]
pub struct LearningEngine {
    frequency_increment: u64,
}

impl Default for LearningEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LearningEngine {
    pub fn new() -> Self {
        Self { frequency_increment: 1 }
    }

    /// Counts every distinct token once and bumps the trained-item counter.
    pub fn learn(&self, corpus: &mut Corpus, label: &str, tokens: &TokenSequence) -> Result<()> {
        Self::validate(label, tokens)?;

        for token in tokens.iter() {
            corpus.increment(label, token, self.frequency_increment);
        }
        corpus.ensure_pool(label).add_trained(1);
        Ok(())
    }

    /// Reverses [`LearningEngine::learn`]. Unknown labels and tokens are
    /// ignored; counts never drop below zero.
    pub fn unlearn(&self, corpus: &mut Corpus, label: &str, tokens: &TokenSequence) -> Result<()> {
        Self::validate(label, tokens)?;

        if !corpus.contains(label) {
            log::debug!("untrain on unknown category '{label}' ignored");
            return Ok(());
        }
        for token in tokens.iter() {
            corpus.decrement(label, token, self.frequency_increment);
        }
        if let Some(pool) = corpus.pool_mut(label) {
            pool.remove_trained(1);
        }
        Ok(())
    }

    fn validate(label: &str, tokens: &TokenSequence) -> Result<()> {
        if label.is_empty() {
            return Err(ClassifierError::InvalidInput("category label is empty".to_string()));
        }
        if tokens.is_empty() {
            return Err(ClassifierError::InvalidInput(format!(
                "text for category '{label}' contains no tokens"
            )));
        }
        Ok(())
    }
}
