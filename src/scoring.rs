// File: src/scoring.rs
use crate::core::corpus::Corpus;
use crate::core::types::{Guess, TokenSequence};

/// Computes the posterior distribution over every pool in `corpus`.
///
/// Each pool scores `ln P(c) + Σ ln P(t|c)` with additive smoothing `alpha`
/// applied to both the prior and the token probabilities. Tokens no pool has
/// ever seen are skipped. The log scores are normalised with log-sum-exp, so
/// long inputs cannot underflow to zero.
///
/// Ranked by probability descending, then label ascending.
pub fn posterior(corpus: &Corpus, tokens: &TokenSequence, alpha: f64) -> Vec<Guess> {
    if corpus.is_empty() || tokens.is_empty() {
        return Vec::new();
    }

    let vocabulary = corpus.vocabulary_size() as f64;
    let pool_count = corpus.len() as f64;
    let trained_total = corpus.trained_total() as f64;
    let evidence: Vec<&str> = tokens.iter().filter(|t| corpus.knows_token(t)).collect();

    let scores: Vec<(&str, f64)> = corpus
        .pools()
        .iter()
        .map(|(label, pool)| {
            let prior = ((pool.trained() as f64 + alpha) / (trained_total + alpha * pool_count)).ln();
            let denominator = pool.total() as f64 + alpha * vocabulary;
            let likelihood: f64 = evidence
                .iter()
                .map(|token| ((pool.count(token) as f64 + alpha) / denominator).ln())
                .sum();
            (label.as_str(), prior + likelihood)
        })
        .collect();

    let max = scores
        .iter()
        .map(|&(_, score)| score)
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        log::warn!("posterior is not finite (smoothing {alpha}); returning no guesses");
        return Vec::new();
    }
    let normaliser: f64 = scores.iter().map(|&(_, score)| (score - max).exp()).sum();

    let mut guesses: Vec<Guess> = scores
        .into_iter()
        .map(|(label, score)| Guess {
            label: label.to_string(),
            probability: (score - max).exp() / normaliser,
        })
        .collect();

    guesses.sort_by(|a, b| {
        b.probability
            .total_cmp(&a.probability)
            .then_with(|| a.label.cmp(&b.label))
    });
    guesses
}
