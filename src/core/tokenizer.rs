// File: src/core/tokenizer.rs
use crate::core::types::TokenSequence;
use crate::error::{ClassifierError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const WORD_PATTERN: &str = r"\w+";
const WHITESPACE_PATTERN: &str = r"\S+";

/// How raw text is cut into candidate tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerMode {
    /// Runs of Unicode word characters (letters, digits, underscore).
    #[default]
    Words,
    /// Whitespace separated chunks with surrounding punctuation stripped.
    Whitespace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    pub mode: TokenizerMode,
    pub lowercase: bool,
    /// Minimum token length in chars.
    pub min_length: usize,
    /// Maximum token length in chars, `None` for unbounded.
    pub max_length: Option<usize>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            mode: TokenizerMode::Words,
            lowercase: true,
            min_length: 1,
            max_length: Some(64),
        }
    }
}

impl TokenizerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_length == 0 {
            return Err(ClassifierError::Config(
                "tokenizer.min_length must be at least 1".to_string(),
            ));
        }
        if let Some(max) = self.max_length {
            if max < self.min_length {
                return Err(ClassifierError::Config(format!(
                    "tokenizer.max_length ({max}) is below min_length ({})",
                    self.min_length
                )));
            }
        }
        Ok(())
    }
}

/// Turns text into a [`TokenSequence`]. The classifier owns exactly one of
/// these and uses it for training and guessing alike.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    config: TokenizerConfig,
    pattern: Regex,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Result<Self> {
        config.validate()?;
        let source = match config.mode {
            TokenizerMode::Words => WORD_PATTERN,
            TokenizerMode::Whitespace => WHITESPACE_PATTERN,
        };
        let pattern = Regex::new(source).map_err(|e| ClassifierError::Config(e.to_string()))?;
        Ok(Self { config, pattern })
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Tokenizes `text`, keeping the first occurrence of each token.
    /// O(n) in the length of the text.
    pub fn tokenize(&self, text: &str) -> TokenSequence {
        let mut seen = HashSet::new();
        let mut tokens = Vec::new();

        for m in self.pattern.find_iter(text) {
            let raw = match self.config.mode {
                TokenizerMode::Words => m.as_str(),
                TokenizerMode::Whitespace => m.as_str().trim_matches(|c: char| !c.is_alphanumeric()),
            };
            let token = if self.config.lowercase {
                raw.to_lowercase()
            } else {
                raw.to_string()
            };
            if !self.accepts(&token) {
                continue;
            }
            if seen.insert(token.clone()) {
                tokens.push(token);
            }
        }

        TokenSequence::from_distinct(tokens)
    }

    /// Length bounds apply to the folded token, which can be longer than the raw one.
    fn accepts(&self, token: &str) -> bool {
        let len = token.chars().count();
        len >= self.config.min_length && self.config.max_length.map_or(true, |max| len <= max)
    }
}
