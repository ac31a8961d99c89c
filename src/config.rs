// File: src/config.rs
use crate::core::tokenizer::TokenizerConfig;
use crate::error::{ClassifierError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SMOOTHING: f64 = 1.0;
/// Upper bound for `smoothing`; keeps `alpha * |V|` finite for any realistic vocabulary.
pub const MAX_SMOOTHING: f64 = 1.0e6;

/// Runtime settings for a [`crate::Classifier`]. Every field has a default,
/// so an empty YAML document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Additive smoothing constant for token probabilities and priors.
    pub smoothing: f64,
    /// When false, labels are lower-cased before they reach the corpus.
    pub case_sensitive_labels: bool,
    pub tokenizer: TokenizerConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
            case_sensitive_labels: true,
            tokenizer: TokenizerConfig::default(),
        }
    }
}

impl ClassifierConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ClassifierConfig = if content.trim().is_empty() {
            ClassifierConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ClassifierError::Config(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.smoothing.is_finite() || self.smoothing <= 0.0 || self.smoothing > MAX_SMOOTHING {
            return Err(ClassifierError::Config(format!(
                "smoothing must be in (0, {MAX_SMOOTHING}], got {}",
                self.smoothing
            )));
        }
        self.tokenizer.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tokenizer::TokenizerMode;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(ClassifierConfig::from_yaml("").unwrap(), ClassifierConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = ClassifierConfig::from_yaml(
            "smoothing: 0.5\ntokenizer:\n  mode: whitespace\n  max_length: null\n",
        )
        .unwrap();
        assert_eq!(config.smoothing, 0.5);
        assert!(config.case_sensitive_labels);
        assert_eq!(config.tokenizer.mode, TokenizerMode::Whitespace);
        assert_eq!(config.tokenizer.max_length, None);
        assert!(config.tokenizer.lowercase);
    }

    #[test]
    fn non_positive_smoothing_is_rejected() {
        for yaml in ["smoothing: 0", "smoothing: -1.5", "smoothing: 1.0e308", "smoothing: .inf"] {
            assert!(matches!(
                ClassifierConfig::from_yaml(yaml),
                Err(ClassifierError::Config(_))
            ));
        }
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        assert!(matches!(
            ClassifierConfig::from_yaml("smoothing: [1, 2"),
            Err(ClassifierError::Config(_))
        ));
    }
}
