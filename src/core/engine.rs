use crate::config::ClassifierConfig;
use crate::core::corpus::Corpus;
use crate::core::tokenizer::Tokenizer;
use crate::core::types::{Count, Guess, Label, TokenSequence};
use crate::error::{ClassifierError, Result};
use crate::learning::LearningEngine;
use crate::persistence::{load_from_disk, save_to_disk, PersistFormat};
use crate::scoring;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

// The classifier is composed of the corpus, its tokenizer and the learning rules.
// Persistence is handled separately in `persistence.rs`.
#[derive(Debug)]
pub struct Classifier {
    pub(crate) corpus: Corpus,
    pub(crate) tokenizer: Tokenizer,
    pub(crate) config: ClassifierConfig,
    learning_engine: LearningEngine,
    corpus_path: Option<PathBuf>,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        let tokenizer = Tokenizer::new(config.tokenizer.clone())?;
        Ok(Self::from_parts(Corpus::new(), tokenizer, config))
    }

    pub(crate) fn from_parts(corpus: Corpus, tokenizer: Tokenizer, config: ClassifierConfig) -> Self {
        Self {
            corpus,
            tokenizer,
            config,
            learning_engine: LearningEngine::new(),
            corpus_path: None,
        }
    }

    /// Loads the corpus at `path`, or starts an empty one if the file does not
    /// exist yet. Either way, [`Classifier::save`] later writes back to `path`.
    pub fn open(path: &Path, config: ClassifierConfig) -> Result<Self> {
        let mut classifier = if path.exists() {
            load_from_disk(path, config)?
        } else {
            log::info!("no corpus at {}, starting empty", path.display());
            Self::new(config)?
        };
        classifier.corpus_path = Some(path.to_path_buf());
        Ok(classifier)
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn corpus_path(&self) -> Option<&Path> {
        self.corpus_path.as_deref()
    }

    /// Tokenizes with the same policy used by training and guessing.
    pub fn tokenize(&self, text: &str) -> TokenSequence {
        self.tokenizer.tokenize(text)
    }

    pub fn train(&mut self, category: &str, text: &str) -> Result<()> {
        let label = self.label(category)?;
        let tokens = self.tokenizer.tokenize(text);
        self.learning_engine.learn(&mut self.corpus, &label, &tokens)?;
        log::debug!("trained '{label}' with {} tokens", tokens.len());
        Ok(())
    }

    pub fn untrain(&mut self, category: &str, text: &str) -> Result<()> {
        let label = self.label(category)?;
        let tokens = self.tokenizer.tokenize(text);
        self.learning_engine.unlearn(&mut self.corpus, &label, &tokens)?;
        log::debug!("untrained '{label}' with {} tokens", tokens.len());
        Ok(())
    }

    /// Ranks every known category for `text`. Empty when nothing has been
    /// trained or the text has no tokens.
    pub fn guess(&self, text: &str) -> Vec<Guess> {
        let tokens = self.tokenizer.tokenize(text);
        let guesses = scoring::posterior(&self.corpus, &tokens, self.config.smoothing);
        log::debug!(
            "guess over {} tokens and {} pools, best {:?}",
            tokens.len(),
            self.corpus.len(),
            guesses.first().map(|g| g.label.as_str())
        );
        guesses
    }

    pub fn guess_best(&self, text: &str) -> Option<Guess> {
        self.guess(text).into_iter().next()
    }

    pub fn pools(&self) -> BTreeSet<Label> {
        self.corpus.pools().keys().cloned().collect()
    }

    /// Creates an empty pool. Existing pools are left as they are.
    pub fn new_pool(&mut self, category: &str) -> Result<()> {
        let label = self.label(category)?;
        self.corpus.ensure_pool(&label);
        Ok(())
    }

    /// Deletes a pool and all of its counts. Fails with
    /// [`ClassifierError::UnknownCategory`] if it was never created.
    pub fn remove_pool(&mut self, category: &str) -> Result<()> {
        let label = self.label(category)?;
        if self.corpus.remove_pool(&label).is_none() {
            return Err(ClassifierError::UnknownCategory(label));
        }
        log::debug!("removed pool '{label}'");
        Ok(())
    }

    pub fn rename_pool(&mut self, from: &str, to: &str) -> Result<()> {
        let from = self.label(from)?;
        let to = self.label(to)?;
        if !self.corpus.contains(&from) {
            return Err(ClassifierError::UnknownCategory(from));
        }
        if from != to && self.corpus.contains(&to) {
            return Err(ClassifierError::DuplicateCategory(to));
        }
        self.corpus.rename_pool(&from, &to);
        Ok(())
    }

    /// Adds the counts of `source` into `dest`, creating `dest` if needed.
    pub fn merge_pools(&mut self, dest: &str, source: &str) -> Result<()> {
        let dest = self.label(dest)?;
        let source = self.label(source)?;
        if dest == source {
            return Err(ClassifierError::InvalidInput(format!(
                "cannot merge pool '{source}' into itself"
            )));
        }
        if !self.corpus.merge_into(&dest, &source) {
            return Err(ClassifierError::UnknownCategory(source));
        }
        Ok(())
    }

    /// Token counts of one pool, most frequent first.
    pub fn pool_data(&self, category: &str) -> Result<Vec<(String, Count)>> {
        let label = self.label(category)?;
        let pool = self
            .corpus
            .pool(&label)
            .ok_or(ClassifierError::UnknownCategory(label))?;
        let mut data: Vec<(String, Count)> = pool
            .tokens()
            .map(|(token, count)| (token.to_string(), count))
            .collect();
        data.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(data)
    }

    pub fn pool_tokens(&self, category: &str) -> Result<BTreeSet<String>> {
        Ok(self.pool_data(category)?.into_iter().map(|(token, _)| token).collect())
    }

    pub fn train_count(&self, category: &str) -> Result<Count> {
        let label = self.label(category)?;
        self.corpus
            .pool(&label)
            .map(|pool| pool.trained())
            .ok_or(ClassifierError::UnknownCategory(label))
    }

    /// Saves to the path given to [`Classifier::open`]. A classifier built
    /// with [`Classifier::new`] has no path and fails with
    /// [`ClassifierError::NoCorpusPath`]; use [`Classifier::save_as`] instead.
    pub fn save(&self) -> Result<()> {
        match &self.corpus_path {
            Some(path) => save_to_disk(self, path, PersistFormat::from_path(path)),
            None => Err(ClassifierError::NoCorpusPath),
        }
    }

    pub fn save_as(&self, path: &Path, format: PersistFormat) -> Result<()> {
        save_to_disk(self, path, format)
    }

    fn label(&self, raw: &str) -> Result<Label> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ClassifierError::InvalidInput("category label is empty".to_string()));
        }
        Ok(if self.config.case_sensitive_labels {
            trimmed.to_string()
        } else {
            trimmed.to_lowercase()
        })
    }
}
