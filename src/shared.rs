// File: src/shared.rs
use crate::core::engine::Classifier;
use crate::core::types::{Guess, Label};
use crate::error::Result;
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A cloneable handle for hosts that classify from several threads.
///
/// Training takes the write lock; guesses and saves share the read lock.
/// A poisoned lock is still used: every mutation validates before it writes,
/// so a panicking holder cannot leave the corpus half-updated.
#[derive(Debug, Clone)]
pub struct SharedClassifier {
    inner: Arc<RwLock<Classifier>>,
}

impl SharedClassifier {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            inner: Arc::new(RwLock::new(classifier)),
        }
    }

    pub fn train(&self, category: &str, text: &str) -> Result<()> {
        self.write().train(category, text)
    }

    pub fn untrain(&self, category: &str, text: &str) -> Result<()> {
        self.write().untrain(category, text)
    }

    pub fn remove_pool(&self, category: &str) -> Result<()> {
        self.write().remove_pool(category)
    }

    pub fn guess(&self, text: &str) -> Vec<Guess> {
        self.read().guess(text)
    }

    pub fn pools(&self) -> BTreeSet<Label> {
        self.read().pools()
    }

    pub fn save(&self) -> Result<()> {
        self.read().save()
    }

    /// Runs `f` with shared access, for operations not mirrored above.
    pub fn with_read<T>(&self, f: impl FnOnce(&Classifier) -> T) -> T {
        f(&self.read())
    }

    pub fn with_write<T>(&self, f: impl FnOnce(&mut Classifier) -> T) -> T {
        f(&mut self.write())
    }

    fn read(&self) -> RwLockReadGuard<'_, Classifier> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Classifier> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
