// src/lib.rs
//! A small trainable naive-Bayes text classifier.
//!
//! Text is split into distinct tokens (Unicode word runs, lower-cased, 1 to 64
//! chars by default), counted per category, and scored in log space with
//! additive smoothing. Corpora persist to a versioned binary or JSON file.

pub mod config;
pub mod core;
pub mod error;
pub mod learning;
pub mod persistence;
pub mod scoring;
pub mod shared;
pub mod c_api;

pub use crate::config::ClassifierConfig;
pub use crate::core::engine::Classifier;
pub use crate::core::types::Guess;
pub use crate::error::{ClassifierError, Result};
pub use crate::persistence::PersistFormat;
pub use crate::shared::SharedClassifier;
