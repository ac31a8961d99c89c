// File: src/error.rs

/// Errors raised by the classifier and its persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("category already exists: {0}")]
    DuplicateCategory(String),

    #[error("incompatible corpus format: {0}")]
    IncompatibleFormat(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to serialize corpus: {0}")]
    Serialization(String),

    #[error("classifier has no corpus path; use save_as")]
    NoCorpusPath,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;

impl ClassifierError {
    /// Stable numeric code used across the C boundary.
    pub fn code(&self) -> i32 {
        match self {
            ClassifierError::InvalidInput(_) => -1,
            ClassifierError::UnknownCategory(_) => -2,
            ClassifierError::DuplicateCategory(_) => -3,
            ClassifierError::IncompatibleFormat(_) => -4,
            ClassifierError::Config(_) => -5,
            ClassifierError::Serialization(_) => -6,
            ClassifierError::Io(_) => -7,
            ClassifierError::NoCorpusPath => -8,
        }
    }
}
