//! End-to-end behaviour of the public classifier API.

use reverend::{Classifier, ClassifierConfig, ClassifierError, PersistFormat};
use tempfile::tempdir;

fn classifier() -> Classifier {
    Classifier::new(ClassifierConfig::default()).expect("default config is valid")
}

fn assert_sums_to_one(c: &Classifier, text: &str) {
    let guesses = c.guess(text);
    assert!(!guesses.is_empty());
    let sum: f64 = guesses.iter().map(|g| g.probability).sum();
    assert!((sum - 1.0).abs() < 1e-9, "sum was {sum} for {text:?}");
}

#[test]
fn probabilities_sum_to_one_for_any_query() {
    let mut c = classifier();
    c.train("spam", "buy cheap pills now").unwrap();
    c.train("ham", "meeting notes attached").unwrap();
    c.train("news", "election results announced today").unwrap();

    for text in ["cheap pills", "meeting today", "completely unrelated words", "now now now"] {
        assert_sums_to_one(&c, text);
    }
}

#[test]
fn spam_scenario_ranks_spam_first() {
    let mut c = classifier();
    c.train("spam", "buy cheap pills now").unwrap();
    c.train("ham", "meeting notes attached").unwrap();

    let guesses = c.guess("cheap pills");
    assert_eq!(guesses[0].label, "spam");
    assert_eq!(guesses[1].label, "ham");
    assert!(guesses[0].probability > guesses[1].probability);
}

#[test]
fn untrained_classifier_returns_nothing() {
    let c = classifier();
    assert!(c.pools().is_empty());
    for text in ["", "cheap pills", "!!!"] {
        assert!(c.guess(text).is_empty());
    }
}

#[test]
fn empty_queries_return_nothing() {
    let mut c = classifier();
    c.train("spam", "buy cheap pills now").unwrap();
    assert!(c.guess("").is_empty());
    assert!(c.guess("   --- ?? ").is_empty());
}

#[test]
fn train_then_untrain_restores_counts() {
    let mut c = classifier();
    c.train("spam", "buy cheap pills now").unwrap();
    c.train("ham", "meeting notes attached").unwrap();
    let before = c.corpus().clone();

    c.train("spam", "limited offer cheap").unwrap();
    c.untrain("spam", "limited offer cheap").unwrap();

    assert_eq!(c.corpus(), &before);
    assert_eq!(c.train_count("spam").unwrap(), 1);
}

#[test]
fn double_training_doubles_counts() {
    let mut once = classifier();
    once.train("spam", "buy cheap pills now").unwrap();
    let mut twice = classifier();
    twice.train("spam", "buy cheap pills now").unwrap();
    twice.train("spam", "buy cheap pills now").unwrap();

    let single = once.pool_data("spam").unwrap();
    let double = twice.pool_data("spam").unwrap();
    assert_eq!(single.len(), double.len());
    for ((t1, n1), (t2, n2)) in single.iter().zip(&double) {
        assert_eq!(t1, t2);
        assert_eq!(n1 * 2, *n2);
    }
    assert_eq!(twice.train_count("spam").unwrap(), 2);
    assert_sums_to_one(&twice, "cheap");
}

#[test]
fn remove_pool_semantics() {
    let mut c = classifier();
    c.train("spam", "buy cheap pills now").unwrap();
    c.train("ham", "meeting notes attached").unwrap();
    let old = c.guess("cheap");

    c.remove_pool("spam").unwrap();
    assert_eq!(old.len(), 2);
    let new = c.guess("cheap");
    assert_eq!(new.len(), 1);
    assert_eq!(new[0].label, "ham");
    assert!((new[0].probability - 1.0).abs() < 1e-12);

    assert!(matches!(
        c.remove_pool("spam"),
        Err(ClassifierError::UnknownCategory(label)) if label == "spam"
    ));
}

#[test]
fn open_save_reopen_round_trips() {
    let dir = tempdir().unwrap();
    for name in ["corpus.bin", "corpus.json"] {
        let path = dir.path().join("nested").join(name);

        let mut c = Classifier::open(&path, ClassifierConfig::default()).unwrap();
        assert!(c.pools().is_empty());
        c.train("spam", "buy cheap pills now").unwrap();
        c.train("ham", "meeting notes attached").unwrap();
        c.train("ham", "notes from the meeting").unwrap();
        c.save().unwrap();

        let reopened = Classifier::open(&path, ClassifierConfig::default()).unwrap();
        assert_eq!(reopened.corpus(), c.corpus());
        assert_eq!(reopened.train_count("ham").unwrap(), 2);
        assert_eq!(reopened.guess("cheap pills"), c.guess("cheap pills"));
    }
}

#[test]
fn save_as_other_format_loads_identically() {
    let dir = tempdir().unwrap();
    let mut c = classifier();
    c.train("spam", "buy cheap pills now").unwrap();
    c.train("ham", "meeting notes attached").unwrap();

    let json = dir.path().join("export.dat");
    c.save_as(&json, PersistFormat::Json).unwrap();
    let loaded = Classifier::open(&json, ClassifierConfig::default()).unwrap();
    assert_eq!(loaded.corpus(), c.corpus());
}

#[test]
fn corrupt_corpus_fails_to_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corpus.bin");
    std::fs::write(&path, b"definitely not a corpus").unwrap();

    let err = Classifier::open(&path, ClassifierConfig::default()).unwrap_err();
    assert!(matches!(err, ClassifierError::IncompatibleFormat(_)));
}
