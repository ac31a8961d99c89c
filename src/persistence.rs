// File: src/persistence.rs
//
// Binary layout: `RVND` magic, u16 little-endian format version, bincode body.
// JSON layout: one object carrying `format_version` next to the same fields.
use crate::config::ClassifierConfig;
use crate::core::corpus::Corpus;
use crate::core::engine::Classifier;
use crate::core::pool::Pool;
use crate::core::tokenizer::{Tokenizer, TokenizerConfig};
use crate::error::{ClassifierError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const MAGIC: &[u8; 4] = b"RVND";
pub const FORMAT_VERSION: u16 = 1;
const HEADER_LEN: usize = MAGIC.len() + 2;

/// The codecs a corpus can be written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistFormat {
    Binary,
    Json,
}

impl PersistFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "bin" | "binary" | "bincode" => Some(PersistFormat::Binary),
            "json" => Some(PersistFormat::Json),
            _ => None,
        }
    }

    /// `.json` files use JSON, anything else the binary codec.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_name)
            .unwrap_or(PersistFormat::Binary)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PersistFormat::Binary => "binary",
            PersistFormat::Json => "json",
        }
    }
}

/// The serializable state of a classifier. The tokenizer travels with the
/// counts so a reloaded corpus is always queried the way it was trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SerializableState {
    tokenizer: TokenizerConfig,
    case_sensitive_labels: bool,
    pools: BTreeMap<String, Pool>,
}

#[derive(Serialize, Deserialize)]
struct JsonDocument {
    format_version: u16,
    #[serde(flatten)]
    state: SerializableState,
}

pub fn save_to_disk(classifier: &Classifier, path: &Path, format: PersistFormat) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let state = SerializableState {
        tokenizer: classifier.tokenizer.config().clone(),
        case_sensitive_labels: classifier.config.case_sensitive_labels,
        pools: classifier.corpus.pools().clone(),
    };

    // The temp file is deleted on drop, so an early return leaves nothing behind.
    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        encode(&state, format, &mut writer)?;
        writer.flush()?;
    }
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;

    log::info!(
        "saved {} pools to {} ({})",
        state.pools.len(),
        path.display(),
        format.name()
    );
    Ok(())
}

/// Loads a corpus written by [`save_to_disk`] in either format.
///
/// The stored tokenizer and label policy win over the ones in `config`;
/// only the smoothing constant is taken from `config`.
pub fn load_from_disk(path: &Path, config: ClassifierConfig) -> Result<Classifier> {
    let file = File::open(path)?;
    let mut bytes = Vec::new();
    BufReader::new(file).read_to_end(&mut bytes)?;
    let state = decode(&bytes)?;

    if state.tokenizer != config.tokenizer {
        log::warn!(
            "{} was trained with a different tokenizer; keeping the stored one",
            path.display()
        );
    }
    if state.case_sensitive_labels != config.case_sensitive_labels {
        log::warn!(
            "{} uses case_sensitive_labels = {}; keeping the stored policy",
            path.display(),
            state.case_sensitive_labels
        );
    }

    let config = ClassifierConfig {
        tokenizer: state.tokenizer,
        case_sensitive_labels: state.case_sensitive_labels,
        ..config
    };
    config.validate()?;
    let tokenizer = Tokenizer::new(config.tokenizer.clone())?;
    let corpus = Corpus::from_pools(state.pools);

    log::info!("loaded {} pools from {}", corpus.len(), path.display());
    Ok(Classifier::from_parts(corpus, tokenizer, config))
}

fn encode<W: Write>(state: &SerializableState, format: PersistFormat, writer: &mut W) -> Result<()> {
    match format {
        PersistFormat::Binary => {
            writer.write_all(MAGIC)?;
            writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
            bincode::serialize_into(writer, state)
                .map_err(|e| ClassifierError::Serialization(e.to_string()))
        }
        PersistFormat::Json => {
            let document = JsonDocument {
                format_version: FORMAT_VERSION,
                state: state.clone(),
            };
            serde_json::to_writer_pretty(writer, &document)
                .map_err(|e| ClassifierError::Serialization(e.to_string()))
        }
    }
}

fn decode(bytes: &[u8]) -> Result<SerializableState> {
    if bytes.starts_with(MAGIC) {
        decode_binary(bytes)
    } else if bytes.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'{') {
        decode_json(bytes)
    } else {
        Err(ClassifierError::IncompatibleFormat(
            "not a corpus file (unrecognised header)".to_string(),
        ))
    }
}

fn decode_binary(bytes: &[u8]) -> Result<SerializableState> {
    if bytes.len() < HEADER_LEN {
        return Err(ClassifierError::IncompatibleFormat("truncated header".to_string()));
    }
    let version = u16::from_le_bytes([bytes[MAGIC.len()], bytes[MAGIC.len() + 1]]);
    check_version(version)?;
    bincode::deserialize(&bytes[HEADER_LEN..])
        .map_err(|e| ClassifierError::IncompatibleFormat(format!("corrupt binary corpus: {e}")))
}

fn decode_json(bytes: &[u8]) -> Result<SerializableState> {
    #[derive(Deserialize)]
    struct VersionProbe {
        format_version: Option<u16>,
    }

    let probe: VersionProbe = serde_json::from_slice(bytes)
        .map_err(|e| ClassifierError::IncompatibleFormat(format!("corrupt JSON corpus: {e}")))?;
    let version = probe.format_version.ok_or_else(|| {
        ClassifierError::IncompatibleFormat("JSON corpus has no format_version".to_string())
    })?;
    check_version(version)?;

    let document: JsonDocument = serde_json::from_slice(bytes)
        .map_err(|e| ClassifierError::IncompatibleFormat(format!("corrupt JSON corpus: {e}")))?;
    Ok(document.state)
}

fn check_version(version: u16) -> Result<()> {
    match version {
        1..=FORMAT_VERSION => Ok(()),
        other => Err(ClassifierError::IncompatibleFormat(format!(
            "format version {other} is not supported (this build reads 1..={FORMAT_VERSION})"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn trained() -> Classifier {
        let mut c = Classifier::new(ClassifierConfig::default()).unwrap();
        c.train("spam", "buy cheap pills now").unwrap();
        c.train("spam", "cheap watches").unwrap();
        c.train("ham", "meeting notes attached").unwrap();
        c.new_pool("empty").unwrap();
        c
    }

    #[test]
    fn binary_round_trip_is_exact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.bin");
        let original = trained();

        save_to_disk(&original, &path, PersistFormat::Binary).unwrap();
        let loaded = load_from_disk(&path, ClassifierConfig::default()).unwrap();

        assert_eq!(loaded.corpus(), original.corpus());
        assert!(loaded.corpus().is_consistent());
    }

    #[test]
    fn json_round_trip_is_exact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let original = trained();

        save_to_disk(&original, &path, PersistFormat::from_path(&path)).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"format_version\": 1"));

        let loaded = load_from_disk(&path, ClassifierConfig::default()).unwrap();
        assert_eq!(loaded.corpus(), original.corpus());
    }

    #[test]
    fn saving_over_an_existing_corpus_replaces_it_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.bin");
        let mut c = trained();
        save_to_disk(&c, &path, PersistFormat::Binary).unwrap();

        c.train("ham", "lunch plans tomorrow").unwrap();
        save_to_disk(&c, &path, PersistFormat::Binary).unwrap();

        let loaded = load_from_disk(&path, ClassifierConfig::default()).unwrap();
        assert_eq!(loaded.corpus(), c.corpus());
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn future_versions_are_incompatible() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.bin");
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&(FORMAT_VERSION + 1).to_le_bytes());
        fs::write(&path, bytes).unwrap();

        let err = load_from_disk(&path, ClassifierConfig::default()).err().unwrap();
        assert!(matches!(err, ClassifierError::IncompatibleFormat(_)));
    }

    #[test]
    fn garbage_and_truncated_files_are_incompatible() {
        let dir = tempdir().unwrap();
        for (name, bytes) in [
            ("garbage.bin", b"hello world".to_vec()),
            ("short.bin", b"RVND".to_vec()),
            ("body.bin", [&MAGIC[..], &[1u8, 0][..], &[0xffu8; 3][..]].concat()),
            ("noversion.json", b"{\"pools\": {}}".to_vec()),
        ] {
            let path = dir.path().join(name);
            fs::write(&path, bytes).unwrap();
            let err = load_from_disk(&path, ClassifierConfig::default()).err().unwrap();
            assert!(matches!(err, ClassifierError::IncompatibleFormat(_)), "{name}");
        }
    }

    #[test]
    fn stored_tokenizer_wins_over_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.bin");
        let mut c = Classifier::new(ClassifierConfig {
            tokenizer: TokenizerConfig {
                lowercase: false,
                ..TokenizerConfig::default()
            },
            ..ClassifierConfig::default()
        })
        .unwrap();
        c.train("spam", "CHEAP pills").unwrap();
        save_to_disk(&c, &path, PersistFormat::Binary).unwrap();

        let loaded = load_from_disk(&path, ClassifierConfig::default()).unwrap();
        assert!(!loaded.config().tokenizer.lowercase);
        assert_eq!(loaded.tokenize("CHEAP").into_vec(), vec!["CHEAP"]);
    }

    #[test]
    fn format_names_resolve() {
        assert_eq!(PersistFormat::from_name("JSON"), Some(PersistFormat::Json));
        assert_eq!(PersistFormat::from_name("bincode"), Some(PersistFormat::Binary));
        assert_eq!(PersistFormat::from_name("xml"), None);
        assert_eq!(PersistFormat::from_path(Path::new("c.dat")), PersistFormat::Binary);
    }
}
