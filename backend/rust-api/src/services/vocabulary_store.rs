use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::QuizConfig;
use crate::error::QuizError;
use crate::metrics::{MALFORMED_ROWS_TOTAL, TOPICS_LOADED};
use crate::models::{Topic, TopicSummary, VocabularyEntry};

const WORD_COLUMN: &str = "word";
const TRANSLATION_COLUMN: &str = "translation";
const DEMO_TOPIC_ID: &str = "default_dummy";

/// Read-only table of topics, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct VocabularyStore {
    topics: BTreeMap<String, Topic>,
}

impl VocabularyStore {
    pub fn load(config: &QuizConfig) -> Self {
        let mut store = Self::load_dir(&config.vocab_dir);

        if store.topics.is_empty() {
            if config.demo_topic_on_empty {
                tracing::warn!("No vocabulary topics loaded, installing demo topic");
                store.insert(demo_topic());
            } else {
                tracing::warn!(
                    "No vocabulary topics loaded from {}; only arithmetic mode is available",
                    config.vocab_dir.display()
                );
            }
        }

        TOPICS_LOADED.set(store.topics.len() as i64);
        store
    }

    /// Loads every `*.csv` file in `dir`. Unreadable files are skipped.
    pub fn load_dir(dir: &Path) -> Self {
        let mut store = Self::default();

        if !dir.exists() {
            match fs::create_dir_all(dir) {
                Ok(()) => tracing::warn!(
                    "Created vocabulary directory {}. Please add CSV files.",
                    dir.display()
                ),
                Err(e) => tracing::error!(
                    "Vocabulary directory {} is missing and could not be created: {}",
                    dir.display(),
                    e
                ),
            }
            return store;
        }

        let files = match csv_files(dir) {
            Ok(files) => files,
            Err(e) => {
                tracing::error!("Failed to scan {}: {:#}", dir.display(), e);
                return store;
            }
        };

        for path in files {
            match load_topic_file(&path) {
                Ok(topic) => {
                    tracing::info!("Loaded {} words from {}", topic.entries.len(), topic.id);
                    store.insert(topic);
                }
                Err(e) => tracing::error!("Skipping {}: {:#}", path.display(), e),
            }
        }

        store
    }

    pub fn from_topics(topics: impl IntoIterator<Item = Topic>) -> Self {
        let mut store = Self::default();
        for topic in topics {
            store.insert(topic);
        }
        store
    }

    fn insert(&mut self, topic: Topic) {
        self.topics.insert(topic.id.clone(), topic);
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Topic summaries ordered by display name.
    pub fn list_topics(&self) -> Vec<TopicSummary> {
        let mut topics: Vec<TopicSummary> =
            self.topics.values().map(TopicSummary::from_topic).collect();
        topics.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        topics
    }

    pub fn get_topic(&self, topic: &str) -> Result<&Topic, QuizError> {
        self.topics
            .get(topic)
            .ok_or_else(|| QuizError::TopicNotFound(topic.to_string()))
    }

    pub fn get_entries(&self, topic: &str) -> Result<&[VocabularyEntry], QuizError> {
        self.get_topic(topic).map(|topic| topic.entries.as_slice())
    }
}

fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).context("Failed to read vocabulary directory")? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn load_topic_file(path: &Path) -> Result<Topic> {
    let id = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| anyhow!("File name is not valid UTF-8"))?
        .to_string();
    let file = File::open(path).context("Failed to open file")?;
    parse_topic(&id, file)
}

/// Parses one topic file. Rows with a missing or blank `word` or
/// `translation` are skipped; a file without those columns is an error.
pub fn parse_topic<R: Read>(id: &str, source: R) -> Result<Topic> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers().context("Failed to read header row")?.clone();
    let column = |name: &str| headers.iter().position(|header| header == name);
    let (word_idx, translation_idx) = match (column(WORD_COLUMN), column(TRANSLATION_COLUMN)) {
        (Some(word), Some(translation)) => (word, translation),
        _ => {
            return Err(anyhow!(
                "Missing '{}' or '{}' column",
                WORD_COLUMN,
                TRANSLATION_COLUMN
            ))
        }
    };

    let mut entries = Vec::new();
    for (row, record) in reader.records().enumerate() {
        // Header is line 1.
        let line = row + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => {
                return Err(anyhow::Error::new(e).context(format!("Read failed at line {}", line)))
            }
            Err(e) => {
                MALFORMED_ROWS_TOTAL.inc();
                tracing::warn!("{}: skipping unreadable row {}: {}", id, line, e);
                continue;
            }
        };

        let word = record.get(word_idx).unwrap_or_default();
        let translation = record.get(translation_idx).unwrap_or_default();
        if word.is_empty() || translation.is_empty() {
            MALFORMED_ROWS_TOTAL.inc();
            tracing::warn!("{}: skipping malformed row {}", id, line);
            continue;
        }
        entries.push(VocabularyEntry::new(word, translation));
    }

    Ok(Topic::new(id, entries))
}

fn demo_topic() -> Topic {
    Topic::new(
        DEMO_TOPIC_ID,
        vec![
            VocabularyEntry::new("Hund", "dog"),
            VocabularyEntry::new("Katze", "cat"),
            VocabularyEntry::new("Baum", "tree"),
            VocabularyEntry::new("Haus", "house"),
            VocabularyEntry::new("Wasser", "water"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_vocab_dir(files: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wlingo-vocab-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn test_well_formed_rows_are_all_loaded() {
        let topic = parse_topic(
            "spanish",
            "word,translation\nhola,hello\ngracias,thank you\nperro,dog\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(topic.entries.len(), 3);
        assert!(topic
            .entries
            .iter()
            .all(|e| !e.word.is_empty() && !e.translation.is_empty()));
        assert_eq!(topic.entries[1], VocabularyEntry::new("gracias", "thank you"));
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let csv = "word,translation\nhola,hello\nsolo\n,empty\nblank,   \ngato,cat,extra\n";
        let topic = parse_topic("spanish", csv.as_bytes()).unwrap();
        let words: Vec<&str> = topic.entries.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["hola", "gato"]);
    }

    #[test]
    fn test_column_order_and_extra_columns() {
        let csv = "notes,translation,word\nfamiliar,hello,hola\n";
        let topic = parse_topic("spanish", csv.as_bytes()).unwrap();
        assert_eq!(topic.entries, vec![VocabularyEntry::new("hola", "hello")]);
    }

    #[test]
    fn test_missing_columns_is_an_error() {
        let err = parse_topic("broken", "term,meaning\na,b\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Missing"));
    }

    #[test]
    fn test_header_only_file_yields_empty_topic() {
        let topic = parse_topic("empty", "word,translation\n".as_bytes()).unwrap();
        assert!(topic.entries.is_empty());
    }

    #[test]
    fn test_load_dir_uses_file_stems_and_skips_bad_files() {
        let dir = temp_vocab_dir(&[
            ("spanish.csv", "word,translation\nhola,hello\n"),
            ("german_basic.csv", "word,translation\nHund,dog\nKatze,cat\n"),
            ("empty.csv", "word,translation\n"),
            ("broken.csv", "foo,bar\n1,2\n"),
            ("notes.txt", "word,translation\nx,y\n"),
        ]);

        let store = VocabularyStore::load_dir(&dir);
        let topics = store.list_topics();
        let names: Vec<&str> = topics.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Empty", "German Basic", "Spanish"]);
        assert_eq!(store.get_entries("german_basic").unwrap().len(), 2);
        assert!(store.get_entries("empty").unwrap().is_empty());
        assert!(store.get_topic("broken").is_err());

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_unknown_topic_is_not_found() {
        let store = VocabularyStore::from_topics(vec![Topic::new(
            "spanish",
            vec![VocabularyEntry::new("hola", "hello")],
        )]);
        let err = store.get_entries("Klingon").unwrap_err();
        assert_eq!(err, QuizError::TopicNotFound("Klingon".to_string()));
    }

    #[test]
    fn test_missing_dir_is_created_and_demo_fallback_is_optional() {
        let dir = std::env::temp_dir().join(format!("wlingo-missing-{}", Uuid::new_v4()));
        let mut config = QuizConfig {
            vocab_dir: dir.clone(),
            ..QuizConfig::default()
        };

        let store = VocabularyStore::load(&config);
        assert!(store.is_empty());
        assert!(dir.exists());

        config.demo_topic_on_empty = true;
        let store = VocabularyStore::load(&config);
        assert_eq!(store.get_entries(DEMO_TOPIC_ID).unwrap().len(), 5);

        fs::remove_dir_all(dir).ok();
    }
}
