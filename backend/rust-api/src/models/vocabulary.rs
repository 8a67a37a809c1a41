use serde::{Deserialize, Serialize};

/// One word/translation pair read from a topic file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub word: String,
    pub translation: String,
}

impl VocabularyEntry {
    pub fn new(word: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            translation: translation.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Topic {
    /// File stem of the source CSV, used in URLs and forms.
    pub id: String,
    pub name: String,
    pub entries: Vec<VocabularyEntry>,
}

impl Topic {
    pub fn new(id: impl Into<String>, entries: Vec<VocabularyEntry>) -> Self {
        let id = id.into();
        Self {
            name: display_name(&id),
            id,
            entries,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSummary {
    pub id: String,
    pub name: String,
    pub count: usize,
}

impl TopicSummary {
    pub fn from_topic(topic: &Topic) -> Self {
        Self {
            id: topic.id.clone(),
            name: topic.name.clone(),
            count: topic.entries.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TopicDetail {
    pub id: String,
    pub name: String,
    pub count: usize,
    pub entries: Vec<VocabularyEntry>,
}

impl TopicDetail {
    pub fn from_topic(topic: &Topic) -> Self {
        Self {
            id: topic.id.clone(),
            name: topic.name.clone(),
            count: topic.entries.len(),
            entries: topic.entries.clone(),
        }
    }
}

/// `german_basic` -> `German Basic`
pub fn display_name(id: &str) -> String {
    id.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
