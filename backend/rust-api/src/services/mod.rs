use std::sync::Arc;

use crate::config::Config;

pub mod question_sampler;
pub mod quiz_service;
pub mod scorer;
pub mod session_store;
pub mod session_sweeper;
pub mod vocabulary_store;

use question_sampler::QuestionSampler;
use session_store::SessionStore;
use vocabulary_store::VocabularyStore;

pub struct AppState {
    pub config: Config,
    pub vocabulary: Arc<VocabularyStore>,
    pub sessions: SessionStore,
    pub sampler: QuestionSampler,
}

impl AppState {
    /// Loads the vocabulary directory named in `config`.
    pub fn new(config: Config) -> Self {
        tracing::info!(
            "Loading vocabulary from {}",
            config.quiz.vocab_dir.display()
        );
        let vocabulary = VocabularyStore::load(&config.quiz);
        Self::with_vocabulary(config, vocabulary)
    }

    pub fn with_vocabulary(config: Config, vocabulary: VocabularyStore) -> Self {
        let sessions = SessionStore::new(config.session_timeout());
        let sampler = QuestionSampler::new(&config.quiz);

        Self {
            config,
            vocabulary: Arc::new(vocabulary),
            sessions,
            sampler,
        }
    }
}
