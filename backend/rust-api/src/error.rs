use thiserror::Error;

/// Domain failures raised by the vocabulary store and quiz sessions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("Topic '{0}' not found")]
    TopicNotFound(String),

    /// Unknown and expired sessions are indistinguishable to callers.
    #[error("Session not found")]
    SessionNotFound,

    #[error("Question index {index} is out of range (quiz has {total} questions)")]
    InvalidQuestionIndex { index: usize, total: usize },

    #[error("Option {option} is out of range (question has {total} choices)")]
    InvalidOption { option: usize, total: usize },

    #[error("An answer or an option is required")]
    MissingAnswer,

    #[error("A topic is required for vocabulary quizzes")]
    MissingTopic,

    #[error("Topic '{0}' has no entries")]
    EmptyTopic(String),

    #[error("Quiz is already completed")]
    SessionCompleted,
}
