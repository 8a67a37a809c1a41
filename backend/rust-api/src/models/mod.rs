pub mod answer;
pub mod question;
pub mod session;
pub mod vocabulary;

pub use answer::{AnswerRecord, QuestionDetail, SubmitAnswerRequest, SubmitAnswerResponse};
pub use question::{Question, QuestionKind, QuestionView};
pub use session::{
    CreateSessionRequest, QuizMode, QuizResult, QuizSession, SessionStatus, SessionView,
    ARITHMETIC_TOPIC,
};
pub use vocabulary::{Topic, TopicDetail, TopicSummary, VocabularyEntry};
