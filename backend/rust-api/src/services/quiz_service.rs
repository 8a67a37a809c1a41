use crate::error::QuizError;
use crate::metrics::ANSWERS_SUBMITTED_TOTAL;
use crate::models::{
    CreateSessionRequest, Question, QuizMode, QuizResult, QuizSession, SubmitAnswerRequest,
    SubmitAnswerResponse,
};
use crate::services::AppState;

const ARITHMETIC_LABEL: &str = "Arithmetic";
const MAX_ARITHMETIC_QUESTIONS: usize = 100;

/// Quiz flow shared by the HTML pages and the JSON API.
pub struct QuizService<'a> {
    state: &'a AppState,
}

impl<'a> QuizService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn start(&self, req: &CreateSessionRequest) -> Result<QuizSession, QuizError> {
        let mode = req.resolved_mode();
        let requested = req
            .count
            .unwrap_or(self.state.config.quiz.default_question_count);

        let (topic, questions) = match mode {
            QuizMode::Vocabulary => {
                let topic = req.topic.as_deref().ok_or(QuizError::MissingTopic)?;
                (topic.to_string(), self.vocabulary_questions(topic, requested)?)
            }
            QuizMode::Arithmetic => {
                let count = requested.clamp(1, MAX_ARITHMETIC_QUESTIONS);
                let questions = self.state.sampler.arithmetic(count, &mut rand::rng());
                (ARITHMETIC_LABEL.to_string(), questions)
            }
        };

        Ok(self.state.sessions.create(&topic, mode, questions).await)
    }

    fn vocabulary_questions(&self, topic: &str, requested: usize) -> Result<Vec<Question>, QuizError> {
        let entries = self.state.vocabulary.get_entries(topic)?;
        if entries.is_empty() {
            return Err(QuizError::EmptyTopic(topic.to_string()));
        }
        let count = requested.clamp(1, entries.len());
        if count != requested {
            tracing::debug!(
                "Clamped question count for {} from {} to {}",
                topic,
                requested,
                count
            );
        }
        Ok(self
            .state
            .sampler
            .sample_entries(entries, count, &mut rand::rng()))
    }

    pub async fn submit(
        &self,
        session_id: &str,
        req: &SubmitAnswerRequest,
    ) -> Result<SubmitAnswerResponse, QuizError> {
        let response = self
            .state
            .sessions
            .update(session_id, |session| {
                let answer = req.answer.as_deref().filter(|a| !a.trim().is_empty());
                let record = match (req.option, answer) {
                    (Some(option), _) => session.submit_option(req.index, option)?,
                    (None, Some(answer)) => session.submit(req.index, answer)?,
                    (None, None) if session.is_completed() => {
                        return Err(QuizError::SessionCompleted)
                    }
                    (None, None) => return Err(QuizError::MissingAnswer),
                };
                Ok(SubmitAnswerResponse {
                    record,
                    score: session.score,
                    answered: session.answered_count(),
                    total_questions: session.total_questions(),
                    status: session.status,
                })
            })
            .await?;

        let correct_label = if response.record.is_correct {
            "true"
        } else {
            "false"
        };
        ANSWERS_SUBMITTED_TOTAL
            .with_label_values(&[correct_label])
            .inc();

        tracing::info!(
            "Answer processed: session={}, index={}, correct={}, score={}",
            session_id,
            req.index,
            response.record.is_correct,
            response.score
        );

        Ok(response)
    }

    pub async fn complete(&self, session_id: &str) -> Result<QuizResult, QuizError> {
        self.state
            .sessions
            .update(session_id, |session| {
                session.finish();
                Ok(session.result())
            })
            .await
    }

    pub async fn result(&self, session_id: &str) -> Result<QuizResult, QuizError> {
        self.state
            .sessions
            .update(session_id, |session| Ok(session.result()))
            .await
    }
}
