use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use validator::Validate;

use super::answer::{AnswerRecord, QuestionDetail};
use super::question::{Question, QuestionView};
use crate::error::QuizError;
use crate::services::scorer;

/// Topic value the start form uses to pick the arithmetic mode.
pub const ARITHMETIC_TOPIC: &str = "__arithmetic__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Created,
    InProgress,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Created => "created",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
        }
    }

    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (SessionStatus::Created, SessionStatus::InProgress)
                | (SessionStatus::Created, SessionStatus::Completed)
                | (SessionStatus::InProgress, SessionStatus::InProgress)
                | (SessionStatus::InProgress, SessionStatus::Completed)
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizMode {
    #[default]
    #[serde(alias = "standard")]
    Vocabulary,
    Arithmetic,
}

impl QuizMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizMode::Vocabulary => "vocabulary",
            QuizMode::Arithmetic => "arithmetic",
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(min = 1, max = 100))]
    pub topic: Option<String>,
    pub mode: Option<QuizMode>,
    /// Clamped to the available entries; never rejected.
    pub count: Option<usize>,
}

impl CreateSessionRequest {
    /// Resolves the requested mode, honouring the arithmetic pseudo topic.
    pub fn resolved_mode(&self) -> QuizMode {
        match (&self.mode, self.topic.as_deref()) {
            (_, Some(ARITHMETIC_TOPIC)) => QuizMode::Arithmetic,
            (Some(mode), _) => *mode,
            (None, _) => QuizMode::Vocabulary,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    pub id: String,
    pub topic: String,
    pub mode: QuizMode,
    pub questions: Vec<Question>,
    /// Last submission per question index.
    pub answers: BTreeMap<usize, AnswerRecord>,
    pub score: u32,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    // Indices already credited to `score`; never shrinks.
    credited: BTreeSet<usize>,
}

impl QuizSession {
    pub fn new(
        id: impl Into<String>,
        topic: impl Into<String>,
        mode: QuizMode,
        questions: Vec<Question>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            mode,
            questions,
            answers: BTreeMap::new(),
            score: 0,
            status: SessionStatus::Created,
            created_at: now,
            last_activity: now,
            credited: BTreeSet::new(),
        }
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    pub fn is_expired(&self, now: DateTime<Utc>, idle_timeout: Duration) -> bool {
        now - self.last_activity > idle_timeout
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }

    pub fn first_unanswered(&self) -> Option<usize> {
        (0..self.questions.len()).find(|index| !self.answers.contains_key(index))
    }

    /// Records `answer` for question `index`.
    ///
    /// Resubmissions overwrite the stored answer, but an index adds to the
    /// score at most once: the first time it is answered correctly. A later
    /// wrong answer does not take the point back.
    pub fn submit(&mut self, index: usize, answer: &str) -> Result<AnswerRecord, QuizError> {
        if self.is_completed() {
            return Err(QuizError::SessionCompleted);
        }
        let question = self
            .questions
            .get(index)
            .ok_or(QuizError::InvalidQuestionIndex {
                index,
                total: self.questions.len(),
            })?;

        let is_correct = scorer::check(question, answer);
        if is_correct && self.credited.insert(index) {
            self.score += 1;
        }

        let record = AnswerRecord {
            index,
            prompt: question.prompt.clone(),
            submitted: answer.trim().to_string(),
            correct_answer: question.correct_answer.clone(),
            is_correct,
        };
        self.answers.insert(index, record.clone());

        let next = if self.answers.len() == self.questions.len() {
            SessionStatus::Completed
        } else {
            SessionStatus::InProgress
        };
        self.transition(next);

        Ok(record)
    }

    /// Submits the text of the multiple-choice `option` of question `index`.
    pub fn submit_option(&mut self, index: usize, option: usize) -> Result<AnswerRecord, QuizError> {
        if self.is_completed() {
            return Err(QuizError::SessionCompleted);
        }
        let question = self
            .questions
            .get(index)
            .ok_or(QuizError::InvalidQuestionIndex {
                index,
                total: self.questions.len(),
            })?;
        let choice = question
            .choices
            .get(option)
            .cloned()
            .ok_or(QuizError::InvalidOption {
                option,
                total: question.choices.len(),
            })?;
        self.submit(index, &choice)
    }

    /// Ends the quiz early; unanswered questions count as wrong.
    pub fn finish(&mut self) {
        if !self.is_completed() {
            self.transition(SessionStatus::Completed);
        }
    }

    fn transition(&mut self, next: SessionStatus) {
        if self.status.can_transition_to(next) {
            self.status = next;
        } else {
            tracing::warn!(
                "Ignoring session {} transition {} -> {}",
                self.id,
                self.status.as_str(),
                next.as_str()
            );
        }
    }

    pub fn question_detail(&self, index: usize) -> Result<QuestionDetail, QuizError> {
        let question = self
            .questions
            .get(index)
            .ok_or(QuizError::InvalidQuestionIndex {
                index,
                total: self.questions.len(),
            })?;
        Ok(QuestionDetail {
            question: QuestionView::from_question(index, question),
            total_questions: self.questions.len(),
            answer_record: self.answers.get(&index).cloned(),
        })
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id.clone(),
            topic: self.topic.clone(),
            mode: self.mode,
            status: self.status,
            score: self.score,
            answered: self.answers.len(),
            total_questions: self.questions.len(),
            questions: self
                .questions
                .iter()
                .enumerate()
                .map(|(index, question)| QuestionView::from_question(index, question))
                .collect(),
            created_at: self.created_at,
        }
    }

    pub fn result(&self) -> QuizResult {
        QuizResult::new(
            self.score,
            self.questions.len(),
            self.answers.values().cloned().collect(),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub topic: String,
    pub mode: QuizMode,
    pub status: SessionStatus,
    pub score: u32,
    pub answered: usize,
    pub total_questions: usize,
    pub questions: Vec<QuestionView>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizResult {
    pub correct_count: u32,
    pub total_questions: usize,
    pub score_percentage: u32,
    pub answers: Vec<AnswerRecord>,
}

impl QuizResult {
    pub fn new(correct_count: u32, total_questions: usize, answers: Vec<AnswerRecord>) -> Self {
        let score_percentage = if total_questions == 0 {
            0
        } else {
            (f64::from(correct_count) / total_questions as f64 * 100.0).round() as u32
        };
        Self {
            correct_count,
            total_questions,
            score_percentage,
            answers,
        }
    }
}
