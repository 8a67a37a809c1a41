use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Vocabulary,
    Arithmetic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    pub correct_answer: String,
    /// Shuffled multiple-choice options; always contains `correct_answer`.
    pub choices: Vec<String>,
    pub kind: QuestionKind,
}

impl Question {
    pub fn vocabulary(prompt: impl Into<String>, correct_answer: impl Into<String>) -> Self {
        let correct_answer = correct_answer.into();
        Self {
            prompt: prompt.into(),
            choices: vec![correct_answer.clone()],
            correct_answer,
            kind: QuestionKind::Vocabulary,
        }
    }

    pub fn arithmetic(prompt: impl Into<String>, correct_answer: impl Into<String>) -> Self {
        let correct_answer = correct_answer.into();
        Self {
            prompt: prompt.into(),
            choices: vec![correct_answer.clone()],
            correct_answer,
            kind: QuestionKind::Arithmetic,
        }
    }

    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }
}

/// Public shape of a question; never carries the expected answer.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub prompt: String,
    pub choices: Vec<String>,
    pub kind: QuestionKind,
}

impl QuestionView {
    pub fn from_question(index: usize, question: &Question) -> Self {
        Self {
            index,
            prompt: question.prompt.clone(),
            choices: question.choices.clone(),
            kind: question.kind,
        }
    }
}
