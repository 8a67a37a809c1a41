use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::question::QuestionView;

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_answer_source"))]
pub struct SubmitAnswerRequest {
    pub index: usize,
    #[validate(length(max = 200))]
    pub answer: Option<String>,
    /// Position in the question's `choices`, as an alternative to `answer`.
    pub option: Option<usize>,
}

fn validate_answer_source(req: &SubmitAnswerRequest) -> Result<(), ValidationError> {
    match (&req.answer, &req.option) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        _ => {
            let mut err = ValidationError::new("answer_source");
            err.message = Some("exactly one of `answer` or `option` must be provided".into());
            Err(err)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub index: usize,
    pub prompt: String,
    pub submitted: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    #[serde(flatten)]
    pub record: AnswerRecord,
    pub score: u32,
    pub answered: usize,
    pub total_questions: usize,
    pub status: super::session::SessionStatus,
}

#[derive(Debug, Serialize)]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub question: QuestionView,
    pub total_questions: usize,
    pub answer_record: Option<AnswerRecord>,
}
