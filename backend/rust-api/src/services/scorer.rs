use crate::models::{Question, QuestionKind};

/// Returns whether `submitted` answers `question`.
///
/// Vocabulary answers match case-insensitively after trimming. Arithmetic
/// answers are compared as numbers; anything that does not parse is wrong.
pub fn check(question: &Question, submitted: &str) -> bool {
    match question.kind {
        QuestionKind::Vocabulary => normalize(submitted) == normalize(&question.correct_answer),
        QuestionKind::Arithmetic => match (
            parse_number(submitted),
            parse_number(&question.correct_answer),
        ) {
            (Some(given), Some(expected)) => given == expected,
            _ => false,
        },
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}
