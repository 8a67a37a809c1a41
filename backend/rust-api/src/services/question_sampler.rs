use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

use crate::config::QuizConfig;
use crate::error::QuizError;
use crate::models::{Question, VocabularyEntry};
use crate::services::vocabulary_store::VocabularyStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Add,
    Subtract,
    Multiply,
}

impl Operator {
    const ALL: [Operator; 3] = [Operator::Add, Operator::Subtract, Operator::Multiply];

    fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
        }
    }

    fn apply(self, left: u64, right: u64) -> u64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
        }
    }
}

/// Builds randomized question sets from topics or arithmetic problems.
#[derive(Debug, Clone)]
pub struct QuestionSampler {
    choices_per_question: usize,
    arithmetic_min: u32,
    arithmetic_max: u32,
}

impl QuestionSampler {
    pub fn new(config: &QuizConfig) -> Self {
        Self {
            choices_per_question: config.choices_per_question.max(1),
            arithmetic_min: config.arithmetic_min.min(config.arithmetic_max),
            arithmetic_max: config.arithmetic_max.max(config.arithmetic_min),
        }
    }

    /// Picks `min(count, N)` distinct entries of `topic` in random order.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        store: &VocabularyStore,
        topic: &str,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Question>, QuizError> {
        let entries = store.get_entries(topic)?;
        Ok(self.sample_entries(entries, count, rng))
    }

    pub fn sample_entries<R: Rng + ?Sized>(
        &self,
        entries: &[VocabularyEntry],
        count: usize,
        rng: &mut R,
    ) -> Vec<Question> {
        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.shuffle(rng);
        order.truncate(count.min(entries.len()));

        order
            .into_iter()
            .map(|idx| {
                let entry = &entries[idx];
                let choices = self.vocabulary_choices(&entry.translation, entries, rng);
                Question::vocabulary(&entry.word, &entry.translation).with_choices(choices)
            })
            .collect()
    }

    /// Correct translation plus up to `choices_per_question - 1` distinct
    /// distractors from the same topic; smaller topics give fewer choices.
    fn vocabulary_choices<R: Rng + ?Sized>(
        &self,
        correct: &str,
        entries: &[VocabularyEntry],
        rng: &mut R,
    ) -> Vec<String> {
        let correct_key = correct.trim().to_lowercase();
        let mut seen = BTreeSet::new();
        let mut pool: Vec<&str> = entries
            .iter()
            .map(|entry| entry.translation.as_str())
            .filter(|translation| {
                let key = translation.trim().to_lowercase();
                key != correct_key && seen.insert(key)
            })
            .collect();

        pool.shuffle(rng);
        pool.truncate(self.choices_per_question - 1);

        let mut choices: Vec<String> = pool.into_iter().map(str::to_string).collect();
        choices.push(correct.to_string());
        choices.shuffle(rng);
        choices
    }

    /// Generates `count` problems with operands in the configured range.
    pub fn arithmetic<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Question> {
        (0..count)
            .map(|_| {
                let op = Operator::ALL[rng.random_range(0..Operator::ALL.len())];
                let mut left = u64::from(rng.random_range(self.arithmetic_min..=self.arithmetic_max));
                let mut right =
                    u64::from(rng.random_range(self.arithmetic_min..=self.arithmetic_max));
                if op == Operator::Subtract && left < right {
                    std::mem::swap(&mut left, &mut right);
                }
                let result = op.apply(left, right);
                let prompt = format!("{} {} {}", left, op.symbol(), right);
                let choices = self.arithmetic_choices(result, rng);
                Question::arithmetic(prompt, result.to_string()).with_choices(choices)
            })
            .collect()
    }

    /// Distinct non-negative numbers near `result`, including `result`.
    fn arithmetic_choices<R: Rng + ?Sized>(&self, result: u64, rng: &mut R) -> Vec<String> {
        let wanted = self.choices_per_question;
        let spread = (result / 4).max(5);
        let mut values = BTreeSet::from([result]);

        // Bounded so a tiny spread can never spin forever.
        for _ in 0..wanted * 20 {
            if values.len() >= wanted {
                break;
            }
            let offset = rng.random_range(1..=spread);
            let candidate = if rng.random_bool(0.5) {
                result.checked_sub(offset)
            } else {
                result.checked_add(offset)
            };
            if let Some(value) = candidate {
                values.insert(value);
            }
        }

        let mut choices: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        choices.shuffle(rng);
        choices
    }
}
