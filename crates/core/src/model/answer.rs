use chrono::{DateTime, Utc};

use crate::model::ids::QuestionId;
use crate::model::question::{AnswerChoice, Question};
use crate::model::realm::ChapterKey;

/// Record of a single answered question.
///
/// The answer log is the raw material for the journal and the weakness detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub chapter: ChapterKey,
    pub selected: AnswerChoice,
    pub correct: AnswerChoice,
    pub answered_at: DateTime<Utc>,
}

impl AnswerRecord {
    #[must_use]
    pub fn new(question: &Question, selected: AnswerChoice, answered_at: DateTime<Utc>) -> Self {
        Self {
            question_id: question.id(),
            chapter: question.chapter(),
            selected,
            correct: question.correct(),
            answered_at,
        }
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.selected == self.correct
    }
}
