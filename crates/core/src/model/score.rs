use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::StudentId;
use crate::model::realm::ChapterKey;
use crate::progress::accuracy;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CountMismatch { correct: u32, total: u32 },

    #[error("student name cannot be empty")]
    EmptyName,
}

/// One completed chapter attempt, as appended to the score log.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    student_id: StudentId,
    student_name: String,
    chapter: ChapterKey,
    correct_answers: u32,
    total_questions: u32,
    xp_earned: u32,
    passed: bool,
    streak: u32,
    time_spent_secs: u32,
    recorded_at: DateTime<Utc>,
}

impl ScoreEntry {
    /// Build or rehydrate a score entry.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::CountMismatch` if `correct_answers > total_questions`
    /// and `ScoreError::EmptyName` for a blank student name.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        student_id: StudentId,
        student_name: impl Into<String>,
        chapter: ChapterKey,
        correct_answers: u32,
        total_questions: u32,
        xp_earned: u32,
        passed: bool,
        streak: u32,
        time_spent_secs: u32,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, ScoreError> {
        if correct_answers > total_questions {
            return Err(ScoreError::CountMismatch {
                correct: correct_answers,
                total: total_questions,
            });
        }
        let student_name = student_name.into().trim().to_owned();
        if student_name.is_empty() {
            return Err(ScoreError::EmptyName);
        }

        Ok(Self {
            student_id,
            student_name,
            chapter,
            correct_answers,
            total_questions,
            xp_earned,
            passed,
            streak,
            time_spent_secs,
            recorded_at,
        })
    }

    #[must_use]
    pub fn student_id(&self) -> &StudentId {
        &self.student_id
    }

    #[must_use]
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    #[must_use]
    pub fn chapter(&self) -> ChapterKey {
        self.chapter
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn xp_earned(&self) -> u32 {
        self.xp_earned
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn time_spent_secs(&self) -> u32 {
        self.time_spent_secs
    }

    #[must_use]
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Percentage of correct answers in this attempt.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        accuracy(self.correct_answers, self.total_questions)
    }
}
