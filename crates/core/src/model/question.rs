use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::realm::ChapterKey;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("option {0} cannot be empty")]
    EmptyOption(AnswerChoice),

    #[error("invalid answer letter: {0:?}")]
    InvalidAnswer(String),

    #[error("invalid answer index: {0}")]
    InvalidIndex(usize),
}

//
// ─── ANSWER CHOICE ─────────────────────────────────────────────────────────────
//

/// One of the four multiple-choice slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnswerChoice {
    A,
    B,
    C,
    D,
}

impl AnswerChoice {
    pub const ALL: [AnswerChoice; 4] = [
        AnswerChoice::A,
        AnswerChoice::B,
        AnswerChoice::C,
        AnswerChoice::D,
    ];

    /// Builds a choice from a zero-based option index.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidIndex` for indices above 3.
    pub fn from_index(index: usize) -> Result<Self, QuestionError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(QuestionError::InvalidIndex(index))
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            AnswerChoice::A => 0,
            AnswerChoice::B => 1,
            AnswerChoice::C => 2,
            AnswerChoice::D => 3,
        }
    }

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            AnswerChoice::A => 'A',
            AnswerChoice::B => 'B',
            AnswerChoice::C => 'C',
            AnswerChoice::D => 'D',
        }
    }
}

impl fmt::Display for AnswerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for AnswerChoice {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(AnswerChoice::A),
            "B" => Ok(AnswerChoice::B),
            "C" => Ok(AnswerChoice::C),
            "D" => Ok(AnswerChoice::D),
            _ => Err(QuestionError::InvalidAnswer(s.to_owned())),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    chapter: ChapterKey,
    prompt: String,
    options: [String; 4],
    correct: AnswerChoice,
}

impl Question {
    /// Creates a new Question. Prompt and options are trimmed.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` or `QuestionError::EmptyOption` when
    /// text is blank.
    pub fn new(
        id: QuestionId,
        chapter: ChapterKey,
        prompt: impl Into<String>,
        options: [String; 4],
        correct: AnswerChoice,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into().trim().to_owned();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        let options = options.map(|o| o.trim().to_owned());
        for choice in AnswerChoice::ALL {
            if options[choice.index()].is_empty() {
                return Err(QuestionError::EmptyOption(choice));
            }
        }

        Ok(Self {
            id,
            chapter,
            prompt,
            options,
            correct,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn chapter(&self) -> ChapterKey {
        self.chapter
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String; 4] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, choice: AnswerChoice) -> &str {
        &self.options[choice.index()]
    }

    #[must_use]
    pub fn correct(&self) -> AnswerChoice {
        self.correct
    }

    #[must_use]
    pub fn is_correct(&self, choice: AnswerChoice) -> bool {
        self.correct == choice
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
