use chrono::{DateTime, Utc};

use adventure_core::model::{AnswerChoice, ChapterKey, Question};
use adventure_core::progress::accuracy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Prompt,
    Feedback {
        selected: AnswerChoice,
        correct: bool,
    },
}

/// One attempt at a chapter: a shuffled question set and its running tally.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterRun {
    chapter: ChapterKey,
    questions: Vec<Question>,
    /// Questions the bank had for this chapter when the run began.
    available: usize,
    current: usize,
    phase: RunPhase,
    correct: u32,
    answered: u32,
    xp_earned: u32,
    reaction: String,
    intro: String,
    /// Story line leading into each question, parallel to `questions`.
    frames: Vec<String>,
    started_at: DateTime<Utc>,
}

impl ChapterRun {
    pub(crate) fn new(
        chapter: ChapterKey,
        questions: Vec<Question>,
        available: usize,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            chapter,
            questions,
            available,
            current: 0,
            phase: RunPhase::Prompt,
            correct: 0,
            answered: 0,
            xp_earned: 0,
            reaction: String::new(),
            intro: String::new(),
            frames: Vec::new(),
            started_at,
        }
    }

    pub(crate) fn with_story(mut self, intro: String, frames: Vec<String>) -> Self {
        self.intro = intro;
        self.frames = frames;
        self
    }

    #[must_use]
    pub fn chapter(&self) -> ChapterKey {
        self.chapter
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Zero-based position of the current question.
    #[must_use]
    pub fn position(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn available(&self) -> usize {
        self.available
    }

    #[must_use]
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn xp_earned(&self) -> u32 {
        self.xp_earned
    }

    /// Story line for the answer being shown; `None` while prompting.
    #[must_use]
    pub fn reaction(&self) -> Option<&str> {
        match self.phase {
            RunPhase::Prompt => None,
            RunPhase::Feedback { .. } => Some(&self.reaction),
        }
    }

    /// Scene-setting text for the chapter.
    #[must_use]
    pub fn intro(&self) -> &str {
        &self.intro
    }

    /// Mentor's lead-in to the current question.
    #[must_use]
    pub fn frame(&self) -> Option<&str> {
        self.frames.get(self.current).map(String::as_str)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    pub(crate) fn record(&mut self, selected: AnswerChoice, correct: bool, xp: u32, reaction: String) {
        self.answered += 1;
        if correct {
            self.correct += 1;
        }
        self.xp_earned += xp;
        self.reaction = reaction;
        self.phase = RunPhase::Feedback { selected, correct };
    }

    /// Moves to the next question. Returns `false` when the set is exhausted.
    pub(crate) fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        self.phase = RunPhase::Prompt;
        true
    }
}

/// Feedback for one answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub correct_choice: AnswerChoice,
    pub xp_awarded: u32,
    pub streak: u32,
    pub reaction: String,
}

/// Result of a finished (or abandoned) chapter attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterOutcome {
    pub chapter: ChapterKey,
    pub correct: u32,
    pub total: u32,
    pub passed: bool,
    pub first_pass: bool,
    pub realm_mastered: bool,
    /// All XP earned in the attempt, bonuses included.
    pub xp_earned: u32,
    pub time_spent_secs: u32,
    pub completed_at: DateTime<Utc>,
    pub narration: String,
}

impl ChapterOutcome {
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        accuracy(self.correct, self.total)
    }
}

/// What `advance` did.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    NextQuestion,
    Completed(ChapterOutcome),
}
