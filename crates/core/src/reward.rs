//! Experience points and answer streaks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpRules {
    pub per_correct: u32,
    pub chapter_pass: u32,
    pub realm_mastery: u32,
}

impl Default for XpRules {
    fn default() -> Self {
        Self {
            per_correct: 15,
            chapter_pass: 150,
            realm_mastery: 500,
        }
    }
}

/// Running totals shown in the header and the journal.
///
/// Experience and adventure points move together; they are kept apart so the
/// journal can present them separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpLedger {
    total_xp: u32,
    adventure_points: u32,
}

impl XpLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn award(&mut self, amount: u32) {
        self.total_xp = self.total_xp.saturating_add(amount);
        self.adventure_points = self.adventure_points.saturating_add(amount);
    }

    #[must_use]
    pub fn total_xp(&self) -> u32 {
        self.total_xp
    }

    #[must_use]
    pub fn adventure_points(&self) -> u32 {
        self.adventure_points
    }

    /// Adventurer level: one level per 500 XP, starting at 1.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.total_xp / 500 + 1
    }
}

/// Consecutive correct answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    current: u32,
    best: u32,
}

impl Streak {
    /// Registers an answer and returns the streak after it.
    pub fn record(&mut self, correct: bool) -> u32 {
        if correct {
            self.current = self.current.saturating_add(1);
            self.best = self.best.max(self.current);
        } else {
            self.current = 0;
        }
        self.current
    }

    #[must_use]
    pub fn current(&self) -> u32 {
        self.current
    }

    #[must_use]
    pub fn best(&self) -> u32 {
        self.best
    }
}
