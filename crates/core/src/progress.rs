//! Pass/fail chapter bookkeeping.

use std::collections::BTreeMap;

use crate::model::{ChapterKey, Realm};

/// Percentage of correct answers; `0.0` when nothing was answered.
#[must_use]
pub fn accuracy(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(correct) / f64::from(total) * 100.0
}

//
// ─── POLICY ────────────────────────────────────────────────────────────────────
//

/// Rules that decide whether a chapter attempt counts as passed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassPolicy {
    threshold_percent: f64,
    questions_per_chapter: u32,
}

impl Default for PassPolicy {
    fn default() -> Self {
        Self {
            threshold_percent: 89.0,
            questions_per_chapter: 10,
        }
    }
}

impl PassPolicy {
    #[must_use]
    pub fn new(threshold_percent: f64, questions_per_chapter: u32) -> Self {
        Self {
            threshold_percent,
            questions_per_chapter,
        }
    }

    #[must_use]
    pub fn threshold_percent(&self) -> f64 {
        self.threshold_percent
    }

    #[must_use]
    pub fn questions_per_chapter(&self) -> u32 {
        self.questions_per_chapter
    }

    /// Questions an attempt must answer; smaller chapters need their full set.
    #[must_use]
    pub fn required_questions(&self, available: usize) -> u32 {
        let available = u32::try_from(available).unwrap_or(u32::MAX);
        self.questions_per_chapter.min(available)
    }

    /// Threshold is inclusive: exactly 89% passes.
    #[must_use]
    pub fn is_passing(&self, correct: u32, total: u32, available: usize) -> bool {
        let required = self.required_questions(available);
        required > 0 && total >= required && accuracy(correct, total) >= self.threshold_percent
    }
}

//
// ─── CHAPTER STATS ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChapterStats {
    /// Correct answers in the latest attempt.
    pub correct: u32,
    /// Questions answered in the latest attempt.
    pub total: u32,
    pub attempts: u32,
    /// Sticky: once passed, a chapter stays passed.
    pub passed: bool,
    pub best_accuracy: f64,
}

impl ChapterStats {
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        accuracy(self.correct, self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterStatus {
    /// The bank has no questions for this chapter.
    Unavailable,
    NotStarted,
    NeedsPractice,
    Passed,
}

/// What recording an attempt changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptRecorded {
    pub passed: bool,
    pub first_pass: bool,
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Per-chapter statistics for one learner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    chapters: BTreeMap<ChapterKey, ChapterStats>,
}

impl Progress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stats(&self, chapter: ChapterKey) -> ChapterStats {
        self.chapters.get(&chapter).copied().unwrap_or_default()
    }

    /// Record one completed attempt.
    pub fn record_attempt(&mut self, chapter: ChapterKey, correct: u32, total: u32, passed: bool) -> AttemptRecorded {
        let stats = self.chapters.entry(chapter).or_default();
        let first_pass = passed && !stats.passed;

        stats.correct = correct;
        stats.total = total;
        stats.attempts = stats.attempts.saturating_add(1);
        stats.passed |= passed;
        stats.best_accuracy = stats.best_accuracy.max(accuracy(correct, total));

        AttemptRecorded { passed, first_pass }
    }

    #[must_use]
    pub fn status(&self, chapter: ChapterKey, available: usize) -> ChapterStatus {
        if available == 0 {
            return ChapterStatus::Unavailable;
        }
        match self.chapters.get(&chapter) {
            None => ChapterStatus::NotStarted,
            Some(stats) if stats.passed => ChapterStatus::Passed,
            Some(stats) if stats.attempts == 0 => ChapterStatus::NotStarted,
            Some(_) => ChapterStatus::NeedsPractice,
        }
    }

    /// A realm is mastered once every chapter that has questions is passed.
    ///
    /// `available` lists the chapters of `realm` that the bank can serve.
    #[must_use]
    pub fn is_realm_mastered(&self, realm: Realm, available: &[ChapterKey]) -> bool {
        let mut chapters = available.iter().filter(|c| c.realm == realm).peekable();
        if chapters.peek().is_none() {
            return false;
        }
        chapters.all(|c| self.stats(*c).passed)
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.chapters.values().filter(|s| s.passed).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChapterKey, &ChapterStats)> {
        self.chapters.iter()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    fn key(difficulty: Difficulty) -> ChapterKey {
        ChapterKey::new(Realm::Grammar, difficulty)
    }

    #[test]
    fn accuracy_handles_zero_total() {
        assert!(accuracy(0, 0).abs() < f64::EPSILON);
        assert!((accuracy(9, 10) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn threshold_is_inclusive() {
        let policy = PassPolicy::new(89.0, 100);
        assert!(policy.is_passing(89, 100, 120));
        assert!(!policy.is_passing(88, 100, 120));
    }

    #[test]
    fn default_policy_needs_ten_questions_at_89_percent() {
        let policy = PassPolicy::default();
        assert!(policy.is_passing(9, 10, 30));
        assert!(!policy.is_passing(8, 10, 30));
        assert!(!policy.is_passing(9, 9, 30), "too few questions answered");
    }

    #[test]
    fn small_chapters_require_their_full_set() {
        let policy = PassPolicy::default();
        assert_eq!(policy.required_questions(4), 4);
        assert!(policy.is_passing(4, 4, 4));
        assert!(!policy.is_passing(3, 4, 4));
        assert!(!policy.is_passing(0, 0, 0));
    }

    #[test]
    fn pass_is_sticky_and_first_pass_reported_once() {
        let mut progress = Progress::new();
        let chapter = key(Difficulty::Easy);

        let r = progress.record_attempt(chapter, 5, 10, false);
        assert!(!r.passed && !r.first_pass);
        assert_eq!(progress.status(chapter, 12), ChapterStatus::NeedsPractice);

        let r = progress.record_attempt(chapter, 10, 10, true);
        assert!(r.first_pass);
        let r = progress.record_attempt(chapter, 9, 10, true);
        assert!(r.passed && !r.first_pass);

        progress.record_attempt(chapter, 2, 10, false);
        let stats = progress.stats(chapter);
        assert!(stats.passed);
        assert_eq!(stats.attempts, 4);
        assert!((stats.best_accuracy - 100.0).abs() < f64::EPSILON);
        assert!((stats.accuracy() - 20.0).abs() < f64::EPSILON);
        assert_eq!(progress.status(chapter, 12), ChapterStatus::Passed);
    }

    #[test]
    fn status_reports_unavailable_and_not_started() {
        let progress = Progress::new();
        assert_eq!(progress.status(key(Difficulty::Hard), 0), ChapterStatus::Unavailable);
        assert_eq!(progress.status(key(Difficulty::Hard), 3), ChapterStatus::NotStarted);
    }

    #[test]
    fn realm_mastery_needs_every_available_chapter() {
        let mut progress = Progress::new();
        let available = [key(Difficulty::Easy), key(Difficulty::Medium)];
        assert!(!progress.is_realm_mastered(Realm::Grammar, &available));

        progress.record_attempt(key(Difficulty::Easy), 10, 10, true);
        assert!(!progress.is_realm_mastered(Realm::Grammar, &available));

        progress.record_attempt(key(Difficulty::Medium), 9, 10, true);
        assert!(progress.is_realm_mastered(Realm::Grammar, &available));
        assert_eq!(progress.passed_count(), 2);
    }

    #[test]
    fn realm_without_chapters_is_never_mastered() {
        let progress = Progress::new();
        assert!(!progress.is_realm_mastered(Realm::Sentences, &[]));
    }
}
