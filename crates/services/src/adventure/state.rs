use std::collections::BTreeSet;

use adventure_core::model::{AnswerRecord, ChapterKey, Realm, StudentId};
use adventure_core::progress::Progress;
use adventure_core::reward::{Streak, XpLedger};

use super::run::{ChapterOutcome, ChapterRun};

/// Which screen the learner is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Introduction,
    RealmMap,
    ChapterSelect(Realm),
    Question(ChapterKey),
    ChapterResults(ChapterKey),
    Journal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub id: StudentId,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Everything one learner's session knows.
///
/// Owned by the caller and changed only through `AdventureService`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdventureState {
    pub(crate) player: Option<Player>,
    pub(crate) screen: Screen,
    pub(crate) progress: Progress,
    pub(crate) xp: XpLedger,
    pub(crate) streak: Streak,
    pub(crate) answers: Vec<AnswerRecord>,
    pub(crate) run: Option<ChapterRun>,
    pub(crate) last_outcome: Option<ChapterOutcome>,
    pub(crate) rewarded_chapters: BTreeSet<ChapterKey>,
    pub(crate) mastered_realms: BTreeSet<Realm>,
}

impl AdventureState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    #[must_use]
    pub fn xp(&self) -> XpLedger {
        self.xp
    }

    #[must_use]
    pub fn streak(&self) -> Streak {
        self.streak
    }

    /// Answers of this learner, oldest first, including earlier sessions.
    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn run(&self) -> Option<&ChapterRun> {
        self.run.as_ref()
    }

    /// Result of the most recently finished chapter attempt.
    #[must_use]
    pub fn last_outcome(&self) -> Option<&ChapterOutcome> {
        self.last_outcome.as_ref()
    }

    #[must_use]
    pub fn is_mastered(&self, realm: Realm) -> bool {
        self.mastered_realms.contains(&realm)
    }

    #[must_use]
    pub fn mastered_realms(&self) -> &BTreeSet<Realm> {
        &self.mastered_realms
    }

    pub(crate) fn require_player(&self) -> Result<&Player, crate::AdventureError> {
        self.player.as_ref().ok_or(crate::AdventureError::NotStarted)
    }
}
