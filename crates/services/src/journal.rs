//! Learner's journal: totals, per-realm accuracy and study advice.

use std::sync::Arc;

use adventure_core::model::{Realm, ScoreEntry};
use adventure_core::progress::accuracy;
use adventure_core::weakness::{self, WeaknessDetector, WeaknessError};
use storage::repository::ScoreLogRepository;

use crate::adventure::{AdventureState, narration};
use crate::error::AdventureError;

/// Score entries shown in the journal's history.
pub const HISTORY_LIMIT: u32 = 10;

/// Realms listed after the primary focus.
pub const SECONDARY_LIMIT: usize = 2;

/// Realm accuracy (percent) above which a realm counts as a strength.
pub const STRONG_ABOVE: f64 = 85.0;

/// Realm accuracy (percent) below which a realm needs work.
pub const WEAK_BELOW: f64 = 70.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RealmSummary {
    pub realm: Realm,
    pub answered: u32,
    pub correct: u32,
    pub mastered: bool,
}

impl RealmSummary {
    /// `None` until the realm has answers.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        (self.answered > 0).then(|| accuracy(self.correct, self.answered))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    NeedMoreAnswers { have: usize, need: usize },
    Focus {
        realm: Realm,
        confidence: f64,
        advice: String,
        /// Next most likely weak realms with their probabilities.
        secondary: Vec<(Realm, f64)>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insight {
    /// Chapters passed so far.
    Experience(usize),
    StrongIn(Vec<Realm>),
    NeedsWork(Vec<Realm>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Journal {
    pub player_name: String,
    pub total_answered: u32,
    pub total_correct: u32,
    pub total_xp: u32,
    pub adventure_points: u32,
    pub level: u32,
    pub best_streak: u32,
    pub chapters_passed: usize,
    pub realms: Vec<RealmSummary>,
    /// How evenly the explored realms score, `0.0..=1.0`.
    pub consistency: Option<f64>,
    pub insights: Vec<Insight>,
    /// Latest entries, newest first.
    pub recent: Vec<ScoreEntry>,
    pub recommendation: Recommendation,
}

impl Journal {
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        accuracy(self.total_correct, self.total_answered)
    }
}

/// Builds the journal view from the session state and the score log.
#[derive(Clone)]
pub struct JournalService {
    scores: Arc<dyn ScoreLogRepository>,
    detector: Arc<dyn WeaknessDetector>,
}

impl JournalService {
    #[must_use]
    pub fn new(scores: Arc<dyn ScoreLogRepository>, detector: Arc<dyn WeaknessDetector>) -> Self {
        Self { scores, detector }
    }

    #[must_use]
    pub fn detector_name(&self) -> &'static str {
        self.detector.name()
    }

    /// # Errors
    ///
    /// Returns `AdventureError::NotStarted` before `begin`, or a storage error.
    pub async fn journal(&self, state: &AdventureState) -> Result<Journal, AdventureError> {
        let player = state.require_player()?;
        let mut recent = self.scores.list_scores(&player.id, Some(HISTORY_LIMIT)).await?;
        recent.reverse();

        let mut realms: Vec<RealmSummary> = Realm::ALL
            .iter()
            .map(|&realm| RealmSummary {
                realm,
                answered: 0,
                correct: 0,
                mastered: state.is_mastered(realm),
            })
            .collect();
        for answer in state.answers() {
            let summary = &mut realms[answer.chapter.realm.index()];
            summary.answered += 1;
            if answer.is_correct() {
                summary.correct += 1;
            }
        }

        let total_answered = realms.iter().map(|r| r.answered).sum();
        let total_correct = realms.iter().map(|r| r.correct).sum();
        let xp = state.xp();
        let chapters_passed = state.progress().passed_count();
        let insights = if total_answered > 0 {
            insights(&realms, chapters_passed)
        } else {
            Vec::new()
        };

        Ok(Journal {
            player_name: player.name.clone(),
            total_answered,
            total_correct,
            total_xp: xp.total_xp(),
            adventure_points: xp.adventure_points(),
            level: xp.level(),
            best_streak: state.streak().best(),
            chapters_passed,
            consistency: consistency(&realms),
            insights,
            realms,
            recommendation: self.recommend(&player.name, state, &recent),
            recent,
        })
    }

    /// Latest attempts of every learner, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn hall_of_records(&self, limit: u32) -> Result<Vec<ScoreEntry>, AdventureError> {
        let mut entries = self.scores.list_all_scores(Some(limit)).await?;
        entries.reverse();
        Ok(entries)
    }

    fn recommend(&self, name: &str, state: &AdventureState, recent: &[ScoreEntry]) -> Recommendation {
        let minutes = mean_minutes(recent);
        match weakness::recommend(self.detector.as_ref(), state.answers(), minutes) {
            Ok(prediction) => Recommendation::Focus {
                realm: prediction.realm,
                confidence: prediction.confidence,
                advice: narration::weakness_advice(name, prediction.realm, prediction.confidence),
                secondary: prediction
                    .ranked()
                    .into_iter()
                    .filter(|(realm, _)| *realm != prediction.realm)
                    .take(SECONDARY_LIMIT)
                    .collect(),
            },
            Err(WeaknessError::NotEnoughAnswers { have, need }) => {
                Recommendation::NeedMoreAnswers { have, need }
            }
            Err(e) => {
                log::warn!("no weakness recommendation: {e}");
                Recommendation::NeedMoreAnswers {
                    have: state.answers().len(),
                    need: weakness::MIN_ANSWERS,
                }
            }
        }
    }
}

/// One minus the spread of realm accuracies, with a spread of 50 points or
/// more scoring zero. `None` until some realm has answers.
fn consistency(realms: &[RealmSummary]) -> Option<f64> {
    let scores: Vec<f64> = realms.iter().filter_map(RealmSummary::accuracy).collect();
    if scores.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    Some((1.0 - variance.sqrt() / 50.0).clamp(0.0, 1.0))
}

fn insights(realms: &[RealmSummary], chapters_passed: usize) -> Vec<Insight> {
    let realms_where = |keep: fn(f64) -> bool| -> Vec<Realm> {
        realms
            .iter()
            .filter(|r| r.accuracy().is_some_and(keep))
            .map(|r| r.realm)
            .collect()
    };
    let mut out = vec![Insight::Experience(chapters_passed)];
    let strong = realms_where(|a| a > STRONG_ABOVE);
    if !strong.is_empty() {
        out.push(Insight::StrongIn(strong));
    }
    let weak = realms_where(|a| a < WEAK_BELOW);
    if !weak.is_empty() {
        out.push(Insight::NeedsWork(weak));
    }
    out
}

/// Average minutes per attempt, or `None` without history.
fn mean_minutes(entries: &[ScoreEntry]) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    let secs: f64 = entries.iter().map(|e| f64::from(e.time_spent_secs())).sum();
    #[allow(clippy::cast_precision_loss)]
    let count = entries.len() as f64;
    Some(secs / count / 60.0)
}
