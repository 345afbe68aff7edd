//! Weakest-realm detection from a learner's answer history.

mod centroid;
mod synthetic;

pub use centroid::{CentroidDetector, TrainingConfig, TrainingReport};
pub use synthetic::{LearnerProfile, generate_profiles};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AnswerRecord, Realm};

/// Answers needed before a recommendation is made.
pub const MIN_ANSWERS: usize = 5;

/// Score assumed for a realm with no answers yet.
pub const NEUTRAL_SCORE: f64 = 70.0;

/// Study time assumed when nothing better is known.
pub const DEFAULT_MINUTES: f64 = 15.0;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WeaknessError {
    #[error("need at least {need} answers for a recommendation, have {have}")]
    NotEnoughAnswers { have: usize, need: usize },
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    #[error("model file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("model file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid model: {0}")]
    Invalid(String),
}

//
// ─── FEATURES ──────────────────────────────────────────────────────────────────
//

/// Per-realm scores (in `Realm::ALL` order) plus study time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub topic_scores: [f64; 5],
    pub minutes_spent: f64,
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            topic_scores: [NEUTRAL_SCORE; 5],
            minutes_spent: DEFAULT_MINUTES,
        }
    }
}

impl FeatureVector {
    /// Mean correctness per realm, scaled to 0..=100.
    #[must_use]
    pub fn from_answers(answers: &[AnswerRecord]) -> Self {
        let mut correct = [0u32; 5];
        let mut total = [0u32; 5];
        for answer in answers {
            let i = answer.chapter.realm.index();
            total[i] += 1;
            if answer.is_correct() {
                correct[i] += 1;
            }
        }

        let mut features = Self::default();
        for (i, score) in features.topic_scores.iter_mut().enumerate() {
            if total[i] > 0 {
                *score = crate::progress::accuracy(correct[i], total[i]);
            }
        }
        features
    }

    #[must_use]
    pub fn with_minutes(mut self, minutes: f64) -> Self {
        self.minutes_spent = minutes;
        self
    }

    #[must_use]
    pub fn score(&self, realm: Realm) -> f64 {
        self.topic_scores[realm.index()]
    }

    pub(crate) fn as_array(&self) -> [f64; 6] {
        let s = &self.topic_scores;
        [s[0], s[1], s[2], s[3], s[4], self.minutes_spent]
    }
}

//
// ─── PREDICTION ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaknessPrediction {
    pub realm: Realm,
    /// Probability of `realm`, in `0.0..=1.0`.
    pub confidence: f64,
    /// Class probabilities in `Realm::ALL` order; they sum to 1.
    pub probabilities: [f64; 5],
}

impl WeaknessPrediction {
    pub(crate) fn from_probabilities(probabilities: [f64; 5]) -> Self {
        let mut best = 0;
        for i in 1..probabilities.len() {
            if probabilities[i] > probabilities[best] {
                best = i;
            }
        }
        Self {
            realm: Realm::ALL[best],
            confidence: probabilities[best],
            probabilities,
        }
    }

    /// Realms from most to least likely weak.
    #[must_use]
    pub fn ranked(&self) -> Vec<(Realm, f64)> {
        let mut ranked: Vec<(Realm, f64)> = Realm::ALL
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Numerically stable softmax.
pub(crate) fn softmax(logits: [f64; 5]) -> [f64; 5] {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut out = logits.map(|l| (l - max).exp());
    let sum: f64 = out.iter().sum();
    for p in &mut out {
        *p /= sum;
    }
    out
}

//
// ─── DETECTORS ─────────────────────────────────────────────────────────────────
//

pub trait WeaknessDetector: Send + Sync {
    fn name(&self) -> &'static str;

    fn predict(&self, features: &FeatureVector) -> WeaknessPrediction;
}

/// Rule-based detector: the realm with the lowest score is the weak one.
#[derive(Debug, Clone, Copy)]
pub struct LowestScoreDetector {
    /// Softmax temperature applied to each realm's gap below the mean.
    pub temperature: f64,
}

impl Default for LowestScoreDetector {
    fn default() -> Self {
        Self { temperature: 10.0 }
    }
}

impl WeaknessDetector for LowestScoreDetector {
    fn name(&self) -> &'static str {
        "lowest-score"
    }

    fn predict(&self, features: &FeatureVector) -> WeaknessPrediction {
        let scores = features.topic_scores;
        let mean = scores.iter().sum::<f64>() / 5.0;
        let logits = scores.map(|s| (mean - s) / self.temperature);
        WeaknessPrediction::from_probabilities(softmax(logits))
    }
}

/// Runs `detector` over `answers` once there are enough of them.
///
/// # Errors
///
/// Returns `WeaknessError::NotEnoughAnswers` below [`MIN_ANSWERS`].
pub fn recommend(
    detector: &dyn WeaknessDetector,
    answers: &[AnswerRecord],
    minutes_spent: Option<f64>,
) -> Result<WeaknessPrediction, WeaknessError> {
    if answers.len() < MIN_ANSWERS {
        return Err(WeaknessError::NotEnoughAnswers {
            have: answers.len(),
            need: MIN_ANSWERS,
        });
    }
    let mut features = FeatureVector::from_answers(answers);
    if let Some(minutes) = minutes_spent {
        features = features.with_minutes(minutes);
    }
    let prediction = detector.predict(&features);
    log::debug!(
        "{} detector picked {} ({:.2})",
        detector.name(),
        prediction.realm,
        prediction.confidence
    );
    Ok(prediction)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerChoice, ChapterKey, Difficulty, Question, QuestionId};
    use crate::time::fixed_now;

    fn answer(realm: Realm, correct: bool) -> AnswerRecord {
        let question = Question::new(
            QuestionId::new(1),
            ChapterKey::new(realm, Difficulty::Easy),
            "Pick one",
            ["a", "b", "c", "d"].map(String::from),
            AnswerChoice::C,
        )
        .unwrap();
        let selected = if correct { AnswerChoice::C } else { AnswerChoice::D };
        AnswerRecord::new(&question, selected, fixed_now())
    }

    #[test]
    fn features_default_missing_realms_to_neutral() {
        let answers = vec![
            answer(Realm::Grammar, true),
            answer(Realm::Grammar, false),
            answer(Realm::Antonyms, true),
        ];
        let features = FeatureVector::from_answers(&answers);
        assert!((features.score(Realm::Grammar) - 50.0).abs() < 1e-9);
        assert!((features.score(Realm::Antonyms) - 100.0).abs() < 1e-9);
        assert!((features.score(Realm::Articles) - NEUTRAL_SCORE).abs() < 1e-9);
        assert!((features.minutes_spent - DEFAULT_MINUTES).abs() < 1e-9);
    }

    #[test]
    fn softmax_sums_to_one() {
        let p = softmax([1.0, 2.0, 3.0, -400.0, 1000.0]);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(p.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn lowest_score_detector_picks_lowest_realm() {
        let features = FeatureVector {
            topic_scores: [80.0, 85.0, 30.0, 75.0, 90.0],
            minutes_spent: 15.0,
        };
        let prediction = LowestScoreDetector::default().predict(&features);
        assert_eq!(prediction.realm, Realm::Synonyms);
        assert!(prediction.confidence > 0.9);
        assert_eq!(prediction.ranked()[0].0, Realm::Synonyms);
    }

    #[test]
    fn flat_profile_has_low_confidence() {
        let prediction = LowestScoreDetector::default().predict(&FeatureVector::default());
        assert!((prediction.confidence - 0.2).abs() < 1e-9);
    }

    #[test]
    fn recommendation_needs_five_answers() {
        let answers: Vec<_> = (0..4).map(|_| answer(Realm::Articles, false)).collect();
        let err = recommend(&LowestScoreDetector::default(), &answers, None).unwrap_err();
        assert_eq!(err, WeaknessError::NotEnoughAnswers { have: 4, need: 5 });

        let mut answers = answers;
        answers.push(answer(Realm::Grammar, true));
        let prediction = recommend(&LowestScoreDetector::default(), &answers, Some(20.0)).unwrap();
        assert_eq!(prediction.realm, Realm::Articles);
    }
}
