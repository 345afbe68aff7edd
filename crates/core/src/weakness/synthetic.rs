use rand::Rng;

use crate::model::Realm;
use crate::weakness::FeatureVector;

/// One generated learner with a known weak realm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearnerProfile {
    pub features: FeatureVector,
    pub weak_realm: Realm,
}

/// Generates `count` synthetic learners.
///
/// Each learner has one uniformly chosen weak realm scoring around 40, the
/// others around 70. Learners weak in grammar also spend longer studying.
pub fn generate_profiles<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<LearnerProfile> {
    (0..count).map(|_| generate_one(rng)).collect()
}

fn generate_one<R: Rng + ?Sized>(rng: &mut R) -> LearnerProfile {
    let weak_realm = Realm::ALL[rng.random_range(0..Realm::ALL.len())];

    let mut topic_scores = [0.0; 5];
    for (i, score) in topic_scores.iter_mut().enumerate() {
        *score = if i == weak_realm.index() {
            normal(rng, 40.0, 8.0).clamp(20.0, 65.0)
        } else {
            normal(rng, 70.0, 12.0).clamp(30.0, 95.0)
        };
    }

    let mut minutes = normal(rng, 15.0, 4.0);
    if weak_realm == Realm::Grammar {
        minutes += normal(rng, 5.0, 2.0);
    }

    LearnerProfile {
        features: FeatureVector {
            topic_scores,
            minutes_spent: minutes.max(5.0),
        },
        weak_realm,
    }
}

/// Box-Muller sample from `N(mean, std_dev)`.
fn normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    // (0, 1] keeps ln away from zero
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    mean + std_dev * z
}
