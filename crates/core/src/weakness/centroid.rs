use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::model::Realm;
use crate::weakness::synthetic::{LearnerProfile, generate_profiles};
use crate::weakness::{FeatureVector, ModelError, WeaknessDetector, WeaknessPrediction, softmax};

const MODEL_FORMAT_VERSION: u32 = 1;

/// Synthetic training parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub samples: usize,
    pub seed: u64,
    /// Share of samples used for fitting; the rest is held out.
    pub train_fraction: f64,
    pub temperature: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            samples: 2_000,
            seed: 42,
            train_fraction: 0.8,
            temperature: 200.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub train_samples: usize,
    pub test_samples: usize,
    /// Hold-out accuracy in `0.0..=1.0`.
    pub test_accuracy: f64,
}

/// Nearest-centroid classifier over `[scores..., minutes]`.
///
/// Probabilities are a softmax over negative squared distances scaled by
/// `temperature`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentroidDetector {
    version: u32,
    centroids: [[f64; 6]; 5],
    temperature: f64,
    report: TrainingReport,
}

impl CentroidDetector {
    /// Train on freshly generated synthetic learners.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Invalid` if the split leaves a realm without
    /// training samples or the configuration is out of range.
    pub fn train(config: TrainingConfig) -> Result<Self, ModelError> {
        if !(config.train_fraction > 0.0 && config.train_fraction < 1.0) {
            return Err(ModelError::Invalid(format!(
                "train fraction must be in (0, 1), got {}",
                config.train_fraction
            )));
        }
        if config.temperature <= 0.0 {
            return Err(ModelError::Invalid("temperature must be positive".into()));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let profiles = generate_profiles(config.samples, &mut rng);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let split = ((config.samples as f64) * config.train_fraction).round() as usize;
        let (train, test) = profiles.split_at(split.min(profiles.len()));

        let centroids = fit_centroids(train)?;
        let mut detector = Self {
            version: MODEL_FORMAT_VERSION,
            centroids,
            temperature: config.temperature,
            report: TrainingReport {
                train_samples: train.len(),
                test_samples: test.len(),
                test_accuracy: 0.0,
            },
        };
        detector.report.test_accuracy = detector.accuracy_on(test);

        log::info!(
            "trained centroid detector on {} samples, hold-out accuracy {:.3}",
            train.len(),
            detector.report.test_accuracy
        );
        Ok(detector)
    }

    #[must_use]
    pub fn report(&self) -> TrainingReport {
        self.report
    }

    #[must_use]
    pub fn centroid(&self, realm: Realm) -> [f64; 6] {
        self.centroids[realm.index()]
    }

    /// Share of `profiles` whose weak realm is predicted correctly.
    #[must_use]
    pub fn accuracy_on(&self, profiles: &[LearnerProfile]) -> f64 {
        if profiles.is_empty() {
            return 0.0;
        }
        let hits = profiles
            .iter()
            .filter(|p| self.predict(&p.features).realm == p.weak_realm)
            .count();
        #[allow(clippy::cast_precision_loss)]
        let accuracy = hits as f64 / profiles.len() as f64;
        accuracy
    }

    /// # Errors
    ///
    /// Returns `ModelError::Io` or `ModelError::Json` on write failure.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ModelError::Io` if the file is unreadable, `ModelError::Json`
    /// if it is malformed, and `ModelError::Invalid` for an unknown format
    /// version or non-finite centroids.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let reader = BufReader::new(File::open(path)?);
        let detector: Self = serde_json::from_reader(reader)?;
        detector.validate()?;
        Ok(detector)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.version != MODEL_FORMAT_VERSION {
            return Err(ModelError::Invalid(format!(
                "unsupported model version {}",
                self.version
            )));
        }
        if self.temperature <= 0.0 || !self.temperature.is_finite() {
            return Err(ModelError::Invalid("temperature must be positive".into()));
        }
        if self.centroids.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ModelError::Invalid("centroids must be finite".into()));
        }
        Ok(())
    }
}

impl WeaknessDetector for CentroidDetector {
    fn name(&self) -> &'static str {
        "centroid"
    }

    fn predict(&self, features: &FeatureVector) -> WeaknessPrediction {
        let x = features.as_array();
        let logits = self.centroids.map(|c| {
            let d2: f64 = c.iter().zip(x.iter()).map(|(a, b)| (a - b).powi(2)).sum();
            -d2 / self.temperature
        });
        WeaknessPrediction::from_probabilities(softmax(logits))
    }
}

fn fit_centroids(train: &[LearnerProfile]) -> Result<[[f64; 6]; 5], ModelError> {
    let mut sums = [[0.0; 6]; 5];
    let mut counts = [0usize; 5];
    for profile in train {
        let i = profile.weak_realm.index();
        counts[i] += 1;
        for (sum, value) in sums[i].iter_mut().zip(profile.features.as_array()) {
            *sum += value;
        }
    }

    for realm in Realm::ALL {
        let i = realm.index();
        if counts[i] == 0 {
            return Err(ModelError::Invalid(format!(
                "no training samples for realm {realm}"
            )));
        }
        #[allow(clippy::cast_precision_loss)]
        let n = counts[i] as f64;
        for sum in &mut sums[i] {
            *sum /= n;
        }
    }
    Ok(sums)
}
