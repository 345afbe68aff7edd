use std::path::Path;
use std::sync::Arc;

use adventure_core::weakness::{CentroidDetector, ModelError, TrainingConfig, WeaknessDetector};
use storage::QuestionBank;
use storage::repository::Storage;

use crate::Clock;
use crate::adventure::AdventureService;
use crate::error::AppServicesError;
use crate::journal::JournalService;

/// Assembles app-facing services over one storage backend and question bank.
#[derive(Clone)]
pub struct AppServices {
    adventure: Arc<AdventureService>,
    journal: Arc<JournalService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and a CSV question bank.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage, the question bank or the
    /// weakness model cannot be initialised.
    pub async fn new_sqlite(
        db_url: &str,
        questions_path: &Path,
        model_path: Option<&Path>,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let bank = QuestionBank::from_path(questions_path)?;
        let storage = Storage::sqlite(db_url).await?;
        let detector = load_detector(model_path)?;
        Ok(Self::from_parts(storage, bank, detector, clock))
    }

    /// Wire services from already constructed parts.
    #[must_use]
    pub fn from_parts(
        storage: Storage,
        bank: QuestionBank,
        detector: Arc<dyn WeaknessDetector>,
        clock: Clock,
    ) -> Self {
        let adventure = Arc::new(AdventureService::new(
            clock,
            Arc::new(bank),
            Arc::clone(&storage.scores),
            Arc::clone(&storage.answers),
        ));
        let journal = Arc::new(JournalService::new(Arc::clone(&storage.scores), detector));
        Self { adventure, journal }
    }

    #[must_use]
    pub fn adventure(&self) -> Arc<AdventureService> {
        Arc::clone(&self.adventure)
    }

    #[must_use]
    pub fn journal(&self) -> Arc<JournalService> {
        Arc::clone(&self.journal)
    }
}

/// Load the centroid detector from `path`, training a fresh one when the file
/// is missing or unreadable.
///
/// # Errors
///
/// Returns `ModelError` only if fallback training fails.
pub fn load_detector(path: Option<&Path>) -> Result<Arc<dyn WeaknessDetector>, ModelError> {
    if let Some(path) = path.filter(|p| p.is_file()) {
        match CentroidDetector::load(path) {
            Ok(detector) => {
                log::info!("loaded weakness model from {}", path.display());
                return Ok(Arc::new(detector));
            }
            Err(e) => log::warn!("ignoring weakness model {}: {e}", path.display()),
        }
    } else {
        log::info!("no weakness model on disk, training one in memory");
    }
    let detector = CentroidDetector::train(TrainingConfig::default())?;
    Ok(Arc::new(detector))
}
