use thiserror::Error;

use crate::model::{QuestionError, RealmError, ScoreError};
use crate::weakness::{ModelError, WeaknessError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Realm(#[from] RealmError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Weakness(#[from] WeaknessError),
    #[error(transparent)]
    Model(#[from] ModelError),
}
