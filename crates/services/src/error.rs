//! Shared error types for the services crate.

use thiserror::Error;

use adventure_core::model::{ChapterKey, ParseIdError, ScoreError};
use adventure_core::weakness::ModelError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use storage::QuestionBankError;

/// Errors emitted by `AdventureService` and `JournalService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdventureError {
    #[error("please tell us your name to begin")]
    EmptyName,
    #[error("the adventure has not begun yet")]
    NotStarted,
    #[error("chapter {0} has no questions")]
    EmptyChapter(ChapterKey),
    #[error("a chapter is already in progress")]
    RunInProgress,
    #[error("no chapter is in progress")]
    NoActiveRun,
    #[error("the current question was already answered")]
    AlreadyAnswered,
    #[error("answer the current question first")]
    NotAnswered,
    #[error("no finished chapter to retry")]
    NothingToRetry,
    #[error(transparent)]
    InvalidName(#[from] ParseIdError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    QuestionBank(#[from] QuestionBankError),
    #[error(transparent)]
    Model(#[from] ModelError),
}
