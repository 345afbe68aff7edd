use adventure_core::model::{AnswerRecord, ScoreEntry, StudentId};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Append-only log of completed chapter attempts.
///
/// Entries are never updated or removed; listings return them oldest first.
#[async_trait]
pub trait ScoreLogRepository: Send + Sync {
    /// Append a score entry and return its log id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn append_score(&self, entry: &ScoreEntry) -> Result<i64, StorageError>;

    /// The latest `limit` entries for one student (all when `None`).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    async fn list_scores(
        &self,
        student: &StudentId,
        limit: Option<u32>,
    ) -> Result<Vec<ScoreEntry>, StorageError>;

    /// The latest `limit` entries across all students (all when `None`).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    async fn list_all_scores(&self, limit: Option<u32>) -> Result<Vec<ScoreEntry>, StorageError>;
}

/// Append-only log of individual answers, keyed by student.
#[async_trait]
pub trait AnswerLogRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the answer cannot be stored.
    async fn append_answer(
        &self,
        student: &StudentId,
        record: &AnswerRecord,
    ) -> Result<i64, StorageError>;

    /// Every answer of `student`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    async fn list_answers(&self, student: &StudentId) -> Result<Vec<AnswerRecord>, StorageError>;
}

fn latest<T>(items: impl DoubleEndedIterator<Item = T>, limit: Option<u32>) -> Vec<T> {
    let mut out: Vec<T> = match limit {
        Some(n) => items.rev().take(n as usize).collect(),
        None => items.rev().collect(),
    };
    out.reverse();
    out
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    scores: Arc<Mutex<Vec<ScoreEntry>>>,
    answers: Arc<Mutex<Vec<(StudentId, AnswerRecord)>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scores: Arc::new(Mutex::new(Vec::new())),
            answers: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

fn next_id(len: usize) -> Result<i64, StorageError> {
    i64::try_from(len + 1).map_err(|_| StorageError::Serialization("log id overflow".into()))
}

#[async_trait]
impl ScoreLogRepository for InMemoryRepository {
    async fn append_score(&self, entry: &ScoreEntry) -> Result<i64, StorageError> {
        let mut guard = self
            .scores
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = next_id(guard.len())?;
        guard.push(entry.clone());
        Ok(id)
    }

    async fn list_scores(
        &self,
        student: &StudentId,
        limit: Option<u32>,
    ) -> Result<Vec<ScoreEntry>, StorageError> {
        let guard = self
            .scores
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mine: Vec<ScoreEntry> = guard
            .iter()
            .filter(|e| e.student_id() == student)
            .cloned()
            .collect();
        Ok(latest(mine.into_iter(), limit))
    }

    async fn list_all_scores(&self, limit: Option<u32>) -> Result<Vec<ScoreEntry>, StorageError> {
        let guard = self
            .scores
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(latest(guard.iter().cloned(), limit))
    }
}

#[async_trait]
impl AnswerLogRepository for InMemoryRepository {
    async fn append_answer(
        &self,
        student: &StudentId,
        record: &AnswerRecord,
    ) -> Result<i64, StorageError> {
        let mut guard = self
            .answers
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = next_id(guard.len())?;
        guard.push((student.clone(), record.clone()));
        Ok(id)
    }

    async fn list_answers(&self, student: &StudentId) -> Result<Vec<AnswerRecord>, StorageError> {
        let guard = self
            .answers
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|(id, _)| id == student)
            .map(|(_, record)| record.clone())
            .collect())
    }
}

/// Aggregates the score and answer logs behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub scores: Arc<dyn ScoreLogRepository>,
    pub answers: Arc<dyn AnswerLogRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let scores: Arc<dyn ScoreLogRepository> = Arc::new(repo.clone());
        let answers: Arc<dyn AnswerLogRepository> = Arc::new(repo);
        Self { scores, answers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adventure_core::model::{AnswerChoice, ChapterKey, Difficulty, Question, QuestionId, Realm};
    use adventure_core::time::fixed_now;

    fn student(name: &str) -> StudentId {
        StudentId::from_name(name).unwrap()
    }

    fn entry(name: &str, correct: u32) -> ScoreEntry {
        ScoreEntry::new(
            student(name),
            name,
            ChapterKey::new(Realm::Articles, Difficulty::Easy),
            correct,
            10,
            correct * 15,
            correct >= 9,
            0,
            120,
            fixed_now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn score_log_filters_by_student_and_keeps_latest() {
        let repo = InMemoryRepository::new();
        for correct in [3, 5, 7] {
            repo.append_score(&entry("Alex", correct)).await.unwrap();
        }
        let id = repo.append_score(&entry("Sam", 10)).await.unwrap();
        assert_eq!(id, 4);

        let alex = repo.list_scores(&student("Alex"), None).await.unwrap();
        assert_eq!(
            alex.iter().map(ScoreEntry::correct_answers).collect::<Vec<_>>(),
            vec![3, 5, 7]
        );

        let latest_two = repo.list_scores(&student("Alex"), Some(2)).await.unwrap();
        assert_eq!(
            latest_two.iter().map(ScoreEntry::correct_answers).collect::<Vec<_>>(),
            vec![5, 7]
        );

        let all = repo.list_all_scores(Some(1)).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].student_name(), "Sam");
    }

    #[tokio::test]
    async fn answer_log_is_keyed_by_student() {
        let storage = Storage::in_memory();
        let question = Question::new(
            QuestionId::new(3),
            ChapterKey::new(Realm::Grammar, Difficulty::Medium),
            "She ___ to school every day.",
            ["go", "goes", "going", "gone"].map(String::from),
            AnswerChoice::B,
        )
        .unwrap();
        let record = AnswerRecord::new(&question, AnswerChoice::B, fixed_now());

        storage.answers.append_answer(&student("Alex"), &record).await.unwrap();
        storage.answers.append_answer(&student("Sam"), &record).await.unwrap();

        let alex = storage.answers.list_answers(&student("alex")).await.unwrap();
        assert_eq!(alex, vec![record]);
        assert!(storage.answers.list_answers(&student("Kim")).await.unwrap().is_empty());
    }
}
