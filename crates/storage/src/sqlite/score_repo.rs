use adventure_core::model::{ScoreEntry, StudentId};

use super::{
    SqliteRepository,
    mapping::{limit_i64, map_score_row},
};
use crate::repository::{ScoreLogRepository, StorageError};

#[async_trait::async_trait]
impl ScoreLogRepository for SqliteRepository {
    async fn append_score(&self, entry: &ScoreEntry) -> Result<i64, StorageError> {
        let chapter = entry.chapter();
        let res = sqlx::query(
            r"
                INSERT INTO score_log (
                    student_id, student_name, realm, difficulty,
                    correct_answers, total_questions, xp_earned, passed,
                    streak, time_spent_secs, recorded_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ",
        )
        .bind(entry.student_id().as_str())
        .bind(entry.student_name())
        .bind(chapter.realm.key())
        .bind(chapter.difficulty.key())
        .bind(i64::from(entry.correct_answers()))
        .bind(i64::from(entry.total_questions()))
        .bind(i64::from(entry.xp_earned()))
        .bind(entry.passed())
        .bind(i64::from(entry.streak()))
        .bind(i64::from(entry.time_spent_secs()))
        .bind(entry.recorded_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn list_scores(
        &self,
        student: &StudentId,
        limit: Option<u32>,
    ) -> Result<Vec<ScoreEntry>, StorageError> {
        // newest `limit` rows, re-sorted oldest first
        let rows = sqlx::query(
            r"
                SELECT * FROM (
                    SELECT
                        id, student_id, student_name, realm, difficulty,
                        correct_answers, total_questions, xp_earned, passed,
                        streak, time_spent_secs, recorded_at
                    FROM score_log
                    WHERE student_id = ?1
                    ORDER BY id DESC
                    LIMIT ?2
                )
                ORDER BY id ASC
            ",
        )
        .bind(student.as_str())
        .bind(limit_i64(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_score_row).collect()
    }

    async fn list_all_scores(&self, limit: Option<u32>) -> Result<Vec<ScoreEntry>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT * FROM (
                    SELECT
                        id, student_id, student_name, realm, difficulty,
                        correct_answers, total_questions, xp_earned, passed,
                        streak, time_spent_secs, recorded_at
                    FROM score_log
                    ORDER BY id DESC
                    LIMIT ?1
                )
                ORDER BY id ASC
            ",
        )
        .bind(limit_i64(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_score_row).collect()
    }
}
