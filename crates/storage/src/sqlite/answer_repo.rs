use adventure_core::model::{AnswerRecord, StudentId};

use super::{
    SqliteRepository,
    mapping::{id_i64, map_answer_row},
};
use crate::repository::{AnswerLogRepository, StorageError};

#[async_trait::async_trait]
impl AnswerLogRepository for SqliteRepository {
    async fn append_answer(
        &self,
        student: &StudentId,
        record: &AnswerRecord,
    ) -> Result<i64, StorageError> {
        let question_id = id_i64("question_id", record.question_id.value())?;

        let res = sqlx::query(
            r"
                INSERT INTO answer_log (
                    student_id, question_id, realm, difficulty,
                    selected, correct, answered_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(student.as_str())
        .bind(question_id)
        .bind(record.chapter.realm.key())
        .bind(record.chapter.difficulty.key())
        .bind(record.selected.letter().to_string())
        .bind(record.correct.letter().to_string())
        .bind(record.answered_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn list_answers(&self, student: &StudentId) -> Result<Vec<AnswerRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, question_id, realm, difficulty, selected, correct, answered_at
                FROM answer_log
                WHERE student_id = ?1
                ORDER BY id ASC
            ",
        )
        .bind(student.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_answer_row(&row)?);
        }
        Ok(out)
    }
}
