use adventure_core::model::{
    AnswerChoice, AnswerRecord, ChapterKey, Difficulty, QuestionId, Realm, ScoreEntry, StudentId,
};
use sqlx::Row;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

/// `LIMIT` value for an optional row limit; `-1` means unbounded in `SQLite`.
pub(crate) fn limit_i64(limit: Option<u32>) -> i64 {
    limit.map_or(-1, i64::from)
}

fn chapter_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ChapterKey, StorageError> {
    let realm: Realm = row.try_get::<String, _>("realm").map_err(ser)?.parse().map_err(ser)?;
    let difficulty: Difficulty = row
        .try_get::<String, _>("difficulty")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    Ok(ChapterKey::new(realm, difficulty))
}

fn choice_from_row(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<AnswerChoice, StorageError> {
    row.try_get::<String, _>(column).map_err(ser)?.parse().map_err(ser)
}

pub(crate) fn map_score_row(row: &sqlx::sqlite::SqliteRow) -> Result<ScoreEntry, StorageError> {
    let student_id: StudentId = row
        .try_get::<String, _>("student_id")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;

    ScoreEntry::new(
        student_id,
        row.try_get::<String, _>("student_name").map_err(ser)?,
        chapter_from_row(row)?,
        u32_from_i64("correct_answers", row.try_get("correct_answers").map_err(ser)?)?,
        u32_from_i64("total_questions", row.try_get("total_questions").map_err(ser)?)?,
        u32_from_i64("xp_earned", row.try_get("xp_earned").map_err(ser)?)?,
        row.try_get::<bool, _>("passed").map_err(ser)?,
        u32_from_i64("streak", row.try_get("streak").map_err(ser)?)?,
        u32_from_i64("time_spent_secs", row.try_get("time_spent_secs").map_err(ser)?)?,
        row.try_get("recorded_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_answer_row(row: &sqlx::sqlite::SqliteRow) -> Result<AnswerRecord, StorageError> {
    let question_id: i64 = row.try_get("question_id").map_err(ser)?;
    let question_id = u64::try_from(question_id)
        .map_err(|_| StorageError::Serialization("question_id sign overflow".into()))?;

    Ok(AnswerRecord {
        question_id: QuestionId::new(question_id),
        chapter: chapter_from_row(row)?,
        selected: choice_from_row(row, "selected")?,
        correct: choice_from_row(row, "correct")?,
        answered_at: row.try_get("answered_at").map_err(ser)?,
    })
}
