use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Brings the schema up to date.
///
/// Version 1 creates the append-only score and answer logs. Triggers reject
/// any `UPDATE` or `DELETE` on them.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    if is_applied(pool, 1).await? {
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS score_log (
                id INTEGER PRIMARY KEY,
                student_id TEXT NOT NULL,
                student_name TEXT NOT NULL,
                realm TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                correct_answers INTEGER NOT NULL CHECK (correct_answers >= 0),
                total_questions INTEGER NOT NULL CHECK (total_questions >= correct_answers),
                xp_earned INTEGER NOT NULL CHECK (xp_earned >= 0),
                passed INTEGER NOT NULL CHECK (passed IN (0, 1)),
                streak INTEGER NOT NULL CHECK (streak >= 0),
                time_spent_secs INTEGER NOT NULL CHECK (time_spent_secs >= 0),
                recorded_at TEXT NOT NULL
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS answer_log (
                id INTEGER PRIMARY KEY,
                student_id TEXT NOT NULL,
                question_id INTEGER NOT NULL,
                realm TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                selected TEXT NOT NULL CHECK (selected IN ('A', 'B', 'C', 'D')),
                correct TEXT NOT NULL CHECK (correct IN ('A', 'B', 'C', 'D')),
                answered_at TEXT NOT NULL
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE INDEX IF NOT EXISTS idx_score_log_student
                ON score_log (student_id, id);
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE INDEX IF NOT EXISTS idx_answer_log_student
                ON answer_log (student_id, id);
        ",
    )
    .execute(&mut *tx)
    .await?;

    for table in ["score_log", "answer_log"] {
        for action in ["UPDATE", "DELETE"] {
            let trigger = format!(
                r"
                    CREATE TRIGGER IF NOT EXISTS {table}_no_{op}
                    BEFORE {action} ON {table}
                    BEGIN
                        SELECT RAISE(ABORT, '{table} is append-only');
                    END;
                ",
                op = action.to_lowercase(),
            );
            sqlx::query(&trigger).execute(&mut *tx).await?;
        }
    }

    sqlx::query(
        r"
            INSERT INTO schema_migrations (version, applied_at)
            VALUES (?1, ?2)
            ON CONFLICT(version) DO NOTHING
        ",
    )
    .bind(1_i64)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    log::info!("applied schema migration 1");

    Ok(())
}
