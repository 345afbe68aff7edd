use std::io::Write;

use adventure_core::model::ScoreEntry;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ScoreRow<'a> {
    student_id: &'a str,
    student_name: &'a str,
    timestamp: String,
    quiz_type: &'static str,
    topic: &'static str,
    difficulty_level: &'static str,
    score: f64,
    total_questions: u32,
    correct_answers: u32,
    time_spent_minutes: f64,
    xp_earned: u32,
    streak: u32,
    passed: bool,
}

impl<'a> ScoreRow<'a> {
    fn from_entry(entry: &'a ScoreEntry) -> Self {
        Self {
            student_id: entry.student_id().as_str(),
            student_name: entry.student_name(),
            timestamp: entry.recorded_at().to_rfc3339(),
            quiz_type: "adventure",
            topic: entry.chapter().realm.key(),
            difficulty_level: entry.chapter().difficulty.key(),
            score: round1(entry.accuracy()),
            total_questions: entry.total_questions(),
            correct_answers: entry.correct_answers(),
            time_spent_minutes: round1(f64::from(entry.time_spent_secs()) / 60.0),
            xp_earned: entry.xp_earned(),
            streak: entry.streak(),
            passed: entry.passed(),
        }
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Write score entries as CSV with a header row. Returns the number of rows.
///
/// # Errors
///
/// Returns `csv::Error` if writing fails.
pub fn export_scores_csv<W: Write>(writer: W, entries: &[ScoreEntry]) -> Result<usize, csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    for entry in entries {
        out.serialize(ScoreRow::from_entry(entry))?;
    }
    if entries.is_empty() {
        out.write_record([
            "student_id",
            "student_name",
            "timestamp",
            "quiz_type",
            "topic",
            "difficulty_level",
            "score",
            "total_questions",
            "correct_answers",
            "time_spent_minutes",
            "xp_earned",
            "streak",
            "passed",
        ])?;
    }
    out.flush()?;
    Ok(entries.len())
}
