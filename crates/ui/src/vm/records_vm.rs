use adventure_core::model::ScoreEntry;

use crate::vm::time_fmt::{format_datetime, format_duration};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordRowVm {
    pub name: String,
    pub chapter_label: String,
    pub score_label: String,
    pub xp_label: String,
    pub time_label: String,
    pub passed: bool,
    pub recorded_at_str: String,
}

#[must_use]
pub fn map_records(entries: &[ScoreEntry]) -> Vec<RecordRowVm> {
    entries
        .iter()
        .map(|entry| RecordRowVm {
            name: entry.student_name().to_string(),
            chapter_label: entry.chapter().title().to_string(),
            score_label: format!("{:.1}%", entry.accuracy()),
            xp_label: format!("+{} XP", entry.xp_earned()),
            time_label: format_duration(entry.time_spent_secs()),
            passed: entry.passed(),
            recorded_at_str: format_datetime(entry.recorded_at()),
        })
        .collect()
}
