use adventure_core::progress::PassPolicy;
use services::ChapterOutcome;

use crate::vm::time_fmt::{format_datetime, format_duration};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub chapter_title: &'static str,
    pub passed: bool,
    pub verdict: &'static str,
    pub accuracy_label: String,
    pub score_label: String,
    pub pass_mark_label: String,
    pub xp_label: String,
    pub time_label: String,
    pub finished_label: String,
    pub narration: String,
    pub badges: Vec<String>,
}

#[must_use]
pub fn map_results(outcome: &ChapterOutcome, policy: PassPolicy) -> ResultsVm {
    let mut badges = Vec::new();
    if outcome.first_pass {
        badges.push("Chapter cleared for the first time".to_string());
    }
    if outcome.realm_mastered {
        badges.push(format!("{} mastered", outcome.chapter.realm.display_name()));
    }

    ResultsVm {
        chapter_title: outcome.chapter.title(),
        passed: outcome.passed,
        verdict: if outcome.passed { "Chapter passed!" } else { "Not passed yet" },
        accuracy_label: format!("{:.1}%", outcome.accuracy()),
        score_label: format!("{} of {} correct", outcome.correct, outcome.total),
        pass_mark_label: format!("Pass mark: {:.0}%", policy.threshold_percent()),
        xp_label: format!("+{} XP", outcome.xp_earned),
        time_label: format_duration(outcome.time_spent_secs),
        finished_label: format!("Finished {}", format_datetime(outcome.completed_at)),
        narration: outcome.narration.clone(),
        badges,
    }
}
