use adventure_core::model::Realm;
use services::{Insight, Journal, Recommendation};

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RealmRowVm {
    pub name: &'static str,
    pub accuracy_label: String,
    pub answered_label: String,
    pub mastered: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRowVm {
    pub chapter_label: String,
    pub score_label: String,
    pub xp_label: String,
    pub passed: bool,
    pub recorded_at_str: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JournalVm {
    pub title: String,
    pub level_label: String,
    pub xp_label: String,
    pub points_label: String,
    pub answered_label: String,
    pub accuracy_label: String,
    pub best_streak_label: String,
    pub chapters_label: String,
    pub consistency_label: String,
    pub insights: Vec<String>,
    pub realms: Vec<RealmRowVm>,
    pub history: Vec<HistoryRowVm>,
    pub recommendation_title: String,
    pub recommendation_text: String,
    /// Other realms worth a visit, with the detector's probability.
    pub secondary: Vec<String>,
}

#[must_use]
pub fn map_journal(journal: &Journal) -> JournalVm {
    let realms = journal
        .realms
        .iter()
        .map(|summary| RealmRowVm {
            name: summary.realm.display_name(),
            accuracy_label: summary
                .accuracy()
                .map_or_else(|| "not explored".to_string(), |a| format!("{a:.1}%")),
            answered_label: format!("{} answered", summary.answered),
            mastered: summary.mastered,
        })
        .collect();

    let history = journal
        .recent
        .iter()
        .map(|entry| HistoryRowVm {
            chapter_label: format!(
                "{}: {}",
                entry.chapter().realm.display_name(),
                entry.chapter().title()
            ),
            score_label: format!(
                "{}/{} ({:.1}%)",
                entry.correct_answers(),
                entry.total_questions(),
                entry.accuracy()
            ),
            xp_label: format!("+{} XP", entry.xp_earned()),
            passed: entry.passed(),
            recorded_at_str: format_datetime(entry.recorded_at()),
        })
        .collect();

    let (recommendation_title, recommendation_text, secondary) = match &journal.recommendation {
        Recommendation::NeedMoreAnswers { have, need } => {
            let missing = need.saturating_sub(*have);
            (
                "The oracle is still listening".to_string(),
                format!(
                    "Answer {missing} more question{} so your strengths can be read.",
                    if missing == 1 { "" } else { "s" }
                ),
                Vec::new(),
            )
        }
        Recommendation::Focus {
            realm,
            advice,
            secondary,
            ..
        } => (
            format!("Next stop: {}", realm.display_name()),
            advice.clone(),
            secondary
                .iter()
                .map(|(realm, p)| format!("{} ({:.0}%)", realm.display_name(), p * 100.0))
                .collect(),
        ),
    };

    let mut insights: Vec<String> = journal.insights.iter().map(insight_text).collect();
    if let Some(consistency) = journal.consistency.filter(|_| !insights.is_empty()) {
        insights.insert(1, consistency_text(consistency).to_string());
    }

    JournalVm {
        title: format!("{}'s Journal", journal.player_name),
        level_label: format!("Level {}", journal.level),
        xp_label: format!("{} XP", journal.total_xp),
        points_label: format!("{} adventure points", journal.adventure_points),
        answered_label: format!(
            "{} of {} answers correct",
            journal.total_correct, journal.total_answered
        ),
        accuracy_label: format!("{:.1}%", journal.accuracy()),
        best_streak_label: format!("Best streak {}", journal.best_streak),
        chapters_label: format!("{} chapters passed", journal.chapters_passed),
        consistency_label: journal
            .consistency
            .map_or_else(|| "not measured yet".to_string(), |c| format!("{:.0}%", c * 100.0)),
        insights,
        realms,
        history,
        recommendation_title,
        recommendation_text,
        secondary,
    }
}

fn insight_text(insight: &Insight) -> String {
    match insight {
        Insight::Experience(n) => {
            let rank = match *n {
                10.. => "Seasoned explorer",
                5..=9 => "Dedicated explorer",
                _ => "New explorer",
            };
            format!("{rank} with {n} chapter{} passed", if *n == 1 { "" } else { "s" })
        }
        Insight::StrongIn(realms) => format!("Strong in: {}", realm_list(realms)),
        Insight::NeedsWork(realms) => format!("Needs work: {}", realm_list(realms)),
    }
}

fn consistency_text(consistency: f64) -> &'static str {
    if consistency > 0.9 {
        "Steady results across the realms you explored"
    } else if consistency > 0.7 {
        "Fairly steady, with some ups and downs"
    } else {
        "Results swing between realms; aim for steadier practice"
    }
}

fn realm_list(realms: &[Realm]) -> String {
    realms
        .iter()
        .map(|r| r.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}
