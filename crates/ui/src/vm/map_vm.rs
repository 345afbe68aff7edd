use adventure_core::model::{ChapterKey, Difficulty, Realm};
use adventure_core::progress::ChapterStatus;
use services::{AdventureService, AdventureState};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RealmCardVm {
    pub realm: Realm,
    pub name: &'static str,
    pub mentor: &'static str,
    pub description: &'static str,
    pub progress_label: String,
    pub mastered: bool,
    pub playable: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChapterCardVm {
    pub chapter: ChapterKey,
    pub title: &'static str,
    pub difficulty_label: &'static str,
    pub status: ChapterStatus,
    pub status_label: &'static str,
    pub detail_label: String,
    pub playable: bool,
}

fn difficulty_label(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "Easy",
        Difficulty::Medium => "Medium",
        Difficulty::Hard => "Hard",
    }
}

fn status_label(status: ChapterStatus) -> &'static str {
    match status {
        ChapterStatus::Unavailable => "Sealed",
        ChapterStatus::NotStarted => "Not started",
        ChapterStatus::NeedsPractice => "Keep practising",
        ChapterStatus::Passed => "Passed",
    }
}

#[must_use]
pub fn map_realm_cards(service: &AdventureService, state: &AdventureState) -> Vec<RealmCardVm> {
    Realm::ALL
        .into_iter()
        .map(|realm| {
            let available = service.bank().available_chapters(realm);
            let passed = available
                .iter()
                .filter(|&&chapter| service.chapter_status(state, chapter) == ChapterStatus::Passed)
                .count();
            let progress_label = if available.is_empty() {
                "No chapters yet".to_string()
            } else {
                format!("{passed} of {} chapters passed", available.len())
            };
            RealmCardVm {
                realm,
                name: realm.display_name(),
                mentor: realm.mentor(),
                description: realm.description(),
                progress_label,
                mastered: state.is_mastered(realm),
                playable: !available.is_empty(),
            }
        })
        .collect()
}

#[must_use]
pub fn map_chapter_cards(
    service: &AdventureService,
    state: &AdventureState,
    realm: Realm,
) -> Vec<ChapterCardVm> {
    ChapterKey::all_in(realm)
        .map(|chapter| {
            let status = service.chapter_status(state, chapter);
            let stats = state.progress().stats(chapter);
            let detail_label = match status {
                ChapterStatus::Unavailable => "No questions in this chapter".to_string(),
                ChapterStatus::NotStarted => {
                    let count = service.bank().count(chapter);
                    let drawn = count.min(service.policy().questions_per_chapter() as usize);
                    format!("{drawn} questions")
                }
                ChapterStatus::NeedsPractice | ChapterStatus::Passed => format!(
                    "Best {:.1}% after {} attempt{}",
                    stats.best_accuracy,
                    stats.attempts,
                    if stats.attempts == 1 { "" } else { "s" }
                ),
            };
            ChapterCardVm {
                chapter,
                title: chapter.title(),
                difficulty_label: difficulty_label(chapter.difficulty),
                status,
                status_label: status_label(status),
                detail_label,
                playable: status != ChapterStatus::Unavailable,
            }
        })
        .collect()
}
