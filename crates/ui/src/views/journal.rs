use dioxus::prelude::*;

use crate::context::{AppContext, Session};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{JournalVm, map_journal};

#[component]
pub fn JournalView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<Session>();
    let journal = ctx.journal();
    let adventure = ctx.adventure();

    let resource = use_resource(move || {
        let journal = journal.clone();
        let state = session.state.read().clone();
        async move {
            let data = journal.journal(&state).await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_journal(&data))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page journal",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Opening your journal..." }
                },
                ViewState::Ready(vm) => rsx! {
                    JournalDetails { vm }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
            div { class: "page-actions",
                button {
                    class: "btn",
                    onclick: move |_| {
                        session.update(|state| adventure.back_to_map(state));
                    },
                    "Back to the map"
                }
            }
        }
    }
}

#[component]
fn JournalDetails(vm: JournalVm) -> Element {
    rsx! {
        h2 { "{vm.title}" }
        dl { class: "journal-totals",
            dt { "Level" }
            dd { "{vm.level_label}" }

            dt { "Experience" }
            dd { "{vm.xp_label}" }

            dt { "Points" }
            dd { "{vm.points_label}" }

            dt { "Answers" }
            dd { "{vm.answered_label}" }

            dt { "Accuracy" }
            dd { "{vm.accuracy_label}" }

            dt { "Streak" }
            dd { "{vm.best_streak_label}" }

            dt { "Chapters" }
            dd { "{vm.chapters_label}" }

            dt { "Consistency" }
            dd { "{vm.consistency_label}" }
        }

        section { class: "journal-oracle",
            h3 { "{vm.recommendation_title}" }
            p { "{vm.recommendation_text}" }
            if !vm.secondary.is_empty() {
                p { class: "muted", "Also worth a visit:" }
                ul { class: "journal-secondary",
                    for line in vm.secondary {
                        li { "{line}" }
                    }
                }
            }
        }

        if !vm.insights.is_empty() {
            section { class: "journal-insights",
                h3 { "Insights" }
                ul {
                    for line in vm.insights {
                        li { "{line}" }
                    }
                }
            }
        }

        section { class: "journal-realms",
            h3 { "Realms" }
            ul {
                for row in vm.realms {
                    li { class: if row.mastered { "realm-row mastered" } else { "realm-row" },
                        span { class: "realm-row-name", "{row.name}" }
                        span { "{row.accuracy_label}" }
                        span { class: "muted", "{row.answered_label}" }
                    }
                }
            }
        }

        section { class: "journal-history",
            h3 { "Recent chapters" }
            if vm.history.is_empty() {
                p { "No chapters finished yet." }
            } else {
                ul {
                    for row in vm.history {
                        li {
                            span { class: "history-date", "{row.recorded_at_str}" }
                            span { "{row.chapter_label}" }
                            span { "{row.score_label}" }
                            span { "{row.xp_label}" }
                            if row.passed {
                                span { class: "badge", "Passed" }
                            }
                        }
                    }
                }
            }
        }
    }
}
