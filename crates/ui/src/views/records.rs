use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{RecordRowVm, map_records};

const RECORD_LIMIT: u32 = 20;

/// Latest chapter attempts of every explorer.
#[component]
pub fn RecordsView() -> Element {
    let ctx = use_context::<AppContext>();
    let journal = ctx.journal();

    let mut resource = use_resource(move || {
        let journal = journal.clone();
        async move {
            let entries = journal
                .hall_of_records(RECORD_LIMIT)
                .await
                .map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_records(&entries))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page records",
            h2 { "Hall of Records" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(rows) => rsx! {
                    if rows.is_empty() {
                        p { "No chapters have been finished yet." }
                    } else {
                        table {
                            thead {
                                tr {
                                    th { "Explorer" }
                                    th { "Chapter" }
                                    th { "Score" }
                                    th { "XP" }
                                    th { "Time" }
                                    th { "When" }
                                }
                            }
                            tbody {
                                for row in rows {
                                    RecordRow { row }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button { class: "btn", onclick: move |_| resource.restart(), "Retry" }
                },
            }
        }
    }
}

#[component]
fn RecordRow(row: RecordRowVm) -> Element {
    rsx! {
        tr { class: if row.passed { "passed" } else { "" },
            td { "{row.name}" }
            td { "{row.chapter_label}" }
            td { "{row.score_label}" }
            td { "{row.xp_label}" }
            td { "{row.time_label}" }
            td { "{row.recorded_at_str}" }
        }
    }
}
