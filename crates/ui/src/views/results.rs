use dioxus::prelude::*;

use crate::context::{AppContext, Session};
use crate::vm::map_results;

#[component]
pub fn ResultsView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<Session>();
    let adventure = ctx.adventure();

    let outcome = session.state.read().last_outcome().cloned();
    let Some(outcome) = outcome else {
        return rsx! {
            div { class: "page results",
                p { "No chapter has been finished yet." }
            }
        };
    };
    let realm = outcome.chapter.realm;
    let vm = map_results(&outcome, adventure.policy());

    let on_retry = {
        let adventure = ctx.adventure();
        move |_| {
            session.update(|state| adventure.retry_chapter(state));
        }
    };
    let on_realm = {
        let adventure = ctx.adventure();
        move |_| {
            session.update(|state| adventure.open_realm(state, realm));
        }
    };
    let on_journal = move |_| {
        session.update(|state| adventure.open_journal(state));
    };

    rsx! {
        div { class: if vm.passed { "page results passed" } else { "page results" },
            h2 { "{vm.verdict}" }
            p { class: "results-chapter", "{vm.chapter_title}" }
            dl { class: "results-stats",
                dt { "Accuracy" }
                dd { "{vm.accuracy_label}" }

                dt { "Score" }
                dd { "{vm.score_label}" }

                dt { "Experience" }
                dd { "{vm.xp_label}" }

                dt { "Time" }
                dd { "{vm.time_label}" }
            }
            p { class: "results-pass-mark", "{vm.pass_mark_label}" }
            p { class: "muted", "{vm.finished_label}" }
            for badge in vm.badges {
                span { class: "badge", "{badge}" }
            }
            blockquote { class: "narration", "{vm.narration}" }
            div { class: "page-actions",
                button { class: "btn btn-primary", onclick: on_retry, "Try this chapter again" }
                button { class: "btn", onclick: on_realm, "Choose another chapter" }
                button { class: "btn btn-ghost", onclick: on_journal, "Open your journal" }
            }
        }
    }
}
