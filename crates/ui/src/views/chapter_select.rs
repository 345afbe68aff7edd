use adventure_core::model::Realm;
use dioxus::prelude::*;

use crate::context::{AppContext, Session};
use crate::vm::{ChapterCardVm, map_chapter_cards};

#[component]
pub fn ChapterSelectView(realm: Realm) -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<Session>();
    let adventure = ctx.adventure();
    let cards = map_chapter_cards(&adventure, &session.state.read(), realm);

    rsx! {
        div { class: "page chapter-select",
            h2 { "{realm.display_name()}" }
            p { class: "realm-mentor", "{realm.mentor()} greets you. {realm.description()}" }
            ul { class: "chapter-list",
                for card in cards {
                    ChapterCard { key: "{card.chapter}", card }
                }
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
fn ChapterCard(card: ChapterCardVm) -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<Session>();
    let chapter = card.chapter;

    rsx! {
        li { class: "chapter-card",
            div {
                span { class: "chapter-difficulty", "{card.difficulty_label}" }
                h3 { "{card.title}" }
                p { class: "chapter-detail", "{card.detail_label}" }
            }
            span { class: "chapter-status", "{card.status_label}" }
            button {
                class: "btn btn-primary",
                disabled: !card.playable,
                onclick: move |_| {
                    session.update(|state| ctx.adventure().start_chapter(state, chapter));
                },
                "Play"
            }
        }
    }
}
