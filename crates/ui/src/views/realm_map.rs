use dioxus::prelude::*;

use crate::context::{AppContext, Session};
use crate::vm::{RealmCardVm, map_realm_cards};

#[component]
pub fn RealmMapView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<Session>();
    let adventure = ctx.adventure();
    let cards = map_realm_cards(&adventure, &session.state.read());

    let on_journal = move |_| {
        session.update(|state| adventure.open_journal(state));
    };

    rsx! {
        div { class: "page realm-map",
            h2 { "The Realm Map" }
            div { class: "realm-grid",
                for card in cards {
                    RealmCard { key: "{card.realm}", card }
                }
            }
            div { class: "page-actions",
                button { class: "btn", onclick: on_journal, "Open your journal" }
            }
        }
    }
}

#[component]
fn RealmCard(card: RealmCardVm) -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<Session>();
    let realm = card.realm;
    let class = if card.mastered { "realm-card mastered" } else { "realm-card" };

    rsx! {
        div { class,
            h3 { "{card.name}" }
            p { class: "realm-mentor", "Guide: {card.mentor}" }
            p { "{card.description}" }
            p { class: "realm-progress", "{card.progress_label}" }
            if card.mastered {
                span { class: "badge", "Mastered" }
            }
            button {
                class: "btn btn-primary",
                disabled: !card.playable,
                onclick: move |_| {
                    session.update(|state| ctx.adventure().open_realm(state, realm));
                },
                "Enter"
            }
        }
    }
}
