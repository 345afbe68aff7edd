use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::Session;
use crate::views::{AdventureView, RecordsView};
use crate::vm::map_player_badge;

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", AdventureView)] Adventure {},
        #[route("/records", RecordsView)] Records {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            TopBar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn TopBar() -> Element {
    let session = use_context::<Session>();
    let badge = map_player_badge(&session.state.read());

    rsx! {
        header { class: "topbar",
            h1 { "English Adventure" }
            nav {
                Link { to: Route::Adventure {}, "Adventure" }
                Link { to: Route::Records {}, "Hall of Records" }
            }
            if let Some(badge) = badge {
                div { class: "player-badge",
                    span { class: "player-name", "{badge.name}" }
                    span { class: "player-level", "{badge.level_label}" }
                    span { class: "player-xp", "{badge.xp_label}" }
                    span { class: "player-streak", "{badge.streak_label}" }
                }
            }
        }
    }
}
