use dioxus::prelude::*;
use services::Screen;

use crate::context::Session;
use crate::views::{
    ChapterSelectView, ChapterView, IntroView, JournalView, RealmMapView, ResultsView,
};

/// Shows whichever screen the session is on.
#[component]
pub fn AdventureView() -> Element {
    let session = use_context::<Session>();
    let screen = session.state.read().screen();

    rsx! {
        ErrorBanner {}
        match screen {
            Screen::Introduction => rsx! { IntroView {} },
            Screen::RealmMap => rsx! { RealmMapView {} },
            Screen::ChapterSelect(realm) => rsx! { ChapterSelectView { realm } },
            Screen::Question(_) => rsx! { ChapterView {} },
            Screen::ChapterResults(_) => rsx! { ResultsView {} },
            Screen::Journal => rsx! { JournalView {} },
        }
    }
}

#[component]
fn ErrorBanner() -> Element {
    let session = use_context::<Session>();
    let mut error = session.error;
    let message = error.read().clone();

    rsx! {
        if let Some(message) = message {
            div { class: "error-banner", role: "alert",
                span { "{message}" }
                button {
                    class: "btn btn-ghost",
                    onclick: move |_| error.set(None),
                    "Dismiss"
                }
            }
        }
    }
}
