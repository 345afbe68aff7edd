use dioxus::prelude::*;

use crate::context::{AppContext, Session};

#[component]
pub fn IntroView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<Session>();
    let mut name = use_signal(String::new);
    let mut busy = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        busy.set(true);
        let adventure = ctx.adventure();
        let entered = name.peek().clone();
        spawn(async move {
            let mut next = session.state.peek().clone();
            let result = adventure.begin(&mut next, &entered).await;
            session.commit(next, result);
            busy.set(false);
        });
    };

    rsx! {
        div { class: "page intro",
            h2 { "The Kingdom of Words" }
            p {
                "Five realms wait beyond the gate. Each has three chapters, and each chapter "
                "is cleared by answering at least 89% of its questions correctly."
            }
            p { "Tell the gatekeeper your name. Returning explorers pick up where they left off." }
            form { class: "intro-form", onsubmit: on_submit,
                input {
                    id: "player-name",
                    r#type: "text",
                    placeholder: "Your name",
                    value: "{name}",
                    oninput: move |evt: FormEvent| name.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy(),
                    "Begin the adventure"
                }
            }
        }
    }
}
