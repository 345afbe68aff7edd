use adventure_core::model::AnswerChoice;
use dioxus::prelude::*;

use crate::context::{AppContext, Session};
use crate::vm::{OptionVm, map_question};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ChapterIntent {
    Answer(AnswerChoice),
    Continue,
    Leave,
}

/// Keyboard shortcuts: `a`-`d` or `1`-`4` answer, Enter continues.
fn intent_for_key(key: &Key, answered: bool) -> Option<ChapterIntent> {
    match key {
        Key::Enter if answered => Some(ChapterIntent::Continue),
        Key::Escape => Some(ChapterIntent::Leave),
        Key::Character(text) if !answered => {
            let ch = text.chars().next()?.to_ascii_uppercase();
            let index = match ch {
                'A'..='D' => ch as usize - 'A' as usize,
                '1'..='4' => ch as usize - '1' as usize,
                _ => return None,
            };
            AnswerChoice::from_index(index).ok().map(ChapterIntent::Answer)
        }
        _ => None,
    }
}

#[component]
pub fn ChapterView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<Session>();
    let mut busy = use_signal(|| false);

    let vm = session.state.read().run().and_then(map_question);
    let answered = vm.as_ref().is_some_and(|vm| vm.feedback.is_some());

    let dispatch = use_callback(move |intent: ChapterIntent| {
        if busy() {
            return;
        }
        busy.set(true);
        let adventure = ctx.adventure();
        spawn(async move {
            let mut next = session.state.peek().clone();
            match intent {
                ChapterIntent::Answer(choice) => {
                    let result = adventure.answer(&mut next, choice).await;
                    session.commit(next, result);
                }
                ChapterIntent::Continue => {
                    let result = adventure.advance(&mut next).await;
                    session.commit(next, result);
                }
                ChapterIntent::Leave => {
                    let result = adventure.leave_chapter(&mut next).await;
                    session.commit(next, result);
                }
            }
            busy.set(false);
        });
    });

    let on_key = move |evt: KeyboardEvent| {
        if let Some(intent) = intent_for_key(&evt.data.key(), answered) {
            evt.prevent_default();
            dispatch.call(intent);
        }
    };

    let Some(vm) = vm else {
        return rsx! {
            div { class: "page chapter",
                p { "This chapter has no question to show." }
            }
        };
    };

    rsx! {
        div { class: "page chapter", tabindex: 0, onkeydown: on_key,
            header { class: "chapter-header",
                span { class: "chapter-realm", "{vm.realm_name}" }
                h2 { "{vm.chapter_title}" }
                span { class: "chapter-position", "{vm.position_label}" }
                span { class: "chapter-score", "{vm.score_label}" }
            }
            if let Some(intro) = vm.intro {
                p { class: "chapter-intro", "{intro}" }
            }
            p { class: "question-frame", "{vm.frame}" }
            p { class: "question-prompt", "{vm.prompt}" }
            div { class: "options",
                for option in vm.options {
                    OptionButton {
                        key: "{option.letter}",
                        option,
                        disabled: answered || busy(),
                        on_pick: move |choice| dispatch.call(ChapterIntent::Answer(choice)),
                    }
                }
            }
            if let Some(feedback) = vm.feedback {
                div { class: if feedback.correct { "feedback good" } else { "feedback bad" },
                    strong { "{feedback.headline}" }
                    p { "{feedback.reaction}" }
                    button {
                        id: "chapter-continue",
                        class: "btn btn-primary",
                        disabled: busy(),
                        onclick: move |_| dispatch.call(ChapterIntent::Continue),
                        "{vm.continue_label}"
                    }
                }
            }
            div { class: "page-actions",
                button {
                    class: "btn btn-ghost",
                    disabled: busy(),
                    onclick: move |_| dispatch.call(ChapterIntent::Leave),
                    "Leave chapter"
                }
            }
        }
    }
}

#[component]
fn OptionButton(option: OptionVm, disabled: bool, on_pick: EventHandler<AnswerChoice>) -> Element {
    let choice = option.choice;
    rsx! {
        button {
            class: "{option.class}",
            disabled,
            onclick: move |_| on_pick.call(choice),
            span { class: "option-letter", "{option.letter}" }
            span { class: "option-text", "{option.text}" }
        }
    }
}
