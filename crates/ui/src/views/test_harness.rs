use std::sync::Arc;

use adventure_core::model::{AnswerChoice, ChapterKey, Difficulty, Question, QuestionId, Realm};
use adventure_core::time::fixed_now;
use adventure_core::weakness::LowestScoreDetector;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use services::{Advance, AdventureService, AdventureState, AppServices, Clock};
use storage::QuestionBank;
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context, use_session_provider};
use crate::views::{AdventureView, RecordsView};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Adventure,
    Records,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<dyn UiApp>,
    view: ViewKind,
    initial: AdventureState,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewHarnessRoot(props: ViewHarnessProps) -> Element {
    use_context_provider(|| build_app_context(&props.app));
    let initial = props.initial.clone();
    use_session_provider(move || initial);
    match props.view {
        ViewKind::Adventure => rsx! { AdventureView {} },
        ViewKind::Records => rsx! { RecordsView {} },
    }
}

pub fn grammar_easy() -> ChapterKey {
    ChapterKey::new(Realm::Grammar, Difficulty::Easy)
}

fn bank() -> QuestionBank {
    let questions = (1..=4)
        .map(|id| {
            Question::new(
                QuestionId::new(id),
                grammar_easy(),
                format!("Grammar question {id}"),
                ["goes", "go", "going", "gone"].map(String::from),
                AnswerChoice::A,
            )
            .unwrap()
        })
        .collect();
    QuestionBank::from_questions(questions)
}

/// Services over in-memory storage with a four-question grammar chapter.
pub struct Fixture {
    pub storage: Storage,
    pub services: AppServices,
}

impl Fixture {
    pub fn new() -> Self {
        let storage = Storage::in_memory();
        let services = AppServices::from_parts(
            storage.clone(),
            bank(),
            Arc::new(LowestScoreDetector::default()),
            Clock::fixed(fixed_now()),
        );
        Self { storage, services }
    }

    pub fn adventure(&self) -> Arc<AdventureService> {
        self.services.adventure()
    }

    pub async fn begun(&self, name: &str) -> AdventureState {
        let mut state = AdventureState::new();
        self.adventure().begin(&mut state, name).await.unwrap();
        state
    }

    /// Plays the whole grammar chapter, answering every question correctly.
    pub async fn play_chapter(&self, state: &mut AdventureState) {
        let adventure = self.adventure();
        adventure.start_chapter(state, grammar_easy()).unwrap();
        loop {
            adventure.answer(state, AnswerChoice::A).await.unwrap();
            if let Advance::Completed(_) = adventure.advance(state).await.unwrap() {
                return;
            }
        }
    }

    pub fn mount(&self, view: ViewKind, initial: AdventureState) -> ViewHarness {
        let app: Arc<dyn UiApp> = Arc::new(self.services.clone());
        let dom = VirtualDom::new_with_props(
            ViewHarnessRoot,
            ViewHarnessProps { app, view, initial },
        );
        ViewHarness { dom }
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}
