use std::sync::Arc;

use dioxus::prelude::*;
use services::{AdventureService, AdventureState, AppServices, JournalService};

pub trait UiApp: Send + Sync {
    fn adventure(&self) -> Arc<AdventureService>;
    fn journal(&self) -> Arc<JournalService>;
}

impl UiApp for AppServices {
    fn adventure(&self) -> Arc<AdventureService> {
        AppServices::adventure(self)
    }

    fn journal(&self) -> Arc<JournalService> {
        AppServices::journal(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    adventure: Arc<AdventureService>,
    journal: Arc<JournalService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            adventure: app.adventure(),
            journal: app.journal(),
        }
    }

    #[must_use]
    pub fn adventure(&self) -> Arc<AdventureService> {
        Arc::clone(&self.adventure)
    }

    #[must_use]
    pub fn journal(&self) -> Arc<JournalService> {
        Arc::clone(&self.journal)
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

/// The learner's session and the last failed action, shared by every view.
#[derive(Clone, Copy, PartialEq)]
pub struct Session {
    pub state: Signal<AdventureState>,
    pub error: Signal<Option<String>>,
}

impl Session {
    /// Store the state produced by a service call and surface its error, if any.
    pub fn commit<T, E: std::fmt::Display>(
        mut self,
        next: AdventureState,
        result: Result<T, E>,
    ) -> Option<T> {
        self.state.set(next);
        self.settle(result)
    }

    /// Run a synchronous service call against the shared state.
    pub fn update<T, E: std::fmt::Display>(
        self,
        action: impl FnOnce(&mut AdventureState) -> Result<T, E>,
    ) -> Option<T> {
        let mut state = self.state;
        let result = action(&mut state.write());
        self.settle(result)
    }

    /// Surface the error of a call that changed the state in place.
    pub fn settle<T, E: std::fmt::Display>(mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => {
                self.error.set(None);
                Some(value)
            }
            Err(e) => {
                log::warn!("adventure action failed: {e}");
                self.error.set(Some(e.to_string()));
                None
            }
        }
    }
}

/// Provide a fresh `Session` to the component tree.
pub fn use_session_provider(initial: impl FnOnce() -> AdventureState) -> Session {
    let state = use_signal(initial);
    let error = use_signal(|| None::<String>);
    use_context_provider(|| Session { state, error })
}
