#![forbid(unsafe_code)]

pub mod adventure;
pub mod app_services;
pub mod error;
pub mod journal;

pub use adventure_core::Clock;

pub use adventure::{
    Advance, AdventureService, AdventureState, AnswerFeedback, ChapterOutcome, ChapterRun, Player,
    RunPhase, Screen,
};
pub use app_services::{AppServices, load_detector};
pub use error::{AdventureError, AppServicesError};
pub use journal::{Insight, Journal, JournalService, RealmSummary, Recommendation};
