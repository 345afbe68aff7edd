pub mod narration;
mod run;
mod service;
mod state;

pub use run::{Advance, AnswerFeedback, ChapterOutcome, ChapterRun, RunPhase};
pub use service::AdventureService;
pub use state::{AdventureState, Player, Screen};
