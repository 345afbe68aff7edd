mod adventure;
mod chapter;
mod chapter_select;
mod intro;
mod journal;
mod realm_map;
mod records;
mod results;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use adventure::AdventureView;
pub use chapter::ChapterView;
pub use chapter_select::ChapterSelectView;
pub use intro::IntroView;
pub use journal::JournalView;
pub use realm_map::RealmMapView;
pub use records::RecordsView;
pub use results::ResultsView;
pub use state::{ViewError, ViewState, view_state_from_resource};
