mod journal_vm;
mod map_vm;
mod player_vm;
mod question_vm;
mod records_vm;
mod results_vm;
mod time_fmt;

pub use journal_vm::{HistoryRowVm, JournalVm, RealmRowVm, map_journal};
pub use map_vm::{ChapterCardVm, RealmCardVm, map_chapter_cards, map_realm_cards};
pub use player_vm::{PlayerBadgeVm, map_player_badge};
pub use question_vm::{FeedbackVm, OptionVm, QuestionVm, map_question};
pub use records_vm::{RecordRowVm, map_records};
pub use results_vm::{ResultsVm, map_results};
pub use time_fmt::{format_datetime, format_duration};
