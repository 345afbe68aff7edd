mod answer;
mod ids;
mod question;
mod realm;
mod score;

pub use answer::AnswerRecord;
pub use ids::{ParseIdError, QuestionId, StudentId};
pub use question::{AnswerChoice, Question, QuestionError};
pub use realm::{ChapterKey, Difficulty, Realm, RealmError};
pub use score::{ScoreEntry, ScoreError};
