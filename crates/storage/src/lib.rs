#![forbid(unsafe_code)]

pub mod export;
pub mod question_bank;
pub mod repository;
pub mod sqlite;

pub use question_bank::{LoadReport, QuestionBank, QuestionBankError, prompt_id};
pub use repository::{AnswerLogRepository, InMemoryRepository, ScoreLogRepository, Storage, StorageError};
