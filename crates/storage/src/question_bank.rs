//! CSV-backed question bank.
//!
//! Expected header: `topic,question,option_a,option_b,option_c,option_d,correct_answer,difficulty`.
//! Extra columns are ignored.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};

use adventure_core::model::{
    AnswerChoice, ChapterKey, Difficulty, Question, QuestionId, Realm,
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

const REQUIRED_COLUMNS: [&str; 8] = [
    "topic",
    "question",
    "option_a",
    "option_b",
    "option_c",
    "option_d",
    "correct_answer",
    "difficulty",
];

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question bank not found: {0}")]
    NotFound(PathBuf),

    #[error("cannot read question bank: {0}")]
    Csv(#[from] csv::Error),

    #[error("question bank is missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("question bank has no valid questions")]
    Empty,
}

/// Counters from one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub loaded: usize,
    pub skipped_invalid: usize,
    pub skipped_duplicates: usize,
}

#[derive(Debug, Deserialize)]
struct QuestionRow {
    topic: String,
    question: String,
    option_a: String,
    option_b: String,
    option_c: String,
    option_d: String,
    correct_answer: String,
    difficulty: String,
}

impl QuestionRow {
    fn into_question(self, id: QuestionId) -> Result<Question, String> {
        let realm: Realm = self.topic.parse().map_err(|e| format!("{e}"))?;
        let difficulty: Difficulty = self.difficulty.parse().map_err(|e| format!("{e}"))?;
        let correct: AnswerChoice = self.correct_answer.parse().map_err(|e| format!("{e}"))?;
        Question::new(
            id,
            ChapterKey::new(realm, difficulty),
            self.question,
            [self.option_a, self.option_b, self.option_c, self.option_d],
            correct,
        )
        .map_err(|e| e.to_string())
    }
}

/// Id of the question with this prompt: the first 63 bits of its SHA-256.
///
/// Prompts are unique within a bank, so the id survives edits to other rows
/// and still names the same question in older answer logs.
#[must_use]
pub fn prompt_id(prompt: &str) -> QuestionId {
    let digest = Sha256::digest(prompt.trim().as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    QuestionId::new(u64::from_be_bytes(bytes) >> 1)
}

/// Validated questions grouped by chapter.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
    by_chapter: BTreeMap<ChapterKey, usize>,
    report: LoadReport,
}

impl QuestionBank {
    /// Load the bank from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::NotFound` for a missing file, `MissingColumns`
    /// for a bad header, and `Empty` when no row survives validation.
    pub fn from_path(path: &Path) -> Result<Self, QuestionBankError> {
        if !path.is_file() {
            return Err(QuestionBankError::NotFound(path.to_path_buf()));
        }
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;
        let bank = Self::from_csv(reader)?;
        log::info!(
            "loaded {} questions from {} ({} invalid, {} duplicate rows skipped)",
            bank.report.loaded,
            path.display(),
            bank.report.skipped_invalid,
            bank.report.skipped_duplicates
        );
        Ok(bank)
    }

    /// Load the bank from any CSV source.
    ///
    /// # Errors
    ///
    /// Same as [`QuestionBank::from_path`], minus `NotFound`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, QuestionBankError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, QuestionBankError> {
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| !headers.iter().any(|h| h == *c))
            .map(|c| (*c).to_owned())
            .collect();
        if !missing.is_empty() {
            return Err(QuestionBankError::MissingColumns(missing));
        }
        let header_record = csv::StringRecord::from(headers);

        let mut report = LoadReport::default();
        let mut seen = HashSet::new();
        let mut questions = Vec::new();

        for (index, result) in reader.records().enumerate() {
            report.rows_read += 1;
            let line = index + 2;

            let row: QuestionRow = match result.and_then(|r| r.deserialize(Some(&header_record))) {
                Ok(row) => row,
                Err(e) => {
                    log::warn!("skipping question bank line {line}: {e}");
                    report.skipped_invalid += 1;
                    continue;
                }
            };

            let id = prompt_id(&row.question);
            let question = match row.into_question(id) {
                Ok(question) => question,
                Err(e) => {
                    log::warn!("skipping question bank line {line}: {e}");
                    report.skipped_invalid += 1;
                    continue;
                }
            };

            if !seen.insert(question.prompt().to_owned()) {
                log::debug!("skipping duplicate question on line {line}");
                report.skipped_duplicates += 1;
                continue;
            }
            questions.push(question);
        }

        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }
        report.loaded = questions.len();
        let mut bank = Self::from_questions(questions);
        bank.report = report;
        Ok(bank)
    }

    /// Build a bank from already validated questions.
    #[must_use]
    pub fn from_questions(questions: Vec<Question>) -> Self {
        let mut by_chapter = BTreeMap::new();
        for question in &questions {
            *by_chapter.entry(question.chapter()).or_insert(0) += 1;
        }
        let report = LoadReport {
            rows_read: questions.len(),
            loaded: questions.len(),
            ..LoadReport::default()
        };
        Self {
            questions,
            by_chapter,
            report,
        }
    }

    #[must_use]
    pub fn report(&self) -> LoadReport {
        self.report
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions_for(&self, chapter: ChapterKey) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.chapter() == chapter)
    }

    #[must_use]
    pub fn count(&self, chapter: ChapterKey) -> usize {
        self.by_chapter.get(&chapter).copied().unwrap_or(0)
    }

    /// Chapters of `realm` that have at least one question, easiest first.
    #[must_use]
    pub fn available_chapters(&self, realm: Realm) -> Vec<ChapterKey> {
        ChapterKey::all_in(realm)
            .filter(|c| self.count(*c) > 0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "topic,question,option_a,option_b,option_c,option_d,correct_answer,difficulty\n";

    fn load(body: &str) -> Result<QuestionBank, QuestionBankError> {
        QuestionBank::from_reader(format!("{HEADER}{body}").as_bytes())
    }

    #[test]
    fn normalizes_topic_difficulty_and_answer() {
        let bank = load(" Grammar ,Pick the verb,run,blue,cat,soft, b ,EASY\n").unwrap();
        let question = &bank.questions()[0];
        assert_eq!(question.chapter(), ChapterKey::new(Realm::Grammar, Difficulty::Easy));
        assert_eq!(question.correct(), AnswerChoice::B);
        assert_eq!(bank.count(question.chapter()), 1);
    }

    #[test]
    fn skips_invalid_and_duplicate_rows() {
        let body = "\
grammar,Q1,a,b,c,d,A,easy
grammar,Q1,a,b,c,d,B,easy
spelling,Q2,a,b,c,d,A,easy
grammar,Q3,a,b,c,d,E,easy
grammar,Q4,a,,c,d,A,easy
articles,Q5,a,b,c,d,D,expert
articles,Q6,a,b,c,d,D,hard
";
        let bank = load(body).unwrap();
        let report = bank.report();
        assert_eq!(report.rows_read, 7);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped_duplicates, 1);
        assert_eq!(report.skipped_invalid, 4);
        assert_eq!(bank.questions()[0].correct(), AnswerChoice::A, "first duplicate wins");
        assert_eq!(bank.questions()[1].id(), prompt_id("Q6"));
    }

    #[test]
    fn ids_follow_the_prompt_not_the_row() {
        let before = load("grammar,Q1,a,b,c,d,A,easy\ngrammar,Q2,a,b,c,d,B,easy\n").unwrap();
        let after = load(
            "grammar,Q0,a,b,c,d,C,easy\ngrammar,Q2,a,b,c,d,B,easy\ngrammar, Q1 ,a,b,c,d,A,easy\n",
        )
        .unwrap();
        let id_of = |bank: &QuestionBank, prompt: &str| {
            bank.questions()
                .iter()
                .find(|q| q.prompt() == prompt)
                .map(Question::id)
        };
        assert_eq!(id_of(&before, "Q1"), id_of(&after, "Q1"));
        assert_eq!(id_of(&before, "Q2"), id_of(&after, "Q2"));
        assert_ne!(id_of(&after, "Q0"), id_of(&after, "Q1"));
        assert!(i64::try_from(prompt_id("Q1").value()).is_ok(), "fits an SQLite INTEGER");
    }

    #[test]
    fn short_rows_are_skipped_not_fatal() {
        let bank = load("grammar,Q1,a,b\nsynonyms,Q2,a,b,c,d,C,medium\n").unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.report().skipped_invalid, 1);
    }

    #[test]
    fn empty_bank_is_an_error() {
        assert!(matches!(load(""), Err(QuestionBankError::Empty)));
        assert!(matches!(
            load("spelling,Q,a,b,c,d,A,easy\n"),
            Err(QuestionBankError::Empty)
        ));
    }

    #[test]
    fn missing_columns_are_reported() {
        let err = QuestionBank::from_reader("topic,question\ngrammar,Q\n".as_bytes()).unwrap_err();
        match err {
            QuestionBankError::MissingColumns(cols) => {
                assert!(cols.contains(&"correct_answer".to_owned()));
                assert_eq!(cols.len(), 6);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = QuestionBank::from_path(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, QuestionBankError::NotFound(_)));
    }

    #[test]
    fn available_chapters_lists_only_populated_ones() {
        let body = "\
antonyms,Hot is to,cold,warm,mild,tepid,A,easy
antonyms,Up is to,down,over,above,top,A,hard
";
        let bank = load(body).unwrap();
        assert_eq!(
            bank.available_chapters(Realm::Antonyms),
            vec![
                ChapterKey::new(Realm::Antonyms, Difficulty::Easy),
                ChapterKey::new(Realm::Antonyms, Difficulty::Hard),
            ]
        );
        assert!(bank.available_chapters(Realm::Grammar).is_empty());
        assert_eq!(
            bank.questions_for(ChapterKey::new(Realm::Antonyms, Difficulty::Hard))
                .count(),
            1
        );
    }
}
