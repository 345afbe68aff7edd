use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use adventure_core::model::{
    AnswerChoice, AnswerRecord, ChapterKey, Difficulty, Question, QuestionId, Realm, ScoreEntry,
    StudentId,
};
use adventure_core::progress::ChapterStatus;
use adventure_core::time::fixed_now;
use adventure_core::weakness::LowestScoreDetector;
use async_trait::async_trait;
use services::adventure::narration;
use services::{
    Advance, AdventureError, AdventureService, AdventureState, ChapterOutcome, Clock, Insight,
    JournalService, Recommendation, RunPhase, Screen,
};
use storage::QuestionBank;
use storage::repository::{
    AnswerLogRepository, InMemoryRepository, ScoreLogRepository, Storage, StorageError,
};

fn grammar_easy() -> ChapterKey {
    ChapterKey::new(Realm::Grammar, Difficulty::Easy)
}

fn grammar_medium() -> ChapterKey {
    ChapterKey::new(Realm::Grammar, Difficulty::Medium)
}

fn articles_easy() -> ChapterKey {
    ChapterKey::new(Realm::Articles, Difficulty::Easy)
}

fn bank() -> QuestionBank {
    let mut questions = Vec::new();
    let mut next_id = 1;
    for (chapter, count) in [(grammar_easy(), 12), (grammar_medium(), 3), (articles_easy(), 10)] {
        for n in 0..count {
            let correct = AnswerChoice::ALL[n % 4];
            questions.push(
                Question::new(
                    QuestionId::new(next_id),
                    chapter,
                    format!("{chapter} question {n}"),
                    ["w", "x", "y", "z"].map(String::from),
                    correct,
                )
                .unwrap(),
            );
            next_id += 1;
        }
    }
    QuestionBank::from_questions(questions)
}

fn setup() -> (AdventureService, Storage) {
    let storage = Storage::in_memory();
    let service = AdventureService::new(
        Clock::fixed(fixed_now()),
        Arc::new(bank()),
        Arc::clone(&storage.scores),
        Arc::clone(&storage.answers),
    )
    .with_seed(7);
    (service, storage)
}

/// In-memory logs whose writes can be switched off.
#[derive(Default)]
struct FlakyLogs {
    inner: InMemoryRepository,
    refuse_answers: AtomicBool,
    refuse_scores: AtomicBool,
}

fn refuse_if(flag: &AtomicBool) -> Result<(), StorageError> {
    if flag.load(Ordering::SeqCst) {
        return Err(StorageError::Connection("disk unavailable".into()));
    }
    Ok(())
}

#[async_trait]
impl ScoreLogRepository for FlakyLogs {
    async fn append_score(&self, entry: &ScoreEntry) -> Result<i64, StorageError> {
        refuse_if(&self.refuse_scores)?;
        self.inner.append_score(entry).await
    }

    async fn list_scores(
        &self,
        student: &StudentId,
        limit: Option<u32>,
    ) -> Result<Vec<ScoreEntry>, StorageError> {
        self.inner.list_scores(student, limit).await
    }

    async fn list_all_scores(&self, limit: Option<u32>) -> Result<Vec<ScoreEntry>, StorageError> {
        self.inner.list_all_scores(limit).await
    }
}

#[async_trait]
impl AnswerLogRepository for FlakyLogs {
    async fn append_answer(
        &self,
        student: &StudentId,
        record: &AnswerRecord,
    ) -> Result<i64, StorageError> {
        refuse_if(&self.refuse_answers)?;
        self.inner.append_answer(student, record).await
    }

    async fn list_answers(&self, student: &StudentId) -> Result<Vec<AnswerRecord>, StorageError> {
        self.inner.list_answers(student).await
    }
}

fn current_correct(state: &AdventureState) -> AnswerChoice {
    state
        .run()
        .and_then(|run| run.current_question())
        .map(Question::correct)
        .expect("a question is showing")
}

fn wrong_choice(correct: AnswerChoice) -> AnswerChoice {
    AnswerChoice::ALL
        .into_iter()
        .find(|c| *c != correct)
        .unwrap()
}

/// Answers the running chapter, getting the first `right` questions correct.
async fn play(service: &AdventureService, state: &mut AdventureState, right: usize) -> ChapterOutcome {
    let mut answered = 0;
    loop {
        let correct = current_correct(state);
        let choice = if answered < right { correct } else { wrong_choice(correct) };
        service.answer(state, choice).await.unwrap();
        answered += 1;
        match service.advance(state).await.unwrap() {
            Advance::NextQuestion => {}
            Advance::Completed(outcome) => return outcome,
        }
    }
}

#[tokio::test]
async fn perfect_chapter_passes_and_bonus_is_awarded_once() {
    let (service, storage) = setup();
    let mut state = AdventureState::new();
    service.begin(&mut state, "Alex").await.unwrap();
    assert_eq!(state.screen(), Screen::RealmMap);

    service.start_chapter(&mut state, grammar_easy()).unwrap();
    assert_eq!(state.screen(), Screen::Question(grammar_easy()));
    let run = state.run().unwrap();
    assert_eq!(run.total(), 10);
    assert_eq!(run.intro(), narration::chapter_intro(grammar_easy()));
    assert!(run.frame().is_some_and(|f| !f.is_empty()));

    let outcome = play(&service, &mut state, 10).await;
    assert!(outcome.passed && outcome.first_pass);
    assert_eq!(outcome.completed_at, fixed_now());
    assert!(!outcome.realm_mastered);
    assert_eq!(outcome.xp_earned, 10 * 15 + 150);
    assert_eq!(state.screen(), Screen::ChapterResults(grammar_easy()));
    assert_eq!(state.xp().total_xp(), 300);
    assert!(state.run().is_none());

    service.retry_chapter(&mut state).unwrap();
    let again = play(&service, &mut state, 10).await;
    assert!(again.passed && !again.first_pass);
    assert_eq!(again.xp_earned, 150);
    assert_eq!(state.xp().total_xp(), 450);

    let alex = StudentId::from_name("Alex").unwrap();
    assert_eq!(storage.scores.list_scores(&alex, None).await.unwrap().len(), 2);
    assert_eq!(storage.answers.list_answers(&alex).await.unwrap().len(), 20);
    assert_eq!(
        service.chapter_status(&state, grammar_easy()),
        ChapterStatus::Passed
    );
}

#[tokio::test]
async fn eighty_percent_fails_and_each_attempt_starts_from_zero() {
    let (service, _storage) = setup();
    let mut state = AdventureState::new();
    service.begin(&mut state, "Sam").await.unwrap();

    service.start_chapter(&mut state, grammar_easy()).unwrap();
    let failed = play(&service, &mut state, 8).await;
    assert!(!failed.passed);
    assert_eq!((failed.correct, failed.total), (8, 10));
    assert!(failed.narration.contains("80.0"));
    assert_eq!(
        service.chapter_status(&state, grammar_easy()),
        ChapterStatus::NeedsPractice
    );

    service.retry_chapter(&mut state).unwrap();
    let run = state.run().unwrap();
    assert_eq!((run.correct(), run.answered()), (0, 0));

    let passed = play(&service, &mut state, 9).await;
    assert!(passed.passed);
    assert_eq!(passed.total, 10);
}

#[tokio::test]
async fn passing_every_chapter_masters_the_realm() {
    let (service, _storage) = setup();
    let mut state = AdventureState::new();
    service.begin(&mut state, "Kim").await.unwrap();

    service.start_chapter(&mut state, grammar_medium()).unwrap();
    assert_eq!(state.run().unwrap().total(), 3);
    let small = play(&service, &mut state, 3).await;
    assert!(small.passed);
    assert!(!small.realm_mastered);

    service.start_chapter(&mut state, grammar_easy()).unwrap();
    let last = play(&service, &mut state, 10).await;
    assert!(last.realm_mastered);
    assert_eq!(last.xp_earned, 10 * 15 + 150 + 500);
    assert!(state.is_mastered(Realm::Grammar));
    assert!(!state.is_mastered(Realm::Articles));
}

#[tokio::test]
async fn begin_rebuilds_progress_from_the_logs() {
    let (service, _storage) = setup();
    let mut state = AdventureState::new();
    service.begin(&mut state, "Alex Smith").await.unwrap();
    service.start_chapter(&mut state, grammar_medium()).unwrap();
    play(&service, &mut state, 3).await;
    service.start_chapter(&mut state, grammar_easy()).unwrap();
    play(&service, &mut state, 10).await;
    let xp = state.xp();

    service.reset(&mut state);
    assert_eq!(state.screen(), Screen::Introduction);
    assert_eq!(state.xp().total_xp(), 0);

    let mut resumed = AdventureState::new();
    service.begin(&mut resumed, "  alex   SMITH ").await.unwrap();
    assert_eq!(resumed.xp(), xp);
    assert_eq!(resumed.answers().len(), 13);
    assert!(resumed.is_mastered(Realm::Grammar));
    assert_eq!(resumed.streak().current(), 13);
    assert_eq!(
        service.chapter_status(&resumed, grammar_easy()),
        ChapterStatus::Passed
    );

    // passing again after a resume pays no bonus
    service.start_chapter(&mut resumed, grammar_easy()).unwrap();
    let outcome = play(&service, &mut resumed, 10).await;
    assert!(!outcome.first_pass && !outcome.realm_mastered);
    assert_eq!(outcome.xp_earned, 150);
}

#[tokio::test]
async fn streak_resets_on_a_wrong_answer() {
    let (service, _storage) = setup();
    let mut state = AdventureState::new();
    service.begin(&mut state, "Alex").await.unwrap();
    service.start_chapter(&mut state, articles_easy()).unwrap();

    for _ in 0..3 {
        let choice = current_correct(&state);
        let feedback = service.answer(&mut state, choice).await.unwrap();
        assert!(feedback.correct);
        service.advance(&mut state).await.unwrap();
    }
    assert_eq!(state.streak().current(), 3);

    let correct = current_correct(&state);
    let feedback = service.answer(&mut state, wrong_choice(correct)).await.unwrap();
    assert!(!feedback.correct);
    assert_eq!(feedback.correct_choice, correct);
    assert_eq!(feedback.xp_awarded, 0);
    assert_eq!(feedback.streak, 0);
    assert!(!feedback.reaction.is_empty());
    assert_eq!(state.streak().best(), 3);
    assert!(matches!(
        state.run().unwrap().phase(),
        RunPhase::Feedback { correct: false, .. }
    ));
}

#[tokio::test]
async fn leaving_mid_chapter_logs_a_failed_attempt() {
    let (service, storage) = setup();
    let mut state = AdventureState::new();
    service.begin(&mut state, "Alex").await.unwrap();

    service.start_chapter(&mut state, articles_easy()).unwrap();
    assert!(service.leave_chapter(&mut state).await.unwrap().is_none());
    assert_eq!(state.screen(), Screen::ChapterSelect(Realm::Articles));

    service.start_chapter(&mut state, articles_easy()).unwrap();
    for _ in 0..2 {
        let choice = current_correct(&state);
        service.answer(&mut state, choice).await.unwrap();
        service.advance(&mut state).await.unwrap();
    }
    let outcome = service.leave_chapter(&mut state).await.unwrap().unwrap();
    assert!(!outcome.passed);
    assert_eq!((outcome.correct, outcome.total), (2, 2));
    assert_eq!(outcome.xp_earned, 30);
    assert_eq!(state.screen(), Screen::ChapterSelect(Realm::Articles));
    assert_eq!(
        service.chapter_status(&state, articles_easy()),
        ChapterStatus::NeedsPractice
    );

    let alex = StudentId::from_name("Alex").unwrap();
    let scores = storage.scores.list_scores(&alex, None).await.unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].xp_earned(), 30);
}

#[tokio::test]
async fn leaving_after_the_last_answer_scores_the_full_run() {
    let (service, storage) = setup();
    let mut state = AdventureState::new();
    service.begin(&mut state, "Alex").await.unwrap();

    service.start_chapter(&mut state, articles_easy()).unwrap();
    for _ in 0..9 {
        let choice = current_correct(&state);
        service.answer(&mut state, choice).await.unwrap();
        service.advance(&mut state).await.unwrap();
    }
    let choice = current_correct(&state);
    service.answer(&mut state, choice).await.unwrap();
    assert!(state.run().unwrap().is_last());

    let outcome = service.leave_chapter(&mut state).await.unwrap().unwrap();
    assert!(outcome.passed && outcome.first_pass);
    assert_eq!((outcome.correct, outcome.total), (10, 10));
    assert_eq!(outcome.xp_earned, 10 * 15 + 150);
    assert_eq!(state.screen(), Screen::ChapterSelect(Realm::Articles));
    assert_eq!(
        service.chapter_status(&state, articles_easy()),
        ChapterStatus::Passed
    );

    let alex = StudentId::from_name("Alex").unwrap();
    let scores = storage.scores.list_scores(&alex, None).await.unwrap();
    assert_eq!(scores.len(), 1);
    assert!(scores[0].passed());
}

#[tokio::test]
async fn failed_writes_leave_the_state_untouched() {
    let logs = Arc::new(FlakyLogs::default());
    let service = AdventureService::new(
        Clock::fixed(fixed_now()),
        Arc::new(bank()),
        logs.clone(),
        logs.clone(),
    )
    .with_seed(7);
    let mut state = AdventureState::new();
    service.begin(&mut state, "Alex").await.unwrap();
    service.start_chapter(&mut state, grammar_medium()).unwrap();

    logs.refuse_answers.store(true, Ordering::SeqCst);
    let before = state.clone();
    let choice = current_correct(&state);
    let err = service.answer(&mut state, choice).await;
    assert!(matches!(err, Err(AdventureError::Storage(_))));
    assert_eq!(state, before);
    assert_eq!(state.run().unwrap().phase(), RunPhase::Prompt);
    assert_eq!(state.xp().total_xp(), 0);
    assert!(state.answers().is_empty());

    logs.refuse_answers.store(false, Ordering::SeqCst);
    for _ in 0..2 {
        let choice = current_correct(&state);
        service.answer(&mut state, choice).await.unwrap();
        service.advance(&mut state).await.unwrap();
    }
    let choice = current_correct(&state);
    service.answer(&mut state, choice).await.unwrap();

    logs.refuse_scores.store(true, Ordering::SeqCst);
    let before = state.clone();
    let err = service.advance(&mut state).await;
    assert!(matches!(err, Err(AdventureError::Storage(_))));
    assert_eq!(state, before);
    assert_eq!(state.streak().current(), 3);
    assert_eq!(
        service.chapter_status(&state, grammar_medium()),
        ChapterStatus::NotStarted
    );

    logs.refuse_scores.store(false, Ordering::SeqCst);
    match service.advance(&mut state).await.unwrap() {
        Advance::Completed(outcome) => assert!(outcome.passed && outcome.first_pass),
        Advance::NextQuestion => panic!("the chapter should be over"),
    }
    let alex = StudentId::from_name("Alex").unwrap();
    assert_eq!(logs.list_scores(&alex, None).await.unwrap().len(), 1);
    assert_eq!(logs.list_answers(&alex).await.unwrap().len(), 3);
}

#[tokio::test]
async fn operations_reject_invalid_transitions() {
    let (service, _storage) = setup();
    let mut state = AdventureState::new();

    assert!(matches!(
        service.begin(&mut state, "   ").await,
        Err(AdventureError::EmptyName)
    ));
    assert!(matches!(
        service.open_realm(&mut state, Realm::Grammar),
        Err(AdventureError::NotStarted)
    ));

    service.begin(&mut state, "Alex").await.unwrap();
    let empty = ChapterKey::new(Realm::Sentences, Difficulty::Hard);
    assert!(matches!(
        service.start_chapter(&mut state, empty),
        Err(AdventureError::EmptyChapter(c)) if c == empty
    ));
    assert!(matches!(
        service.retry_chapter(&mut state),
        Err(AdventureError::NothingToRetry)
    ));
    assert!(matches!(
        service.advance(&mut state).await,
        Err(AdventureError::NoActiveRun)
    ));

    service.start_chapter(&mut state, grammar_easy()).unwrap();
    assert!(matches!(
        service.advance(&mut state).await,
        Err(AdventureError::NotAnswered)
    ));
    assert!(matches!(
        service.begin(&mut state, "Sam").await,
        Err(AdventureError::RunInProgress)
    ));
    assert_eq!(state.player().unwrap().name, "Alex");
    assert!(state.run().is_some());
    assert!(matches!(
        service.open_journal(&mut state),
        Err(AdventureError::RunInProgress)
    ));
    assert!(matches!(
        service.start_chapter(&mut state, articles_easy()),
        Err(AdventureError::RunInProgress)
    ));

    service.answer(&mut state, AnswerChoice::A).await.unwrap();
    assert!(matches!(
        service.answer(&mut state, AnswerChoice::B).await,
        Err(AdventureError::AlreadyAnswered)
    ));
}

#[tokio::test]
async fn navigation_moves_between_screens() {
    let (service, _storage) = setup();
    let mut state = AdventureState::new();
    service.begin(&mut state, "Alex").await.unwrap();

    service.open_realm(&mut state, Realm::Synonyms).unwrap();
    assert_eq!(state.screen(), Screen::ChapterSelect(Realm::Synonyms));
    service.open_journal(&mut state).unwrap();
    assert_eq!(state.screen(), Screen::Journal);
    service.back_to_map(&mut state).unwrap();
    assert_eq!(state.screen(), Screen::RealmMap);
}

#[tokio::test]
async fn journal_recommends_the_weakest_realm() {
    let (service, storage) = setup();
    let journal_service =
        JournalService::new(Arc::clone(&storage.scores), Arc::new(LowestScoreDetector::default()));
    let mut state = AdventureState::new();
    service.begin(&mut state, "Alex").await.unwrap();

    service.start_chapter(&mut state, articles_easy()).unwrap();
    for _ in 0..3 {
        let choice = current_correct(&state);
        service.answer(&mut state, choice).await.unwrap();
        service.advance(&mut state).await.unwrap();
    }
    service.leave_chapter(&mut state).await.unwrap();

    let early = journal_service.journal(&state).await.unwrap();
    assert_eq!(
        early.recommendation,
        Recommendation::NeedMoreAnswers { have: 3, need: 5 }
    );

    service.start_chapter(&mut state, grammar_easy()).unwrap();
    play(&service, &mut state, 0).await;

    let journal = journal_service.journal(&state).await.unwrap();
    assert_eq!(journal.player_name, "Alex");
    assert_eq!(journal.total_answered, 13);
    assert_eq!(journal.total_correct, 3);
    assert_eq!(journal.recent.len(), 2);
    assert_eq!(journal.recent[0].chapter(), grammar_easy(), "newest first");
    assert_eq!(journal.realms[Realm::Grammar.index()].accuracy(), Some(0.0));
    assert_eq!(journal.realms[Realm::Articles.index()].accuracy(), Some(100.0));
    assert_eq!(journal.realms[Realm::Antonyms.index()].accuracy(), None);
    assert_eq!(journal.consistency, Some(0.0));
    assert_eq!(
        journal.insights,
        vec![
            Insight::Experience(0),
            Insight::StrongIn(vec![Realm::Articles]),
            Insight::NeedsWork(vec![Realm::Grammar]),
        ]
    );
    match journal.recommendation {
        Recommendation::Focus {
            realm,
            advice,
            secondary,
            ..
        } => {
            assert_eq!(realm, Realm::Grammar);
            assert!(advice.contains("Grammar Grove"));
            assert_eq!(secondary.len(), 2);
            assert!(secondary.iter().all(|(r, _)| *r != Realm::Grammar));
            assert!(secondary[0].1 >= secondary[1].1);
        }
        other => panic!("unexpected recommendation: {other:?}"),
    }
}

#[tokio::test]
async fn hall_of_records_lists_every_learner_newest_first() {
    let (service, storage) = setup();
    let journal_service =
        JournalService::new(Arc::clone(&storage.scores), Arc::new(LowestScoreDetector::default()));

    for name in ["Alex", "Sam", "Kim"] {
        let mut state = AdventureState::new();
        service.begin(&mut state, name).await.unwrap();
        service.start_chapter(&mut state, grammar_medium()).unwrap();
        play(&service, &mut state, 3).await;
    }

    let records = journal_service.hall_of_records(2).await.unwrap();
    let names: Vec<_> = records.iter().map(|e| e.student_name()).collect();
    assert_eq!(names, ["Kim", "Sam"]);
}
