use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use adventure_core::model::{AnswerChoice, AnswerRecord, ChapterKey, Realm, ScoreEntry, StudentId};
use adventure_core::progress::{ChapterStatus, PassPolicy};
use adventure_core::reward::XpRules;
use adventure_core::shuffle::draw_chapter;
use adventure_core::time::elapsed_secs;
use rand::SeedableRng;
use rand::rngs::StdRng;
use storage::QuestionBank;
use storage::repository::{AnswerLogRepository, ScoreLogRepository};

use super::narration;
use super::run::{Advance, AnswerFeedback, ChapterOutcome, ChapterRun, RunPhase};
use super::state::{AdventureState, Player, Screen};
use crate::Clock;
use crate::error::AdventureError;

/// Drives an `AdventureState` through the adventure and persists its logs.
#[derive(Clone)]
pub struct AdventureService {
    clock: Clock,
    bank: Arc<QuestionBank>,
    scores: Arc<dyn ScoreLogRepository>,
    answers: Arc<dyn AnswerLogRepository>,
    rules: XpRules,
    policy: PassPolicy,
    rng: Arc<Mutex<StdRng>>,
}

impl AdventureService {
    #[must_use]
    pub fn new(
        clock: Clock,
        bank: Arc<QuestionBank>,
        scores: Arc<dyn ScoreLogRepository>,
        answers: Arc<dyn AnswerLogRepository>,
    ) -> Self {
        Self {
            clock,
            bank,
            scores,
            answers,
            rules: XpRules::default(),
            policy: PassPolicy::default(),
            rng: Arc::new(Mutex::new(StdRng::from_os_rng())),
        }
    }

    /// Use a seeded generator so question order and narration are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Arc::new(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: XpRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: PassPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn rules(&self) -> XpRules {
        self.rules
    }

    #[must_use]
    pub fn policy(&self) -> PassPolicy {
        self.policy
    }

    #[must_use]
    pub fn chapter_status(&self, state: &AdventureState, chapter: ChapterKey) -> ChapterStatus {
        state.progress.status(chapter, self.bank.count(chapter))
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Start (or resume) the adventure for `name`.
    ///
    /// Progress, XP and the answer history are rebuilt from the persisted logs.
    ///
    /// # Errors
    ///
    /// Returns `AdventureError::EmptyName` for a blank name, `RunInProgress`
    /// while a chapter is being played, or a storage error.
    pub async fn begin(&self, state: &mut AdventureState, name: &str) -> Result<(), AdventureError> {
        if state.run.is_some() {
            return Err(AdventureError::RunInProgress);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(AdventureError::EmptyName);
        }
        let id = StudentId::from_name(name)?;

        let scores = self.scores.list_scores(&id, None).await?;
        let answers = self.answers.list_answers(&id).await?;

        let mut fresh = AdventureState::new();
        for entry in &scores {
            fresh.progress.record_attempt(
                entry.chapter(),
                entry.correct_answers(),
                entry.total_questions(),
                entry.passed(),
            );
            fresh.xp.award(entry.xp_earned());
            if entry.passed() {
                fresh.rewarded_chapters.insert(entry.chapter());
            }
        }
        for answer in &answers {
            fresh.streak.record(answer.is_correct());
        }
        for realm in Realm::ALL {
            if fresh
                .progress
                .is_realm_mastered(realm, &self.bank.available_chapters(realm))
            {
                fresh.mastered_realms.insert(realm);
            }
        }

        log::info!(
            "{id} begins with {} past attempts, {} answers, {} XP",
            scores.len(),
            answers.len(),
            fresh.xp.total_xp()
        );
        fresh.answers = answers;
        fresh.player = Some(Player {
            name: name.to_owned(),
            id,
        });
        fresh.screen = Screen::RealmMap;
        *state = fresh;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NotStarted` before `begin`, `RunInProgress` during a chapter.
    pub fn open_realm(&self, state: &mut AdventureState, realm: Realm) -> Result<(), AdventureError> {
        Self::ensure_idle(state)?;
        state.screen = Screen::ChapterSelect(realm);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NotStarted` before `begin`, `RunInProgress` during a chapter.
    pub fn open_journal(&self, state: &mut AdventureState) -> Result<(), AdventureError> {
        Self::ensure_idle(state)?;
        state.screen = Screen::Journal;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NotStarted` before `begin`, `RunInProgress` during a chapter.
    pub fn back_to_map(&self, state: &mut AdventureState) -> Result<(), AdventureError> {
        Self::ensure_idle(state)?;
        state.screen = Screen::RealmMap;
        Ok(())
    }

    /// Forget the in-memory adventure. Persisted logs are untouched.
    pub fn reset(&self, state: &mut AdventureState) {
        if let Some(player) = &state.player {
            log::info!("{} leaves the adventure", player.id);
        }
        *state = AdventureState::new();
    }

    fn ensure_idle(state: &AdventureState) -> Result<(), AdventureError> {
        state.require_player()?;
        if state.run.is_some() {
            return Err(AdventureError::RunInProgress);
        }
        Ok(())
    }

    //
    // ─── CHAPTERS ──────────────────────────────────────────────────────────────
    //

    /// Draw a shuffled question set for `chapter` and show its first question.
    ///
    /// # Errors
    ///
    /// Returns `EmptyChapter` if the bank has no questions for it.
    pub fn start_chapter(
        &self,
        state: &mut AdventureState,
        chapter: ChapterKey,
    ) -> Result<(), AdventureError> {
        Self::ensure_idle(state)?;
        let available = self.bank.count(chapter);
        if available == 0 {
            return Err(AdventureError::EmptyChapter(chapter));
        }

        let max = usize::try_from(self.policy.questions_per_chapter()).unwrap_or(usize::MAX);
        let mut rng = self.rng();
        let questions = draw_chapter(self.bank.questions(), chapter, max, &mut *rng);
        let frames = questions
            .iter()
            .map(|_| narration::question_frame(chapter.realm, &mut *rng))
            .collect();
        drop(rng);
        log::debug!("starting {chapter} with {} questions", questions.len());

        let run = ChapterRun::new(chapter, questions, available, self.clock.now())
            .with_story(narration::chapter_intro(chapter), frames);
        state.run = Some(run);
        state.screen = Screen::Question(chapter);
        Ok(())
    }

    /// Score the current question and log the answer.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveRun`, `AlreadyAnswered`, or a storage error. State is
    /// unchanged when the answer cannot be persisted.
    pub async fn answer(
        &self,
        state: &mut AdventureState,
        choice: AnswerChoice,
    ) -> Result<AnswerFeedback, AdventureError> {
        let student = state.require_player()?.id.clone();
        let run = state.run.as_ref().ok_or(AdventureError::NoActiveRun)?;
        if run.phase() != RunPhase::Prompt {
            return Err(AdventureError::AlreadyAnswered);
        }
        let question = run.current_question().ok_or(AdventureError::NoActiveRun)?;
        let record = AnswerRecord::new(question, choice, self.clock.now());
        let realm = run.chapter().realm;

        self.answers.append_answer(&student, &record).await?;

        let correct = record.is_correct();
        let correct_choice = record.correct;
        let xp_awarded = if correct { self.rules.per_correct } else { 0 };
        let streak = state.streak.record(correct);
        state.xp.award(xp_awarded);
        let reaction = narration::answer_reaction(realm, correct, &mut *self.rng());
        if let Some(run) = state.run.as_mut() {
            run.record(choice, correct, xp_awarded, reaction.clone());
        }
        log::debug!(
            "{student} answered {} with {choice}: {}",
            record.question_id,
            if correct { "correct" } else { "wrong" }
        );
        state.answers.push(record);

        Ok(AnswerFeedback {
            correct,
            correct_choice,
            xp_awarded,
            streak,
            reaction,
        })
    }

    /// Continue after feedback: next question, or finish the chapter.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveRun`, `NotAnswered`, or a storage error.
    pub async fn advance(&self, state: &mut AdventureState) -> Result<Advance, AdventureError> {
        let run = state.run.as_mut().ok_or(AdventureError::NoActiveRun)?;
        if run.phase() == RunPhase::Prompt {
            return Err(AdventureError::NotAnswered);
        }
        if run.next() {
            return Ok(Advance::NextQuestion);
        }

        let outcome = self.finish_run(state, true).await?;
        state.screen = Screen::ChapterResults(outcome.chapter);
        Ok(Advance::Completed(outcome))
    }

    /// Start a fresh attempt of the chapter that just finished.
    ///
    /// # Errors
    ///
    /// Returns `NothingToRetry` if no chapter has finished yet.
    pub fn retry_chapter(&self, state: &mut AdventureState) -> Result<(), AdventureError> {
        let chapter = state
            .last_outcome
            .as_ref()
            .map(|o| o.chapter)
            .ok_or(AdventureError::NothingToRetry)?;
        self.start_chapter(state, chapter)
    }

    /// Abandon the current chapter and return to its realm.
    ///
    /// A run with every question answered is scored like a finished one. A
    /// partial run with at least one answer is logged as a failed attempt.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveRun` or a storage error.
    pub async fn leave_chapter(
        &self,
        state: &mut AdventureState,
    ) -> Result<Option<ChapterOutcome>, AdventureError> {
        let run = state.run.as_ref().ok_or(AdventureError::NoActiveRun)?;
        let realm = run.chapter().realm;
        let completed = run.answered() as usize == run.total();
        let outcome = if run.answered() > 0 {
            Some(self.finish_run(state, completed).await?)
        } else {
            state.run = None;
            None
        };
        state.screen = Screen::ChapterSelect(realm);
        Ok(outcome)
    }

    /// Evaluate the active run, award bonuses once, and append its score entry.
    async fn finish_run(
        &self,
        state: &mut AdventureState,
        completed: bool,
    ) -> Result<ChapterOutcome, AdventureError> {
        let player = state.require_player()?.clone();
        let run = state.run.as_ref().ok_or(AdventureError::NoActiveRun)?;
        let chapter = run.chapter();
        let (correct, answered) = (run.correct(), run.answered());

        let passed = completed && self.policy.is_passing(correct, answered, run.available());
        let first_pass = passed && !state.rewarded_chapters.contains(&chapter);

        let mut progress = state.progress.clone();
        progress.record_attempt(chapter, correct, answered, passed);
        let realm_mastered = !state.mastered_realms.contains(&chapter.realm)
            && progress.is_realm_mastered(chapter.realm, &self.bank.available_chapters(chapter.realm));

        let mut bonus = 0;
        if first_pass {
            bonus += self.rules.chapter_pass;
        }
        if realm_mastered {
            bonus += self.rules.realm_mastery;
        }

        let now = self.clock.now();
        let time_spent_secs = elapsed_secs(run.started_at(), now);
        let xp_earned = run.xp_earned() + bonus;
        let entry = ScoreEntry::new(
            player.id.clone(),
            player.name.clone(),
            chapter,
            correct,
            answered,
            xp_earned,
            passed,
            state.streak.current(),
            time_spent_secs,
            now,
        )?;

        self.scores.append_score(&entry).await?;

        state.progress = progress;
        state.xp.award(bonus);
        if first_pass {
            state.rewarded_chapters.insert(chapter);
        }
        if realm_mastered {
            state.mastered_realms.insert(chapter.realm);
            log::info!("{} mastered {}", player.id, chapter.realm);
        }

        let narration =
            narration::chapter_verdict(chapter.realm, entry.accuracy(), passed, &mut *self.rng());
        let outcome = ChapterOutcome {
            chapter,
            correct,
            total: answered,
            passed,
            first_pass,
            realm_mastered,
            xp_earned,
            time_spent_secs,
            completed_at: now,
            narration,
        };
        log::info!(
            "{} finished {chapter}: {correct}/{answered}, passed={passed}, +{xp_earned} XP",
            player.id
        );

        state.run = None;
        state.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }
}
