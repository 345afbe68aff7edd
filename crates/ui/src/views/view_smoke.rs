use adventure_core::model::{AnswerChoice, Realm};
use services::AdventureState;

use super::test_harness::{Fixture, ViewKind, grammar_easy};

#[tokio::test(flavor = "current_thread")]
async fn intro_view_smoke_asks_for_a_name() {
    let fixture = Fixture::new();
    let mut harness = fixture.mount(ViewKind::Adventure, AdventureState::new());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("The Kingdom of Words"), "missing title in {html}");
    assert!(html.contains("Begin the adventure"), "missing button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn realm_map_smoke_lists_realms() {
    let fixture = Fixture::new();
    let state = fixture.begun("Alex").await;
    let mut harness = fixture.mount(ViewKind::Adventure, state);
    harness.rebuild();
    let html = harness.render();
    for realm in Realm::ALL {
        assert!(html.contains(realm.display_name()), "missing {realm} in {html}");
    }
    assert!(html.contains("0 of 1 chapters passed"), "missing progress in {html}");
    assert!(html.contains("No chapters yet"), "missing empty realm in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn chapter_select_smoke_marks_empty_chapters() {
    let fixture = Fixture::new();
    let mut state = fixture.begun("Alex").await;
    fixture.adventure().open_realm(&mut state, Realm::Grammar).unwrap();
    let mut harness = fixture.mount(ViewKind::Adventure, state);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("The Whispering Woods"), "missing chapter in {html}");
    assert!(html.contains("4 questions"), "missing count in {html}");
    assert!(html.contains("Sealed"), "missing sealed chapter in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn chapter_view_smoke_shows_question_then_feedback() {
    let fixture = Fixture::new();
    let mut state = fixture.begun("Alex").await;
    let adventure = fixture.adventure();
    adventure.start_chapter(&mut state, grammar_easy()).unwrap();

    let mut harness = fixture.mount(ViewKind::Adventure, state.clone());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Question 1 of 4"), "missing position in {html}");
    assert!(html.contains("Grammar question"), "missing prompt in {html}");
    assert!(html.contains("Sunlight slants through the oaks"), "missing intro in {html}");
    assert!(html.contains("question-frame"), "missing frame in {html}");
    assert!(!html.contains("Next question"), "feedback shown too early in {html}");

    adventure.answer(&mut state, AnswerChoice::B).await.unwrap();
    let mut harness = fixture.mount(ViewKind::Adventure, state);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("The answer was A: goes"), "missing feedback in {html}");
    assert!(html.contains("Next question"), "missing continue in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_smoke_reports_pass() {
    let fixture = Fixture::new();
    let mut state = fixture.begun("Alex").await;
    fixture.play_chapter(&mut state).await;

    let mut harness = fixture.mount(ViewKind::Adventure, state);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Chapter passed!"), "missing verdict in {html}");
    assert!(html.contains("100.0%"), "missing accuracy in {html}");
    assert!(html.contains("Grammar Grove mastered"), "missing badge in {html}");
    assert!(html.contains("Try this chapter again"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn journal_view_smoke_renders_totals_and_advice() {
    let fixture = Fixture::new();
    let mut state = fixture.begun("Alex").await;
    fixture.play_chapter(&mut state).await;
    fixture.adventure().open_journal(&mut state).unwrap();

    let mut harness = fixture.mount(ViewKind::Adventure, state);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Journal"), "missing title in {html}");
    assert!(html.contains("4 of 4 answers correct"), "missing totals in {html}");
    assert!(html.contains("The oracle is still listening"), "missing oracle in {html}");
    assert!(html.contains("The Whispering Woods"), "missing history in {html}");
    assert!(html.contains("New explorer with 1 chapter passed"), "missing insight in {html}");
    assert!(html.contains("Strong in: Grammar Grove"), "missing strength in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn records_view_smoke_lists_attempts() {
    let fixture = Fixture::new();
    let mut state = fixture.begun("Sam").await;
    fixture.play_chapter(&mut state).await;

    let mut harness = fixture.mount(ViewKind::Records, AdventureState::new());
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Hall of Records"), "missing title in {html}");
    assert!(html.contains("Sam"), "missing explorer in {html}");
    assert!(html.contains("+710 XP"), "missing xp in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn records_view_smoke_handles_empty_log() {
    let fixture = Fixture::new();
    assert!(fixture.storage.scores.list_all_scores(None).await.unwrap().is_empty());
    let mut harness = fixture.mount(ViewKind::Records, AdventureState::new());
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("No chapters have been finished yet."), "missing empty state in {html}");
}
