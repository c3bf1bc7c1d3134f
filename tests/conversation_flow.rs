//! End-to-end tests for the guided conversation.
//!
//! These tests drive the controller through its public API:
//! 1. Opening message moves Welcome to Philosophy
//! 2. Neutral turns or a trigger phrase schedule the reveal
//! 3. Reveal appends the announcement and the instructor follow-up
//! 4. Report decodes the model's JSON and closes the conversation
//! 5. Reset returns to a clean Welcome state
//!
//! Uses the mock chat client so no network access is needed.

use std::sync::Arc;
use std::time::Duration;

use kinoko_sensei::adapters::ai::MockChatClient;
use kinoko_sensei::application::{
    ConversationController, ConversationSettings, RevealOutcome, TurnOutcome,
};
use kinoko_sensei::domain::conversation::configs::{PHILOSOPHY_FALLBACKS, REVEAL_MARKER_TEXT};
use kinoko_sensei::domain::conversation::{
    AnalysisReport, ConversationState, Phase, RevealPolicy, Role, TurnRole,
};
use kinoko_sensei::ports::GenerationError;

// =============================================================================
// Test Infrastructure
// =============================================================================

const REPORT_JSON: &str = r#"```json
{
  "summary": "You feel stuck between ambition and doubt.",
  "problem_definition": "Goals are too large to start on.",
  "it_tips": ["Split the work into small tickets", "Ship a prototype first"],
  "next_step": "Pick one ticket and finish it this week."
}
```"#;

fn build(client: MockChatClient) -> (ConversationController<MockChatClient>, Arc<MockChatClient>) {
    let client = Arc::new(client);
    let controller =
        ConversationController::new(Arc::clone(&client), ConversationSettings::immediate());
    (controller, client)
}

async fn reveal(controller: &ConversationController<MockChatClient>) {
    match controller.enter_reveal().await.unwrap() {
        RevealOutcome::Entered { follow_up, .. } => {
            follow_up.await.unwrap();
        }
        RevealOutcome::AlreadyRevealed => {}
    }
}

fn assert_invariants(state: &ConversationState) {
    assert_eq!(state.is_revealed(), matches!(state.phase(), Phase::Reveal | Phase::Report));
    let users = state
        .history()
        .iter()
        .filter(|m| m.role() == Role::User)
        .count();
    assert_eq!(state.user_turn_count(), users);
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn full_conversation_from_welcome_to_report() {
    let (controller, client) = build(
        MockChatClient::new()
            .with_response("What does lost feel like?")
            .with_response("And where does that feeling come from?")
            .with_response("Is stuck a place or a state?")
            .with_response("Let's debug that like a failing test.")
            .with_response(REPORT_JSON),
    );

    controller.start_conversation("I feel lost").await.unwrap();
    assert_invariants(&controller.snapshot().await);

    let second = controller.submit_user_message("I don't know").await.unwrap();
    assert!(second.reveal_after().is_none());

    let third = controller.submit_user_message("Like I'm stuck").await.unwrap();
    assert!(third.reveal_after().is_some());
    assert_invariants(&controller.snapshot().await);

    reveal(&controller).await;
    let state = controller.snapshot().await;
    assert_eq!(state.phase(), Phase::Reveal);
    assert_eq!(state.history().len(), 8);
    assert_eq!(state.history()[6].text(), REVEAL_MARKER_TEXT);
    assert_eq!(state.history()[7].text(), "Let's debug that like a failing test.");
    assert_invariants(&state);

    let report = controller.request_report().await.unwrap().unwrap();
    assert_eq!(report.summary(), "You feel stuck between ambition and doubt.");
    assert_eq!(report.tips().len(), 2);

    let state = controller.snapshot().await;
    assert_eq!(state.phase(), Phase::Report);
    assert_invariants(&state);

    let phases: Vec<Phase> = client.get_calls().iter().map(|c| c.phase).collect();
    assert_eq!(
        phases,
        vec![
            Phase::Philosophy,
            Phase::Philosophy,
            Phase::Philosophy,
            Phase::Reveal,
            Phase::Report
        ]
    );
}

#[tokio::test]
async fn model_never_sees_the_reveal_marker() {
    let (controller, client) = build(MockChatClient::new());
    controller.start_conversation("hello").await.unwrap();
    reveal(&controller).await;
    controller.submit_user_message("so what now").await.unwrap();
    controller.request_report().await.unwrap();

    for call in client.get_calls() {
        assert!(call.transcript.iter().all(|t| t.content != REVEAL_MARKER_TEXT));
        assert!(call
            .transcript
            .iter()
            .all(|t| matches!(t.role, TurnRole::User | TurnRole::Assistant)));
    }
}

#[tokio::test]
async fn messages_after_reveal_are_recorded_without_a_reply() {
    let (controller, client) = build(MockChatClient::new());
    controller.start_conversation("hello").await.unwrap();
    reveal(&controller).await;
    let calls_before = client.call_count();

    let outcome = controller.submit_user_message("ok thanks").await.unwrap();

    assert!(matches!(outcome, TurnOutcome::Recorded { .. }));
    assert_eq!(client.call_count(), calls_before);
    let state = controller.snapshot().await;
    assert_eq!(state.history().len(), 5);
    assert_eq!(state.history()[4].role(), Role::User);
    assert_invariants(&state);
}

#[tokio::test]
async fn trigger_phrase_reveals_on_first_reply() {
    let (controller, _) = build(MockChatClient::new());
    controller.start_conversation("I keep failing").await.unwrap();

    let outcome = controller
        .submit_user_message("Just tell me the answer")
        .await
        .unwrap();

    assert!(outcome.reveal_after().is_some());
}

#[tokio::test]
async fn custom_policy_raises_threshold() {
    let client = Arc::new(MockChatClient::new());
    let settings = ConversationSettings::immediate()
        .with_reveal_policy(RevealPolicy::new(4, vec!["hint".to_string()]));
    let controller = ConversationController::new(client, settings);

    controller.start_conversation("one").await.unwrap();
    controller.submit_user_message("two").await.unwrap();
    let third = controller.submit_user_message("three").await.unwrap();
    let fourth = controller.submit_user_message("four").await.unwrap();

    assert!(third.reveal_after().is_none());
    assert!(fourth.reveal_after().is_some());
}

#[tokio::test]
async fn provider_outage_never_breaks_the_flow() {
    let down = || GenerationError::unavailable("overloaded");
    let (controller, _) = build(
        MockChatClient::new()
            .with_error(down())
            .with_error(down())
            .with_error(down())
            .with_error(down()),
    );

    controller.start_conversation("hello").await.unwrap();
    let reply = controller.submit_user_message("help me").await.unwrap();
    assert!(PHILOSOPHY_FALLBACKS.contains(&reply.reply().unwrap().text()));

    reveal(&controller).await;
    let state = controller.snapshot().await;
    assert!(state.history().last().unwrap().is_reveal_marker());

    let report = controller.request_report().await.unwrap().unwrap();
    assert_eq!(report, AnalysisReport::generation_fallback());
}

#[tokio::test]
async fn reset_after_report_returns_to_clean_welcome() {
    let (controller, _) = build(MockChatClient::new());
    controller.start_conversation("hello").await.unwrap();
    reveal(&controller).await;
    controller.request_report().await.unwrap();

    controller.reset().await;

    let state = controller.snapshot().await;
    assert_eq!(state.phase(), Phase::Welcome);
    assert!(state.history().is_empty());
    assert!(!state.is_revealed());
    assert_eq!(state.user_turn_count(), 0);
    assert!(state.report().is_none());
}

#[tokio::test]
async fn stale_follow_up_does_not_leak_into_new_conversation() {
    let (controller, _) = build(
        MockChatClient::new()
            .with_response("Opening")
            .with_delayed_response("Old instructor reply", Duration::from_millis(100))
            .with_response("Fresh opening"),
    );
    controller.start_conversation("first run").await.unwrap();

    let RevealOutcome::Entered { follow_up, .. } = controller.enter_reveal().await.unwrap() else {
        panic!("expected a fresh reveal");
    };
    // Let the follow-up task issue its request before the new run starts.
    tokio::time::sleep(Duration::from_millis(10)).await;
    controller.reset().await;
    let restarted = controller.start_conversation("second run").await.unwrap();

    assert!(follow_up.await.unwrap().is_none());
    assert!(matches!(restarted, TurnOutcome::Replied { .. }));

    let state = controller.snapshot().await;
    assert_eq!(state.phase(), Phase::Philosophy);
    assert!(state
        .history()
        .iter()
        .all(|m| m.text() != "Old instructor reply"));
    assert_invariants(&state);
}
