//! Timing tests for the simulated assistant
//!
//! All tests run on a paused tokio clock, so `sleep` in the test body jumps
//! virtual time and the reply task's interval ticks fire in deadline order.
//! With a fixed 1000ms delay and a 150ms word interval the schedule is exact:
//!
//! ```text
//! t=0     user turn appended, phase Pending
//! t=1000  empty assistant turn appended, phase Streaming
//! t=1150  "one"
//! t=1300  "one two"
//! t=1450  "one two three", phase Idle
//! ```

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::sleep;

use companion_core::config::{ConversationConfig, DEFAULT_RESPONSES};
use companion_core::{
    ActiveTab, AppState, CompanionConfig, ConversationSimulator, ManualClock, ResponsePhase,
    Speaker, Submission,
};

// =============================================================================
// Helpers
// =============================================================================

fn fixed_config() -> ConversationConfig {
    ConversationConfig {
        response_delay_min: Duration::from_millis(1000),
        response_delay_max: Duration::from_millis(1000),
        word_interval: Duration::from_millis(150),
        responses: vec!["one two three".to_string()],
    }
}

fn fixed_simulator() -> ConversationSimulator {
    ConversationSimulator::with_rng(&fixed_config(), StdRng::seed_from_u64(0))
}

async fn at_ms(ms: u64) {
    sleep(Duration::from_millis(ms)).await;
}

fn texts(sim: &ConversationSimulator) -> Vec<(Speaker, String)> {
    sim.turns().into_iter().map(|t| (t.speaker, t.text)).collect()
}

// =============================================================================
// Turn-taking
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_user_turn_appended_immediately() {
    let mut sim = fixed_simulator();
    let id = sim.submit_user_turn("hello").expect("accepted");

    let turns = sim.turns();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].id, id);
    assert_eq!(turns[0].text, "hello");
    assert_eq!(sim.phase(), ResponsePhase::Pending);
    assert!(sim.is_assistant_responding());
}

#[tokio::test(start_paused = true)]
async fn test_reply_streams_word_by_word() {
    let mut sim = fixed_simulator();
    sim.submit_user_turn("hello");

    at_ms(999).await;
    assert_eq!(sim.len(), 1, "no reply before the delay");

    at_ms(2).await; // t=1001
    assert_eq!(sim.len(), 2);
    assert_eq!(texts(&sim)[1], (Speaker::Assistant, String::new()));
    assert!(sim.phase().is_streaming());

    at_ms(150).await; // t=1151
    assert_eq!(texts(&sim)[1].1, "one");

    at_ms(150).await; // t=1301
    assert_eq!(texts(&sim)[1].1, "one two");
    assert!(sim.is_assistant_responding());

    at_ms(150).await; // t=1451
    assert_eq!(texts(&sim)[1].1, "one two three");
    assert_eq!(sim.phase(), ResponsePhase::Idle);
    assert!(!sim.is_assistant_responding());
}

#[tokio::test(start_paused = true)]
async fn test_default_reply_is_a_stock_response_verbatim() {
    let config = ConversationConfig::default();
    let mut sim = ConversationSimulator::with_rng(&config, StdRng::seed_from_u64(42));
    let longest = DEFAULT_RESPONSES
        .iter()
        .map(|r| r.split_whitespace().count() as u64)
        .max()
        .unwrap_or(0);

    sim.submit_user_turn("hello");
    at_ms(999).await;
    assert_eq!(sim.len(), 1);

    at_ms(1001 + longest * 150 + 1).await;
    assert!(!sim.is_assistant_responding());

    let turns = sim.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].speaker, Speaker::Assistant);
    assert!(
        DEFAULT_RESPONSES.contains(&turns[1].text.as_str()),
        "unexpected reply {:?}",
        turns[1].text
    );
}

#[tokio::test(start_paused = true)]
async fn test_same_seed_same_reply() {
    let config = ConversationConfig::default();
    let mut a = ConversationSimulator::with_rng(&config, StdRng::seed_from_u64(9));
    let mut b = ConversationSimulator::with_rng(&config, StdRng::seed_from_u64(9));

    a.submit_user_turn("hi");
    b.submit_user_turn("hi");
    at_ms(10_000).await;

    assert_eq!(a.turns()[1].text, b.turns()[1].text);
}

// =============================================================================
// Re-entrancy
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_submissions_while_pending_share_one_reply() {
    let mut sim = fixed_simulator();
    sim.submit_user_turn("first");

    at_ms(500).await;
    sim.submit_user_turn("second");
    sim.submit_user_turn("third");
    assert_eq!(sim.len(), 3, "user turns land immediately");

    at_ms(5_000).await;
    let speakers: Vec<Speaker> = sim.turns().iter().map(|t| t.speaker).collect();
    assert_eq!(
        speakers,
        vec![Speaker::User, Speaker::User, Speaker::User, Speaker::Assistant]
    );
    assert!(!sim.is_assistant_responding());
}

#[tokio::test(start_paused = true)]
async fn test_submissions_while_streaming_get_one_follow_up() {
    let mut sim = fixed_simulator();
    sim.submit_user_turn("first");

    at_ms(1200).await; // streaming, "one" revealed
    assert!(sim.phase().is_streaming());
    sim.submit_user_turn("second");
    sim.submit_user_turn("third");
    assert!(sim.phase().is_streaming(), "no concurrent cycle");

    at_ms(251).await; // t=1451: first reply done, follow-up pending
    assert_eq!(sim.phase(), ResponsePhase::Pending);
    let turns = texts(&sim);
    assert_eq!(turns.len(), 4);

    // Follow-up opens 1000ms after the first reply finished
    at_ms(998).await; // t=2449
    assert_eq!(sim.len(), 4);
    at_ms(2).await; // t=2451
    assert_eq!(sim.len(), 5);

    at_ms(2_000).await;
    let turns = texts(&sim);
    assert_eq!(
        turns,
        vec![
            (Speaker::User, "first".to_string()),
            (Speaker::Assistant, "one two three".to_string()),
            (Speaker::User, "second".to_string()),
            (Speaker::User, "third".to_string()),
            (Speaker::Assistant, "one two three".to_string()),
        ]
    );
    assert_eq!(sim.phase(), ResponsePhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_new_cycle_after_idle() {
    let mut sim = fixed_simulator();
    sim.submit_user_turn("first");
    at_ms(2_000).await;
    assert!(!sim.is_assistant_responding());

    sim.submit_user_turn("again");
    assert_eq!(sim.phase(), ResponsePhase::Pending);
    at_ms(2_000).await;
    assert_eq!(sim.len(), 4);
}

// =============================================================================
// Rejection, Observation, Cancellation
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_blank_input_leaves_log_unchanged() {
    let mut sim = fixed_simulator();
    assert!(sim.submit_user_turn("").is_none());
    assert!(sim.submit_user_turn("   ").is_none());

    at_ms(3_000).await;
    assert!(sim.is_empty());
    assert_eq!(sim.phase(), ResponsePhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_every_step() {
    let mut sim = fixed_simulator();
    let mut rx = sim.subscribe();

    sim.submit_user_turn("hello");
    assert!(rx.has_changed().unwrap());
    let _ = rx.borrow_and_update();

    at_ms(1001).await;
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().turns().len(), 2);

    at_ms(450).await;
    let state = rx.borrow_and_update().clone();
    assert_eq!(state.turns()[1].text, "one two three");
    assert!(!state.is_assistant_responding());
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_pending_reply() {
    let mut sim = fixed_simulator();
    let rx = sim.subscribe();
    sim.submit_user_turn("hello");

    at_ms(500).await;
    drop(sim);

    at_ms(5_000).await;
    assert!(rx.has_changed().is_err(), "sender released with the simulator");
    assert_eq!(rx.borrow().turns().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_drop_mid_stream_stops_mutation() {
    let mut sim = fixed_simulator();
    let rx = sim.subscribe();
    sim.submit_user_turn("hello");

    at_ms(1160).await; // "one" revealed
    drop(sim);

    at_ms(5_000).await;
    assert_eq!(rx.borrow().turns()[1].text, "one");
}

// =============================================================================
// AppState routing
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_app_state_routes_chat_submissions() {
    let mut config = CompanionConfig::default();
    config.conversation = fixed_config();
    let sim = ConversationSimulator::with_rng(&config.conversation, StdRng::seed_from_u64(3));
    let mut state = AppState::with_parts(&config, ManualClock::new(), sim);

    assert_eq!(state.active_tab(), ActiveTab::Chat);
    assert!(matches!(state.submit("hey"), Submission::Chat(_)));
    assert_eq!(state.submit("  "), Submission::Rejected);

    at_ms(2_000).await;
    assert_eq!(state.conversation().len(), 2);
    assert!(state.notes().is_empty());
}
