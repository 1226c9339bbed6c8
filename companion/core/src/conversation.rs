//! Conversation Simulator
//!
//! An append-only chat log with a simulated assistant. Every user turn that
//! arrives while the assistant is idle starts a reply cycle:
//!
//! ```text
//!  Idle ──submit──→ Pending ──delay (1–2s)──→ Streaming ──last word──→ Idle
//!                                                │
//!                     user spoke meanwhile ←─────┘ (one follow-up cycle)
//! ```
//!
//! A cycle runs as a single tokio task driven by `interval_at`: the first tick
//! lands when the delay elapses and opens an empty assistant turn, and every
//! later tick reveals one word. The task is owned by a guard that aborts it
//! when the simulator is dropped, and it only holds a weak handle to the log.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::config::ConversationConfig;
use crate::messages::{ChatTurn, Speaker, TurnId};

// ============================================================================
// State
// ============================================================================

/// Where the assistant is in its reply cycle
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponsePhase {
    /// No reply scheduled
    #[default]
    Idle,
    /// Waiting out the reply delay
    Pending,
    /// Revealing words into a turn
    Streaming {
        /// Turn being written
        turn: TurnId,
    },
}

impl ResponsePhase {
    /// Check if a reply cycle is underway
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Check if words are being revealed
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Streaming { .. })
    }
}

/// Chat log plus reply-cycle phase
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationState {
    turns: Vec<ChatTurn>,
    phase: ResponsePhase,
}

impl ConversationState {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log pre-seeded with earlier turns
    #[must_use]
    pub fn with_history(turns: Vec<ChatTurn>) -> Self {
        Self {
            turns,
            phase: ResponsePhase::Idle,
        }
    }

    /// All turns, oldest first
    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Current reply phase
    #[must_use]
    pub fn phase(&self) -> &ResponsePhase {
        &self.phase
    }

    /// Whether a reply cycle is underway
    #[must_use]
    pub fn is_assistant_responding(&self) -> bool {
        self.phase.is_active()
    }

    /// Speaker of the newest turn
    #[must_use]
    pub fn last_speaker(&self) -> Option<Speaker> {
        self.turns.last().map(|t| t.speaker)
    }

    fn push_user(&mut self, text: &str) -> TurnId {
        let turn = ChatTurn::user(text);
        let id = turn.id.clone();
        self.turns.push(turn);
        id
    }

    /// Enter `Pending` if idle; returns whether a new cycle should start
    fn begin_pending(&mut self) -> bool {
        if self.phase.is_active() {
            return false;
        }
        self.phase = ResponsePhase::Pending;
        true
    }

    fn open_assistant_turn(&mut self) -> TurnId {
        let turn = ChatTurn::assistant(String::new());
        let id = turn.id.clone();
        self.turns.push(turn);
        self.phase = ResponsePhase::Streaming { turn: id.clone() };
        id
    }

    fn reveal_word(&mut self, word: &str) {
        let ResponsePhase::Streaming { ref turn } = self.phase else {
            return;
        };
        if let Some(streaming) = self.turns.iter_mut().rev().find(|t| &t.id == turn) {
            if !streaming.text.is_empty() {
                streaming.text.push(' ');
            }
            streaming.text.push_str(word);
        }
    }

    /// Close the cycle; returns `true` (staying `Pending`) when the user spoke
    /// after the reply opened and a follow-up is due
    fn finish_cycle(&mut self) -> bool {
        if self.last_speaker() == Some(Speaker::User) {
            self.phase = ResponsePhase::Pending;
            true
        } else {
            self.phase = ResponsePhase::Idle;
            false
        }
    }
}

// ============================================================================
// Responder
// ============================================================================

/// Reply pool, timing and the injected randomness
struct Responder {
    responses: Vec<String>,
    delay_min_ms: u64,
    delay_max_ms: u64,
    word_interval: Duration,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl Responder {
    fn new(config: &ConversationConfig, rng: Box<dyn RngCore + Send>) -> Self {
        let a = duration_ms(config.response_delay_min);
        let b = duration_ms(config.response_delay_max);
        Self {
            responses: config.responses.clone(),
            delay_min_ms: a.min(b),
            delay_max_ms: a.max(b),
            word_interval: config.word_interval.max(Duration::from_millis(1)),
            rng: Mutex::new(rng),
        }
    }

    /// Draw a delay and a reply
    fn draw(&self) -> (Duration, String) {
        let mut rng = self.rng.lock();
        let delay = rng.gen_range(self.delay_min_ms..=self.delay_max_ms);
        let reply = self.responses.choose(&mut *rng).cloned().unwrap_or_default();
        (Duration::from_millis(delay), reply)
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Aborts the reply task when dropped
#[derive(Debug)]
struct ResponseGuard(AbortHandle);

impl Drop for ResponseGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

// ============================================================================
// Simulator
// ============================================================================

/// Owns the chat log and drives simulated assistant replies
///
/// Surfaces read through [`snapshot`](Self::snapshot) or
/// [`subscribe`](Self::subscribe); only the simulator writes.
pub struct ConversationSimulator {
    state: Arc<watch::Sender<ConversationState>>,
    responder: Arc<Responder>,
    task: Option<ResponseGuard>,
}

impl std::fmt::Debug for ConversationSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationSimulator")
            .field("turns", &self.state.borrow().turns.len())
            .field("phase", &self.state.borrow().phase)
            .field("task", &self.task)
            .finish_non_exhaustive()
    }
}

impl ConversationSimulator {
    /// Create a simulator with an entropy-seeded RNG
    #[must_use]
    pub fn new(config: &ConversationConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a simulator drawing delays and replies from `rng`
    #[must_use]
    pub fn with_rng<R>(config: &ConversationConfig, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Self::with_history(config, rng, Vec::new())
    }

    /// Create a simulator whose log starts with earlier turns
    ///
    /// History can only be supplied here, so it never races a reply cycle.
    #[must_use]
    pub fn with_history<R>(config: &ConversationConfig, rng: R, turns: Vec<ChatTurn>) -> Self
    where
        R: RngCore + Send + 'static,
    {
        let (state, _) = watch::channel(ConversationState::with_history(turns));
        Self {
            state: Arc::new(state),
            responder: Arc::new(Responder::new(config, Box::new(rng))),
            task: None,
        }
    }

    /// Append a user turn and, if the assistant is idle, schedule a reply
    ///
    /// Returns `None` without touching the log when `text` is blank.
    ///
    /// # Panics
    ///
    /// Starting a reply spawns a tokio task, so this must be called from
    /// within a Tokio runtime.
    pub fn submit_user_turn(&mut self, text: &str) -> Option<TurnId> {
        if text.trim().is_empty() {
            trace!("Ignoring blank chat submission");
            return None;
        }

        let mut id = None;
        let mut start_cycle = false;
        self.state.send_modify(|state| {
            id = Some(state.push_user(text));
            start_cycle = state.begin_pending();
        });

        if start_cycle {
            self.spawn_cycle();
        } else {
            debug!("Assistant already responding; user turn queued for follow-up");
        }
        id
    }

    fn spawn_cycle(&mut self) {
        let state = Arc::downgrade(&self.state);
        let responder = Arc::clone(&self.responder);
        let handle = tokio::spawn(run_reply_cycles(state, responder));
        self.task = Some(ResponseGuard(handle.abort_handle()));
    }

    /// Copy of the current log and phase
    #[must_use]
    pub fn snapshot(&self) -> ConversationState {
        self.state.borrow().clone()
    }

    /// Copy of the current turns
    #[must_use]
    pub fn turns(&self) -> Vec<ChatTurn> {
        self.state.borrow().turns.clone()
    }

    /// Number of turns in the log
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().turns.len()
    }

    /// Whether the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.borrow().turns.is_empty()
    }

    /// Current reply phase
    #[must_use]
    pub fn phase(&self) -> ResponsePhase {
        self.state.borrow().phase.clone()
    }

    /// Whether a reply cycle is underway
    #[must_use]
    pub fn is_assistant_responding(&self) -> bool {
        self.state.borrow().is_assistant_responding()
    }

    /// Watch the log; the receiver is notified on every change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.state.subscribe()
    }
}

/// Run reply cycles until one closes without a pending follow-up
async fn run_reply_cycles(
    state: Weak<watch::Sender<ConversationState>>,
    responder: Arc<Responder>,
) {
    loop {
        let (delay, reply) = responder.draw();
        let words: Vec<&str> = reply.split_whitespace().collect();
        debug!(
            delay_ms = duration_ms(delay),
            words = words.len(),
            "Assistant reply scheduled"
        );

        let mut ticker = interval_at(Instant::now() + delay, responder.word_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        ticker.tick().await;
        let Some(sender) = state.upgrade() else {
            return;
        };
        sender.send_modify(|s| {
            s.open_assistant_turn();
        });
        drop(sender);

        for word in &words {
            ticker.tick().await;
            let Some(sender) = state.upgrade() else {
                return;
            };
            sender.send_modify(|s| s.reveal_word(word));
        }

        let Some(sender) = state.upgrade() else {
            return;
        };
        let mut follow_up = false;
        sender.send_modify(|s| follow_up = s.finish_cycle());
        if !follow_up {
            debug!("Assistant reply complete");
            return;
        }
        debug!("User spoke during reply; starting follow-up");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_phase_checks() {
        assert!(!ResponsePhase::Idle.is_active());
        assert!(ResponsePhase::Pending.is_active());
        let streaming = ResponsePhase::Streaming {
            turn: TurnId::new(),
        };
        assert!(streaming.is_active());
        assert!(streaming.is_streaming());
    }

    #[test]
    fn test_state_cycle_transitions() {
        let mut state = ConversationState::new();
        state.push_user("hello");
        assert!(state.begin_pending());
        assert!(!state.begin_pending());

        let id = state.open_assistant_turn();
        assert_eq!(state.phase(), &ResponsePhase::Streaming { turn: id });
        state.reveal_word("Great");
        state.reveal_word("idea!");
        assert_eq!(state.turns()[1].text, "Great idea!");

        assert!(!state.finish_cycle());
        assert_eq!(state.phase(), &ResponsePhase::Idle);
    }

    #[test]
    fn test_finish_cycle_requests_follow_up() {
        let mut state = ConversationState::new();
        state.push_user("first");
        state.begin_pending();
        state.open_assistant_turn();
        state.push_user("second");

        assert!(state.finish_cycle());
        assert_eq!(state.phase(), &ResponsePhase::Pending);
    }

    #[test]
    fn test_reveal_word_without_stream_is_ignored() {
        let mut state = ConversationState::with_history(vec![ChatTurn::assistant("done")]);
        state.reveal_word("extra");
        assert_eq!(state.turns()[0].text, "done");
    }

    #[test]
    fn test_responder_draws_within_bounds() {
        let config = ConversationConfig::default();
        let responder = Responder::new(&config, Box::new(StdRng::seed_from_u64(7)));
        for _ in 0..50 {
            let (delay, reply) = responder.draw();
            assert!(delay >= Duration::from_millis(1000));
            assert!(delay <= Duration::from_millis(2000));
            assert!(config.responses.contains(&reply));
        }
    }

    #[test]
    fn test_responder_is_deterministic_for_seed() {
        let config = ConversationConfig::default();
        let a = Responder::new(&config, Box::new(StdRng::seed_from_u64(42)));
        let b = Responder::new(&config, Box::new(StdRng::seed_from_u64(42)));
        for _ in 0..10 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_blank_submission_needs_no_runtime() {
        let mut sim = ConversationSimulator::new(&ConversationConfig::default());
        assert!(sim.submit_user_turn("").is_none());
        assert!(sim.submit_user_turn("   \t\n").is_none());
        assert!(sim.is_empty());
        assert!(!sim.is_assistant_responding());
    }

    #[test]
    fn test_with_history_seeds_log() {
        let sim = ConversationSimulator::with_history(
            &ConversationConfig::default(),
            StdRng::seed_from_u64(3),
            vec![ChatTurn::user("hey"), ChatTurn::assistant("hi!")],
        );
        assert_eq!(sim.len(), 2);
        assert_eq!(sim.phase(), ResponsePhase::Idle);
        assert_eq!(sim.turns()[1].text, "hi!");
    }

    #[tokio::test(start_paused = true)]
    async fn test_seeded_history_then_reply_cycle() {
        let config = ConversationConfig {
            response_delay_min: Duration::from_millis(1000),
            response_delay_max: Duration::from_millis(1000),
            word_interval: Duration::from_millis(150),
            responses: vec!["sure thing".to_string()],
        };
        let mut sim = ConversationSimulator::with_history(
            &config,
            StdRng::seed_from_u64(3),
            vec![ChatTurn::user("hey"), ChatTurn::assistant("hi!")],
        );

        sim.submit_user_turn("plan the party?");
        assert_eq!(sim.phase(), ResponsePhase::Pending);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let turns = sim.turns();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[1].text, "hi!");
        assert_eq!(turns[3].text, "sure thing");
        assert_eq!(sim.phase(), ResponsePhase::Idle);
    }
}
