//! The session state store: single source of truth, many readers, one
//! writer role.
//!
//! Mutations go through a [`watch`] channel so they are synchronous and
//! immediately visible; consumers either [`SessionStore::snapshot`] the
//! current state or [`SessionStore::subscribe`] for change notifications.
//! The only deferred mutation is the answer-feedback auto-clear, modeled as
//! a single cancellable task rather than independent racing timers.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use mathtug_protocol::{GameStatus, Identity, Question};

use crate::state::{AnswerFeedback, GameState, StateDelta};

/// How long answer feedback stays visible before the store clears it.
pub const FEEDBACK_CLEAR_DELAY: Duration = Duration::from_millis(1200);

/// Cheaply clonable handle to one session's state.
///
/// Construct one per game participation and pass it to the connection
/// manager and every consumer; there is no process-wide singleton.
#[derive(Clone)]
pub struct SessionStore {
    shared: Arc<Shared>,
}

struct Shared {
    state: watch::Sender<GameState>,
    /// Pending feedback-clear task; a newer set aborts the older one.
    feedback_clear: Mutex<Option<JoinHandle<()>>>,
}

impl SessionStore {
    /// Create a store in the idle default state.
    pub fn new() -> Self {
        let (state, _) = watch::channel(GameState::default());
        Self {
            shared: Arc::new(Shared {
                state,
                feedback_clear: Mutex::new(None),
            }),
        }
    }

    /// Seed the session with its identity and move to `Waiting`.
    ///
    /// Called exactly once per session, after the join/create flow returns.
    pub fn set_identity(&self, identity: Identity) {
        self.shared.state.send_modify(|state| {
            state.identity = identity;
            state.status = GameStatus::Waiting;
        });
    }

    /// Merge a partial update; fields the delta omits keep their value.
    pub fn apply(&self, delta: StateDelta) {
        self.shared.state.send_modify(|state| state.merge(delta));
    }

    /// Replace the active question wholesale (or clear it).
    pub fn set_question(&self, question: Option<Question>) {
        self.shared
            .state
            .send_modify(|state| state.current_question = question);
    }

    /// Overwrite the round timer.
    pub fn set_timer(&self, seconds: u32) {
        self.shared.state.send_modify(|state| state.timer = seconds);
    }

    /// Set (or clear) the answer feedback.
    ///
    /// Setting a concrete value schedules a one-shot clear back to `None`
    /// after [`FEEDBACK_CLEAR_DELAY`]; each call supersedes any pending
    /// clear. Must be called from within a Tokio runtime when setting a
    /// concrete value.
    pub fn set_answer_feedback(&self, feedback: Option<AnswerFeedback>) {
        let mut pending = self
            .shared
            .feedback_clear
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = pending.take() {
            task.abort();
        }

        self.shared
            .state
            .send_modify(|state| state.answer_feedback = feedback);

        if feedback.is_some() {
            let store = self.clone();
            *pending = Some(tokio::spawn(async move {
                tokio::time::sleep(FEEDBACK_CLEAR_DELAY).await;
                store
                    .shared
                    .state
                    .send_modify(|state| state.answer_feedback = None);
            }));
        }
    }

    /// Discard everything, identity included, back to the idle default.
    pub fn reset(&self) {
        let mut pending = self
            .shared
            .feedback_clear
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = pending.take() {
            task.abort();
        }
        drop(pending);

        self.shared.state.send_replace(GameState::default());
        tracing::debug!("session store reset to idle");
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> GameState {
        self.shared.state.borrow().clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.shared.state.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathtug_protocol::Team;

    fn identity() -> Identity {
        Identity {
            room_id: "room-1".to_string(),
            room_code: "AB12CD".to_string(),
            player_id: "player-1".to_string(),
            user_id: "user-1".to_string(),
            username: "ada".to_string(),
            team: Team::A,
        }
    }

    #[tokio::test]
    async fn test_set_identity_moves_to_waiting() {
        let store = SessionStore::new();
        store.set_identity(identity());

        let state = store.snapshot();
        assert_eq!(state.status, GameStatus::Waiting);
        assert_eq!(state.identity.username, "ada");
    }

    #[tokio::test]
    async fn test_apply_is_a_partial_merge() {
        let store = SessionStore::new();
        store.apply(StateDelta {
            team_a_score: Some(5),
            rope_position: Some(-2),
            ..StateDelta::default()
        });
        store.apply(StateDelta {
            timer: Some(30),
            ..StateDelta::default()
        });

        let state = store.snapshot();
        assert_eq!(state.team_a_score, 5);
        assert_eq!(state.rope_position, -2);
        assert_eq!(state.timer, 30);
    }

    #[tokio::test]
    async fn test_reset_then_seed_equals_fresh_session() {
        let dirty = SessionStore::new();
        dirty.set_identity(identity());
        dirty.apply(StateDelta {
            status: Some(GameStatus::InProgress),
            team_a_score: Some(7),
            winner: Some(Some(Team::B)),
            ..StateDelta::default()
        });
        dirty.set_timer(9);
        dirty.reset();
        dirty.set_identity(identity());

        let fresh = SessionStore::new();
        fresh.set_identity(identity());

        assert_eq!(dirty.snapshot(), fresh.snapshot());
    }

    #[tokio::test]
    async fn test_mutations_are_immediately_visible() {
        let store = SessionStore::new();
        let rx = store.subscribe();

        store.set_timer(42);
        // No await between the mutation and the read.
        assert_eq!(rx.borrow().timer, 42);
    }

    #[tokio::test]
    async fn test_subscriber_sees_changes() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        store.set_timer(99);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().timer, 99);
    }

    #[tokio::test(start_paused = true)]
    async fn test_feedback_clears_after_delay() {
        let store = SessionStore::new();
        store.set_answer_feedback(Some(AnswerFeedback::Correct));

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(
            store.snapshot().answer_feedback,
            Some(AnswerFeedback::Correct),
            "feedback must still read Correct strictly before the delay elapses"
        );

        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert_eq!(store.snapshot().answer_feedback, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_feedback_supersedes_pending_clear() {
        let store = SessionStore::new();
        store.set_answer_feedback(Some(AnswerFeedback::Correct));

        tokio::time::sleep(Duration::from_millis(500)).await;
        store.set_answer_feedback(Some(AnswerFeedback::Wrong));

        // t = 600 ms from the first set: the latest write wins.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.snapshot().answer_feedback, Some(AnswerFeedback::Wrong));

        // t = 1400 ms: the first set's clear was aborted, the second has not
        // fired yet (it fires at 1700 ms).
        tokio::time::sleep(Duration::from_millis(800)).await;
        tokio::task::yield_now().await;
        assert_eq!(store.snapshot().answer_feedback, Some(AnswerFeedback::Wrong));

        // t = 1750 ms: cleared.
        tokio::time::sleep(Duration::from_millis(350)).await;
        tokio::task::yield_now().await;
        assert_eq!(store.snapshot().answer_feedback, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_clear_cancels_pending_task() {
        let store = SessionStore::new();
        store.set_answer_feedback(Some(AnswerFeedback::Wrong));
        store.set_answer_feedback(None);
        assert_eq!(store.snapshot().answer_feedback, None);

        // Nothing fires later to resurrect or re-clear the field.
        store.set_answer_feedback(Some(AnswerFeedback::Correct));
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(
            store.snapshot().answer_feedback,
            Some(AnswerFeedback::Correct)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_aborts_pending_clear() {
        let store = SessionStore::new();
        store.set_answer_feedback(Some(AnswerFeedback::Correct));
        store.reset();

        store.set_answer_feedback(Some(AnswerFeedback::Wrong));
        tokio::time::sleep(Duration::from_millis(600)).await;
        // The pre-reset clear must not fire into the new session early.
        assert_eq!(store.snapshot().answer_feedback, Some(AnswerFeedback::Wrong));
    }
}
