//! Per-event-type reconciliation: reduce each inbound event to store
//! mutations.
//!
//! Every handler is a partial merge — fields an event does not carry keep
//! their last known value — so frequent small events stay cheap while the
//! authoritative snapshots (`state_update`, `game_over`) correct any drift.

use mathtug_protocol::{GameStatus, ServerEvent};
use mathtug_state::{AnswerFeedback, SessionStore, StateDelta};

/// Apply one inbound event to the store.
///
/// The match is exhaustive over the closed event enum, so a new authority
/// event type is a compile-visible change here.
pub fn apply_event(store: &SessionStore, event: ServerEvent) {
    match event {
        ServerEvent::StateUpdate(snapshot) => {
            store.apply(StateDelta {
                team_a_score: Some(snapshot.team_a_score),
                team_b_score: Some(snapshot.team_b_score),
                rope_position: Some(snapshot.rope_position),
                timer: Some(snapshot.timer),
                status: Some(snapshot.status),
                winner: Some(snapshot.winner),
                ..StateDelta::default()
            });
            // The question is replaced only when the snapshot carries one; a
            // null question does not clear an active round's prompt.
            if let Some(question) = snapshot.current_question {
                store.set_question(Some(question));
            }
        }
        ServerEvent::GameStarted {} => {
            store.apply(StateDelta {
                status: Some(GameStatus::InProgress),
                ..StateDelta::default()
            });
        }
        ServerEvent::PlayerJoined(roster) | ServerEvent::PlayerLeft(roster) => {
            store.apply(StateDelta {
                team_a_count: Some(roster.team_a_count),
                team_b_count: Some(roster.team_b_count),
                ..StateDelta::default()
            });
        }
        ServerEvent::CorrectAnswer(score) => {
            store.apply(StateDelta {
                team_a_score: Some(score.team_a_score),
                team_b_score: Some(score.team_b_score),
                rope_position: Some(score.rope_position),
                last_correct_team: Some(score.team),
                ..StateDelta::default()
            });
        }
        ServerEvent::WrongAnswer(notice) => {
            store.apply(StateDelta {
                last_wrong_team: Some(notice.team),
                ..StateDelta::default()
            });
        }
        ServerEvent::AnswerResult(result) => {
            let feedback = if result.correct {
                AnswerFeedback::Correct
            } else {
                AnswerFeedback::Wrong
            };
            store.set_answer_feedback(Some(feedback));
        }
        ServerEvent::TimerTick(tick) => {
            store.set_timer(tick.timer);
        }
        ServerEvent::GameOver(report) => {
            store.apply(StateDelta {
                status: Some(GameStatus::Finished),
                winner: Some(report.winner),
                team_a_score: Some(report.team_a_score),
                team_b_score: Some(report.team_b_score),
                rope_position: Some(report.rope_position),
                ..StateDelta::default()
            });
        }
        ServerEvent::Unknown => {
            tracing::trace!("ignoring unrecognized event type");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use mathtug_protocol::{Question, Team, decode_event};

    fn apply_json(store: &SessionStore, frame: &str) {
        apply_event(store, decode_event(frame).unwrap());
    }

    #[tokio::test]
    async fn test_state_update_merges_six_fields_and_keeps_question() {
        let store = SessionStore::new();
        let prior = Question {
            id: "q-1".to_string(),
            question: "2 + 2".to_string(),
            difficulty: "easy".to_string(),
            time_limit: 10,
        };
        store.set_question(Some(prior.clone()));

        apply_json(
            &store,
            r#"{"type": "state_update", "data": {"team_a_score": 3, "team_b_score": 2,
                "rope_position": 1, "timer": 45, "status": "in_progress", "winner": null,
                "current_question": null}}"#,
        );

        let state = store.snapshot();
        assert_eq!(state.team_a_score, 3);
        assert_eq!(state.team_b_score, 2);
        assert_eq!(state.rope_position, 1);
        assert_eq!(state.timer, 45);
        assert_eq!(state.status, GameStatus::InProgress);
        assert_eq!(state.winner, None);
        assert_eq!(state.current_question, Some(prior));
    }

    #[tokio::test]
    async fn test_state_update_replaces_question_wholesale() {
        let store = SessionStore::new();
        store.set_question(Some(Question {
            id: "q-1".to_string(),
            question: "2 + 2".to_string(),
            difficulty: "easy".to_string(),
            time_limit: 10,
        }));

        apply_json(
            &store,
            r#"{"type": "state_update", "data": {"team_a_score": 1, "team_b_score": 0,
                "rope_position": 1, "timer": 40, "status": "in_progress", "winner": null,
                "current_question": {"id": "q-2", "question": "9 - 3", "difficulty": "easy",
                "time_limit": 10}}}"#,
        );

        assert_eq!(store.snapshot().current_question.unwrap().id, "q-2");
    }

    #[tokio::test]
    async fn test_game_started_only_touches_status() {
        let store = SessionStore::new();
        store.apply(StateDelta {
            team_a_count: Some(2),
            team_b_count: Some(2),
            ..StateDelta::default()
        });

        apply_json(&store, r#"{"type": "game_started", "data": {}}"#);

        let state = store.snapshot();
        assert_eq!(state.status, GameStatus::InProgress);
        assert_eq!((state.team_a_count, state.team_b_count), (2, 2));
    }

    #[tokio::test]
    async fn test_roster_events_overwrite_both_counts() {
        let store = SessionStore::new();
        apply_json(
            &store,
            r#"{"type": "player_joined", "data": {"username": "ada", "team": "A",
                "team_a_count": 1, "team_b_count": 0}}"#,
        );
        apply_json(
            &store,
            r#"{"type": "player_left", "data": {"username": "Unknown",
                "team_a_count": 0, "team_b_count": 0}}"#,
        );

        let state = store.snapshot();
        assert_eq!((state.team_a_count, state.team_b_count), (0, 0));
    }

    #[tokio::test]
    async fn test_correct_answer_updates_scores_and_accent() {
        let store = SessionStore::new();
        apply_json(
            &store,
            r#"{"type": "correct_answer", "data": {"team": "B", "username": "bob",
                "rope_position": -1, "team_a_score": 0, "team_b_score": 1}}"#,
        );

        let state = store.snapshot();
        assert_eq!(state.team_b_score, 1);
        assert_eq!(state.rope_position, -1);
        assert_eq!(state.last_correct_team, Some(Team::B));
        assert_eq!(state.last_wrong_team, None);
    }

    #[tokio::test]
    async fn test_wrong_answer_only_sets_accent() {
        let store = SessionStore::new();
        apply_json(
            &store,
            r#"{"type": "wrong_answer", "data": {"team": "A", "username": "ada"}}"#,
        );

        let state = store.snapshot();
        assert_eq!(state.last_wrong_team, Some(Team::A));
        assert_eq!(state.team_a_score, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_result_latest_wins_then_expires() {
        let store = SessionStore::new();
        apply_json(&store, r#"{"type": "answer_result", "data": {"correct": true}}"#);

        tokio::time::sleep(Duration::from_millis(500)).await;
        apply_json(
            &store,
            r#"{"type": "answer_result", "data": {"correct": false}}"#,
        );

        // t = 600 ms: latest write wins.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.snapshot().answer_feedback, Some(AnswerFeedback::Wrong));

        // t = 1750 ms (1250 ms after the second frame): absent.
        tokio::time::sleep(Duration::from_millis(1150)).await;
        tokio::task::yield_now().await;
        assert_eq!(store.snapshot().answer_feedback, None);
    }

    #[tokio::test]
    async fn test_timer_tick_overwrites_timer_only() {
        let store = SessionStore::new();
        store.apply(StateDelta {
            team_a_score: Some(4),
            ..StateDelta::default()
        });

        apply_json(&store, r#"{"type": "timer_tick", "data": {"timer": 17}}"#);

        let state = store.snapshot();
        assert_eq!(state.timer, 17);
        assert_eq!(state.team_a_score, 4);
    }

    #[tokio::test]
    async fn test_game_over_is_terminal_with_final_numbers() {
        let store = SessionStore::new();
        apply_json(
            &store,
            r#"{"type": "game_over", "data": {"winner": "A", "team_a_score": 10,
                "team_b_score": 4, "rope_position": 10}}"#,
        );

        let state = store.snapshot();
        assert_eq!(state.status, GameStatus::Finished);
        assert_eq!(state.winner, Some(Team::A));
        assert_eq!((state.team_a_score, state.team_b_score), (10, 4));
        assert_eq!(state.rope_position, 10);

        // A straggling tick after the terminal event is harmless: it only
        // moves the timer, never the finished status or the outcome.
        apply_json(&store, r#"{"type": "timer_tick", "data": {"timer": 0}}"#);
        let state = store.snapshot();
        assert_eq!(state.status, GameStatus::Finished);
        assert_eq!(state.winner, Some(Team::A));
    }

    #[tokio::test]
    async fn test_unknown_event_changes_nothing() {
        let store = SessionStore::new();
        let before = store.snapshot();
        apply_json(&store, r#"{"type": "confetti", "data": {"amount": 9000}}"#);
        assert_eq!(store.snapshot(), before);
    }
}
