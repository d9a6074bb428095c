//! Interactive game session: drive the realtime engine from stdin while a
//! store subscriber renders state transitions.

use tokio::io::{AsyncBufReadExt, BufReader};

use mathtug_client::{GameConnection, LinkState};
use mathtug_config::Config;
use mathtug_protocol::{ClientCommand, GameStatus};
use mathtug_rooms::RoomJoin;
use mathtug_state::{AnswerFeedback, GameState, SessionStore};

use crate::AppError;

/// Run one full game participation: seed the store, connect, drive until
/// the game ends or the user leaves, then release the transport and the
/// session state on every exit path.
pub async fn play(config: &Config, join: RoomJoin, username: String) -> Result<(), AppError> {
    let store = SessionStore::new();
    store.set_identity(join.into_identity(username));

    let mut connection = GameConnection::new(config.server.ws_url.clone(), store.clone());
    let result = match connection.connect().await {
        Ok(()) => drive(&mut connection, &store).await,
        Err(e) => Err(e.into()),
    };

    connection.disconnect();
    store.reset();
    result
}

async fn drive(connection: &mut GameConnection, store: &SessionStore) -> Result<(), AppError> {
    println!("type \"start\" to begin, a number to answer, \"quit\" to leave");

    let mut state_rx = store.subscribe();
    let mut link_rx = connection.watch_link();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = state_rx.borrow_and_update().clone();
                render(&state);
                if state.status == GameStatus::Finished {
                    break;
                }
            }
            changed = link_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                if *link_rx.borrow_and_update() == LinkState::Disconnected {
                    tracing::info!("link lost, leaving session");
                    break;
                }
            }
            line = lines.next_line() => {
                match line? {
                    None => break,
                    Some(line) => {
                        if !handle_line(line.trim(), connection, store) {
                            break;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

/// Interpret one line of input. Returns `false` when the user leaves.
fn handle_line(line: &str, connection: &GameConnection, store: &SessionStore) -> bool {
    match line {
        "" => {}
        "quit" | "q" => return false,
        "start" => connection.send(ClientCommand::StartGame {}),
        other => match other.parse::<f64>() {
            Ok(answer) => match store.snapshot().current_question {
                Some(question) => connection.send(ClientCommand::Answer {
                    question_id: question.id,
                    answer,
                }),
                None => println!("no active question yet"),
            },
            Err(_) => println!("unrecognized input: {other:?}"),
        },
    }
    true
}

fn render(state: &GameState) {
    match state.status {
        GameStatus::Idle => {}
        GameStatus::Waiting => {
            println!(
                "waiting for players… A:{} B:{}",
                state.team_a_count, state.team_b_count
            );
        }
        GameStatus::InProgress => {
            println!(
                "A {:>2} {} {:<2} B   {:>3}s left",
                state.team_a_score,
                rope_gauge(state.rope_position),
                state.team_b_score,
                state.timer,
            );
            if let Some(question) = &state.current_question {
                println!("  solve: {}  ({})", question.question, question.difficulty);
            }
            match state.answer_feedback {
                Some(AnswerFeedback::Correct) => println!("  ✓ correct"),
                Some(AnswerFeedback::Wrong) => println!("  ✗ wrong"),
                None => {}
            }
        }
        GameStatus::Finished => match state.winner {
            Some(team) => println!(
                "game over — team {team} wins ({} : {})",
                state.team_a_score, state.team_b_score
            ),
            None => println!(
                "game over — draw ({} : {})",
                state.team_a_score, state.team_b_score
            ),
        },
    }
}

/// Render the rope as a 21-slot gauge; team A pulls the marker left.
fn rope_gauge(position: i32) -> String {
    let slot = (10 - position.clamp(-10, 10)) as usize;
    let mut gauge: Vec<char> = "··········|··········".chars().collect();
    gauge[slot] = 'o';
    gauge.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rope_gauge_neutral_is_centered() {
        let gauge = rope_gauge(0);
        assert_eq!(gauge.chars().count(), 21);
        assert_eq!(gauge.chars().nth(10), Some('o'));
    }

    #[test]
    fn test_rope_gauge_team_a_pulls_left() {
        assert_eq!(rope_gauge(10).chars().next(), Some('o'));
        assert_eq!(rope_gauge(-10).chars().last(), Some('o'));
    }

    #[test]
    fn test_rope_gauge_tolerates_out_of_range_values() {
        // The store mirrors whatever the authority sends; the gauge merely
        // pins its marker to the edge.
        assert_eq!(rope_gauge(25).chars().next(), Some('o'));
    }
}
