//! Inbound server events.
//!
//! Every frame from the authority is a JSON envelope `{"type": <tag>,
//! "data": <object>}`. [`ServerEvent`] is the closed sum of all known tags;
//! use [`decode_event`] to parse a frame. Tags this client does not know
//! decode to [`ServerEvent::Unknown`] so newer authorities never break older
//! clients.

use serde::{Deserialize, Serialize};

use crate::types::{GameStatus, Question, Team};

/// One inbound frame from the authority, dispatched by its `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Authoritative full snapshot; corrects any drift.
    StateUpdate(GameStateSnapshot),
    /// The round has begun.
    GameStarted {},
    /// A player connected; carries fresh team head-counts.
    PlayerJoined(RosterUpdate),
    /// A player disconnected; carries fresh team head-counts.
    PlayerLeft(RosterUpdate),
    /// Somebody answered correctly: new scores and rope position.
    CorrectAnswer(ScoreUpdate),
    /// Somebody answered incorrectly.
    WrongAnswer(TeamNotice),
    /// Private verdict on this player's own submission.
    AnswerResult(AnswerResult),
    /// Countdown update; the client never ticks the timer itself.
    TimerTick(TimerTick),
    /// Terminal event for the round.
    GameOver(GameOverReport),
    /// Any tag this client does not recognize.
    #[serde(other)]
    Unknown,
}

/// Payload of `state_update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub team_a_score: u32,
    pub team_b_score: u32,
    /// Signed tug-of-war balance; positive favors team A.
    pub rope_position: i32,
    /// Seconds remaining in the round.
    pub timer: u32,
    pub status: GameStatus,
    /// Winning team, or `None` while undecided (and for a draw).
    pub winner: Option<Team>,
    /// Replaces the active question wholesale when present.
    #[serde(default)]
    pub current_question: Option<Question>,
}

/// Payload of `player_joined` / `player_left`.
///
/// `player_left` omits the `team` key, so it is optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterUpdate {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub team: Option<Team>,
    pub team_a_count: u32,
    pub team_b_count: u32,
}

/// Payload of `correct_answer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    /// The team that scored.
    pub team: Team,
    #[serde(default)]
    pub username: String,
    pub rope_position: i32,
    pub team_a_score: u32,
    pub team_b_score: u32,
}

/// Payload of `wrong_answer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamNotice {
    /// The team that missed.
    pub team: Team,
    #[serde(default)]
    pub username: String,
}

/// Payload of `answer_result`, sent only to the submitting player.
///
/// The authority includes different field subsets depending on why the
/// answer was accepted or rejected; everything beyond `correct` is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub correct: bool,
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(default)]
    pub response_time_ms: Option<u64>,
    /// Rejection reason ("Already answered this question", …).
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub game_over: Option<bool>,
    #[serde(default)]
    pub winner: Option<Team>,
}

/// Payload of `timer_tick`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerTick {
    pub timer: u32,
}

/// Payload of `game_over`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverReport {
    /// `None` means a draw.
    pub winner: Option<Team>,
    pub team_a_score: u32,
    pub team_b_score: u32,
    pub rope_position: i32,
}

/// Parse one inbound frame.
///
/// Unknown `type` tags succeed as [`ServerEvent::Unknown`]; a frame whose
/// payload does not match its tag's shape is an error, left to the caller's
/// policy (the connection manager drops and logs it).
pub fn decode_event(text: &str) -> Result<ServerEvent, serde_json::Error> {
    serde_json::from_str(text)
}
