//! The session state record and its partial-merge delta.

use mathtug_protocol::{GameStatus, Identity, Question, Team};

/// Verdict shown to the local player after their own submission.
///
/// Transient: the store clears it automatically shortly after it is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerFeedback {
    Correct,
    Wrong,
}

/// Complete state of one game participation.
///
/// Every numeric field mirrors the latest value the authority sent; the
/// client never computes scores, rope position, or timer values itself.
/// `Default` is the idle state a fresh (or reset) session starts in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    /// Who we are and where; written once per session.
    pub identity: Identity,
    /// Lifecycle phase; governs which inputs are meaningful.
    pub status: GameStatus,
    pub team_a_score: u32,
    pub team_b_score: u32,
    /// Signed tug-of-war balance in [-10, 10] when the authority behaves;
    /// mirrored as-is, never clamped locally.
    pub rope_position: i32,
    /// Seconds remaining, moved only by explicit `timer_tick` events.
    pub timer: u32,
    /// The active question, if a round is underway.
    pub current_question: Option<Question>,
    /// Winning team once `status` is `Finished`; `None` means a draw.
    pub winner: Option<Team>,
    pub team_a_count: u32,
    pub team_b_count: u32,
    /// Most recent team to answer correctly (UI accent, no freshness bound).
    pub last_correct_team: Option<Team>,
    /// Most recent team to answer incorrectly.
    pub last_wrong_team: Option<Team>,
    /// Self-expiring verdict on our own last submission.
    pub answer_feedback: Option<AnswerFeedback>,
}

/// A partial update: only the fields present are written, everything else
/// keeps its prior value.
///
/// `winner` is doubly optional because the authority's snapshots carry an
/// explicit `null` winner (undecided or draw) that must overwrite a stale
/// value, which is distinct from a delta that does not mention the winner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateDelta {
    pub status: Option<GameStatus>,
    pub team_a_score: Option<u32>,
    pub team_b_score: Option<u32>,
    pub rope_position: Option<i32>,
    pub timer: Option<u32>,
    pub winner: Option<Option<Team>>,
    pub team_a_count: Option<u32>,
    pub team_b_count: Option<u32>,
    pub last_correct_team: Option<Team>,
    pub last_wrong_team: Option<Team>,
}

impl GameState {
    /// Merge a delta into this state. Omitted fields are untouched.
    pub fn merge(&mut self, delta: StateDelta) {
        if let Some(status) = delta.status {
            self.status = status;
        }
        if let Some(score) = delta.team_a_score {
            self.team_a_score = score;
        }
        if let Some(score) = delta.team_b_score {
            self.team_b_score = score;
        }
        if let Some(position) = delta.rope_position {
            self.rope_position = position;
        }
        if let Some(timer) = delta.timer {
            self.timer = timer;
        }
        if let Some(winner) = delta.winner {
            self.winner = winner;
        }
        if let Some(count) = delta.team_a_count {
            self.team_a_count = count;
        }
        if let Some(count) = delta.team_b_count {
            self.team_b_count = count;
        }
        if let Some(team) = delta.last_correct_team {
            self.last_correct_team = Some(team);
        }
        if let Some(team) = delta.last_wrong_team {
            self.last_wrong_team = Some(team);
        }
    }
}
