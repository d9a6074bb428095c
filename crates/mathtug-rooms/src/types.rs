//! Request and response shapes for the room and leaderboard endpoints.

use serde::{Deserialize, Serialize};

use mathtug_protocol::{Difficulty, GameStatus, Identity, Team};

/// Body for room creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRoom {
    pub username: String,
    pub difficulty: Difficulty,
    pub max_players_per_team: u32,
    /// Rope displacement that ends the game.
    pub win_threshold: u32,
    /// Round length in seconds.
    pub round_duration: u32,
}

impl CreateRoom {
    /// A creation request with the authority's defaults (5 per team,
    /// threshold 10, 120 s rounds).
    pub fn new(username: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            username: username.into(),
            difficulty,
            max_players_per_team: 5,
            win_threshold: 10,
            round_duration: 120,
        }
    }
}

/// Body for joining a room by code.
#[derive(Debug, Clone, Serialize)]
pub struct JoinRoom {
    pub username: String,
    pub room_code: String,
    /// Requested team; the authority assigns the smaller team when absent.
    pub team: Option<Team>,
}

impl JoinRoom {
    pub fn new(room_code: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            room_code: room_code.into(),
            team: None,
        }
    }

    pub fn with_team(mut self, team: Team) -> Self {
        self.team = Some(team);
        self
    }
}

/// What the authority returns from both create and join.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomJoin {
    pub room_id: String,
    pub room_code: String,
    pub player_id: String,
    pub user_id: String,
    pub team: Team,
    pub status: GameStatus,
}

impl RoomJoin {
    /// Turn the join result into the session identity. The authority does
    /// not echo the display name, so the caller supplies it.
    pub fn into_identity(self, username: impl Into<String>) -> Identity {
        Identity {
            room_id: self.room_id,
            room_code: self.room_code,
            player_id: self.player_id,
            user_id: self.user_id,
            username: username.into(),
            team: self.team,
        }
    }
}

/// Room details looked up by code.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomInfo {
    pub room_id: String,
    pub room_code: String,
    pub status: GameStatus,
    pub difficulty: String,
    pub max_players_per_team: u32,
    pub win_threshold: u32,
    pub round_duration: u32,
    #[serde(default)]
    pub team_a_count: u32,
    #[serde(default)]
    pub team_b_count: u32,
}

/// One row of the global leaderboard.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub username: String,
    pub wins: u32,
    pub losses: u32,
    pub accuracy: f64,
    pub avg_response_time_ms: f64,
}

/// Lifetime statistics for one player.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerStats {
    pub username: String,
    pub wins: u32,
    pub losses: u32,
    pub total_answers: u32,
    pub correct_answers: u32,
    pub accuracy: f64,
    pub avg_response_time_ms: f64,
}
