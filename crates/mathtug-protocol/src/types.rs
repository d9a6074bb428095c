//! Domain types shared by the wire protocol, the state store, and the room
//! collaborator client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the two competing teams. Serialized as `"A"` / `"B"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Default for Team {
    fn default() -> Self {
        Team::A
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::A => write!(f, "A"),
            Team::B => write!(f, "B"),
        }
    }
}

/// Error returned when a string is not a recognized tag value.
#[derive(Debug, thiserror::Error)]
#[error("unrecognized value: {0:?}")]
pub struct ParseTagError(pub String);

impl FromStr for Team {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" | "a" => Ok(Team::A),
            "B" | "b" => Ok(Team::B),
            other => Err(ParseTagError(other.to_string())),
        }
    }
}

/// Lifecycle phase of a game session.
///
/// `Idle` is client-local and never appears on the wire; the authority only
/// ever reports the other three. `Finished` is terminal for an identity —
/// playing again requires a fresh join/create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Idle,
    Waiting,
    InProgress,
    Finished,
}

/// Question difficulty, as understood by the authority's question engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
            Difficulty::Extreme => write!(f, "extreme"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "extreme" => Ok(Difficulty::Extreme),
            other => Err(ParseTagError(other.to_string())),
        }
    }
}

/// An arithmetic question pushed by the authority.
///
/// `difficulty` stays a free-form tag rather than [`Difficulty`] so a client
/// keeps decoding snapshots if the authority grows new levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Opaque question identifier, echoed back in answer submissions.
    pub id: String,
    /// The prompt text, e.g. `"7 + 4"`.
    pub question: String,
    /// Difficulty tag.
    pub difficulty: String,
    /// Per-question time limit in seconds.
    pub time_limit: u32,
}

/// The immutable-per-session tuple identifying a participant.
///
/// Produced once by the room join/create flow; cleared only by a session
/// reset. The connection manager refuses to open a transport until
/// [`Identity::is_complete`] holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identity {
    /// Room identifier (transport address path segment).
    pub room_id: String,
    /// Human-readable room code for sharing.
    pub room_code: String,
    /// This participant's player identifier.
    pub player_id: String,
    /// This participant's user identifier.
    pub user_id: String,
    /// Display name.
    pub username: String,
    /// Team assignment.
    pub team: Team,
}

impl Identity {
    /// Whether the identity carries enough to address a transport session.
    pub fn is_complete(&self) -> bool {
        !self.room_id.is_empty() && !self.player_id.is_empty()
    }
}
