//! Wire protocol for the MathTug game authority: inbound server events,
//! outbound client commands, and the domain types both sides share.

pub mod command;
pub mod event;
pub mod types;

pub use command::{ClientCommand, encode_command};
pub use event::{
    AnswerResult, GameOverReport, GameStateSnapshot, RosterUpdate, ScoreUpdate, ServerEvent,
    TeamNotice, TimerTick, decode_event,
};
pub use types::{Difficulty, GameStatus, Identity, ParseTagError, Question, Team};
