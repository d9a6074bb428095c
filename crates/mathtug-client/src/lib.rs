//! WebSocket connection manager for a MathTug game session.
//!
//! Owns one transport session per identity, translates inbound frames into
//! session-store mutations via a single ordered dispatch channel, and
//! exposes a fire-and-forget outbound command primitive.

mod connection;
mod dispatch;
mod endpoint;

pub use connection::{ConnectError, GameConnection, LinkState};
pub use dispatch::apply_event;
pub use endpoint::game_url;
