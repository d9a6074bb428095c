//! Game WebSocket endpoint construction.
//!
//! The authority addresses a session as
//! `ws://<host>/ws/game/{room_id}?player_id=…&user_id=…&username=…&team=…`.

use std::fmt::Write;

use mathtug_protocol::Identity;

/// Build the WebSocket URL for a game session.
pub fn game_url(ws_base: &str, identity: &Identity) -> String {
    format!(
        "{}/ws/game/{}?player_id={}&user_id={}&username={}&team={}",
        ws_base.trim_end_matches('/'),
        percent_encode(&identity.room_id),
        percent_encode(&identity.player_id),
        percent_encode(&identity.user_id),
        percent_encode(&identity.username),
        identity.team,
    )
}

/// Percent-encode a query value (RFC 3986: unreserved bytes pass through).
fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char);
            }
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}
