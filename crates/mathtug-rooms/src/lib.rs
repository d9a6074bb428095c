//! HTTP client for the authority's room and leaderboard endpoints.
//!
//! This is the external collaborator that mints the identity the realtime
//! engine connects with: create a room (auto-joining as team A) or join an
//! existing one by code, then seed the session store with the returned
//! identity. Leaderboard and per-player statistics ride the same API.

mod error;
mod types;

pub use error::RoomsError;
pub use types::{CreateRoom, JoinRoom, LeaderboardEntry, PlayerStats, RoomInfo, RoomJoin};

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Client for the authority's HTTP API.
pub struct RoomsClient {
    http: reqwest::Client,
    base_url: String,
}

/// Error body shape the authority uses for every failure.
#[derive(Debug, Deserialize)]
struct ApiDetail {
    detail: String,
}

impl RoomsClient {
    /// Create a client for the API at `base_url` (e.g. `http://host:8000`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RoomsError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a room; the caller is auto-joined as team A.
    pub async fn create_room(&self, request: &CreateRoom) -> Result<RoomJoin, RoomsError> {
        self.post("/rooms", request).await
    }

    /// Join an existing room by its code.
    pub async fn join_room(&self, request: &JoinRoom) -> Result<RoomJoin, RoomsError> {
        self.post(&format!("/rooms/{}/join", request.room_code), request)
            .await
    }

    /// Fetch a room's status and team head-counts.
    pub async fn room_info(&self, room_code: &str) -> Result<RoomInfo, RoomsError> {
        self.get(&format!("/rooms/{room_code}")).await
    }

    /// Fetch the top players, ranked by wins.
    pub async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, RoomsError> {
        self.get(&format!("/leaderboard?limit={limit}")).await
    }

    /// Fetch one player's lifetime statistics.
    pub async fn player_stats(&self, user_id: &str) -> Result<PlayerStats, RoomsError> {
        self.get(&format!("/player/{user_id}")).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RoomsError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "POST");
        let response = self.http.post(&url).json(body).send().await?;
        Self::parse(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RoomsError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        Self::parse(response).await
    }

    /// Decode a success body, or surface the authority's `detail` reason.
    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RoomsError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let detail = match response.json::<ApiDetail>().await {
            Ok(body) => body.detail,
            Err(_) => status.to_string(),
        };
        Err(RoomsError::Api {
            status: status.as_u16(),
            detail,
        })
    }
}
