//! Room API error types.

/// Errors from the authority's HTTP API.
#[derive(Debug, thiserror::Error)]
pub enum RoomsError {
    /// The request never completed (refused, DNS, timeout, bad body).
    #[error("room request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The authority rejected the request; `detail` is its stated reason.
    #[error("{detail}")]
    Api { status: u16, detail: String },
}
