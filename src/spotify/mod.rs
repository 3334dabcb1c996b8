//! # Spotify Integration Module
//!
//! Client functions for the two Spotify surfaces spotools talks to:
//!
//! ```text
//! CLI / batch workflow
//!          ↓
//! Spotify Integration Layer
//!     ├── auth      OAuth 2.0 PKCE flow, token exchange and refresh
//!     ├── user      GET  /me
//!     ├── search    GET  /search?type=track
//!     ├── playlist  /users/{id}/playlists, /me/playlists, /playlists/{id}/tracks
//!     └── partner   POST api-partner.spotify.com/pathfinder/v1/query (searchDesktop)
//!          ↓
//! reqwest
//! ```
//!
//! Every function takes the access token explicitly and returns
//! [`SpotifyError`] on failure. Requests go through [`send`], which maps
//! 401/403 to dedicated errors, retries 502 responses after
//! [`config::retry_pause`] and honours `Retry-After` on 429 when the wait is
//! reasonable.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, header::HeaderMap};
use tokio::time::sleep;

use crate::{config, error::SpotifyError, warning};

pub mod auth;
pub mod partner;
pub mod playlist;
pub mod search;
pub mod user;

/// Longest `Retry-After` we are willing to sit out before giving up.
pub const MAX_RETRY_AFTER_SECS: u64 = 120;

const MAX_ATTEMPTS: u32 = 5;

/// Reads `Retry-After` in seconds, defaulting to one second when the header
/// is missing or not a number.
pub fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(1)
}

/// Sends the request and returns the response if it was successful.
///
/// `action` names the operation for permission errors, e.g. "create playlist".
pub(crate) async fn send(request: RequestBuilder, action: &str) -> Result<Response, SpotifyError> {
    let mut attempt = 0;

    loop {
        attempt += 1;
        let Some(req) = request.try_clone() else {
            return Err(SpotifyError::Config(format!(
                "request to {} cannot be sent",
                action
            )));
        };

        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => return Err(SpotifyError::Unauthorized),
            StatusCode::FORBIDDEN => return Err(SpotifyError::Forbidden(action.to_string())),
            StatusCode::BAD_GATEWAY if attempt < MAX_ATTEMPTS => {
                sleep(config::retry_pause()).await;
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = retry_after_secs(response.headers());
                if retry_after > MAX_RETRY_AFTER_SECS || attempt >= MAX_ATTEMPTS {
                    return Err(SpotifyError::RateLimited(retry_after));
                }
                warning!("Rate limited, waiting {} seconds...", retry_after);
                sleep(Duration::from_secs(retry_after)).await;
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                return Err(SpotifyError::Status(status, body));
            }
        }
    }
}
