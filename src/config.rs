//! Configuration management for spotools.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Process environment variables always
//! win over the file. Endpoints have sensible defaults so only the client ID
//! is strictly required, and only for `spotools auth`.

use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";
pub const DEFAULT_SCOPE: &str =
    "playlist-read-private playlist-modify-public playlist-modify-private";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_PARTNER_URL: &str = "https://api-partner.spotify.com/pathfinder/v1/query";
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 300;
pub const DEFAULT_RETRY_PAUSE_MS: u64 = 10_000;

/// Returns the directory holding the `.env` file and the token cache.
///
/// - Linux: `~/.local/share/spotools`
/// - macOS: `~/Library/Application Support/spotools`
/// - Windows: `%LOCALAPPDATA%/spotools`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotools");
    path
}

/// Loads environment variables from `<data_dir>/.env`.
///
/// Creates the data directory if it doesn't exist. A missing `.env` file is
/// fine, every setting can also come from the process environment. A file
/// that exists but cannot be parsed is reported as an error.
pub async fn load_env() -> Result<(), String> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| e.to_string())?;

    let path = dir.join(".env");
    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map_err(|e| format!("Failed to load {}: {}", path.display(), e))
}

fn var_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

/// Address the local OAuth callback server binds to (`SERVER_ADDRESS`).
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Spotify application client ID (`SPOTIFY_API_AUTH_CLIENT_ID`).
///
/// Required for the PKCE flow and for refreshing stored tokens.
pub fn spotify_client_id() -> Result<String, String> {
    match env::var("SPOTIFY_API_AUTH_CLIENT_ID") {
        Ok(id) if !id.trim().is_empty() => Ok(id),
        _ => Err("SPOTIFY_API_AUTH_CLIENT_ID must be set".to_string()),
    }
}

/// OAuth redirect URI (`SPOTIFY_API_REDIRECT_URI`). Must match the URI
/// registered for the application.
pub fn spotify_redirect_uri() -> String {
    var_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Space separated OAuth scopes (`SPOTIFY_API_AUTH_SCOPE`).
pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

/// Authorization endpoint (`SPOTIFY_API_AUTH_URL`).
pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Token exchange endpoint (`SPOTIFY_API_TOKEN_URL`).
pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_API_URL)
}

/// Partner GraphQL endpoint used by the web player (`SPOTIFY_PARTNER_URL`).
pub fn spotify_partner_url() -> String {
    var_or("SPOTIFY_PARTNER_URL", DEFAULT_PARTNER_URL)
}

/// Bearer token copied from the browser (`SPOTIFY_BEARER_TOKEN`), if any.
pub fn bearer_token() -> Option<String> {
    env::var("SPOTIFY_BEARER_TOKEN")
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Fixed delay between search requests in batch runs
/// (`SPOTIFY_REQUEST_DELAY_MS`).
pub fn request_delay() -> Duration {
    let millis = env::var("SPOTIFY_REQUEST_DELAY_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_REQUEST_DELAY_MS);
    Duration::from_millis(millis)
}

/// Pause before retrying a request that failed with 502 Bad Gateway
/// (`SPOTIFY_RETRY_PAUSE_MS`).
pub fn retry_pause() -> Duration {
    let millis = env::var("SPOTIFY_RETRY_PAUSE_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_PAUSE_MS);
    Duration::from_millis(millis)
}
