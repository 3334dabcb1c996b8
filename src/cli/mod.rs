//! # CLI Module
//!
//! User-facing commands. Each command resolves credentials, delegates to the
//! [`crate::spotify`] client functions or the [`crate::batch`] workflow and
//! presents the result with the console macros, `tabled` tables and
//! `indicatif` spinners.
//!
//! ```bash
//! spotools auth                                   # PKCE login, token cached
//! spotools search "Paradisio Bailando" --source partner
//! spotools batch songs.txt --export csv
//! spotools playlist create songs.txt --name "Eurodance"
//! spotools playlist analyze https://open.spotify.com/playlist/<id>
//! spotools weeks --birth-date 1991-01-29
//! ```
//!
//! Credentials: an explicit `--token` (or `SPOTIFY_BEARER_TOKEN`) copied from
//! the web player wins; otherwise the token stored by `spotools auth` is used
//! and refreshed when close to expiry.

use std::{path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config, error,
    export::{self, ExportFormat},
    management::TokenManager,
    success,
    types::{SongRequest, Track},
    utils, warning,
};

mod auth;
mod playlist;
mod search;
mod user;
mod weeks;

pub use auth::auth;
pub use playlist::{add_to_playlist, analyze_playlist, create_playlist, list_playlists, playlist_tracks};
pub use search::{batch, search};
pub use user::me;
pub use weeks::weeks;

/// Returns an access token or exits with a hint on how to get one.
pub(crate) async fn access_token(bearer: Option<String>) -> String {
    if let Some(token) = bearer.or_else(config::bearer_token) {
        return token;
    }

    let mut token_mgr = match TokenManager::load().await {
        Ok(t) => t,
        Err(e) => {
            error!(
                "Failed to load token. Please run spotools auth or pass --token\n Error: {}",
                e
            );
        }
    };

    match token_mgr.get_valid_token().await {
        Ok(token) => token,
        Err(e) => error!("Cannot get a valid token. Please run spotools auth\n Error: {}", e),
    }
}

/// Like [`access_token`] but returns `None` instead of exiting. Used where
/// the endpoint also answers anonymous requests.
pub(crate) async fn optional_access_token(bearer: Option<String>) -> Option<String> {
    if let Some(token) = bearer.or_else(config::bearer_token) {
        return Some(token);
    }

    let mut token_mgr = TokenManager::load().await.ok()?;
    token_mgr.get_valid_token().await.ok()
}

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// Reads a song list file, warning about lines that cannot be parsed.
pub(crate) async fn read_song_file(file: &PathBuf) -> Vec<SongRequest> {
    let content = match async_fs::read_to_string(file).await {
        Ok(c) => c,
        Err(e) => error!("Cannot read song list {}: {}", file.display(), e),
    };

    let (songs, invalid) = utils::parse_song_list(&content);
    for (line, reason) in invalid {
        warning!("Skipping line {}: {}", line, reason);
    }

    if songs.is_empty() {
        error!(
            "No songs in {}. Use one 'Song Title - Artist Name' per line.",
            file.display()
        );
    }

    songs
}

/// Writes the tracks when an export format was requested.
pub(crate) async fn save_export(
    tracks: &[Track],
    format: Option<ExportFormat>,
    output: Option<PathBuf>,
    default_stem: &str,
) {
    let Some(format) = format else {
        return;
    };

    let path =
        output.unwrap_or_else(|| PathBuf::from(export::default_file_name(default_stem, format)));

    match export::export_to_file(&path, format, tracks).await {
        Ok(_) => success!("Exported {} tracks to {}", tracks.len(), path.display()),
        Err(e) => warning!("{}", e),
    }
}
