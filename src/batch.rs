//! Sequential song resolution and playlist creation.
//!
//! Songs are looked up one at a time with a fixed pause between requests.
//! The resolved URIs are then used for a single playlist creation call
//! followed by the add-tracks calls.

use std::time::Duration;

use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::sleep;

use crate::{
    error::SpotifyError,
    info, spotify, success,
    types::{BatchOutcome, CreatePlaylistRequest, PlaylistResult, SongRequest, Track},
    utils, warning,
};

/// Which endpoint songs are resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchSource {
    /// Official Web API search with `track:` and `artist:` filters
    Web,
    /// Partner GraphQL search used by the web player
    Partner,
}

/// Number of candidates requested per song from the partner search.
pub const PARTNER_CANDIDATES: u32 = 3;

/// Looks up a single song and returns the accepted track, if any.
///
/// Web search trusts the first result of the filtered query. Partner
/// search runs a free-text query and keeps the best scoring candidate.
pub async fn resolve_song(
    source: SearchSource,
    token: Option<&str>,
    song: &SongRequest,
) -> Result<Option<Track>, SpotifyError> {
    match source {
        SearchSource::Web => {
            let Some(token) = token else {
                return Err(SpotifyError::Unauthorized);
            };
            let query = spotify::search::field_query(&song.song, &song.artist);
            let tracks = spotify::search::search_tracks(token, &query, 1).await?;
            Ok(tracks.into_iter().next())
        }
        SearchSource::Partner => {
            let term = format!("{} {}", song.artist, song.song);
            let tracks =
                spotify::partner::search_tracks(token, &term, PARTNER_CANDIDATES).await?;
            Ok(utils::find_best_match(&song.song, &song.artist, &tracks).cloned())
        }
    }
}

/// Resolves every song in order, pausing `delay` between requests.
///
/// A failed lookup counts the song as missing. An authorization failure
/// aborts the run since every following request would fail the same way.
pub async fn resolve_songs(
    source: SearchSource,
    token: Option<&str>,
    songs: &[SongRequest],
    delay: Duration,
) -> Result<BatchOutcome, SpotifyError> {
    let mut outcome = BatchOutcome {
        requested: songs.len(),
        ..Default::default()
    };

    info!("Searching for {} tracks...", songs.len());

    let pb = ProgressBar::new(songs.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{pos}/{len}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    for (i, song) in songs.iter().enumerate() {
        pb.set_message(format!("{} - {}", song.artist, song.song));

        match resolve_song(source, token, song).await {
            Ok(Some(track)) => {
                pb.suspend(|| success!("Found: {} - {}", track.first_artist(), track.name));
                outcome.found.push(track);
            }
            Ok(None) => {
                pb.suspend(|| warning!("Not found: {} - {}", song.artist, song.song));
                outcome.missing.push(song.clone());
            }
            Err(e) if e.is_auth_error() => {
                pb.finish_and_clear();
                return Err(e);
            }
            Err(e) => {
                pb.suspend(|| {
                    warning!("Error searching for {} - {}: {}", song.artist, song.song, e)
                });
                outcome.missing.push(song.clone());
            }
        }

        pb.inc(1);
        if i + 1 < songs.len() {
            sleep(delay).await;
        }
    }

    pb.finish_and_clear();
    info!(
        "Found {} out of {} tracks",
        outcome.found.len(),
        outcome.requested
    );

    Ok(outcome)
}

/// Resolves the songs, creates a playlist for the current user and adds the
/// found tracks to it.
///
/// Returns `Ok(None)` without creating anything when no song was found.
pub async fn create_playlist_from_songs(
    source: SearchSource,
    token: &str,
    songs: &[SongRequest],
    request: &CreatePlaylistRequest,
    delay: Duration,
) -> Result<Option<PlaylistResult>, SpotifyError> {
    info!("Creating playlist '{}'...", request.name);

    let user = spotify::user::current_user(token).await?;
    let outcome = resolve_songs(source, Some(token), songs, delay).await?;

    if outcome.found.is_empty() {
        warning!("No tracks found, cannot create playlist");
        return Ok(None);
    }

    let playlist = spotify::playlist::create(token, &user.id, request).await?;
    success!("Created playlist: {} (ID: {})", playlist.name, playlist.id);

    let tracks_added = spotify::playlist::add_tracks(token, &playlist.id, &outcome.uris()).await?;
    success!("Added {} tracks to playlist", tracks_added);

    Ok(Some(PlaylistResult {
        playlist_url: utils::playlist_url(&playlist.id),
        playlist_id: playlist.id,
        tracks_found: outcome.found.len(),
        tracks_requested: outcome.requested,
        tracks_added,
    }))
}

/// Resolves the songs and appends the found tracks to an existing playlist.
pub async fn add_songs_to_playlist(
    source: SearchSource,
    token: &str,
    playlist_id: &str,
    songs: &[SongRequest],
    delay: Duration,
) -> Result<BatchOutcome, SpotifyError> {
    let outcome = resolve_songs(source, Some(token), songs, delay).await?;
    if outcome.found.is_empty() {
        warning!("No tracks found, playlist left unchanged");
        return Ok(outcome);
    }

    let added = spotify::playlist::add_tracks(token, playlist_id, &outcome.uris()).await?;
    success!("Added {} tracks to playlist", added);
    Ok(outcome)
}
