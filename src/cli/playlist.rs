use std::{path::PathBuf, time::Duration};

use tabled::Table;

use crate::{
    batch::{self, SearchSource},
    error,
    export::ExportFormat,
    info, spotify, success,
    types::{CreatePlaylistRequest, PlaylistTableRow, Track},
    utils, warning,
};

use super::{access_token, read_song_file, save_export, spinner};

#[allow(clippy::too_many_arguments)]
pub async fn create_playlist(
    file: PathBuf,
    name: String,
    description: String,
    private: bool,
    skip_existing: bool,
    source: SearchSource,
    bearer: Option<String>,
    delay: Duration,
) {
    let songs = read_song_file(&file).await;
    let token = access_token(bearer).await;

    if skip_existing {
        match spotify::playlist::exists(&token, &name).await {
            Ok(true) => {
                info!("Playlist {} already exists", name);
                return;
            }
            Ok(false) => {}
            Err(e) => warning!("Failed to check if playlist exists: {}", e),
        }
    }

    let request = CreatePlaylistRequest {
        name,
        description,
        public: !private,
        collaborative: false,
    };

    let result =
        match batch::create_playlist_from_songs(source, &token, &songs, &request, delay).await {
            Ok(Some(result)) => result,
            Ok(None) => return,
            Err(e) => error!("Failed to create playlist: {}", e),
        };

    success!("Playlist created successfully!");
    info!("ID: {}", result.playlist_id);
    info!("URL: {}", result.playlist_url);
    info!(
        "Added {} tracks ({} found out of {} requested)",
        result.tracks_added, result.tracks_found, result.tracks_requested
    );
}

pub async fn add_to_playlist(
    playlist: String,
    file: PathBuf,
    source: SearchSource,
    bearer: Option<String>,
    delay: Duration,
) {
    let playlist_id = utils::extract_playlist_id(&playlist);
    let songs = read_song_file(&file).await;
    let token = access_token(bearer).await;

    match batch::add_songs_to_playlist(source, &token, &playlist_id, &songs, delay).await {
        Ok(outcome) => info!(
            "Added {} out of {} requested tracks to {}",
            outcome.found.len(),
            outcome.requested,
            utils::playlist_url(&playlist_id)
        ),
        Err(e) => error!("Error adding tracks to playlist: {}", e),
    }
}

pub async fn list_playlists(limit: u32, bearer: Option<String>) {
    let token = access_token(bearer).await;

    let pb = spinner("Fetching playlists...");
    let playlists = spotify::playlist::list(&token, limit).await;
    pb.finish_and_clear();

    let playlists = match playlists {
        Ok(p) => p,
        Err(e) => error!("Error getting playlists: {}", e),
    };

    if playlists.is_empty() {
        warning!("No playlists found");
        return;
    }

    let rows: Vec<PlaylistTableRow> = playlists
        .iter()
        .map(|p| PlaylistTableRow {
            name: p.name.clone(),
            owner: p.owner_name(),
            tracks: p.tracks_total(),
            visibility: match p.public {
                Some(true) => "Public".to_string(),
                Some(false) => "Private".to_string(),
                None => "-".to_string(),
            },
            id: p.id.clone(),
        })
        .collect();

    println!("{}", Table::new(rows));
}

async fn fetch_playlist_tracks(playlist: &str, bearer: Option<String>) -> (String, Vec<Track>) {
    let playlist_id = utils::extract_playlist_id(playlist);
    let token = access_token(bearer).await;

    let pb = spinner(&format!("Fetching tracks of playlist {}...", playlist_id));
    let tracks = spotify::playlist::tracks(&token, &playlist_id).await;
    pb.finish_and_clear();

    match tracks {
        Ok(tracks) => (playlist_id, tracks),
        Err(e) => error!("Error getting playlist tracks: {}", e),
    }
}

pub async fn playlist_tracks(
    playlist: String,
    bearer: Option<String>,
    export: Option<ExportFormat>,
    output: Option<PathBuf>,
) {
    let (playlist_id, tracks) = fetch_playlist_tracks(&playlist, bearer).await;

    if tracks.is_empty() {
        warning!("Playlist {} has no tracks", playlist_id);
        return;
    }

    println!("{}", Table::new(utils::track_table_rows(&tracks)));
    save_export(&tracks, export, output, &format!("playlist_{}", playlist_id)).await;
}

pub async fn analyze_playlist(
    playlist: String,
    bearer: Option<String>,
    export: Option<ExportFormat>,
    output: Option<PathBuf>,
) {
    let (playlist_id, tracks) = fetch_playlist_tracks(&playlist, bearer).await;
    info!("Analyzing playlist: {}", playlist_id);

    if tracks.is_empty() {
        warning!("Playlist {} has no tracks", playlist_id);
        return;
    }

    let stats = utils::playlist_stats(&tracks);

    info!("Found {} tracks", stats.track_count);
    info!("Total duration: {} minutes", stats.total_duration_ms / 60_000);
    info!("Average popularity: {:.1}/100", stats.average_popularity);
    info!("Unique artists: {}", stats.unique_artists);
    info!("Explicit tracks: {}", stats.explicit_count);

    info!("Top {} most popular tracks:", stats.top_tracks.len());
    for (i, track) in stats.top_tracks.iter().enumerate() {
        println!(
            "   {}. {} - {} ({}/100)",
            i + 1,
            track.artist_names().join(", "),
            track.name,
            track.popularity
        );
    }

    save_export(
        &tracks,
        export,
        output,
        &format!("playlist_analysis_{}", playlist_id),
    )
    .await;
}
