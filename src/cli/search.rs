use std::{path::PathBuf, time::Duration};

use tabled::Table;

use crate::{
    batch::{self, SearchSource},
    error,
    export::ExportFormat,
    info, spotify, utils, warning,
};

use super::{access_token, optional_access_token, read_song_file, save_export, spinner};

pub async fn search(
    term: String,
    limit: u32,
    source: SearchSource,
    bearer: Option<String>,
    export: Option<ExportFormat>,
    output: Option<PathBuf>,
) {
    if let Some(id) = utils::extract_track_id(&term) {
        let token = access_token(bearer).await;

        let pb = spinner(&format!("Fetching track {}...", id));
        let result = spotify::search::track(&token, &id).await;
        pb.finish_and_clear();

        let track = match result {
            Ok(track) => track,
            Err(e) => error!("Error getting track {}: {}", id, e),
        };

        let tracks = vec![track];
        println!("{}", Table::new(utils::track_table_rows(&tracks)));
        save_export(&tracks, export, output, "spotify_tracks").await;
        return;
    }

    let pb = spinner(&format!("Searching for '{}'...", term));
    let result = match source {
        SearchSource::Web => {
            let token = access_token(bearer).await;
            spotify::search::search_tracks(&token, &term, limit).await
        }
        SearchSource::Partner => {
            let token = optional_access_token(bearer).await;
            spotify::partner::search_tracks(token.as_deref(), &term, limit).await
        }
    };
    pb.finish_and_clear();

    let tracks = match result {
        Ok(tracks) => tracks,
        Err(e) => error!("Error searching for '{}': {}", term, e),
    };

    if tracks.is_empty() {
        warning!("No results for '{}'", term);
        return;
    }

    println!("{}", Table::new(utils::track_table_rows(&tracks)));
    save_export(&tracks, export, output, "spotify_tracks").await;
}

pub async fn batch(
    file: PathBuf,
    source: SearchSource,
    bearer: Option<String>,
    delay: Duration,
    export: Option<ExportFormat>,
    output: Option<PathBuf>,
) {
    let songs = read_song_file(&file).await;

    let token = match source {
        SearchSource::Web => Some(access_token(bearer).await),
        SearchSource::Partner => optional_access_token(bearer).await,
    };

    let outcome = match batch::resolve_songs(source, token.as_deref(), &songs, delay).await {
        Ok(outcome) => outcome,
        Err(e) => error!("Batch search aborted: {}", e),
    };

    if outcome.found.is_empty() {
        warning!("No tracks found");
        return;
    }

    info!("Resolved tracks:\n{}", utils::format_track_list(&outcome.found));
    for missing in &outcome.missing {
        warning!("Missing: {} - {}", missing.artist, missing.song);
    }

    save_export(&outcome.found, export, output, "found_tracks").await;
}
