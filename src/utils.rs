use std::collections::HashSet;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::{PlaylistStats, SongRequest, Track, TrackTableRow};

/// Minimum score a search result needs before it is accepted as a match.
pub const MIN_MATCH_SCORE: u32 = 2;

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Formats milliseconds as `M:SS`.
pub fn format_duration(duration_ms: u64) -> String {
    if duration_ms == 0 {
        return "0:00".to_string();
    }

    let minutes = duration_ms / 60_000;
    let seconds = (duration_ms % 60_000) / 1000;
    format!("{}:{:02}", minutes, seconds)
}

pub fn playlist_url(playlist_id: &str) -> String {
    format!("https://open.spotify.com/playlist/{}", playlist_id)
}

/// Extracts the track ID from a `spotify:track:<id>` URI or an
/// `open.spotify.com/track/<id>` URL.
pub fn extract_track_id(uri_or_url: &str) -> Option<String> {
    let input = uri_or_url.trim();
    let id = if let Some(id) = input.strip_prefix("spotify:track:") {
        id
    } else if let Some((_, rest)) = input.split_once("open.spotify.com/track/") {
        rest.split(['?', '#', '/']).next().unwrap_or_default()
    } else {
        return None;
    };

    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Accepts a playlist URL, a `spotify:playlist:<id>` URI or a bare ID.
pub fn extract_playlist_id(input: &str) -> String {
    let input = input.trim();
    if let Some((_, rest)) = input.rsplit_once("playlist/") {
        return rest.split(['?', '#']).next().unwrap_or_default().to_string();
    }
    if let Some(id) = input.strip_prefix("spotify:playlist:") {
        return id.to_string();
    }
    input.to_string()
}

/// Parses one `Song Title - Artist Name` line, splitting on the first ` - `.
pub fn parse_song_line(line: &str) -> Result<SongRequest, String> {
    let Some((song, artist)) = line.split_once(" - ") else {
        return Err("expected format 'Song Title - Artist Name'".to_string());
    };

    let song = song.trim();
    let artist = artist.trim();
    if song.is_empty() || artist.is_empty() {
        return Err("song title and artist name must not be empty".to_string());
    }

    Ok(SongRequest::new(song, artist))
}

/// Parses a song list, one `Song Title - Artist Name` per line.
///
/// Blank lines and lines starting with `#` are skipped. Lines that cannot be
/// parsed are returned with their 1-based line number and the reason.
pub fn parse_song_list(content: &str) -> (Vec<SongRequest>, Vec<(usize, String)>) {
    let mut songs = Vec::new();
    let mut invalid = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_song_line(line) {
            Ok(song) => songs.push(song),
            Err(reason) => invalid.push((idx + 1, format!("{}: {}", reason, line))),
        }
    }

    (songs, invalid)
}

fn name_score(target: &str, candidate: &str) -> u32 {
    if candidate.contains(target) {
        3
    } else if target.split_whitespace().any(|word| candidate.contains(word)) {
        1
    } else {
        0
    }
}

/// Scores a single search result against the requested song and artist.
///
/// The title scores 3 when it contains the whole requested title, else 1
/// when it contains any of its words. The first artist that scores the same
/// way adds its score; later artists are not considered.
pub fn match_score(target_song: &str, target_artist: &str, track: &Track) -> u32 {
    let song = target_song.to_lowercase();
    let artist = target_artist.to_lowercase();

    let mut score = name_score(&song, &track.name.to_lowercase());

    for candidate in &track.artists {
        let s = name_score(&artist, &candidate.name.to_lowercase());
        if s > 0 {
            score += s;
            break;
        }
    }

    score
}

/// Picks the highest scoring track. Ties keep the earliest result, and
/// nothing is returned unless the best score reaches [`MIN_MATCH_SCORE`].
pub fn find_best_match<'a>(
    target_song: &str,
    target_artist: &str,
    tracks: &'a [Track],
) -> Option<&'a Track> {
    let mut best: Option<&Track> = None;
    let mut best_score = 0;

    for track in tracks {
        let score = match_score(target_song, target_artist, track);
        if score > best_score {
            best_score = score;
            best = Some(track);
        }
    }

    best.filter(|_| best_score >= MIN_MATCH_SCORE)
}

/// `" 1. Artist A, Artist B - Title (3:45)"` per line.
pub fn format_track_list(tracks: &[Track]) -> String {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            format!(
                "{:2}. {} - {} ({})",
                i + 1,
                t.artist_names().join(", "),
                t.name,
                format_duration(t.duration_ms)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn track_table_rows(tracks: &[Track]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            position: i + 1,
            artists: t.artist_names().join(", "),
            name: t.name.clone(),
            album: t.album_name().to_string(),
            duration: format_duration(t.duration_ms),
        })
        .collect()
}

pub fn playlist_stats(tracks: &[Track]) -> PlaylistStats {
    let total_duration_ms = tracks.iter().map(|t| t.duration_ms).sum();
    let average_popularity = if tracks.is_empty() {
        0.0
    } else {
        tracks.iter().map(|t| t.popularity as f64).sum::<f64>() / tracks.len() as f64
    };

    let unique_artists = tracks
        .iter()
        .flat_map(|t| t.artists.iter().map(|a| a.name.as_str()))
        .collect::<HashSet<_>>()
        .len();

    let explicit_count = tracks.iter().filter(|t| t.explicit).count();

    let mut top_tracks = tracks.to_vec();
    top_tracks.sort_by(|a, b| b.popularity.cmp(&a.popularity));
    top_tracks.truncate(5);

    PlaylistStats {
        track_count: tracks.len(),
        total_duration_ms,
        average_popularity,
        unique_artists,
        explicit_count,
        top_tracks,
    }
}
