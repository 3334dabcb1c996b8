use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// Track as used throughout the crate, independent of which endpoint it
/// was resolved from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    pub artists: Vec<TrackArtist>,
    pub album: Option<TrackAlbum>,
    pub duration_ms: u64,
    pub popularity: u32,
    pub explicit: bool,
    pub external_url: Option<String>,
    pub preview_url: Option<String>,
    pub playable: Option<bool>,
}

impl Track {
    pub fn artist_names(&self) -> Vec<String> {
        self.artists.iter().map(|a| a.name.clone()).collect()
    }

    pub fn first_artist(&self) -> &str {
        self.artists
            .first()
            .map(|a| a.name.as_str())
            .unwrap_or("Unknown Artist")
    }

    pub fn album_name(&self) -> &str {
        self.album
            .as_ref()
            .map(|a| a.name.as_str())
            .unwrap_or("Unknown")
    }

    /// open.spotify.com link, derived from the URI when the response did not
    /// carry one (partner search results never do).
    pub fn spotify_url(&self) -> Option<String> {
        if let Some(url) = &self.external_url {
            if !url.is_empty() {
                return Some(url.clone());
            }
        }

        self.uri
            .strip_prefix("spotify:track:")
            .filter(|id| !id.is_empty())
            .map(|id| format!("https://open.spotify.com/track/{}", id))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackArtist {
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackAlbum {
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    pub release_year: Option<i32>,
    pub cover_url: Option<String>,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// One line of a song list: the title and the artist to look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRequest {
    pub song: String,
    pub artist: String,
}

impl SongRequest {
    pub fn new(song: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            song: song.into(),
            artist: artist.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub found: Vec<Track>,
    pub missing: Vec<SongRequest>,
    pub requested: usize,
}

impl BatchOutcome {
    pub fn uris(&self) -> Vec<String> {
        self.found.iter().map(|t| t.uri.clone()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct PlaylistResult {
    pub playlist_id: String,
    pub playlist_url: String,
    pub tracks_found: usize,
    pub tracks_requested: usize,
    pub tracks_added: usize,
}

#[derive(Debug, Clone)]
pub struct PlaylistStats {
    pub track_count: usize,
    pub total_duration_ms: u64,
    pub average_popularity: f64,
    pub unique_artists: usize,
    pub explicit_count: usize,
    pub top_tracks: Vec<Track>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub artists: String,
    pub name: String,
    pub album: String,
    pub duration: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub owner: String,
    pub tracks: u64,
    pub visibility: String,
    pub id: String,
}

// Web API wire types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Paging<WebTrack>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebTrack {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<WebArtist>,
    #[serde(default)]
    pub album: Option<WebAlbum>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub is_playable: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebArtist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebAlbum {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl From<WebTrack> for Track {
    fn from(t: WebTrack) -> Self {
        let album = t.album.map(|a| TrackAlbum {
            id: a.id,
            name: a.name,
            uri: a.uri,
            release_year: a
                .release_date
                .as_deref()
                .and_then(|d| d.get(..4))
                .and_then(|y| y.parse().ok()),
            cover_url: a.images.first().map(|i| i.url.clone()),
            images: a.images,
        });

        Track {
            id: t.id,
            name: t.name,
            uri: t.uri,
            artists: t
                .artists
                .into_iter()
                .map(|a| TrackArtist {
                    id: a.id,
                    name: a.name,
                    uri: a.uri,
                })
                .collect(),
            album,
            duration_ms: t.duration_ms,
            popularity: t.popularity,
            explicit: t.explicit,
            external_url: t.external_urls.get("spotify").cloned(),
            preview_url: t.preview_url,
            playable: t.is_playable,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<WebTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedPlaylist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub collaborative: bool,
    #[serde(default)]
    pub owner: Option<PlaylistOwner>,
    #[serde(default)]
    pub tracks: Option<PlaylistTracksRef>,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
    #[serde(default)]
    pub snapshot_id: Option<String>,
}

impl SimplifiedPlaylist {
    pub fn tracks_total(&self) -> u64 {
        self.tracks.as_ref().map_or(0, |t| t.total)
    }

    pub fn owner_name(&self) -> String {
        self.owner
            .as_ref()
            .and_then(|o| o.display_name.clone().or_else(|| Some(o.id.clone())))
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub collaborative: bool,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksResponse {
    pub snapshot_id: String,
}
