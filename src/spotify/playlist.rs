use reqwest::Client;

use crate::{
    config,
    error::SpotifyError,
    types::{
        AddTracksRequest, AddTracksResponse, CreatePlaylistRequest, CreatePlaylistResponse,
        Paging, PlaylistItem, SimplifiedPlaylist, Track,
    },
    warning,
};

/// Maximum number of URIs the add-items endpoint accepts per request.
pub const ADD_TRACKS_BATCH: usize = 100;

/// Creates a playlist owned by `user_id`.
pub async fn create(
    token: &str,
    user_id: &str,
    request: &CreatePlaylistRequest,
) -> Result<CreatePlaylistResponse, SpotifyError> {
    let request = Client::new()
        .post(format!(
            "{}/users/{}/playlists",
            config::spotify_apiurl(),
            user_id
        ))
        .bearer_auth(token)
        .json(request);

    let response = super::send(request, "create playlist").await?;
    Ok(response.json::<CreatePlaylistResponse>().await?)
}

/// Appends tracks to a playlist in batches of [`ADD_TRACKS_BATCH`].
///
/// Returns the number of URIs sent. Nothing is sent for an empty list.
pub async fn add_tracks(
    token: &str,
    playlist_id: &str,
    uris: &[String],
) -> Result<usize, SpotifyError> {
    if uris.is_empty() {
        warning!("No tracks to add to playlist");
        return Ok(0);
    }

    let client = Client::new();
    let url = format!(
        "{}/playlists/{}/tracks",
        config::spotify_apiurl(),
        playlist_id
    );

    let mut added = 0;
    for chunk in uris.chunks(ADD_TRACKS_BATCH) {
        let request = client.post(&url).bearer_auth(token).json(&AddTracksRequest {
            uris: chunk.to_vec(),
        });

        let response = super::send(request, "modify playlist").await?;
        response.json::<AddTracksResponse>().await?;
        added += chunk.len();
    }

    Ok(added)
}

/// Lists the current user's playlists (first page, `limit` up to 50).
pub async fn list(token: &str, limit: u32) -> Result<Vec<SimplifiedPlaylist>, SpotifyError> {
    let limit = limit.clamp(1, 50).to_string();
    let request = Client::new()
        .get(format!("{}/me/playlists", config::spotify_apiurl()))
        .bearer_auth(token)
        .query(&[("limit", limit.as_str())]);

    let response = super::send(request, "read playlists").await?;
    let page = response.json::<Paging<SimplifiedPlaylist>>().await?;
    Ok(page.items)
}

/// Checks whether the current user already has a playlist with this name.
pub async fn exists(token: &str, name: &str) -> Result<bool, SpotifyError> {
    let playlists = list(token, 50).await?;
    Ok(playlists.iter().any(|p| p.name == name))
}

/// Fetches every track of a playlist, following the `next` links.
///
/// Removed or unavailable entries come back with a null track and are
/// skipped.
pub async fn tracks(token: &str, playlist_id: &str) -> Result<Vec<Track>, SpotifyError> {
    let client = Client::new();
    let mut next = Some(format!(
        "{}/playlists/{}/tracks?limit=100",
        config::spotify_apiurl(),
        playlist_id
    ));

    let mut tracks = Vec::new();
    while let Some(url) = next {
        let request = client.get(&url).bearer_auth(token);
        let response = super::send(request, "read playlist").await?;
        let page = response.json::<Paging<PlaylistItem>>().await?;

        tracks.extend(collect_tracks(page.items));
        next = page.next;
    }

    Ok(tracks)
}

pub fn collect_tracks(items: Vec<PlaylistItem>) -> Vec<Track> {
    items
        .into_iter()
        .filter_map(|item| item.track)
        .filter(|t| !t.uri.is_empty())
        .map(Track::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn null_tracks_are_skipped() {
        let page: Paging<PlaylistItem> = serde_json::from_value(json!({
            "items": [
                { "added_at": "2024-01-01T00:00:00Z", "track": {
                    "id": "t1", "name": "Sandstorm", "uri": "spotify:track:t1",
                    "duration_ms": 225000, "popularity": 70, "explicit": false,
                    "artists": [{ "id": "d", "name": "Darude", "uri": "spotify:artist:d" }],
                    "album": { "id": "al", "name": "Before the Storm", "uri": "spotify:album:al", "images": [] }
                }},
                { "added_at": "2024-01-01T00:00:00Z", "track": null }
            ],
            "next": null,
            "total": 2
        }))
        .unwrap();

        let tracks = collect_tracks(page.items);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "Sandstorm");
        assert_eq!(tracks[0].album_name(), "Before the Storm");
    }

    #[test]
    fn playlist_listing_tolerates_nulls() {
        let page: Paging<SimplifiedPlaylist> = serde_json::from_value(json!({
            "items": [{
                "id": "p1",
                "name": "Eurodance",
                "description": null,
                "public": null,
                "collaborative": false,
                "owner": { "id": "user1", "display_name": null },
                "tracks": { "total": 45 },
                "external_urls": { "spotify": "https://open.spotify.com/playlist/p1" },
                "snapshot_id": "snap"
            }],
            "next": null,
            "total": 1
        }))
        .unwrap();

        let playlist = &page.items[0];
        assert_eq!(playlist.tracks_total(), 45);
        assert_eq!(playlist.owner_name(), "user1");
        assert_eq!(playlist.public, None);
    }
}
