use reqwest::Client;

use crate::{
    config,
    error::SpotifyError,
    types::{SearchResponse, Track, WebTrack},
};

/// Spotify field filter query for a song by an artist.
pub fn field_query(song: &str, artist: &str) -> String {
    format!("track:{} artist:{}", song, artist)
}

/// Searches tracks through the official Web API search endpoint.
///
/// `limit` is clamped to the 1..=50 range the endpoint accepts.
pub async fn search_tracks(
    token: &str,
    query: &str,
    limit: u32,
) -> Result<Vec<Track>, SpotifyError> {
    let limit = limit.clamp(1, 50).to_string();
    let request = Client::new()
        .get(format!("{}/search", config::spotify_apiurl()))
        .bearer_auth(token)
        .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())]);

    let response = super::send(request, "search").await?;
    let body = response.json::<SearchResponse>().await?;

    Ok(body.tracks.items.into_iter().map(Track::from).collect())
}

/// Fetches a single track by its ID.
pub async fn track(token: &str, id: &str) -> Result<Track, SpotifyError> {
    let request = Client::new()
        .get(format!("{}/tracks/{}", config::spotify_apiurl(), id))
        .bearer_auth(token);

    let response = super::send(request, "read track").await?;
    Ok(Track::from(response.json::<WebTrack>().await?))
}
