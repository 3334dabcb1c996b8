//! Track search through the partner GraphQL endpoint used by the web player.
//!
//! The endpoint is unofficial and may change without notice. It expects a
//! persisted query hash instead of a query document and browser-like
//! headers. A bearer token copied from open.spotify.com is sent when given.

use reqwest::{
    Client,
    header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT},
};
use serde_json::{Value, json};

use crate::{
    config,
    error::SpotifyError,
    types::{Image, Track, TrackAlbum, TrackArtist},
};

pub const SEARCH_OPERATION: &str = "searchDesktop";
pub const SEARCH_QUERY_HASH: &str =
    "d9f785900f0710b31c07818d617f4f7600c1e21217e80f5b043d1e78d74e6026";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(ORIGIN, HeaderValue::from_static("https://open.spotify.com"));
    headers.insert(REFERER, HeaderValue::from_static("https://open.spotify.com/"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// Request body for a `searchDesktop` query.
pub fn search_payload(search_term: &str, limit: u32) -> Value {
    json!({
        "variables": {
            "searchTerm": search_term,
            "offset": 0,
            "limit": limit,
            "numberOfTopResults": 5,
            "includeAudiobooks": true,
            "includeArtistHasConcertsField": false,
            "includePreReleases": true,
            "includeLocalConcertsField": false,
            "includeAuthors": true
        },
        "operationName": SEARCH_OPERATION,
        "extensions": {
            "persistedQuery": {
                "version": 1,
                "sha256Hash": SEARCH_QUERY_HASH
            }
        }
    })
}

/// Searches tracks through the partner endpoint.
pub async fn search_tracks(
    token: Option<&str>,
    search_term: &str,
    limit: u32,
) -> Result<Vec<Track>, SpotifyError> {
    let mut request = Client::new()
        .post(config::spotify_partner_url())
        .headers(browser_headers())
        .json(&search_payload(search_term, limit));

    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let response = super::send(request, "search").await?;
    let body: Value = response.json().await?;

    parse_search_response(&body)
}

/// Extracts the tracks from a `searchDesktop` response body.
///
/// Items that carry no track URI are skipped.
pub fn parse_search_response(body: &Value) -> Result<Vec<Track>, SpotifyError> {
    if let Some(errors) = body.get("errors").filter(|e| !e.is_null()) {
        return Err(SpotifyError::UnexpectedResponse(format!(
            "query failed: {}",
            errors
        )));
    }

    let Some(search) = body.get("data").and_then(|d| d.get("searchV2")) else {
        return Err(SpotifyError::UnexpectedResponse(
            "missing data.searchV2".to_string(),
        ));
    };

    let tracks = search["tracksV2"]["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("item"))
                .filter_map(extract_track)
                .collect()
        })
        .unwrap_or_default();

    Ok(tracks)
}

/// Maps one `tracksV2` item to a [`Track`]. The track fields live either on
/// the item itself or in a nested `data` object.
pub fn extract_track(item: &Value) -> Option<Track> {
    let data = match item.get("data") {
        Some(d) if d.is_object() => d,
        _ => item,
    };

    let uri = data["uri"].as_str().unwrap_or_default();
    if uri.is_empty() {
        return None;
    }

    let id = data["id"]
        .as_str()
        .map(str::to_string)
        .or_else(|| uri.strip_prefix("spotify:track:").map(str::to_string));

    let duration_ms = data["duration"]["totalMilliseconds"]
        .as_u64()
        .or_else(|| data["duration_ms"].as_u64())
        .unwrap_or(0);

    let explicit = data["contentRating"]["label"].as_str() == Some("EXPLICIT")
        || data["explicit"].as_bool().unwrap_or(false);

    let artists = data["artists"]["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|a| TrackArtist {
                    id: a["uri"]
                        .as_str()
                        .and_then(|u| u.strip_prefix("spotify:artist:"))
                        .map(str::to_string),
                    name: a["profile"]["name"]
                        .as_str()
                        .unwrap_or("Unknown Artist")
                        .to_string(),
                    uri: a["uri"].as_str().unwrap_or_default().to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    let album = data.get("albumOfTrack").filter(|a| a.is_object()).map(|a| {
        let images: Vec<Image> = a["coverArt"]["sources"]
            .as_array()
            .map(|sources| {
                sources
                    .iter()
                    .filter_map(|s| {
                        s["url"].as_str().map(|url| Image {
                            url: url.to_string(),
                            width: s["width"].as_u64().map(|w| w as u32),
                            height: s["height"].as_u64().map(|h| h as u32),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        TrackAlbum {
            id: a["uri"]
                .as_str()
                .and_then(|u| u.strip_prefix("spotify:album:"))
                .map(str::to_string),
            name: a["name"].as_str().unwrap_or("Unknown Album").to_string(),
            uri: a["uri"].as_str().unwrap_or_default().to_string(),
            release_year: a["date"]["year"].as_i64().map(|y| y as i32),
            cover_url: images.first().map(|i| i.url.clone()),
            images,
        }
    });

    Some(Track {
        id,
        name: data["name"].as_str().unwrap_or("Unknown").to_string(),
        uri: uri.to_string(),
        artists,
        album,
        duration_ms,
        popularity: data["popularity"].as_u64().unwrap_or(0) as u32,
        explicit,
        external_url: data["external_urls"]["spotify"].as_str().map(str::to_string),
        preview_url: data["preview_url"].as_str().map(str::to_string),
        playable: data["playability"]["playable"].as_bool(),
    })
}
