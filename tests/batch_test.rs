use std::{
    collections::HashMap,
    sync::{Mutex, OnceLock},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};

use spotools::batch::{self, SearchSource};
use spotools::error::SpotifyError;
use spotools::spotify::{playlist, search};
use spotools::types::{CreatePlaylistRequest, SongRequest};
use spotools::utils;

const TOKEN: &str = "test-token";

// Every request the local API receives, in arrival order
static REQUESTS: Mutex<Vec<String>> = Mutex::new(Vec::new());
static SERVER: OnceLock<String> = OnceLock::new();

fn record(key: &str) -> usize {
    let mut requests = REQUESTS.lock().unwrap();
    requests.push(key.to_string());
    requests.iter().filter(|k| *k == key).count()
}

fn hits(key: &str) -> usize {
    REQUESTS
        .lock()
        .unwrap()
        .iter()
        .filter(|k| *k == key)
        .count()
}

fn requests_starting_with(prefix: &str) -> Vec<String> {
    REQUESTS
        .lock()
        .unwrap()
        .iter()
        .filter(|k| k.starts_with(prefix))
        .cloned()
        .collect()
}

fn web_track(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "uri": format!("spotify:track:{}", id),
        "duration_ms": 225000,
        "popularity": 50,
        "explicit": false,
        "external_urls": { "spotify": format!("https://open.spotify.com/track/{}", id) },
        "artists": [{ "id": "a1", "name": "Test Artist", "uri": "spotify:artist:a1" }],
        "album": { "id": "al1", "name": "Test Album", "uri": "spotify:album:al1", "images": [] }
    })
}

fn partner_item(id: &str, name: &str, artist: &str) -> Value {
    json!({
        "item": {
            "data": {
                "uri": format!("spotify:track:{}", id),
                "name": name,
                "artists": { "items": [{ "uri": "spotify:artist:x", "profile": { "name": artist } }] }
            }
        }
    })
}

// Song titles select the behaviour: "error500 ...", "missing ...", etc.
async fn search_handler(Query(params): Query<HashMap<String, String>>) -> Response {
    let query = params.get("q").cloned().unwrap_or_default();
    let attempt = record(&query);

    let song = query
        .strip_prefix("track:")
        .and_then(|q| q.split(" artist:").next())
        .unwrap_or_default()
        .to_string();

    if song.starts_with("unauthorized") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if song.starts_with("forbidden") {
        return StatusCode::FORBIDDEN.into_response();
    }
    if song.starts_with("error500") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    if song.starts_with("missing") {
        return Json(json!({ "tracks": { "items": [] } })).into_response();
    }
    if song.starts_with("always502") || (song.starts_with("retry502") && attempt < 3) {
        return StatusCode::BAD_GATEWAY.into_response();
    }
    if song.starts_with("ratelimited") && attempt < 2 {
        return (StatusCode::TOO_MANY_REQUESTS, [(RETRY_AFTER, "0")]).into_response();
    }
    if song.starts_with("longwait") {
        return (StatusCode::TOO_MANY_REQUESTS, [(RETRY_AFTER, "300")]).into_response();
    }

    let id = song.to_lowercase().replace(' ', "");
    Json(json!({ "tracks": { "items": [web_track(&id, &song)] } })).into_response()
}

async fn track_handler(Path(id): Path<String>) -> Json<Value> {
    record(&format!("track:{}", id));
    Json(web_track(&id, &format!("Track {}", id)))
}

async fn me_handler() -> Json<Value> {
    Json(json!({ "id": "tester", "display_name": "Tester" }))
}

async fn create_playlist_handler(
    Path(user): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    record(&format!("create:{}:{}", user, name));

    let id = format!("pl-{}", name.to_lowercase().replace(' ', "-"));
    (StatusCode::CREATED, Json(json!({ "id": id, "name": name })))
}

async fn add_tracks_handler(
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let count = body["uris"].as_array().map_or(0, |u| u.len());
    record(&format!("add:{}:{}", id, count));
    (StatusCode::CREATED, Json(json!({ "snapshot_id": "snap" })))
}

async fn partner_handler(Json(body): Json<Value>) -> Json<Value> {
    let term = body["variables"]["searchTerm"].as_str().unwrap_or_default();
    record(&format!("partner:{}", term));

    Json(json!({
        "data": { "searchV2": { "tracksV2": { "items": [
            partner_item("k1", "Bailando (Karaoke)", "Karaoke Stars"),
            partner_item("p1", "Bailando", "Paradisio"),
            partner_item("e1", "Bailando", "Enrique Iglesias")
        ] } } }
    }))
}

fn app() -> Router {
    Router::new()
        .route("/search", get(search_handler))
        .route("/tracks/{id}", get(track_handler))
        .route("/me", get(me_handler))
        .route("/users/{user}/playlists", post(create_playlist_handler))
        .route("/playlists/{id}/tracks", post(add_tracks_handler))
        .route("/partner", post(partner_handler))
}

/// Starts the local API once for the whole test binary and points the
/// configuration at it.
fn server() -> &'static str {
    SERVER.get_or_init(|| {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        // SAFETY: runs once inside the OnceLock initializer, before any test
        // issues a request.
        unsafe {
            std::env::set_var("SPOTIFY_API_URL", &base);
            std::env::set_var("SPOTIFY_PARTNER_URL", format!("{}/partner", base));
            std::env::set_var("SPOTIFY_RETRY_PAUSE_MS", "1");
        }

        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app()).await.unwrap();
            });
        });

        base
    })
}

#[tokio::test]
async fn test_failed_searches_are_counted_as_missing() {
    server();
    let songs = vec![
        SongRequest::new("Sandstorm", "Darude"),
        SongRequest::new("error500 song", "Darude"),
        SongRequest::new("missing song", "Darude"),
    ];

    let outcome = batch::resolve_songs(SearchSource::Web, Some(TOKEN), &songs, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(outcome.requested, 3);
    assert_eq!(outcome.found.len(), 1);
    assert_eq!(outcome.found[0].name, "Sandstorm");
    assert_eq!(outcome.missing, songs[1..].to_vec());
    assert_eq!(outcome.uris(), vec!["spotify:track:sandstorm".to_string()]);
}

#[tokio::test]
async fn test_unauthorized_stops_the_batch() {
    server();
    let songs = vec![
        SongRequest::new("unauthorized song", "Darude"),
        SongRequest::new("after the failure", "Darude"),
    ];

    let err = batch::resolve_songs(SearchSource::Web, Some(TOKEN), &songs, Duration::ZERO)
        .await
        .unwrap_err();

    assert!(matches!(err, SpotifyError::Unauthorized));
    assert_eq!(hits(&search::field_query("unauthorized song", "Darude")), 1);
    assert_eq!(hits(&search::field_query("after the failure", "Darude")), 0);
}

#[tokio::test]
async fn test_web_search_without_token_is_unauthorized() {
    let song = SongRequest::new("Sandstorm", "Darude");
    let err = batch::resolve_song(SearchSource::Web, None, &song)
        .await
        .unwrap_err();
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_forbidden_names_the_action() {
    server();
    let query = search::field_query("forbidden song", "Darude");

    let err = search::search_tracks(TOKEN, &query, 1).await.unwrap_err();
    assert!(matches!(err, SpotifyError::Forbidden(ref action) if action == "search"));
}

#[tokio::test]
async fn test_bad_gateway_is_retried() {
    server();
    let query = search::field_query("retry502 song", "Darude");

    let tracks = search::search_tracks(TOKEN, &query, 1).await.unwrap();

    assert_eq!(tracks.len(), 1);
    // Two 502 responses, then the successful attempt
    assert_eq!(hits(&query), 3);
}

#[tokio::test]
async fn test_bad_gateway_gives_up_after_five_attempts() {
    server();
    let query = search::field_query("always502 song", "Darude");

    let err = search::search_tracks(TOKEN, &query, 1).await.unwrap_err();

    assert!(
        matches!(err, SpotifyError::Status(status, _) if status == reqwest::StatusCode::BAD_GATEWAY)
    );
    assert_eq!(hits(&query), 5);
}

#[tokio::test]
async fn test_short_rate_limit_is_waited_out() {
    server();
    let query = search::field_query("ratelimited song", "Darude");

    let tracks = search::search_tracks(TOKEN, &query, 1).await.unwrap();

    assert_eq!(tracks.len(), 1);
    assert_eq!(hits(&query), 2);
}

#[tokio::test]
async fn test_long_rate_limit_fails() {
    server();
    let query = search::field_query("longwait song", "Darude");

    let err = search::search_tracks(TOKEN, &query, 1).await.unwrap_err();

    assert!(matches!(err, SpotifyError::RateLimited(300)));
    assert_eq!(hits(&query), 1);
}

#[tokio::test]
async fn test_track_lookup_from_url() {
    server();
    let id = utils::extract_track_id("https://open.spotify.com/track/abc123?si=xyz").unwrap();

    let track = search::track(TOKEN, &id).await.unwrap();

    assert_eq!(track.id.as_deref(), Some("abc123"));
    assert_eq!(track.name, "Track abc123");
    assert_eq!(hits("track:abc123"), 1);
}

#[tokio::test]
async fn test_add_tracks_sends_batches_of_100() {
    server();
    let uris: Vec<String> = (0..101).map(|i| format!("spotify:track:t{}", i)).collect();

    let added = playlist::add_tracks(TOKEN, "pl-split", &uris).await.unwrap();

    assert_eq!(added, 101);
    assert_eq!(
        requests_starting_with("add:pl-split:"),
        vec!["add:pl-split:100".to_string(), "add:pl-split:1".to_string()]
    );
}

#[tokio::test]
async fn test_add_tracks_with_no_uris_sends_nothing() {
    server();

    let added = playlist::add_tracks(TOKEN, "pl-empty", &[]).await.unwrap();

    assert_eq!(added, 0);
    assert!(requests_starting_with("add:pl-empty:").is_empty());
}

#[tokio::test]
async fn test_create_playlist_from_songs() {
    server();
    let songs = vec![
        SongRequest::new("Sandstorm", "Darude"),
        SongRequest::new("missing track", "Nobody"),
    ];
    let request = CreatePlaylistRequest {
        name: "Eurodance Test".to_string(),
        description: String::new(),
        public: true,
        collaborative: false,
    };

    let result = batch::create_playlist_from_songs(
        SearchSource::Web,
        TOKEN,
        &songs,
        &request,
        Duration::ZERO,
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(result.playlist_id, "pl-eurodance-test");
    assert_eq!(
        result.playlist_url,
        "https://open.spotify.com/playlist/pl-eurodance-test"
    );
    assert_eq!(result.tracks_found, 1);
    assert_eq!(result.tracks_requested, 2);
    assert_eq!(result.tracks_added, 1);
    assert_eq!(hits("create:tester:Eurodance Test"), 1);
    assert_eq!(hits("add:pl-eurodance-test:1"), 1);
}

#[tokio::test]
async fn test_no_playlist_without_found_tracks() {
    server();
    let songs = vec![SongRequest::new("missing again", "Nobody")];
    let request = CreatePlaylistRequest {
        name: "Nothing Found".to_string(),
        description: String::new(),
        public: true,
        collaborative: false,
    };

    let result = batch::create_playlist_from_songs(
        SearchSource::Web,
        TOKEN,
        &songs,
        &request,
        Duration::ZERO,
    )
    .await
    .unwrap();

    assert!(result.is_none());
    assert_eq!(hits("create:tester:Nothing Found"), 0);
}

#[tokio::test]
async fn test_add_songs_to_existing_playlist() {
    server();
    let songs = vec![
        SongRequest::new("Children", "Robert Miles"),
        SongRequest::new("Insomnia", "Faithless"),
    ];

    let outcome =
        batch::add_songs_to_playlist(SearchSource::Web, TOKEN, "pl-existing", &songs, Duration::ZERO)
            .await
            .unwrap();

    assert_eq!(outcome.found.len(), 2);
    assert_eq!(hits("add:pl-existing:2"), 1);
}

#[tokio::test]
async fn test_partner_search_keeps_best_match() {
    server();
    let songs = vec![
        SongRequest::new("Bailando", "Paradisio"),
        SongRequest::new("Yesterday", "The Beatles"),
    ];

    let outcome = batch::resolve_songs(SearchSource::Partner, None, &songs, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(outcome.found.len(), 1);
    assert_eq!(outcome.found[0].uri, "spotify:track:p1");
    assert_eq!(outcome.missing, vec![songs[1].clone()]);
    assert_eq!(hits("partner:Paradisio Bailando"), 1);
}
