use spotools::export::*;
use spotools::types::{Track, TrackAlbum, TrackArtist};

fn create_test_track(name: &str, artist: &str, uri: &str) -> Track {
    Track {
        name: name.to_string(),
        uri: uri.to_string(),
        artists: vec![TrackArtist {
            name: artist.to_string(),
            ..Default::default()
        }],
        album: Some(TrackAlbum {
            name: "Greatest Hits".to_string(),
            ..Default::default()
        }),
        duration_ms: 225_000,
        popularity: 42,
        ..Default::default()
    }
}

#[test]
fn test_default_file_name() {
    assert_eq!(default_file_name("found_tracks", ExportFormat::Txt), "found_tracks.txt");
    assert_eq!(default_file_name("found_tracks", ExportFormat::Csv), "found_tracks.csv");
}

#[test]
fn test_write_text() {
    let tracks = vec![
        create_test_track("Bailando", "Paradisio", "spotify:track:abc"),
        create_test_track("Local File", "Nobody", ""),
    ];

    let mut buf = Vec::new();
    write_text(&mut buf, &tracks).unwrap();
    let out = String::from_utf8(buf).unwrap();

    assert!(out.starts_with("Spotify Track List\n"));
    assert!(out.contains(&"=".repeat(50)));
    assert!(out.contains("Track: Bailando\n"));
    assert!(out.contains("Artist(s): Paradisio\n"));
    assert!(out.contains("Album: Greatest Hits\n"));
    assert!(out.contains("Duration: 3:45\n"));
    assert!(out.contains("Spotify URL: https://open.spotify.com/track/abc\n"));

    // One separator per track, no URL line for a track without one
    assert_eq!(out.matches(&"-".repeat(30)).count(), 2);
    assert_eq!(out.matches("Spotify URL:").count(), 1);
}

#[test]
fn test_render_matches_writers() {
    let tracks = vec![create_test_track("Bailando", "Paradisio", "spotify:track:abc")];

    let mut text = Vec::new();
    write_text(&mut text, &tracks).unwrap();
    assert_eq!(render(ExportFormat::Txt, &tracks).unwrap(), text);

    let mut csv_out = Vec::new();
    write_csv(&mut csv_out, &tracks).unwrap();
    assert_eq!(render(ExportFormat::Csv, &tracks).unwrap(), csv_out);
}

#[test]
fn test_write_csv() {
    let mut track = create_test_track("Hello, World", "Paradisio", "spotify:track:abc");
    track.external_url = Some("https://open.spotify.com/track/xyz".to_string());

    let mut buf = Vec::new();
    write_csv(&mut buf, &[track]).unwrap();

    let mut reader = csv::Reader::from_reader(buf.as_slice());
    let headers: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(String::from)
        .collect();
    assert_eq!(headers, CSV_HEADER);

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);

    // Commas in fields are quoted and read back intact
    assert_eq!(&records[0][0], "Hello, World");
    assert_eq!(&records[0][1], "Paradisio");
    assert_eq!(&records[0][2], "Greatest Hits");
    assert_eq!(&records[0][3], "3:45");
    assert_eq!(&records[0][4], "https://open.spotify.com/track/xyz");
    assert_eq!(&records[0][5], "42");
}

#[tokio::test]
async fn test_export_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let tracks = vec![create_test_track("Bailando", "Paradisio", "spotify:track:abc")];

    let txt = dir.path().join("tracks.txt");
    export_to_file(&txt, ExportFormat::Txt, &tracks).await.unwrap();
    let content = std::fs::read_to_string(&txt).unwrap();
    assert!(content.contains("Track: Bailando"));

    // Existing files are replaced
    let csv_path = dir.path().join("tracks.csv");
    std::fs::write(&csv_path, "stale content that is longer than the export").unwrap();
    export_to_file(&csv_path, ExportFormat::Csv, &tracks)
        .await
        .unwrap();
    let content = std::fs::read_to_string(&csv_path).unwrap();
    assert!(content.starts_with("Track Name,"));
    assert!(!content.contains("stale"));
}

#[tokio::test]
async fn test_export_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("tracks.txt");

    assert!(
        export_to_file(&path, ExportFormat::Txt, &[])
            .await
            .is_err()
    );
}
