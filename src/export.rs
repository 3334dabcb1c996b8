//! Track list exporters. One entry per track, fields written as they are.

use std::{io::Write, path::Path};

use clap::ValueEnum;

use crate::{error::ExportError, types::Track, utils};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Txt,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
        }
    }
}

pub const CSV_HEADER: [&str; 6] = [
    "Track Name",
    "Artist(s)",
    "Album",
    "Duration",
    "Spotify URL",
    "Popularity",
];

pub fn default_file_name(stem: &str, format: ExportFormat) -> String {
    format!("{}.{}", stem, format.extension())
}

pub fn write_text<W: Write>(mut writer: W, tracks: &[Track]) -> Result<(), ExportError> {
    writeln!(writer, "Spotify Track List")?;
    writeln!(writer, "{}", "=".repeat(50))?;
    writeln!(writer)?;

    for track in tracks {
        writeln!(writer, "Track: {}", track.name)?;
        writeln!(writer, "Artist(s): {}", track.artist_names().join(", "))?;
        writeln!(writer, "Album: {}", track.album_name())?;
        writeln!(writer, "Duration: {}", utils::format_duration(track.duration_ms))?;
        if let Some(url) = track.spotify_url() {
            writeln!(writer, "Spotify URL: {}", url)?;
        }
        writeln!(writer, "{}", "-".repeat(30))?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_csv<W: Write>(writer: W, tracks: &[Track]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(CSV_HEADER)?;

    for track in tracks {
        writer.write_record([
            track.name.clone(),
            track.artist_names().join(", "),
            track.album_name().to_string(),
            utils::format_duration(track.duration_ms),
            track.spotify_url().unwrap_or_default(),
            track.popularity.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Renders the tracks in the given format.
pub fn render(format: ExportFormat, tracks: &[Track]) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    match format {
        ExportFormat::Txt => write_text(&mut buf, tracks)?,
        ExportFormat::Csv => write_csv(&mut buf, tracks)?,
    }
    Ok(buf)
}

/// Writes the tracks to `path`, replacing any existing file.
pub async fn export_to_file(
    path: &Path,
    format: ExportFormat,
    tracks: &[Track],
) -> Result<(), ExportError> {
    let content = render(format, tracks)?;
    async_fs::write(path, content).await?;
    Ok(())
}
