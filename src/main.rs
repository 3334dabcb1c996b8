use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotools::{
    batch::SearchSource, cli, config, export::ExportFormat, types::PkceToken, warning,
    weeks::DEFAULT_TARGET_AGE,
};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Bearer token copied from open.spotify.com (defaults to SPOTIFY_BEARER_TOKEN,
    /// then the token stored by `spotools auth`)
    #[clap(long, global = true)]
    token: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Show the current user
    Me,

    /// Search tracks
    Search(SearchOptions),

    /// Resolve a song list file to Spotify tracks
    Batch(BatchOptions),

    /// Create, fill, list and analyze playlists
    Playlist(PlaylistOptions),

    /// Render a life in weeks grid
    Weeks(WeeksOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ExportOptions {
    /// Export the tracks as text or CSV
    #[clap(long, value_enum)]
    export: Option<ExportFormat>,

    /// Output file for --export (defaults to a name derived from the command)
    #[clap(long, short, requires = "export")]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct SourceOptions {
    /// Search endpoint used to resolve songs
    #[clap(long, value_enum, default_value = "web")]
    source: SearchSource,

    /// Pause between search requests in milliseconds (defaults to SPOTIFY_REQUEST_DELAY_MS or 300)
    #[clap(long)]
    delay_ms: Option<u64>,
}

impl SourceOptions {
    fn delay(&self) -> Duration {
        self.delay_ms
            .map(Duration::from_millis)
            .unwrap_or_else(config::request_delay)
    }
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Search term, e.g. "Paradisio Bailando", or a track URL / URI to look up directly
    term: String,

    /// Number of results
    #[clap(long, default_value_t = 10)]
    limit: u32,

    /// Search endpoint
    #[clap(long, value_enum, default_value = "web")]
    source: SearchSource,

    #[command(flatten)]
    export: ExportOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct BatchOptions {
    /// File with one "Song Title - Artist Name" per line
    file: PathBuf,

    #[command(flatten)]
    source: SourceOptions,

    #[command(flatten)]
    export: ExportOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    #[command(subcommand)]
    command: PlaylistSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistSubcommand {
    /// Create a playlist from a song list file
    Create(PlaylistCreateOpts),

    /// Add songs from a song list file to an existing playlist
    Add(PlaylistAddOpts),

    /// List your playlists
    List(PlaylistListOpts),

    /// Show the tracks of a playlist
    Tracks(PlaylistTracksOpts),

    /// Show statistics for a playlist
    Analyze(PlaylistTracksOpts),
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistCreateOpts {
    /// File with one "Song Title - Artist Name" per line
    file: PathBuf,

    /// Playlist name
    #[clap(long)]
    name: String,

    /// Playlist description
    #[clap(long, default_value = "")]
    description: String,

    /// Create a private playlist
    #[clap(long)]
    private: bool,

    /// Do nothing when a playlist with the same name already exists
    #[clap(long)]
    skip_existing: bool,

    #[command(flatten)]
    source: SourceOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistAddOpts {
    /// Playlist URL, URI or ID
    playlist: String,

    /// File with one "Song Title - Artist Name" per line
    file: PathBuf,

    #[command(flatten)]
    source: SourceOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistListOpts {
    /// Number of playlists to show (max 50)
    #[clap(long, default_value_t = 50)]
    limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistTracksOpts {
    /// Playlist URL, URI or ID
    playlist: String,

    #[command(flatten)]
    export: ExportOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct WeeksOptions {
    /// Birth date (YYYY-MM-DD)
    #[clap(long)]
    birth_date: String,

    /// Age the grid runs up to
    #[clap(long, default_value_t = DEFAULT_TARGET_AGE)]
    target_age: u32,

    /// Title printed above the grid
    #[clap(long, default_value = "A LIFE IN WEEKS")]
    title: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    let token = cli.token;

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Me => cli::me(token).await,
        Command::Search(opt) => {
            cli::search(
                opt.term,
                opt.limit,
                opt.source,
                token,
                opt.export.export,
                opt.export.output,
            )
            .await
        }
        Command::Batch(opt) => {
            cli::batch(
                opt.file,
                opt.source.source,
                token,
                opt.source.delay(),
                opt.export.export,
                opt.export.output,
            )
            .await
        }
        Command::Playlist(opt) => match opt.command {
            PlaylistSubcommand::Create(c) => {
                cli::create_playlist(
                    c.file,
                    c.name,
                    c.description,
                    c.private,
                    c.skip_existing,
                    c.source.source,
                    token,
                    c.source.delay(),
                )
                .await
            }
            PlaylistSubcommand::Add(a) => {
                cli::add_to_playlist(a.playlist, a.file, a.source.source, token, a.source.delay())
                    .await
            }
            PlaylistSubcommand::List(l) => cli::list_playlists(l.limit, token).await,
            PlaylistSubcommand::Tracks(t) => {
                cli::playlist_tracks(t.playlist, token, t.export.export, t.export.output).await
            }
            PlaylistSubcommand::Analyze(t) => {
                cli::analyze_playlist(t.playlist, token, t.export.export, t.export.output).await
            }
        },
        Command::Weeks(opt) => cli::weeks(opt.birth_date, opt.target_age, opt.title),
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
