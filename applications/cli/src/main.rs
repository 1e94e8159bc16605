//! mixlink command-line front end.
//!
//! Drives the auth flow, the collaborative playlist store, and the Spotify
//! client from a terminal. Configuration comes from the environment (or a
//! `.env` file):
//!
//! - `MIXLINK_CLIENT_ID` - OAuth client id (required)
//! - `MIXLINK_ORIGIN` - origin used for share links and the redirect URI
//!   (default `http://localhost:3000`)
//! - `MIXLINK_DATA` - path of the JSON state file (default `mixlink.json`)

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;
use mixlink_auth::{AuthFlow, CallbackParams};
use mixlink_core::types::{SongOrder, Theme, Vote};
use mixlink_core::{ClientConfig, FileStore};
use mixlink_spotify::{mirror_playlist, push_song, SpotifyClient};
use mixlink_store::{settings, sort_songs, CollabStore};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mixlink")]
#[command(about = "Build collaborative Spotify playlists anyone with the link can add to", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a login and print the authorization URL to open in a browser
    Login,
    /// Complete a login from the callback URL the provider redirected to
    Callback {
        /// The full callback URL, including the query string
        #[arg(value_name = "URL")]
        url: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the logged-in Spotify profile
    Whoami,
    /// List your playlists on Spotify
    Playlists,
    /// List local collaborative playlists
    List,
    /// Create a collaborative playlist and print its share link
    Create {
        /// Playlist name
        name: String,
        /// Playlist description
        #[arg(long, default_value = "")]
        description: String,
        /// Your display name on the playlist
        #[arg(long, default_value = "Anonymous User")]
        owner: String,
    },
    /// Show a collaborative playlist by id or share link
    Show {
        /// Playlist id or any fragment of its share link
        identifier: String,
        /// Song ordering
        #[arg(long, value_enum, default_value_t = SortArg::Oldest)]
        sort: SortArg,
    },
    /// Search Spotify for tracks
    Search {
        /// Free-text query
        query: String,
        /// Maximum number of results
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Search for a track and add the first match to a playlist
    Add {
        /// Playlist id or share link fragment
        identifier: String,
        /// Free-text track query
        query: String,
        /// Your display name on the song
        #[arg(long, default_value = "Anonymous User")]
        name: String,
    },
    /// Vote on a song in a playlist
    Vote {
        /// Playlist id or share link fragment
        identifier: String,
        /// Song (track) id
        song_id: String,
        /// Vote direction
        #[arg(value_enum)]
        direction: VoteArg,
    },
    /// Mirror a collaborative playlist to a real Spotify playlist
    Mirror {
        /// Playlist id or share link fragment
        identifier: String,
    },
    /// Show or set the theme preference
    Theme {
        /// New theme; omit to print the current one
        #[arg(value_enum)]
        value: Option<ThemeArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Newest,
    Oldest,
    Votes,
}

impl From<SortArg> for SongOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => SongOrder::Newest,
            SortArg::Oldest => SongOrder::Oldest,
            SortArg::Votes => SongOrder::Votes,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum VoteArg {
    Up,
    Down,
}

impl From<VoteArg> for Vote {
    fn from(arg: VoteArg) -> Self {
        match arg {
            VoteArg::Up => Vote::Up,
            VoteArg::Down => Vote::Down,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

struct App {
    storage: Arc<FileStore>,
    auth: Arc<AuthFlow>,
    store: CollabStore,
    client: SpotifyClient,
}

impl App {
    fn from_env() -> Result<Self> {
        let client_id = std::env::var("MIXLINK_CLIENT_ID")
            .context("MIXLINK_CLIENT_ID is not set (put it in the environment or a .env file)")?;
        let origin = std::env::var("MIXLINK_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let data_path =
            std::env::var("MIXLINK_DATA").unwrap_or_else(|_| "mixlink.json".to_string());

        let config = ClientConfig::new(client_id, &origin);
        let storage = Arc::new(FileStore::new(data_path));
        let auth = Arc::new(AuthFlow::new(config.clone(), storage.clone())?);
        let store = CollabStore::new(storage.clone(), &origin);
        let client = SpotifyClient::new(config, auth.clone())?;

        Ok(Self {
            storage,
            auth,
            store,
            client,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may carry everything.
    let _ = dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let app = App::from_env()?;

    match cli.command {
        Commands::Login => login(&app).await,
        Commands::Callback { url } => callback(&app, &url).await,
        Commands::Logout => logout(&app).await,
        Commands::Whoami => whoami(&app).await,
        Commands::Playlists => playlists(&app).await,
        Commands::List => list(&app).await,
        Commands::Create {
            name,
            description,
            owner,
        } => create(&app, &name, &description, &owner).await,
        Commands::Show { identifier, sort } => show(&app, &identifier, sort.into()).await,
        Commands::Search { query, limit } => search(&app, &query, limit).await,
        Commands::Add {
            identifier,
            query,
            name,
        } => add(&app, &identifier, &query, &name).await,
        Commands::Vote {
            identifier,
            song_id,
            direction,
        } => vote(&app, &identifier, &song_id, direction.into()).await,
        Commands::Mirror { identifier } => mirror(&app, &identifier).await,
        Commands::Theme { value } => theme(&app, value.map(Into::into)).await,
    }
}

async fn login(app: &App) -> Result<()> {
    let url = app.auth.begin_login().await?;
    println!("Open this URL in a browser to log in:");
    println!("{url}");
    println!();
    println!("Then run: mixlink callback '<the URL you were redirected to>'");
    Ok(())
}

async fn callback(app: &App, url: &str) -> Result<()> {
    let params = CallbackParams::from_url(url)?;
    match app.auth.complete_login(&params).await {
        Ok(_) => {
            println!("Logged in.");
            if let Some(cleaned) = params.cleaned_url() {
                println!("(Authorization code consumed; the clean URL is {cleaned})");
            }
            Ok(())
        }
        // Callback failures are recoverable: report and suggest a retry.
        Err(e) => bail!("Login failed: {e}. Run `mixlink login` to try again."),
    }
}

async fn logout(app: &App) -> Result<()> {
    app.auth.logout().await?;
    println!("Logged out.");
    Ok(())
}

async fn whoami(app: &App) -> Result<()> {
    let user = app.client.get_current_user().await?;
    println!("{} ({})", user.name(), user.id);
    if let Some(email) = &user.email {
        println!("{email}");
    }
    Ok(())
}

async fn playlists(app: &App) -> Result<()> {
    let page = app.client.get_user_playlists().await?;
    if page.items.is_empty() {
        println!("No playlists on Spotify.");
        return Ok(());
    }
    for playlist in &page.items {
        let tracks = playlist.tracks.as_ref().map_or(0, |t| t.total);
        println!("{}  {} ({} tracks)", playlist.id, playlist.name, tracks);
    }
    Ok(())
}

async fn list(app: &App) -> Result<()> {
    let playlists = app.store.list_playlists().await?;
    if playlists.is_empty() {
        println!("No collaborative playlists yet. Create one with `mixlink create`.");
        return Ok(());
    }
    for playlist in &playlists {
        let mirrored = if playlist.spotify_id.is_some() {
            " [mirrored]"
        } else {
            ""
        };
        println!(
            "{}  {} - {} songs{}",
            playlist.id,
            playlist.name,
            playlist.songs.len(),
            mirrored
        );
        println!("    {}", playlist.share_link);
    }
    Ok(())
}

async fn create(app: &App, name: &str, description: &str, owner: &str) -> Result<()> {
    let playlist = app.store.create_playlist(name, description, owner).await?;
    println!("Created \"{}\"", playlist.name);
    println!("Share link (anyone with it can add songs): {}", playlist.share_link);
    Ok(())
}

async fn show(app: &App, identifier: &str, order: SongOrder) -> Result<()> {
    let playlist = app.store.find_playlist(identifier).await?;
    println!("{} - {}", playlist.name, playlist.description);
    println!(
        "Created by {} • {} songs • {}",
        playlist.created_by,
        playlist.songs.len(),
        playlist.share_link
    );
    if let Some(spotify_id) = &playlist.spotify_id {
        println!("Mirrored: https://open.spotify.com/playlist/{spotify_id}");
    }
    for song in sort_songs(&playlist.songs, order) {
        let user_vote = app
            .store
            .song_vote(identifier, &song.id)
            .await?
            .map_or("", |v| match v {
                Vote::Up => " (you voted up)",
                Vote::Down => " (you voted down)",
            });
        println!(
            "  {}  {} - {} [{}]  +{}/-{} (score {}){}",
            song.id,
            song.title,
            song.artist,
            song.duration,
            song.upvotes,
            song.downvotes,
            song.score(),
            user_vote
        );
    }
    Ok(())
}

async fn search(app: &App, query: &str, limit: u32) -> Result<()> {
    let tracks = app.client.search_tracks(query, limit).await?;
    if tracks.is_empty() {
        println!("No tracks found.");
        return Ok(());
    }
    for track in &tracks {
        let draft = track.to_draft();
        println!("{}  {} - {} [{}]", draft.id, draft.title, draft.artist, draft.duration);
    }
    Ok(())
}

async fn add(app: &App, identifier: &str, query: &str, name: &str) -> Result<()> {
    let tracks = app.client.search_tracks(query, 1).await?;
    let Some(track) = tracks.first() else {
        bail!("No track matched \"{query}\"");
    };

    let draft = track.to_draft();
    let title = draft.title.clone();
    let playlist = app.store.append_song(identifier, draft, name).await?;
    println!("Added \"{}\" to \"{}\"", title, playlist.name);

    // Keep an existing mirror in step, best effort: the local append stands
    // even if the remote push fails.
    if let Some(song) = playlist.songs.last().filter(|_| playlist.spotify_id.is_some()) {
        match push_song(&app.client, &playlist, song).await {
            Ok(()) => println!("Synced to the mirrored Spotify playlist."),
            Err(e) => println!("Added locally, but syncing to Spotify failed: {e}"),
        }
    }
    Ok(())
}

async fn vote(app: &App, identifier: &str, song_id: &str, direction: Vote) -> Result<()> {
    let playlist = app.store.vote(identifier, song_id, direction).await?;
    let song = playlist
        .song(song_id)
        .context("song disappeared after voting")?;
    let current = app.store.song_vote(identifier, song_id).await?;
    println!(
        "{}: +{}/-{} (score {}), your vote: {}",
        song.title,
        song.upvotes,
        song.downvotes,
        song.score(),
        current.map_or("none", |v| v.as_str())
    );
    Ok(())
}

async fn mirror(app: &App, identifier: &str) -> Result<()> {
    match mirror_playlist(&app.store, &app.client, identifier).await {
        Ok(playlist) => {
            let spotify_id = playlist.spotify_id.as_deref().unwrap_or_default();
            println!(
                "Mirrored \"{}\": https://open.spotify.com/playlist/{}",
                playlist.name, spotify_id
            );
            Ok(())
        }
        Err(mixlink_spotify::SyncError::TrackAddFailed(e)) => {
            // The remote playlist exists; only the track push failed.
            println!("Remote playlist created, but pushing tracks failed: {e}");
            println!("Run `mixlink mirror` again to retry the push.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn theme(app: &App, value: Option<Theme>) -> Result<()> {
    match value {
        Some(theme) => {
            settings::set_theme(app.storage.as_ref(), theme).await?;
            println!("Theme set to {theme:?}.");
        }
        None => {
            let current = settings::get_theme(app.storage.as_ref()).await?;
            println!("Theme: {current:?}");
        }
    }
    Ok(())
}
