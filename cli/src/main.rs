//! DovahCloud command-line client
//!
//! Drives a [`Library`] against a DovahCloud backend for one command, then
//! prints every notification the command produced.
//!
//! Usage:
//!   dovah --username ana --password secret files --search beach
//!   dovah playlist create "Road trip"
//!
//! Credentials can also come from `DOVAH_USERNAME` / `DOVAH_PASSWORD`, and
//! the backend from `DOVAH_API_URL`.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dovah_client::UploadFile;
use dovah_sync::{Library, LibraryConfig};
use dovah_types::{
    Credentials, FileId, MediaFile, NotificationLevel, PlaylistId, SortOrder, TagId,
    UploadOptions,
};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dovah")]
#[command(about = "DovahCloud media library client")]
struct Args {
    /// API base URL (overrides config and DOVAH_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Sign in as this user when no session is active
    #[arg(short, long, env = "DOVAH_USERNAME")]
    username: Option<String>,

    #[arg(short, long, env = "DOVAH_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print lists as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the signed-in user
    Session,
    /// Sign out of the server session
    Logout,
    /// List files
    Files {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        favorites: bool,
        /// MIME prefix, e.g. `image/` or `application/pdf`
        #[arg(short = 't', long = "type")]
        mime_type: Option<String>,
        /// Tag id or name, filtered locally
        #[arg(long)]
        tag: Option<String>,
        /// recent, oldest, name or name_desc
        #[arg(short, long, default_value = "recent")]
        order: SortOrder,
    },
    /// List tags
    Tags,
    /// List playlists
    Playlists,
    /// Show library counters
    Stats,
    /// Toggle the favorite flag on a file
    Favorite { id: String },
    /// Upload files in one submission
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Convert documents to PDF
        #[arg(long)]
        pdf: bool,
        /// Extract audio from videos
        #[arg(long)]
        audio: bool,
        /// Store in the private area
        #[arg(long)]
        private: bool,
    },
    /// Manage playlists
    #[command(subcommand)]
    Playlist(PlaylistCommand),
    /// Show file details and its stream link
    Open { id: String },
}

#[derive(Subcommand, Debug)]
enum PlaylistCommand {
    Create {
        name: String,
    },
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    Add {
        playlist: String,
        file: String,
    },
    Remove {
        playlist: String,
        file: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .compact()
        .init();

    let mut config = match &args.config {
        Some(path) => LibraryConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => LibraryConfig::from_env()?,
    };
    if let Some(url) = &args.api_url {
        config.client.base_url = url.clone();
    }
    debug!("Using API at {}", config.client.base_url);

    let library = Library::connect(config)?;
    let outcome = run(&library, &args).await;
    print_notifications(&library).await;
    outcome
}

async fn run(library: &Library, args: &Args) -> Result<()> {
    let session = library.start().await;
    if !session.is_authenticated() {
        match (&args.username, &args.password) {
            (Some(username), Some(password)) => {
                let user = library
                    .login(&Credentials::new(username.as_str(), password.as_str()))
                    .await
                    .context("sign-in failed")?;
                info!("Signed in as {}", user.username);
            }
            _ if matches!(args.command, Command::Session) => {}
            _ => bail!("not signed in; pass --username and --password"),
        }
    }

    match &args.command {
        Command::Session => match library.session().user().await {
            Some(user) => println!("{} (id {})", user.username, user.id),
            None => println!("not signed in"),
        },
        Command::Logout => {
            // Notifications are cleared by a successful logout.
            library.logout().await?;
        }
        Command::Files {
            search,
            favorites,
            mime_type,
            tag,
            order,
        } => {
            library
                .update_criteria(|c| {
                    c.search_text = search.clone().unwrap_or_default();
                    c.favorites_only = *favorites;
                    c.mime_type_prefix = mime_type.clone();
                    c.order = *order;
                })
                .await?;
            if let Some(tag) = tag {
                let tag_id = resolve_tag(library, tag).await?;
                library.select_tag(Some(tag_id)).await?;
            }
            let files = library.visible_files().await;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&files)?);
            } else {
                for file in &files {
                    print_file(file);
                }
            }
        }
        Command::Tags => {
            let tags = library.store().tags().await;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&tags)?);
            } else {
                for tag in tags {
                    println!("{:>6}  {}", tag.id, tag.name);
                }
            }
        }
        Command::Playlists => {
            let playlists = library.store().playlists().await;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&playlists)?);
            } else {
                for playlist in playlists {
                    println!(
                        "{:>6}  {} ({} items)",
                        playlist.id,
                        playlist.name,
                        playlist.items.len()
                    );
                }
            }
        }
        Command::Stats => {
            let stats = library.stats().await;
            println!("total:     {}", stats.total);
            println!("favorites: {}", stats.favorites);
            println!("private:   {}", stats.private);
        }
        Command::Favorite { id } => {
            let toggle = library.toggle_favorite(&FileId::from(id.as_str())).await?;
            println!(
                "{} is {}",
                toggle.id,
                if toggle.favorite { "a favorite" } else { "no longer a favorite" }
            );
        }
        Command::Upload {
            paths,
            pdf,
            audio,
            private,
        } => {
            let mut files = Vec::with_capacity(paths.len());
            for path in paths {
                files.push(UploadFile::from_path(path).await?);
            }
            let options = UploadOptions {
                convert_to_pdf: *pdf,
                convert_to_audio: *audio,
                private: *private,
            };
            let result = library.upload(files, options).await?;
            for file in &result.uploaded {
                print_file(file);
            }
        }
        Command::Playlist(command) => run_playlist(library, command).await?,
        Command::Open { id } => {
            let id = FileId::from(id.as_str());
            let file = library.store().open_file(&id).await?;
            print_file(&file);
            if !file.description.is_empty() {
                println!("        {}", file.description);
            }
            if let Some(link) = library.store().media_link(&id).await {
                println!("        {link}");
            }
        }
    }
    Ok(())
}

async fn run_playlist(library: &Library, command: &PlaylistCommand) -> Result<()> {
    let playlists = library.playlists();
    match command {
        PlaylistCommand::Create { name } => {
            let created = playlists.create(name).await?;
            println!("{:>6}  {}", created.id, created.name);
        }
        PlaylistCommand::Delete { id, yes } => {
            let token = playlists.request_delete(&PlaylistId::from(id.as_str())).await?;
            if *yes || confirm(&format!("Delete playlist {id}? [y/N] ")).await? {
                playlists.confirm(&token).await?;
            } else {
                playlists.cancel(&token).await;
                println!("cancelled");
            }
        }
        PlaylistCommand::Add { playlist, file } => {
            playlists.select(&PlaylistId::from(playlist.as_str())).await?;
            let updated = playlists.add_item(&FileId::from(file.as_str())).await?;
            println!("{} now has {} items", updated.name, updated.items.len());
        }
        PlaylistCommand::Remove { playlist, file } => {
            playlists.select(&PlaylistId::from(playlist.as_str())).await?;
            if let Some(updated) = playlists.remove_item(&FileId::from(file.as_str())).await? {
                println!("{} now has {} items", updated.name, updated.items.len());
            }
        }
    }
    Ok(())
}

/// Accepts a tag id or an exact tag name.
async fn resolve_tag(library: &Library, raw: &str) -> Result<TagId> {
    let tags = library.store().tags().await;
    tags.iter()
        .find(|tag| tag.id.as_str() == raw || tag.name == raw)
        .map(|tag| tag.id.clone())
        .with_context(|| format!("unknown tag {raw:?}"))
}

async fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{prompt}");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn print_file(file: &MediaFile) {
    let star = if file.is_favorite { '*' } else { ' ' };
    let lock = if file.is_private { " [private]" } else { "" };
    println!(
        "{:>6} {} {}  {}{}",
        file.id, star, file.name, file.mime_type, lock
    );
}

async fn print_notifications(library: &Library) {
    for n in library.take_notifications().await {
        let tag = match n.level {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "ok",
            NotificationLevel::Warning => "warn",
            NotificationLevel::Error => "error",
        };
        eprintln!("[{tag}] {}: {}", n.title, n.body);
    }
}
