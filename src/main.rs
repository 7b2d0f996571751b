use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kizuna::{App, Config, StoreError};
use log::{LevelFilter, error};
use serde::Serialize;
use thiserror::Error;

/// kizuna - local-first songwriting store
#[derive(Parser)]
#[command(name = "kizuna")]
#[command(about = "A local-first songwriting environment")]
#[command(version)]
struct Cli {
    /// Database file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Save editor content as a new or existing song
    Save(SaveCommand),
    /// Print a song with its tracks
    Show {
        /// Song id
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// List the most recently edited songs
    Recent,
    /// List the instrument catalog
    Instruments,
}

/// Save a quick idea
#[derive(Parser)]
struct SaveCommand {
    /// Song to update; 0 creates a new song
    #[arg(long, default_value_t = 0)]
    id: i64,

    /// Song title; empty saves as "Untitled Idea"
    #[arg(short, long, default_value = "")]
    title: String,

    /// Notation text for the default track
    #[arg(short, long, conflicts_with = "file")]
    content: Option<String>,

    /// Read the notation text from a file
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,
}

/// Problems with the input given to `save`.
#[derive(Debug, Error)]
enum InputError {
    #[error("no content given; pass --content or --file")]
    MissingContent,

    #[error("failed to read content file {}: {source}", path.display())]
    ContentFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Serialize)]
struct SavedSong {
    id: i64,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env_with(cli.db.clone());
    init_logging(
        config
            .as_ref()
            .map(|c| c.log_level)
            .unwrap_or(LevelFilter::Info),
    );

    let result = config.and_then(|config| run(&cli, config));

    if let Err(e) = result {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        error!("{e:#}");
        std::process::exit(exit_code);
    }
}

fn init_logging(level: LevelFilter) {
    let mut clog = colog::default_builder();
    clog.filter(None, level);
    clog.init();
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are unknown or invalid song ids and missing or unreadable
/// save input. Database failures are internal errors.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.downcast_ref::<InputError>().is_some()
        || error
            .downcast_ref::<StoreError>()
            .is_some_and(StoreError::is_user_error)
}

fn run(cli: &Cli, config: Config) -> Result<()> {
    let app = App::open(&config)?;

    match &cli.command {
        Commands::Save(cmd) => execute_save(&app, cmd),
        Commands::Show { id } => print_json(&app.get_song(*id)?),
        Commands::Recent => print_json(&app.get_recent_songs()?),
        Commands::Instruments => print_json(&app.instruments()?),
    }
}

/// Executes the save command against an open app.
///
/// Separated from `run` to allow testing with in-memory databases.
fn execute_save(app: &App, cmd: &SaveCommand) -> Result<()> {
    let content = read_content(cmd)?;
    let id = app
        .save_quick_idea(cmd.id, &cmd.title, &content)
        .context("Failed to save song")?;

    print_json(&SavedSong { id: id.get() })
}

/// Resolves the notation text from `--content` or `--file`.
///
/// `--content ""` saves an empty track; giving neither flag is an error.
fn read_content(cmd: &SaveCommand) -> Result<String, InputError> {
    match (&cmd.content, &cmd.file) {
        (Some(content), _) => Ok(content.clone()),
        (None, Some(path)) => {
            std::fs::read_to_string(path).map_err(|source| InputError::ContentFile {
                path: path.clone(),
                source,
            })
        }
        (None, None) => Err(InputError::MissingContent),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
