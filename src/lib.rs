//! Local-first storage for songwriting sessions.
//!
//! Songs, their instrument tracks, albums and recorded audio versions live in
//! one SQLite file. [`App`] is the surface a UI host calls; [`SongService`]
//! holds the persistence logic over the [`Database`] connection.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;

pub use app::{App, UNTITLED_IDEA};
pub use config::Config;
pub use db::Database;
pub use error::{SaveStep, StoreError};
pub use models::{
    Album, AlbumId, AudioVersion, AudioVersionId, Instrument, InstrumentId, Song, SongId,
    SongSummary, Track, TrackId,
};
pub use service::{RECENT_SONGS_LIMIT, SongService};
