use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::error::StoreError;
use crate::models::{Album, AlbumId, AudioVersion, Instrument, Song, SongId, SongSummary};
use crate::{Config, Database, SongService};

/// Title stored when a quick idea is saved without one.
pub const UNTITLED_IDEA: &str = "Untitled Idea";

/// Entry point for the UI host.
///
/// App validates caller input and delegates to [`SongService`]. Ids arrive
/// as raw integers the way the front end holds them: `0` means "not saved
/// yet".
pub struct App {
    service: SongService,
}

impl App {
    /// Opens the database named by `config` and seeds the instrument catalog.
    ///
    /// # Errors
    ///
    /// Fails if the database cannot be opened or its schema cannot be
    /// created. A failed seed is only logged.
    pub fn open(config: &Config) -> Result<Self> {
        ensure_database_directory(&config.database_path)?;

        let db = Database::open(&config.database_path).context("Failed to open database")?;
        info!("Opened database at {}", config.database_path.display());

        Ok(Self::with_database(db))
    }

    /// Creates an App over a fresh in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Database::in_memory().context("Failed to open in-memory database")?;
        Ok(Self::with_database(db))
    }

    /// Wraps an already initialized database, seeding instruments first.
    pub fn with_database(db: Database) -> Self {
        match db.seed_instruments() {
            Ok(0) => debug!("Instrument catalog already present"),
            Ok(count) => info!("Seeded {count} instruments"),
            Err(e) => warn!("Failed to seed instruments: {e:#}"),
        }

        Self {
            service: SongService::new(db),
        }
    }

    /// Returns the underlying service.
    pub fn service(&self) -> &SongService {
        &self.service
    }

    /// Persists the current editor content.
    ///
    /// `id == 0` creates a new song; any positive id updates that song. An
    /// empty title is replaced with [`UNTITLED_IDEA`]; any other title,
    /// whitespace included, is stored as given.
    ///
    /// # Examples
    ///
    /// ```
    /// use kizuna::App;
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let app = App::in_memory()?;
    ///
    /// let id = app.save_quick_idea(0, "", ":4 0.6")?;
    /// assert_eq!(app.get_song(id.get())?.title, "Untitled Idea");
    ///
    /// let same = app.save_quick_idea(id.get(), "Riff", ":4 3.6")?;
    /// assert_eq!(same, id);
    /// # Ok(())
    /// # }
    /// ```
    pub fn save_quick_idea(
        &self,
        id: i64,
        title: &str,
        content: &str,
    ) -> Result<SongId, StoreError> {
        let title = if title.is_empty() {
            UNTITLED_IDEA
        } else {
            title
        };

        info!("Saving song: '{title}' (Target ID: {id})");

        let target = match id {
            0 => None,
            id => Some(song_id_from_raw(id)?),
        };

        self.service.save_quick_idea(target, title, content)
    }

    /// Loads a song with its tracks.
    pub fn get_song(&self, id: i64) -> Result<Song, StoreError> {
        self.service.get_song(song_id_from_raw(id)?)
    }

    /// Lists the most recently edited songs for the dashboard.
    pub fn get_recent_songs(&self) -> Result<Vec<SongSummary>, StoreError> {
        self.service.recent_songs()
    }

    /// Lists the instrument catalog.
    pub fn instruments(&self) -> Result<Vec<Instrument>, StoreError> {
        self.service.list_instruments()
    }

    pub fn create_album(
        &self,
        title: &str,
        artist: &str,
        description: &str,
    ) -> Result<Album, StoreError> {
        self.service.create_album(title, artist, description)
    }

    /// Moves a song into an album; `album_id == 0` removes it from its album.
    pub fn assign_album(&self, song_id: i64, album_id: i64) -> Result<(), StoreError> {
        let song_id = song_id_from_raw(song_id)?;
        let album_id = match album_id {
            0 => None,
            id => Some(album_id_from_raw(id)?),
        };
        self.service.assign_album(song_id, album_id)
    }

    pub fn delete_album(&self, album_id: i64) -> Result<(), StoreError> {
        self.service.delete_album(album_id_from_raw(album_id)?)
    }

    /// Records an audio take for a song. The file itself is never touched.
    pub fn add_audio_version(
        &self,
        song_id: i64,
        version_name: &str,
        file_path: &str,
        notes: &str,
    ) -> Result<AudioVersion, StoreError> {
        self.service
            .add_audio_version(song_id_from_raw(song_id)?, version_name, file_path, notes)
    }

    pub fn list_audio_versions(&self, song_id: i64) -> Result<Vec<AudioVersion>, StoreError> {
        self.service.list_audio_versions(song_id_from_raw(song_id)?)
    }

    /// Deletes a song together with its tracks and audio versions.
    pub fn delete_song(&self, song_id: i64) -> Result<(), StoreError> {
        info!("Deleting song {song_id}");
        self.service.delete_song(song_id_from_raw(song_id)?)
    }
}

/// Rowids start at 1, so anything else can never name a song.
fn song_id_from_raw(id: i64) -> Result<SongId, StoreError> {
    if id > 0 {
        Ok(SongId::new(id))
    } else {
        Err(StoreError::InvalidSongId(id))
    }
}

fn album_id_from_raw(id: i64) -> Result<AlbumId, StoreError> {
    if id > 0 {
        Ok(AlbumId::new(id))
    } else {
        Err(StoreError::InvalidAlbumId(id))
    }
}

/// Ensures the parent directory of the database file exists.
fn ensure_database_directory(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_INSTRUMENT_ID;
    use log::LevelFilter;
    use tempfile::tempdir;

    #[test]
    fn in_memory_app_has_seeded_catalog() {
        let app = App::in_memory().unwrap();

        assert_eq!(app.instruments().unwrap().len(), 5);
    }

    #[test]
    fn empty_title_becomes_untitled_idea() {
        let app = App::in_memory().unwrap();

        let id = app.save_quick_idea(0, "", "x").unwrap();

        assert_eq!(app.get_song(id.get()).unwrap().title, UNTITLED_IDEA);
    }

    #[test]
    fn whitespace_title_is_stored_verbatim() {
        let app = App::in_memory().unwrap();

        let id = app.save_quick_idea(0, "   ", "x").unwrap();

        assert_eq!(app.get_song(id.get()).unwrap().title, "   ");
    }

    #[test]
    fn title_is_stored_as_given() {
        let app = App::in_memory().unwrap();

        let id = app.save_quick_idea(0, " Spaced Out ", "x").unwrap();

        assert_eq!(app.get_song(id.get()).unwrap().title, " Spaced Out ");
    }

    #[test]
    fn empty_title_on_update_also_substituted() {
        let app = App::in_memory().unwrap();
        let id = app.save_quick_idea(0, "Named", "x").unwrap();

        app.save_quick_idea(id.get(), "", "y").unwrap();

        assert_eq!(app.get_song(id.get()).unwrap().title, UNTITLED_IDEA);
    }

    #[test]
    fn zero_id_creates_and_positive_id_updates() {
        let app = App::in_memory().unwrap();

        let id = app.save_quick_idea(0, "My Song", "text").unwrap();
        let again = app.save_quick_idea(id.get(), "My Song", "more").unwrap();

        assert_eq!(id, again);
        let song = app.get_song(id.get()).unwrap();
        assert_eq!(song.tracks.len(), 1);
        assert_eq!(song.tracks[0].data_content, "more");
    }

    #[test]
    fn negative_id_is_rejected() {
        let app = App::in_memory().unwrap();

        let result = app.save_quick_idea(-4, "Bad", "x");

        assert!(matches!(result, Err(StoreError::InvalidSongId(-4))));
        assert!(app.get_recent_songs().unwrap().is_empty());
    }

    #[test]
    fn get_song_rejects_zero_id() {
        let app = App::in_memory().unwrap();

        assert!(matches!(
            app.get_song(0),
            Err(StoreError::InvalidSongId(0))
        ));
    }

    #[test]
    fn seed_failure_does_not_prevent_startup() {
        let db = Database::in_memory().unwrap();
        db.connection()
            .execute_batch(
                "CREATE TRIGGER reject_instruments BEFORE INSERT ON instruments
                 BEGIN SELECT RAISE(ABORT, 'read-only catalog'); END;",
            )
            .unwrap();

        let app = App::with_database(db);

        assert!(app.instruments().unwrap().is_empty());
        assert!(app.get_recent_songs().unwrap().is_empty());
    }

    #[test]
    fn save_works_after_failed_seed() {
        let db = Database::in_memory().unwrap();
        db.connection()
            .execute_batch(
                "CREATE TRIGGER reject_instruments BEFORE INSERT ON instruments
                 BEGIN SELECT RAISE(ABORT, 'read-only catalog'); END;",
            )
            .unwrap();
        let app = App::with_database(db);

        let id = app.save_quick_idea(0, "Idea", "x").unwrap();

        let song = app.get_song(id.get()).unwrap();
        assert_eq!(song.tracks.len(), 1);
        assert_eq!(song.tracks[0].instrument_id, Some(DEFAULT_INSTRUMENT_ID));
    }

    #[test]
    fn save_works_when_seed_skipped_for_foreign_catalog() {
        let db = Database::in_memory().unwrap();
        db.connection()
            .execute(
                "INSERT INTO instruments (id, name, type) VALUES (7, 'Ukulele', 'String')",
                [],
            )
            .unwrap();
        let app = App::with_database(db);
        assert_eq!(app.instruments().unwrap().len(), 1);

        let id = app.save_quick_idea(0, "Idea", "x").unwrap();
        app.save_quick_idea(id.get(), "Idea", "y").unwrap();

        let song = app.get_song(id.get()).unwrap();
        assert_eq!(song.tracks.len(), 1);
        assert_eq!(song.tracks[0].data_content, "y");
    }

    #[test]
    fn albums_are_managed_through_raw_ids() {
        let app = App::in_memory().unwrap();
        let song = app.save_quick_idea(0, "Track 1", "x").unwrap();
        let album = app.create_album("Demos", "", "").unwrap();

        app.assign_album(song.get(), album.id.get()).unwrap();
        assert_eq!(app.get_song(song.get()).unwrap().album_id, Some(album.id));

        app.assign_album(song.get(), 0).unwrap();
        assert_eq!(app.get_song(song.get()).unwrap().album_id, None);

        app.delete_album(album.id.get()).unwrap();
        assert!(matches!(
            app.delete_album(album.id.get()),
            Err(StoreError::AlbumNotFound(_))
        ));
    }

    #[test]
    fn album_calls_reject_invalid_ids() {
        let app = App::in_memory().unwrap();
        let song = app.save_quick_idea(0, "Track 1", "x").unwrap();

        assert!(matches!(
            app.assign_album(song.get(), -2),
            Err(StoreError::InvalidAlbumId(-2))
        ));
        assert!(matches!(
            app.assign_album(0, 1),
            Err(StoreError::InvalidSongId(0))
        ));
        assert!(matches!(
            app.delete_album(0),
            Err(StoreError::InvalidAlbumId(0))
        ));
    }

    #[test]
    fn audio_versions_and_song_deletion_through_app() {
        let app = App::in_memory().unwrap();
        let song = app.save_quick_idea(0, "Take", "x").unwrap();

        let version = app
            .add_audio_version(song.get(), "demo", "/audio/take.wav", "")
            .unwrap();
        assert_eq!(version.song_id, song);
        assert_eq!(app.list_audio_versions(song.get()).unwrap().len(), 1);

        app.delete_song(song.get()).unwrap();
        assert!(matches!(
            app.get_song(song.get()),
            Err(StoreError::SongNotFound(_))
        ));
        assert!(app.list_audio_versions(song.get()).unwrap().is_empty());
        assert!(matches!(
            app.add_audio_version(-1, "demo", "/audio/x.wav", ""),
            Err(StoreError::InvalidSongId(-1))
        ));
    }

    #[test]
    fn open_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let config = Config {
            database_path: dir.path().join("nested").join("kizuna.db"),
            log_level: LevelFilter::Off,
        };

        let app = App::open(&config).unwrap();
        app.save_quick_idea(0, "Persisted", "x").unwrap();

        assert!(config.database_path.exists());
    }

    #[test]
    fn reopening_keeps_catalog_and_songs() {
        let dir = tempdir().unwrap();
        let config = Config {
            database_path: dir.path().join("kizuna.db"),
            log_level: LevelFilter::Off,
        };

        let id = {
            let app = App::open(&config).unwrap();
            app.save_quick_idea(0, "Keep Me", "x").unwrap()
        };

        let app = App::open(&config).unwrap();
        assert_eq!(app.instruments().unwrap().len(), 5);
        assert_eq!(app.get_song(id.get()).unwrap().title, "Keep Me");
    }
}
