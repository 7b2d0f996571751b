use log::{debug, warn};
use rusqlite::{Connection, OptionalExtension, Row, Rows, params};

use crate::db::{now_timestamp, timestamp_at};
use crate::error::{SaveStep, StoreError};
use crate::models::{
    Album, AlbumId, AudioVersion, AudioVersionId, DEFAULT_BPM, DEFAULT_DISPLAY_MODE,
    DEFAULT_INSTRUMENT_ID, DEFAULT_TRACK_NAME, Instrument, InstrumentId, Song, SongId,
    SongSummary, Track, TrackId,
};
use crate::Database;

/// Maximum number of songs returned by [`SongService::recent_songs`].
pub const RECENT_SONGS_LIMIT: usize = 10;

type StoreResult<T> = std::result::Result<T, StoreError>;

/// Service layer providing song persistence operations.
///
/// SongService owns the [`Database`] and is the only component that issues
/// SQL against it. It is UI-independent: the façade, the CLI and tests all
/// go through the same methods.
///
/// # Examples
///
/// ```
/// use kizuna::{Database, SongService};
///
/// # fn main() -> anyhow::Result<()> {
/// let db = Database::in_memory()?;
/// db.seed_instruments()?;
/// let service = SongService::new(db);
///
/// let id = service.save_quick_idea(None, "Riff", ":4 0.6 3.6")?;
/// let song = service.get_song(id)?;
/// assert_eq!(song.tracks.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct SongService {
    db: Database,
}

impl SongService {
    /// Creates a new SongService with the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns a reference to the underlying database.
    ///
    /// Useful for testing or advanced operations that need direct database access.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Creates or updates a song together with its default track.
    ///
    /// With `song_id == None` a new song is inserted along with a "Lead Guitar"
    /// track holding `content`. With `Some(id)` the song's title and update
    /// time are refreshed and its default track content is overwritten. A song
    /// that has lost its default track gets a new one instead of failing.
    ///
    /// All statements run in one transaction: on any error nothing is written,
    /// so a song is never visible without its default track.
    ///
    /// # Errors
    ///
    /// - [`StoreError::SongNotFound`] when updating an id with no song row
    /// - [`StoreError::Step`] when a statement fails, naming the step
    /// - [`StoreError::Commit`] when the final commit fails
    pub fn save_quick_idea(
        &self,
        song_id: Option<SongId>,
        title: &str,
        content: &str,
    ) -> StoreResult<SongId> {
        let conn = self.db.connection();
        let now = now_timestamp();

        // Rolls back on drop unless committed.
        let tx = conn
            .unchecked_transaction()
            .map_err(StoreError::step(SaveStep::BeginTransaction))?;

        let final_id = match song_id {
            None => {
                tx.execute(
                    "INSERT INTO songs (title, bpm, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
                    params![title, DEFAULT_BPM, now],
                )
                .map_err(StoreError::step(SaveStep::InsertSong))?;
                let id = SongId::new(tx.last_insert_rowid());

                insert_default_track(&tx, id, content, now)
                    .map_err(StoreError::step(SaveStep::InsertDefaultTrack))?;

                id
            }
            Some(id) => {
                let updated = tx
                    .execute(
                        "UPDATE songs SET title = ?1, updated_at = ?2 WHERE id = ?3",
                        params![title, now, id.get()],
                    )
                    .map_err(StoreError::step(SaveStep::UpdateSong))?;
                if updated == 0 {
                    return Err(StoreError::SongNotFound(id));
                }

                let updated = tx
                    .execute(
                        "UPDATE tracks SET data_content = ?1 WHERE song_id = ?2 AND instrument_id = ?3",
                        params![content, id.get(), DEFAULT_INSTRUMENT_ID.get()],
                    )
                    .map_err(StoreError::step(SaveStep::UpdateDefaultTrack))?;
                if updated == 0 {
                    warn!("Track missing for song {id}. Creating recovery track...");
                    insert_default_track(&tx, id, content, now)
                        .map_err(StoreError::step(SaveStep::RecoverDefaultTrack))?;
                }

                id
            }
        };

        tx.commit().map_err(StoreError::Commit)?;
        debug!("Saved quick idea as song {final_id}");

        Ok(final_id)
    }

    /// Retrieves a song with all of its tracks.
    ///
    /// NULL time and key signatures come back as empty strings. Track rows
    /// that cannot be decoded are skipped and logged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SongNotFound`] if no song has the given id.
    pub fn get_song(&self, id: SongId) -> StoreResult<Song> {
        let conn = self.db.connection();

        let mut song = conn
            .query_row(
                "SELECT id, album_id, title, bpm, time_signature, key_signature, created_at, updated_at
                 FROM songs WHERE id = ?1",
                [id.get()],
                song_from_row,
            )
            .optional()?
            .ok_or(StoreError::SongNotFound(id))?;

        let mut stmt = conn.prepare(
            "SELECT id, song_id, instrument_id, name, data_content, display_mode, is_muted, created_at
             FROM tracks WHERE song_id = ?1
             ORDER BY id",
        )?;
        let rows = stmt.query([id.get()])?;
        song.tracks = collect_decodable(rows, track_from_row, "track")?;

        Ok(song)
    }

    /// Lists the most recently updated songs for the dashboard.
    ///
    /// Returns at most [`RECENT_SONGS_LIMIT`] lightweight summaries, newest
    /// first. Ties on the update time are broken by id, newest first. Rows
    /// that fail to decode are skipped and each skip is logged at warn level;
    /// the rest of the list is still returned.
    pub fn recent_songs(&self) -> StoreResult<Vec<SongSummary>> {
        let conn = self.db.connection();

        let mut stmt = conn.prepare(
            "SELECT id, title, updated_at FROM songs
             ORDER BY updated_at DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query([RECENT_SONGS_LIMIT as i64])?;

        collect_decodable(rows, summary_from_row, "song")
    }

    /// Lists the instrument catalog ordered by id.
    pub fn list_instruments(&self) -> StoreResult<Vec<Instrument>> {
        let conn = self.db.connection();

        let mut stmt =
            conn.prepare("SELECT id, name, type, default_clef FROM instruments ORDER BY id")?;
        let instruments = stmt
            .query_map([], instrument_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(instruments)
    }

    /// Creates a new album.
    pub fn create_album(
        &self,
        title: &str,
        artist: &str,
        description: &str,
    ) -> StoreResult<Album> {
        let conn = self.db.connection();
        let now = now_timestamp();

        conn.execute(
            "INSERT INTO albums (title, artist, description, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![title, artist, description, now],
        )?;
        let id = AlbumId::new(conn.last_insert_rowid());

        Ok(album_with_id(conn, id)?)
    }

    /// Moves a song into an album, or out of any album with `None`.
    ///
    /// # Errors
    ///
    /// [`StoreError::AlbumNotFound`] or [`StoreError::SongNotFound`] when
    /// either side does not exist.
    pub fn assign_album(&self, song_id: SongId, album_id: Option<AlbumId>) -> StoreResult<()> {
        let conn = self.db.connection();

        if let Some(album_id) = album_id {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM albums WHERE id = ?1)",
                [album_id.get()],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(StoreError::AlbumNotFound(album_id));
            }
        }

        let updated = conn.execute(
            "UPDATE songs SET album_id = ?1 WHERE id = ?2",
            params![album_id.map(AlbumId::get), song_id.get()],
        )?;
        if updated == 0 {
            return Err(StoreError::SongNotFound(song_id));
        }

        Ok(())
    }

    /// Deletes an album. Its songs remain, with no album.
    pub fn delete_album(&self, id: AlbumId) -> StoreResult<()> {
        let deleted = self
            .db
            .connection()
            .execute("DELETE FROM albums WHERE id = ?1", [id.get()])?;

        if deleted == 0 {
            Err(StoreError::AlbumNotFound(id))
        } else {
            Ok(())
        }
    }

    /// Records a new audio version for a song.
    ///
    /// The file path is stored as given; the file is not checked or read.
    pub fn add_audio_version(
        &self,
        song_id: SongId,
        version_name: &str,
        file_path: &str,
        notes: &str,
    ) -> StoreResult<AudioVersion> {
        let conn = self.db.connection();

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM songs WHERE id = ?1)",
            [song_id.get()],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StoreError::SongNotFound(song_id));
        }

        let now = now_timestamp();
        conn.execute(
            "INSERT INTO audio_versions (song_id, version_name, file_path, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![song_id.get(), version_name, file_path, notes, now],
        )?;
        let id = conn.last_insert_rowid();

        let version = conn.query_row(
            "SELECT id, song_id, version_name, file_path, notes, created_at
             FROM audio_versions WHERE id = ?1",
            [id],
            audio_version_from_row,
        )?;

        Ok(version)
    }

    /// Lists a song's audio versions, newest first.
    pub fn list_audio_versions(&self, song_id: SongId) -> StoreResult<Vec<AudioVersion>> {
        let conn = self.db.connection();

        let mut stmt = conn.prepare(
            "SELECT id, song_id, version_name, file_path, notes, created_at
             FROM audio_versions WHERE song_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let versions = stmt
            .query_map([song_id.get()], audio_version_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(versions)
    }

    /// Deletes a song. Foreign keys remove its tracks and audio versions.
    pub fn delete_song(&self, id: SongId) -> StoreResult<()> {
        let deleted = self
            .db
            .connection()
            .execute("DELETE FROM songs WHERE id = ?1", [id.get()])?;

        if deleted == 0 {
            Err(StoreError::SongNotFound(id))
        } else {
            Ok(())
        }
    }
}

fn insert_default_track(
    conn: &Connection,
    song_id: SongId,
    content: &str,
    now: i64,
) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO tracks (song_id, instrument_id, name, data_content, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            song_id.get(),
            DEFAULT_INSTRUMENT_ID.get(),
            DEFAULT_TRACK_NAME,
            content,
            now
        ],
    )
}

/// Decodes every row, skipping (and logging) the ones that fail to decode.
///
/// Errors while stepping the query itself are still returned.
fn collect_decodable<T>(
    mut rows: Rows<'_>,
    decode: fn(&Row<'_>) -> rusqlite::Result<T>,
    kind: &str,
) -> StoreResult<Vec<T>> {
    let mut items = Vec::new();
    let mut position = 0usize;

    while let Some(row) = rows.next()? {
        match decode(row) {
            Ok(item) => items.push(item),
            Err(e) => warn!("Skipping undecodable {kind} row at position {position}: {e}"),
        }
        position += 1;
    }

    Ok(items)
}

fn album_with_id(conn: &Connection, id: AlbumId) -> rusqlite::Result<Album> {
    conn.query_row(
        "SELECT id, title, artist, description, created_at FROM albums WHERE id = ?1",
        [id.get()],
        |row| {
            Ok(Album {
                id: AlbumId::new(row.get(0)?),
                title: row.get(1)?,
                artist: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                description: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                created_at: timestamp_at(row, 4)?,
            })
        },
    )
}

fn song_from_row(row: &Row<'_>) -> rusqlite::Result<Song> {
    Ok(Song {
        id: SongId::new(row.get(0)?),
        album_id: row.get::<_, Option<i64>>(1)?.map(AlbumId::new),
        title: row.get(2)?,
        bpm: row.get::<_, Option<u32>>(3)?.unwrap_or(DEFAULT_BPM),
        time_signature: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        key_signature: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        created_at: timestamp_at(row, 6)?,
        updated_at: timestamp_at(row, 7)?,
        tracks: Vec::new(),
    })
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<SongSummary> {
    Ok(SongSummary {
        id: SongId::new(row.get(0)?),
        title: row.get(1)?,
        updated_at: timestamp_at(row, 2)?,
    })
}

fn track_from_row(row: &Row<'_>) -> rusqlite::Result<Track> {
    Ok(Track {
        id: TrackId::new(row.get(0)?),
        song_id: SongId::new(row.get(1)?),
        instrument_id: row.get::<_, Option<i64>>(2)?.map(InstrumentId::new),
        name: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        data_content: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        display_mode: row
            .get::<_, Option<String>>(5)?
            .unwrap_or_else(|| DEFAULT_DISPLAY_MODE.to_string()),
        is_muted: row.get::<_, Option<bool>>(6)?.unwrap_or(false),
        created_at: timestamp_at(row, 7)?,
    })
}

fn instrument_from_row(row: &Row<'_>) -> rusqlite::Result<Instrument> {
    Ok(Instrument {
        id: InstrumentId::new(row.get(0)?),
        name: row.get(1)?,
        category: row.get(2)?,
        default_clef: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
    })
}

fn audio_version_from_row(row: &Row<'_>) -> rusqlite::Result<AudioVersion> {
    Ok(AudioVersion {
        id: AudioVersionId::new(row.get(0)?),
        song_id: SongId::new(row.get(1)?),
        version_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        file_path: row.get(3)?,
        notes: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        created_at: timestamp_at(row, 5)?,
    })
}
