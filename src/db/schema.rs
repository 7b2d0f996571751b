/// Complete database schema for the songwriting store.
///
/// Uses CREATE TABLE/INDEX IF NOT EXISTS for idempotent execution.
/// All statements are designed to be run in a single transaction.
/// Timestamps are unix seconds.
pub const INITIAL_SCHEMA: &str = r#"
-- Albums: optional containers for songs
CREATE TABLE IF NOT EXISTS albums (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    artist TEXT,
    description TEXT,
    created_at INTEGER DEFAULT (CAST(strftime('%s', 'now') AS INTEGER))
);

-- Songs: the basic unit of work; survive deletion of their album
CREATE TABLE IF NOT EXISTS songs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    album_id INTEGER,
    title TEXT NOT NULL,
    bpm INTEGER DEFAULT 120,
    time_signature TEXT DEFAULT '4/4',
    key_signature TEXT,
    created_at INTEGER DEFAULT (CAST(strftime('%s', 'now') AS INTEGER)),
    updated_at INTEGER DEFAULT (CAST(strftime('%s', 'now') AS INTEGER)),
    FOREIGN KEY (album_id) REFERENCES albums(id) ON DELETE SET NULL
);

-- Instruments: static catalog, seeded once
CREATE TABLE IF NOT EXISTS instruments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    default_clef TEXT DEFAULT 'treble'
);

-- Tracks: instrument parts owned by a song.
-- instrument_id is a plain reference: saves must keep working when the
-- catalog was never seeded.
CREATE TABLE IF NOT EXISTS tracks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    song_id INTEGER NOT NULL,
    instrument_id INTEGER,
    name TEXT,
    data_content TEXT,
    display_mode TEXT DEFAULT 'BOTH',
    is_muted BOOLEAN DEFAULT 0,
    created_at INTEGER DEFAULT (CAST(strftime('%s', 'now') AS INTEGER)),
    FOREIGN KEY (song_id) REFERENCES songs(id) ON DELETE CASCADE
);

-- Audio versions: recorded takes of a song, path only
CREATE TABLE IF NOT EXISTS audio_versions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    song_id INTEGER NOT NULL,
    version_name TEXT,
    file_path TEXT NOT NULL,
    notes TEXT,
    created_at INTEGER DEFAULT (CAST(strftime('%s', 'now') AS INTEGER)),
    FOREIGN KEY (song_id) REFERENCES songs(id) ON DELETE CASCADE
);

-- Default track lookup during quick saves
CREATE INDEX IF NOT EXISTS idx_tracks_song ON tracks(song_id, instrument_id);

-- Dashboard ordering
CREATE INDEX IF NOT EXISTS idx_songs_updated ON songs(updated_at);

CREATE INDEX IF NOT EXISTS idx_audio_versions_song ON audio_versions(song_id);
"#;
