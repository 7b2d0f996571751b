use anyhow::Result;
use kizuna::{App, Config, Database, StoreError, UNTITLED_IDEA};
use log::LevelFilter;
use tempfile::tempdir;

fn file_config(dir: &tempfile::TempDir) -> Config {
    Config {
        database_path: dir.path().join("kizuna.db"),
        log_level: LevelFilter::Off,
    }
}

#[test]
fn test_editor_session_round_trip() -> Result<()> {
    // Arrange: a fresh on-disk store, as the desktop host would open it
    let dir = tempdir()?;
    let app = App::open(&file_config(&dir))?;

    // Act: first save from an unsaved editor (id 0), then two more saves
    let id = app.save_quick_idea(0, "My Song", "text")?;
    app.save_quick_idea(id.get(), "My Song", "text v2")?;
    app.save_quick_idea(id.get(), "My Song (final)", "text v3")?;

    // Assert: one song, one default track, latest content
    let song = app.get_song(id.get())?;
    assert_eq!(song.title, "My Song (final)");
    assert_eq!(song.tracks.len(), 1);
    assert_eq!(song.tracks[0].data_content, "text v3");
    assert!(song.tracks[0].is_default());

    let recent = app.get_recent_songs()?;
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, id);

    Ok(())
}

#[test]
fn test_songs_survive_restart() -> Result<()> {
    let dir = tempdir()?;
    let config = file_config(&dir);

    let id = {
        let app = App::open(&config)?;
        app.save_quick_idea(0, "", "x")?
    };

    let app = App::open(&config)?;
    let song = app.get_song(id.get())?;
    assert_eq!(song.title, UNTITLED_IDEA);
    assert_eq!(app.instruments()?.len(), 5);

    Ok(())
}

#[test]
fn test_ghost_song_repaired_through_facade() -> Result<()> {
    let dir = tempdir()?;
    let config = file_config(&dir);

    // A song row written by an older build that never created its track
    {
        let db = Database::open(&config.database_path)?;
        db.connection()
            .execute("INSERT INTO songs (title) VALUES ('Ghost')", [])?;
    }

    let app = App::open(&config)?;
    let ghost = app.get_recent_songs()?[0].id;
    assert!(app.get_song(ghost.get())?.tracks.is_empty());

    app.save_quick_idea(ghost.get(), "T", "C")?;

    let song = app.get_song(ghost.get())?;
    assert_eq!(song.tracks.len(), 1);
    assert_eq!(song.tracks[0].data_content, "C");

    Ok(())
}

#[test]
fn test_unknown_song_reports_error_not_sentinel() -> Result<()> {
    let app = App::in_memory()?;

    let err = app.get_song(12).unwrap_err();
    assert!(matches!(err, StoreError::SongNotFound(_)));
    assert!(err.is_user_error());

    let err = app.save_quick_idea(12, "Missing", "x").unwrap_err();
    assert!(matches!(err, StoreError::SongNotFound(_)));

    Ok(())
}

#[test]
fn test_album_and_audio_lifecycle() -> Result<()> {
    let app = App::in_memory()?;

    let album = app.create_album("Sketches", "Me", "")?;
    let song = app.save_quick_idea(0, "Sketch 1", "x")?.get();
    app.assign_album(song, album.id.get())?;
    app.add_audio_version(song, "voice memo", "/audio/sketch1.m4a", "")?;

    // Removing the album keeps the song and its recordings
    app.delete_album(album.id.get())?;
    assert_eq!(app.get_song(song)?.album_id, None);
    assert_eq!(app.list_audio_versions(song)?.len(), 1);

    // Removing the song takes its recordings with it
    app.delete_song(song)?;
    assert!(app.list_audio_versions(song)?.is_empty());

    Ok(())
}

#[test]
fn test_song_json_matches_frontend_shape() -> Result<()> {
    let app = App::in_memory()?;
    let id = app.save_quick_idea(0, "Shape", ":4 0.6")?;

    let json = serde_json::to_value(app.get_song(id.get())?)?;

    assert_eq!(json["id"], id.get());
    assert_eq!(json["bpm"], 120);
    assert_eq!(json["time_signature"], "4/4");
    assert_eq!(json["key_signature"], "");
    assert_eq!(json["tracks"][0]["instrument_id"], 1);
    assert_eq!(json["tracks"][0]["name"], "Lead Guitar");
    assert_eq!(json["tracks"][0]["data_content"], ":4 0.6");
    assert_eq!(json["tracks"][0]["is_muted"], false);
    assert!(json.get("album_id").is_none());

    Ok(())
}
