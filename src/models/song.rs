use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{AlbumId, SongId, Track};

/// Tempo assigned to songs created through a quick save.
pub const DEFAULT_BPM: u32 = 120;

/// A song with its metadata and tracks.
///
/// Songs are the basic unit of work in the editor. Each song owns zero or
/// more tracks; the track bound to the lead guitar instrument is the song's
/// default track and holds the quick-edit notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Unique identifier from the database.
    pub id: SongId,
    /// Album the song belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<AlbumId>,
    pub title: String,
    pub bpm: u32,
    /// Time signature such as "4/4". Empty when the column is NULL.
    pub time_signature: String,
    /// Key signature such as "Am". Empty when the column is NULL.
    pub key_signature: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Tracks owned by this song, in storage order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tracks: Vec<Track>,
}

impl Song {
    /// Returns the default (lead guitar) track, if the song has one.
    pub fn default_track(&self) -> Option<&Track> {
        self.tracks.iter().find(|track| track.is_default())
    }
}

/// Lightweight projection of a song used by the dashboard list.
///
/// Only the columns the recent-songs view needs are loaded; tracks and
/// musical metadata are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongSummary {
    pub id: SongId,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
