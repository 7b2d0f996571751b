use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{InstrumentId, SongId, TrackId};

/// Instrument that every song's default track is bound to (Electric Guitar).
pub const DEFAULT_INSTRUMENT_ID: InstrumentId = InstrumentId::new(1);

/// Name given to default tracks created by a quick save.
pub const DEFAULT_TRACK_NAME: &str = "Lead Guitar";

/// Display mode stored when a track row carries the column default.
pub const DEFAULT_DISPLAY_MODE: &str = "BOTH";

/// A single instrument part within a song.
///
/// `data_content` holds AlphaTex notation text. The store never parses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub song_id: SongId,
    /// Catalog instrument, if any. Tracks reference instruments, never own them.
    pub instrument_id: Option<InstrumentId>,
    pub name: String,
    pub data_content: String,
    pub display_mode: String,
    pub is_muted: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Track {
    /// Whether this is the song's default (lead guitar) track.
    pub fn is_default(&self) -> bool {
        self.instrument_id == Some(DEFAULT_INSTRUMENT_ID)
    }
}
