use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{AudioVersionId, SongId};

/// A recorded take of a song.
///
/// Only the path is stored; the audio file itself is never opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioVersion {
    pub id: AudioVersionId,
    pub song_id: SongId,
    pub version_name: String,
    pub file_path: String,
    pub notes: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
