use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::AlbumId;

/// A container grouping songs.
///
/// Albums are optional parents: deleting one leaves its songs in place with
/// no album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    pub artist: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
