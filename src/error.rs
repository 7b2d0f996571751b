use std::fmt;

use thiserror::Error;

use crate::models::{AlbumId, SongId};

/// A step of the quick-save transaction, reported when that step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStep {
    BeginTransaction,
    InsertSong,
    InsertDefaultTrack,
    UpdateSong,
    UpdateDefaultTrack,
    /// Re-creating a missing default track for an existing song.
    RecoverDefaultTrack,
}

impl fmt::Display for SaveStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            Self::BeginTransaction => "begin transaction",
            Self::InsertSong => "insert song",
            Self::InsertDefaultTrack => "insert default track",
            Self::UpdateSong => "update song",
            Self::UpdateDefaultTrack => "update default track",
            Self::RecoverDefaultTrack => "recover default track",
        };
        f.write_str(step)
    }
}

/// Errors returned by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No song row exists with the given id.
    #[error("song {0} not found")]
    SongNotFound(SongId),

    #[error("album {0} not found")]
    AlbumNotFound(AlbumId),

    /// A caller supplied an id that can never name a song.
    #[error("invalid song id {0}")]
    InvalidSongId(i64),

    #[error("invalid album id {0}")]
    InvalidAlbumId(i64),

    /// A statement inside the quick-save transaction failed; nothing was written.
    #[error("failed to {step}: {source}")]
    Step {
        step: SaveStep,
        #[source]
        source: rusqlite::Error,
    },

    /// Every statement succeeded but the transaction could not be committed.
    #[error("failed to commit transaction: {0}")]
    Commit(#[source] rusqlite::Error),

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    /// Whether the error was caused by the caller's input rather than the store.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::SongNotFound(_)
                | Self::AlbumNotFound(_)
                | Self::InvalidSongId(_)
                | Self::InvalidAlbumId(_)
        )
    }

    pub(crate) fn step(step: SaveStep) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::Step { step, source }
    }
}
