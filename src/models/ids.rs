use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a database identifier newtype.
///
/// Each id wraps the SQLite rowid so songs, tracks and instruments can never
/// be passed where another kind of id is expected.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new id from a raw rowid.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the underlying rowid.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for an album.
    AlbumId
);

entity_id!(
    /// Unique identifier for a song.
    SongId
);

entity_id!(
    /// Unique identifier for a catalog instrument.
    InstrumentId
);

entity_id!(
    /// Unique identifier for a track within a song.
    TrackId
);

entity_id!(
    /// Unique identifier for a recorded audio version of a song.
    AudioVersionId
);
