mod album;
mod audio_version;
mod ids;
mod instrument;
mod song;
mod track;

pub use album::Album;
pub use audio_version::AudioVersion;
pub use ids::{AlbumId, AudioVersionId, InstrumentId, SongId, TrackId};
pub use instrument::Instrument;
pub use song::{DEFAULT_BPM, Song, SongSummary};
pub use track::{DEFAULT_DISPLAY_MODE, DEFAULT_INSTRUMENT_ID, DEFAULT_TRACK_NAME, Track};
