// Media core - videos, the catalog they live in, playlists and the player
// that ties them together. Everything here is synchronous and in-memory.

pub mod catalog;
pub mod error;
pub mod player;
pub mod playlist;
pub mod video;

pub use catalog::{Catalog, CatalogError, VideoLibrary};
pub use error::PlayerError;
pub use player::{
    NowPlaying, PauseOutcome, PlayerEvent, PlayerState, PlaylistView, SearchOutcome,
    SelectionPrompt, VideoPlayer, DEFAULT_FLAG_REASON,
};
pub use playlist::{normalize_playlist_name, Playlist, PlaylistRegistry};
pub use video::{PlaybackState, Video};
