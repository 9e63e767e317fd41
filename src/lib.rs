// Reelbox Library - Core modules for the command-driven video player
// Modular design keeps the player logic independent of the console around it

pub mod config; // settings and preferences
pub mod media;  // videos, catalog, playlists and the player itself
pub mod ui;     // text console

// Export the stuff other modules actually use
pub use config::Config;
pub use media::{Catalog, PlayerError, PlayerEvent, Video, VideoLibrary, VideoPlayer};
pub use ui::Console;
