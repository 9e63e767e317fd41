use super::{Catalog, PlayerError, Playlist, PlaylistRegistry, Video, VideoLibrary};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Reason recorded when a video is flagged without one.
pub const DEFAULT_FLAG_REASON: &str = "Not supplied";

/// Notifications emitted by successful operations, in the order they happen.
/// An implicit stop is always sent before the start that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    VideoStarted { id: String, title: String },
    VideoStopped { id: String, title: String },
    VideoPaused { id: String, title: String },
    VideoResumed { id: String, title: String },
    VideoFlagged { id: String, title: String, reason: String },
    VideoAllowed { id: String, title: String },
    PlaylistCreated { playlist: String },
    VideoAdded { playlist: String, title: String },
    VideoRemoved { playlist: String, title: String },
    PlaylistCleared { playlist: String },
    PlaylistDeleted { playlist: String },
}

/// The console line announcing the event
impl fmt::Display for PlayerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerEvent::VideoStarted { title, .. } => write!(f, "Playing video: {}", title),
            PlayerEvent::VideoStopped { title, .. } => write!(f, "Stopping video: {}", title),
            PlayerEvent::VideoPaused { title, .. } => write!(f, "Pausing video: {}", title),
            PlayerEvent::VideoResumed { title, .. } => write!(f, "Continuing video: {}", title),
            PlayerEvent::VideoFlagged { title, reason, .. } => {
                write!(f, "Successfully flagged video: {} (reason: {})", title, reason)
            }
            PlayerEvent::VideoAllowed { title, .. } => {
                write!(f, "Successfully removed flag from video: {}", title)
            }
            PlayerEvent::PlaylistCreated { playlist } => {
                write!(f, "Successfully created new playlist: {}", playlist)
            }
            PlayerEvent::VideoAdded { playlist, title } => {
                write!(f, "Added video to {}: {}", playlist, title)
            }
            PlayerEvent::VideoRemoved { playlist, title } => {
                write!(f, "Removed video from {}: {}", playlist, title)
            }
            PlayerEvent::PlaylistCleared { playlist } => {
                write!(f, "Successfully removed all videos from {}", playlist)
            }
            PlayerEvent::PlaylistDeleted { playlist } => write!(f, "Deleted playlist: {}", playlist),
        }
    }
}

/// Projection of the single "now playing" slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerState {
    NoVideoPlaying,
    Playing(String),
    Paused(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PauseOutcome {
    Paused,
    AlreadyPaused { title: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    NoResults,
    NoSelection,
    Played(String),
}

#[derive(Debug)]
pub struct NowPlaying<'a> {
    pub video: &'a Video,
    pub paused: bool,
}

#[derive(Debug)]
pub struct PlaylistView<'a> {
    pub playlist: &'a Playlist,
    pub videos: Vec<&'a Video>,
}

/// Presents search results and returns the raw answer, if any.
/// The player decides whether the answer is a usable selection.
pub trait SelectionPrompt {
    fn select(&mut self, term: &str, results: &[&Video]) -> Option<String>;
}

/// Turn a prompt answer into a zero-based index. Anything that is not a
/// number in `1..=count` counts as "no selection".
pub fn parse_selection(answer: &str, count: usize) -> Option<usize> {
    let answer = answer.trim();
    if answer.is_empty() || !answer.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match answer.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(n - 1),
        _ => None,
    }
}

/// Session controller: owns the catalog, the now-playing slot and every playlist.
pub struct VideoPlayer<C: Catalog = VideoLibrary> {
    catalog: C,
    current: Option<String>,
    playlists: PlaylistRegistry,
    rng: StdRng,
    default_flag_reason: String,
    event_sender: Option<mpsc::UnboundedSender<PlayerEvent>>,
}

impl<C: Catalog> VideoPlayer<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            current: None,
            playlists: PlaylistRegistry::new(),
            rng: StdRng::from_entropy(),
            default_flag_reason: DEFAULT_FLAG_REASON.to_string(),
            event_sender: None,
        }
    }

    /// Seed random play for reproducible sessions
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_default_flag_reason(mut self, reason: impl Into<String>) -> Self {
        self.default_flag_reason = reason.into();
        self
    }

    pub fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<PlayerEvent>) {
        self.event_sender = Some(sender);
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    fn emit(&self, event: PlayerEvent) {
        debug!(?event, "player event");
        if let Some(sender) = &self.event_sender {
            let _ = sender.send(event);
        }
    }

    pub fn state(&self) -> PlayerState {
        match self.show_playing() {
            None => PlayerState::NoVideoPlaying,
            Some(now) if now.paused => PlayerState::Paused(now.video.id().to_string()),
            Some(now) => PlayerState::Playing(now.video.id().to_string()),
        }
    }

    pub fn number_of_videos(&self) -> usize {
        self.catalog.len()
    }

    /// Every catalog video, flagged ones included, sorted by title
    pub fn all_videos(&self) -> Vec<&Video> {
        sorted_by_title(self.catalog.all_videos())
    }

    pub fn play_video(&mut self, video_id: &str) -> Result<(), PlayerError> {
        let video = self.catalog.video(video_id).ok_or(PlayerError::VideoNotFound)?;
        if let Some(reason) = video.flag_reason() {
            return Err(PlayerError::VideoFlagged(reason.to_string()));
        }

        self.stop_current();

        let video = self
            .catalog
            .video_mut(video_id)
            .ok_or(PlayerError::VideoNotFound)?;
        video.play();
        let event = PlayerEvent::VideoStarted {
            id: video.id().to_string(),
            title: video.title().to_string(),
        };

        info!("Playing video {}", video_id);
        self.current = Some(video_id.to_string());
        self.emit(event);
        Ok(())
    }

    /// Stop whatever occupies the slot. Returns false when it was already empty.
    fn stop_current(&mut self) -> bool {
        let Some(id) = self.current.take() else {
            return false;
        };

        if let Some(video) = self.catalog.video_mut(&id) {
            video.stop();
            let event = PlayerEvent::VideoStopped {
                id: video.id().to_string(),
                title: video.title().to_string(),
            };
            info!("Stopped video {}", id);
            self.emit(event);
        }
        true
    }

    pub fn stop_video(&mut self) -> Result<(), PlayerError> {
        if self.stop_current() {
            Ok(())
        } else {
            Err(PlayerError::NoVideoPlaying)
        }
    }

    /// Play a uniformly random unflagged video
    pub fn play_random_video(&mut self) -> Result<(), PlayerError> {
        // Sorted so a seeded rng picks the same video regardless of catalog order
        let mut candidates: Vec<String> = self
            .catalog
            .all_videos()
            .into_iter()
            .filter(|video| !video.is_flagged())
            .map(|video| video.id().to_string())
            .collect();
        candidates.sort();

        let chosen = candidates
            .choose(&mut self.rng)
            .cloned()
            .ok_or(PlayerError::NoVideosAvailable)?;
        debug!("Random pick {} out of {} candidates", chosen, candidates.len());
        self.play_video(&chosen)
    }

    pub fn pause_video(&mut self) -> Result<PauseOutcome, PlayerError> {
        let id = self.current.clone().ok_or(PlayerError::NoVideoPlaying)?;
        let video = self
            .catalog
            .video_mut(&id)
            .ok_or(PlayerError::NoVideoPlaying)?;

        if video.is_paused() {
            return Ok(PauseOutcome::AlreadyPaused {
                title: video.title().to_string(),
            });
        }

        video.pause();
        let event = PlayerEvent::VideoPaused {
            id: video.id().to_string(),
            title: video.title().to_string(),
        };
        info!("Paused video {}", id);
        self.emit(event);
        Ok(PauseOutcome::Paused)
    }

    pub fn continue_video(&mut self) -> Result<(), PlayerError> {
        let id = self.current.clone().ok_or(PlayerError::NoVideoPlaying)?;
        let video = self
            .catalog
            .video_mut(&id)
            .ok_or(PlayerError::NoVideoPlaying)?;

        if !video.is_paused() {
            return Err(PlayerError::NotPaused);
        }

        video.resume();
        let event = PlayerEvent::VideoResumed {
            id: video.id().to_string(),
            title: video.title().to_string(),
        };
        info!("Resumed video {}", id);
        self.emit(event);
        Ok(())
    }

    pub fn show_playing(&self) -> Option<NowPlaying<'_>> {
        let video = self.catalog.video(self.current.as_deref()?)?;
        Some(NowPlaying {
            video,
            paused: video.is_paused(),
        })
    }

    /// Flag a video. A blank or missing reason falls back to the configured
    /// default. Flagging the current video stops it.
    pub fn flag_video(&mut self, video_id: &str, reason: Option<&str>) -> Result<(), PlayerError> {
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.default_flag_reason.clone());

        let video = self
            .catalog
            .video_mut(video_id)
            .ok_or(PlayerError::VideoNotFound)?;
        video.flag(reason.clone())?;
        let title = video.title().to_string();

        if self.current.as_deref() == Some(video_id) {
            self.stop_current();
        }

        info!("Flagged video {} ({})", video_id, reason);
        self.emit(PlayerEvent::VideoFlagged {
            id: video_id.to_string(),
            title,
            reason,
        });
        Ok(())
    }

    pub fn allow_video(&mut self, video_id: &str) -> Result<(), PlayerError> {
        let video = self
            .catalog
            .video_mut(video_id)
            .ok_or(PlayerError::VideoNotFound)?;
        video.allow()?;
        let event = PlayerEvent::VideoAllowed {
            id: video_id.to_string(),
            title: video.title().to_string(),
        };

        info!("Removed flag from video {}", video_id);
        self.emit(event);
        Ok(())
    }

    /// Unflagged videos whose title contains `term`, sorted by title
    pub fn find_by_title(&self, term: &str) -> Vec<&Video> {
        self.playable_matching(|video| video.title_contains(term))
    }

    /// Unflagged videos carrying `tag`, sorted by title
    pub fn find_by_tag(&self, tag: &str) -> Vec<&Video> {
        self.playable_matching(|video| video.has_tag(tag))
    }

    fn playable_matching<F>(&self, matches: F) -> Vec<&Video>
    where
        F: Fn(&Video) -> bool,
    {
        let found = self
            .catalog
            .all_videos()
            .into_iter()
            .filter(|video| !video.is_flagged() && matches(*video))
            .collect();
        sorted_by_title(found)
    }

    pub fn search_videos(
        &mut self,
        term: &str,
        prompt: &mut dyn SelectionPrompt,
    ) -> Result<SearchOutcome, PlayerError> {
        let chosen = {
            let results = self.find_by_title(term);
            choose_result(term, &results, prompt)
        };
        self.finish_search(chosen)
    }

    pub fn search_videos_with_tag(
        &mut self,
        tag: &str,
        prompt: &mut dyn SelectionPrompt,
    ) -> Result<SearchOutcome, PlayerError> {
        let chosen = {
            let results = self.find_by_tag(tag);
            choose_result(tag, &results, prompt)
        };
        self.finish_search(chosen)
    }

    fn finish_search(&mut self, chosen: SearchOutcome) -> Result<SearchOutcome, PlayerError> {
        if let SearchOutcome::Played(id) = &chosen {
            self.play_video(id)?;
        }
        Ok(chosen)
    }

    pub fn create_playlist(&mut self, name: &str) -> Result<(), PlayerError> {
        self.playlists.create(name)?;
        self.emit(PlayerEvent::PlaylistCreated {
            playlist: name.to_string(),
        });
        Ok(())
    }

    pub fn add_to_playlist(&mut self, name: &str, video_id: &str) -> Result<(), PlayerError> {
        let playlist = self.playlists.get(name)?;
        let video = self.catalog.video(video_id).ok_or(PlayerError::VideoNotFound)?;
        if let Some(reason) = video.flag_reason() {
            return Err(PlayerError::VideoFlagged(reason.to_string()));
        }
        if playlist.contains_video(video.id()) {
            return Err(PlayerError::AlreadyInPlaylist);
        }
        let title = video.title().to_string();

        self.playlists.get_mut(name)?.add_video(video_id);
        info!("Added {} to playlist '{}'", video_id, name);
        self.emit(PlayerEvent::VideoAdded {
            playlist: name.to_string(),
            title,
        });
        Ok(())
    }

    /// Resolve a playlist's ids through the catalog, keeping playlist order
    pub fn show_playlist(&self, name: &str) -> Result<PlaylistView<'_>, PlayerError> {
        let playlist = self.playlists.get(name)?;
        let videos = playlist
            .video_ids()
            .iter()
            .filter_map(|id| self.catalog.video(id))
            .collect();
        Ok(PlaylistView { playlist, videos })
    }

    pub fn remove_from_playlist(&mut self, name: &str, video_id: &str) -> Result<(), PlayerError> {
        let playlist = self.playlists.get(name)?;
        let video = self.catalog.video(video_id).ok_or(PlayerError::VideoNotFound)?;
        if !playlist.contains_video(video.id()) {
            return Err(PlayerError::NotInPlaylist);
        }
        let title = video.title().to_string();

        self.playlists.get_mut(name)?.remove_video(video_id);
        info!("Removed {} from playlist '{}'", video_id, name);
        self.emit(PlayerEvent::VideoRemoved {
            playlist: name.to_string(),
            title,
        });
        Ok(())
    }

    pub fn clear_playlist(&mut self, name: &str) -> Result<(), PlayerError> {
        self.playlists.get_mut(name)?.clear();
        info!("Cleared playlist '{}'", name);
        self.emit(PlayerEvent::PlaylistCleared {
            playlist: name.to_string(),
        });
        Ok(())
    }

    pub fn delete_playlist(&mut self, name: &str) -> Result<(), PlayerError> {
        self.playlists.delete(name)?;
        self.emit(PlayerEvent::PlaylistDeleted {
            playlist: name.to_string(),
        });
        Ok(())
    }

    pub fn show_all_playlists(&self) -> Vec<&Playlist> {
        self.playlists.list_all()
    }
}

fn sorted_by_title(mut videos: Vec<&Video>) -> Vec<&Video> {
    videos.sort_by(|a, b| a.title().cmp(b.title()).then_with(|| a.id().cmp(b.id())));
    videos
}

fn choose_result(term: &str, results: &[&Video], prompt: &mut dyn SelectionPrompt) -> SearchOutcome {
    if results.is_empty() {
        debug!("No search results for {}", term);
        return SearchOutcome::NoResults;
    }

    prompt
        .select(term, results)
        .and_then(|answer| parse_selection(&answer, results.len()))
        .map(|index| SearchOutcome::Played(results[index].id().to_string()))
        .unwrap_or(SearchOutcome::NoSelection)
}
