use super::PlayerError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// A single catalog entry. Identity and metadata are fixed at load time;
/// playback and flag state change during the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    id: String,
    title: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(skip)]
    flag: Option<String>, // Some(reason) iff flagged
    #[serde(skip)]
    state: PlaybackState,
}

impl Video {
    pub fn new(id: impl Into<String>, title: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tags,
            flag: None,
            state: PlaybackState::Stopped,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_flagged(&self) -> bool {
        self.flag.is_some()
    }

    pub fn flag_reason(&self) -> Option<&str> {
        self.flag.as_deref()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlaybackState::Paused
    }

    /// Mark the video as unsuitable. Leaves the existing reason untouched
    /// when the video is already flagged.
    pub fn flag(&mut self, reason: impl Into<String>) -> Result<(), PlayerError> {
        if self.flag.is_some() {
            return Err(PlayerError::AlreadyFlagged);
        }
        self.flag = Some(reason.into());
        Ok(())
    }

    pub fn allow(&mut self) -> Result<(), PlayerError> {
        self.flag.take().map(|_| ()).ok_or(PlayerError::NotFlagged)
    }

    // Transition legality is checked by the player, not here.
    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        self.state = PlaybackState::Paused;
    }

    pub fn resume(&mut self) {
        self.state = PlaybackState::Playing;
    }

    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
    }

    /// Case-insensitive substring match on the title.
    pub fn title_contains(&self, term: &str) -> bool {
        self.title.to_lowercase().contains(&term.to_lowercase())
    }

    /// Case-insensitive exact match against any tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == wanted)
    }

    /// Listing suffix for flagged videos, empty otherwise.
    pub fn flag_suffix(&self) -> String {
        match &self.flag {
            Some(reason) => format!(" - FLAGGED (reason: {})", reason),
            None => String::new(),
        }
    }
}

impl fmt::Display for Video {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) [{}]", self.title, self.id, self.tags.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats() -> Video {
        Video::new(
            "amazing_cats_video_id",
            "Amazing Cats",
            vec!["#cat".to_string(), "#animal".to_string()],
        )
    }

    #[test]
    fn test_display_format() {
        let video = cats();
        assert_eq!(video.to_string(), "Amazing Cats (amazing_cats_video_id) [#cat #animal]");

        let untagged = Video::new("nothing_video_id", "Video about nothing", Vec::new());
        assert_eq!(untagged.to_string(), "Video about nothing (nothing_video_id) []");
    }

    #[test]
    fn test_flag_and_allow() {
        let mut video = cats();
        assert!(!video.is_flagged());
        assert_eq!(video.flag_suffix(), "");

        video.flag("dont_like_cats").unwrap();
        assert!(video.is_flagged());
        assert_eq!(video.flag_reason(), Some("dont_like_cats"));
        assert_eq!(video.flag_suffix(), " - FLAGGED (reason: dont_like_cats)");

        // Second flag keeps the first reason
        assert_eq!(video.flag("other"), Err(PlayerError::AlreadyFlagged));
        assert_eq!(video.flag_reason(), Some("dont_like_cats"));

        video.allow().unwrap();
        assert!(!video.is_flagged());
        assert_eq!(video.flag_reason(), None);
        assert_eq!(video.allow(), Err(PlayerError::NotFlagged));
    }

    #[test]
    fn test_playback_transitions() {
        let mut video = cats();
        assert_eq!(video.playback_state(), PlaybackState::Stopped);

        video.play();
        assert!(video.is_playing());
        video.pause();
        assert!(video.is_paused());
        video.resume();
        assert!(video.is_playing());
        video.stop();
        assert_eq!(video.playback_state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let video = cats();
        assert!(video.title_contains("cAt"));
        assert!(!video.title_contains("dog"));
        assert!(video.has_tag("#CAT"));
        // Tags match exactly, not by substring
        assert!(!video.has_tag("#ca"));
    }
}
