use std::collections::BTreeMap;
use tracing::info;

use super::PlayerError;

/// Lookup key for a playlist name: whitespace removed, lowercased.
/// "My Playlist" and "myplaylist" resolve to the same key.
pub fn normalize_playlist_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A named, ordered list of video ids. Videos are referenced by id only and
/// resolved through the catalog when the playlist is shown.
#[derive(Debug, Clone)]
pub struct Playlist {
    name: String,
    key: String,
    video_ids: Vec<String>,
}

impl Playlist {
    /// Create a new empty playlist
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let key = normalize_playlist_name(&name);
        Self {
            name,
            key,
            video_ids: Vec::new(),
        }
    }

    /// Name as given at creation
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn video_ids(&self) -> &[String] {
        &self.video_ids
    }

    pub fn contains_video(&self, video_id: &str) -> bool {
        self.video_ids.iter().any(|id| id == video_id)
    }

    /// Append a video. Callers check `contains_video` first.
    pub fn add_video(&mut self, video_id: impl Into<String>) {
        self.video_ids.push(video_id.into());
    }

    /// Remove a video by id, returning whether it was present
    pub fn remove_video(&mut self, video_id: &str) -> bool {
        if let Some(pos) = self.video_ids.iter().position(|id| id == video_id) {
            self.video_ids.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.video_ids.clear();
    }

    pub fn len(&self) -> usize {
        self.video_ids.len()
    }

    /// Check if playlist is empty
    pub fn is_empty(&self) -> bool {
        self.video_ids.is_empty()
    }
}

/// Owns every playlist, keyed by normalized name. The ordered map keeps
/// listings sorted by key without an extra sort step.
#[derive(Debug, Default)]
pub struct PlaylistRegistry {
    playlists: BTreeMap<String, Playlist>,
}

impl PlaylistRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new playlist
    pub fn create(&mut self, name: &str) -> Result<&Playlist, PlayerError> {
        let key = normalize_playlist_name(name);
        if self.playlists.contains_key(&key) {
            return Err(PlayerError::DuplicateName);
        }

        info!("Created new playlist: '{}'", name);
        Ok(self.playlists.entry(key).or_insert_with(|| Playlist::new(name)))
    }

    pub fn get(&self, name: &str) -> Result<&Playlist, PlayerError> {
        self.playlists
            .get(&normalize_playlist_name(name))
            .ok_or(PlayerError::PlaylistNotFound)
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Playlist, PlayerError> {
        self.playlists
            .get_mut(&normalize_playlist_name(name))
            .ok_or(PlayerError::PlaylistNotFound)
    }

    /// Delete a playlist, handing back what was removed
    pub fn delete(&mut self, name: &str) -> Result<Playlist, PlayerError> {
        let playlist = self
            .playlists
            .remove(&normalize_playlist_name(name))
            .ok_or(PlayerError::PlaylistNotFound)?;
        info!("Deleted playlist: '{}'", playlist.name());
        Ok(playlist)
    }

    /// List all playlists, ordered by normalized key
    pub fn list_all(&self) -> Vec<&Playlist> {
        self.playlists.values().collect()
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_playlist_name("My Playlist"), "myplaylist");
        assert_eq!(normalize_playlist_name(" my\tPLAY list "), "myplaylist");
        assert_eq!(normalize_playlist_name("myplaylist"), "myplaylist");
    }

    #[test]
    fn test_playlist_membership() {
        let mut playlist = Playlist::new("Fun Stuff");
        assert_eq!(playlist.key(), "funstuff");
        assert!(playlist.is_empty());

        playlist.add_video("v1");
        playlist.add_video("v2");
        assert!(playlist.contains_video("v1"));
        assert_eq!(playlist.video_ids(), ["v1", "v2"]);

        assert!(playlist.remove_video("v1"));
        assert!(!playlist.remove_video("v1"));
        assert_eq!(playlist.len(), 1);

        playlist.clear();
        assert!(playlist.is_empty());
        assert_eq!(playlist.name(), "Fun Stuff");
    }

    #[test]
    fn test_duplicate_names_collide_after_normalization() {
        let mut registry = PlaylistRegistry::new();
        registry.create("My Playlist").unwrap();
        assert_eq!(
            registry.create("myplaylist").unwrap_err(),
            PlayerError::DuplicateName
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("MYPLAYLIST").unwrap().name(), "My Playlist");
    }

    #[test]
    fn test_lookup_and_delete() {
        let mut registry = PlaylistRegistry::new();
        assert_eq!(registry.get("missing").unwrap_err(), PlayerError::PlaylistNotFound);
        assert_eq!(registry.delete("missing").unwrap_err(), PlayerError::PlaylistNotFound);

        registry.create("Fun").unwrap();
        registry.get_mut("fun").unwrap().add_video("v1");
        let removed = registry.delete("FUN").unwrap();
        assert_eq!(removed.video_ids(), ["v1"]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_list_all_sorted_by_key() {
        let mut registry = PlaylistRegistry::new();
        registry.create("zebra").unwrap();
        registry.create("Apple Pie").unwrap();
        registry.create("mango").unwrap();

        let names: Vec<&str> = registry.list_all().iter().map(|p| p.name()).collect();
        assert_eq!(names, ["Apple Pie", "mango", "zebra"]);
    }
}
