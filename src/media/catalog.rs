use super::Video;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Catalog shipped with the binary, used when no catalog file is configured.
const BUILTIN_CATALOG: &str = include_str!("../../data/videos.txt");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog line {line}: expected `title | id | tags`")]
    Malformed { line: usize },

    #[error("Failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate video id in catalog: {0}")]
    DuplicateId(String),
}

/// Source of videos for the player. Membership never changes after load;
/// only per-video playback and flag state is mutated through `video_mut`.
pub trait Catalog {
    fn all_videos(&self) -> Vec<&Video>;
    fn video(&self, id: &str) -> Option<&Video>;
    fn video_mut(&mut self, id: &str) -> Option<&mut Video>;

    fn len(&self) -> usize {
        self.all_videos().len()
    }
}

/// In-memory catalog indexed by video id
#[derive(Debug, Clone, Default)]
pub struct VideoLibrary {
    videos: HashMap<String, Video>,
}

impl VideoLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_videos(videos: Vec<Video>) -> Result<Self, CatalogError> {
        let mut library = Self::new();
        for video in videos {
            if library.videos.contains_key(video.id()) {
                return Err(CatalogError::DuplicateId(video.id().to_string()));
            }
            library.videos.insert(video.id().to_string(), video);
        }
        Ok(library)
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        let library = Self::from_videos(parse_text_catalog(BUILTIN_CATALOG)?)?;
        debug!("Loaded built-in catalog with {} videos", library.videos.len());
        Ok(library)
    }

    /// Load a catalog file. `.json` files hold an array of video objects,
    /// anything else is read as the pipe-separated text format.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let videos = if is_json {
            serde_json::from_str::<Vec<Video>>(&content)?
        } else {
            parse_text_catalog(&content)?
        };

        let library = Self::from_videos(videos)?;
        info!("Loaded {} videos from {}", library.videos.len(), path.display());
        Ok(library)
    }
}

impl Catalog for VideoLibrary {
    fn all_videos(&self) -> Vec<&Video> {
        self.videos.values().collect()
    }

    fn video(&self, id: &str) -> Option<&Video> {
        self.videos.get(id)
    }

    fn video_mut(&mut self, id: &str) -> Option<&mut Video> {
        self.videos.get_mut(id)
    }

    fn len(&self) -> usize {
        self.videos.len()
    }
}

/// Parse `title | id | tag1, tag2` lines. Blank lines are skipped and the
/// tag column may be empty or missing.
pub fn parse_text_catalog(content: &str) -> Result<Vec<Video>, CatalogError> {
    let mut videos = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }

        let mut fields = raw.split('|').map(str::trim);
        let title = fields.next().filter(|s| !s.is_empty());
        let id = fields.next().filter(|s| !s.is_empty());
        let (title, id) = match (title, id) {
            (Some(title), Some(id)) => (title, id),
            _ => return Err(CatalogError::Malformed { line: index + 1 }),
        };

        let tags = fields
            .next()
            .map(|column| {
                column
                    .split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        videos.push(Video::new(id, title, tags));
    }

    Ok(videos)
}
