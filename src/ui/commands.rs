use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NumberOfVideos,
    ShowAllVideos,
    Play { video_id: String },
    PlayRandom,
    Stop,
    Pause,
    Continue,
    ShowPlaying,
    CreatePlaylist { name: String },
    AddToPlaylist { name: String, video_id: String },
    RemoveFromPlaylist { name: String, video_id: String },
    ClearPlaylist { name: String },
    DeletePlaylist { name: String },
    ShowPlaylist { name: String },
    ShowAllPlaylists,
    SearchVideos { term: String },
    SearchVideosWithTag { tag: String },
    FlagVideo { video_id: String, reason: Option<String> },
    AllowVideo { video_id: String },
    Help,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),

    #[error("`{command}` is missing its {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

impl Command {
    /// Parse one input line. Returns `Ok(None)` for blank lines.
    ///
    /// Playlist names may contain spaces, so commands taking a name consume the
    /// rest of the line, and those that also take a video id read it from the
    /// last word.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        if word.is_empty() {
            return Ok(None);
        }

        let command = match word.to_ascii_uppercase().as_str() {
            "NUMBER_OF_VIDEOS" => Command::NumberOfVideos,
            "SHOW_ALL_VIDEOS" => Command::ShowAllVideos,
            "PLAY" => Command::Play {
                video_id: first_word(rest, "PLAY", "video id")?,
            },
            "PLAY_RANDOM" => Command::PlayRandom,
            "STOP" => Command::Stop,
            "PAUSE" => Command::Pause,
            "CONTINUE" => Command::Continue,
            "SHOW_PLAYING" => Command::ShowPlaying,
            "CREATE_PLAYLIST" => Command::CreatePlaylist {
                name: whole(rest, "CREATE_PLAYLIST", "playlist name")?,
            },
            "ADD_TO_PLAYLIST" => {
                let (name, video_id) = name_and_id(rest, "ADD_TO_PLAYLIST")?;
                Command::AddToPlaylist { name, video_id }
            }
            "REMOVE_FROM_PLAYLIST" => {
                let (name, video_id) = name_and_id(rest, "REMOVE_FROM_PLAYLIST")?;
                Command::RemoveFromPlaylist { name, video_id }
            }
            "CLEAR_PLAYLIST" => Command::ClearPlaylist {
                name: whole(rest, "CLEAR_PLAYLIST", "playlist name")?,
            },
            "DELETE_PLAYLIST" => Command::DeletePlaylist {
                name: whole(rest, "DELETE_PLAYLIST", "playlist name")?,
            },
            "SHOW_PLAYLIST" => Command::ShowPlaylist {
                name: whole(rest, "SHOW_PLAYLIST", "playlist name")?,
            },
            "SHOW_ALL_PLAYLISTS" => Command::ShowAllPlaylists,
            "SEARCH_VIDEOS" => Command::SearchVideos {
                term: whole(rest, "SEARCH_VIDEOS", "search term")?,
            },
            "SEARCH_VIDEOS_WITH_TAG" => Command::SearchVideosWithTag {
                tag: first_word(rest, "SEARCH_VIDEOS_WITH_TAG", "tag")?,
            },
            "FLAG_VIDEO" => {
                let video_id = first_word(rest, "FLAG_VIDEO", "video id")?;
                let reason = rest[video_id.len()..].trim();
                Command::FlagVideo {
                    video_id,
                    reason: (!reason.is_empty()).then(|| reason.to_string()),
                }
            }
            "ALLOW_VIDEO" => Command::AllowVideo {
                video_id: first_word(rest, "ALLOW_VIDEO", "video id")?,
            },
            "HELP" => Command::Help,
            "EXIT" | "QUIT" => Command::Exit,
            _ => return Err(CommandError::Unknown(word.to_string())),
        };

        Ok(Some(command))
    }
}

fn first_word(rest: &str, command: &'static str, argument: &'static str) -> Result<String, CommandError> {
    rest.split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or(CommandError::MissingArgument { command, argument })
}

fn whole(rest: &str, command: &'static str, argument: &'static str) -> Result<String, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, argument })
    } else {
        Ok(rest.to_string())
    }
}

fn name_and_id(rest: &str, command: &'static str) -> Result<(String, String), CommandError> {
    let (name, video_id) = rest
        .rsplit_once(char::is_whitespace)
        .ok_or(CommandError::MissingArgument {
            command,
            argument: "video id",
        })?;
    Ok((name.trim().to_string(), video_id.to_string()))
}

pub const HELP_TEXT: &str = "\
Available commands:
    NUMBER_OF_VIDEOS - Shows how many videos are in the library.
    SHOW_ALL_VIDEOS - Lists all videos from the library.
    PLAY <video_id> - Plays specified video.
    PLAY_RANDOM - Plays a random video from the library.
    STOP - Stop the current video.
    PAUSE - Pause the current video.
    CONTINUE - Resume the current paused video.
    SHOW_PLAYING - Displays the title, video_id, video tags and paused status of the video that is currently playing (or paused).
    CREATE_PLAYLIST <playlist_name> - Creates a new (empty) playlist with the provided name.
    ADD_TO_PLAYLIST <playlist_name> <video_id> - Adds the requested video to the playlist.
    REMOVE_FROM_PLAYLIST <playlist_name> <video_id> - Removes the specified video from the specified playlist
    CLEAR_PLAYLIST <playlist_name> - Removes all video from the playlist with a given name.
    DELETE_PLAYLIST <playlist_name> - Deletes the playlist with the given name.
    SHOW_PLAYLIST <playlist_name> - List all the videos in this playlist.
    SHOW_ALL_PLAYLISTS - Display all the available playlists.
    SEARCH_VIDEOS <search_term> - Display result matching the search term and allow the user to play one.
    SEARCH_VIDEOS_WITH_TAG <tag_name> - Display all videos whose tags contains the provided tag.
    FLAG_VIDEO <video_id> <flag_reason> - Mark a video as flagged.
    ALLOW_VIDEO <video_id> - Removes a flag from a video.
    HELP - Displays help.
    EXIT - Terminates the program execution.";
