use anyhow::Result;
use std::fmt;
use std::io::{self, BufRead, Write};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::commands::{Command, HELP_TEXT};
use crate::media::{
    Catalog, PauseOutcome, PlayerError, PlayerEvent, SearchOutcome, SelectionPrompt, Video,
    VideoPlayer,
};

const WELCOME: &str = "Hello and welcome to Reelbox, what would you like to do? \
Enter HELP for list of available commands or EXIT to terminate.";
const GOODBYE: &str = "Reelbox has now terminated its execution. Thank you and goodbye!";
const INVALID_COMMAND: &str =
    "Please enter a valid command, type HELP for a list of available commands.";
const PROMPT: &str = "RB> ";

/// Line-oriented terminal I/O. Doubles as the search selection prompt.
pub struct ConsoleIo<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleIo<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Next input line, or None at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn show_results(&mut self, term: &str, results: &[&Video]) -> io::Result<()> {
        writeln!(self.output, "Here are the results for {}:", term)?;
        for (index, video) in results.iter().enumerate() {
            writeln!(self.output, "\t{}) {}", index + 1, video)?;
        }
        writeln!(
            self.output,
            "Would you like to play any of the above? If yes, specify the number of the video."
        )?;
        writeln!(
            self.output,
            "If your answer is not a valid number, we will assume it's a no."
        )?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> SelectionPrompt for ConsoleIo<R, W> {
    fn select(&mut self, term: &str, results: &[&Video]) -> Option<String> {
        let answer = self
            .show_results(term, results)
            .and_then(|_| self.read_line());
        match answer {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Selection prompt failed, treating as no selection: {}", e);
                None
            }
        }
    }
}

/// Reads commands, drives the player and prints what happened
pub struct Console<C: Catalog, R, W> {
    player: VideoPlayer<C>,
    io: ConsoleIo<R, W>,
    events: mpsc::UnboundedReceiver<PlayerEvent>,
}

impl<C: Catalog, R: BufRead, W: Write> Console<C, R, W> {
    pub fn new(mut player: VideoPlayer<C>, input: R, output: W) -> Self {
        let (sender, events) = mpsc::unbounded_channel();
        player.set_event_sender(sender);
        Self {
            player,
            io: ConsoleIo::new(input, output),
            events,
        }
    }

    pub fn player(&self) -> &VideoPlayer<C> {
        &self.player
    }

    /// Command loop until EXIT or end of input
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.io.output, "{}", WELCOME)?;

        loop {
            write!(self.io.output, "{}", PROMPT)?;
            self.io.output.flush()?;

            let Some(line) = self.io.read_line()? else {
                debug!("End of input");
                break;
            };
            if !self.execute_line(&line)? {
                break;
            }
        }

        writeln!(self.io.output, "{}", GOODBYE)?;
        self.io.output.flush()?;
        Ok(())
    }

    /// Handle one line of input. Returns false once the user asks to exit.
    pub fn execute_line(&mut self, line: &str) -> Result<bool> {
        match Command::parse(line) {
            Ok(None) => Ok(true),
            Ok(Some(Command::Exit)) => Ok(false),
            Ok(Some(command)) => {
                debug!(?command, "executing");
                self.execute(command)?;
                Ok(true)
            }
            Err(e) => {
                warn!("Rejected input {:?}: {}", line.trim(), e);
                writeln!(self.io.output, "{}", INVALID_COMMAND)?;
                Ok(true)
            }
        }
    }

    fn execute(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::NumberOfVideos => {
                writeln!(
                    self.io.output,
                    "{} videos in the library",
                    self.player.number_of_videos()
                )?;
            }
            Command::ShowAllVideos => {
                writeln!(self.io.output, "Here's a list of all available videos:")?;
                for video in self.player.all_videos() {
                    writeln!(self.io.output, "\t {}{}", video, video.flag_suffix())?;
                }
            }
            Command::Play { video_id } => {
                let result = self.player.play_video(&video_id);
                self.report(result, "Cannot play video")?;
            }
            Command::PlayRandom => {
                let result = self.player.play_random_video();
                self.report(result, "Cannot play video")?;
            }
            Command::Stop => {
                let result = self.player.stop_video();
                self.report(result, "Cannot stop video")?;
            }
            Command::Pause => match self.player.pause_video() {
                Ok(PauseOutcome::AlreadyPaused { title }) => {
                    writeln!(self.io.output, "Video already paused: {}", title)?;
                }
                result => self.report(result.map(|_| ()), "Cannot pause video")?,
            },
            Command::Continue => {
                let result = self.player.continue_video();
                self.report(result, "Cannot continue video")?;
            }
            Command::ShowPlaying => match self.player.show_playing() {
                Some(now) => {
                    let paused = if now.paused { " - PAUSED" } else { "" };
                    writeln!(self.io.output, "Currently playing: {}{}", now.video, paused)?;
                }
                None => writeln!(self.io.output, "No video is currently playing")?,
            },
            Command::CreatePlaylist { name } => {
                let result = self.player.create_playlist(&name);
                self.report(result, "Cannot create playlist")?;
            }
            Command::AddToPlaylist { name, video_id } => {
                let result = self.player.add_to_playlist(&name, &video_id);
                self.report(result, format!("Cannot add video to {}", name))?;
            }
            Command::RemoveFromPlaylist { name, video_id } => {
                let result = self.player.remove_from_playlist(&name, &video_id);
                self.report(result, format!("Cannot remove video from {}", name))?;
            }
            Command::ClearPlaylist { name } => {
                let result = self.player.clear_playlist(&name);
                self.report(result, format!("Cannot clear playlist {}", name))?;
            }
            Command::DeletePlaylist { name } => {
                let result = self.player.delete_playlist(&name);
                self.report(result, format!("Cannot delete playlist {}", name))?;
            }
            Command::ShowPlaylist { name } => match self.player.show_playlist(&name) {
                Ok(view) => {
                    writeln!(self.io.output, "Showing playlist: {}", name)?;
                    if view.videos.is_empty() {
                        writeln!(self.io.output, "No videos here yet")?;
                    }
                    for video in view.videos {
                        writeln!(self.io.output, "\t {}{}", video, video.flag_suffix())?;
                    }
                }
                Err(e) => writeln!(self.io.output, "Cannot show playlist {}: {}", name, e)?,
            },
            Command::ShowAllPlaylists => {
                let playlists = self.player.show_all_playlists();
                if playlists.is_empty() {
                    writeln!(self.io.output, "No playlists exist yet")?;
                } else {
                    writeln!(self.io.output, "Showing all playlists:")?;
                    for playlist in playlists {
                        writeln!(self.io.output, "\t{}", playlist.name())?;
                    }
                }
            }
            Command::SearchVideos { term } => {
                let result = self.player.search_videos(&term, &mut self.io);
                self.report_search(result, &term)?;
            }
            Command::SearchVideosWithTag { tag } => {
                let result = self.player.search_videos_with_tag(&tag, &mut self.io);
                self.report_search(result, &tag)?;
            }
            Command::FlagVideo { video_id, reason } => {
                let result = self.player.flag_video(&video_id, reason.as_deref());
                self.report(result, "Cannot flag video")?;
            }
            Command::AllowVideo { video_id } => {
                let result = self.player.allow_video(&video_id);
                self.report(result, "Cannot remove flag from video")?;
            }
            Command::Help => writeln!(self.io.output, "{}", HELP_TEXT)?,
            Command::Exit => {}
        }

        self.io.output.flush()
    }

    /// Print queued events, then the failure if there was one
    fn report(&mut self, result: Result<(), PlayerError>, context: impl fmt::Display) -> io::Result<()> {
        self.flush_events()?;
        match result {
            Ok(()) => Ok(()),
            Err(PlayerError::NoVideosAvailable) => {
                writeln!(self.io.output, "{}", PlayerError::NoVideosAvailable)
            }
            Err(e) => writeln!(self.io.output, "{}: {}", context, e),
        }
    }

    fn report_search(&mut self, result: Result<SearchOutcome, PlayerError>, term: &str) -> io::Result<()> {
        match result {
            Ok(SearchOutcome::NoResults) => {
                writeln!(self.io.output, "No search results for {}", term)
            }
            Ok(_) => self.flush_events(),
            Err(e) => self.report(Err(e), "Cannot play video"),
        }
    }

    fn flush_events(&mut self) -> io::Result<()> {
        while let Ok(event) = self.events.try_recv() {
            writeln!(self.io.output, "{}", event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{PlayerState, VideoLibrary};
    use std::io::Cursor;

    type TestConsole = Console<VideoLibrary, Cursor<Vec<u8>>, Vec<u8>>;

    fn console(input: &str) -> TestConsole {
        let player = VideoPlayer::new(VideoLibrary::builtin().unwrap()).with_seed(1);
        Console::new(player, Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    /// Run each command line in turn and return everything printed
    fn transcript(console: &mut TestConsole, lines: &[&str]) -> String {
        for line in lines {
            console.execute_line(line).unwrap();
        }
        String::from_utf8(std::mem::take(&mut console.io.output)).unwrap()
    }

    #[test]
    fn test_play_pause_continue_transcript() {
        let mut console = console("");
        let out = transcript(
            &mut console,
            &[
                "PLAY amazing_cats_video_id",
                "PLAY funny_dogs_video_id",
                "PAUSE",
                "PAUSE",
                "SHOW_PLAYING",
                "CONTINUE",
                "CONTINUE",
                "STOP",
                "STOP",
                "PLAY nope",
            ],
        );

        assert_eq!(
            out,
            "Playing video: Amazing Cats\n\
             Stopping video: Amazing Cats\n\
             Playing video: Funny Dogs\n\
             Pausing video: Funny Dogs\n\
             Video already paused: Funny Dogs\n\
             Currently playing: Funny Dogs (funny_dogs_video_id) [#dog #animal] - PAUSED\n\
             Continuing video: Funny Dogs\n\
             Cannot continue video: Video is not paused\n\
             Stopping video: Funny Dogs\n\
             Cannot stop video: No video is currently playing\n\
             Cannot play video: Video does not exist\n"
        );
    }

    #[test]
    fn test_flag_transcript() {
        let mut console = console("");
        let out = transcript(
            &mut console,
            &[
                "PLAY amazing_cats_video_id",
                "FLAG_VIDEO amazing_cats_video_id dont_like_cats",
                "PLAY amazing_cats_video_id",
                "FLAG_VIDEO amazing_cats_video_id",
                "SHOW_PLAYING",
                "ALLOW_VIDEO amazing_cats_video_id",
                "ALLOW_VIDEO amazing_cats_video_id",
                "FLAG_VIDEO another_cat_video_id",
            ],
        );

        assert_eq!(
            out,
            "Playing video: Amazing Cats\n\
             Stopping video: Amazing Cats\n\
             Successfully flagged video: Amazing Cats (reason: dont_like_cats)\n\
             Cannot play video: Video is currently flagged (reason: dont_like_cats)\n\
             Cannot flag video: Video is already flagged\n\
             No video is currently playing\n\
             Successfully removed flag from video: Amazing Cats\n\
             Cannot remove flag from video: Video is not flagged\n\
             Successfully flagged video: Another Cat Video (reason: Not supplied)\n"
        );
    }

    #[test]
    fn test_playlist_transcript() {
        let mut console = console("");
        let out = transcript(
            &mut console,
            &[
                "SHOW_ALL_PLAYLISTS",
                "CREATE_PLAYLIST My Playlist",
                "CREATE_PLAYLIST myplaylist",
                "ADD_TO_PLAYLIST my_list amazing_cats_video_id",
                "ADD_TO_PLAYLIST MYPLAYLIST amazing_cats_video_id",
                "ADD_TO_PLAYLIST MYPLAYLIST amazing_cats_video_id",
                "FLAG_VIDEO funny_dogs_video_id barking",
                "ADD_TO_PLAYLIST myPlaylist funny_dogs_video_id",
                "SHOW_PLAYLIST my playlist",
                "REMOVE_FROM_PLAYLIST myplaylist funny_dogs_video_id",
                "CLEAR_PLAYLIST myplaylist",
                "SHOW_PLAYLIST myplaylist",
                "SHOW_ALL_PLAYLISTS",
                "DELETE_PLAYLIST myplaylist",
                "DELETE_PLAYLIST myplaylist",
            ],
        );

        assert_eq!(
            out,
            "No playlists exist yet\n\
             Successfully created new playlist: My Playlist\n\
             Cannot create playlist: A playlist with the same name already exists\n\
             Cannot add video to my_list: Playlist does not exist\n\
             Added video to MYPLAYLIST: Amazing Cats\n\
             Cannot add video to MYPLAYLIST: Video already added\n\
             Successfully flagged video: Funny Dogs (reason: barking)\n\
             Cannot add video to myPlaylist: Video is currently flagged (reason: barking)\n\
             Showing playlist: my playlist\n\
             \t Amazing Cats (amazing_cats_video_id) [#cat #animal]\n\
             Cannot remove video from myplaylist: Video is not in playlist\n\
             Successfully removed all videos from myplaylist\n\
             Showing playlist: myplaylist\n\
             No videos here yet\n\
             Showing all playlists:\n\
             \tMy Playlist\n\
             Deleted playlist: myplaylist\n\
             Cannot delete playlist myplaylist: Playlist does not exist\n"
        );
    }

    #[test]
    fn test_search_with_selection() {
        let mut console = console("2\n");
        let out = transcript(&mut console, &["SEARCH_VIDEOS_WITH_TAG #cat"]);

        assert_eq!(
            out,
            "Here are the results for #cat:\n\
             \t1) Amazing Cats (amazing_cats_video_id) [#cat #animal]\n\
             \t2) Another Cat Video (another_cat_video_id) [#cat #animal]\n\
             Would you like to play any of the above? If yes, specify the number of the video.\n\
             If your answer is not a valid number, we will assume it's a no.\n\
             Playing video: Another Cat Video\n"
        );
        assert_eq!(
            console.player().state(),
            PlayerState::Playing("another_cat_video_id".to_string())
        );
    }

    #[test]
    fn test_search_rejects_invalid_answer_silently() {
        let mut console = console("yes please\n");
        let out = transcript(&mut console, &["SEARCH_VIDEOS cat", "SEARCH_VIDEOS blah"]);

        assert!(!out.contains("Playing video"));
        assert!(out.ends_with("No search results for blah\n"));
        assert_eq!(console.player().state(), PlayerState::NoVideoPlaying);
    }

    #[test]
    fn test_library_listing() {
        let mut console = console("");
        let out = transcript(
            &mut console,
            &["FLAG_VIDEO nothing_video_id boring", "NUMBER_OF_VIDEOS", "SHOW_ALL_VIDEOS"],
        );

        assert_eq!(
            out,
            "Successfully flagged video: Video about nothing (reason: boring)\n\
             5 videos in the library\n\
             Here's a list of all available videos:\n\
             \t Amazing Cats (amazing_cats_video_id) [#cat #animal]\n\
             \t Another Cat Video (another_cat_video_id) [#cat #animal]\n\
             \t Funny Dogs (funny_dogs_video_id) [#dog #animal]\n\
             \t Life at Google (life_at_google_video_id) [#google #career]\n\
             \t Video about nothing (nothing_video_id) [] - FLAGGED (reason: boring)\n"
        );
    }

    #[test]
    fn test_random_play_with_everything_flagged() {
        let mut console = console("");
        let mut lines: Vec<String> = console
            .player()
            .all_videos()
            .iter()
            .map(|v| format!("FLAG_VIDEO {}", v.id()))
            .collect();
        lines.push("PLAY_RANDOM".to_string());
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();

        let out = transcript(&mut console, &lines);
        assert!(out.ends_with("No videos available\n"));
    }

    #[test]
    fn test_run_until_exit() {
        let mut console = console("NUMBER_OF_VIDEOS\nDANCE\n\nEXIT\nNUMBER_OF_VIDEOS\n");
        console.run().unwrap();
        let out = String::from_utf8(console.io.output.clone()).unwrap();

        assert_eq!(
            out,
            format!(
                "{}\n{p}5 videos in the library\n{p}{}\n{p}{p}{}\n",
                WELCOME,
                INVALID_COMMAND,
                GOODBYE,
                p = PROMPT
            )
        );
    }

    #[test]
    fn test_run_stops_at_end_of_input() {
        let mut console = console("HELP\n");
        console.run().unwrap();
        let out = String::from_utf8(console.io.output.clone()).unwrap();
        assert!(out.contains("Available commands:"));
        assert!(out.ends_with(&format!("{}\n", GOODBYE)));
    }
}
