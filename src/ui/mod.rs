// Text console - the face of Reelbox
// Parses commands, runs them against the player and prints the results

pub mod commands; // command words and their arguments
mod console;      // read-eval-print loop and output wording

pub use commands::{Command, CommandError};
pub use console::Console;
