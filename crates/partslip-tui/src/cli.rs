//! Command-line arguments.
//!
//! Without arguments the TUI starts. `--print` and `--file` run the
//! pipeline once and write the messages to stdout.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "partslip",
    about = "Turn a meeting schedule sheet into per-person assignment messages",
    long_about = "Turn a meeting schedule sheet into per-person assignment messages.\n\
                  \n\
                  Without options an interactive terminal UI starts. With --print or\n\
                  --file every message is written to stdout and the program exits.",
    version,
    group(ArgGroup::new("once").args(["print", "file"]))
)]
pub struct Cli {
    /// Load a sheet and print every message. Uses the saved URL
    /// (or PARTSLIP_SHEET_URL) when URL is omitted
    #[arg(long, value_name = "URL", num_args = 0..=1)]
    print: Option<Option<String>>,

    /// Read CSV from a local file instead of fetching, or '-' for stdin
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Print messages as JSON instead of text
    #[arg(long, requires = "once")]
    json: bool,
}

/// Where the CSV for a one-shot run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Fetch from a URL, or the configured URL when `None`.
    Url(Option<String>),
    /// Read a local file, `-` meaning stdin.
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tui,
    Print { input: Input, json: bool },
}

impl Cli {
    pub fn into_command(self) -> Command {
        let input = match (self.print, self.file) {
            (_, Some(path)) => Input::File(path),
            (Some(url), None) => Input::Url(url),
            (None, None) => return Command::Tui,
        };
        Command::Print { input, json: self.json }
    }
}
