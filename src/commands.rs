//! Interactive command parsing
//!
//! The prompt in `main.rs` reads one line at a time and turns it into a
//! [`Command`] here. Arguments that are left out (host, path, id) are asked
//! for interactively by the prompt, so they are optional at this level.

use std::str::FromStr;
use thiserror::Error;

/// Help text printed for `help`, `?` and `h`
pub const HELP_TEXT: &str = "\
Commands:
  help, ?, h                 Show this help
  add [host] [path] [id]     Track a storefront (prompts for missing values;
                             id defaults to the next number)
  remove, delete [id]        Stop tracking a storefront
  list                       Show tracked storefronts
  run                        Start monitoring (Ctrl-C to stop)
  quit, exit, stop           Leave";

/// A parsed prompt command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Add {
        host: Option<String>,
        path: Option<String>,
        id: Option<String>,
    },
    Remove {
        id: Option<String>,
    },
    List,
    Run,
    Quit,
}

/// Input that is not a command
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty input")]
    Empty,

    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?.to_lowercase();
        let mut next_arg = || words.next().map(str::to_string);

        match name.as_str() {
            "help" | "?" | "h" => Ok(Self::Help),
            "add" => Ok(Self::Add {
                host: next_arg(),
                path: next_arg(),
                id: next_arg(),
            }),
            "remove" | "delete" => Ok(Self::Remove { id: next_arg() }),
            "list" => Ok(Self::List),
            "run" => Ok(Self::Run),
            "quit" | "exit" | "stop" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Renders the output of `list`
pub fn render_target_list<'a>(
    targets: Option<impl Iterator<Item = (&'a str, String)>>,
) -> String {
    match targets {
        Some(targets) => targets
            .map(|(id, location)| format!("  {}: {}", id, location))
            .collect::<Vec<_>>()
            .join("\n"),
        None => "No targets are being tracked.".to_string(),
    }
}
